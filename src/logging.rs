use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use crate::value::Value;

/// Log levels from quietest to most verbose, indexed by verbosity
pub const LEVELS: [LevelFilter; 4] = [
    LevelFilter::ERROR,
    LevelFilter::WARN,
    LevelFilter::INFO,
    LevelFilter::DEBUG,
];

/// Maps a verbosity count to a level, clamping at the most verbose one
pub fn level_for(verbosity: u8) -> LevelFilter {
    let index = usize::from(verbosity).min(LEVELS.len() - 1);
    LEVELS[index]
}

/// Verbosity of a parsed `--verbose` entry: the count of a counting flag,
/// or the info level for a boolean one
pub fn verbosity(value: Option<&Value>) -> u8 {
    match value {
        Some(Value::Int(count)) => u8::try_from((*count).max(0)).unwrap_or(u8::MAX),
        Some(Value::Bool(true)) => 2,
        _ => 0,
    }
}

/// Installs the global subscriber. `RUST_LOG` directives are applied on
/// top of the level chosen by `verbosity`.
pub fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbosity).into())
        .from_env_lossy();

    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_goes_from_errors_to_debug() {
        assert_eq!(level_for(0), LevelFilter::ERROR);
        assert_eq!(level_for(1), LevelFilter::WARN);
        assert_eq!(level_for(2), LevelFilter::INFO);
        assert_eq!(level_for(3), LevelFilter::DEBUG);
    }

    #[test]
    fn verbosity_beyond_the_ladder_clamps() {
        assert_eq!(level_for(4), LevelFilter::DEBUG);
        assert_eq!(level_for(u8::MAX), LevelFilter::DEBUG);
    }

    #[test]
    fn verbosity_from_parsed_values() {
        assert_eq!(verbosity(None), 0);
        assert_eq!(verbosity(Some(&Value::Int(2))), 2);
        assert_eq!(verbosity(Some(&Value::Int(-1))), 0);
        assert_eq!(verbosity(Some(&Value::Int(1000))), u8::MAX);
        assert_eq!(verbosity(Some(&Value::Bool(false))), 0);
        assert_eq!(level_for(verbosity(Some(&Value::Bool(true)))), LevelFilter::INFO);
    }
}
