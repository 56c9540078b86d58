use std::{
    fs,
    path::{Path, PathBuf},
};

use miette::{miette, Context, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};

use crate::node::Defaults;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Values saved by `init` and used as defaults of the root flags
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub flag_one: Option<String>,
    pub flag_two: Option<i64>,
}

impl AppConfig {
    /// Root defaults for the saved values
    pub fn to_defaults(&self) -> Defaults {
        let mut defaults = Defaults::new();
        if let Some(flag_one) = &self.flag_one {
            defaults = defaults.value("flag_one", flag_one.as_str());
        }
        if let Some(flag_two) = self.flag_two {
            defaults = defaults.value("flag_two", flag_two);
        }

        defaults
    }
}

/// `~/.config/<app>`
pub fn default_config_dir(app: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| miette!("could not determine the home directory"))?;

    Ok(home.join(".config").join(app))
}

/// `~/.config/<app>/config.json`
pub fn default_config_file(app: &str) -> Result<PathBuf> {
    Ok(default_config_dir(app)?.join(CONFIG_FILE_NAME))
}

/// reads a config file and parses it depending on the extension
#[tracing::instrument(level = "trace")]
pub fn read_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .with_context(|| format!("reading config file {}", path.display()))?;
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let config: Result<AppConfig> = match extension.as_str() {
        "toml" => toml::from_str(&content).into_diagnostic(),
        _ => serde_json::from_str(&content).into_diagnostic(),
    };

    config.with_context(|| format!("parsing config file {}", path.display()))
}

pub fn load_config_if_exists(path: &Path) -> Result<Option<AppConfig>> {
    if path.is_file() {
        read_config(path).map(Some)
    } else {
        Ok(None)
    }
}

#[tracing::instrument(level = "trace", skip(config))]
pub fn write_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    let content = serde_json::to_string_pretty(config).into_diagnostic()?;
    fs::write(path, content)
        .into_diagnostic()
        .with_context(|| format!("writing config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn writes_and_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let config = AppConfig {
            flag_one: Some("saved".into()),
            flag_two: Some(12),
        };

        write_config(&path, &config).unwrap();

        assert_eq!(read_config(&path).unwrap(), config);
    }

    #[test]
    fn reads_toml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "flag_one = \"from toml\"\n").unwrap();

        let config = read_config(&path).unwrap();

        assert_eq!(config.flag_one.as_deref(), Some("from toml"));
        assert_eq!(config.flag_two, None);
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(
            load_config_if_exists(&dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            None
        );
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(read_config(&path).is_err());
    }

    #[test]
    fn only_saved_values_become_defaults() {
        let defaults = AppConfig {
            flag_one: None,
            flag_two: Some(3),
        }
        .to_defaults();

        assert_eq!(defaults.get("flag_two"), Some(&Value::Int(3)));
        assert!(defaults.get("flag_one").is_none());
    }
}
