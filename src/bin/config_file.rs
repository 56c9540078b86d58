use std::process::ExitCode;

use argtree::{apps, dispatch, logging};
use miette::Result;

fn main() -> Result<ExitCode> {
    let tree = apps::config_file::tree_from(std::env::args_os())?;
    let args = tree.parse_env().unwrap_or_else(|err| err.exit());
    logging::init_tracing(logging::verbosity(args.get("verbose")));

    apps::settle(dispatch(&args))
}
