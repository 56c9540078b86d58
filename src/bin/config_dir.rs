use std::process::ExitCode;

use argtree::{apps, dispatch, logging, Aborted};
use clap::error::ErrorKind;

fn main() -> ExitCode {
    let tree = match apps::config_dir::tree() {
        Ok(tree) => tree,
        Err(err) => {
            eprintln!("{err:?}");
            return ExitCode::FAILURE;
        }
    };

    let args = match tree.parse_env() {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
            _ => {
                let _ = err.print();
                tree.print_help();
                return ExitCode::FAILURE;
            }
        },
    };
    logging::init_tracing(logging::verbosity(args.get("verbose")));

    match dispatch(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.downcast_ref::<Aborted>().is_some() => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{err:?}");
            tree.print_help();
            ExitCode::FAILURE
        }
    }
}
