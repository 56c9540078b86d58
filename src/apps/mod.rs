//! Demo applications built from declarative trees, from a purely static
//! command set to config management with a top-level error boundary.

use std::process::ExitCode;

use miette::Result;

use crate::{
    error::Aborted,
    handler::{Echo, Handler},
    node::{About, ArgDescriptor, CommandNode, ValueKind},
};

pub mod basic;
pub mod config_dir;
pub mod config_file;

pub const APP_NAME: &str = "my_app";

/// Turns a declined prompt into a plain failure status, other errors propagate
pub fn settle(result: Result<()>) -> Result<ExitCode> {
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if err.downcast_ref::<Aborted>().is_some() => {
            eprintln!("{err}");
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}

fn echo(name: &str) -> Handler {
    Handler::new(Echo::new(name, format!("handler for {name}")))
}

fn root_about() -> About {
    About::new()
        .description("Welcome to my command line interface")
        .epilog("Text following the argument descriptions")
}

/// `--flag-one` and `--flag-two`, shared by every demo
fn with_root_flags(node: CommandNode) -> CommandNode {
    node.flag(
        "--flag-one",
        ArgDescriptor::new()
            .metavar("STRING")
            .default_value("some default value")
            .help("Use flag one to do something"),
    )
    .flag(
        "--flag-two",
        ArgDescriptor::new()
            .kind(ValueKind::Int)
            .metavar("COUNT")
            .default_value(5i64)
            .help("Use flag two to do something else"),
    )
}

/// The `sub1` and `sub2` command groups
fn with_sample_subcommands(node: CommandNode) -> CommandNode {
    node.subcommand(
        "sub1",
        CommandNode::new()
            .about(
                About::new()
                    .description("A description of sub1")
                    .epilog("this is the epilog for sub1")
                    .help("Help for sub1"),
            )
            .subcommand(
                "sub1.1",
                CommandNode::new()
                    .about(
                        About::new()
                            .description("A description of sub1.1")
                            .help("Help for sub1.1"),
                    )
                    .handler(echo("sub1.1")),
            )
            .subcommand(
                "sub1.2",
                CommandNode::new()
                    .about(
                        About::new()
                            .description("A description of sub1.2")
                            .help("Help for sub1.2"),
                    )
                    .flag(
                        "--query,-q",
                        ArgDescriptor::append()
                            .metavar("<key>=<value>")
                            .help("Query parameter. Can use multiple."),
                    )
                    .arg(
                        "arg1",
                        ArgDescriptor::new().help("Help for 'arg1' of sub1.2"),
                    )
                    .handler(echo("sub1.2")),
            ),
    )
    .subcommand(
        "sub2",
        CommandNode::new()
            .about(
                About::new()
                    .description("A description of sub2")
                    .epilog("this is the epilog for sub2")
                    .help("Help for sub2"),
            )
            .subcommand(
                "sub2.1",
                CommandNode::new()
                    .about(
                        About::new()
                            .description("A description of sub2.1")
                            .help("Help for sub2.1"),
                    )
                    .handler(echo("sub2.1")),
            ),
    )
}
