//! Verbosity-counted logging and a `config` group managing the config
//! directory. `config` on its own behaves like `config show`.

use std::{fs, path::PathBuf};

use miette::{miette, Context, IntoDiagnostic, Result};

use super::{root_about, with_root_flags, with_sample_subcommands, APP_NAME};
use crate::{
    builder::{build, CommandTree},
    config::default_config_dir,
    error::Aborted,
    handler::{CommandHandler, Handler},
    node::{About, ArgDescriptor, CommandNode, Defaults, ValueKind},
    parsed::ParsedArgs,
    prompt::{Confirm, StdinConfirm},
};

fn config_dir(args: &ParsedArgs) -> Result<PathBuf> {
    args.get_path("config_dir")
        .ok_or_else(|| miette!("no config directory given"))
}

/// Creates the directory named by `--config-dir`
pub struct InitConfigDir {
    confirm: Box<dyn Confirm>,
}

impl InitConfigDir {
    pub fn new(confirm: Box<dyn Confirm>) -> Self {
        Self { confirm }
    }
}

impl CommandHandler for InitConfigDir {
    #[tracing::instrument(name = "init config dir", level = "trace", skip_all)]
    fn handle(&self, args: &ParsedArgs) -> Result<()> {
        let dir = config_dir(args)?;
        let no_prompt = args.get_bool("no_prompt").unwrap_or(false);

        if !no_prompt && !dir.exists() {
            let question = format!("Create {}?", dir.display());
            if !self.confirm.confirm(&question).into_diagnostic()? {
                return Err(Aborted.into());
            }
        }
        fs::create_dir_all(&dir)
            .into_diagnostic()
            .with_context(|| format!("creating config directory {}", dir.display()))?;
        tracing::info!("config directory is {}", dir.display());

        Ok(())
    }

    fn name(&self) -> &str {
        "config init"
    }
}

/// Prints the resolved config directory
pub struct ShowConfigDir;

impl CommandHandler for ShowConfigDir {
    fn handle(&self, args: &ParsedArgs) -> Result<()> {
        println!("{}", config_dir(args)?.display());
        Ok(())
    }

    fn name(&self) -> &str {
        "config show"
    }
}

pub fn app(config_dir: PathBuf, confirm: Box<dyn Confirm>) -> CommandNode {
    let show = Handler::new(ShowConfigDir);
    let root = with_root_flags(CommandNode::new().about(root_about()))
        .flag(
            "--verbose,-v",
            ArgDescriptor::count()
                .default_value(0i64)
                .help("Log additional information, repeat for more"),
        )
        .flag(
            "--config-dir",
            ArgDescriptor::new()
                .kind(ValueKind::Path)
                .metavar("PATH")
                .default_value(config_dir)
                .help("Location of the config directory"),
        );

    with_sample_subcommands(root).subcommand(
        "config",
        CommandNode::new()
            .about(
                About::new()
                    .description("Manage the config directory")
                    .help("Manage the config directory"),
            )
            .defaults(Defaults::new().func(show.clone()))
            .subcommand(
                "init",
                CommandNode::new()
                    .about(
                        About::new()
                            .description("Create the config directory")
                            .help("Create the config directory"),
                    )
                    .flag(
                        "--no-prompt",
                        ArgDescriptor::store_true()
                            .help("Do not ask before creating the directory"),
                    )
                    .handler(Handler::new(InitConfigDir::new(confirm))),
            )
            .subcommand(
                "show",
                CommandNode::new()
                    .about(
                        About::new()
                            .description("Print the config directory")
                            .help("Print the config directory"),
                    )
                    .handler(show),
            ),
    )
}

pub fn tree() -> Result<CommandTree> {
    let config_dir = default_config_dir(APP_NAME)?;

    Ok(build(APP_NAME, &app(config_dir, Box::new(StdinConfirm)))?)
}
