//! Adds `init`, which saves the root flag values to a config file. Values
//! found in that file become the defaults of the root flags on later runs.

use std::{ffi::OsString, path::PathBuf};

use miette::{miette, IntoDiagnostic, Result};

use super::{root_about, with_root_flags, with_sample_subcommands, APP_NAME};
use crate::{
    builder::{build, CommandTree},
    config::{default_config_file, load_config_if_exists, write_config, AppConfig},
    error::Aborted,
    handler::{CommandHandler, Handler},
    node::{About, ArgDescriptor, CommandNode, ValueKind},
    parsed::ParsedArgs,
    prompt::{Answer, Confirm, StdinConfirm},
};

/// Creates the config file named by `--config`
pub struct InitConfigFile {
    confirm: Box<dyn Confirm>,
}

impl InitConfigFile {
    pub fn new(confirm: Box<dyn Confirm>) -> Self {
        Self { confirm }
    }
}

impl CommandHandler for InitConfigFile {
    #[tracing::instrument(name = "init config file", level = "trace", skip_all)]
    fn handle(&self, args: &ParsedArgs) -> Result<()> {
        let path = args
            .get_path("config")
            .ok_or_else(|| miette!("no config file path given"))?;

        if path.exists() {
            tracing::info!("{} already exists, leaving it untouched", path.display());
            return Ok(());
        }
        if !args.get_bool("no_prompt").unwrap_or(false) {
            let question = format!("Create {}?", path.display());
            if !self.confirm.confirm(&question).into_diagnostic()? {
                return Err(Aborted.into());
            }
        }

        let config = AppConfig {
            flag_one: args.get_str("flag_one").map(ToOwned::to_owned),
            flag_two: args.get_int("flag_two"),
        };
        write_config(&path, &config)?;
        tracing::info!("created {}", path.display());

        Ok(())
    }

    fn name(&self) -> &str {
        "init"
    }
}

/// `saved` values replace the declared defaults of the root flags
pub fn app(config_file: PathBuf, saved: Option<&AppConfig>, confirm: Box<dyn Confirm>) -> CommandNode {
    let mut root = with_root_flags(CommandNode::new().about(root_about()))
        .flag(
            "--verbose,-v",
            ArgDescriptor::store_true().help("Log additional information"),
        )
        .flag(
            "--config",
            ArgDescriptor::new()
                .kind(ValueKind::Path)
                .metavar("PATH")
                .default_value(config_file)
                .help("Location of the config file, read for saved defaults and written by init"),
        );
    if let Some(saved) = saved {
        root = root.defaults(saved.to_defaults());
    }

    with_sample_subcommands(root).subcommand(
        "init",
        CommandNode::new()
            .about(
                About::new()
                    .description("Create the config file from the current flag values")
                    .help("Initialize the config file"),
            )
            .flag(
                "--no-prompt",
                ArgDescriptor::store_true().help("Do not ask before creating the file"),
            )
            .handler(Handler::new(InitConfigFile::new(confirm))),
    )
}

/// The tree for the current user. Saved values are read from the file
/// `--config` names in `argv`, or from the default location.
pub fn tree_from<I, T>(argv: I) -> Result<CommandTree>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    resolve_tree(default_config_file(APP_NAME)?, argv, Box::new(StdinConfirm))
}

/// Parses `argv` once without saved values to find the config file, then
/// builds the tree with that file's values as defaults. A failing first
/// parse falls back to `config_file`; the real parse reports the error.
pub fn resolve_tree<I, T>(
    config_file: PathBuf,
    argv: I,
    confirm: Box<dyn Confirm>,
) -> Result<CommandTree>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let first_pass = build(
        APP_NAME,
        &app(config_file.clone(), None, Box::new(Answer(false))),
    )?;
    let selected = first_pass
        .try_parse_from(argv)
        .ok()
        .and_then(|args| args.get_path("config"))
        .unwrap_or_else(|| config_file.clone());
    tracing::trace!("reading saved values from {}", selected.display());
    let saved = load_config_if_exists(&selected)?;

    Ok(build(APP_NAME, &app(config_file, saved.as_ref(), confirm))?)
}
