use miette::Diagnostic;
use thiserror::Error;

/// Misconfiguration of a declarative command tree, reported while building
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("command name must not be empty")]
    #[diagnostic(code(argtree::empty_command_name))]
    EmptyCommandName,

    #[error("invalid flag spec `{spec}` on command `{command}`: {reason}")]
    #[diagnostic(
        code(argtree::invalid_flag_spec),
        help("use `--long`, `-s` or both separated by a comma, e.g. `--query,-q`")
    )]
    InvalidFlagSpec {
        command: String,
        spec: String,
        reason: &'static str,
    },

    #[error("alias `{alias}` is used more than once on command `{command}`")]
    #[diagnostic(code(argtree::duplicate_alias))]
    DuplicateAlias { command: String, alias: String },

    #[error("`{alias}` on command `{command}` is reserved for a built-in flag")]
    #[diagnostic(code(argtree::reserved_alias))]
    ReservedAlias { command: String, alias: String },

    #[error("`{dest}` is the destination of more than one argument on command `{command}`")]
    #[diagnostic(code(argtree::duplicate_dest))]
    DuplicateDest { command: String, dest: String },

    #[error("invalid positional argument `{name}` on command `{command}`: {reason}")]
    #[diagnostic(code(argtree::invalid_positional))]
    InvalidPositional {
        command: String,
        name: String,
        reason: &'static str,
    },

    #[error("subcommand `{name}` is defined more than once under `{command}`")]
    #[diagnostic(code(argtree::duplicate_subcommand))]
    DuplicateSubcommand { command: String, name: String },

    #[error("`{value}` is not a valid default for `{dest}` on command `{command}`")]
    #[diagnostic(code(argtree::invalid_default))]
    InvalidDefault {
        command: String,
        dest: String,
        value: String,
    },
}

/// The user declined a confirmation prompt
#[derive(Debug, Error, Diagnostic)]
#[error("Aborted!")]
#[diagnostic(code(argtree::aborted))]
pub struct Aborted;
