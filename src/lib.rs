//! Builds `clap` command-line parsers from declarative command trees.
//!
//! A tree of [`CommandNode`]s describes flags, positional arguments,
//! subcommands, defaults and handlers. [`build`] compiles it into a
//! [`CommandTree`]; parsing yields [`ParsedArgs`] whose `func` field names
//! the handler of the selected command, which [`dispatch`] invokes.

pub mod apps;
mod builder;
pub mod config;
mod error;
mod flag;
mod handler;
pub mod logging;
mod node;
mod parsed;
pub mod prompt;
mod value;

pub use builder::{build, CommandTree, DispatchNode, SUBCOMMAND_HEADING};
pub use error::{Aborted, BuildError};
pub use flag::{FlagAliases, ALIAS_SEPARATOR};
pub use handler::{CommandHandler, Echo, Handler, PrintHelp};
pub use node::{About, Action, ArgDescriptor, CommandNode, Defaults, ValueKind};
pub use parsed::{dispatch, ParsedArgs};
pub use value::Value;
