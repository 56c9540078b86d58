//! Declarative description of a command tree.
//!
//! A [`CommandNode`] is assembled once at start-up with the builder-style
//! methods below and then handed to [`crate::build`]. Nodes own their
//! subcommands, so a tree can never contain itself.

use crate::{handler::Handler, value::Value};

/// Parser metadata of a single node
#[derive(Clone, Debug, Default)]
pub struct About {
    /// long text shown at the top of the node's own help page
    pub description: Option<String>,

    /// text shown after the argument descriptions
    pub epilog: Option<String>,

    /// short text shown next to the node in its parent's command listing
    pub help: Option<String>,

    pub version: Option<String>,

    /// program name; always replaced by the node's name when building
    pub prog: Option<String>,
}

impl About {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn epilog<S: Into<String>>(mut self, epilog: S) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    pub fn help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn version<S: Into<String>>(mut self, version: S) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn prog<S: Into<String>>(mut self, prog: S) -> Self {
        self.prog = Some(prog.into());
        self
    }
}

/// What happens when an argument occurs on the command line
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Action {
    /// keep the last value
    #[default]
    Store,
    /// `true` when present
    StoreTrue,
    /// collect every occurrence into a list
    Append,
    /// count the occurrences
    Count,
}

/// Type the raw token is converted to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueKind {
    #[default]
    String,
    Int,
    Path,
}

/// Options shared by flags and positional arguments
#[derive(Clone, Debug, Default)]
pub struct ArgDescriptor {
    pub action: Action,
    pub kind: ValueKind,
    pub metavar: Option<String>,

    /// value when the argument is absent. Occurrences of a `Count` flag are
    /// added to it and `Append` values extend a list default.
    pub default: Option<Value>,
    pub help: Option<String>,

    /// positionals are required unless set to `Some(false)`,
    /// flags are optional unless set to `Some(true)`
    pub required: Option<bool>,

    /// name of the entry in the parsed result, derived from the
    /// flag or argument name when unset
    pub dest: Option<String>,
}

impl ArgDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_true() -> Self {
        Self::new().action(Action::StoreTrue)
    }

    pub fn append() -> Self {
        Self::new().action(Action::Append)
    }

    pub fn count() -> Self {
        Self::new().action(Action::Count)
    }

    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn metavar<S: Into<String>>(mut self, metavar: S) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    pub fn default_value<V: Into<Value>>(mut self, default: V) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn dest<S: Into<String>>(mut self, dest: S) -> Self {
        self.dest = Some(dest.into());
        self
    }
}

/// Values injected into the parsed result of a node
#[derive(Clone, Debug, Default)]
pub struct Defaults {
    pub values: Vec<(String, Value)>,

    /// replaces the node's own handler as the dispatch target
    pub func: Option<Handler>,
}

impl Defaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value<S: Into<String>, V: Into<Value>>(mut self, key: S, value: V) -> Self {
        self.values.push((key.into(), value.into()));
        self
    }

    pub fn func(mut self, handler: Handler) -> Self {
        self.func = Some(handler);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// One command of the tree, either the root program or a subcommand
#[derive(Clone, Debug, Default)]
pub struct CommandNode {
    pub about: About,
    pub flags: Vec<(String, ArgDescriptor)>,
    pub args: Vec<(String, ArgDescriptor)>,
    pub subcommands: Vec<(String, CommandNode)>,
    pub defaults: Defaults,
    pub handler: Option<Handler>,
}

impl CommandNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn about(mut self, about: About) -> Self {
        self.about = about;
        self
    }

    /// Adds a flag. `spec` lists the aliases separated by `,`, e.g. `"--query,-q"`
    pub fn flag<S: Into<String>>(mut self, spec: S, descriptor: ArgDescriptor) -> Self {
        self.flags.push((spec.into(), descriptor));
        self
    }

    pub fn arg<S: Into<String>>(mut self, name: S, descriptor: ArgDescriptor) -> Self {
        self.args.push((name.into(), descriptor));
        self
    }

    pub fn subcommand<S: Into<String>>(mut self, name: S, node: CommandNode) -> Self {
        self.subcommands.push((name.into(), node));
        self
    }

    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }
}
