use std::{fmt, sync::Arc};

use miette::Result;

use crate::parsed::ParsedArgs;

/// The action of a command, invoked with the full parsed result
pub trait CommandHandler: Send + Sync {
    fn handle(&self, args: &ParsedArgs) -> Result<()>;

    /// used in logs and debug output
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Shared reference to a handler stored in the command tree
#[derive(Clone)]
pub struct Handler(Arc<dyn CommandHandler>);

impl Handler {
    pub fn new<H: CommandHandler + 'static>(handler: H) -> Self {
        Self(Arc::new(handler))
    }

    pub fn handle(&self, args: &ParsedArgs) -> Result<()> {
        self.0.handle(args)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// true if both refer to the same handler instance
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handler").field(&self.name()).finish()
    }
}

/// Default action of nodes without a handler
pub struct PrintHelp {
    command: String,
    text: String,
}

impl PrintHelp {
    pub fn new<S: Into<String>>(command: S, text: String) -> Self {
        Self {
            command: command.into(),
            text,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl CommandHandler for PrintHelp {
    fn handle(&self, _args: &ParsedArgs) -> Result<()> {
        print!("{}", self.text);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.command
    }
}

/// Prints a fixed line
pub struct Echo {
    name: String,
    message: String,
}

impl Echo {
    pub fn new<S: Into<String>, M: Into<String>>(name: S, message: M) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

impl CommandHandler for Echo {
    fn handle(&self, _args: &ParsedArgs) -> Result<()> {
        println!("{}", self.message);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
