//! Compiles a declarative [`CommandNode`] tree into a `clap` parser.
//!
//! Building happens in two passes. [`make_parser`] walks the tree pre-order,
//! validating every node and registering its flags, positionals and
//! subcommands on a fresh [`Command`]. Once the root is finalized, the
//! recorded layout is turned into a [`DispatchNode`] tree whose nodes carry
//! the effective handler, so nodes without one can print their fully
//! qualified help.

use std::{collections::HashSet, ffi::OsString};

use clap::{builder::ValueParser, value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::{
    error::BuildError,
    flag::FlagAliases,
    handler::{Handler, PrintHelp},
    node::{About, Action, ArgDescriptor, CommandNode, ValueKind},
    parsed::ParsedArgs,
    value::Value,
};

/// Heading of the subcommand listing in help output
pub const SUBCOMMAND_HEADING: &str = "Available Commands";

const HELP_TOKENS: [&str; 2] = ["--help", "-h"];
const VERSION_TOKENS: [&str; 2] = ["--version", "-V"];

/// A built parser together with the dispatch information of every node
#[derive(Clone, Debug)]
pub struct CommandTree {
    command: Command,
    root: DispatchNode,
}

/// Argument registered on a node, keyed by its parsed-result name
#[derive(Clone, Debug)]
pub(crate) struct Binding {
    pub dest: String,
    pub descriptor: ArgDescriptor,
}

/// Per-node dispatch information, mirroring the subcommand structure
#[derive(Clone, Debug)]
pub struct DispatchNode {
    pub(crate) name: String,
    pub(crate) bindings: Vec<Binding>,
    pub(crate) defaults: Vec<(String, Value)>,
    pub(crate) func: Handler,
    pub(crate) subcommands: Vec<DispatchNode>,
}

impl DispatchNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler this node dispatches to after defaults were applied
    pub fn func(&self) -> &Handler {
        &self.func
    }

    pub fn subcommand(&self, name: &str) -> Option<&DispatchNode> {
        self.subcommands.iter().find(|s| s.name == name)
    }

    /// Follows a chain of subcommand names starting at this node
    pub fn find(&self, path: &[&str]) -> Option<&DispatchNode> {
        path.iter().try_fold(self, |node, name| node.subcommand(name))
    }

    pub(crate) fn default_for(&self, key: &str) -> Option<&Value> {
        self.defaults
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// Layout recorded while building, before the help handlers can be rendered
struct Layout {
    name: String,
    bindings: Vec<Binding>,
    defaults: Vec<(String, Value)>,
    func: Option<Handler>,
    subcommands: Vec<Layout>,
}

/// Builds the parser for the tree rooted at `node`, named `name`
#[tracing::instrument(level = "trace", skip(node))]
pub fn build(name: &str, node: &CommandNode) -> Result<CommandTree, BuildError> {
    let (command, layout) = make_parser(name, node)?;
    let mut command = command.bin_name(name.to_owned());
    command.build();
    let root = finish(layout, &command);

    Ok(CommandTree { command, root })
}

impl CommandTree {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn root(&self) -> &DispatchNode {
        &self.root
    }

    pub fn render_help(&self) -> String {
        self.command.clone().render_long_help().to_string()
    }

    pub fn print_help(&self) {
        print!("{}", self.render_help());
    }

    /// Parses the given tokens, not including the program name
    pub fn parse<I, T>(&self, tokens: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let program = OsString::from(self.root.name.clone());
        self.try_parse_from(std::iter::once(program).chain(tokens.into_iter().map(Into::into)))
    }

    /// Parses a full argv, the first entry being the program name
    pub fn try_parse_from<I, T>(&self, argv: I) -> Result<ParsedArgs, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches: ArgMatches = self.command.clone().try_get_matches_from(argv)?;

        Ok(ParsedArgs::collect(&self.root, &matches))
    }

    /// Parses the arguments of the current process
    pub fn parse_env(&self) -> Result<ParsedArgs, clap::Error> {
        self.try_parse_from(std::env::args_os())
    }
}

/// Creates the parser of a single node and, recursively, of its subcommands.
/// The caller registers the result under its own parser.
#[tracing::instrument(level = "trace", skip(node))]
fn make_parser(name: &str, node: &CommandNode) -> Result<(Command, Layout), BuildError> {
    if name.is_empty() {
        return Err(BuildError::EmptyCommandName);
    }
    let about = About {
        prog: Some(name.to_owned()),
        ..node.about.clone()
    };
    let mut command = parser_for(name, &about).disable_help_subcommand(true);
    let func = node.defaults.func.clone().or_else(|| node.handler.clone());
    let defaults = node.defaults.values.clone();

    let mut reserved: HashSet<&str> = HELP_TOKENS.into_iter().collect();
    if about.version.is_some() {
        reserved.extend(VERSION_TOKENS);
    }
    let mut aliases_seen = HashSet::new();
    let mut dests = HashSet::new();
    let mut bindings = Vec::with_capacity(node.flags.len() + node.args.len());

    for (spec, descriptor) in &node.flags {
        let aliases = FlagAliases::parse(name, spec)?;

        for token in aliases.tokens() {
            if reserved.contains(token.as_str()) {
                return Err(BuildError::ReservedAlias {
                    command: name.to_owned(),
                    alias: token,
                });
            }
            if !aliases_seen.insert(token.clone()) {
                return Err(BuildError::DuplicateAlias {
                    command: name.to_owned(),
                    alias: token,
                });
            }
        }
        let dest = descriptor.dest.clone().unwrap_or_else(|| aliases.dest());
        claim_dest(name, &dest, &mut dests)?;
        check_default(name, &dest, descriptor)?;
        command = command.arg(flag_arg(&dest, &aliases, descriptor));
        bindings.push(Binding {
            dest,
            descriptor: descriptor.clone(),
        });
    }

    check_positional_order(name, &node.args)?;
    for (arg_name, descriptor) in &node.args {
        let invalid = |reason| BuildError::InvalidPositional {
            command: name.to_owned(),
            name: arg_name.to_owned(),
            reason,
        };
        if arg_name.is_empty() || arg_name.starts_with('-') {
            return Err(invalid("names must be non-empty and must not start with `-`"));
        }
        if matches!(descriptor.action, Action::StoreTrue | Action::Count) {
            return Err(invalid("positionals must take a value"));
        }
        let dest = descriptor.dest.clone().unwrap_or_else(|| arg_name.to_owned());
        claim_dest(name, &dest, &mut dests)?;
        check_default(name, &dest, descriptor)?;
        command = command.arg(positional_arg(&dest, arg_name, descriptor));
        bindings.push(Binding {
            dest,
            descriptor: descriptor.clone(),
        });
    }

    let mut subcommands = Vec::with_capacity(node.subcommands.len());
    if !node.subcommands.is_empty() {
        command = command.subcommand_help_heading(SUBCOMMAND_HEADING);
        let mut names = HashSet::new();

        for (sub_name, sub_node) in &node.subcommands {
            if !names.insert(sub_name.as_str()) {
                return Err(BuildError::DuplicateSubcommand {
                    command: name.to_owned(),
                    name: sub_name.to_owned(),
                });
            }
            let (sub_command, sub_layout) = make_parser(sub_name, sub_node)?;
            command = command.subcommand(sub_command);
            subcommands.push(sub_layout);
        }
    }

    Ok((
        command,
        Layout {
            name: name.to_owned(),
            bindings,
            defaults,
            func,
            subcommands,
        },
    ))
}

fn parser_for(name: &str, about: &About) -> Command {
    let prog = about.prog.clone().unwrap_or_else(|| name.to_owned());
    let mut command = Command::new(prog);

    command = match (&about.help, &about.description) {
        (Some(help), Some(description)) => command
            .about(help.clone())
            .long_about(description.clone()),
        (Some(text), None) | (None, Some(text)) => command.about(text.clone()),
        (None, None) => command,
    };
    if let Some(epilog) = &about.epilog {
        command = command.after_help(epilog.clone());
    }
    if let Some(version) = &about.version {
        command = command.version(version.clone());
    }

    command
}

/// Replaces nodes without a handler by one printing the node's help. Must
/// run on the finalized command so usage lines carry the full command path.
fn finish(layout: Layout, command: &Command) -> DispatchNode {
    let func = layout.func.unwrap_or_else(|| {
        let text = command.clone().render_long_help().to_string();
        let display_name = command.get_bin_name().unwrap_or(command.get_name());
        Handler::new(PrintHelp::new(display_name, text))
    });
    let subcommands = layout
        .subcommands
        .into_iter()
        .zip(command.get_subcommands())
        .map(|(sub_layout, sub_command)| finish(sub_layout, sub_command))
        .collect();

    DispatchNode {
        name: layout.name,
        bindings: layout.bindings,
        defaults: layout.defaults,
        func,
        subcommands,
    }
}

fn claim_dest(command: &str, dest: &str, dests: &mut HashSet<String>) -> Result<(), BuildError> {
    if dest == "help" || dest == "version" {
        return Err(BuildError::ReservedAlias {
            command: command.to_owned(),
            alias: dest.to_owned(),
        });
    }
    if !dests.insert(dest.to_owned()) {
        return Err(BuildError::DuplicateDest {
            command: command.to_owned(),
            dest: dest.to_owned(),
        });
    }

    Ok(())
}

/// Positionals are matched by position, so optional ones must trail the
/// required ones, and a multi-value positional is only allowed last, or
/// second to last when the last one is required.
fn check_positional_order(
    command: &str,
    args: &[(String, ArgDescriptor)],
) -> Result<(), BuildError> {
    let required = |descriptor: &ArgDescriptor| descriptor.required.unwrap_or(true);
    let last_required = args.last().map_or(false, |(_, d)| required(d));
    let mut seen_optional = false;
    let mut seen_multiple = false;

    for (index, (arg_name, descriptor)) in args.iter().enumerate() {
        let invalid = |reason| BuildError::InvalidPositional {
            command: command.to_owned(),
            name: arg_name.to_owned(),
            reason,
        };
        if required(descriptor) && seen_optional {
            return Err(invalid("a required positional may not follow an optional one"));
        }
        seen_optional |= !required(descriptor);

        let remaining = args.len() - index - 1;
        let placement_ok = remaining == 0 || (remaining == 1 && last_required);
        if descriptor.action == Action::Append {
            if !placement_ok || seen_multiple {
                return Err(invalid("only the last positional may collect multiple values"));
            }
            seen_multiple = true;
        }
    }

    Ok(())
}

fn check_default(command: &str, dest: &str, descriptor: &ArgDescriptor) -> Result<(), BuildError> {
    let fits = |value: &Value| {
        matches!(
            (descriptor.kind, value),
            (ValueKind::String, Value::Str(_))
                | (ValueKind::Int, Value::Int(_))
                | (ValueKind::Path, Value::Path(_) | Value::Str(_))
        )
    };
    let valid = match (&descriptor.default, descriptor.action) {
        (None, _) | (Some(Value::Null), _) => true,
        (Some(value), Action::Store) => fits(value),
        (Some(Value::List(items)), Action::Append) => items.iter().all(fits),
        (Some(value), Action::StoreTrue) => matches!(value, Value::Bool(_)),
        (Some(value), Action::Count) => matches!(value, Value::Int(_)),
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(BuildError::InvalidDefault {
            command: command.to_owned(),
            dest: dest.to_owned(),
            value: descriptor
                .default
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        })
    }
}

fn flag_arg(dest: &str, aliases: &FlagAliases, descriptor: &ArgDescriptor) -> Arg {
    let mut arg = configure(Arg::new(dest.to_owned()), descriptor)
        .required(descriptor.required.unwrap_or(false));

    if let Some((first, rest)) = aliases.longs.split_first() {
        arg = arg.long(first.clone()).visible_aliases(rest.to_vec());
    }
    if let Some((first, rest)) = aliases.shorts.split_first() {
        arg = arg.short(*first).visible_short_aliases(rest.to_vec());
    }

    arg
}

fn positional_arg(dest: &str, name: &str, descriptor: &ArgDescriptor) -> Arg {
    let mut arg = configure(Arg::new(dest.to_owned()), descriptor)
        .required(descriptor.required.unwrap_or(true));

    if descriptor.metavar.is_none() {
        arg = arg.value_name(name.to_owned());
    }
    if descriptor.action == Action::Append {
        arg = arg.num_args(1..);
    }

    arg
}

/// Applies the settings shared by flags and positionals. Defaults are not
/// handed to clap; they are resolved when the parsed result is assembled.
fn configure(arg: Arg, descriptor: &ArgDescriptor) -> Arg {
    let mut arg = match descriptor.action {
        Action::Store => arg
            .action(ArgAction::Set)
            .value_parser(value_parser_for(descriptor.kind)),
        Action::Append => arg
            .action(ArgAction::Append)
            .value_parser(value_parser_for(descriptor.kind)),
        Action::StoreTrue => arg.action(ArgAction::SetTrue),
        Action::Count => arg.action(ArgAction::Count),
    };

    if let Some(metavar) = &descriptor.metavar {
        if matches!(descriptor.action, Action::Store | Action::Append) {
            arg = arg.value_name(metavar.clone());
        }
    }
    if let Some(help) = &descriptor.help {
        arg = arg.help(help.clone());
    }

    arg
}

fn value_parser_for(kind: ValueKind) -> ValueParser {
    match kind {
        ValueKind::String => ValueParser::string(),
        ValueKind::Int => value_parser!(i64).into(),
        ValueKind::Path => ValueParser::path_buf(),
    }
}
