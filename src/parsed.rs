use std::{collections::BTreeMap, path::PathBuf};

use clap::{parser::ValueSource, ArgMatches};
use miette::Result;
use serde::Serialize;

use crate::{
    builder::{Binding, DispatchNode},
    handler::Handler,
    node::{Action, ValueKind},
    value::Value,
};

/// Flat result of a parse: one entry per argument of every selected
/// command, the injected defaults, and the `func` dispatch field
#[derive(Clone, Debug, Serialize)]
pub struct ParsedArgs {
    command_path: Vec<String>,
    values: BTreeMap<String, Value>,
    #[serde(skip)]
    func: Handler,
}

impl ParsedArgs {
    /// Walks the selected subcommand chain from the root. Deeper commands
    /// overwrite entries of the same name set by their parents.
    pub(crate) fn collect(root: &DispatchNode, matches: &ArgMatches) -> Self {
        let mut values = BTreeMap::new();
        let mut command_path = Vec::new();
        let mut node = root;
        let mut matches = matches;

        loop {
            command_path.push(node.name.clone());
            collect_node(node, matches, &mut values);

            let selected = matches
                .subcommand()
                .and_then(|(name, sub_matches)| Some((node.subcommand(name)?, sub_matches)));
            match selected {
                Some((sub_node, sub_matches)) => {
                    node = sub_node;
                    matches = sub_matches;
                }
                None => break,
            }
        }

        Self {
            command_path,
            values,
            func: node.func.clone(),
        }
    }

    /// The handler to invoke
    pub fn func(&self) -> &Handler {
        &self.func
    }

    /// Names of the selected commands, starting with the program name
    pub fn command_path(&self) -> &[String] {
        &self.command_path
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_int)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).and_then(Value::as_path)
    }

    pub fn get_list(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_list)
    }

    pub fn values(&self) -> &BTreeMap<String, Value> {
        &self.values
    }

    /// The plain mapping, without the dispatch field
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.values.clone()
    }
}

/// Invokes the dispatch field with the parsed result
#[tracing::instrument(level = "debug", skip_all, fields(command = %parsed.command_path().join(" ")))]
pub fn dispatch(parsed: &ParsedArgs) -> Result<()> {
    tracing::debug!("dispatching to {}", parsed.func().name());
    tracing::trace!(
        "arguments = {}",
        serde_json::to_string(parsed).unwrap_or_default()
    );

    parsed.func().handle(parsed)
}

fn collect_node(node: &DispatchNode, matches: &ArgMatches, values: &mut BTreeMap<String, Value>) {
    for binding in &node.bindings {
        values.insert(binding.dest.clone(), binding_value(node, binding, matches));
    }
    for (key, value) in &node.defaults {
        if !node.bindings.iter().any(|b| &b.dest == key) {
            values.insert(key.clone(), value.clone());
        }
    }
}

/// A value from the command line wins over the node's defaults entry,
/// which wins over the argument's declared default. Counting starts at the
/// default and appended values extend a default list.
fn binding_value(node: &DispatchNode, binding: &Binding, matches: &ArgMatches) -> Value {
    let Binding { dest, descriptor } = binding;
    let from_command_line = matches!(
        matches.value_source(dest),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    );
    let fallback = node.default_for(dest).or(descriptor.default.as_ref());

    if !from_command_line {
        if let Some(value) = fallback {
            return value.clone();
        }
    }

    match descriptor.action {
        Action::Store => one(matches, dest, descriptor.kind).unwrap_or(Value::Null),
        Action::Append => match many(matches, dest, descriptor.kind) {
            Some(values) => {
                let mut items = fallback
                    .and_then(Value::as_list)
                    .map(<[Value]>::to_vec)
                    .unwrap_or_default();
                items.extend(values);
                Value::List(items)
            }
            None => Value::Null,
        },
        Action::StoreTrue => Value::Bool(matches.get_flag(dest)),
        Action::Count => {
            let start = fallback.and_then(Value::as_int).unwrap_or(0);
            Value::Int(start + i64::from(matches.get_count(dest)))
        }
    }
}

fn one(matches: &ArgMatches, id: &str, kind: ValueKind) -> Option<Value> {
    match kind {
        ValueKind::String => matches.get_one::<String>(id).cloned().map(Value::Str),
        ValueKind::Int => matches.get_one::<i64>(id).copied().map(Value::Int),
        ValueKind::Path => matches.get_one::<PathBuf>(id).cloned().map(Value::Path),
    }
}

fn many(matches: &ArgMatches, id: &str, kind: ValueKind) -> Option<Vec<Value>> {
    match kind {
        ValueKind::String => matches
            .get_many::<String>(id)
            .map(|values| values.cloned().map(Value::Str).collect()),
        ValueKind::Int => matches
            .get_many::<i64>(id)
            .map(|values| values.copied().map(Value::Int).collect()),
        ValueKind::Path => matches
            .get_many::<PathBuf>(id)
            .map(|values| values.cloned().map(Value::Path).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        build,
        node::{ArgDescriptor, CommandNode, Defaults},
    };

    fn query_tree() -> CommandNode {
        CommandNode::new()
            .flag(
                "--flag-two",
                ArgDescriptor::new()
                    .kind(ValueKind::Int)
                    .metavar("COUNT")
                    .default_value(5i64),
            )
            .flag("--verbose,-v", ArgDescriptor::count().default_value(0i64))
            .subcommand(
                "find",
                CommandNode::new()
                    .flag("--query,-q", ArgDescriptor::append().metavar("<key>=<value>"))
                    .arg("first", ArgDescriptor::new())
                    .arg("second", ArgDescriptor::new().kind(ValueKind::Path).required(false)),
            )
    }

    #[test]
    fn both_aliases_share_a_destination() {
        let tree = build("app", &query_tree()).unwrap();
        let long = tree.parse(["find", "x", "--query", "k=v"]).unwrap();
        let short = tree.parse(["find", "x", "-q", "k=v"]).unwrap();

        assert_eq!(long.get("query"), short.get("query"));
        assert_eq!(long.get("query"), Some(&Value::from(vec!["k=v"])));
    }

    #[test]
    fn positionals_are_consumed_in_order() {
        let tree = build("app", &query_tree()).unwrap();
        let parsed = tree.parse(["find", "one", "two"]).unwrap();

        assert_eq!(parsed.get_str("first"), Some("one"));
        assert_eq!(parsed.get_path("second"), Some(PathBuf::from("two")));
    }

    #[test]
    fn missing_required_positional_is_a_usage_error() {
        let tree = build("app", &query_tree()).unwrap();
        let err = tree.parse(["find"]).unwrap_err();

        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn absent_arguments_fall_back_to_declared_defaults() {
        let tree = build("app", &query_tree()).unwrap();
        let parsed = tree.parse(["find", "one"]).unwrap();

        assert_eq!(parsed.get_int("flag_two"), Some(5));
        assert_eq!(parsed.get_int("verbose"), Some(0));
        assert_eq!(parsed.get("query"), Some(&Value::Null));
        assert_eq!(parsed.get("second"), Some(&Value::Null));
    }

    #[test]
    fn counts_and_appends_accumulate() {
        let tree = build("app", &query_tree()).unwrap();
        let parsed = tree
            .parse(["-vvv", "-v", "--flag-two", "9", "find", "a", "-q", "1", "-q", "2"])
            .unwrap();

        assert_eq!(parsed.get_int("verbose"), Some(4));
        assert_eq!(parsed.get_int("flag_two"), Some(9));
        assert_eq!(parsed.get("query"), Some(&Value::from(vec!["1", "2"])));
    }

    #[test]
    fn counting_and_appending_start_from_the_default() {
        let node = CommandNode::new()
            .flag("--verbose,-v", ArgDescriptor::count().default_value(2i64))
            .flag("--tag,-t", ArgDescriptor::append().default_value(vec!["base"]))
            .flag("--level", ArgDescriptor::count())
            .defaults(Defaults::new().value("level", 10i64));
        let tree = build("app", &node).unwrap();

        let parsed = tree.parse(["-v", "-t", "extra", "--level"]).unwrap();
        assert_eq!(parsed.get_int("verbose"), Some(3));
        assert_eq!(parsed.get("tag"), Some(&Value::from(vec!["base", "extra"])));
        assert_eq!(parsed.get_int("level"), Some(11));

        let parsed = tree.parse(Vec::<String>::new()).unwrap();
        assert_eq!(parsed.get_int("verbose"), Some(2));
        assert_eq!(parsed.get("tag"), Some(&Value::from(vec!["base"])));
    }

    #[test]
    fn defaults_are_injected_and_override_declared_defaults() {
        let node = CommandNode::new()
            .flag("--name", ArgDescriptor::new().default_value("declared"))
            .defaults(Defaults::new().value("name", "injected").value("extra", 7i64));
        let tree = build("app", &node).unwrap();

        let parsed = tree.parse(Vec::<String>::new()).unwrap();
        assert_eq!(parsed.get_str("name"), Some("injected"));
        assert_eq!(parsed.get_int("extra"), Some(7));

        let parsed = tree.parse(["--name", "typed"]).unwrap();
        assert_eq!(parsed.get_str("name"), Some("typed"));
    }

    #[test]
    fn deeper_defaults_overwrite_parent_entries() {
        let node = CommandNode::new()
            .defaults(Defaults::new().value("mode", "root"))
            .subcommand(
                "child",
                CommandNode::new().defaults(Defaults::new().value("mode", "child")),
            );
        let tree = build("app", &node).unwrap();

        assert_eq!(tree.parse(["child"]).unwrap().get_str("mode"), Some("child"));
        assert_eq!(
            tree.parse(Vec::<String>::new()).unwrap().get_str("mode"),
            Some("root")
        );
    }

    #[test]
    fn serializes_without_dispatch_field() {
        let node = CommandNode::new().flag("--flag-one", ArgDescriptor::new().default_value("x"));
        let tree = build("app", &node).unwrap();
        let json = serde_json::to_value(tree.parse(Vec::<String>::new()).unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "command_path": ["app"], "values": { "flag_one": "x" } })
        );
    }
}
