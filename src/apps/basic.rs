//! Static subcommands and nothing else.

use miette::Result;

use super::{root_about, with_root_flags, with_sample_subcommands, APP_NAME};
use crate::{
    builder::{build, CommandTree},
    node::{ArgDescriptor, CommandNode},
};

pub fn app() -> CommandNode {
    let root = with_root_flags(CommandNode::new().about(root_about())).flag(
        "--verbose,-v",
        ArgDescriptor::store_true().help("Log additional information"),
    );

    with_sample_subcommands(root)
}

pub fn tree() -> Result<CommandTree> {
    Ok(build(APP_NAME, &app())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn query_subcommand_collects_everything() {
        let tree = tree().unwrap();
        let parsed = tree
            .parse(["sub1", "sub1.2", "hello", "-q", "a=1", "-q", "b=2"])
            .unwrap();

        assert_eq!(parsed.get_str("arg1"), Some("hello"));
        assert_eq!(parsed.get("query"), Some(&Value::from(vec!["a=1", "b=2"])));
        assert_eq!(parsed.get_str("flag_one"), Some("some default value"));
        assert_eq!(parsed.get_int("flag_two"), Some(5));
        assert_eq!(parsed.get_bool("verbose"), Some(false));
        assert_eq!(parsed.get_list("query").map(<[Value]>::len), Some(2));
        assert_eq!(parsed.to_map().get("arg1"), Some(&Value::from("hello")));
        assert_eq!(parsed.func().name(), "sub1.2");
        assert!(parsed
            .func()
            .ptr_eq(tree.root().find(&["sub1", "sub1.2"]).unwrap().func()));
    }

    #[test]
    fn group_without_handler_prints_its_help() {
        let tree = tree().unwrap();
        let parsed = tree.parse(["sub2"]).unwrap();

        assert_eq!(parsed.func().name(), "my_app sub2");
    }

    #[test]
    fn help_lists_subcommands_with_their_short_help() {
        let help = tree().unwrap().render_help();

        assert!(help.contains("Welcome to my command line interface"));
        assert!(help.contains("Text following the argument descriptions"));
        assert!(help.contains("Help for sub1"));
        assert!(help.contains("--flag-two <COUNT>"));
    }
}
