use crate::error::BuildError;

/// Separator between the aliases of a flag spec
pub const ALIAS_SEPARATOR: char = ',';

/// The aliases of one flag, split by form
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagAliases {
    /// long names without the leading `--`, in declared order
    pub longs: Vec<String>,
    /// short names without the leading `-`, in declared order
    pub shorts: Vec<char>,
}

impl FlagAliases {
    /// Splits a spec like `"--query,-q"` into its aliases
    pub fn parse(command: &str, spec: &str) -> Result<Self, BuildError> {
        let invalid = |reason| BuildError::InvalidFlagSpec {
            command: command.to_owned(),
            spec: spec.to_owned(),
            reason,
        };
        let mut aliases = Self::default();

        for token in spec.split(ALIAS_SEPARATOR).map(str::trim) {
            if let Some(long) = token.strip_prefix("--") {
                if long.is_empty() || long.starts_with('-') || long.contains(char::is_whitespace) {
                    return Err(invalid("malformed long alias"));
                }
                aliases.longs.push(long.to_owned());
            } else if let Some(short) = token.strip_prefix('-') {
                let mut chars = short.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '-' && !c.is_whitespace() => aliases.shorts.push(c),
                    _ => return Err(invalid("a short alias is a single character")),
                }
            } else if token.is_empty() {
                return Err(invalid("empty alias"));
            } else {
                return Err(invalid("aliases must start with `-` or `--`"));
            }
        }

        Ok(aliases)
    }

    /// Every alias as written on the command line
    pub fn tokens(&self) -> impl Iterator<Item = String> + '_ {
        self.longs
            .iter()
            .map(|l| format!("--{l}"))
            .chain(self.shorts.iter().map(|s| format!("-{s}")))
    }

    /// Name of the parsed-result entry: the first long alias, or else the
    /// first short one, with dashes replaced by underscores
    pub fn dest(&self) -> String {
        match (self.longs.first(), self.shorts.first()) {
            (Some(long), _) => long.replace('-', "_"),
            (None, Some(short)) => short.to_string(),
            (None, None) => String::new(),
        }
    }
}
