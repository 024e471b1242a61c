//! Parsing private messages into commands.

/// A private message read as `name arg arg…`.
///
/// `name` is lower-cased; arguments keep their original spelling so that,
/// e.g., a pet name survives, and listeners compare them case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, args: Vec<String>) -> Self {
        Self { name: name.into(), args }
    }

    /// Split `text` on whitespace.  `None` for blank text.
    pub fn parse(text: &str) -> Option<Command> {
        let mut words = text.split_whitespace();
        let name = words.next()?.to_lowercase();
        Some(Command {
            name,
            args: words.map(str::to_string).collect(),
        })
    }

    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// True when the command is `name` under any of `aliases`.
    pub fn is_any(&self, aliases: &[&str]) -> bool {
        aliases.iter().any(|a| self.name == *a)
    }
}
