use std::fmt;

use serde::Serialize;

/// Fully-qualified command name: group segments followed by the command name.
///
/// Segments are stored lowercase, so paths compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CommandPath {
    groups: Vec<String>,
    name: String,
}

impl CommandPath {
    pub fn new<S: AsRef<str>>(groups: &[S], name: &str) -> Self {
        Self {
            groups: groups.iter().map(|g| g.as_ref().to_lowercase()).collect(),
            name: name.to_lowercase(),
        }
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            write!(f, "{} ", group)?;
        }
        f.write_str(&self.name)
    }
}
