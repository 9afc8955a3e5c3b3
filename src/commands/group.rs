/// A namespace for commands.
///
/// A group without a root is a root group. A group with a root nests one
/// level below it; the root must itself be a root group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupDefinition {
    pub name: String,
    pub description: String,
    pub root: Option<String>,
}

impl GroupDefinition {
    pub fn root(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            root: None,
        }
    }

    pub fn child(
        root: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            root: Some(root.into()),
        }
    }

    pub fn is_root(&self) -> bool {
        self.root.is_none()
    }
}
