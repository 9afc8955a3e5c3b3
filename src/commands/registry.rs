//! Command registry and group resolver.

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::definition::CommandDefinition;
use crate::commands::group::GroupDefinition;
use crate::commands::path::CommandPath;
use crate::error::RegistrationError;

/// (root, name), both lowercase. Root groups have no root.
type GroupKey = (Option<String>, String);

/// A command matched against leading input tokens.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub command: Arc<CommandDefinition>,
    /// Tokens consumed by group names and the command name.
    pub consumed: usize,
}

/// Registered groups and commands.
///
/// Register groups before the commands that live in them.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    groups: HashMap<GroupKey, GroupDefinition>,
    commands: HashMap<CommandPath, Arc<CommandDefinition>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a group.
    ///
    /// # Errors
    /// Fails if the name is taken within its scope, if the root is unknown,
    /// if the root is itself a child group, or if a command in the same scope
    /// already uses the name.
    pub fn register_group(&mut self, def: GroupDefinition) -> Result<(), RegistrationError> {
        let root_key = def.root.as_ref().map(|r| r.to_lowercase());

        if let (Some(root), Some(root_display)) = (&root_key, &def.root) {
            if !self.groups.contains_key(&(None, root.clone())) {
                let nested = self.groups.keys().any(|(parent, name)| parent.is_some() && name == root);
                if nested {
                    return Err(RegistrationError::GroupNestingTooDeep {
                        name: def.name.clone(),
                        root: root_display.clone(),
                    });
                }
                return Err(RegistrationError::UnknownGroup {
                    name: def.name.clone(),
                    root: root_display.clone(),
                });
            }
        }

        let key = (root_key, def.name.to_lowercase());
        if self.groups.contains_key(&key) {
            return Err(RegistrationError::DuplicateGroup {
                name: def.name.clone(),
                root: def.root.clone(),
            });
        }

        let scope: Vec<&str> = key.0.iter().map(String::as_str).collect();
        let hidden = CommandPath::new(&scope, &key.1);
        if self.commands.contains_key(&hidden) {
            return Err(RegistrationError::ShadowedByGroup {
                path: hidden.to_string(),
                group: def.name.clone(),
            });
        }

        tracing::debug!(group = %def.name, root = ?def.root, "Registered group");
        self.groups.insert(key, def);
        Ok(())
    }

    /// Register a command. The (group path, name) pair must be unique.
    pub fn register_command(&mut self, def: CommandDefinition) -> Result<(), RegistrationError> {
        let group_path = def.group_path();
        if group_path.len() > 2 {
            return Err(RegistrationError::GroupPathTooLong {
                name: def.name().to_string(),
                len: group_path.len(),
            });
        }
        if !self.is_group_path(group_path) {
            return Err(RegistrationError::UnknownGroupPath {
                name: def.name().to_string(),
                path: group_path.join(" "),
            });
        }

        let mut seen_optional = false;
        for arg in def.arguments() {
            if arg.optional {
                seen_optional = true;
            } else if seen_optional {
                return Err(RegistrationError::OptionalBeforeRequired {
                    command: def.name().to_string(),
                    argument: arg.name.clone(),
                });
            }
        }

        let path = def.path();
        if let Some(group) = self.shadowing_group(&path) {
            return Err(RegistrationError::ShadowedByGroup {
                path: path.to_string(),
                group: group.name.clone(),
            });
        }
        if self.commands.contains_key(&path) {
            return Err(RegistrationError::DuplicateCommand {
                path: path.to_string(),
            });
        }

        tracing::debug!(command = %path, arguments = def.arguments().len(), "Registered command");
        self.commands.insert(path, Arc::new(def));
        Ok(())
    }

    /// Greedily consume leading group names.
    ///
    /// Returns the matched scope: empty, `[root]` or `[root, child]`.
    pub fn match_scope<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<String> {
        let mut scope = Vec::new();
        let Some(first) = tokens.first().map(|t| t.as_ref().to_lowercase()) else {
            return scope;
        };
        if !self.groups.contains_key(&(None, first.clone())) {
            return scope;
        }
        scope.push(first.clone());

        if let Some(second) = tokens.get(1).map(|t| t.as_ref().to_lowercase()) {
            if self.groups.contains_key(&(Some(first), second.clone())) {
                scope.push(second);
            }
        }
        scope
    }

    /// Resolve leading tokens to a command.
    ///
    /// Once a group token is consumed the command must exist in that group's
    /// scope; there is no fallback to an outer scope.
    pub fn resolve<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Resolution> {
        let scope = self.match_scope(tokens);
        let name = tokens.get(scope.len())?;
        let path = CommandPath::new(&scope, name.as_ref());
        self.commands.get(&path).map(|command| Resolution {
            command: Arc::clone(command),
            consumed: scope.len() + 1,
        })
    }

    pub fn get(&self, path: &CommandPath) -> Option<&Arc<CommandDefinition>> {
        self.commands.get(path)
    }

    /// All commands, sorted by path.
    pub fn commands(&self) -> Vec<&Arc<CommandDefinition>> {
        let mut commands: Vec<(&CommandPath, &Arc<CommandDefinition>)> = self.commands.iter().collect();
        commands.sort_by(|a, b| a.0.cmp(b.0));
        commands.into_iter().map(|(_, c)| c).collect()
    }

    /// Commands registered directly in `scope`, sorted by name.
    pub fn commands_in<S: AsRef<str>>(&self, scope: &[S]) -> Vec<&Arc<CommandDefinition>> {
        let scope: Vec<String> = scope.iter().map(|s| s.as_ref().to_lowercase()).collect();
        let mut commands: Vec<&Arc<CommandDefinition>> = self
            .commands
            .iter()
            .filter(|(path, _)| path.groups() == scope.as_slice())
            .map(|(_, c)| c)
            .collect();
        commands.sort_by_key(|c| c.name().to_lowercase());
        commands
    }

    /// Groups nested directly in `scope`: root groups for an empty scope,
    /// children for a root group, nothing deeper.
    pub fn groups_in<S: AsRef<str>>(&self, scope: &[S]) -> Vec<&GroupDefinition> {
        let parent = match scope {
            [] => None,
            [root] => Some(root.as_ref().to_lowercase()),
            _ => return Vec::new(),
        };
        let mut groups: Vec<&GroupDefinition> = self
            .groups
            .iter()
            .filter(|((root, _), _)| *root == parent)
            .map(|(_, g)| g)
            .collect();
        groups.sort_by_key(|g| g.name.to_lowercase());
        groups
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// A group in the command's own scope that `match_scope` would consume
    /// in place of the command name.
    fn shadowing_group(&self, path: &CommandPath) -> Option<&GroupDefinition> {
        let root = match path.groups() {
            [] => None,
            [root] => Some(root.clone()),
            _ => return None,
        };
        self.groups.get(&(root, path.name().to_string()))
    }

    fn is_group_path(&self, path: &[String]) -> bool {
        match path {
            [] => true,
            [root] => self.groups.contains_key(&(None, root.to_lowercase())),
            [root, child] => self
                .groups
                .contains_key(&(Some(root.to_lowercase()), child.to_lowercase())),
            _ => false,
        }
    }
}
