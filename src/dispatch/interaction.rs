//! Per-dispatch context and bound arguments.

use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use crate::commands::CommandPath;
use crate::identity::Principal;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Info,
    Error,
}

/// A message addressed to the executor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub kind: ReplyKind,
    pub text: String,
}

/// Context for a single command invocation.
///
/// Created once the command is resolved and discarded when the dispatch
/// finishes. Never shared between dispatches.
#[derive(Debug)]
pub struct Interaction {
    id: Uuid,
    executor: Principal,
    raw_input: String,
    command: CommandPath,
    replies: Mutex<Vec<Reply>>,
}

impl Interaction {
    pub fn new(
        id: Uuid,
        executor: Principal,
        raw_input: impl Into<String>,
        command: CommandPath,
    ) -> Self {
        Self {
            id,
            executor,
            raw_input: raw_input.into(),
            command,
            replies: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Who ran the command.
    pub fn executor(&self) -> &Principal {
        &self.executor
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn command(&self) -> &CommandPath {
        &self.command
    }

    pub fn reply(&self, text: impl Into<String>) {
        self.push(ReplyKind::Info, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.push(ReplyKind::Error, text.into());
    }

    /// Snapshot of replies so far.
    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().clone()
    }

    pub(crate) fn into_replies(self) -> Vec<Reply> {
        self.replies.into_inner()
    }

    fn push(&self, kind: ReplyKind, text: String) {
        tracing::trace!(interaction = %self.id, kind = ?kind, text = %text, "Reply");
        self.replies.lock().push(Reply { kind, text });
    }
}

/// An argument after binding. `value` is `None` for an absent optional argument.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArgument {
    pub name: String,
    pub value: Option<Value>,
}

/// Bound arguments, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    bound: Vec<BoundArgument>,
}

impl Arguments {
    pub fn new(bound: Vec<BoundArgument>) -> Self {
        Self { bound }
    }

    /// Value of the named argument (case-insensitive), if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bound
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .and_then(|b| b.value.as_ref())
    }

    /// Value at declaration position `index`, if present.
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.bound.get(index).and_then(|b| b.value.as_ref())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundArgument> {
        self.bound.iter()
    }

    pub fn len(&self) -> usize {
        self.bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replies_accumulate_in_order() {
        let ix = Interaction::new(
            Uuid::new_v4(),
            Principal::new(1, "Alice"),
            "say hi",
            CommandPath::new::<&str>(&[], "say"),
        );
        ix.reply("one");
        ix.error("two");
        assert_eq!(ix.replies().len(), 2);
        let replies = ix.into_replies();
        assert_eq!(replies[1], Reply { kind: ReplyKind::Error, text: "two".to_string() });
    }

    #[test]
    fn arguments_lookup_by_name_and_position() {
        let args = Arguments::new(vec![
            BoundArgument { name: "Target".to_string(), value: Some(Value::from("Bob")) },
            BoundArgument { name: "reason".to_string(), value: None },
        ]);
        assert_eq!(args.text("target"), Some("Bob"));
        assert_eq!(args.value(0), Some(&Value::from("Bob")));
        assert!(args.get("reason").is_none());
        assert!(args.get("missing").is_none());
        assert_eq!(args.len(), 2);
    }
}
