//! Registered argument types.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use futures::FutureExt;

use crate::error::{panic_message, RegistrationError};
use crate::types::definition::TypeDefinition;
use crate::types::error::ResolveError;
use crate::value::Value;

/// Where a suggestion request comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionMode {
    /// Keystroke-driven preview. Expensive types are not consulted.
    Live,
    /// An explicit request (e.g., a completion key press).
    Explicit,
}

/// Registered types, keyed by lowercase name.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDefinition>,
    transform_timeout: Option<Duration>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type. Fails if the name is taken.
    pub fn register_type(&mut self, def: TypeDefinition) -> Result<(), RegistrationError> {
        let key = def.name().to_lowercase();
        if self.types.contains_key(&key) {
            return Err(RegistrationError::DuplicateType {
                name: def.name().to_string(),
            });
        }
        tracing::debug!(
            type_name = %def.name(),
            expensive = def.is_expensive(),
            greedy = def.is_greedy(),
            "Registered type"
        );
        self.types.insert(key, def);
        Ok(())
    }

    /// Register several types in order, stopping at the first failure.
    pub fn register_types(
        &mut self,
        defs: impl IntoIterator<Item = TypeDefinition>,
    ) -> Result<(), RegistrationError> {
        for def in defs {
            self.register_type(def)?;
        }
        Ok(())
    }

    /// Bound every transform by `timeout`. `None` lets transforms run to completion.
    pub fn set_transform_timeout(&mut self, timeout: Option<Duration>) {
        self.transform_timeout = timeout;
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(&name.to_lowercase())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_greedy(&self, name: &str) -> bool {
        self.get(name).is_some_and(TypeDefinition::is_greedy)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.values().map(TypeDefinition::name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Run only the validator. Never invokes the transform.
    pub fn validate(&self, type_name: &str, text: &str) -> Result<(), ResolveError> {
        let def = self.lookup(type_name)?;
        let valid = match catch_unwind(AssertUnwindSafe(|| def.validate(text))) {
            Ok(valid) => valid,
            Err(payload) => {
                tracing::warn!(
                    type_name = %def.name(),
                    error = %panic_message(payload.as_ref()),
                    "Validator panicked"
                );
                false
            }
        };
        if valid {
            Ok(())
        } else {
            Err(ResolveError::Validation {
                type_name: def.name().to_string(),
                text: text.to_string(),
            })
        }
    }

    /// Validate then transform `text` through the named type.
    ///
    /// A panicking validator counts as a rejection; a panicking transform
    /// becomes a [`ResolveError::Transform`].
    pub async fn resolve(&self, type_name: &str, text: &str) -> Result<Value, ResolveError> {
        self.validate(type_name, text)?;
        let def = self.lookup(type_name)?;

        let guarded = AssertUnwindSafe(def.transformer().transform(text)).catch_unwind();
        let finished = match self.transform_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, guarded).await {
                Ok(finished) => Some(finished),
                Err(_) => {
                    tracing::warn!(
                        type_name = %def.name(),
                        timeout_ms = timeout.as_millis() as u64,
                        "Transform timed out"
                    );
                    None
                }
            },
            None => Some(guarded.await),
        };

        let transformed = match finished {
            Some(Ok(result)) => result,
            Some(Err(payload)) => {
                let message = panic_message(payload.as_ref());
                tracing::warn!(type_name = %def.name(), error = %message, "Transform panicked");
                Err(message)
            }
            None => Err(format!("Timed out resolving '{}' as {}", text, def.name())),
        };

        transformed.map_err(|message| ResolveError::Transform {
            type_name: def.name().to_string(),
            message,
        })
    }

    /// Suggestions for `type_name` starting with `partial` (case-insensitive).
    ///
    /// Provider errors, panics and unknown types all yield an empty list.
    pub fn list_suggestions(
        &self,
        type_name: &str,
        partial: &str,
        mode: SuggestionMode,
    ) -> Vec<String> {
        let Some(def) = self.get(type_name) else {
            return Vec::new();
        };
        if mode == SuggestionMode::Live && def.is_expensive() {
            return Vec::new();
        }
        let Some(provider) = def.suggestion_provider() else {
            return Vec::new();
        };

        let candidates = match catch_unwind(AssertUnwindSafe(|| provider())) {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => {
                tracing::debug!(type_name = %def.name(), error = %e, "Suggestion provider failed");
                return Vec::new();
            }
            Err(_) => {
                tracing::debug!(type_name = %def.name(), "Suggestion provider panicked");
                return Vec::new();
            }
        };

        let partial = partial.to_lowercase();
        candidates
            .into_iter()
            .filter(|c| c.to_lowercase().starts_with(&partial))
            .collect()
    }

    fn lookup(&self, type_name: &str) -> Result<&TypeDefinition, ResolveError> {
        self.get(type_name).ok_or_else(|| ResolveError::UnknownType {
            type_name: type_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Transform;
    use async_trait::async_trait;

    fn integer_type() -> TypeDefinition {
        TypeDefinition::new("integer", |text| {
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("'{}' is out of range", text))
        })
        .with_validator(|text| !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()))
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut registry = TypeRegistry::new();
        registry.register_type(integer_type()).unwrap();

        let err = registry
            .register_type(TypeDefinition::new("INTEGER", |t| Ok(Value::from(t))))
            .unwrap_err();
        assert_eq!(
            err,
            RegistrationError::DuplicateType {
                name: "INTEGER".to_string()
            }
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_types_stops_at_first_duplicate() {
        let mut registry = TypeRegistry::new();
        let result = registry.register_types(vec![
            integer_type(),
            integer_type(),
            TypeDefinition::new("word", |t| Ok(Value::from(t))),
        ]);
        assert!(result.is_err());
        assert!(!registry.contains("word"));
    }

    #[tokio::test]
    async fn resolve_reports_each_failure_stage() {
        let mut registry = TypeRegistry::new();
        registry.register_type(integer_type()).unwrap();

        assert_eq!(registry.resolve("integer", "42").await, Ok(Value::Integer(42)));
        assert_eq!(
            registry.resolve("integer", "4x").await,
            Err(ResolveError::Validation {
                type_name: "integer".to_string(),
                text: "4x".to_string()
            })
        );
        assert!(matches!(
            registry.resolve("integer", "99999999999999999999").await,
            Err(ResolveError::Transform { .. })
        ));
        assert_eq!(
            registry.resolve("float", "1.0").await,
            Err(ResolveError::UnknownType {
                type_name: "float".to_string()
            })
        );
    }

    #[tokio::test]
    async fn resolve_is_deterministic() {
        let mut registry = TypeRegistry::new();
        registry.register_type(integer_type()).unwrap();

        for input in ["7", "x", ""] {
            let first = registry.resolve("integer", input).await;
            let second = registry.resolve("integer", input).await;
            assert_eq!(first, second);
        }
    }

    #[test]
    fn suggestions_filter_by_prefix_and_tolerate_failures() {
        let mut registry = TypeRegistry::new();
        registry
            .register_types(vec![
                TypeDefinition::new("color", |t| Ok(Value::from(t)))
                    .with_suggestions(|| Ok(vec!["Red".into(), "Green".into(), "Rose".into()])),
                TypeDefinition::new("broken", |t| Ok(Value::from(t)))
                    .with_suggestions(|| Err(anyhow::anyhow!("service unavailable"))),
                TypeDefinition::new("panicky", |t| Ok(Value::from(t)))
                    .with_suggestions(|| panic!("provider bug")),
            ])
            .unwrap();

        assert_eq!(
            registry.list_suggestions("color", "r", SuggestionMode::Explicit),
            vec!["Red".to_string(), "Rose".to_string()]
        );
        assert!(registry.list_suggestions("broken", "", SuggestionMode::Explicit).is_empty());
        assert!(registry.list_suggestions("panicky", "", SuggestionMode::Explicit).is_empty());
        assert!(registry.list_suggestions("missing", "", SuggestionMode::Explicit).is_empty());
    }

    #[test]
    fn live_suggestions_skip_expensive_types() {
        let mut registry = TypeRegistry::new();
        registry
            .register_type(
                TypeDefinition::new("asset", |t| Ok(Value::from(t)))
                    .with_suggestions(|| Ok(vec!["sword".into()]))
                    .expensive(),
            )
            .unwrap();

        assert!(registry.list_suggestions("asset", "", SuggestionMode::Live).is_empty());
        assert_eq!(
            registry.list_suggestions("asset", "", SuggestionMode::Explicit),
            vec!["sword".to_string()]
        );
    }

    #[tokio::test]
    async fn panics_in_validators_and_transforms_are_contained() {
        let mut registry = TypeRegistry::new();
        registry
            .register_types(vec![
                TypeDefinition::new("fragile", |_| panic!("transform bug")),
                TypeDefinition::new("picky", |t| Ok(Value::from(t)))
                    .with_validator(|_| panic!("validator bug")),
            ])
            .unwrap();

        assert_eq!(
            registry.resolve("fragile", "x").await,
            Err(ResolveError::Transform {
                type_name: "fragile".to_string(),
                message: "panicked: transform bug".to_string()
            })
        );
        assert!(matches!(
            registry.resolve("picky", "x").await,
            Err(ResolveError::Validation { .. })
        ));
        // Still usable afterwards.
        assert!(registry.resolve("fragile", "y").await.is_err());
    }

    struct Stalled;

    #[async_trait]
    impl Transform for Stalled {
        async fn transform(&self, _text: &str) -> Result<Value, String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Value::Boolean(true))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn transform_timeout_becomes_transform_error() {
        let mut registry = TypeRegistry::new();
        registry
            .register_type(TypeDefinition::with_transform("remote", Stalled))
            .unwrap();
        registry.set_transform_timeout(Some(Duration::from_millis(50)));

        let err = registry.resolve("remote", "id").await.unwrap_err();
        assert!(matches!(err, ResolveError::Transform { .. }));
        assert!(err.to_string().contains("Timed out"));
    }
}
