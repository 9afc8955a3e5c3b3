//! Type definitions.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::value::Value;

/// Predicate over raw argument text.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Lists candidate values for a type. May fail; failures never reach dispatch.
pub type SuggestionProvider = Arc<dyn Fn() -> anyhow::Result<Vec<String>> + Send + Sync>;

/// Converts validated text into a value.
///
/// Transforms run during argument binding and may await external work.
/// A slow transform only suspends the dispatch that is binding it.
#[async_trait]
pub trait Transform: Send + Sync {
    /// Transform the raw text. `Err` carries a user-facing message.
    async fn transform(&self, text: &str) -> Result<Value, String>;
}

struct FnTransform<F>(F);

#[async_trait]
impl<F> Transform for FnTransform<F>
where
    F: Fn(&str) -> Result<Value, String> + Send + Sync,
{
    async fn transform(&self, text: &str) -> Result<Value, String> {
        (self.0)(text)
    }
}

/// A named type. Immutable once registered.
#[derive(Clone)]
pub struct TypeDefinition {
    name: String,
    validate: Validator,
    transform: Arc<dyn Transform>,
    suggestions: Option<SuggestionProvider>,
    expensive: bool,
    greedy: bool,
}

impl TypeDefinition {
    /// Define a type with a synchronous transform and a validator that
    /// accepts everything.
    pub fn new<F>(name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::with_transform(name, FnTransform(transform))
    }

    /// Define a type backed by an async [`Transform`].
    pub fn with_transform<T>(name: impl Into<String>, transform: T) -> Self
    where
        T: Transform + 'static,
    {
        Self {
            name: name.into(),
            validate: Arc::new(|_| true),
            transform: Arc::new(transform),
            suggestions: None,
            expensive: false,
            greedy: false,
        }
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validate = Arc::new(validate);
        self
    }

    pub fn with_suggestions<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> anyhow::Result<Vec<String>> + Send + Sync + 'static,
    {
        self.suggestions = Some(Arc::new(provider));
        self
    }

    /// Mark the transform as costly: live previews skip it and its suggestions.
    pub fn expensive(mut self) -> Self {
        self.expensive = true;
        self
    }

    /// As the last argument of a command, absorb the rest of the input.
    pub fn greedy(mut self) -> Self {
        self.greedy = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_expensive(&self) -> bool {
        self.expensive
    }

    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    pub fn has_suggestions(&self) -> bool {
        self.suggestions.is_some()
    }

    pub(crate) fn validate(&self, text: &str) -> bool {
        (self.validate)(text)
    }

    pub(crate) fn transformer(&self) -> &dyn Transform {
        self.transform.as_ref()
    }

    pub(crate) fn suggestion_provider(&self) -> Option<&SuggestionProvider> {
        self.suggestions.as_ref()
    }
}

impl fmt::Debug for TypeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDefinition")
            .field("name", &self.name)
            .field("suggestions", &self.suggestions.is_some())
            .field("expensive", &self.expensive)
            .field("greedy", &self.greedy)
            .finish()
    }
}
