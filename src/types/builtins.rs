//! Built-in argument types.
//!
//! | name      | accepts                                   | value                 |
//! |-----------|-------------------------------------------|-----------------------|
//! | `string`  | one non-empty token                       | `Text`                |
//! | `text`    | the rest of the input (greedy)            | `Text`                |
//! | `number`  | any finite float                          | `Number`              |
//! | `integer` | a signed 64-bit integer                   | `Integer`             |
//! | `boolean` | true/false, yes/no, on/off, 1/0           | `Boolean`             |
//! | `player`  | a display name, or `all`                  | `Principal` / `List`  |
//! | `players` | comma-separated names and/or `all`        | `List`                |

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::RegistrationError;
use crate::identity::{Principal, PrincipalProvider};
use crate::types::{TypeDefinition, TypeRegistry};
use crate::value::Value;

/// Keyword resolving to every known principal.
pub const ALL_KEYWORD: &str = "all";

const TRUTHY: &[&str] = &["true", "yes", "on", "1"];
const FALSY: &[&str] = &["false", "no", "off", "0"];

/// Register every built-in type.
pub fn register_builtin_types(
    registry: &mut TypeRegistry,
    principals: Arc<dyn PrincipalProvider>,
) -> Result<(), RegistrationError> {
    registry.register_types(scalar_types())?;
    registry.register_types(principal_types(principals))
}

/// Types with no external collaborators.
pub fn scalar_types() -> Vec<TypeDefinition> {
    vec![
        TypeDefinition::new("string", |text| Ok(Value::from(text)))
            .with_validator(|text| !text.is_empty()),
        TypeDefinition::new("text", |text| Ok(Value::from(text)))
            .with_validator(|text| !text.trim().is_empty())
            .greedy(),
        TypeDefinition::new("number", |text| {
            text.parse::<f64>()
                .map(Value::Number)
                .map_err(|e| format!("'{}' is not a number: {}", text, e))
        })
        .with_validator(|text| text.parse::<f64>().is_ok_and(f64::is_finite)),
        TypeDefinition::new("integer", |text| {
            text.parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| format!("'{}' is not an integer: {}", text, e))
        })
        .with_validator(|text| {
            let digits = text.strip_prefix('-').unwrap_or(text);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        }),
        TypeDefinition::new("boolean", |text| {
            parse_bool(text)
                .map(Value::Boolean)
                .ok_or_else(|| format!("'{}' is not a boolean", text))
        })
        .with_validator(|text| parse_bool(text).is_some())
        .with_suggestions(|| Ok(vec!["true".to_string(), "false".to_string()])),
    ]
}

/// `player` and `players`, backed by `principals`.
pub fn principal_types(principals: Arc<dyn PrincipalProvider>) -> Vec<TypeDefinition> {
    let single = principals.clone();
    let many = principals.clone();
    let names_single = principals.clone();
    let names_many = principals;

    vec![
        TypeDefinition::new("player", move |text| resolve_player(single.as_ref(), text))
            .with_validator(|text| !text.trim().is_empty())
            .with_suggestions(move || Ok(principal_suggestions(names_single.as_ref()))),
        TypeDefinition::new("players", move |text| resolve_players(many.as_ref(), text))
            .with_validator(|text| text.split(',').any(|part| !part.trim().is_empty()))
            .with_suggestions(move || Ok(principal_suggestions(names_many.as_ref()))),
    ]
}

fn parse_bool(text: &str) -> Option<bool> {
    let lower = text.to_lowercase();
    if TRUTHY.contains(&lower.as_str()) {
        Some(true)
    } else if FALSY.contains(&lower.as_str()) {
        Some(false)
    } else {
        None
    }
}

fn resolve_player(provider: &dyn PrincipalProvider, text: &str) -> Result<Value, String> {
    let name = text.trim();
    if name.eq_ignore_ascii_case(ALL_KEYWORD) {
        let everyone = provider.list_principals();
        if everyone.is_empty() {
            return Err("No players are connected".to_string());
        }
        return Ok(Value::List(everyone.into_iter().map(Value::Principal).collect()));
    }
    provider
        .find_by_name(name)
        .map(Value::Principal)
        .ok_or_else(|| format!("No player named '{}'", name))
}

fn resolve_players(provider: &dyn PrincipalProvider, text: &str) -> Result<Value, String> {
    let mut seen = HashSet::new();
    let mut resolved: Vec<Principal> = Vec::new();

    for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        for principal in resolve_player(provider, part)?.principals() {
            if seen.insert(principal.id) {
                resolved.push(principal.clone());
            }
        }
    }

    Ok(Value::List(resolved.into_iter().map(Value::Principal).collect()))
}

fn principal_suggestions(provider: &dyn PrincipalProvider) -> Vec<String> {
    let mut names: Vec<String> = provider
        .list_principals()
        .into_iter()
        .map(|p| p.display_name)
        .collect();
    names.push(ALL_KEYWORD.to_string());
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticPrincipals;
    use crate::types::{ResolveError, SuggestionMode};

    fn registry() -> TypeRegistry {
        let roster = Arc::new(StaticPrincipals::new(vec![
            Principal::new(1, "Alice"),
            Principal::new(2, "Bob"),
        ]));
        let mut registry = TypeRegistry::new();
        register_builtin_types(&mut registry, roster).unwrap();
        registry
    }

    #[tokio::test]
    async fn scalars_parse() {
        let registry = registry();
        assert_eq!(registry.resolve("number", "2.5").await, Ok(Value::Number(2.5)));
        assert_eq!(registry.resolve("integer", "-3").await, Ok(Value::Integer(-3)));
        assert_eq!(registry.resolve("boolean", "Yes").await, Ok(Value::Boolean(true)));
        assert_eq!(registry.resolve("boolean", "off").await, Ok(Value::Boolean(false)));
        assert!(matches!(
            registry.resolve("number", "NaN").await,
            Err(ResolveError::Validation { .. })
        ));
        assert!(matches!(
            registry.resolve("integer", "-").await,
            Err(ResolveError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn player_resolves_by_name_or_all() {
        let registry = registry();
        assert_eq!(
            registry.resolve("player", "aLiCe").await,
            Ok(Value::Principal(Principal::new(1, "Alice")))
        );

        let all = registry.resolve("player", "All").await.unwrap();
        let names: Vec<String> = all
            .principals()
            .into_iter()
            .map(|p| p.display_name.clone())
            .collect();
        assert_eq!(names, vec!["Alice", "Bob"]);

        let err = registry.resolve("player", "Carol").await.unwrap_err();
        assert_eq!(err.to_string(), "No player named 'Carol'");
    }

    #[tokio::test]
    async fn players_deduplicates() {
        let registry = registry();
        let value = registry.resolve("players", "bob,all,Bob").await.unwrap();
        let ids: Vec<u64> = value.principals().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn all_with_empty_roster_fails() {
        let mut registry = TypeRegistry::new();
        register_builtin_types(&mut registry, Arc::new(StaticPrincipals::default())).unwrap();
        assert!(matches!(
            registry.resolve("player", "all").await,
            Err(ResolveError::Transform { .. })
        ));
    }

    #[test]
    fn player_suggestions_include_all_keyword() {
        let registry = registry();
        assert_eq!(
            registry.list_suggestions("player", "a", SuggestionMode::Live),
            vec!["Alice".to_string(), "all".to_string()]
        );
        assert!(registry.get("players").is_some_and(TypeDefinition::has_suggestions));
        assert!(registry.get("number").is_some_and(|t| !t.has_suggestions()));
    }
}
