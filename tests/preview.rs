mod common;

use commander::config::DispatchConfig;
use commander::{
    ArgumentSpec, CommandDefinition, Commander, Completion, PreviewTarget, ResolveError,
    SuggestionMode, TypeDefinition, Value,
};
use common::{builder, roster, Recorder};

fn commander(limit: usize) -> (Commander, Recorder) {
    let recorder = Recorder::default();
    let mut b = builder(roster()).with_config(&DispatchConfig {
        transform_timeout_ms: None,
        live_suggestion_limit: limit,
    });
    b.register_type(
        TypeDefinition::new("item", |text| Ok(Value::from(text)))
            .with_suggestions(|| Ok(vec!["sword".to_string(), "shield".to_string()]))
            .expensive(),
    )
    .unwrap();
    b.register_command(
        CommandDefinition::builder("kick")
            .description("Disconnect a player")
            .argument(ArgumentSpec::new("player", "player"))
            .handler(recorder.clone()),
    )
    .unwrap();
    b.register_command(
        CommandDefinition::builder("give")
            .argument(ArgumentSpec::new("player", "player"))
            .argument(ArgumentSpec::new("item", "item"))
            .handler(recorder.clone()),
    )
    .unwrap();
    b.register_command(
        CommandDefinition::builder("view")
            .group(&["info", "user"])
            .argument(ArgumentSpec::new("player", "player"))
            .handler(recorder.clone()),
    )
    .unwrap();
    (b.build().unwrap(), recorder)
}

#[tokio::test]
async fn path_completion_walks_the_group_tree() {
    let (commander, _) = commander(20);

    let p = commander.preview("").await;
    assert_eq!(p.target, PreviewTarget::Path);
    assert_eq!(
        p.completions,
        vec![
            Completion::simple("give"),
            Completion::with_description("info", "Look things up"),
            Completion::with_description("kick", "Disconnect a player"),
        ]
    );

    let p = commander.preview("info u").await;
    assert_eq!(p.completions, vec![Completion::with_description("user", "Player details")]);

    let p = commander.preview("info user ").await;
    assert_eq!(p.completions, vec![Completion::simple("view")]);
}

#[tokio::test]
async fn argument_suggestions_come_from_the_type() {
    let (commander, _) = commander(20);

    let p = commander.preview("kick ").await;
    assert_eq!(
        p.target,
        PreviewTarget::Argument {
            name: "player".to_string(),
            type_name: "player".to_string()
        }
    );
    let values: Vec<&str> = p.completions.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["Alice", "Bob", "all"]);
    assert_eq!(p.validation, None);

    let p = commander.preview("kick A").await;
    let values: Vec<&str> = p.completions.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["Alice", "all"]);
    assert!(matches!(p.validation, Some(Err(ResolveError::Transform { .. }))));

    let p = commander.preview("info user view bob").await;
    assert_eq!(p.validation, Some(Ok(())));
}

#[tokio::test]
async fn live_preview_respects_limit_and_expensive_types() {
    let (commander, _) = commander(1);

    let p = commander.preview("kick ").await;
    assert_eq!(p.completions.len(), 1);

    let p = commander.preview("give Bob s").await;
    assert!(p.completions.is_empty());
    assert_eq!(p.validation, Some(Ok(())));

    // An explicit request still reaches the provider.
    assert_eq!(
        commander.list_suggestions("item", "s", SuggestionMode::Explicit),
        vec!["sword".to_string(), "shield".to_string()]
    );
}

#[tokio::test]
async fn preview_never_runs_handlers() {
    let (commander, recorder) = commander(20);

    for input in ["kick Alice", "kick Alice ", "info user view Alice", "give Bob sword"] {
        commander.preview(input).await;
    }
    assert_eq!(recorder.count(), 0);

    assert_eq!(
        commander.resolve("player", "alice").await,
        Ok(Value::Principal(common::alice()))
    );
}
