use std::sync::{Arc, OnceLock};

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::commander::Commander;
use crate::config::Config;
use crate::console::commands::SampleCommands;
use crate::dispatch::{DispatchReport, ReplyKind};
use crate::identity::{Principal, PrincipalProvider, StaticPrincipals};
use crate::preview::{Preview, PreviewTarget};

/// Roster used when the config lists no principals.
fn demo_roster() -> Vec<Principal> {
    vec![
        Principal::new(1, "Alice"),
        Principal::new(2, "Bob"),
        Principal::new(3, "Carol"),
    ]
}

/// An interactive session: one executor, one commander.
pub struct Console {
    commander: Commander,
    roster: Arc<StaticPrincipals>,
    executor: Principal,
    prompt: String,
    json: bool,
}

impl Console {
    /// Build the sample command set from `config`.
    ///
    /// `executor` overrides `console.executor`; with neither, the first
    /// principal in the roster runs the commands.
    pub fn new(config: &Config, executor: Option<&str>, json: bool) -> anyhow::Result<Self> {
        let (principals, admins) = if config.principals.is_empty() {
            let admins = if config.console.admins.is_empty() {
                vec!["Alice".to_string()]
            } else {
                config.console.admins.clone()
            };
            (demo_roster(), admins)
        } else {
            (config.principals.clone(), config.console.admins.clone())
        };
        let roster = Arc::new(StaticPrincipals::new(principals));

        let executor = match executor.or(config.console.executor.as_deref()) {
            Some(name) => match roster.find_by_name(name) {
                Some(p) => p,
                None => bail!("No principal named '{}'", name),
            },
            None => roster
                .list_principals()
                .into_iter()
                .next()
                .context("The principal roster is empty")?,
        };

        let help = Arc::new(OnceLock::new());
        let provider: Arc<dyn PrincipalProvider> = roster.clone();
        let mut builder = Commander::builder()
            .with_config(&config.dispatch)
            .with_builtin_types(provider)?;
        builder.register_with(&SampleCommands::new(Arc::clone(&roster), admins, Arc::clone(&help)))?;
        let commander = builder.build()?;
        let _ = help.set(commander.help());

        tracing::info!(executor = %executor, players = roster.len(), "Console ready");

        Ok(Self {
            commander,
            roster,
            executor,
            prompt: config.console.prompt.clone(),
            json,
        })
    }

    pub fn commander(&self) -> &Commander {
        &self.commander
    }

    pub fn roster(&self) -> &StaticPrincipals {
        &self.roster
    }

    pub fn executor(&self) -> &Principal {
        &self.executor
    }

    /// Run one line and render the result.
    ///
    /// A line ending in `?` previews the text before it instead of running it.
    pub async fn execute(&self, line: &str) -> Vec<String> {
        if let Some(partial) = line.strip_suffix('?') {
            return render_preview(&self.commander.preview(partial).await);
        }

        let report = self.commander.run(line, &self.executor).await;
        if self.json {
            vec![report.to_json().to_string()]
        } else {
            render_report(&report)
        }
    }

    /// Read lines from stdin until EOF, writing output to stdout.
    pub async fn run_stdin(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            if !self.json {
                stdout.write_all(self.prompt.as_bytes()).await?;
                stdout.flush().await?;
            }
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            for out in self.execute(&line).await {
                stdout.write_all(out.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            stdout.flush().await?;
        }
        Ok(())
    }
}

fn render_report(report: &DispatchReport) -> Vec<String> {
    let mut out: Vec<String> = report
        .replies
        .iter()
        .map(|r| match r.kind {
            ReplyKind::Info => r.text.clone(),
            ReplyKind::Error => format!("! {}", r.text),
        })
        .collect();
    if let Some(message) = report.message() {
        out.push(format!("! {}", message));
    }
    out
}

fn render_preview(preview: &Preview) -> Vec<String> {
    let mut out = Vec::new();
    if let PreviewTarget::Argument { name, type_name } = &preview.target {
        out.push(format!("<{}: {}>", name, type_name));
    }
    for completion in &preview.completions {
        match &completion.description {
            Some(description) => out.push(format!("  {} - {}", completion.value, description)),
            None => out.push(format!("  {}", completion.value)),
        }
    }
    if let Some(Err(err)) = &preview.validation {
        out.push(format!("! {}", err));
    }
    out
}
