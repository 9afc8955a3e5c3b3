use serde::{Deserialize, Serialize};

use crate::identity::Principal;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub console: ConsoleConfig,
    /// Roster the console front-end resolves player names against.
    #[serde(default)]
    pub principals: Vec<Principal>,
}

/// Dispatch and preview tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Upper bound on a single type transform. Unbounded when absent.
    #[serde(default)]
    pub transform_timeout_ms: Option<u64>,
    /// Max completions returned by a live preview (default: 20).
    #[serde(default = "default_live_suggestion_limit")]
    pub live_suggestion_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it (default: "info").
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

/// Console front-end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Display name of the principal commands run as when `--as` is not given.
    #[serde(default)]
    pub executor: Option<String>,
    /// Prompt shown before each line (default: "> ").
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Display names allowed to run moderation commands.
    #[serde(default)]
    pub admins: Vec<String>,
}

fn default_live_suggestion_limit() -> usize {
    20
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            transform_timeout_ms: None,
            live_suggestion_limit: default_live_suggestion_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            executor: None,
            prompt: default_prompt(),
            admins: Vec::new(),
        }
    }
}
