use std::path::PathBuf;

use clap::Parser;

use commander::config::Config;
use commander::console::Console;
use commander::logging::init_tracing;

/// Run commands against the sample command set.
#[derive(Parser, Debug)]
#[command(name = "commander", version, about)]
struct Cli {
    /// Config file (default: ~/.config/commander/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Display name of the principal to run commands as
    #[arg(long = "as")]
    executor: Option<String>,

    /// Print one JSON report per command
    #[arg(long)]
    json: bool,

    /// Run this command and exit instead of reading stdin
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging.filter);

    let console = Console::new(&config, cli.executor.as_deref(), cli.json)?;

    if cli.command.is_empty() {
        return console.run_stdin().await;
    }

    for line in console.execute(&cli.command.join(" ")).await {
        println!("{}", line);
    }
    Ok(())
}
