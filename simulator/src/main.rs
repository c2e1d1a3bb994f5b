use anyhow::Context;
use arcade_execution::CancelHandle;
use arcade_simulator::{simulate, Config, Game};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    players: Option<u32>,

    #[arg(short, long)]
    rounds: Option<u32>,

    /// Hex seed (32 bytes).
    #[arg(short, long)]
    seed: Option<String>,

    #[arg(long)]
    log_level: Option<String>,

    /// Games to simulate (repeatable).
    #[arg(short, long, value_enum)]
    game: Vec<Game>,

    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_yaml::from_str::<Config>(&raw).context("failed to parse config")?
        }
        None => Config::default(),
    };
    if let Some(players) = args.players {
        config.players = players;
    }
    if let Some(rounds) = args.rounds {
        config.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if !args.game.is_empty() {
        config.games = args.game;
    }
    let config = config.validate().context("invalid configuration")?;

    // Create logger
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    // Stop every session on Ctrl-C
    let cancel = CancelHandle::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, finishing current rounds");
                cancel.cancel();
            }
        }
    });

    info!(
        players = config.players,
        rounds = config.rounds,
        games = config.games.len(),
        "starting simulation"
    );
    let report = tokio::task::spawn_blocking(move || simulate(&config, &cancel))
        .await
        .context("simulation task failed")?
        .context("simulation rejected")?;

    let output = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("failed to serialize report")?;
    println!("{output}");
    Ok(())
}
