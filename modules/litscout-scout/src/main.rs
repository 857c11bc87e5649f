use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use litscout_common::{file_config::load_config, Config};
use litscout_scout::ScoutRun;

#[derive(Parser)]
#[command(name = "litscout", about = "Keyword-driven research publication monitor")]
struct Cli {
    /// TOML file with the keyword taxonomy and tuning knobs.
    #[arg(long, default_value = "litscout.toml")]
    config: PathBuf,

    /// Where seen.json / archive.json live (overrides LITSCOUT_STATE_DIR).
    #[arg(long)]
    state_dir: Option<PathBuf>,

    /// Run the full pipeline but print the digest instead of sending it.
    #[arg(long)]
    dry_run: bool,

    /// Write the archive dashboard HTML to this path after the run.
    #[arg(long)]
    dashboard_out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("litscout=info".parse()?))
        .init();

    info!("LitScout starting...");

    let cli = Cli::parse();

    let mut env = Config::from_env();
    if let Some(dir) = cli.state_dir {
        env.state_dir = dir;
    }
    env.log_redacted();

    let file = load_config(&cli.config)?;

    ScoutRun {
        env,
        file,
        dry_run: cli.dry_run,
        dashboard_out: cli.dashboard_out,
    }
    .execute()
    .await?;

    Ok(())
}
