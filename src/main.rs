use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};

use cadence_compositor::{
    composition::BatchRun,
    config::Config,
    project::{Project, ProjectSnapshot},
};

#[derive(Parser)]
#[command(
    name = "cadence-compositor",
    version,
    about = "Plan stroke-rate variants of race footage compositions",
    long_about = "Cadence-Compositor reads a project snapshot exported by the timeline host, ranks every source by stroke rate and writes a plan describing one rescaled composition per source and template."
)]
struct Cli {
    /// Project snapshot exported by the host (JSON)
    #[arg(short, long)]
    project: PathBuf,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the plan here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Join every timeline of this template into one reel
    #[arg(short, long)]
    reel: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the plan can be piped
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Cadence-Compositor v{}", env!("CARGO_PKG_VERSION"));
    info!("Project: {:?}", cli.project);

    let mut config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    if let Some(template_id) = cli.reel {
        config.batch.reel_template = Some(template_id);
    }

    let snapshot = ProjectSnapshot::from_file(&cli.project)
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    let project = Project::ingest(&snapshot, &config.batch);

    let report = BatchRun::new(config, project)?.run()?;
    let plan = report.to_json()?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, plan)
                .with_context(|| format!("Failed to write plan to {:?}", path))?;
            info!("Plan saved to: {:?}", path);
        }
        None => println!("{}", plan),
    }

    if !report.failures.is_empty() {
        warn!("{} variants could not be built", report.failures.len());
    }
    Ok(())
}
