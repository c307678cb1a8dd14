use std::error::Error;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;
use twb_exp::{EvalConfig, ExperimentDriver};

#[derive(Parser, Debug)]
#[command(name = "twb", about = "t-wise sampling evaluation workbench")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run every configured algorithm over the experiment grid.
    Sample(PhaseArgs),
    /// Compute validity and coverage over previously persisted artifacts.
    Coverage(PhaseArgs),
    /// Run the sampling phase followed by the metrics phase.
    Run(PhaseArgs),
}

#[derive(ClapArgs, Debug)]
struct PhaseArgs {
    /// YAML configuration describing the experiment grid.
    #[arg(long)]
    config: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sample(args) => {
            let mut driver = load_driver(&args)?;
            driver.run_sampling_phase()?;
        }
        Command::Coverage(args) => {
            let driver = load_driver(&args)?;
            driver.run_coverage_phase()?;
        }
        Command::Run(args) => {
            let mut driver = load_driver(&args)?;
            driver.run_sampling_phase()?;
            driver.run_coverage_phase()?;
        }
    }
    Ok(())
}

fn load_driver(args: &PhaseArgs) -> Result<ExperimentDriver, Box<dyn Error>> {
    let config = EvalConfig::load(&args.config)?;
    info!(config = %args.config.display(), "configuration loaded");
    Ok(ExperimentDriver::new(config)?)
}
