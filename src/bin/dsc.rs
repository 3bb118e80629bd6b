//! DSC engine CLI
//!
//! Inspect engine configuration and replay scenarios against an in-memory
//! engine.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::{style, Term};

use dsc::cli::{OutputFormat, OutputFormatter, Scenario, Simulation};
use dsc::core::config::EngineConfig;

/// DSC engine CLI - overcollateralized stablecoin engine tools
#[derive(Parser)]
#[command(name = "dsc")]
#[command(version = dsc::VERSION)]
#[command(about = "Command-line tools for the DSC engine", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format (text, json, json-pretty)
    #[arg(short, long, env = "DSC_OUTPUT", default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Engine configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Run a scenario file against an in-memory engine
    Simulate {
        /// Scenario JSON file
        scenario: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (defaults, file, then DSC_* overrides)
    Show {
        /// Configuration JSON file
        #[arg(short, long, env = "DSC_CONFIG")]
        file: Option<PathBuf>,
    },

    /// Check a configuration file
    Validate {
        /// Configuration JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let term = Term::stdout();

    if let Err(e) = run_command(&cli, &term) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run_command(cli: &Cli, term: &Term) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Config(cmd) => cmd_config(cli, cmd, term),
        Commands::Simulate { scenario, json } => cmd_simulate(cli, scenario, *json, term),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMAND HANDLERS
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_config(cli: &Cli, cmd: &ConfigCommands, term: &Term) -> anyhow::Result<()> {
    let output = OutputFormatter::new(cli.output);

    match cmd {
        ConfigCommands::Show { file } => {
            let mut config = match file {
                Some(path) => EngineConfig::load(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => EngineConfig::default(),
            };
            config
                .apply_overrides(|key| std::env::var(key).ok())
                .context("applying DSC_* overrides")?;
            output.config(&config)?;
        }
        ConfigCommands::Validate { file } => {
            EngineConfig::load(file).with_context(|| format!("validating {}", file.display()))?;
            let _ = term.write_line(&format!(
                "{} {} is valid",
                style("✓").green(),
                style(file.display()).yellow()
            ));
        }
    }

    Ok(())
}

fn cmd_simulate(cli: &Cli, path: &Path, json: bool, term: &Term) -> anyhow::Result<()> {
    let format = if json { OutputFormat::JsonPretty } else { cli.output };
    let output = OutputFormatter::new(format);

    let scenario = Scenario::load(path).with_context(|| format!("loading {}", path.display()))?;
    if format == OutputFormat::Text {
        let _ = term.write_line(&format!(
            "{} Running {} step(s) from {}",
            style("→").cyan(),
            scenario.steps.len(),
            style(path.display()).yellow()
        ));
    }

    let simulation = Simulation::new(&scenario).context("setting up simulation")?;
    let report = simulation.run(&scenario.steps).context("running scenario")?;
    output.report(&report)?;

    Ok(())
}
