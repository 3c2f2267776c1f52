//! Command-line entry point for basis preparation.
//!
//! ```text
//! compsens init-config           # write a commented default config
//! compsens inspect               # shape and identifier of the basis
//! compsens generate -o out.ino   # render the Arduino sketch
//! ```
//!
//! Configuration is resolved from `--config`, then `./compsens.toml`, then
//! the user config directory, then built-in defaults; `COMPSENS_*`
//! environment variables override file values either way.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use compsens::config::{default_config_path, Settings};
use compsens::session::Session;

#[derive(Parser)]
#[command(
    name = "compsens",
    version,
    about = "Prepare a compressed-sensing measurement basis for an Arduino acquisition rig"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v: debug, -vv: trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a commented default configuration file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Load the basis and print its shape and identifier.
    Inspect {
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Render the Arduino sketch embedding the basis.
    Generate {
        /// Output path (defaults to `firmware.output` from the config).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the sketch to stdout instead of writing a file.
        #[arg(long)]
        stdout: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::InitConfig { force } => {
            let target = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from("compsens.toml"));
            Settings::write_default(&target, force)
                .with_context(|| format!("writing configuration to {}", target.display()))?;
            println!("Wrote default configuration to {}", target.display());
            Ok(())
        }
        Command::Inspect { json } => {
            let session = load_session(&cli)?;
            let summary = session.summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "Loaded a measurement basis with {} rows and {} columns from {}",
                    summary.rows,
                    summary.cols,
                    summary.path.display()
                );
                println!("Basis id: {}", summary.basis_id);
            }
            Ok(())
        }
        Command::Generate { ref output, stdout } => {
            let session = load_session(&cli)?;
            if stdout {
                print!("{}", session.render_firmware()?);
            } else {
                let written = session
                    .export_firmware(output.as_deref())
                    .context("exporting firmware sketch")?;
                println!("Wrote firmware sketch to {}", written.display());
            }
            Ok(())
        }
    }
}

fn load_session(cli: &Cli) -> Result<Session> {
    let config_path = resolve_config_path(cli);
    let settings = Settings::new(config_path.as_deref()).context("loading configuration")?;
    Ok(Session::load(settings)?)
}

/// `--config` wins; otherwise `./compsens.toml`, then the user config
/// directory, and finally defaults (no file at all).
fn resolve_config_path(cli: &Cli) -> Option<PathBuf> {
    if cli.config.is_some() {
        return cli.config.clone();
    }
    let local = PathBuf::from("compsens.toml");
    if local.is_file() {
        return Some(local);
    }
    default_config_path().filter(|path| path.is_file())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
