#![forbid(unsafe_code)]

//! `otopi-mdp`: drive an otopi installer through its machine dialog.
//!
//! - `run` spawns the installer and answers its queries from a TOML file.
//! - `decode` reads a recorded dialog and prints one JSON object per event.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use otopi_mdp::session::run_session;
use otopi_mdp::spawner::spawn_installer;
use otopi_mdp::decode::write_events;
use otopi_mdp::{AppError, DriverConfig, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "otopi-mdp", about = "otopi machine dialog driver", version, long_about = None)]
struct Cli {
    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Spawn the installer and answer its queries from a config file.
    Run {
        /// Path to the TOML configuration file.
        #[arg(long)]
        config: PathBuf,
    },
    /// Print the events of a recorded dialog as NDJSON.
    Decode {
        /// Recorded dialog; stdin when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    match args.command {
        Command::Run { config } => run(&config),
        Command::Decode { input } => match input {
            Some(path) => {
                let file = File::open(&path).map_err(|err| {
                    AppError::Io(format!("cannot open {}: {err}", path.display()))
                })?;
                decode(BufReader::new(file))
            }
            None => decode(io::stdin().lock()),
        },
    }
}

fn run(config_path: &Path) -> Result<()> {
    let config = DriverConfig::load_from_path(config_path)?;
    info!("configuration loaded");

    let mut installer = spawn_installer(&config.installer)?;
    let outcome = match run_session(&mut installer.dialog, &config) {
        Ok(outcome) => outcome,
        Err(err) => {
            error!(%err, "dialog failed, stopping installer");
            let code = installer.kill()?;
            info!(exit_code = ?code, "installer stopped");
            return Err(err);
        }
    };
    info!(
        answered = outcome.answered.len(),
        aborted = outcome.aborted.len(),
        displayed = outcome.displayed.len(),
        "dialog finished"
    );

    match installer.wait()? {
        Some(0) => Ok(()),
        Some(code) => Err(AppError::Spawn(format!("installer exited with code {code}"))),
        None => Err(AppError::Spawn("installer terminated by signal".into())),
    }
}

fn decode<R: BufRead>(input: R) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = write_events(input, &mut out)?;
    out.flush()?;
    info!(events = written, "dialog decoded");
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter).with_writer(io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
