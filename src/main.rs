// src/main.rs
mod actuator;
mod cli;
mod config;
mod controller;
mod data;
mod geometry;
mod gesture;
mod landmarks;
mod mapper;
mod provider;
mod session;
mod status;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use actuator::{DryRunActuator, EnigoActuator, InputActuator, FALLBACK_SCREEN_SIZE};
use cli::{ActuatorKind, Cli, SourceKind};
use config::ControlConfig;
use provider::{
    CommandProvider, HandLandmarkProvider, JsonLinesProvider, SimulatedProvider,
};
use session::{Session, SessionSummary};

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries the dry-run journal
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match std::panic::catch_unwind(AssertUnwindSafe(|| run(&cli))) {
        Ok(Ok(summary)) => {
            if let Some(path) = summary.recording {
                info!("Recording saved to {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("Session aborted unexpectedly");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<SessionSummary> {
    let config = load_config(cli)?;
    let provider = open_provider(cli, &config)?;
    let actuator = open_actuator(cli, &config)?;

    let mut session = Session::new(provider, actuator, &config)
        .with_preview(!cli.no_preview)
        .with_max_frames(cli.max_frames);

    if cli.record {
        let output_dir = cli.output_dir.clone().unwrap_or_else(data::default_output_dir);
        session = session.with_recorder(data::SessionRecorder::new(output_dir, None)?);
    }
    if cli.source != SourceKind::Stdin {
        session = session.with_controls(session::spawn_stdin_controls()?);
        info!("Type q + Enter to quit, r + Enter to reset");
    }

    session.run()
}

fn load_config(cli: &Cli) -> Result<ControlConfig> {
    let mut config = match &cli.config {
        Some(path) => ControlConfig::load(path)?,
        None => ControlConfig::default(),
    };

    if let Some(mode) = cli.mode {
        config.mode = mode;
    }
    if cli.no_flip {
        config.mirror = false;
    }
    if let Some(screen) = cli.screen {
        config.screen = Some(screen);
    }
    config.validate()?;
    Ok(config)
}

fn open_provider(cli: &Cli, config: &ControlConfig) -> Result<Box<dyn HandLandmarkProvider>> {
    let provider: Box<dyn HandLandmarkProvider> = match cli.source {
        SourceKind::Command => Box::new(
            CommandProvider::spawn(&cli.provider_cmd, cli.camera, config.mirror)
                .context("starting landmark provider")?,
        ),
        SourceKind::Stdin => Box::new(JsonLinesProvider::new(std::io::stdin().lock())),
        SourceKind::File => {
            let path = cli.input.as_ref().context("--input is required with --source file")?;
            let file = File::open(path)
                .with_context(|| format!("opening landmark file {}", path.display()))?;
            Box::new(JsonLinesProvider::new(BufReader::new(file)))
        }
        SourceKind::Sim => Box::new(SimulatedProvider::new(cli.fps, cli.max_frames.is_none())),
    };
    Ok(provider)
}

fn open_actuator(cli: &Cli, config: &ControlConfig) -> Result<Box<dyn InputActuator>> {
    let actuator: Box<dyn InputActuator> = match cli.actuator {
        ActuatorKind::System => Box::new(EnigoActuator::new().context("opening input backend")?),
        ActuatorKind::DryRun => {
            let screen = config
                .screen
                .map(|s| (s.width, s.height))
                .unwrap_or(FALLBACK_SCREEN_SIZE);
            Box::new(DryRunActuator::new(std::io::stdout(), screen))
        }
    };
    Ok(actuator)
}
