// src/cli.rs
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::{parse_screen_size, ControlMode, ScreenSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Spawn an external landmark detector
    Command,
    /// JSON frames on standard input
    Stdin,
    /// JSON frames from a file
    File,
    /// Built-in scripted hand
    Sim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActuatorKind {
    /// Drive the real mouse and keyboard
    System,
    /// Print commands to stdout as JSON lines
    DryRun,
}

#[derive(Parser, Debug)]
#[command(name = "hand_control", version, about = "Control the mouse and keyboard with hand gestures")]
pub struct Cli {
    #[arg(long, default_value_t = 0, help = "Camera index passed to the landmark detector")]
    pub camera: u32,

    #[arg(long, help = "Do not mirror the camera image horizontally")]
    pub no_flip: bool,

    #[arg(long, help = "Do not show the status overlay")]
    pub no_preview: bool,

    /// Overrides the mode from the config file
    #[arg(long, value_enum)]
    pub mode: Option<ControlMode>,

    #[arg(long, value_enum, default_value_t = SourceKind::Command)]
    pub source: SourceKind,

    #[arg(long, required_if_eq("source", "file"), help = "JSON-lines landmark file")]
    pub input: Option<PathBuf>,

    #[arg(long, default_value = "python3 hand_landmarks.py")]
    pub provider_cmd: String,

    #[arg(long, value_enum, default_value_t = ActuatorKind::System)]
    pub actuator: ActuatorKind,

    #[arg(long, value_parser = parse_screen_size, help = "Screen size as WIDTHxHEIGHT")]
    pub screen: Option<ScreenSize>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Record every frame to CSV")]
    pub record: bool,

    #[arg(long, help = "Directory for recordings [default: Documents/HandControl]")]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Stop after this many frames")]
    pub max_frames: Option<u64>,

    #[arg(long, default_value_t = 30.0, help = "Frame rate of the simulated source")]
    pub fps: f64,
}
