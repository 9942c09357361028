// src/config.rs
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::gesture::{Gesture, CLICK_THRESHOLD, PINCH_MAX_DISTANCE};

// Upper bound for every timing setting, in seconds.
pub const MAX_TIMING_SECS: f64 = 3600.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ControlMode {
    #[serde(rename = "pointer")]
    #[value(name = "pointer")]
    PointerOnly,
    #[serde(rename = "gesture")]
    #[value(name = "gesture")]
    GestureOnly,
    #[default]
    #[serde(rename = "both")]
    #[value(name = "both")]
    Both,
}

impl ControlMode {
    pub fn pointer_enabled(&self) -> bool {
        matches!(self, ControlMode::PointerOnly | ControlMode::Both)
    }

    pub fn gestures_enabled(&self) -> bool {
        matches!(self, ControlMode::GestureOnly | ControlMode::Both)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlMode::PointerOnly => "POINTER",
            ControlMode::GestureOnly => "GESTURE",
            ControlMode::Both => "BOTH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    pub enabled: bool,
    pub hold_secs: f64,
}

impl DragConfig {
    pub fn hold(&self) -> Duration {
        secs_to_duration(self.hold_secs)
    }
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            hold_secs: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundAction {
    Key(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureBinding {
    pub gesture: Gesture,
    pub action: BoundAction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub mode: ControlMode,
    pub mirror: bool,
    pub smoothing: f64,
    pub click_threshold: f64,
    pub pinch_max_distance: f64,
    pub click_cooldown_secs: f64,
    pub debounce_secs: f64,
    pub click_window_start_secs: f64,
    pub click_window_end_secs: f64,
    pub scroll_hold_secs: f64,
    pub scroll_amount: i32,
    pub screen: Option<ScreenSize>,
    pub reset_hold_on_hand_loss: bool,
    pub drag: DragConfig,
    pub bindings: Vec<GestureBinding>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            mode: ControlMode::Both,
            mirror: true,
            smoothing: 0.7,
            click_threshold: CLICK_THRESHOLD,
            pinch_max_distance: PINCH_MAX_DISTANCE,
            click_cooldown_secs: 0.3,
            debounce_secs: 0.5,
            click_window_start_secs: 1.0,
            click_window_end_secs: 1.5,
            scroll_hold_secs: 0.8,
            scroll_amount: 3,
            screen: None,
            reset_hold_on_hand_loss: false,
            drag: DragConfig::default(),
            bindings: Vec::new(),
        }
    }
}

impl ControlConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "smoothing must be in (0, 1], got {}",
                self.smoothing
            )));
        }

        let positive = [
            ("click_threshold", self.click_threshold),
            ("pinch_max_distance", self.pinch_max_distance),
            ("click_window_end_secs", self.click_window_end_secs),
            ("scroll_hold_secs", self.scroll_hold_secs),
            ("drag.hold_secs", self.drag.hold_secs),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }

        if self.click_cooldown_secs < 0.0 || self.debounce_secs < 0.0 {
            return Err(ConfigError::Invalid("durations must not be negative".into()));
        }
        let timings = [
            ("click_cooldown_secs", self.click_cooldown_secs),
            ("debounce_secs", self.debounce_secs),
            ("click_window_start_secs", self.click_window_start_secs),
            ("click_window_end_secs", self.click_window_end_secs),
            ("scroll_hold_secs", self.scroll_hold_secs),
            ("drag.hold_secs", self.drag.hold_secs),
        ];
        for (name, value) in timings {
            if !(value <= MAX_TIMING_SECS) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be at most {} seconds, got {}",
                    name, MAX_TIMING_SECS, value
                )));
            }
        }
        if self.click_window_start_secs >= self.click_window_end_secs {
            return Err(ConfigError::Invalid(format!(
                "click window start {} must come before its end {}",
                self.click_window_start_secs, self.click_window_end_secs
            )));
        }
        if self.debounce_secs > self.click_window_start_secs {
            return Err(ConfigError::Invalid(format!(
                "debounce {} must not exceed the click window start {}",
                self.debounce_secs, self.click_window_start_secs
            )));
        }
        if self.scroll_amount <= 0 {
            return Err(ConfigError::Invalid("scroll_amount must be positive".into()));
        }
        if let Some(screen) = self.screen {
            if screen.width <= 0 || screen.height <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "screen size must be positive, got {}x{}",
                    screen.width, screen.height
                )));
            }
        }
        Ok(())
    }

    pub fn click_cooldown(&self) -> Duration {
        secs_to_duration(self.click_cooldown_secs)
    }
}

// Clamps into [0, MAX_TIMING_SECS]; NaN reads as zero.
fn secs_to_duration(secs: f64) -> Duration {
    let secs = if secs.is_nan() { 0.0 } else { secs.clamp(0.0, MAX_TIMING_SECS) };
    Duration::from_secs_f64(secs)
}

pub fn parse_screen_size(value: &str) -> Result<ScreenSize, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{}`", value))?;
    let width: i32 = w.trim().parse().map_err(|_| format!("invalid width `{}`", w))?;
    let height: i32 = h.trim().parse().map_err(|_| format!("invalid height `{}`", h))?;
    if width <= 0 || height <= 0 {
        return Err(format!("screen size must be positive, got `{}`", value));
    }
    Ok(ScreenSize { width, height })
}
