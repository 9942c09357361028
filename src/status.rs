// src/status.rs
use std::fmt;
use tracing::info;

use crate::config::ControlMode;
use crate::gesture::Gesture;
use crate::landmarks::Handedness;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub gesture: Gesture,
    pub mode: ControlMode,
    pub pointer_active: bool,
    pub handedness: Option<Handedness>,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gesture: {} | Mode: {}", self.gesture, self.mode.as_str())?;
        if self.pointer_active {
            f.write_str(" | POINTER ACTIVE")?;
        }
        match self.handedness {
            Some(hand) => write!(f, " | Hand: {}", hand.as_str()),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Default)]
pub struct StatusOverlay {
    enabled: bool,
    last: Option<StatusLine>,
}

impl StatusOverlay {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last: None,
        }
    }

    pub fn update(&mut self, status: StatusLine) -> bool {
        if !self.enabled || self.last == Some(status) {
            return false;
        }
        info!("{}", status);
        self.last = Some(status);
        true
    }
}
