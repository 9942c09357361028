// src/data.rs
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::controller::PointerState;
use crate::geometry::joint_angle;
use crate::gesture::Gesture;
use crate::landmarks::{Finger, HandObservation};

#[derive(Debug, Serialize)]
struct FrameRecord {
    timestamp: f64,
    frame: u64,
    hand_present: bool,
    handedness: Option<String>,
    gesture: String,
    pinch_strength: f64,
    pointer_active: bool,
    cursor_x: Option<i32>,
    cursor_y: Option<i32>,

    // Bend at the PIP joint (IP for the thumb), degrees
    thumb_angle: Option<f64>,
    index_angle: Option<f64>,
    middle_angle: Option<f64>,
    ring_angle: Option<f64>,
    pinky_angle: Option<f64>,

    commands: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct FrameSample<'a> {
    pub timestamp: f64,
    pub frame: u64,
    pub hand: Option<&'a HandObservation>,
    pub gesture: Gesture,
    pub pinch_strength: f64,
    pub pointer: PointerState,
    pub commands: usize,
}

pub fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|d| d.join("HandControl")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

/// Streams one CSV row per frame to `<output_dir>/<session>/frames.csv`.
pub struct SessionRecorder {
    csv_path: PathBuf,
    writer: Writer<File>,
    rows: u64,
}

impl SessionRecorder {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Result<Self> {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        let session_dir = output_dir.as_ref().join(&session_name);
        std::fs::create_dir_all(&session_dir)
            .with_context(|| format!("creating {}", session_dir.display()))?;

        let csv_path = session_dir.join("frames.csv");
        let file = File::create(&csv_path)
            .with_context(|| format!("creating {}", csv_path.display()))?;
        info!("Recording session to {}", csv_path.display());

        Ok(Self {
            csv_path,
            writer: Writer::from_writer(file),
            rows: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.csv_path
    }

    #[cfg(test)]
    pub fn rows(&self) -> u64 {
        self.rows
    }

    pub fn record(&mut self, sample: &FrameSample<'_>) -> Result<()> {
        self.writer.serialize(Self::create_record(sample))?;
        self.rows += 1;
        Ok(())
    }

    pub fn finish(&mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        info!("Recorded {} frames to {}", self.rows, self.csv_path.display());
        Ok(self.csv_path.clone())
    }

    fn create_record(sample: &FrameSample<'_>) -> FrameRecord {
        let angles = sample.hand.map(finger_angles).unwrap_or([None; 5]);
        let cursor = sample.pointer.last_position;

        FrameRecord {
            timestamp: sample.timestamp,
            frame: sample.frame,
            hand_present: sample.hand.is_some(),
            handedness: sample.hand.map(|h| h.handedness().as_str().to_string()),
            gesture: sample.gesture.as_str().to_string(),
            pinch_strength: sample.pinch_strength,
            pointer_active: sample.pointer.active,
            cursor_x: cursor.map(|(x, _)| x),
            cursor_y: cursor.map(|(_, y)| y),
            thumb_angle: angles[0],
            index_angle: angles[1],
            middle_angle: angles[2],
            ring_angle: angles[3],
            pinky_angle: angles[4],
            commands: sample.commands,
        }
    }
}

fn finger_angles(hand: &HandObservation) -> [Option<f64>; 5] {
    let mut angles = [None; 5];
    if !hand.is_complete() {
        return angles;
    }
    let points = hand.landmarks();
    for finger in Finger::ALL {
        angles[finger.position()] = Some(joint_angle(
            &points[finger.mcp().index()],
            &points[finger.pip().index()],
            &points[finger.dip().index()],
        ));
    }
    angles
}
