// src/provider.rs
use serde::Deserialize;
use std::io::{BufRead, BufReader};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::landmarks::{synthetic_hand, HandObservation, Handedness, Landmark};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("landmark stream read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed landmark frame on line {line}: {source}")]
    Malformed {
        line: u64,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to start landmark provider `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("landmark provider handshake failed: {0}")]
    Handshake(String),
    #[error("landmark provider reported: {0}")]
    Remote(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub timestamp: Option<Duration>,
    pub hand: Option<HandObservation>,
}

pub trait HandLandmarkProvider {
    // Ok(None) means the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError>;

    fn close(&mut self) -> Result<(), ProviderError>;
}

impl<T: HandLandmarkProvider + ?Sized> HandLandmarkProvider for Box<T> {
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError> {
        (**self).next_frame()
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        (**self).close()
    }
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f64,
    y: f64,
    #[serde(default)]
    z: f64,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct FrameJson {
    width: u32,
    height: u32,
    #[serde(default)]
    timestamp_ms: Option<f64>,
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

pub fn parse_frame(line: &str, line_no: u64) -> Result<Frame, ProviderError> {
    let frame: FrameJson = serde_json::from_str(line).map_err(|source| ProviderError::Malformed {
        line: line_no,
        source,
    })?;

    if let Some(error) = frame.error {
        return Err(ProviderError::Remote(error));
    }
    if frame.hands.len() > 1 {
        debug!("{} hands reported, using the first", frame.hands.len());
    }

    let hand = frame.hands.into_iter().next().map(|hand| {
        let landmarks = hand
            .landmarks
            .iter()
            .map(|lm| Landmark::new(lm.x, lm.y, lm.z))
            .collect();
        HandObservation::new(landmarks, Handedness::from_label(&hand.handedness))
    });

    let timestamp = match frame.timestamp_ms.filter(|ms| ms.is_finite() && *ms >= 0.0) {
        Some(ms) => Some(Duration::try_from_secs_f64(ms / 1000.0).map_err(|e| {
            ProviderError::Malformed {
                line: line_no,
                source: serde::de::Error::custom(format!("timestamp_ms {}: {}", ms, e)),
            }
        })?),
        None => None,
    };

    Ok(Frame {
        width: frame.width,
        height: frame.height,
        timestamp,
        hand,
    })
}

/// Reads JSON-lines frames from any buffered reader.
pub struct JsonLinesProvider<R: BufRead> {
    reader: R,
    line_no: u64,
    buf: String,
}

impl<R: BufRead> JsonLinesProvider<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }

    fn read_line(&mut self) -> Result<Option<&str>, ProviderError> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(self.buf.trim()))
    }
}

impl<R: BufRead> HandLandmarkProvider for JsonLinesProvider<R> {
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError> {
        loop {
            let line_no = self.line_no + 1;
            match self.read_line()? {
                None => return Ok(None),
                Some("") => continue,
                Some(line) => return parse_frame(line, line_no).map(Some),
            }
        }
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }
}

// The child gets `--camera <index>` (plus `--flip`) and prints READY before any frame.
pub struct CommandProvider {
    child: Option<Child>,
    frames: JsonLinesProvider<BufReader<ChildStdout>>,
}

impl CommandProvider {
    pub fn spawn(command_line: &str, camera: u32, flip: bool) -> Result<Self, ProviderError> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| ProviderError::Handshake("empty provider command".into()))?;

        let mut command = Command::new(program);
        command
            .args(parts)
            .arg("--camera")
            .arg(camera.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if flip {
            command.arg("--flip");
        }

        info!("Starting landmark provider: {}", command_line);
        let mut child = command.spawn().map_err(|source| ProviderError::Spawn {
            command: command_line.to_string(),
            source,
        })?;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            return Err(ProviderError::Handshake("provider stdout unavailable".into()));
        };

        let mut provider = Self {
            child: Some(child),
            frames: JsonLinesProvider::new(BufReader::new(stdout)),
        };
        provider.await_ready()?;
        info!("Landmark provider ready");
        Ok(provider)
    }

    fn await_ready(&mut self) -> Result<(), ProviderError> {
        loop {
            match self.frames.read_line()? {
                None => {
                    return Err(ProviderError::Handshake(
                        "provider exited before signalling READY".into(),
                    ))
                }
                Some("") => continue,
                Some("READY") => return Ok(()),
                Some(other) => {
                    return Err(ProviderError::Handshake(format!(
                        "expected READY, got `{}`",
                        other
                    )))
                }
            }
        }
    }
}

impl HandLandmarkProvider for CommandProvider {
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError> {
        self.frames.next_frame()
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                // Already exited.
                debug!("Provider kill: {}", e);
            }
            let status = child.wait()?;
            info!("Landmark provider stopped ({})", status);
        }
        Ok(())
    }
}

impl Drop for CommandProvider {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to stop landmark provider: {}", e);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SimPhase {
    Pointing,
    Pinch,
    Fist,
    Peace,
    ThumbsUp,
    Ok,
    OpenHand,
    Away,
}

const SIM_SCRIPT: [(SimPhase, f64); 8] = [
    (SimPhase::Pointing, 3.0),
    (SimPhase::Pinch, 0.4),
    (SimPhase::Fist, 1.6),
    (SimPhase::Peace, 1.6),
    (SimPhase::ThumbsUp, 1.2),
    (SimPhase::Ok, 1.2),
    (SimPhase::OpenHand, 0.8),
    (SimPhase::Away, 0.5),
];

pub struct SimulatedProvider {
    fps: f64,
    realtime: bool,
    frame_index: u64,
    width: u32,
    height: u32,
}

impl SimulatedProvider {
    pub fn new(fps: f64, realtime: bool) -> Self {
        Self {
            fps: fps.max(1.0),
            realtime,
            frame_index: 0,
            width: 1280,
            height: 720,
        }
    }

    fn phase_at(t: f64) -> SimPhase {
        let cycle: f64 = SIM_SCRIPT.iter().map(|(_, secs)| secs).sum();
        let mut offset = t % cycle;
        for (phase, secs) in SIM_SCRIPT {
            if offset < secs {
                return phase;
            }
            offset -= secs;
        }
        SimPhase::Away
    }

    fn hand_at(t: f64) -> Option<HandObservation> {
        let center = (0.5 + 0.2 * (t * 0.9).sin(), 0.55 + 0.1 * (t * 1.3).sin());
        let still = (0.5, 0.55);

        let hand = match Self::phase_at(t) {
            SimPhase::Pointing => synthetic_hand([false, true, false, false, false], center, false),
            SimPhase::Pinch => synthetic_hand([false; 5], still, true),
            SimPhase::Fist => synthetic_hand([false; 5], still, false),
            SimPhase::Peace => synthetic_hand([false, true, true, false, false], still, false),
            SimPhase::ThumbsUp => synthetic_hand([true, false, false, false, false], still, false),
            SimPhase::Ok => synthetic_hand([true, true, false, false, false], still, false),
            SimPhase::OpenHand => synthetic_hand([true; 5], still, false),
            SimPhase::Away => return None,
        };
        Some(hand)
    }
}

impl HandLandmarkProvider for SimulatedProvider {
    fn next_frame(&mut self) -> Result<Option<Frame>, ProviderError> {
        if self.realtime && self.frame_index > 0 {
            std::thread::sleep(Duration::from_secs_f64(1.0 / self.fps));
        }

        let t = self.frame_index as f64 / self.fps;
        self.frame_index += 1;

        Ok(Some(Frame {
            width: self.width,
            height: self.height,
            timestamp: Some(Duration::from_secs_f64(t)),
            hand: Self::hand_at(t),
        }))
    }

    fn close(&mut self) -> Result<(), ProviderError> {
        Ok(())
    }
}
