// src/session.rs
use anyhow::{Context, Result};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::actuator::{InputActuator, InputController};
use crate::config::ControlConfig;
use crate::controller::{ControlStateMachine, FrameInput, PointerPhase};
use crate::data::{FrameSample, SessionRecorder};
use crate::provider::{Frame, HandLandmarkProvider};
use crate::status::{StatusLine, StatusOverlay};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Quit,
    Reset,
}

impl SessionControl {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "q" | "Q" | "quit" => Some(SessionControl::Quit),
            "r" | "R" | "reset" => Some(SessionControl::Reset),
            _ => None,
        }
    }
}

/// Reads `q` / `r` lines from stdin on a background thread.
pub fn spawn_stdin_controls() -> Result<Receiver<SessionControl>> {
    let (tx, rx) = mpsc::channel();
    std::thread::Builder::new()
        .name("session-controls".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match SessionControl::parse(&line) {
                    Some(control) => {
                        if tx.send(control).is_err() {
                            break;
                        }
                    }
                    None => debug!("Ignoring console input {:?}", line),
                }
            }
        })
        .context("spawning console control thread")?;
    Ok(rx)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub frames: u64,
    pub hand_frames: u64,
    pub commands: u64,
    pub quit_requested: bool,
    pub recording: Option<PathBuf>,
}

// Provider and actuator are released exactly once, including on error and unwind.
pub struct Session<P: HandLandmarkProvider, A: InputActuator> {
    provider: P,
    controller: InputController<A>,
    machine: ControlStateMachine,
    recorder: Option<SessionRecorder>,
    overlay: StatusOverlay,
    controls: Option<Receiver<SessionControl>>,
    max_frames: Option<u64>,
    started: Instant,
    summary: SessionSummary,
    closed: bool,
}

impl<P: HandLandmarkProvider, A: InputActuator> Session<P, A> {
    pub fn new(provider: P, actuator: A, config: &ControlConfig) -> Self {
        let mut controller = InputController::new(actuator, config.click_cooldown());
        let screen = match config.screen {
            Some(size) => (size.width, size.height),
            None => controller.screen_size(),
        };
        info!(
            "Session ready: mode {}, screen {}x{}, mirror {}",
            config.mode.as_str(),
            screen.0,
            screen.1,
            config.mirror
        );

        Self {
            provider,
            controller,
            machine: ControlStateMachine::new(config, screen),
            recorder: None,
            overlay: StatusOverlay::new(false),
            controls: None,
            max_frames: None,
            started: Instant::now(),
            summary: SessionSummary::default(),
            closed: false,
        }
    }

    pub fn with_recorder(mut self, recorder: SessionRecorder) -> Self {
        self.summary.recording = Some(recorder.path().to_path_buf());
        self.recorder = Some(recorder);
        self
    }

    pub fn with_controls(mut self, controls: Receiver<SessionControl>) -> Self {
        self.controls = Some(controls);
        self
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.overlay = StatusOverlay::new(preview);
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    #[cfg(test)]
    pub fn machine(&self) -> &ControlStateMachine {
        &self.machine
    }

    #[cfg(test)]
    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn run(&mut self) -> Result<SessionSummary> {
        self.started = Instant::now();
        let result = self.run_frames();
        self.shutdown();
        result?;

        info!(
            "Session finished: {} frames, {} with a hand, {} commands",
            self.summary.frames, self.summary.hand_frames, self.summary.commands
        );
        Ok(self.summary.clone())
    }

    fn run_frames(&mut self) -> Result<()> {
        loop {
            if self.poll_controls() {
                info!("Quit requested");
                self.summary.quit_requested = true;
                return Ok(());
            }
            if let Some(limit) = self.max_frames {
                if self.summary.frames >= limit {
                    debug!("Frame limit {} reached", limit);
                    return Ok(());
                }
            }

            let frame = self
                .provider
                .next_frame()
                .context("reading the next landmark frame")?;
            let Some(frame) = frame else {
                info!("Landmark stream ended");
                return Ok(());
            };
            self.process_frame(&frame)?;
        }
    }

    pub fn process_frame(&mut self, frame: &Frame) -> Result<usize> {
        let now = frame
            .timestamp
            .and_then(|offset| self.started.checked_add(offset))
            .unwrap_or_else(Instant::now);
        let hand = frame.hand.as_ref();
        let gesture = self.machine.classifier().classify(hand);

        let commands = self.machine.step(
            &FrameInput {
                hand,
                gesture,
                frame_width: frame.width,
                frame_height: frame.height,
            },
            now,
        );
        for command in &commands {
            debug!(command = command.name(), ?command, "dispatch");
            self.controller.execute(command, now);
        }

        let pointer = self.machine.pointer();
        self.overlay.update(StatusLine {
            gesture,
            mode: self.machine.mode(),
            pointer_active: self.machine.phase() == PointerPhase::Tracking,
            handedness: hand.map(|h| h.handedness()),
        });

        if let Some(recorder) = self.recorder.as_mut() {
            recorder
                .record(&FrameSample {
                    timestamp: now.saturating_duration_since(self.started).as_secs_f64(),
                    frame: self.summary.frames,
                    hand,
                    gesture,
                    pinch_strength: self.machine.classifier().pinch_strength(hand),
                    pointer,
                    commands: commands.len(),
                })
                .context("recording frame")?;
        }

        self.summary.frames += 1;
        self.summary.hand_frames += u64::from(hand.is_some());
        self.summary.commands += commands.len() as u64;
        Ok(commands.len())
    }

    pub fn handle_control(&mut self, control: SessionControl) -> bool {
        match control {
            SessionControl::Quit => true,
            SessionControl::Reset => {
                info!("Reset requested");
                self.machine.reset();
                false
            }
        }
    }

    fn poll_controls(&mut self) -> bool {
        loop {
            let Some(controls) = self.controls.as_ref() else {
                return false;
            };
            match controls.try_recv() {
                Ok(control) => {
                    if self.handle_control(control) {
                        return true;
                    }
                }
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => {
                    self.controls = None;
                    return false;
                }
            }
        }
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.provider.close() {
            warn!("Error closing landmark provider: {}", e);
        }
        if let Some(recorder) = self.recorder.as_mut() {
            if let Err(e) = recorder.finish() {
                warn!("Error finishing recording: {:#}", e);
            }
        }
        self.controller.release();
    }
}

impl<P: HandLandmarkProvider, A: InputActuator> Drop for Session<P, A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
