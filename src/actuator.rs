// src/actuator.rs
use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const FALLBACK_SCREEN_SIZE: (i32, i32) = (1920, 1080);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollDirection {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ActuatorCommand {
    MoveCursor { x: i32, y: i32 },
    Click { button: MouseButton, double: bool },
    Scroll { direction: ScrollDirection, amount: i32 },
    KeyPress { key: String },
    TypeText { text: String },
    Drag { from: (i32, i32), to: (i32, i32) },
}

impl ActuatorCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ActuatorCommand::MoveCursor { .. } => "move_cursor",
            ActuatorCommand::Click { .. } => "click",
            ActuatorCommand::Scroll { .. } => "scroll",
            ActuatorCommand::KeyPress { .. } => "key_press",
            ActuatorCommand::TypeText { .. } => "type_text",
            ActuatorCommand::Drag { .. } => "drag",
        }
    }
}

#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    #[error("input backend rejected the action: {0}")]
    Backend(String),
    #[error("unknown key name `{0}`")]
    UnknownKey(String),
}

pub trait InputActuator {
    fn screen_size(&mut self) -> Result<(i32, i32), ActuatorError>;
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError>;
    fn click(&mut self, button: MouseButton, double: bool) -> Result<(), ActuatorError>;
    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), ActuatorError>;
    fn key_press(&mut self, key: &str) -> Result<(), ActuatorError>;
    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError>;
    fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<(), ActuatorError>;

    // Called once at session end.
    fn release(&mut self) {}
}

impl<T: InputActuator + ?Sized> InputActuator for Box<T> {
    fn screen_size(&mut self) -> Result<(i32, i32), ActuatorError> {
        (**self).screen_size()
    }
    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
        (**self).move_cursor(x, y)
    }
    fn click(&mut self, button: MouseButton, double: bool) -> Result<(), ActuatorError> {
        (**self).click(button, double)
    }
    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), ActuatorError> {
        (**self).scroll(direction, amount)
    }
    fn key_press(&mut self, key: &str) -> Result<(), ActuatorError> {
        (**self).key_press(key)
    }
    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
        (**self).type_text(text)
    }
    fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<(), ActuatorError> {
        (**self).drag(from, to)
    }
    fn release(&mut self) {
        (**self).release()
    }
}

// Failures are logged and swallowed. Every click kind shares one cooldown,
// advanced only by a click that went through.
pub struct InputController<A> {
    backend: A,
    click_cooldown: Duration,
    last_click: Option<Instant>,
    released: bool,
}

impl<A: InputActuator> InputController<A> {
    pub fn new(backend: A, click_cooldown: Duration) -> Self {
        Self {
            backend,
            click_cooldown,
            last_click: None,
            released: false,
        }
    }

    pub fn screen_size(&mut self) -> (i32, i32) {
        match self.backend.screen_size() {
            Ok(size) => size,
            Err(e) => {
                warn!("Could not query screen size ({}), assuming {:?}", e, FALLBACK_SCREEN_SIZE);
                FALLBACK_SCREEN_SIZE
            }
        }
    }

    pub fn execute(&mut self, command: &ActuatorCommand, now: Instant) -> bool {
        let result = match command {
            ActuatorCommand::Click { button, double } => {
                return self.click(*button, *double, now);
            }
            ActuatorCommand::MoveCursor { x, y } => self.backend.move_cursor(*x, *y),
            ActuatorCommand::Scroll { direction, amount } => self.backend.scroll(*direction, *amount),
            ActuatorCommand::KeyPress { key } => self.backend.key_press(key),
            ActuatorCommand::TypeText { text } => self.backend.type_text(text),
            ActuatorCommand::Drag { from, to } => self.backend.drag(*from, *to),
        };
        self.report(command.name(), result)
    }

    pub fn click(&mut self, button: MouseButton, double: bool, now: Instant) -> bool {
        if let Some(last) = self.last_click {
            if now.saturating_duration_since(last) < self.click_cooldown {
                debug!(?button, double, "click suppressed by cooldown");
                return false;
            }
        }

        let result = self.backend.click(button, double);
        let performed = self.report("click", result);
        if performed {
            self.last_click = Some(now);
        }
        performed
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.backend.release();
        }
    }

    fn report(&self, action: &str, result: Result<(), ActuatorError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Error performing {}: {}", action, e);
                false
            }
        }
    }
}

static NAMED_KEYS: Lazy<HashMap<&'static str, Key>> = Lazy::new(|| {
    HashMap::from([
        ("space", Key::Space),
        ("enter", Key::Return),
        ("return", Key::Return),
        ("tab", Key::Tab),
        ("escape", Key::Escape),
        ("esc", Key::Escape),
        ("backspace", Key::Backspace),
        ("delete", Key::Delete),
        ("up", Key::UpArrow),
        ("down", Key::DownArrow),
        ("left", Key::LeftArrow),
        ("right", Key::RightArrow),
        ("home", Key::Home),
        ("end", Key::End),
        ("pageup", Key::PageUp),
        ("pagedown", Key::PageDown),
        ("ctrl", Key::Control),
        ("control", Key::Control),
        ("shift", Key::Shift),
        ("alt", Key::Alt),
        ("meta", Key::Meta),
        ("f1", Key::F1),
        ("f2", Key::F2),
        ("f3", Key::F3),
        ("f4", Key::F4),
        ("f5", Key::F5),
        ("f6", Key::F6),
        ("f7", Key::F7),
        ("f8", Key::F8),
        ("f9", Key::F9),
        ("f10", Key::F10),
        ("f11", Key::F11),
        ("f12", Key::F12),
    ])
});

pub fn parse_key(name: &str) -> Result<Key, ActuatorError> {
    let trimmed = name.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if let Some(key) = NAMED_KEYS.get(lowered.as_str()) {
        return Ok(*key);
    }

    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Key::Unicode(c)),
        _ => Err(ActuatorError::UnknownKey(name.to_string())),
    }
}

pub struct EnigoActuator {
    enigo: Enigo,
}

impl EnigoActuator {
    pub fn new() -> Result<Self, ActuatorError> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| ActuatorError::Unavailable(e.to_string()))?;
        info!("Connected to the system input backend");
        Ok(Self { enigo })
    }

    fn to_button(button: MouseButton) -> Button {
        match button {
            MouseButton::Primary => Button::Left,
            MouseButton::Secondary => Button::Right,
        }
    }
}

fn backend_err(e: impl std::fmt::Display) -> ActuatorError {
    ActuatorError::Backend(e.to_string())
}

impl InputActuator for EnigoActuator {
    fn screen_size(&mut self) -> Result<(i32, i32), ActuatorError> {
        self.enigo.main_display().map_err(backend_err)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
        self.enigo.move_mouse(x, y, Coordinate::Abs).map_err(backend_err)
    }

    fn click(&mut self, button: MouseButton, double: bool) -> Result<(), ActuatorError> {
        let button = Self::to_button(button);
        let clicks = if double { 2 } else { 1 };
        for _ in 0..clicks {
            self.enigo.button(button, Direction::Click).map_err(backend_err)?;
        }
        Ok(())
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), ActuatorError> {
        // Positive lengths scroll down.
        let length = match direction {
            ScrollDirection::Up => -amount,
            ScrollDirection::Down => amount,
        };
        self.enigo.scroll(length, Axis::Vertical).map_err(backend_err)
    }

    fn key_press(&mut self, key: &str) -> Result<(), ActuatorError> {
        let key = parse_key(key)?;
        self.enigo.key(key, Direction::Click).map_err(backend_err)
    }

    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.enigo.text(text).map_err(backend_err)
    }

    fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<(), ActuatorError> {
        self.enigo.move_mouse(from.0, from.1, Coordinate::Abs).map_err(backend_err)?;
        self.enigo.button(Button::Left, Direction::Press).map_err(backend_err)?;
        let moved = self.enigo.move_mouse(to.0, to.1, Coordinate::Abs).map_err(backend_err);
        // Never leave the button held down.
        self.enigo.button(Button::Left, Direction::Release).map_err(backend_err)?;
        moved
    }

    fn release(&mut self) {
        if let Err(e) = self.enigo.button(Button::Left, Direction::Release) {
            debug!("Releasing primary button failed: {}", e);
        }
    }
}

pub struct DryRunActuator<W: Write> {
    out: W,
    screen: (i32, i32),
}

impl<W: Write> DryRunActuator<W> {
    pub fn new(out: W, screen: (i32, i32)) -> Self {
        Self { out, screen }
    }

    fn journal(&mut self, command: ActuatorCommand) -> Result<(), ActuatorError> {
        let line = serde_json::to_string(&command).map_err(backend_err)?;
        writeln!(self.out, "{}", line).map_err(backend_err)
    }
}

impl<W: Write> InputActuator for DryRunActuator<W> {
    fn screen_size(&mut self) -> Result<(i32, i32), ActuatorError> {
        Ok(self.screen)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> Result<(), ActuatorError> {
        self.journal(ActuatorCommand::MoveCursor { x, y })
    }

    fn click(&mut self, button: MouseButton, double: bool) -> Result<(), ActuatorError> {
        self.journal(ActuatorCommand::Click { button, double })
    }

    fn scroll(&mut self, direction: ScrollDirection, amount: i32) -> Result<(), ActuatorError> {
        self.journal(ActuatorCommand::Scroll { direction, amount })
    }

    fn key_press(&mut self, key: &str) -> Result<(), ActuatorError> {
        self.journal(ActuatorCommand::KeyPress { key: key.to_string() })
    }

    fn type_text(&mut self, text: &str) -> Result<(), ActuatorError> {
        self.journal(ActuatorCommand::TypeText { text: text.to_string() })
    }

    fn drag(&mut self, from: (i32, i32), to: (i32, i32)) -> Result<(), ActuatorError> {
        self.journal(ActuatorCommand::Drag { from, to })
    }

    fn release(&mut self) {
        let _ = self.out.flush();
    }
}
