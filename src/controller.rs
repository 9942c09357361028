// src/controller.rs
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::actuator::{ActuatorCommand, MouseButton, ScrollDirection};
use crate::config::{BoundAction, ControlConfig, ControlMode, GestureBinding};
use crate::gesture::{Gesture, GestureClassifier};
use crate::landmarks::HandObservation;
use crate::mapper::CoordinateMapper;

#[derive(Debug, Clone, Copy)]
pub struct FrameInput<'a> {
    pub hand: Option<&'a HandObservation>,
    pub gesture: Gesture,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Idle,
    Tracking,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerState {
    pub active: bool,
    pub last_position: Option<(i32, i32)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureHold {
    pub gesture: Gesture,
    pub since: Instant,
    // Bound actions fire once per hold.
    pub bindings_fired: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub pinch_since: Option<Instant>,
    // Pointer position from before the pinch began.
    pub anchor: Option<(i32, i32)>,
    pub origin: Option<(i32, i32)>,
    pub target: Option<(i32, i32)>,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        self.origin.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct DragFrame {
    pinched: bool,
    tip: Option<(i32, i32)>,
    moved: Option<(i32, i32)>,
    previous: Option<(i32, i32)>,
}

#[derive(Debug, Clone)]
struct HoldTimings {
    debounce: f64,
    click_window: (f64, f64),
    scroll_after: f64,
}

/// Turns the per-frame gesture stream into debounced actuator commands.
pub struct ControlStateMachine {
    mode: ControlMode,
    mirror: bool,
    scroll_amount: i32,
    timings: HoldTimings,
    reset_hold_on_hand_loss: bool,
    drag_hold: Option<Duration>,
    bindings: Vec<GestureBinding>,
    classifier: GestureClassifier,
    mapper: CoordinateMapper,
    pointer: PointerState,
    hold: Option<GestureHold>,
    drag: DragState,
}

impl ControlStateMachine {
    pub fn new(config: &ControlConfig, screen: (i32, i32)) -> Self {
        Self {
            mode: config.mode,
            mirror: config.mirror,
            scroll_amount: config.scroll_amount,
            timings: HoldTimings {
                debounce: config.debounce_secs,
                click_window: (config.click_window_start_secs, config.click_window_end_secs),
                scroll_after: config.scroll_hold_secs,
            },
            reset_hold_on_hand_loss: config.reset_hold_on_hand_loss,
            drag_hold: config
                .drag
                .enabled
                .then(|| config.drag.hold()),
            bindings: config.bindings.clone(),
            classifier: GestureClassifier::new(config.click_threshold, config.pinch_max_distance),
            mapper: CoordinateMapper::new(screen.0, screen.1, config.smoothing),
            pointer: PointerState::default(),
            hold: None,
            drag: DragState::default(),
        }
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn phase(&self) -> PointerPhase {
        if self.pointer.active {
            PointerPhase::Tracking
        } else {
            PointerPhase::Idle
        }
    }

    #[cfg(test)]
    pub fn hold(&self) -> Option<GestureHold> {
        self.hold
    }

    #[cfg(test)]
    pub fn drag(&self) -> DragState {
        self.drag
    }

    #[cfg(test)]
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn reset(&mut self) {
        debug!("Resetting pointer state");
        self.mapper.reset();
        self.pointer.last_position = None;
        self.drag = DragState::default();
    }

    pub fn step(&mut self, input: &FrameInput<'_>, now: Instant) -> Vec<ActuatorCommand> {
        let mut commands = Vec::new();

        let Some(hand) = input.hand else {
            self.pointer.active = false;
            if self.drag.is_dragging() {
                info!("Hand lost, abandoning drag");
            }
            self.drag = DragState::default();
            if self.reset_hold_on_hand_loss {
                self.hold = None;
            }
            return commands;
        };

        if self.mode.pointer_enabled() {
            self.pointer_block(hand, input, now, &mut commands);
        }
        if self.mode.gestures_enabled() {
            self.gesture_block(input.gesture, now, &mut commands);
        }

        commands
    }

    fn pointer_block(
        &mut self,
        hand: &HandObservation,
        input: &FrameInput<'_>,
        now: Instant,
        commands: &mut Vec<ActuatorCommand>,
    ) {
        let tip = self
            .classifier
            .index_tip_pixel_position(hand, input.frame_width, input.frame_height);
        let previous = self.pointer.last_position;

        let mut moved = None;
        match tip {
            Some((x, y)) if input.gesture == Gesture::Point => {
                let (sx, sy) = self.mapper.map_to_screen(
                    x as f64,
                    y as f64,
                    input.frame_width,
                    input.frame_height,
                    self.mirror,
                );
                commands.push(ActuatorCommand::MoveCursor { x: sx, y: sy });
                self.pointer.active = true;
                self.pointer.last_position = Some((sx, sy));
                moved = Some((sx, sy));
            }
            _ => self.pointer.active = false,
        }

        // A pinch clicks unless the pointer started tracking on this frame.
        let pinched = self.classifier.is_click_gesture(Some(hand));
        if pinched && !self.pointer.active {
            commands.push(ActuatorCommand::Click {
                button: MouseButton::Primary,
                double: false,
            });
            self.pointer.active = true;
        }

        if let Some(hold) = self.drag_hold {
            let drag = DragFrame { pinched, tip, moved, previous };
            self.track_drag(&drag, input, hold, now, commands);
        }
    }

    fn track_drag(
        &mut self,
        frame: &DragFrame,
        input: &FrameInput<'_>,
        hold: Duration,
        now: Instant,
        commands: &mut Vec<ActuatorCommand>,
    ) {
        if !frame.pinched {
            let drag = std::mem::take(&mut self.drag);
            if let (Some(from), Some(to)) = (drag.origin, drag.target) {
                if from != to {
                    debug!(?from, ?to, "Drag released");
                    commands.push(ActuatorCommand::Drag { from, to });
                }
            }
            return;
        }

        let since = match self.drag.pinch_since {
            Some(since) => since,
            None => {
                self.drag.pinch_since = Some(now);
                self.drag.anchor = frame.previous.or(self.pointer.last_position);
                now
            }
        };
        if !self.drag.is_dragging() {
            if now.saturating_duration_since(since) < hold {
                return;
            }
            let Some(origin) = self.drag.anchor.or(self.pointer.last_position) else {
                return;
            };
            debug!(?origin, "Drag started");
            self.drag.origin = Some(origin);
            self.drag.target = Some(origin);
        }

        let target = frame.moved.or_else(|| {
            frame.tip.map(|(x, y)| {
                self.mapper.map_to_screen(
                    x as f64,
                    y as f64,
                    input.frame_width,
                    input.frame_height,
                    self.mirror,
                )
            })
        });
        if let Some(target) = target {
            self.drag.target = Some(target);
            self.pointer.last_position = Some(target);
        }
    }

    fn gesture_block(&mut self, gesture: Gesture, now: Instant, commands: &mut Vec<ActuatorCommand>) {
        let since = match self.hold {
            Some(hold) if hold.gesture == gesture => hold.since,
            _ => {
                self.hold = Some(GestureHold {
                    gesture,
                    since: now,
                    bindings_fired: false,
                });
                now
            }
        };

        let held = now.saturating_duration_since(since).as_secs_f64();
        if held <= self.timings.debounce {
            return;
        }

        let (window_start, window_end) = self.timings.click_window;
        let in_click_window = held > window_start && held < window_end;

        match gesture {
            Gesture::Fist if in_click_window => commands.push(ActuatorCommand::Click {
                button: MouseButton::Secondary,
                double: false,
            }),
            Gesture::Peace if in_click_window => commands.push(ActuatorCommand::Click {
                button: MouseButton::Primary,
                double: true,
            }),
            Gesture::ThumbsUp if held > self.timings.scroll_after => {
                commands.push(ActuatorCommand::Scroll {
                    direction: ScrollDirection::Up,
                    amount: self.scroll_amount,
                })
            }
            Gesture::Ok if held > self.timings.scroll_after => commands.push(ActuatorCommand::Scroll {
                direction: ScrollDirection::Down,
                amount: self.scroll_amount,
            }),
            Gesture::OpenHand => self.reset(),
            _ => {}
        }

        if !in_click_window {
            return;
        }
        let Some(hold) = self.hold.as_mut() else {
            return;
        };
        if hold.bindings_fired {
            return;
        }
        for binding in self.bindings.iter().filter(|b| b.gesture == gesture) {
            debug!(%gesture, "Firing bound action");
            hold.bindings_fired = true;
            commands.push(match &binding.action {
                BoundAction::Key(key) => ActuatorCommand::KeyPress { key: key.clone() },
                BoundAction::Text(text) => ActuatorCommand::TypeText { text: text.clone() },
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DragConfig;
    use crate::landmarks::{synthetic_hand, HandLandmark, Handedness};
    use nalgebra::Vector3;

    const SCREEN: (i32, i32) = (1920, 1080);
    const FRAME: (u32, u32) = (1280, 720);

    fn pointing_at(x: f64, y: f64) -> HandObservation {
        let mut points = synthetic_hand([false, true, false, false, false], (0.5, 0.5), false)
            .landmarks()
            .to_vec();
        points[HandLandmark::IndexTip.index()] = Vector3::new(x, y, 0.0);
        points[HandLandmark::IndexPip.index()] = Vector3::new(x, y + 0.05, 0.0);
        HandObservation::new(points, Handedness::Right)
    }

    fn pinching_at(x: f64, y: f64) -> HandObservation {
        let mut points = pointing_at(x, y).landmarks().to_vec();
        points[HandLandmark::ThumbTip.index()] = Vector3::new(x + 0.01, y, 0.0);
        HandObservation::new(points, Handedness::Right)
    }

    fn pose(flags: [bool; 5]) -> HandObservation {
        synthetic_hand(flags, (0.5, 0.5), false)
    }

    fn fist() -> HandObservation {
        pose([false; 5])
    }

    fn machine(configure: impl FnOnce(&mut ControlConfig)) -> ControlStateMachine {
        let mut config = ControlConfig::default();
        configure(&mut config);
        ControlStateMachine::new(&config, SCREEN)
    }

    fn step(sm: &mut ControlStateMachine, hand: Option<&HandObservation>, now: Instant) -> Vec<ActuatorCommand> {
        let gesture = sm.classifier().classify(hand);
        let input = FrameInput {
            hand,
            gesture,
            frame_width: FRAME.0,
            frame_height: FRAME.1,
        };
        sm.step(&input, now)
    }

    fn at(t0: Instant, secs: f64) -> Instant {
        t0 + Duration::from_secs_f64(secs)
    }

    fn secondary() -> ActuatorCommand {
        ActuatorCommand::Click {
            button: MouseButton::Secondary,
            double: false,
        }
    }

    fn primary() -> ActuatorCommand {
        ActuatorCommand::Click {
            button: MouseButton::Primary,
            double: false,
        }
    }

    #[test]
    fn pointing_moves_cursor_through_mirrored_mapper() {
        let mut sm = machine(|c| {
            c.mode = ControlMode::PointerOnly;
            c.smoothing = 0.5;
        });
        let t0 = Instant::now();

        let commands = step(&mut sm, Some(&pointing_at(0.5, 0.5)), t0);
        assert_eq!(commands, vec![ActuatorCommand::MoveCursor { x: 960, y: 540 }]);
        assert_eq!(sm.phase(), PointerPhase::Tracking);

        let commands = step(&mut sm, Some(&pointing_at(0.25, 0.25)), at(t0, 0.03));
        // halfway between (1440, 270) and (960, 540)
        assert_eq!(commands, vec![ActuatorCommand::MoveCursor { x: 1200, y: 405 }]);
    }

    #[test]
    fn other_gestures_stop_tracking_but_keep_position() {
        let mut sm = machine(|c| c.mode = ControlMode::PointerOnly);
        let t0 = Instant::now();

        step(&mut sm, Some(&pointing_at(0.5, 0.5)), t0);
        let commands = step(&mut sm, Some(&pose([true; 5])), at(t0, 0.03));
        assert!(commands.is_empty());
        assert_eq!(sm.phase(), PointerPhase::Idle);
        assert_eq!(sm.pointer().last_position, Some((960, 540)));
        assert_eq!(sm.mapper().last_position(), Some((960, 540)));
    }

    #[test]
    fn pinch_clicks_when_not_pointing() {
        let mut sm = machine(|c| c.mode = ControlMode::PointerOnly);
        let t0 = Instant::now();

        let pinch = synthetic_hand([false; 5], (0.5, 0.5), true);
        assert_eq!(step(&mut sm, Some(&pinch), t0), vec![primary()]);
        assert!(sm.pointer().active);
    }

    #[test]
    fn pinch_while_tracking_does_not_click() {
        let mut sm = machine(|c| c.mode = ControlMode::PointerOnly);
        let t0 = Instant::now();

        // Index extended with thumb parked beside it still reads as POINT.
        let pinch = synthetic_hand([false, true, false, false, false], (0.5, 0.5), true);
        assert_eq!(sm.classifier().classify(Some(&pinch)), Gesture::Point);
        let commands = step(&mut sm, Some(&pinch), t0);
        assert_eq!(commands.len(), 1);
        assert!(matches!(commands[0], ActuatorCommand::MoveCursor { .. }));
    }

    #[test]
    fn gesture_only_mode_never_moves_the_cursor() {
        let mut sm = machine(|c| c.mode = ControlMode::GestureOnly);
        let t0 = Instant::now();
        assert!(step(&mut sm, Some(&pointing_at(0.5, 0.5)), t0).is_empty());
        let pinch = synthetic_hand([false; 5], (0.5, 0.5), true);
        assert!(step(&mut sm, Some(&pinch), at(t0, 0.03)).is_empty());
        assert_eq!(sm.pointer().last_position, None);
    }

    #[test]
    fn pointer_only_mode_ignores_held_gestures() {
        let mut sm = machine(|c| c.mode = ControlMode::PointerOnly);
        let t0 = Instant::now();
        for secs in [0.0, 0.6, 1.2] {
            assert!(step(&mut sm, Some(&fist()), at(t0, secs)).is_empty());
        }
        assert_eq!(sm.hold(), None);
    }

    #[test]
    fn fist_right_clicks_only_inside_window() {
        let mut sm = machine(|c| c.mode = ControlMode::GestureOnly);
        let t0 = Instant::now();

        for secs in [0.0, 0.4, 0.6, 0.9, 1.0] {
            assert!(step(&mut sm, Some(&fist()), at(t0, secs)).is_empty(), "at {}", secs);
        }
        assert_eq!(step(&mut sm, Some(&fist()), at(t0, 1.1)), vec![secondary()]);
        assert_eq!(step(&mut sm, Some(&fist()), at(t0, 1.4)), vec![secondary()]);
        assert!(step(&mut sm, Some(&fist()), at(t0, 1.5)).is_empty());
        assert!(step(&mut sm, Some(&fist()), at(t0, 2.5)).is_empty());
    }

    #[test]
    fn switching_gesture_before_window_never_fires() {
        let mut sm = machine(|c| c.mode = ControlMode::GestureOnly);
        let t0 = Instant::now();
        let peace = pose([false, true, true, false, false]);

        let mut all = Vec::new();
        for secs in [0.0, 0.3, 0.6, 0.9] {
            all.extend(step(&mut sm, Some(&fist()), at(t0, secs)));
        }
        for secs in [0.95, 1.2, 1.4] {
            all.extend(step(&mut sm, Some(&peace), at(t0, secs)));
        }
        assert!(!all.contains(&secondary()));
        assert!(all.is_empty());

        assert_eq!(
            sm.hold().map(|h| h.gesture),
            Some(Gesture::Peace),
            "hold restarted on switch"
        );
        assert_eq!(
            step(&mut sm, Some(&peace), at(t0, 2.0)),
            vec![ActuatorCommand::Click {
                button: MouseButton::Primary,
                double: true
            }]
        );
    }

    #[test]
    fn thumbs_up_and_ok_scroll_continuously() {
        let mut sm = machine(|c| c.mode = ControlMode::GestureOnly);
        let t0 = Instant::now();
        let thumbs_up = pose([true, false, false, false, false]);

        assert!(step(&mut sm, Some(&thumbs_up), t0).is_empty());
        assert!(step(&mut sm, Some(&thumbs_up), at(t0, 0.7)).is_empty());
        let up = ActuatorCommand::Scroll {
            direction: ScrollDirection::Up,
            amount: 3,
        };
        for secs in [0.9, 1.5, 3.0] {
            assert_eq!(step(&mut sm, Some(&thumbs_up), at(t0, secs)), vec![up.clone()]);
        }

        let ok = pose([true, true, false, false, false]);
        assert!(step(&mut sm, Some(&ok), at(t0, 3.1)).is_empty());
        assert_eq!(
            step(&mut sm, Some(&ok), at(t0, 4.0)),
            vec![ActuatorCommand::Scroll {
                direction: ScrollDirection::Down,
                amount: 3
            }]
        );
    }

    #[test]
    fn held_open_hand_resets_pointer_anchor() {
        let mut sm = machine(|_| {});
        let t0 = Instant::now();
        step(&mut sm, Some(&pointing_at(0.5, 0.5)), t0);
        assert!(sm.mapper().last_position().is_some());

        let open = pose([true; 5]);
        step(&mut sm, Some(&open), at(t0, 0.1));
        step(&mut sm, Some(&open), at(t0, 0.4));
        assert!(sm.mapper().last_position().is_some(), "still debouncing");
        assert!(step(&mut sm, Some(&open), at(t0, 0.7)).is_empty());
        assert_eq!(sm.mapper().last_position(), None);
        assert_eq!(sm.pointer().last_position, None);

        // Next pointing frame passes through unsmoothed.
        let commands = step(&mut sm, Some(&pointing_at(0.25, 0.25)), at(t0, 0.8));
        assert_eq!(commands, vec![ActuatorCommand::MoveCursor { x: 1440, y: 270 }]);
    }

    #[test]
    fn no_hand_deactivates_pointer() {
        let mut sm = machine(|_| {});
        let t0 = Instant::now();
        step(&mut sm, Some(&pointing_at(0.5, 0.5)), t0);
        assert!(sm.pointer().active);
        assert!(step(&mut sm, None, at(t0, 0.03)).is_empty());
        assert_eq!(sm.phase(), PointerPhase::Idle);
        assert_eq!(sm.pointer().last_position, Some((960, 540)));
    }

    #[test]
    fn hand_reentering_resumes_hold_by_default() {
        let mut sm = machine(|c| c.mode = ControlMode::GestureOnly);
        let t0 = Instant::now();

        step(&mut sm, Some(&fist()), t0);
        step(&mut sm, Some(&fist()), at(t0, 0.6));
        step(&mut sm, None, at(t0, 0.8));
        assert_eq!(sm.hold().map(|h| h.since), Some(t0));
        assert_eq!(step(&mut sm, Some(&fist()), at(t0, 1.1)), vec![secondary()]);
    }

    #[test]
    fn hand_reentering_restarts_hold_when_configured() {
        let mut sm = machine(|c| {
            c.mode = ControlMode::GestureOnly;
            c.reset_hold_on_hand_loss = true;
        });
        let t0 = Instant::now();

        step(&mut sm, Some(&fist()), t0);
        step(&mut sm, Some(&fist()), at(t0, 0.6));
        step(&mut sm, None, at(t0, 0.8));
        assert_eq!(sm.hold(), None);
        assert!(step(&mut sm, Some(&fist()), at(t0, 1.1)).is_empty());
        assert_eq!(step(&mut sm, Some(&fist()), at(t0, 2.3)), vec![secondary()]);
    }

    #[test]
    fn hand_reentering_with_other_gesture_restarts_hold() {
        let mut sm = machine(|c| c.mode = ControlMode::GestureOnly);
        let t0 = Instant::now();
        let peace = pose([false, true, true, false, false]);

        step(&mut sm, Some(&fist()), t0);
        step(&mut sm, None, at(t0, 0.5));
        assert!(step(&mut sm, Some(&peace), at(t0, 1.1)).is_empty());
        assert_eq!(sm.hold().map(|h| h.since), Some(at(t0, 1.1)));
    }

    #[test]
    fn bindings_fire_once_per_hold_inside_click_window() {
        let mut sm = machine(|c| {
            c.mode = ControlMode::GestureOnly;
            c.bindings = vec![
                GestureBinding {
                    gesture: Gesture::Three,
                    action: BoundAction::Key("space".into()),
                },
                GestureBinding {
                    gesture: Gesture::Four,
                    action: BoundAction::Text("hello".into()),
                },
            ];
        });
        let t0 = Instant::now();
        let three = pose([false, true, true, true, false]);
        let four = pose([false, true, true, true, true]);

        let mut fired = Vec::new();
        for i in 0..60 {
            let commands = step(&mut sm, Some(&three), at(t0, i as f64 * 0.033));
            if !commands.is_empty() {
                fired.push((i, commands));
            }
        }
        assert_eq!(fired.len(), 1, "{:?}", fired);
        let (frame, commands) = &fired[0];
        assert_eq!(*frame, 31);
        assert_eq!(commands, &vec![ActuatorCommand::KeyPress { key: "space".into() }]);
        assert!(sm.hold().unwrap().bindings_fired);

        // A new hold may fire again.
        let mut typed = Vec::new();
        for i in 60..120 {
            typed.extend(step(&mut sm, Some(&four), at(t0, i as f64 * 0.033)));
        }
        assert_eq!(typed, vec![ActuatorCommand::TypeText { text: "hello".into() }]);
    }

    #[test]
    fn pinch_hold_drags_from_last_position() {
        let mut sm = machine(|c| {
            c.mode = ControlMode::PointerOnly;
            c.mirror = false;
            c.smoothing = 1.0;
            c.drag = DragConfig {
                enabled: true,
                hold_secs: 0.4,
            };
        });
        let t0 = Instant::now();

        assert_eq!(
            step(&mut sm, Some(&pointing_at(0.25, 0.25)), t0),
            vec![ActuatorCommand::MoveCursor { x: 480, y: 270 }]
        );
        assert_eq!(step(&mut sm, Some(&pinching_at(0.25, 0.25)), at(t0, 0.1)), vec![primary()]);
        assert!(!sm.drag().is_dragging());

        step(&mut sm, Some(&pinching_at(0.5, 0.5)), at(t0, 0.6));
        assert_eq!(sm.drag().origin, Some((480, 270)));
        assert_eq!(sm.drag().target, Some((960, 540)));

        let commands = step(&mut sm, Some(&pointing_at(0.75, 0.75)), at(t0, 0.7));
        assert_eq!(
            commands,
            vec![
                ActuatorCommand::MoveCursor { x: 1440, y: 810 },
                ActuatorCommand::Drag {
                    from: (480, 270),
                    to: (960, 540)
                },
            ]
        );
        assert!(!sm.drag().is_dragging());
    }

    #[test]
    fn short_pinch_or_hand_loss_never_drags() {
        let mut sm = machine(|c| {
            c.mode = ControlMode::PointerOnly;
            c.drag.enabled = true;
        });
        let t0 = Instant::now();

        step(&mut sm, Some(&pointing_at(0.25, 0.25)), t0);
        step(&mut sm, Some(&pinching_at(0.25, 0.25)), at(t0, 0.1));
        let commands = step(&mut sm, Some(&pointing_at(0.5, 0.5)), at(t0, 0.2));
        assert!(!commands.iter().any(|c| matches!(c, ActuatorCommand::Drag { .. })));

        step(&mut sm, Some(&pinching_at(0.25, 0.25)), at(t0, 0.3));
        step(&mut sm, Some(&pinching_at(0.5, 0.5)), at(t0, 0.9));
        assert!(sm.drag().is_dragging());
        step(&mut sm, None, at(t0, 1.0));
        assert_eq!(sm.drag(), DragState::default());
    }

    #[test]
    fn reset_clears_anchor_and_drag() {
        let mut sm = machine(|c| c.drag.enabled = true);
        let t0 = Instant::now();
        step(&mut sm, Some(&pointing_at(0.5, 0.5)), t0);
        sm.reset();
        assert_eq!(sm.mapper().last_position(), None);
        assert_eq!(sm.pointer().last_position, None);
        assert_eq!(sm.drag(), DragState::default());
    }

    #[test]
    fn pointing_scenario_end_to_end() {
        let hand = pointing_at(0.5, 0.5);
        let mut sm = machine(|_| {});
        assert_eq!(sm.classifier().classify(Some(&hand)), Gesture::Point);
        assert_eq!(
            sm.classifier().index_tip_pixel_position(&hand, 1280, 720),
            Some((640, 360))
        );
        let commands = step(&mut sm, Some(&hand), Instant::now());
        assert_eq!(commands, vec![ActuatorCommand::MoveCursor { x: 960, y: 540 }]);
    }
}
