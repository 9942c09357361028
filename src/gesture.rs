// src/gesture.rs
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::distance3d;
use crate::landmarks::{Finger, HandLandmark, HandObservation};

pub const CLICK_THRESHOLD: f64 = 0.03;
pub const PINCH_MAX_DISTANCE: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    Fist,
    Point,
    ThumbsUp,
    Peace,
    Ok,
    Three,
    Four,
    OpenHand,
    Unknown,
    NoHand,
}

impl Gesture {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Fist => "FIST",
            Gesture::Point => "POINT",
            Gesture::ThumbsUp => "THUMBS_UP",
            Gesture::Peace => "PEACE",
            Gesture::Ok => "OK",
            Gesture::Three => "THREE",
            Gesture::Four => "FOUR",
            Gesture::OpenHand => "OPEN_HAND",
            Gesture::Unknown => "UNKNOWN",
            Gesture::NoHand => "NO_HAND",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerExtension([bool; 5]);

impl FingerExtension {
    pub fn from_observation(hand: &HandObservation) -> Option<Self> {
        if !hand.is_complete() {
            return None;
        }
        let mut flags = [false; 5];
        for finger in Finger::ALL {
            flags[finger.position()] = is_finger_extended(hand, finger)?;
        }
        Some(Self(flags))
    }

    #[cfg(test)]
    pub fn from_flags(flags: [bool; 5]) -> Self {
        Self(flags)
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.0[finger.position()]
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&e| e).count()
    }

    pub fn only(&self, fingers: &[Finger]) -> bool {
        Finger::ALL
            .iter()
            .all(|f| self.is_extended(*f) == fingers.contains(f))
    }

    pub fn gesture(&self) -> Gesture {
        use Finger::*;

        match self.count() {
            0 => Gesture::Fist,
            1 if self.only(&[Index]) => Gesture::Point,
            1 if self.only(&[Thumb]) => Gesture::ThumbsUp,
            2 if self.only(&[Index, Middle]) => Gesture::Peace,
            2 if self.only(&[Index, Thumb]) => Gesture::Ok,
            3 if self.only(&[Index, Middle, Ring]) => Gesture::Three,
            4 if !self.is_extended(Thumb) => Gesture::Four,
            5 => Gesture::OpenHand,
            _ => Gesture::Unknown,
        }
    }
}

// The thumb folds sideways, so compare x of tip and IP oriented by the side
// of the wrist. Other fingers are extended when the tip is above the PIP.
fn is_finger_extended(hand: &HandObservation, finger: Finger) -> Option<bool> {
    let tip = hand.get(finger.tip())?;
    let pip = hand.get(finger.pip())?;

    let extended = match finger {
        Finger::Thumb => {
            let wrist = hand.get(HandLandmark::Wrist)?;
            if wrist.x < tip.x {
                tip.x > pip.x
            } else {
                tip.x < pip.x
            }
        }
        Finger::Index | Finger::Middle | Finger::Ring | Finger::Pinky => tip.y < pip.y,
    };
    Some(extended)
}

/// Stateless per-frame classifier.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    pub click_threshold: f64,
    pub pinch_max_distance: f64,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self {
            click_threshold: CLICK_THRESHOLD,
            pinch_max_distance: PINCH_MAX_DISTANCE,
        }
    }
}

impl GestureClassifier {
    pub fn new(click_threshold: f64, pinch_max_distance: f64) -> Self {
        Self {
            click_threshold,
            pinch_max_distance,
        }
    }

    pub fn classify(&self, hand: Option<&HandObservation>) -> Gesture {
        let Some(hand) = hand else {
            return Gesture::NoHand;
        };
        match FingerExtension::from_observation(hand) {
            Some(extension) => extension.gesture(),
            None => Gesture::Unknown,
        }
    }

    pub fn is_click_gesture(&self, hand: Option<&HandObservation>) -> bool {
        match hand.and_then(tip_distance) {
            Some(distance) => distance < self.click_threshold,
            None => false,
        }
    }

    pub fn pinch_strength(&self, hand: Option<&HandObservation>) -> f64 {
        match hand.and_then(tip_distance) {
            Some(distance) => (distance / self.pinch_max_distance).min(1.0),
            None => 1.0,
        }
    }

    pub fn index_tip_pixel_position(
        &self,
        hand: &HandObservation,
        frame_width: u32,
        frame_height: u32,
    ) -> Option<(i32, i32)> {
        if !hand.is_complete() {
            return None;
        }
        let tip = hand.get(HandLandmark::IndexTip)?;
        Some((
            (tip.x * frame_width as f64) as i32,
            (tip.y * frame_height as f64) as i32,
        ))
    }
}

fn tip_distance(hand: &HandObservation) -> Option<f64> {
    if !hand.is_complete() {
        return None;
    }
    let thumb = hand.get(HandLandmark::ThumbTip)?;
    let index = hand.get(HandLandmark::IndexTip)?;
    Some(distance3d(thumb, index))
}
