// src/landmarks.rs
use nalgebra::Vector3;
use serde::Serialize;

pub const LANDMARK_COUNT: usize = 21;

// x and y in [0, 1] with y growing downward, z is relative depth.
pub type Landmark = Vector3<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn mcp(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbMcp,
            Finger::Index => HandLandmark::IndexMcp,
            Finger::Middle => HandLandmark::MiddleMcp,
            Finger::Ring => HandLandmark::RingMcp,
            Finger::Pinky => HandLandmark::PinkyMcp,
        }
    }

    pub fn pip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbIp,
            Finger::Index => HandLandmark::IndexPip,
            Finger::Middle => HandLandmark::MiddlePip,
            Finger::Ring => HandLandmark::RingPip,
            Finger::Pinky => HandLandmark::PinkyPip,
        }
    }

    // Next joint out from the middle one. The thumb has no DIP, so its tip.
    pub fn dip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbTip,
            Finger::Index => HandLandmark::IndexDip,
            Finger::Middle => HandLandmark::MiddleDip,
            Finger::Ring => HandLandmark::RingDip,
            Finger::Pinky => HandLandmark::PinkyDip,
        }
    }

    pub fn tip(self) -> HandLandmark {
        match self {
            Finger::Thumb => HandLandmark::ThumbTip,
            Finger::Index => HandLandmark::IndexTip,
            Finger::Middle => HandLandmark::MiddleTip,
            Finger::Ring => HandLandmark::RingTip,
            Finger::Pinky => HandLandmark::PinkyTip,
        }
    }

    pub fn position(self) -> usize {
        match self {
            Finger::Thumb => 0,
            Finger::Index => 1,
            Finger::Middle => 2,
            Finger::Ring => 3,
            Finger::Pinky => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "left" => Handedness::Left,
            "right" => Handedness::Right,
            _ => Handedness::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
            Handedness::Unknown => "Unknown",
        }
    }
}

// May hold fewer than LANDMARK_COUNT points. Consumers treat that as incomplete.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    landmarks: Vec<Landmark>,
    handedness: Handedness,
}

impl HandObservation {
    pub fn new(landmarks: Vec<Landmark>, handedness: Handedness) -> Self {
        Self {
            landmarks,
            handedness,
        }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= LANDMARK_COUNT
    }

    pub fn get(&self, landmark: HandLandmark) -> Option<&Landmark> {
        self.landmarks.get(landmark.index())
    }
}

pub fn synthetic_hand(extended: [bool; 5], center: (f64, f64), pinch: bool) -> HandObservation {
    let (cx, cy) = center;
    let mut points = vec![Vector3::zeros(); LANDMARK_COUNT];

    points[HandLandmark::Wrist.index()] = Vector3::new(cx, cy + 0.20, 0.0);

    // Thumb sits on the +x side of the wrist.
    points[HandLandmark::ThumbCmc.index()] = Vector3::new(cx + 0.03, cy + 0.15, 0.0);
    points[HandLandmark::ThumbMcp.index()] = Vector3::new(cx + 0.06, cy + 0.10, 0.0);
    points[HandLandmark::ThumbIp.index()] = Vector3::new(cx + 0.08, cy + 0.06, 0.0);
    points[HandLandmark::ThumbTip.index()] = if extended[0] {
        Vector3::new(cx + 0.12, cy + 0.03, 0.0)
    } else {
        Vector3::new(cx + 0.05, cy + 0.06, 0.0)
    };

    let columns = [
        (Finger::Index, cx + 0.05),
        (Finger::Middle, cx + 0.01),
        (Finger::Ring, cx - 0.03),
        (Finger::Pinky, cx - 0.07),
    ];
    for (finger, x) in columns {
        let is_extended = extended[finger.position()];
        points[finger.mcp().index()] = Vector3::new(x, cy, 0.0);
        points[finger.pip().index()] = Vector3::new(x, cy - 0.05, 0.0);
        let (dip_y, tip_y) = if is_extended {
            (cy - 0.10, cy - 0.15)
        } else {
            (cy - 0.03, cy + 0.01)
        };
        points[finger.dip().index()] = Vector3::new(x, dip_y, 0.0);
        points[finger.tip().index()] = Vector3::new(x, tip_y, 0.0);
    }

    if pinch {
        let index_tip = points[HandLandmark::IndexTip.index()];
        points[HandLandmark::ThumbTip.index()] =
            Vector3::new(index_tip.x + 0.01, index_tip.y, index_tip.z);
    }

    HandObservation::new(points, Handedness::Right)
}
