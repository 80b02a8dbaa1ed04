//! Hand landmark topology.

use std::fmt;

use serde::Serialize;

use crate::landmark::{Landmark, Landmarks, Position};

/// The 21 landmarks of a single detected hand.
///
/// Positions follow the [`LandmarkIdx`] order. The length is checked on construction, so indexing
/// by [`LandmarkIdx`] can never go out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    landmarks: Landmarks,
}

impl HandLandmarks {
    pub const NUM_LANDMARKS: usize = 21;

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Returns the landmark with the given name.
    #[inline]
    pub fn landmark(&self, idx: LandmarkIdx) -> Landmark {
        self.landmarks.get(idx as usize)
    }

    /// Returns the tip landmark of `finger`.
    #[inline]
    pub fn tip(&self, finger: Finger) -> Landmark {
        self.landmark(finger.tip())
    }

    /// Returns the middle joint landmark of `finger`.
    #[inline]
    pub fn mid(&self, finger: Finger) -> Landmark {
        self.landmark(finger.mid())
    }

    /// Returns the base joint landmark of `finger`.
    #[inline]
    pub fn base(&self, finger: Finger) -> Landmark {
        self.landmark(finger.base())
    }
}

impl TryFrom<Landmarks> for HandLandmarks {
    type Error = anyhow::Error;

    fn try_from(landmarks: Landmarks) -> anyhow::Result<Self> {
        anyhow::ensure!(
            landmarks.len() == Self::NUM_LANDMARKS,
            "hand landmark set must contain {} landmarks, got {}",
            Self::NUM_LANDMARKS,
            landmarks.len(),
        );
        Ok(Self { landmarks })
    }
}

impl TryFrom<Vec<Position>> for HandLandmarks {
    type Error = anyhow::Error;

    fn try_from(positions: Vec<Position>) -> anyhow::Result<Self> {
        Landmarks::from(positions).try_into()
    }
}

/// Names for the hand pose landmarks.
///
/// # Terminology
///
/// - **CMC**: [Carpometacarpal joint], the lowest joint of the thumb, located near the wrist.
/// - **MCP**: [Metacarpophalangeal joint], the lower joint forming the knuckles near the palm of
///   the hand.
/// - **PIP**: Proximal Interphalangeal joint, the joint between the MCP and DIP.
/// - **DIP**: Distal Interphalangeal joint, the highest joint of a finger.
/// - **Tip**: This landmark is just placed on the tip of the finger, above the DIP.
///
/// [Carpometacarpal joint]: https://en.wikipedia.org/wiki/Carpometacarpal_joint
/// [Metacarpophalangeal joint]: https://en.wikipedia.org/wiki/Metacarpophalangeal_joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LandmarkIdx {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexFingerMcp,
    IndexFingerPip,
    IndexFingerDip,
    IndexFingerTip,
    MiddleFingerMcp,
    MiddleFingerPip,
    MiddleFingerDip,
    MiddleFingerTip,
    RingFingerMcp,
    RingFingerPip,
    RingFingerDip,
    RingFingerTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// The five fingers of a hand, in the order used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Finger {
    Thumb = 0,
    Index = 1,
    Middle = 2,
    Ring = 3,
    Pinky = 4,
}

const FINGER_TIPS: [LandmarkIdx; 5] = {
    use LandmarkIdx::*;
    [
        ThumbTip,
        IndexFingerTip,
        MiddleFingerTip,
        RingFingerTip,
        PinkyTip,
    ]
};

const FINGER_MIDS: [LandmarkIdx; 5] = {
    use LandmarkIdx::*;
    [
        ThumbIp,
        IndexFingerPip,
        MiddleFingerPip,
        RingFingerPip,
        PinkyPip,
    ]
};

const FINGER_BASES: [LandmarkIdx; 5] = {
    use LandmarkIdx::*;
    [
        ThumbMcp,
        IndexFingerMcp,
        MiddleFingerMcp,
        RingFingerMcp,
        PinkyMcp,
    ]
};

const FINGER_NAMES: [&str; 5] = ["Thumb", "Index", "Middle", "Ring", "Pinky"];

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    #[inline]
    pub fn tip(self) -> LandmarkIdx {
        FINGER_TIPS[self as usize]
    }

    /// The joint between base and tip (IP for the thumb, PIP for the other fingers).
    #[inline]
    pub fn mid(self) -> LandmarkIdx {
        FINGER_MIDS[self as usize]
    }

    /// The joint closest to the palm (MCP).
    #[inline]
    pub fn base(self) -> LandmarkIdx {
        FINGER_BASES[self as usize]
    }

    pub fn name(self) -> &'static str {
        FINGER_NAMES[self as usize]
    }
}

impl fmt::Display for Finger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
