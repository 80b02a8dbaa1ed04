//! Left/right classification of a detected hand.
//!
//! No single geometric cue reliably tells a left hand from a right hand once the hand is rotated or
//! the camera image is mirrored. Instead, three independent cues vote, and two sanity checks
//! ("gates") detect unusual hand orientations. When either gate fails the hand is reported as
//! [`Chirality::Right`], so that an ambiguous hand is never confidently reported as a left hand.

use std::fmt;

use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::geometry::cross_z;
use crate::num::TotalF32;

use super::landmark::{HandLandmarks, LandmarkIdx};

/// Whether a hand is a left or a right hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Chirality {
    Left,
    Right,
}

impl fmt::Display for Chirality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chirality::Left => f.write_str("left"),
            Chirality::Right => f.write_str("right"),
        }
    }
}

/// Landmarks whose depth must agree for the palm to count as facing the camera.
const PALM_DEPTH_LANDMARKS: [LandmarkIdx; 4] = {
    use LandmarkIdx::*;
    [ThumbCmc, IndexFingerMcp, MiddleFingerMcp, PinkyMcp]
};

/// Knuckles that must appear in order along the X axis.
const KNUCKLES: [LandmarkIdx; 4] = {
    use LandmarkIdx::*;
    [IndexFingerMcp, MiddleFingerMcp, RingFingerMcp, PinkyMcp]
};

/// The individual signals that go into a [`Chirality`] decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChiralityVotes {
    /// The pinky MCP lies left of the thumb's metacarpal joint.
    pub pinky_left_of_thumb: bool,
    /// The wrist→middle MCP and wrist→thumb vectors have a positive cross product.
    pub positive_orientation: bool,
    /// The thumb tip lies left of the wrist.
    pub thumb_left_of_wrist: bool,
    /// Spread of the depth values of [`PALM_DEPTH_LANDMARKS`].
    pub palm_depth_range: f32,
    /// The knuckle X coordinates are sorted, in either direction.
    pub knuckles_ordered: bool,
}

impl ChiralityVotes {
    /// Maximum [`ChiralityVotes::palm_depth_range`] for the palm to count as facing the camera.
    pub const MAX_PALM_DEPTH_RANGE: f32 = 0.1;

    /// Computes all signals for `hand`.
    pub fn analyze(hand: &HandLandmarks) -> Self {
        let wrist = hand.landmark(LandmarkIdx::Wrist);
        let thumb_cmc = hand.landmark(LandmarkIdx::ThumbCmc);
        let thumb_tip = hand.landmark(LandmarkIdx::ThumbTip);
        let middle_mcp = hand.landmark(LandmarkIdx::MiddleFingerMcp);
        let pinky_mcp = hand.landmark(LandmarkIdx::PinkyMcp);

        let palm_depth_range = match PALM_DEPTH_LANDMARKS
            .iter()
            .map(|&idx| TotalF32(hand.landmark(idx).z()))
            .minmax()
        {
            MinMaxResult::MinMax(min, max) => max.0 - min.0,
            MinMaxResult::OneElement(_) | MinMaxResult::NoElements => 0.0,
        };

        let knuckles = KNUCKLES.map(|idx| hand.landmark(idx).x());
        let increasing = knuckles.iter().tuple_windows().all(|(a, b)| a <= b);
        let decreasing = knuckles.iter().tuple_windows().all(|(a, b)| a >= b);

        Self {
            pinky_left_of_thumb: pinky_mcp.x() < thumb_cmc.x(),
            positive_orientation: cross_z(wrist, middle_mcp, thumb_cmc) > 0.0,
            thumb_left_of_wrist: thumb_tip.x() < wrist.x(),
            palm_depth_range,
            knuckles_ordered: increasing || decreasing,
        }
    }

    /// Returns whether the palm faces the camera, judged by the depth of its knuckles.
    ///
    /// A NaN depth range never passes.
    pub fn palm_facing_camera(&self) -> bool {
        self.palm_depth_range < Self::MAX_PALM_DEPTH_RANGE
    }

    /// Returns whether both orientation gates pass, making the votes trustworthy.
    pub fn gates_pass(&self) -> bool {
        self.palm_facing_camera() && self.knuckles_ordered
    }

    /// Number of signals voting for a left hand (0 to 3).
    pub fn left_votes(&self) -> usize {
        [
            self.pinky_left_of_thumb,
            self.positive_orientation,
            self.thumb_left_of_wrist,
        ]
        .into_iter()
        .filter(|&vote| vote)
        .count()
    }

    /// Combines the signals into a final decision.
    pub fn chirality(&self) -> Chirality {
        if self.gates_pass() && self.left_votes() >= 2 {
            Chirality::Left
        } else {
            Chirality::Right
        }
    }
}

/// Classifies `hand` as a left or right hand.
///
/// See the [module documentation](self) for how the decision is made.
pub fn classify(hand: &HandLandmarks) -> Chirality {
    let votes = ChiralityVotes::analyze(hand);
    let chirality = votes.chirality();
    log::trace!("{:?} -> {}", votes, chirality);
    chirality
}
