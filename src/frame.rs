//! Per-frame classification of every detected hand and face.
//!
//! A [`Frame`] holds the landmark sets an external detector found in one video frame.
//! [`FrameClassifier::classify`] labels each of them and [`FrameResult`] combines the labels.
//!
//! [`FrameInput`] and [`FrameOutput`] are the JSON representations used by the `nexus-vision`
//! binary.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    face::{
        expression::{self, ExpressionMetrics, ExpressionParams, ExpressionResult},
        landmark::FaceLandmarks,
    },
    hand::{
        chirality::{self, Chirality},
        fingers::{self, ExtendedFingers},
        landmark::{Finger, HandLandmarks},
    },
    landmark::Position,
    resolution::Resolution,
    timer::Timer,
};

/// Landmarks of all hands and faces detected in one frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub resolution: Resolution,
    pub hands: Vec<HandLandmarks>,
    pub faces: Vec<FaceLandmarks>,
}

impl Frame {
    /// Creates a frame without any detections.
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            hands: Vec::new(),
            faces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandResult {
    pub chirality: Chirality,
    pub fingers: ExtendedFingers,
}

/// Classification results for one [`Frame`], in detection order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameResult {
    pub hands: Vec<HandResult>,
    pub faces: Vec<ExpressionResult>,
}

impl FrameResult {
    /// Returns the number of extended fingers on the left hand plus those on the right hand.
    ///
    /// If several hands in the frame share a chirality, only the last of them is counted. A hand
    /// that wasn't detected contributes nothing.
    pub fn total_extended_fingers(&self) -> usize {
        let last = |chirality: Chirality| {
            self.hands
                .iter()
                .rev()
                .find(|hand| hand.chirality == chirality)
                .map_or(0, |hand| hand.fingers.len())
        };

        last(Chirality::Left) + last(Chirality::Right)
    }
}

/// Runs the hand and face classifiers over whole frames.
pub struct FrameClassifier {
    params: ExpressionParams,
    t_chirality: Timer,
    t_fingers: Timer,
    t_expression: Timer,
}

impl FrameClassifier {
    pub fn new(params: ExpressionParams) -> Self {
        Self {
            params,
            t_chirality: Timer::new("chirality"),
            t_fingers: Timer::new("fingers"),
            t_expression: Timer::new("expression"),
        }
    }

    #[inline]
    pub fn params(&self) -> &ExpressionParams {
        &self.params
    }

    pub fn classify(&self, frame: &Frame) -> FrameResult {
        self.classify_with_metrics(frame).0
    }

    /// Like [`FrameClassifier::classify`], but also returns the [`ExpressionMetrics`] of every
    /// face, in the same order as [`FrameResult::faces`].
    pub fn classify_with_metrics(&self, frame: &Frame) -> (FrameResult, Vec<ExpressionMetrics>) {
        let hands = frame
            .hands
            .iter()
            .map(|hand| {
                let chirality = self.t_chirality.time(|| chirality::classify(hand));
                let fingers = self.t_fingers.time(|| fingers::classify(hand, chirality));
                HandResult { chirality, fingers }
            })
            .collect::<Vec<_>>();

        let (metrics, faces): (Vec<_>, Vec<_>) = frame
            .faces
            .iter()
            .map(|face| {
                self.t_expression
                    .time(|| expression::analyze(face, frame.resolution, &self.params))
            })
            .unzip();

        let result = FrameResult { hands, faces };
        log::debug!(
            "{}: {} hand(s), {} face(s), {} finger(s) {:?}",
            frame.resolution,
            result.hands.len(),
            result.faces.len(),
            result.total_extended_fingers(),
            result.faces.iter().map(|f| f.expression()).collect::<Vec<_>>(),
        );
        (result, metrics)
    }

    /// Returns profiling timers for the classification stages.
    pub fn timers(&self) -> impl IntoIterator<Item = &Timer> + '_ {
        [&self.t_chirality, &self.t_fingers, &self.t_expression]
    }
}

impl Default for FrameClassifier {
    fn default() -> Self {
        Self::new(ExpressionParams::default())
    }
}

/// JSON representation of a [`Frame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub hands: Vec<Vec<Position>>,
    #[serde(default)]
    pub faces: Vec<Vec<Position>>,
}

impl TryFrom<FrameInput> for Frame {
    type Error = anyhow::Error;

    fn try_from(input: FrameInput) -> anyhow::Result<Self> {
        let hands = input
            .hands
            .into_iter()
            .enumerate()
            .map(|(i, hand)| HandLandmarks::try_from(hand).with_context(|| format!("hand #{i}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let faces = input
            .faces
            .into_iter()
            .enumerate()
            .map(|(i, face)| FaceLandmarks::try_from(face).with_context(|| format!("face #{i}")))
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Frame {
            resolution: Resolution::new(input.width, input.height),
            hands,
            faces,
        })
    }
}

/// JSON representation of a [`FrameResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameOutput {
    pub hands: Vec<HandOutput>,
    pub faces: Vec<ExpressionResult>,
    pub total_fingers: usize,
    /// Per-face measurements, only present if requested with [`FrameOutput::with_metrics`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<Vec<ExpressionMetrics>>,
}

impl FrameOutput {
    pub fn with_metrics(self, metrics: Vec<ExpressionMetrics>) -> Self {
        Self {
            metrics: Some(metrics),
            ..self
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandOutput {
    pub chirality: Chirality,
    pub fingers: Vec<Finger>,
    pub count: usize,
}

impl From<&FrameResult> for FrameOutput {
    fn from(result: &FrameResult) -> Self {
        Self {
            hands: result
                .hands
                .iter()
                .map(|hand| HandOutput {
                    chirality: hand.chirality,
                    fingers: hand.fingers.iter().collect(),
                    count: hand.fingers.len(),
                })
                .collect(),
            faces: result.faces.clone(),
            total_fingers: result.total_extended_fingers(),
            metrics: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rayon::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::{
        face::expression::Expression,
        test::{self, FaceShape, FACE_RES},
    };

    fn fingers(list: &[Finger]) -> ExtendedFingers {
        list.iter().copied().collect()
    }

    fn hand_result(chirality: Chirality, list: &[Finger]) -> HandResult {
        HandResult {
            chirality,
            fingers: fingers(list),
        }
    }

    #[test]
    fn empty_frame() {
        let result = FrameClassifier::default().classify(&Frame::new(FACE_RES));
        assert!(result.hands.is_empty());
        assert!(result.faces.is_empty());
        assert_eq!(result.total_extended_fingers(), 0);
    }

    #[test]
    fn last_hand_per_chirality_wins() {
        use Finger::*;

        let result = FrameResult {
            hands: vec![
                hand_result(Chirality::Left, &[Index, Middle, Ring]),
                hand_result(Chirality::Right, &[Thumb]),
                hand_result(Chirality::Left, &[Index]),
            ],
            faces: Vec::new(),
        };
        assert_eq!(result.total_extended_fingers(), 2);

        let result = FrameResult {
            hands: vec![
                hand_result(Chirality::Right, &[Index, Middle]),
                hand_result(Chirality::Right, &[]),
            ],
            faces: Vec::new(),
        };
        assert_eq!(result.total_extended_fingers(), 0);
    }

    #[test]
    fn classifies_in_detection_order() {
        let mut frame = Frame::new(FACE_RES);
        frame.hands = vec![test::open_hand(), test::mirror(&test::open_hand())];
        frame.faces = vec![FaceShape::RESTING.build(), FaceShape::SURPRISED.build()];

        let classifier = FrameClassifier::default();
        let result = classifier.classify(&frame);

        assert_eq!(result.hands[0].chirality, Chirality::Right);
        assert_eq!(result.hands[1].chirality, Chirality::Left);
        assert_eq!(result.faces[0].expression(), Expression::Neutral);
        assert_eq!(result.faces[1].expression(), Expression::Surprise);
        assert_eq!(
            result.total_extended_fingers(),
            result.hands[0].fingers.len() + result.hands[1].fingers.len()
        );

        let counts = classifier.timers().into_iter().map(|t| t.count()).collect::<Vec<_>>();
        assert_eq!(counts, [2, 2, 2]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let mut rng = fastrand::Rng::with_seed(0x5eed);
        let frames = (0..64)
            .map(|_| {
                let mut frame = Frame::new(FACE_RES);
                frame.hands = (0..rng.usize(0..4)).map(|_| test::random_hand(&mut rng)).collect();
                frame.faces = (0..rng.usize(0..3)).map(|_| test::random_face(&mut rng)).collect();
                frame
            })
            .collect::<Vec<_>>();

        let classifier = FrameClassifier::default();
        let sequential = frames.iter().map(|f| classifier.classify(f)).collect::<Vec<_>>();
        let parallel = frames.par_iter().map(|f| classifier.classify(f)).collect::<Vec<_>>();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn metrics_follow_face_order() {
        let mut frame = Frame::new(FACE_RES);
        frame.faces = vec![FaceShape::SURPRISED.build(), FaceShape::RESTING.build()];

        let classifier = FrameClassifier::default();
        let (result, metrics) = classifier.classify_with_metrics(&frame);
        assert_eq!(result, classifier.classify(&frame));
        assert_eq!(metrics.len(), 2);
        assert!(metrics[0].all_surprise_components());
        assert!(!metrics[1].eyes_open);
        for (metrics, face) in metrics.iter().zip(&result.faces) {
            assert_eq!(metrics.decide(classifier.params()), *face);
        }

        let plain = serde_json::to_value(FrameOutput::from(&result)).unwrap();
        assert!(plain.get("metrics").is_none());

        let output = FrameOutput::from(&result).with_metrics(metrics);
        let detailed = serde_json::to_value(output).unwrap();
        assert_eq!(detailed["metrics"][0]["eyes_open"], true);
        assert_eq!(detailed["metrics"][1]["eyes_open"], false);
        assert_eq!(detailed["faces"], plain["faces"]);
    }

    #[test]
    fn input_defaults_to_no_detections() {
        let input: FrameInput = serde_json::from_str(r#"{"width": 640, "height": 480}"#).unwrap();
        let frame = Frame::try_from(input).unwrap();
        assert_eq!(frame.resolution, Resolution::RES_VGA);
        assert!(frame.hands.is_empty());
        assert!(frame.faces.is_empty());
    }

    #[test]
    fn input_rejects_bad_landmark_count() {
        let input = FrameInput {
            width: 640,
            height: 480,
            hands: vec![vec![[0.5; 3]; 21], vec![[0.5; 3]; 20]],
            faces: Vec::new(),
        };
        let err = Frame::try_from(input).unwrap_err();
        assert!(format!("{err:#}").contains("hand #1"), "{err:#}");
    }

    #[test]
    fn output_json() {
        let result = FrameResult {
            hands: vec![hand_result(Chirality::Left, &[Finger::Middle, Finger::Index])],
            faces: vec![
                FrameClassifier::default()
                    .classify(&Frame {
                        resolution: FACE_RES,
                        hands: Vec::new(),
                        faces: vec![FaceShape::RESTING.build()],
                    })
                    .faces[0],
            ],
        };

        let value = serde_json::to_value(FrameOutput::from(&result)).unwrap();
        assert_eq!(
            value,
            json!({
                "hands": [{"chirality": "Left", "fingers": ["Index", "Middle"], "count": 2}],
                "faces": [{"expression": "Neutral", "confidence": 1.0}],
                "total_fingers": 2,
            })
        );
    }
}
