//! Facial expression classification.
//!
//! Expressions are derived from a few distances between face landmarks, measured in pixels:
//!
//! - A **smile** widens the mouth relative to its height and lifts the mouth corners above the
//!   lips' midline.
//! - **Surprise** opens the eyes and mouth and raises the eyebrows.
//!
//! All surprise measurements are normalized by the *face diagonal*, the hypotenuse of the face
//! height (eyebrow to lower lip) and the distance between the eyes. Unlike either dimension on its
//! own, the diagonal changes little when the head is tilted.
//!
//! Each expression gets a confidence in range 0.0 to 1.0 from how far its score exceeds the
//! configured threshold. The expression with the higher confidence wins, as long as it exceeds
//! [`ExpressionParams::min_confidence`]; otherwise the face is [`Expression::Neutral`]. When both
//! confidences are exactly equal, neither wins and the result is also neutral.

use std::fmt;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::pixel;
use crate::num::{ratio, unit};
use crate::resolution::Resolution;

use super::landmark::{FaceLandmarks, Region};

const SMILE_RATIO_WEIGHT: f32 = 0.7;
const SMILE_CORNER_WEIGHT: f32 = 5.0;
const SMILE_CONFIDENCE_SCALE: f32 = 0.5;

/// Face diagonal fractions used to normalize the surprise components.
const EYE_HEIGHT_SCALE: f32 = 0.5;
const EYEBROW_SCALE: f32 = 0.3;
const MOUTH_OPENNESS_SCALE: f32 = 0.3;

const EYE_HEIGHT_WEIGHT: f32 = 0.4;
const EYEBROW_WEIGHT: f32 = 0.3;
const MOUTH_OPENNESS_WEIGHT: f32 = 0.3;

/// Fraction of the surprise threshold the eye height has to exceed to count as "wide open".
const EYES_OPEN_FACTOR: f32 = 0.8;
const MIN_EYEBROW_ELEVATION: f32 = 0.05;

/// Applied to the surprise score when eyes, eyebrows and mouth all indicate surprise.
const SURPRISE_SCORE_BOOST: f32 = 1.5;
const SURPRISE_CONFIDENCE_SCALE: f32 = 2.5;
const SURPRISE_CONFIDENCE_BOOST: f32 = 1.2;

// Region-relative landmark positions.
const MOUTH_LEFT: usize = 0;
const MOUTH_RIGHT: usize = 10;
const MOUTH_TOP: usize = 3;
const MOUTH_BOTTOM: usize = 13;
const EYE_TOP: usize = 3;
const EYE_BOTTOM: usize = 5;
const LEFT_EYE_CORNER: usize = 0;
const RIGHT_EYE_CORNER: usize = 8;
const EYEBROW_REFERENCE: usize = 0;

/// Tuning parameters of the expression classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionParams {
    /// Smile score at which the smile confidence starts rising above 0.
    pub smile_threshold: f32,
    /// Surprise score at which the surprise confidence starts rising above 0. Also scales the
    /// minimum eye height of a surprised face.
    pub surprise_threshold: f32,
    /// Normalized mouth openness above which the mouth counts as open.
    pub mouth_openness_threshold: f32,
    /// Unused by the classifier; kept so that existing parameter files stay valid.
    pub neutral_range: f32,
    /// Confidence an expression needs to be reported instead of [`Expression::Neutral`].
    pub min_confidence: f32,
}

impl Default for ExpressionParams {
    fn default() -> Self {
        Self {
            smile_threshold: 2.0,
            surprise_threshold: 0.12,
            mouth_openness_threshold: 0.2,
            neutral_range: 0.1,
            min_confidence: 0.4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Expression {
    Smile,
    Surprise,
    Neutral,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Expression::Smile => "smile",
            Expression::Surprise => "surprise",
            Expression::Neutral => "neutral",
        })
    }
}

/// An [`Expression`] together with the classifier's confidence in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpressionResult {
    expression: Expression,
    confidence: f32,
}

impl ExpressionResult {
    #[inline]
    pub fn expression(&self) -> Expression {
        self.expression
    }

    /// Returns the confidence, in range 0.0 to 1.0.
    #[inline]
    pub fn confidence(&self) -> f32 {
        self.confidence
    }
}

impl fmt::Display for ExpressionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.0}%)", self.expression, self.confidence * 100.0)
    }
}

/// Intermediate measurements of the expression classifier.
///
/// Useful for debugging and tuning [`ExpressionParams`]. Lengths are in pixels, everything else is
/// normalized.
///
/// Non-finite values serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpressionMetrics {
    pub mouth_width: f32,
    pub mouth_height: f32,
    /// Mouth width divided by mouth height, 0.0 for a closed mouth.
    pub mouth_ratio: f32,
    /// Average height of the mouth corners above the lips' midline, divided by the eye distance.
    pub corner_elevation: f32,
    pub smile_score: f32,

    pub face_diagonal: f32,
    pub eye_height: f32,
    pub eyebrow_elevation: f32,
    pub mouth_openness: f32,
    pub mouth_open: bool,
    pub eyes_open: bool,
    pub eyebrows_raised: bool,
    pub surprise_score: f32,

    pub smile_confidence: f32,
    pub surprise_confidence: f32,
}

impl ExpressionMetrics {
    /// Measures `face`, which was detected in a frame of size `res`.
    pub fn compute(face: &FaceLandmarks, res: Resolution, params: &ExpressionParams) -> Self {
        let px = |region: Region, n: usize| -> Point2<f32> {
            let p = pixel(face.landmark(region, n), res);
            Point2::new(p.x as f32, p.y as f32)
        };
        let mean_y = |region: Region| -> f32 {
            let sum: f32 = face.region(region).map(|lm| pixel(lm, res).y as f32).sum();
            sum / region.indices().len() as f32
        };

        // Smile.
        let mouth_left = px(Region::MouthOutline, MOUTH_LEFT);
        let mouth_right = px(Region::MouthOutline, MOUTH_RIGHT);
        let mouth_top = px(Region::MouthOutline, MOUTH_TOP);
        let mouth_bottom = px(Region::MouthOutline, MOUTH_BOTTOM);

        let mouth_width = (mouth_right.x - mouth_left.x).abs();
        let mouth_height = (mouth_bottom.y - mouth_top.y).abs();
        let mouth_ratio = ratio(mouth_width, mouth_height);

        // Y points down, so corners above the midline have a positive elevation.
        let lip_midline = (mouth_top.y + mouth_bottom.y) / 2.0;
        let corner_elevation_px =
            ((lip_midline - mouth_left.y) + (lip_midline - mouth_right.y)) / 2.0;

        let eye_distance = (px(Region::LeftEye, LEFT_EYE_CORNER).x
            - px(Region::RightEye, RIGHT_EYE_CORNER).x)
            .abs();
        let corner_elevation = ratio(corner_elevation_px, eye_distance);
        let smile_score =
            mouth_ratio * SMILE_RATIO_WEIGHT + corner_elevation * SMILE_CORNER_WEIGHT;

        // Surprise.
        let face_height = (px(Region::LeftEyebrow, EYEBROW_REFERENCE).y - mouth_bottom.y).abs();
        let face_diagonal = face_height.hypot(eye_distance);

        let eye_height = |region: Region| (px(region, EYE_BOTTOM).y - px(region, EYE_TOP).y).abs();
        let avg_eye_height = (eye_height(Region::LeftEye) + eye_height(Region::RightEye)) / 2.0;

        let avg_eyebrow_elevation = ((mean_y(Region::LeftEye) - mean_y(Region::LeftEyebrow))
            + (mean_y(Region::RightEye) - mean_y(Region::RightEyebrow)))
            / 2.0;

        let eye_height = ratio(avg_eye_height, face_diagonal * EYE_HEIGHT_SCALE);
        let eyebrow_elevation = ratio(avg_eyebrow_elevation, face_diagonal * EYEBROW_SCALE);
        let mouth_openness = ratio(mouth_height, face_diagonal * MOUTH_OPENNESS_SCALE);

        let mouth_open = mouth_openness > params.mouth_openness_threshold;
        let eyes_open = eye_height > params.surprise_threshold * EYES_OPEN_FACTOR;
        let eyebrows_raised = eyebrow_elevation > MIN_EYEBROW_ELEVATION;
        let all_components = mouth_open && eyes_open && eyebrows_raised;

        let mut surprise_score = eye_height * EYE_HEIGHT_WEIGHT
            + eyebrow_elevation * EYEBROW_WEIGHT
            + mouth_openness * MOUTH_OPENNESS_WEIGHT;
        if all_components {
            surprise_score *= SURPRISE_SCORE_BOOST;
        }

        let smile_confidence =
            unit((smile_score - params.smile_threshold) * SMILE_CONFIDENCE_SCALE);
        let mut surprise_confidence =
            unit((surprise_score - params.surprise_threshold) * SURPRISE_CONFIDENCE_SCALE);
        if all_components {
            surprise_confidence = (surprise_confidence * SURPRISE_CONFIDENCE_BOOST).min(1.0);
        }

        Self {
            mouth_width,
            mouth_height,
            mouth_ratio,
            corner_elevation,
            smile_score,
            face_diagonal,
            eye_height,
            eyebrow_elevation,
            mouth_openness,
            mouth_open,
            eyes_open,
            eyebrows_raised,
            surprise_score,
            smile_confidence,
            surprise_confidence,
        }
    }

    /// Returns whether eyes, eyebrows and mouth all indicate surprise.
    pub fn all_surprise_components(&self) -> bool {
        self.mouth_open && self.eyes_open && self.eyebrows_raised
    }

    /// Picks the expression from the computed confidences.
    pub fn decide(&self, params: &ExpressionParams) -> ExpressionResult {
        let (smile, surprise) = (self.smile_confidence, self.surprise_confidence);
        let (expression, confidence) = if smile > surprise && smile > params.min_confidence {
            (Expression::Smile, smile)
        } else if surprise > smile && surprise > params.min_confidence {
            (Expression::Surprise, surprise)
        } else {
            (Expression::Neutral, 1.0 - smile.max(surprise))
        };

        ExpressionResult {
            expression,
            confidence,
        }
    }
}

/// Classifies the expression of `face`, detected in a frame of size `res`.
pub fn classify(
    face: &FaceLandmarks,
    res: Resolution,
    params: &ExpressionParams,
) -> ExpressionResult {
    analyze(face, res, params).1
}

/// Like [`classify`], but also returns the measurements the decision was based on.
pub fn analyze(
    face: &FaceLandmarks,
    res: Resolution,
    params: &ExpressionParams,
) -> (ExpressionMetrics, ExpressionResult) {
    let metrics = ExpressionMetrics::compute(face, res, params);
    let result = metrics.decide(params);
    log::trace!("{:?} -> {}", metrics, result);
    (metrics, result)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::test::{self, FaceShape, FACE_RES};

    fn classify_shape(shape: FaceShape) -> ExpressionResult {
        classify(&shape.build(), FACE_RES, &ExpressionParams::default())
    }

    #[test]
    fn resting_face_is_neutral() {
        let face = FaceShape::RESTING.build();
        let params = ExpressionParams::default();
        let metrics = ExpressionMetrics::compute(&face, FACE_RES, &params);
        assert_eq!(metrics.mouth_width, 60.0);
        assert_eq!(metrics.mouth_height, 30.0);
        assert_eq!(metrics.mouth_ratio, 2.0);
        assert_eq!(metrics.corner_elevation, 0.0);
        assert_relative_eq!(metrics.face_diagonal, 325.0f32.hypot(300.0));
        assert_eq!(metrics.smile_confidence, 0.0);
        assert_eq!(metrics.surprise_confidence, 0.0);

        let result = metrics.decide(&params);
        assert_eq!(result.expression(), Expression::Neutral);
        assert_relative_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn smile() {
        let face = FaceShape::SMILING.build();
        let params = ExpressionParams::default();
        let metrics = ExpressionMetrics::compute(&face, FACE_RES, &params);
        assert_relative_eq!(metrics.mouth_ratio, 4.0);
        assert_relative_eq!(metrics.corner_elevation, 0.05);
        assert_relative_eq!(metrics.smile_score, 3.05, epsilon = 1e-5);
        assert!(!metrics.eyes_open);

        let result = metrics.decide(&params);
        assert_eq!(result.expression(), Expression::Smile);
        assert_relative_eq!(result.confidence(), 0.525, epsilon = 1e-5);
    }

    #[test]
    fn surprise() {
        let face = FaceShape::SURPRISED.build();
        let params = ExpressionParams::default();
        let metrics = ExpressionMetrics::compute(&face, FACE_RES, &params);
        assert!(metrics.mouth_open);
        assert!(metrics.eyes_open);
        assert!(metrics.eyebrows_raised);
        assert!(metrics.all_surprise_components());
        assert_relative_eq!(
            metrics.eye_height,
            40.0 / (380.0f32.hypot(300.0) * 0.5),
            epsilon = 1e-6
        );
        assert_eq!(metrics.smile_confidence, 0.0);

        let result = metrics.decide(&params);
        assert_eq!(result.expression(), Expression::Surprise);
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn compound_surprise_is_boosted() {
        let params = ExpressionParams::default();
        let boosted =
            ExpressionMetrics::compute(&FaceShape::SURPRISED.build(), FACE_RES, &params);
        let plain = boosted.eye_height * 0.4
            + boosted.eyebrow_elevation * 0.3
            + boosted.mouth_openness * 0.3;
        assert_relative_eq!(boosted.surprise_score, plain * 1.5, epsilon = 1e-6);

        // Lowering the eyebrows removes one component and with it the boost.
        let shape = FaceShape {
            brow_elevation: 0,
            ..FaceShape::SURPRISED
        };
        let metrics = ExpressionMetrics::compute(&shape.build(), FACE_RES, &params);
        assert!(!metrics.eyebrows_raised);
        assert!(!metrics.all_surprise_components());
        let plain = metrics.eye_height * 0.4
            + metrics.eyebrow_elevation * 0.3
            + metrics.mouth_openness * 0.3;
        assert_relative_eq!(metrics.surprise_score, plain, epsilon = 1e-6);
    }

    #[test]
    fn tie_is_neutral() {
        // Saturates both confidences at exactly 1.0.
        let shape = FaceShape {
            mouth_width: 480,
            ..FaceShape::SURPRISED
        };
        let params = ExpressionParams::default();
        let metrics = ExpressionMetrics::compute(&shape.build(), FACE_RES, &params);
        assert_eq!(metrics.smile_confidence, 1.0);
        assert_eq!(metrics.surprise_confidence, 1.0);

        let result = metrics.decide(&params);
        assert_eq!(result.expression(), Expression::Neutral);
        assert_eq!(result.confidence(), 0.0);
    }

    #[test]
    fn weak_expression_is_neutral() {
        let metrics = ExpressionMetrics {
            smile_confidence: 0.3,
            surprise_confidence: 0.1,
            ..ExpressionMetrics::compute(&FaceShape::RESTING.build(), FACE_RES, &Default::default())
        };
        let result = metrics.decide(&ExpressionParams::default());
        assert_eq!(result.expression(), Expression::Neutral);
        assert_relative_eq!(result.confidence(), 0.7);
    }

    #[test]
    fn params_are_respected() {
        let params = ExpressionParams {
            smile_threshold: 10.0,
            ..Default::default()
        };
        let result = classify(&FaceShape::SMILING.build(), FACE_RES, &params);
        assert_eq!(result.expression(), Expression::Neutral);

        let params = ExpressionParams {
            min_confidence: 0.6,
            ..Default::default()
        };
        let result = classify(&FaceShape::SMILING.build(), FACE_RES, &params);
        assert_eq!(result.expression(), Expression::Neutral);
        assert_relative_eq!(result.confidence(), 0.475, epsilon = 1e-5);
    }

    #[test]
    fn wider_smile_is_more_confident() {
        let narrow = classify_shape(FaceShape::SMILING);
        let wide = classify_shape(FaceShape {
            mouth_width: 180,
            ..FaceShape::SMILING
        });
        assert_eq!(wide.expression(), Expression::Smile);
        assert!(wide.confidence() > narrow.confidence());
    }

    #[test]
    fn coincident_landmarks() {
        let face =
            FaceLandmarks::try_from(vec![[0.5, 0.5, 0.0]; FaceLandmarks::NUM_LANDMARKS]).unwrap();
        let metrics = ExpressionMetrics::compute(&face, FACE_RES, &ExpressionParams::default());
        assert_eq!(metrics.mouth_ratio, 0.0);
        assert_eq!(metrics.face_diagonal, 0.0);
        assert_eq!(metrics.eye_height, 0.0);
        assert_eq!(metrics.mouth_openness, 0.0);

        let result = classify(&face, FACE_RES, &ExpressionParams::default());
        assert_eq!(result.expression(), Expression::Neutral);
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn zero_resolution() {
        let result = classify(
            &FaceShape::SMILING.build(),
            Resolution::new(0, 0),
            &ExpressionParams::default(),
        );
        assert_eq!(result.expression(), Expression::Neutral);
        assert_eq!(result.confidence(), 1.0);
    }

    #[test]
    fn confidence_is_always_in_range() {
        let mut rng = fastrand::Rng::with_seed(7);
        let params = ExpressionParams::default();
        for _ in 0..500 {
            let face = test::random_face(&mut rng);
            for res in [FACE_RES, Resolution::RES_720P, Resolution::new(1, 1)] {
                let result = classify(&face, res, &params);
                assert!(
                    (0.0..=1.0).contains(&result.confidence()),
                    "{:?}",
                    result
                );
            }
        }
    }

    #[test]
    fn analyze_matches_classify() {
        let params = ExpressionParams::default();
        for shape in [FaceShape::RESTING, FaceShape::SMILING, FaceShape::SURPRISED] {
            let face = shape.build();
            let (metrics, result) = analyze(&face, FACE_RES, &params);
            assert_eq!(metrics, ExpressionMetrics::compute(&face, FACE_RES, &params));
            assert_eq!(result, classify(&face, FACE_RES, &params));
        }
    }

    #[test]
    fn metrics_json() {
        let (metrics, _) = analyze(
            &FaceShape::SURPRISED.build(),
            FACE_RES,
            &ExpressionParams::default(),
        );
        let value = serde_json::to_value(metrics).unwrap();
        assert_eq!(value["mouth_open"], true);
        assert_eq!(value["eyes_open"], true);
        assert_eq!(value["eyebrows_raised"], true);
        assert_eq!(value["mouth_width"], 80.0);

        let nan = ExpressionMetrics {
            smile_score: f32::NAN,
            ..metrics
        };
        assert!(serde_json::to_value(nan).unwrap()["smile_score"].is_null());
    }

    #[test]
    fn display() {
        let result = classify_shape(FaceShape::RESTING);
        assert_eq!(result.to_string(), "neutral (100%)");
    }
}
