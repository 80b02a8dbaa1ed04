//! Classification of human hand poses.
//!
//! Hands arrive as 21 landmarks from the detector ([`landmark::HandLandmarks`]). The
//! [`chirality`] classifier decides whether a hand is a left or a right hand, which the
//! [`fingers`] classifier then needs to interpret the thumb.

pub mod chirality;
pub mod fingers;
pub mod landmark;
