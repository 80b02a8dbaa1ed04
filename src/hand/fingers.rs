//! Finger extension classification.
//!
//! # Thumb
//!
//! The thumb is reported *inverted*: [`Finger::Thumb`] is part of the [`ExtendedFingers`] when the
//! thumb is **not** extended away from the hand. Thumb extension is judged along the X axis, and
//! which direction counts as "outwards" depends on the hand's [`Chirality`].
//!
//! # Other fingers
//!
//! A finger counts as extended if its tip is clearly above its middle joint, or well above its
//! base joint. The second test catches fingers that are extended but slightly curled. Both margins
//! scale with the length of the finger's lower segment, so the result does not depend on how large
//! the hand appears in the image.

use std::fmt;

use crate::geometry::distance;

use super::chirality::Chirality;
use super::landmark::{Finger, HandLandmarks};

/// Thumb extension margin, relative to the thumb's base-to-mid distance.
const THUMB_EXTENSION_FACTOR: f32 = 0.6;
/// Tip-above-mid margin, relative to the finger's base-to-mid distance.
const MID_MARGIN_FACTOR: f32 = 0.3;
/// Tip-above-base margin, relative to the finger's base-to-mid distance.
const BASE_MARGIN_FACTOR: f32 = 0.7;

/// A set of [`Finger`]s.
///
/// Iteration yields fingers in [`Finger::ALL`] order, each at most once.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExtendedFingers {
    bits: u8,
}

impl ExtendedFingers {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Adds `finger` to the set. Returns `false` if it was already present.
    pub fn insert(&mut self, finger: Finger) -> bool {
        let present = self.contains(finger);
        self.bits |= 1 << finger as u8;
        !present
    }

    #[inline]
    pub fn contains(&self, finger: Finger) -> bool {
        self.bits & (1 << finger as u8) != 0
    }

    /// Returns the number of fingers in the set (0 to 5).
    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Finger> + '_ {
        Finger::ALL.into_iter().filter(|&f| self.contains(f))
    }
}

impl FromIterator<Finger> for ExtendedFingers {
    fn from_iter<T: IntoIterator<Item = Finger>>(iter: T) -> Self {
        let mut set = Self::new();
        for finger in iter {
            set.insert(finger);
        }
        set
    }
}

impl fmt::Debug for ExtendedFingers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Determines which fingers of `hand` are extended.
///
/// `chirality` selects the direction in which the thumb extends. See the
/// [module documentation](self) for the inverted thumb semantics.
pub fn classify(hand: &HandLandmarks, chirality: Chirality) -> ExtendedFingers {
    let mut fingers = ExtendedFingers::new();

    if !thumb_extended(hand, chirality) {
        fingers.insert(Finger::Thumb);
    }

    for finger in &Finger::ALL[1..] {
        if finger_extended(hand, *finger) {
            fingers.insert(*finger);
        }
    }

    log::trace!("{} hand: {:?}", chirality, fingers);
    fingers
}

/// Returns whether the thumb sticks out sideways from the hand.
fn thumb_extended(hand: &HandLandmarks, chirality: Chirality) -> bool {
    let tip = hand.tip(Finger::Thumb);
    let mid = hand.mid(Finger::Thumb);
    let base = hand.base(Finger::Thumb);

    let threshold = distance(base, mid) * THUMB_EXTENSION_FACTOR;
    match chirality {
        Chirality::Left => mid.x() - tip.x() > threshold && tip.x() < base.x(),
        Chirality::Right => tip.x() - mid.x() > threshold && tip.x() > base.x(),
    }
}

fn finger_extended(hand: &HandLandmarks, finger: Finger) -> bool {
    let tip = hand.tip(finger);
    let mid = hand.mid(finger);
    let base = hand.base(finger);

    let base_to_mid = distance(base, mid);
    tip.y() < mid.y() - base_to_mid * MID_MARGIN_FACTOR
        || tip.y() < base.y() - base_to_mid * BASE_MARGIN_FACTOR
}
