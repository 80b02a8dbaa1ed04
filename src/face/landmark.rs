//! Face mesh landmark topology.
//!
//! Faces use the 468-point topology of MediaPipe's [Face Mesh]. Only a handful of regions of the
//! mesh matter for expression classification; they are listed in [`Region`].
//!
//! "Left" and "Right" are relative to the input image, not from the PoV of the depicted person.
//!
//! [Face Mesh]: https://google.github.io/mediapipe/solutions/face_mesh.html

use crate::landmark::{Landmark, Landmarks, Position};

/// Named groups of face mesh landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    LeftEye,
    RightEye,
    LeftEyebrow,
    RightEyebrow,
    MouthOutline,
    MouthInner,
}

impl Region {
    pub const ALL: [Region; 6] = [
        Region::LeftEye,
        Region::RightEye,
        Region::LeftEyebrow,
        Region::RightEyebrow,
        Region::MouthOutline,
        Region::MouthInner,
    ];

    /// Returns the face mesh indices of the landmarks in this region.
    #[inline]
    pub fn indices(self) -> &'static [usize] {
        REGION_INDICES[self as usize]
    }
}

const REGION_INDICES: [&[usize]; 6] = [
    // left eye
    &[
        33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
    ],
    // right eye
    &[
        362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
    ],
    // left eyebrow
    &[70, 63, 105, 66, 107, 55, 65, 52, 53, 46],
    // right eyebrow
    &[300, 293, 334, 296, 336, 285, 295, 282, 283, 276],
    // mouth outline
    &[
        61, 146, 91, 181, 84, 17, 314, 405, 321, 375, 291, 409, 270, 269, 267, 0, 37, 39, 40, 185,
    ],
    // inner mouth
    &[
        78, 95, 88, 178, 87, 14, 317, 402, 318, 324, 308, 415, 310, 311, 312, 13, 82, 81, 80, 191,
    ],
];

const fn max_region_index() -> usize {
    let mut max = 0;
    let mut r = 0;
    while r < REGION_INDICES.len() {
        let mut i = 0;
        while i < REGION_INDICES[r].len() {
            if REGION_INDICES[r][i] > max {
                max = REGION_INDICES[r][i];
            }
            i += 1;
        }
        r += 1;
    }
    max
}

/// The landmarks of a single detected face.
///
/// Construction checks that every index referenced by a [`Region`] is present.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceLandmarks {
    landmarks: Landmarks,
}

impl FaceLandmarks {
    /// Number of landmarks output by the Face Mesh network.
    pub const NUM_LANDMARKS: usize = 468;

    /// Smallest landmark count accepted by [`FaceLandmarks::try_from`].
    pub const MIN_LANDMARKS: usize = max_region_index() + 1;

    #[inline]
    pub fn landmarks(&self) -> &Landmarks {
        &self.landmarks
    }

    /// Returns the `n`-th landmark of `region`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not smaller than the number of landmarks in `region`.
    #[inline]
    pub fn landmark(&self, region: Region, n: usize) -> Landmark {
        self.landmarks.get(region.indices()[n])
    }

    /// Returns an iterator over all landmarks in `region`, in table order.
    pub fn region(&self, region: Region) -> impl Iterator<Item = Landmark> + '_ {
        region.indices().iter().map(|&idx| self.landmarks.get(idx))
    }
}

impl TryFrom<Landmarks> for FaceLandmarks {
    type Error = anyhow::Error;

    fn try_from(landmarks: Landmarks) -> anyhow::Result<Self> {
        anyhow::ensure!(
            landmarks.len() >= Self::MIN_LANDMARKS,
            "face landmark set must contain at least {} landmarks, got {}",
            Self::MIN_LANDMARKS,
            landmarks.len(),
        );
        Ok(Self { landmarks })
    }
}

impl TryFrom<Vec<Position>> for FaceLandmarks {
    type Error = anyhow::Error;

    fn try_from(positions: Vec<Position>) -> anyhow::Result<Self> {
        Landmarks::from(positions).try_into()
    }
}
