//! Common code for landmarks produced by the external detector.

pub type Position = [f32; 3];

/// An owned, fixed-length list of landmark positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmarks {
    positions: Box<[Position]>,
}

impl Landmarks {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Returns the landmark at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> Landmark {
        Landmark::new(self.positions[index])
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

impl From<Vec<Position>> for Landmarks {
    fn from(positions: Vec<Position>) -> Self {
        Self {
            positions: positions.into_boxed_slice(),
        }
    }
}

/// A landmark in 3D space.
///
/// X and Y are normalized to the frame the landmark was detected in. Z is the detector's relative
/// depth estimate.
#[derive(Debug, PartialEq, PartialOrd, Clone, Copy, Default)]
pub struct Landmark {
    pos: Position,
}

impl Landmark {
    pub fn new(position: Position) -> Self {
        Self { pos: position }
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.pos
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.pos[0]
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.pos[1]
    }

    #[inline]
    pub fn z(&self) -> f32 {
        self.pos[2]
    }
}

impl From<Position> for Landmark {
    #[inline]
    fn from(pos: Position) -> Self {
        Self::new(pos)
    }
}
