use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Integer grid coordinate of a map tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    /// Marker stored in an idle army's march fields.
    pub const UNSET: Coord = Coord { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }

    pub fn manhattan(&self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// One step toward `target`, closing the x distance before the y distance.
    pub fn step_toward(&self, target: Coord) -> Coord {
        if self.x != target.x {
            Coord::new(self.x + (target.x - self.x).signum(), self.y)
        } else if self.y != target.y {
            Coord::new(self.x, self.y + (target.y - self.y).signum())
        } else {
            *self
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
