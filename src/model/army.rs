use super::{ArmyId, Coord, UserId};
use serde::{Deserialize, Serialize};

/// A group of troops standing on (or marching across) the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Army {
    pub id: ArmyId,
    pub coord: Coord,
    pub owner: UserId,
    pub size: u32,
    pub from: Coord,
    pub to: Coord,
    pub marching: bool,
}

impl Army {
    /// An idle army at `coord`.
    pub fn new(id: ArmyId, owner: UserId, coord: Coord, size: u32) -> Self {
        Self {
            id,
            coord,
            owner,
            size,
            from: Coord::UNSET,
            to: Coord::UNSET,
            marching: false,
        }
    }

    /// An army that starts marching from `coord` to `target` as soon as it is spawned.
    pub fn marching(id: ArmyId, owner: UserId, coord: Coord, target: Coord, size: u32) -> Self {
        Self {
            from: coord,
            to: target,
            marching: true,
            ..Self::new(id, owner, coord, size)
        }
    }

    pub fn is_idle(&self) -> bool {
        !self.marching
    }

    pub(crate) fn clear_march(&mut self) {
        self.marching = false;
        self.from = Coord::UNSET;
        self.to = Coord::UNSET;
    }
}
