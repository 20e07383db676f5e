//! Custom actions for the Army actor.

use crate::model::{Army, Coord};

#[derive(Debug, Clone, PartialEq)]
pub enum ArmyAction {
    /// Starts (or redirects) a march. Marching to the current tile does nothing.
    StartMarch(Coord),
    /// Replaces the troop count. Sent by a tile after a merge.
    SetSize(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArmyActionResult {
    /// The army after StartMarch.
    Army(Army),
    Done,
}

#[derive(Debug, Clone)]
pub enum ArmyTick {
    Step,
}
