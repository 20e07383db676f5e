//! Custom actions for the City actor.

use crate::model::UserId;

#[derive(Debug, Clone, PartialEq)]
pub enum CityAction {
    /// Additive change of the population cap, floored at zero.
    AdjustPopulationCap(f64),
    SetOwner(Option<UserId>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CityActionResult {
    /// The cap after the change.
    PopulationCap(f64),
    Done,
}

#[derive(Debug, Clone)]
pub enum CityTick {
    Grow,
}
