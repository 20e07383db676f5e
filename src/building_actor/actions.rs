//! Custom actions for the Building actor family.
//!
//! Every building understands every action; kinds that do not support one reject it
//! (training on anything but a barracks fails with `NotBarracks`).

use crate::model::{Building, BuildingId, CityId, Training};

#[derive(Debug, Clone, PartialEq)]
pub enum BuildingAction {
    /// Raises the level by one and extends construction.
    Upgrade,
    TrainTroops(TrainOrder),
    /// Resumes a persisted training after a restart.
    RestoreTraining(Training),
    CurrentTraining,
    /// Forgets the cached city, tile and owner handles.
    InvalidateReferences,
}

/// A request to train troops at a barracks.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOrder {
    pub barracks_id: BuildingId,
    pub size: u32,
    /// City the trained army marches to. The barracks tile when `None`.
    pub deploy_to: Option<CityId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BuildingActionResult {
    Building(Building),
    Training(Option<Training>),
    Done,
}

#[derive(Debug, Clone)]
pub enum BuildingTick {
    Produce,
    TrainingDue,
}
