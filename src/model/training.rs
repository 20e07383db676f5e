use super::{BuildingId, CityId};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A barracks' in-progress troop production. At most one exists per barracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Training {
    pub barracks_id: BuildingId,
    pub size: u32,
    pub deploy_to: Option<CityId>,
    pub ends_at: SystemTime,
}

impl Training {
    pub fn is_due(&self, now: SystemTime) -> bool {
        self.ends_at <= now
    }
}
