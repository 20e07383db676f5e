use super::{Army, Building, BuildingId, City, CityId, Coord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occupancy record of one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapTile {
    pub coord: Coord,
    pub city_id: Option<CityId>,
    pub building_id: Option<BuildingId>,
}

impl MapTile {
    pub fn empty(coord: Coord) -> Self {
        Self {
            coord,
            city_id: None,
            building_id: None,
        }
    }
}

/// Everything visible on one tile: its occupants resolved to snapshots, armies grouped by
/// owner username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub tile: MapTile,
    pub city: Option<City>,
    pub city_owner: Option<String>,
    pub building: Option<Building>,
    pub armies: BTreeMap<String, Vec<Army>>,
}
