//! Custom actions for the MapTile actor.
//!
//! Army bookkeeping arrives as fire-and-forget notifications from the armies themselves;
//! city and building slots are claimed and released by their owners.

use crate::clients::ArmyClient;
use crate::model::{Army, ArmyId, BuildingId, CityId, MapTile, TileView, UserId};

#[derive(Debug, Clone)]
pub enum MapTileAction {
    AssignCity(Option<CityId>),
    /// Clears the city slot only if it still names this city.
    ReleaseCity(CityId),
    /// Claims the building slot. Fails if another building holds it.
    AssignBuilding(BuildingId),
    /// Clears the building slot only if it still names this building.
    ReleaseBuilding(BuildingId),
    /// An army entered the tile (created, restored or stepped in).
    ///
    /// Idle armies of the same owner are merged into the oldest one.
    AddArmy { army: Army, handle: ArmyClient },
    RemoveArmy { owner: UserId, army: ArmyId },
    /// Refreshes the cached record of an army already on the tile.
    UpdateArmy(Army),
    /// The owner of this tile's city changed. Forwarded to the building on the tile.
    CityOwnerChanged(CityId),
    Occupancy,
    Describe,
}

#[derive(Debug, Clone)]
pub enum MapTileActionResult {
    Done,
    Occupancy(MapTile),
    View(TileView),
}
