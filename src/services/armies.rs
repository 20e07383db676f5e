use crate::army_actor;
use crate::clients::ActorClient;
use crate::directory::EntityKind;
use crate::error::{OrNotFound, WorldError};
use crate::lifecycle::WorldSystem;
use crate::model::{Army, ArmyId, Coord, UserId};
use tracing::instrument;

impl WorldSystem {
    /// Spawns an idle army on an existing tile.
    ///
    /// If the owner already has an idle army there, the tile merges the two and this id may
    /// be gone by the time the call returns.
    #[instrument(skip(self))]
    pub async fn create_army(
        &self,
        owner: &UserId,
        coord: Coord,
        size: u32,
    ) -> Result<ArmyId, WorldError> {
        self.user_client(owner)?;
        let army = Army::new(ArmyId::generate(), owner.clone(), coord, size);
        let id = army.id.clone();
        army_actor::start(army, self.context(), false).await?;
        Ok(id)
    }

    pub async fn get_army(&self, id: &ArmyId) -> Result<Army, WorldError> {
        self.army_client(id)?
            .get()
            .await
            .or_not_found(EntityKind::Army, id)
    }

    /// Sends an army toward `target`, one tile per step, x first.
    pub async fn start_march(&self, id: &ArmyId, target: Coord) -> Result<Army, WorldError> {
        self.army_client(id)?
            .start_march(target)
            .await
            .or_not_found(EntityKind::Army, id)
    }

    pub async fn disband_army(&self, id: &ArmyId) -> Result<(), WorldError> {
        self.army_client(id)?
            .delete()
            .await
            .or_not_found(EntityKind::Army, id)
    }
}
