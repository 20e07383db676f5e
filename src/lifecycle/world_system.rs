use super::WorldContext;
use crate::config::WorldConfig;
use crate::directory::Directory;
use crate::error::WorldError;
use crate::persistence::{PersistenceActor, Store, WorldRows};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Inbox of the persistence actor. Every entity writes through it, so it is much deeper than
/// an entity inbox.
const PERSISTENCE_INBOX: usize = 4096;

/// How long shutdown waits for stopped actors to leave the directory.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// The running world: directory, persistence and configuration.
///
/// Services (`register_user`, `create_city`, `train_troops`, ...) are methods on this type and
/// live in [`crate::services`].
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(MemoryStore::new());
/// let world = WorldSystem::bootstrap(store, WorldConfig::default()).await?;
///
/// let alice = world.register_user(NewUser::new("a@example.com", "alice", "pw")).await?;
/// let capital = world.create_city(NewCity { owner: Some(alice), ..capital_spec }).await?;
///
/// world.shutdown().await?;
/// ```
pub struct WorldSystem {
    context: WorldContext,
    persistence_task: JoinHandle<()>,
}

impl WorldSystem {
    /// Starts an empty world writing to `store`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn Store>, config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let (actor, persistence) = PersistenceActor::new(
            store,
            PERSISTENCE_INBOX,
            config.flush_batch_size,
            config.flush_interval(),
        );
        let persistence_task = tokio::spawn(actor.run());
        let context = WorldContext::new(Directory::new(), persistence, config);
        Ok(Self {
            context,
            persistence_task,
        })
    }

    /// Starts a world and restores every row the store holds.
    pub async fn bootstrap(store: Arc<dyn Store>, config: WorldConfig) -> Result<Self, WorldError> {
        let rows = store.load().await?;
        let system = Self::new(store, config)?;
        system.restore_rows(rows).await;
        Ok(system)
    }

    /// Respawns actors in dependency order: users, tiles, cities, armies, buildings, then
    /// the trainings of their barracks. A row that fails to restore is logged and skipped.
    pub async fn restore_rows(&self, rows: WorldRows) {
        if rows.is_empty() {
            info!("Nothing to restore");
            return;
        }
        let mut failed = 0usize;

        for user in rows.users {
            let id = user.id.clone();
            if let Err(e) = self.restore_user(user).await {
                warn!(%id, error = %e, "User not restored");
                failed += 1;
            }
        }
        for tile in rows.map_tiles {
            let coord = tile.coord;
            if let Err(e) = self.restore_map_tile(tile).await {
                warn!(%coord, error = %e, "Map tile not restored");
                failed += 1;
            }
        }
        for city in rows.cities {
            let id = city.id.clone();
            if let Err(e) = self.restore_city(city).await {
                warn!(%id, error = %e, "City not restored");
                failed += 1;
            }
        }
        for army in rows.armies {
            let id = army.id.clone();
            if let Err(e) = self.restore_army(army).await {
                warn!(%id, error = %e, "Army not restored");
                failed += 1;
            }
        }
        for building in rows.buildings {
            let id = building.id.clone();
            if let Err(e) = self.restore_building(building).await {
                warn!(%id, error = %e, "Building not restored");
                failed += 1;
            }
        }
        for training in rows.trainings {
            let id = training.barracks_id.clone();
            if let Err(e) = self.restore_training(training).await {
                warn!(%id, error = %e, "Training not restored");
                failed += 1;
            }
        }

        let counts = self.context.directory.counts();
        info!(?counts, failed, "World restored");
    }

    pub fn context(&self) -> &WorldContext {
        &self.context
    }

    pub fn directory(&self) -> &Directory {
        &self.context.directory
    }

    pub fn config(&self) -> &WorldConfig {
        &self.context.config
    }

    /// Writes every buffered update now. Returns the number of rows written.
    pub async fn flush(&self) -> Result<usize, WorldError> {
        Ok(self.context.persistence.flush().await?)
    }

    /// Stops every actor, flushes what is still buffered and waits for the persistence task.
    ///
    /// Stopping is not deleting: rows stay in the store for the next bootstrap.
    pub async fn shutdown(self) -> Result<(), WorldError> {
        info!("Shutting down world...");
        let directory = &self.context.directory;
        directory.stop_all().await;

        let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
            while directory.counts().iter().any(|(_, n)| *n > 0) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;
        if drained.is_err() {
            warn!(counts = ?directory.counts(), "Actors still registered after shutdown request");
        }

        let written = self.context.persistence.shutdown().await?;
        if let Err(e) = self.persistence_task.await {
            error!("Persistence task failed: {:?}", e);
            return Err(WorldError::Internal(format!("Persistence task failed: {e:?}")));
        }
        info!(written, "World shutdown complete.");
        Ok(())
    }
}
