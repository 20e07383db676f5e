use crate::config::WorldConfig;
use crate::directory::Directory;
use crate::persistence::PersistenceClient;
use actor_framework::SpawnOptions;
use std::sync::Arc;

/// Dependencies injected into every entity actor.
///
/// Cloning is cheap: the directory partitions, the persistence sender and the configuration
/// are all shared.
#[derive(Clone, Debug)]
pub struct WorldContext {
    pub directory: Directory,
    pub persistence: PersistenceClient,
    pub config: Arc<WorldConfig>,
}

impl WorldContext {
    pub fn new(directory: Directory, persistence: PersistenceClient, config: WorldConfig) -> Self {
        Self {
            directory,
            persistence,
            config: Arc::new(config),
        }
    }

    pub fn spawn_options(&self) -> SpawnOptions {
        self.config.spawn_options()
    }
}

/// A context over an empty directory and a fresh [`MemoryStore`](crate::persistence::MemoryStore).
///
/// Buffered updates only reach the store on an explicit flush.
#[cfg(test)]
pub(crate) fn test_context() -> (WorldContext, crate::persistence::MemoryStore) {
    use crate::persistence::{MemoryStore, PersistenceActor};
    use std::time::Duration;

    let store = MemoryStore::new();
    let (actor, persistence) = PersistenceActor::new(
        Arc::new(store.clone()),
        64,
        100,
        Duration::from_secs(3600),
    );
    tokio::spawn(actor.run());
    let ctx = WorldContext::new(Directory::new(), persistence, WorldConfig::default());
    (ctx, store)
}
