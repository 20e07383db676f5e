use super::record::{Record, RecordKey, RecordKind};
use super::store::Store;
use actor_framework::FrameworkError;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Messages understood by the [`PersistenceActor`].
#[derive(Debug)]
pub enum PersistenceCommand {
    /// Written immediately.
    Create(Record),
    /// Buffered until the next flush.
    Update(Record),
    /// Written immediately; drops any buffered update of the same row.
    Delete(RecordKey),
    /// Drains every buffer. Replies with the number of rows written when asked to.
    Flush {
        respond_to: Option<oneshot::Sender<usize>>,
    },
    /// Final flush, then the actor stops.
    Shutdown { respond_to: oneshot::Sender<usize> },
}

/// Single serialized writer in front of a [`Store`].
///
/// All buffers live inside the actor's loop, so they are never shared or locked.
pub struct PersistenceActor {
    receiver: mpsc::Receiver<PersistenceCommand>,
    this: mpsc::WeakSender<PersistenceCommand>,
    store: Arc<dyn Store>,
    buffers: BTreeMap<RecordKind, Vec<Record>>,
    batch_size: usize,
    flush_interval: Duration,
}

impl PersistenceActor {
    pub fn new(
        store: Arc<dyn Store>,
        buffer_size: usize,
        batch_size: usize,
        flush_interval: Duration,
    ) -> (Self, PersistenceClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            this: sender.downgrade(),
            store,
            buffers: BTreeMap::new(),
            batch_size: batch_size.max(1),
            flush_interval,
        };
        (actor, PersistenceClient { sender })
    }

    pub async fn run(mut self) {
        info!(flush_interval = ?self.flush_interval, batch_size = self.batch_size, "Persistence started");
        let ticker = self.start_flush_ticker();

        while let Some(command) = self.receiver.recv().await {
            match command {
                PersistenceCommand::Create(record) => {
                    let key = record.key();
                    match self.store.insert(&record).await {
                        Ok(()) => debug!(%key, "Created"),
                        Err(e) => error!(%key, error = %e, "Create failed"),
                    }
                }
                PersistenceCommand::Update(record) => {
                    self.buffers.entry(record.kind()).or_default().push(record);
                }
                PersistenceCommand::Delete(key) => {
                    if let Some(buffer) = self.buffers.get_mut(&key.kind()) {
                        buffer.retain(|r| r.key() != key);
                    }
                    match self.store.delete(&key).await {
                        Ok(()) => debug!(%key, "Deleted"),
                        Err(e) => error!(%key, error = %e, "Delete failed"),
                    }
                }
                PersistenceCommand::Flush { respond_to } => {
                    let written = self.flush().await;
                    if let Some(respond_to) = respond_to {
                        let _ = respond_to.send(written);
                    }
                }
                PersistenceCommand::Shutdown { respond_to } => {
                    let written = self.flush().await;
                    let _ = respond_to.send(written);
                    break;
                }
            }
        }

        ticker.abort();
        let pending: usize = self.buffers.values().map(Vec::len).sum();
        if pending > 0 {
            self.flush().await;
        }
        info!("Persistence stopped");
    }

    fn start_flush_ticker(&self) -> tokio::task::JoinHandle<()> {
        let this = self.this.clone();
        let period = self.flush_interval;
        tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let Some(sender) = this.upgrade() else { break };
                if sender
                    .send(PersistenceCommand::Flush { respond_to: None })
                    .await
                    .is_err()
                {
                    break;
                }
            }
        })
    }

    /// Writes every buffered update in batches and clears the buffers.
    async fn flush(&mut self) -> usize {
        let mut written = 0;
        for (kind, records) in std::mem::take(&mut self.buffers) {
            for batch in records.chunks(self.batch_size) {
                match self.store.upsert_batch(batch).await {
                    Ok(()) => written += batch.len(),
                    Err(e) => {
                        error!(?kind, rows = batch.len(), error = %e, "Batch write failed")
                    }
                }
            }
        }
        if let Err(e) = self.store.sync().await {
            error!(error = %e, "Store sync failed");
        }
        if written > 0 {
            debug!(written, "Flushed");
        }
        written
    }
}

/// Cloneable handle to the [`PersistenceActor`].
///
/// Notifications never report storage errors; those are logged by the actor.
#[derive(Clone, Debug)]
pub struct PersistenceClient {
    sender: mpsc::Sender<PersistenceCommand>,
}

impl PersistenceClient {
    pub async fn create(&self, record: Record) {
        self.post(PersistenceCommand::Create(record)).await;
    }

    pub async fn update(&self, record: Record) {
        self.post(PersistenceCommand::Update(record)).await;
    }

    pub async fn delete(&self, key: RecordKey) {
        self.post(PersistenceCommand::Delete(key)).await;
    }

    async fn post(&self, command: PersistenceCommand) {
        if let Err(e) = self.sender.send(command).await {
            warn!(command = ?e.0, "Persistence actor closed, write dropped");
        }
    }

    /// Forces a flush and waits for it.
    pub async fn flush(&self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PersistenceCommand::Flush {
                respond_to: Some(respond_to),
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }

    pub async fn shutdown(&self) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(PersistenceCommand::Shutdown { respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coord, MapTile, User, UserId};
    use crate::persistence::MemoryStore;

    fn user(id: &str, gold: i64) -> User {
        User {
            id: UserId::from(id),
            email: format!("{id}@example.com"),
            username: id.to_string(),
            password_hash: String::new(),
            gold,
            food: 0,
            allies: vec![],
        }
    }

    fn spawn(store: &MemoryStore, batch: usize) -> PersistenceClient {
        let (actor, client) =
            PersistenceActor::new(Arc::new(store.clone()), 64, batch, Duration::from_secs(3600));
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_creates_are_immediate_updates_are_buffered() {
        let store = MemoryStore::new();
        let client = spawn(&store, 5000);

        client.create(Record::User(user("alice", 1))).await;
        client.update(Record::User(user("alice", 99))).await;
        client
            .create(Record::MapTile(MapTile::empty(Coord::new(0, 0))))
            .await;
        assert_eq!(client.flush().await.unwrap(), 1);
        assert_eq!(store.rows().users[0].gold, 99);
        assert_eq!(store.rows().map_tiles.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_of_other_row_keeps_buffered_update() {
        let store = MemoryStore::new();
        let client = spawn(&store, 5000);

        client.create(Record::User(user("bob", 1))).await;
        client.update(Record::User(user("bob", 2))).await;
        client.delete(RecordKey::User(UserId::from("nobody"))).await;
        assert_eq!(client.flush().await.unwrap(), 1);
        assert_eq!(store.rows().users[0].gold, 2);
    }

    #[tokio::test]
    async fn test_delete_discards_buffered_update() {
        let store = MemoryStore::new();
        let client = spawn(&store, 5000);

        client.create(Record::User(user("carol", 1))).await;
        client.update(Record::User(user("carol", 5))).await;
        client.delete(RecordKey::User(UserId::from("carol"))).await;

        assert_eq!(client.flush().await.unwrap(), 0);
        assert!(store.rows().users.is_empty());
    }

    #[tokio::test]
    async fn test_flush_writes_in_batches() {
        let store = MemoryStore::new();
        let client = spawn(&store, 2);
        for i in 0..5 {
            client.update(Record::User(user(&format!("u{i}"), i))).await;
        }
        assert_eq!(client.flush().await.unwrap(), 5);
        assert_eq!(store.rows().users.len(), 5);
    }

    #[tokio::test]
    async fn test_storage_failures_are_swallowed() {
        let store = MemoryStore::new();
        let client = spawn(&store, 10);
        store.set_failing(true);
        client.create(Record::User(user("dave", 1))).await;
        client.update(Record::User(user("dave", 2))).await;
        assert_eq!(client.flush().await.unwrap(), 0);

        store.set_failing(false);
        client.create(Record::User(user("erin", 1))).await;
        assert_eq!(client.flush().await.unwrap(), 0);
        assert_eq!(store.rows().users.len(), 1);
    }

    #[tokio::test]
    async fn test_periodic_flush() {
        let store = MemoryStore::new();
        let (actor, client) =
            PersistenceActor::new(Arc::new(store.clone()), 64, 10, Duration::from_millis(20));
        tokio::spawn(actor.run());
        client.update(Record::User(user("frank", 7))).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(store.rows().users.len(), 1);
    }

    #[tokio::test]
    async fn test_flush_syncs_the_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.json");
        let store = crate::persistence::JsonFileStore::open(&path).await.unwrap();
        let (actor, client) =
            PersistenceActor::new(Arc::new(store), 64, 10, Duration::from_secs(3600));
        tokio::spawn(actor.run());

        client.create(Record::User(user("hank", 1))).await;
        assert_eq!(client.flush().await.unwrap(), 0);
        let reopened = crate::persistence::JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.load().await.unwrap().users.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_and_stops() {
        let store = MemoryStore::new();
        let client = spawn(&store, 10);
        client.update(Record::User(user("gina", 3))).await;
        assert_eq!(client.shutdown().await.unwrap(), 1);
        assert!(client.flush().await.is_err());
    }
}
