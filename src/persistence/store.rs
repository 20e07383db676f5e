use super::record::{Record, RecordKey, WorldRows};
use crate::model::{
    Army, ArmyId, Building, BuildingId, City, CityId, Coord, MapTile, Training, User, UserId,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A create collided with an existing primary key or building coordinate.
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Storage unavailable")]
    Unavailable,
}

/// Durable storage for world rows.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Writes a new row. Fails with [`StoreError::Conflict`] if the key is taken.
    async fn insert(&self, record: &Record) -> Result<(), StoreError>;

    /// Inserts or replaces every row of the batch.
    async fn upsert_batch(&self, records: &[Record]) -> Result<(), StoreError>;

    /// Removes a row. Removing an absent row is not an error.
    async fn delete(&self, key: &RecordKey) -> Result<(), StoreError>;

    async fn load(&self) -> Result<WorldRows, StoreError>;

    /// Makes every accepted write durable. The persistence actor calls it after each flush.
    async fn sync(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Rows indexed by primary key.
#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    users: BTreeMap<UserId, User>,
    map_tiles: BTreeMap<Coord, MapTile>,
    cities: BTreeMap<CityId, City>,
    buildings: BTreeMap<BuildingId, Building>,
    armies: BTreeMap<ArmyId, Army>,
    trainings: BTreeMap<BuildingId, Training>,
}

impl Tables {
    pub(crate) fn from_rows(rows: WorldRows) -> Self {
        let mut tables = Tables::default();
        for user in rows.users {
            tables.upsert(Record::User(user));
        }
        for tile in rows.map_tiles {
            tables.upsert(Record::MapTile(tile));
        }
        for city in rows.cities {
            tables.upsert(Record::City(city));
        }
        for building in rows.buildings {
            tables.upsert(Record::Building(building));
        }
        for army in rows.armies {
            tables.upsert(Record::Army(army));
        }
        for training in rows.trainings {
            tables.upsert(Record::Training(training));
        }
        tables
    }

    pub(crate) fn to_rows(&self) -> WorldRows {
        WorldRows {
            users: self.users.values().cloned().collect(),
            map_tiles: self.map_tiles.values().cloned().collect(),
            cities: self.cities.values().cloned().collect(),
            buildings: self.buildings.values().cloned().collect(),
            armies: self.armies.values().cloned().collect(),
            trainings: self.trainings.values().cloned().collect(),
        }
    }

    fn contains(&self, key: &RecordKey) -> bool {
        match key {
            RecordKey::User(id) => self.users.contains_key(id),
            RecordKey::MapTile(c) => self.map_tiles.contains_key(c),
            RecordKey::City(id) => self.cities.contains_key(id),
            RecordKey::Building(id) => self.buildings.contains_key(id),
            RecordKey::Army(id) => self.armies.contains_key(id),
            RecordKey::Training(id) => self.trainings.contains_key(id),
        }
    }

    pub(crate) fn insert(&mut self, record: Record) -> Result<(), StoreError> {
        let key = record.key();
        if self.contains(&key) {
            return Err(StoreError::Conflict(format!("{key} already exists")));
        }
        if let Record::Building(building) = &record {
            if let Some(other) = self.buildings.values().find(|b| b.coord == building.coord) {
                return Err(StoreError::Conflict(format!(
                    "building {} already stands at {}",
                    other.id, building.coord
                )));
            }
        }
        self.upsert(record);
        Ok(())
    }

    pub(crate) fn upsert(&mut self, record: Record) {
        match record {
            Record::User(u) => {
                self.users.insert(u.id.clone(), u);
            }
            Record::MapTile(t) => {
                self.map_tiles.insert(t.coord, t);
            }
            Record::City(c) => {
                self.cities.insert(c.id.clone(), c);
            }
            Record::Building(b) => {
                self.buildings.insert(b.id.clone(), b);
            }
            Record::Army(a) => {
                self.armies.insert(a.id.clone(), a);
            }
            Record::Training(t) => {
                self.trainings.insert(t.barracks_id.clone(), t);
            }
        }
    }

    pub(crate) fn delete(&mut self, key: &RecordKey) -> bool {
        match key {
            RecordKey::User(id) => self.users.remove(id).is_some(),
            RecordKey::MapTile(c) => self.map_tiles.remove(c).is_some(),
            RecordKey::City(id) => self.cities.remove(id).is_some(),
            RecordKey::Building(id) => self.buildings.remove(id).is_some(),
            RecordKey::Army(id) => self.armies.remove(id).is_some(),
            RecordKey::Training(id) => self.trainings.remove(id).is_some(),
        }
    }
}

/// Store kept entirely in memory. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: WorldRows) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables::from_rows(rows))),
            failing: Arc::default(),
        }
    }

    /// Current contents, bypassing the async interface.
    pub fn rows(&self) -> WorldRows {
        self.tables.lock().to_rows()
    }

    /// Makes every subsequent operation fail with [`StoreError::Unavailable`].
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, record: &Record) -> Result<(), StoreError> {
        self.check()?;
        self.tables.lock().insert(record.clone())
    }

    async fn upsert_batch(&self, records: &[Record]) -> Result<(), StoreError> {
        self.check()?;
        let mut tables = self.tables.lock();
        for record in records {
            tables.upsert(record.clone());
        }
        Ok(())
    }

    async fn delete(&self, key: &RecordKey) -> Result<(), StoreError> {
        self.check()?;
        self.tables.lock().delete(key);
        Ok(())
    }

    async fn load(&self) -> Result<WorldRows, StoreError> {
        self.check()?;
        Ok(self.rows())
    }
}
