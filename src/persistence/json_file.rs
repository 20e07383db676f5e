use super::record::{Record, RecordKey, WorldRows};
use super::store::{Store, StoreError, Tables};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

/// The whole world as one JSON document.
///
/// Writes change the in-memory tables and mark the document dirty. [`Store::sync`], called
/// by the persistence actor after every flush, rewrites the document once through a temporary
/// file and a rename, so a crash leaves either the old or the new version on disk and loses at
/// most one flush interval of writes. Each sync still serializes every row; large maps belong
/// in a row-oriented store.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    document: Mutex<Document>,
}

#[derive(Debug)]
struct Document {
    tables: Tables,
    dirty: bool,
}

impl JsonFileStore {
    /// Opens the document at `path`, starting empty if it does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let rows = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<WorldRows>(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => WorldRows::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), "Opened world file");
        Ok(Self {
            path,
            document: Mutex::new(Document {
                tables: Tables::from_rows(rows),
                dirty: false,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write(&self, tables: &Tables) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&tables.to_rows())?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn insert(&self, record: &Record) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        document.tables.insert(record.clone())?;
        document.dirty = true;
        Ok(())
    }

    async fn upsert_batch(&self, records: &[Record]) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        for record in records {
            document.tables.upsert(record.clone());
        }
        document.dirty |= !records.is_empty();
        Ok(())
    }

    async fn delete(&self, key: &RecordKey) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        if document.tables.delete(key) {
            document.dirty = true;
        }
        Ok(())
    }

    async fn load(&self) -> Result<WorldRows, StoreError> {
        Ok(self.document.lock().await.tables.to_rows())
    }

    async fn sync(&self) -> Result<(), StoreError> {
        let mut document = self.document.lock().await;
        if !document.dirty {
            return Ok(());
        }
        self.write(&document.tables).await?;
        document.dirty = false;
        debug!(path = %self.path.display(), "World file written");
        Ok(())
    }
}
