use core::future::Future;

use futures_util::future::ready;

use crate::*;

pub type StoreResult<T> = core::result::Result<T, StoreError>;

/// Persistence backend for finished games.
///
/// Every call is a single request/response; callers await one request before
/// issuing the next.
pub trait RecordStore {
    /// Inserts a record and returns the id assigned to it.
    fn save(&mut self, record: GameRecord) -> impl Future<Output = StoreResult<RecordId>>;

    /// All records, in store order.
    fn list_all(&self) -> impl Future<Output = StoreResult<Vec<StoredRecord>>>;

    fn get_by_id(&self, id: RecordId) -> impl Future<Output = StoreResult<Option<StoredRecord>>>;

    fn clear_all(&mut self) -> impl Future<Output = StoreResult<()>>;
}

/// Record store kept in memory, in insertion order.
///
/// Ids start at 1 and are never reused, not even after [`RecordStore::clear_all`].
#[derive(Clone, Debug, Default)]
pub struct MemoryRecordStore {
    records: Vec<StoredRecord>,
    last_id: u64,
    pending_failure: Option<StoreError>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Makes the next [`RecordStore::save`] fail with `message`.
    pub fn fail_next_save(&mut self, message: impl Into<String>) {
        self.pending_failure = Some(StoreError::new(message));
    }

    fn insert(&mut self, record: GameRecord) -> StoreResult<RecordId> {
        if let Some(err) = self.pending_failure.take() {
            log::warn!("Refusing to save record: {}", err);
            return Err(err);
        }

        self.last_id += 1;
        let id = RecordId(self.last_id);
        self.records.push(StoredRecord { id, record });
        log::debug!("Stored record {}, {} total", id, self.records.len());
        Ok(id)
    }
}

impl RecordStore for MemoryRecordStore {
    fn save(&mut self, record: GameRecord) -> impl Future<Output = StoreResult<RecordId>> {
        ready(self.insert(record))
    }

    fn list_all(&self) -> impl Future<Output = StoreResult<Vec<StoredRecord>>> {
        ready(Ok(self.records.clone()))
    }

    fn get_by_id(&self, id: RecordId) -> impl Future<Output = StoreResult<Option<StoredRecord>>> {
        ready(Ok(self.records.iter().find(|stored| stored.id == id).cloned()))
    }

    fn clear_all(&mut self) -> impl Future<Output = StoreResult<()>> {
        log::debug!("Clearing {} record(s)", self.records.len());
        self.records.clear();
        ready(Ok(()))
    }
}
