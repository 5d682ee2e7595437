//! In-process document store.
//!
//! Collections are insertion-ordered maps guarded by a single
//! `parking_lot::RwLock`. No lock is held across an await point.

use std::collections::HashMap;

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;
use uuid::Uuid;

use seedbed_core::{DEFAULT_ID_FIELD, Record, RecordId, Value};

use crate::error::{StorageError, StorageResult};
use crate::store::DocumentStore;

type Collection = IndexMap<RecordId, Record>;

/// A [`DocumentStore`] that keeps every collection in memory.
#[derive(Debug)]
pub struct MemoryStore {
	id_field: String,
	collections: RwLock<HashMap<String, Collection>>,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	/// Creates an empty store keyed by `_id`.
	pub fn new() -> Self {
		Self::with_id_field(DEFAULT_ID_FIELD)
	}

	/// Creates an empty store keyed by a custom identifier field.
	pub fn with_id_field(id_field: impl Into<String>) -> Self {
		Self {
			id_field: id_field.into(),
			collections: RwLock::new(HashMap::new()),
		}
	}

	/// Number of records in `collection`.
	pub fn count(&self, collection: &str) -> usize {
		self.collections
			.read()
			.get(collection)
			.map_or(0, IndexMap::len)
	}

	/// Snapshot of `collection` in insertion order.
	pub fn records(&self, collection: &str) -> Vec<Record> {
		self.collections
			.read()
			.get(collection)
			.map(|c| c.values().cloned().collect())
			.unwrap_or_default()
	}

	/// Returns `true` when `collection` holds a record with `id`.
	pub fn contains(&self, collection: &str, id: &RecordId) -> bool {
		self.collections
			.read()
			.get(collection)
			.is_some_and(|c| c.contains_key(id))
	}

	/// Drops every collection.
	pub fn clear(&self) {
		self.collections.write().clear();
	}

	fn generate_id() -> RecordId {
		RecordId::new(Uuid::new_v4().simple().to_string())
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	fn id_field(&self) -> &str {
		&self.id_field
	}

	async fn find_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<Option<Record>> {
		Ok(self
			.collections
			.read()
			.get(collection)
			.and_then(|c| c.get(id))
			.cloned())
	}

	async fn insert(&self, collection: &str, mut record: Record) -> StorageResult<Record> {
		let id = match record.try_id(&self.id_field)? {
			Some(id) => id,
			None => {
				let id = Self::generate_id();
				record.insert(self.id_field.clone(), Value::String(id.as_str().to_string()));
				id
			}
		};

		let mut collections = self.collections.write();
		let entries = collections.entry(collection.to_string()).or_default();
		if entries.contains_key(&id) {
			return Err(StorageError::DuplicateKey {
				collection: collection.to_string(),
				id: id.into_inner(),
			});
		}
		entries.insert(id, record.clone());
		Ok(record)
	}

	async fn upsert_by_id(
		&self,
		collection: &str,
		id: &RecordId,
		key: Value,
		fields: Record,
	) -> StorageResult<Record> {
		let mut collections = self.collections.write();
		let entries = collections.entry(collection.to_string()).or_default();
		let record = entries
			.entry(id.clone())
			.or_insert_with(|| Record::new().with(self.id_field.clone(), key));
		record.merge(fields);
		Ok(record.clone())
	}

	async fn delete_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<u64> {
		let removed = self
			.collections
			.write()
			.get_mut(collection)
			.and_then(|c| c.shift_remove(id))
			.is_some();
		Ok(u64::from(removed))
	}
}
