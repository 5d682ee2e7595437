//! Driver boundary for document databases.
//!
//! [`DocumentStore`] is the narrow set of primitives the document adapter
//! needs from a driver. [`MemoryStore`](crate::memory::MemoryStore) implements
//! it in-process; `MongoStore` implements it on top of the official driver
//! when the `mongodb` feature is enabled.

use async_trait::async_trait;

use seedbed_core::{DEFAULT_ID_FIELD, Record, RecordId, Value};

use crate::error::StorageResult;

/// Primitive document operations keyed by record identifier.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Field that holds record identifiers.
	fn id_field(&self) -> &str {
		DEFAULT_ID_FIELD
	}

	/// Finds a record by identifier.
	async fn find_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<Option<Record>>;

	/// Inserts a record and returns it as persisted.
	///
	/// A record without an identifier gets one assigned by the store.
	///
	/// # Errors
	///
	/// Returns `StorageError::DuplicateKey` when the identifier already exists.
	async fn insert(&self, collection: &str, record: Record) -> StorageResult<Record>;

	/// Sets `fields` on the record with `id`, creating it if missing.
	///
	/// `key` is the identifier value as the caller wrote it; a created record
	/// stores it unchanged under [`id_field`](DocumentStore::id_field). Fields
	/// not named in `fields` are left untouched. Returns the record after the
	/// update.
	async fn upsert_by_id(
		&self,
		collection: &str,
		id: &RecordId,
		key: Value,
		fields: Record,
	) -> StorageResult<Record>;

	/// Deletes the record with `id` and returns the number of records removed.
	async fn delete_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<u64>;
}
