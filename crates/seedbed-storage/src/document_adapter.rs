//! Adapter for document databases.
//!
//! Maps the generic batch hooks onto [`DocumentStore`] primitives:
//!
//! - `add_items` inserts every record concurrently; results follow input order.
//! - `upsert_items` sets every record's fields by identifier concurrently.
//! - `remove_items` deletes by identifier one at a time and stops at the first
//!   failure. Identifiers that are already gone count as removed.
//!
//! Integral numbers are accepted as identifiers alongside strings and
//! references. Any other non-empty identifier value is rejected rather than
//! replaced or skipped.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;

use seedbed_core::{Record, RecordId, Value};

use crate::adapter::{CrudOptions, Items, StorageAdapter};
use crate::error::StorageResult;
use crate::store::DocumentStore;
use crate::transaction::Transaction;

/// [`StorageAdapter`] backed by a [`DocumentStore`] driver handle.
#[derive(Clone)]
pub struct DocumentAdapter {
	store: Arc<dyn DocumentStore>,
}

impl std::fmt::Debug for DocumentAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DocumentAdapter")
			.field("id_field", &self.store.id_field())
			.finish()
	}
}

impl DocumentAdapter {
	/// Wraps a driver handle.
	pub fn new(store: Arc<dyn DocumentStore>) -> Self {
		Self { store }
	}

	/// The underlying driver handle.
	pub fn store(&self) -> &Arc<dyn DocumentStore> {
		&self.store
	}

	/// Inserts one record.
	pub async fn add_item(&self, collection: &str, record: Record) -> StorageResult<Record> {
		self.store.insert(collection, record).await
	}

	/// Upserts one record by its identifier.
	///
	/// The identifier is removed from the update payload so the stored key is
	/// never rewritten. A record without an identifier is inserted and gets
	/// one assigned by the store.
	pub async fn upsert_item(&self, collection: &str, mut record: Record) -> StorageResult<Record> {
		let id_field = self.store.id_field();
		let Some(id) = record.try_id(id_field)? else {
			return self.store.insert(collection, record).await;
		};
		let key = record
			.remove(id_field)
			.unwrap_or_else(|| Value::Reference(id.clone()));
		self.store.upsert_by_id(collection, &id, key, record).await
	}

	/// Removes one record by its identifier. A record without one is skipped.
	///
	/// # Errors
	///
	/// An identifier field holding an unusable value is an error.
	pub async fn remove_item(&self, collection: &str, record: &Record) -> StorageResult<()> {
		match record.try_id(self.store.id_field())? {
			Some(id) => self.remove_item_by_id(collection, &id).await,
			None => {
				tracing::debug!(collection, "skipping removal of a record without identifier");
				Ok(())
			}
		}
	}

	/// Removes records one identifier at a time, stopping at the first failure.
	pub async fn remove_items_by_id(&self, collection: &str, ids: &[RecordId]) -> StorageResult<()> {
		for id in ids {
			self.remove_item_by_id(collection, id).await?;
		}
		Ok(())
	}

	/// Removes the record with `id`. A missing record is not an error.
	pub async fn remove_item_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<()> {
		let deleted = self.store.delete_by_id(collection, id).await?;
		if deleted == 0 {
			tracing::debug!(collection, id = %id, "record already absent");
		}
		Ok(())
	}
}

#[async_trait]
impl StorageAdapter for DocumentAdapter {
	fn name(&self) -> &str {
		"document"
	}

	fn id_field(&self) -> &str {
		self.store.id_field()
	}

	async fn add_items(
		&self,
		items: Items,
		options: &CrudOptions,
		_transaction: &Transaction,
	) -> StorageResult<Vec<Record>> {
		let collection = options.collection();
		try_join_all(
			items
				.into_vec()
				.into_iter()
				.map(|record| self.add_item(collection, record)),
		)
		.await
	}

	async fn upsert_items(
		&self,
		items: Items,
		options: &CrudOptions,
		_transaction: &Transaction,
	) -> StorageResult<Vec<Record>> {
		let collection = options.collection();
		try_join_all(
			items
				.into_vec()
				.into_iter()
				.map(|record| self.upsert_item(collection, record)),
		)
		.await
	}

	async fn remove_items(
		&self,
		items: Items,
		options: &CrudOptions,
		_transaction: &Transaction,
	) -> StorageResult<Vec<Record>> {
		let records = items.into_vec();
		let id_field = self.store.id_field();
		let mut ids = Vec::with_capacity(records.len());
		for record in &records {
			if let Some(id) = record.try_id(id_field)? {
				ids.push(id);
			}
		}
		if ids.len() < records.len() {
			tracing::debug!(
				collection = options.collection(),
				skipped = records.len() - ids.len(),
				"skipping removal of records without identifier"
			);
		}
		self.remove_items_by_id(options.collection(), &ids).await?;
		Ok(records)
	}

	async fn find_item_by_id(
		&self,
		collection: &str,
		id: &RecordId,
	) -> StorageResult<Option<Record>> {
		self.store.find_by_id(collection, id).await
	}
}
