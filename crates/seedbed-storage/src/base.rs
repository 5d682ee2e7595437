//! Fallback adapter used when no engine-specific adapter is configured.

use async_trait::async_trait;

use seedbed_core::{Record, RecordId};

use crate::adapter::{CrudOptions, Items, StorageAdapter};
use crate::error::StorageResult;
use crate::transaction::Transaction;

/// Adapter that performs no storage.
///
/// Every mutation succeeds and echoes its input back; lookups find nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseAdapter;

impl BaseAdapter {
	/// Creates the base adapter.
	pub fn new() -> Self {
		Self
	}
}

#[async_trait]
impl StorageAdapter for BaseAdapter {
	fn name(&self) -> &str {
		"base"
	}

	async fn add_items(
		&self,
		items: Items,
		_options: &CrudOptions,
		_transaction: &Transaction,
	) -> StorageResult<Vec<Record>> {
		Ok(items.into_vec())
	}

	async fn upsert_items(
		&self,
		items: Items,
		_options: &CrudOptions,
		_transaction: &Transaction,
	) -> StorageResult<Vec<Record>> {
		Ok(items.into_vec())
	}

	async fn remove_items(
		&self,
		items: Items,
		_options: &CrudOptions,
		_transaction: &Transaction,
	) -> StorageResult<Vec<Record>> {
		Ok(items.into_vec())
	}

	async fn find_item_by_id(
		&self,
		_collection: &str,
		_id: &RecordId,
	) -> StorageResult<Option<Record>> {
		Ok(None)
	}
}
