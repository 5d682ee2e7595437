//! A memory store whose calls for selected identifiers meet at a barrier.
//!
//! A batch that runs those calls one after another never gets past the
//! barrier, so tests wrap it in [`within_deadline`].

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use seedbed_core::{Record, RecordId, Value};
use seedbed_storage::{DocumentStore, MemoryStore, StorageResult};

/// Time a gated batch is given to finish.
pub const DEADLINE: Duration = Duration::from_secs(2);

/// [`DocumentStore`] that holds calls for `gated` identifiers until all of them arrive.
pub struct GatedStore {
	inner: MemoryStore,
	gate: Barrier,
	gated: Vec<RecordId>,
	delayed: Option<RecordId>,
}

impl GatedStore {
	/// Gates every call whose identifier is in `gated`.
	pub fn new(gated: &[&str]) -> Self {
		Self {
			inner: MemoryStore::new(),
			gate: Barrier::new(gated.len()),
			gated: gated.iter().map(|id| RecordId::from(*id)).collect(),
			delayed: None,
		}
	}

	/// Makes calls for `id` finish last by sleeping after the barrier.
	pub fn delaying(mut self, id: &str) -> Self {
		self.delayed = Some(RecordId::from(id));
		self
	}

	/// The wrapped store.
	pub fn inner(&self) -> &MemoryStore {
		&self.inner
	}

	async fn pass(&self, id: Option<&RecordId>) {
		let Some(id) = id else {
			return;
		};
		if self.gated.contains(id) {
			self.gate.wait().await;
		}
		if self.delayed.as_ref() == Some(id) {
			tokio::time::sleep(Duration::from_millis(20)).await;
		}
	}
}

#[async_trait]
impl DocumentStore for GatedStore {
	async fn find_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<Option<Record>> {
		self.pass(Some(id)).await;
		self.inner.find_by_id(collection, id).await
	}

	async fn insert(&self, collection: &str, record: Record) -> StorageResult<Record> {
		self.pass(record.id(self.id_field()).as_ref()).await;
		self.inner.insert(collection, record).await
	}

	async fn upsert_by_id(
		&self,
		collection: &str,
		id: &RecordId,
		key: Value,
		fields: Record,
	) -> StorageResult<Record> {
		self.pass(Some(id)).await;
		self.inner.upsert_by_id(collection, id, key, fields).await
	}

	async fn delete_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<u64> {
		self.inner.delete_by_id(collection, id).await
	}
}

/// Awaits `future`, panicking if it misses [`DEADLINE`].
pub async fn within_deadline<F: Future>(future: F) -> F::Output {
	tokio::time::timeout(DEADLINE, future)
		.await
		.unwrap_or_else(|_| panic!("gated calls did not run concurrently"))
}
