//! The storage adapter contract and its transaction template.
//!
//! Every public mutation ([`StorageAdapter::add`], [`StorageAdapter::upsert`],
//! [`StorageAdapter::remove`]) runs the same template:
//!
//! 1. `start_transaction`; on failure return immediately with no results.
//! 2. The adapter-specific hook (`add_items` / `upsert_items` / `remove_items`).
//! 3. On hook failure call `failed_transaction`. If that fails too, both
//!    errors are surfaced as [`StorageError::TransactionFailed`], original
//!    error first.
//! 4. On success call `end_transaction` and return its transaction together
//!    with the hook's results.
//!
//! The lifecycle hooks default to pass-through, so adapters without real
//! transactional backing only implement the item hooks.

use async_trait::async_trait;

use seedbed_core::{DEFAULT_ID_FIELD, Record, RecordId};

use crate::error::{CrudError, StorageError, StorageResult};
use crate::transaction::{Transaction, TransactionKind};

/// One record or a batch of records.
///
/// Adapter hooks normalize with [`Items::into_vec`] before dispatching.
#[derive(Debug, Clone, PartialEq)]
pub enum Items {
	/// A single record.
	One(Record),
	/// A batch of records.
	Many(Vec<Record>),
}

impl Items {
	/// Normalizes to a batch.
	pub fn into_vec(self) -> Vec<Record> {
		match self {
			Items::One(record) => vec![record],
			Items::Many(records) => records,
		}
	}

	/// Number of records.
	pub fn len(&self) -> usize {
		match self {
			Items::One(_) => 1,
			Items::Many(records) => records.len(),
		}
	}

	/// Returns `true` for an empty batch.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl From<Record> for Items {
	fn from(record: Record) -> Self {
		Items::One(record)
	}
}

impl From<Vec<Record>> for Items {
	fn from(records: Vec<Record>) -> Self {
		Items::Many(records)
	}
}

/// Options for one batch mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrudOptions {
	collection: String,
}

impl CrudOptions {
	/// Targets the given collection.
	pub fn new(collection: impl Into<String>) -> Self {
		Self {
			collection: collection.into(),
		}
	}

	/// The target collection.
	pub fn collection(&self) -> &str {
		&self.collection
	}
}

/// Successful outcome of one batch mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CrudOutcome {
	/// The closed transaction.
	pub transaction: Transaction,
	/// Hook results, in input order.
	pub results: Vec<Record>,
}

/// Translates generic batch mutations into engine-specific operations.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
	/// Adapter name used in logs.
	fn name(&self) -> &str;

	/// Field that holds record identifiers.
	fn id_field(&self) -> &str {
		DEFAULT_ID_FIELD
	}

	/// Called before any mutation.
	async fn start_transaction(
		&self,
		kind: TransactionKind,
		_items: &Items,
		options: &CrudOptions,
	) -> StorageResult<Transaction> {
		Ok(Transaction::new(kind, options.collection()))
	}

	/// Called when a mutation finished successfully.
	async fn end_transaction(&self, _transaction: &mut Transaction) -> StorageResult<()> {
		Ok(())
	}

	/// Called when a mutation failed.
	async fn failed_transaction(
		&self,
		_transaction: &mut Transaction,
		_error: &StorageError,
	) -> StorageResult<()> {
		Ok(())
	}

	/// Inserts records, returning them as persisted.
	async fn add_items(
		&self,
		items: Items,
		options: &CrudOptions,
		transaction: &Transaction,
	) -> StorageResult<Vec<Record>>;

	/// Inserts or updates records by identifier.
	async fn upsert_items(
		&self,
		items: Items,
		options: &CrudOptions,
		transaction: &Transaction,
	) -> StorageResult<Vec<Record>>;

	/// Removes records by identifier.
	async fn remove_items(
		&self,
		items: Items,
		options: &CrudOptions,
		transaction: &Transaction,
	) -> StorageResult<Vec<Record>>;

	/// Looks a record up by identifier.
	async fn find_item_by_id(&self, collection: &str, id: &RecordId)
	-> StorageResult<Option<Record>>;

	/// Inserts one or more records inside a transaction.
	async fn add(&self, items: Items, options: &CrudOptions) -> Result<CrudOutcome, CrudError> {
		execute(self, TransactionKind::Insert, items, options).await
	}

	/// Upserts one or more records inside a transaction.
	async fn upsert(&self, items: Items, options: &CrudOptions) -> Result<CrudOutcome, CrudError> {
		execute(self, TransactionKind::Upsert, items, options).await
	}

	/// Removes one or more records inside a transaction.
	async fn remove(&self, items: Items, options: &CrudOptions) -> Result<CrudOutcome, CrudError> {
		execute(self, TransactionKind::Delete, items, options).await
	}
}

async fn execute<A>(
	adapter: &A,
	kind: TransactionKind,
	items: Items,
	options: &CrudOptions,
) -> Result<CrudOutcome, CrudError>
where
	A: StorageAdapter + ?Sized,
{
	let mut transaction = adapter
		.start_transaction(kind, &items, options)
		.await
		.map_err(|error| {
			tracing::error!(
				adapter = adapter.name(),
				collection = options.collection(),
				%kind,
				%error,
				"failed to start transaction"
			);
			CrudError::new(error, None)
		})?;

	tracing::debug!(
		adapter = adapter.name(),
		collection = options.collection(),
		%kind,
		transaction = %transaction.id(),
		items = items.len(),
		"transaction started"
	);

	let outcome = match kind {
		TransactionKind::Insert => adapter.add_items(items, options, &transaction).await,
		TransactionKind::Upsert => adapter.upsert_items(items, options, &transaction).await,
		TransactionKind::Delete => adapter.remove_items(items, options, &transaction).await,
	};

	match outcome {
		Ok(results) => match adapter.end_transaction(&mut transaction).await {
			Ok(()) => {
				tracing::debug!(
					transaction = %transaction.id(),
					results = results.len(),
					"transaction ended"
				);
				Ok(CrudOutcome {
					transaction,
					results,
				})
			}
			Err(error) => Err(CrudError::new(error, Some(transaction))),
		},
		Err(error) => {
			tracing::error!(
				adapter = adapter.name(),
				collection = options.collection(),
				%kind,
				transaction = %transaction.id(),
				%error,
				"transaction failed"
			);
			match adapter.failed_transaction(&mut transaction, &error).await {
				Ok(()) => Err(CrudError::new(error, Some(transaction))),
				Err(closing) => {
					tracing::error!(
						transaction = %transaction.id(),
						error = %closing,
						"failed to record transaction failure"
					);
					Err(CrudError::new(
						StorageError::TransactionFailed {
							operation: Box::new(error),
							transaction: Box::new(closing),
						},
						Some(transaction),
					))
				}
			}
		}
	}
}
