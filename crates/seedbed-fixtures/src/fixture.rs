//! Fixtures: a dataset bound to a storage adapter.

use std::sync::Arc;

use futures::future::try_join_all;

use seedbed_core::{FixtureSettings, Record, RecordId, Value};
use seedbed_storage::{CrudOptions, Items, StorageAdapter, Transaction, TransactionKind};

use crate::compare::Comparator;
use crate::error::{ComparisonOutcome, FixtureError, FixtureResult};
use crate::source::DatasetSource;

/// Outcome of one batch mutation against one fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureReport {
	/// Dataset identifier.
	pub fixture_id: String,
	/// The closed transaction.
	pub transaction: Transaction,
	/// Adapter results in input order.
	pub results: Vec<Record>,
}

/// A [`DatasetSource`] bound to the shared storage adapter.
///
/// The dataset identifier doubles as the collection name.
#[derive(Clone)]
pub struct Fixture {
	source: Arc<dyn DatasetSource>,
	adapter: Arc<dyn StorageAdapter>,
	comparator: Comparator,
}

impl std::fmt::Debug for Fixture {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Fixture")
			.field("id", &self.id())
			.field("adapter", &self.adapter.name())
			.field("comparator", &self.comparator)
			.finish()
	}
}

impl Fixture {
	/// Binds `source` to `adapter` with a non-strict comparator.
	pub fn new(source: Arc<dyn DatasetSource>, adapter: Arc<dyn StorageAdapter>) -> Self {
		Self {
			source,
			adapter,
			comparator: Comparator::lenient(),
		}
	}

	/// Applies the comparison defaults of the fixture settings section.
	pub fn with_settings(mut self, settings: &FixtureSettings) -> Self {
		self.comparator = Comparator::from_settings(settings);
		self
	}

	/// Replaces the default comparator.
	pub fn with_comparator(mut self, comparator: Comparator) -> Self {
		self.comparator = comparator;
		self
	}

	/// Dataset identifier.
	pub fn id(&self) -> &str {
		self.source.id()
	}

	/// The dataset source.
	pub fn source(&self) -> &Arc<dyn DatasetSource> {
		&self.source
	}

	/// The storage adapter.
	pub fn adapter(&self) -> &Arc<dyn StorageAdapter> {
		&self.adapter
	}

	/// The default comparator used by [`Fixture::compare`].
	pub fn comparator(&self) -> &Comparator {
		&self.comparator
	}

	/// The canonical records.
	pub fn get_all(&self) -> Vec<Record> {
		self.source.get_all()
	}

	/// The held-out record.
	pub fn get_new(&self) -> Record {
		self.source.get_new()
	}

	/// The canonical records followed by the held-out record.
	pub fn get_all_and_new(&self) -> Vec<Record> {
		let mut records = self.source.get_all();
		records.push(self.source.get_new());
		records
	}

	/// Inserts the canonical records.
	pub async fn insert_all(&self) -> FixtureResult<FixtureReport> {
		self.run(TransactionKind::Insert, self.get_all()).await
	}

	/// Upserts the canonical records.
	pub async fn upsert_all(&self) -> FixtureResult<FixtureReport> {
		self.run(TransactionKind::Upsert, self.get_all()).await
	}

	/// Removes the canonical records and the held-out record.
	///
	/// The held-out record is included so a previous insert test that
	/// stored it does not leak into the next run.
	pub async fn delete_all(&self) -> FixtureResult<FixtureReport> {
		self.run(TransactionKind::Delete, self.get_all_and_new()).await
	}

	async fn run(&self, kind: TransactionKind, records: Vec<Record>) -> FixtureResult<FixtureReport> {
		let options = CrudOptions::new(self.id());
		let items = Items::from(records);
		let outcome = match kind {
			TransactionKind::Insert => self.adapter.add(items, &options).await,
			TransactionKind::Upsert => self.adapter.upsert(items, &options).await,
			TransactionKind::Delete => self.adapter.remove(items, &options).await,
		}
		.map_err(|source| FixtureError::Crud {
			fixture_id: self.id().to_string(),
			source,
		})?;

		tracing::debug!(
			fixture = self.id(),
			%kind,
			results = outcome.results.len(),
			"fixture batch finished"
		);

		Ok(FixtureReport {
			fixture_id: self.id().to_string(),
			transaction: outcome.transaction,
			results: outcome.results,
		})
	}

	/// Looks a record up in storage.
	pub async fn find_by_id(&self, id: &RecordId) -> FixtureResult<Option<Record>> {
		self.adapter
			.find_item_by_id(self.id(), id)
			.await
			.map_err(|source| FixtureError::Lookup {
				fixture_id: self.id().to_string(),
				source,
			})
	}

	/// Looks a record up in the canonical and held-out records.
	///
	/// Returns the first match; no match is not an error.
	pub fn find_in_dataset_by_id(&self, id: &RecordId) -> Option<Record> {
		let id_field = self.adapter.id_field();
		self.get_all_and_new()
			.into_iter()
			.find(|record| record.id(id_field).as_ref() == Some(id))
	}

	/// Resolves a value to a full record using storage.
	///
	/// A record is returned as is and an identifier is looked up. Any other
	/// value is logged and resolves to `None`.
	pub async fn populate_id(&self, value: &Value) -> FixtureResult<Option<Value>> {
		match value {
			Value::Record(_) => Ok(Some(value.clone())),
			_ => match value.as_record_id() {
				Some(id) => Ok(self.find_by_id(&id).await?.map(Value::Record)),
				None => {
					tracing::warn!(fixture = self.id(), value = %value, "invalid value to populate");
					Ok(None)
				}
			},
		}
	}

	/// Resolves every value concurrently. Results follow input order.
	pub async fn populate_ids(&self, values: &[Value]) -> FixtureResult<Vec<Option<Value>>> {
		try_join_all(values.iter().map(|value| self.populate_id(value))).await
	}

	/// Resolves a value to a full record using the dataset itself.
	///
	/// A record is returned as is and an identifier is looked up in the
	/// dataset. Any other value passes through unchanged.
	pub fn populate_id_from_dataset(&self, value: &Value) -> Option<Value> {
		match value.as_record_id() {
			Some(id) => self.find_in_dataset_by_id(&id).map(Value::Record),
			None => Some(value.clone()),
		}
	}

	/// Resolves every value against the dataset. Results follow input order.
	pub fn populate_ids_from_dataset(&self, values: &[Value]) -> Vec<Option<Value>> {
		values
			.iter()
			.map(|value| self.populate_id_from_dataset(value))
			.collect()
	}

	/// Compares `actual` against `expected` with the fixture's comparator.
	///
	/// The dataset may adjust `expected` first, see
	/// [`DatasetSource::prepare_expected`].
	pub fn compare(&self, actual: Option<&Value>, expected: Option<&Value>) -> ComparisonOutcome {
		self.compare_with(actual, expected, &self.comparator)
	}

	/// Compares with an explicit comparator.
	pub fn compare_with(
		&self,
		actual: Option<&Value>,
		expected: Option<&Value>,
		comparator: &Comparator,
	) -> ComparisonOutcome {
		let prepared = expected.map(|value| match value {
			Value::Record(record) => Value::Record(self.source.prepare_expected(record.clone())),
			other => other.clone(),
		});
		comparator.compare(actual, prepared.as_ref())
	}

	/// Compares two records with the fixture's comparator.
	pub fn compare_records(&self, actual: &Record, expected: &Record) -> ComparisonOutcome {
		let expected = self.source.prepare_expected(expected.clone());
		self.comparator.compare_records(actual, &expected)
	}
}
