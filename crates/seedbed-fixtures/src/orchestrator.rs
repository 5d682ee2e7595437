//! Batch orchestration across many fixtures.
//!
//! [`Seedbed`] is the context object that owns the settings and the shared
//! storage adapter. It binds dataset sources into [`Fixture`]s and runs
//! insert, upsert or remove across a whole [`FixtureSet`] concurrently.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use seedbed_core::{DatabaseSettings, Record, Settings};
//! use seedbed_fixtures::{DatasetSource, Seedbed};
//! use seedbed_storage::MemoryStore;
//!
//! struct Users;
//!
//! impl DatasetSource for Users {
//! 	fn id(&self) -> &str {
//! 		"User"
//! 	}
//!
//! 	fn get_all(&self) -> Vec<Record> {
//! 		vec![Record::new().with("_id", "u0")]
//! 	}
//! }
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let seedbed = Seedbed::builder()
//! 	.settings(Settings::new().with_database(DatabaseSettings::with_type("memory")))
//! 	.store(store.clone())
//! 	.build();
//!
//! let fixtures = seedbed.fixtures([Arc::new(Users) as Arc<dyn DatasetSource>]);
//! let reports = seedbed.insert_fixture_data(&fixtures).await.unwrap();
//!
//! assert_eq!(reports[0].fixture_id, "User");
//! assert_eq!(store.count("User"), 1);
//! # });
//! ```

use std::sync::Arc;

use futures::future::try_join_all;
use indexmap::IndexMap;

use seedbed_core::Settings;
use seedbed_storage::{DocumentStore, StorageAdapter, TransactionKind, adapter_for};

use crate::error::FixtureResult;
use crate::fixture::{Fixture, FixtureReport};
use crate::source::DatasetSource;

/// Insertion-ordered set of fixtures keyed by dataset identifier.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
	fixtures: IndexMap<String, Fixture>,
}

impl FixtureSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert.
	pub fn with(mut self, fixture: Fixture) -> Self {
		self.insert(fixture);
		self
	}

	/// Adds a fixture, replacing and returning one with the same identifier.
	///
	/// A replaced fixture keeps its original position.
	pub fn insert(&mut self, fixture: Fixture) -> Option<Fixture> {
		self.fixtures.insert(fixture.id().to_string(), fixture)
	}

	/// Looks a fixture up by dataset identifier.
	pub fn get(&self, id: &str) -> Option<&Fixture> {
		self.fixtures.get(id)
	}

	/// Dataset identifiers in supply order.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.fixtures.keys().map(String::as_str)
	}

	/// Fixtures in supply order.
	pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
		self.fixtures.values()
	}

	/// Number of fixtures.
	pub fn len(&self) -> usize {
		self.fixtures.len()
	}

	/// Returns `true` when the set is empty.
	pub fn is_empty(&self) -> bool {
		self.fixtures.is_empty()
	}
}

impl FromIterator<Fixture> for FixtureSet {
	fn from_iter<I: IntoIterator<Item = Fixture>>(iter: I) -> Self {
		let mut set = FixtureSet::new();
		for fixture in iter {
			set.insert(fixture);
		}
		set
	}
}

/// Settings, driver handle and adapter shared by every fixture of a run.
pub struct Seedbed {
	settings: Settings,
	store: Option<Arc<dyn DocumentStore>>,
	adapter: Arc<dyn StorageAdapter>,
}

impl std::fmt::Debug for Seedbed {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Seedbed")
			.field("settings", &self.settings)
			.field("store", &self.store.is_some())
			.field("adapter", &self.adapter.name())
			.finish()
	}
}

impl Default for Seedbed {
	fn default() -> Self {
		Self::new(Settings::default(), None)
	}
}

impl Seedbed {
	/// Creates a context and selects its adapter.
	pub fn new(settings: Settings, store: Option<Arc<dyn DocumentStore>>) -> Self {
		let adapter = adapter_for(&settings.database, store.clone());
		Self {
			settings,
			store,
			adapter,
		}
	}

	/// Starts a builder.
	pub fn builder() -> SeedbedBuilder {
		SeedbedBuilder::default()
	}

	/// Current settings.
	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	/// The shared storage adapter.
	pub fn adapter(&self) -> &Arc<dyn StorageAdapter> {
		&self.adapter
	}

	/// Replaces the settings wholesale and selects the adapter again.
	///
	/// Fixtures bound earlier keep the adapter they were bound to. Use
	/// [`Seedbed::update_settings`] to change single values.
	pub fn set_settings(&mut self, settings: Settings) {
		self.adapter = adapter_for(&settings.database, self.store.clone());
		self.settings = settings;
	}

	/// Edits the current settings in place and selects the adapter again.
	///
	/// Values the closure leaves alone are kept.
	///
	/// ```
	/// use seedbed_fixtures::Seedbed;
	///
	/// let mut seedbed = Seedbed::default();
	/// seedbed.update_settings(|s| s.fixture.strict = true);
	/// seedbed.update_settings(|s| s.database.engine = Some("memory".to_string()));
	///
	/// assert!(seedbed.settings().fixture.strict);
	/// ```
	pub fn update_settings<F>(&mut self, update: F)
	where
		F: FnOnce(&mut Settings),
	{
		update(&mut self.settings);
		self.adapter = adapter_for(&self.settings.database, self.store.clone());
	}

	/// Replaces the driver handle and selects the adapter again.
	pub fn set_store(&mut self, store: Option<Arc<dyn DocumentStore>>) {
		self.adapter = adapter_for(&self.settings.database, store.clone());
		self.store = store;
	}

	/// Restores default settings, which select the base adapter.
	pub fn reset_settings(&mut self) {
		self.set_settings(Settings::default());
	}

	/// Binds a dataset source to the shared adapter.
	pub fn fixture<S>(&self, source: S) -> Fixture
	where
		S: DatasetSource + 'static,
	{
		self.bind(Arc::new(source))
	}

	/// Binds an already shared dataset source.
	pub fn bind(&self, source: Arc<dyn DatasetSource>) -> Fixture {
		Fixture::new(source, self.adapter.clone()).with_settings(&self.settings.fixture)
	}

	/// Binds every source into a [`FixtureSet`], keeping supply order.
	pub fn fixtures<I>(&self, sources: I) -> FixtureSet
	where
		I: IntoIterator<Item = Arc<dyn DatasetSource>>,
	{
		sources.into_iter().map(|source| self.bind(source)).collect()
	}

	/// Inserts the canonical records of every fixture.
	///
	/// Fixtures run concurrently; reports follow supply order. The first
	/// failure aborts the run.
	pub async fn insert_fixture_data(&self, fixtures: &FixtureSet) -> FixtureResult<Vec<FixtureReport>> {
		self.run(fixtures, TransactionKind::Insert).await
	}

	/// Upserts the canonical records of every fixture.
	pub async fn upsert_fixture_data(&self, fixtures: &FixtureSet) -> FixtureResult<Vec<FixtureReport>> {
		self.run(fixtures, TransactionKind::Upsert).await
	}

	/// Removes the canonical and held-out records of every fixture.
	pub async fn remove_fixture_data(&self, fixtures: &FixtureSet) -> FixtureResult<Vec<FixtureReport>> {
		self.run(fixtures, TransactionKind::Delete).await
	}

	async fn run(&self, fixtures: &FixtureSet, kind: TransactionKind) -> FixtureResult<Vec<FixtureReport>> {
		let reports = try_join_all(fixtures.iter().map(|fixture| async move {
			match kind {
				TransactionKind::Insert => fixture.insert_all().await,
				TransactionKind::Upsert => fixture.upsert_all().await,
				TransactionKind::Delete => fixture.delete_all().await,
			}
		}))
		.await
		.map_err(|error| {
			tracing::error!(%kind, %error, "fixture data run failed");
			error
		})?;

		tracing::info!(
			%kind,
			fixtures = reports.len(),
			records = reports.iter().map(|r| r.results.len()).sum::<usize>(),
			"fixture data applied"
		);
		Ok(reports)
	}
}

/// Builder for [`Seedbed`].
#[derive(Default)]
pub struct SeedbedBuilder {
	settings: Settings,
	store: Option<Arc<dyn DocumentStore>>,
}

impl SeedbedBuilder {
	/// Sets the settings.
	pub fn settings(mut self, settings: Settings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the driver handle.
	pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
		self.store = Some(store);
		self
	}

	/// Builds the context.
	pub fn build(self) -> Seedbed {
		Seedbed::new(self.settings, self.store)
	}
}
