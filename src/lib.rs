//! # Seedbed
//!
//! Deterministic fixture seeding and verification for document stores.
//!
//! Seedbed inserts, upserts and removes named datasets through a pluggable
//! storage adapter, and checks stored records against their fixture
//! expectations with a structural comparator.
//!
//! ## Crates
//!
//! - [`core`] - record model, values and settings
//! - [`storage`] - adapter contract, transaction template and document stores
//! - [`fixtures`] - datasets, comparison and orchestration
//!
//! ## Feature Flags
//!
//! - `mongodb` - MongoDB-backed document store (`storage::MongoStore`)
//! - `full` - all features
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use seedbed::prelude::*;
//! use seedbed::core::DatabaseSettings;
//!
//! struct Users;
//!
//! impl DatasetSource for Users {
//! 	fn id(&self) -> &str {
//! 		"User"
//! 	}
//!
//! 	fn get_all(&self) -> Vec<Record> {
//! 		vec![
//! 			Record::new().with("_id", "u0").with("activated", true),
//! 			Record::new().with("_id", "u1").with("activated", false),
//! 		]
//! 	}
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(MemoryStore::new());
//! let seedbed = Seedbed::builder()
//! 	.settings(Settings::new().with_database(DatabaseSettings::with_type("memory")))
//! 	.store(store.clone())
//! 	.build();
//!
//! let users = seedbed.fixture(Users);
//! users.insert_all().await.unwrap();
//!
//! let stored = users.find_by_id(&RecordId::from("u1")).await.unwrap().unwrap();
//! assert!(users.compare_records(&stored, &users.get_all()[1]).is_ok());
//!
//! users.delete_all().await.unwrap();
//! assert_eq!(store.count("User"), 0);
//! # }
//! ```

pub use seedbed_core as core;
pub use seedbed_fixtures as fixtures;
pub use seedbed_storage as storage;

pub use seedbed_core::{Record, RecordId, Settings, Value};
pub use seedbed_fixtures::{
	Comparator, DatasetSource, Fixture, FixtureError, FixtureReport, FixtureResult, FixtureSet,
	JsonDataset, Mismatch, Seedbed,
};
pub use seedbed_storage::{
	BaseAdapter, CrudError, DocumentAdapter, DocumentStore, MemoryStore, StorageAdapter,
	StorageError, Transaction,
};

/// Prelude module for convenient imports
pub mod prelude {
	pub use seedbed_fixtures::prelude::*;

	// External
	pub use async_trait::async_trait;
}
