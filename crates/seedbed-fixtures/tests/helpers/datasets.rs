//! Datasets shared by the integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use seedbed_core::{DatabaseSettings, Record, RecordId, Settings, Value};
use seedbed_fixtures::{DatasetSource, Seedbed};
use seedbed_storage::{DocumentStore, MemoryStore};

/// Users with write-only password material.
pub struct UserDataset;

impl DatasetSource for UserDataset {
	fn id(&self) -> &str {
		"User"
	}

	fn get_all(&self) -> Vec<Record> {
		vec![
			Record::new()
				.with("_id", "u0")
				.with("activated", true)
				.with("email", "u0@x.com"),
			Record::new()
				.with("_id", "u1")
				.with("activated", false)
				.with("email", "u1@x.com"),
		]
	}

	fn get_new(&self) -> Record {
		Record::new()
			.with("_id", "u2")
			.with("activated", true)
			.with("email", "u2@x.com")
			.with("password", "battery staple")
	}

	fn prepare_expected(&self, mut expected: Record) -> Record {
		expected.remove("password");
		expected.remove("securityAnswer");
		expected
	}
}

/// Applications owned by users.
pub struct ApplicationDataset;

impl DatasetSource for ApplicationDataset {
	fn id(&self) -> &str {
		"Application"
	}

	fn get_all(&self) -> Vec<Record> {
		vec![
			Record::new()
				.with("_id", "a0")
				.with("name", "Seeder")
				.with("user", Value::Reference(RecordId::from("u0"))),
			Record::new()
				.with("_id", "a1")
				.with("name", "Verifier")
				.with("user", Value::Reference(RecordId::from("u1"))),
		]
	}

	fn get_new(&self) -> Record {
		Record::new().with("_id", "a2").with("name", "Newcomer")
	}
}

/// Counters keyed by integral numbers.
pub struct CounterDataset;

impl DatasetSource for CounterDataset {
	fn id(&self) -> &str {
		"Counter"
	}

	fn get_all(&self) -> Vec<Record> {
		vec![
			Record::new().with("_id", 1).with("count", 10),
			Record::new().with("_id", 2).with("count", 20),
		]
	}

	fn get_new(&self) -> Record {
		Record::new().with("_id", 3).with("count", 0)
	}
}

/// A memory store and a seedbed wired to it.
pub fn memory_seedbed() -> (Arc<MemoryStore>, Seedbed) {
	let store = Arc::new(MemoryStore::new());
	let seedbed = Seedbed::builder()
		.settings(Settings::new().with_database(DatabaseSettings::with_type("memory")))
		.store(store.clone() as Arc<dyn DocumentStore>)
		.build();
	(store, seedbed)
}

/// Path of a file under `tests/data`.
pub fn data_path(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.join("tests")
		.join("data")
		.join(name)
}
