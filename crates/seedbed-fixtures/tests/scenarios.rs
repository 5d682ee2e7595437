//! End-to-end seeding scenarios against the memory store.

mod helpers;

use std::sync::Arc;

use rstest::*;

use helpers::datasets::{
	ApplicationDataset, CounterDataset, UserDataset, data_path, memory_seedbed,
};
use helpers::logging::init_test_logging;
use seedbed_core::{Record, RecordId, Value};
use seedbed_fixtures::{Comparator, DatasetSource, FixtureError, FixtureSet, JsonDataset, Seedbed};
use seedbed_storage::{DocumentAdapter, MemoryStore, StorageError};

#[fixture]
fn seeded() -> (Arc<MemoryStore>, Seedbed) {
	init_test_logging();
	memory_seedbed()
}

#[rstest]
#[tokio::test]
async fn test_insert_then_delete_user_dataset(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);

	let report = users.insert_all().await.unwrap();
	assert_eq!(report.fixture_id, "User");
	assert_eq!(report.results.len(), 2);
	assert!(store.contains("User", &RecordId::from("u0")));
	assert!(store.contains("User", &RecordId::from("u1")));

	users.delete_all().await.unwrap();
	assert!(!store.contains("User", &RecordId::from("u0")));
	assert!(!store.contains("User", &RecordId::from("u1")));

	let adapter = DocumentAdapter::new(store.clone());
	adapter
		.remove_items_by_id("User", &[RecordId::from("u2")])
		.await
		.unwrap();
}

#[rstest]
#[tokio::test]
async fn test_upsert_all_twice_keeps_two_records(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);

	users.upsert_all().await.unwrap();
	users.upsert_all().await.unwrap();

	assert_eq!(store.count("User"), 2);
	for expected in UserDataset.get_all() {
		let id = expected.id("_id").unwrap();
		let stored = users.find_by_id(&id).await.unwrap().unwrap();
		assert_eq!(Comparator::strict().compare_records(&stored, &expected), Ok(()));
	}
}

#[rstest]
#[tokio::test]
async fn test_upsert_converges_on_latest_fields(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);
	users.upsert_all().await.unwrap();

	let changed = Record::new()
		.with("_id", "u0")
		.with("activated", false)
		.with("email", "changed@x.com");
	DocumentAdapter::new(store.clone())
		.upsert_item("User", changed.clone())
		.await
		.unwrap();

	assert_eq!(store.count("User"), 2);
	let stored = users.find_by_id(&RecordId::from("u0")).await.unwrap().unwrap();
	assert_eq!(Comparator::strict().compare_records(&stored, &changed), Ok(()));
}

#[rstest]
#[tokio::test]
async fn test_round_trip_matches_canonical_set(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (_store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);
	users.insert_all().await.unwrap();

	for expected in users.get_all() {
		let id = expected.id("_id").unwrap();
		let actual = users.find_by_id(&id).await.unwrap().map(Value::Record);
		assert_eq!(users.compare(actual.as_ref(), Some(&Value::Record(expected))), Ok(()));
	}
}

#[rstest]
#[tokio::test]
async fn test_held_out_record_is_cleaned_up(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);

	DocumentAdapter::new(store.clone())
		.add_item("User", users.get_new())
		.await
		.unwrap();
	users.insert_all().await.unwrap();
	assert_eq!(store.count("User"), 3);

	let report = users.delete_all().await.unwrap();
	assert_eq!(report.results.len(), 3);
	assert_eq!(store.count("User"), 0);
}

#[rstest]
#[tokio::test]
async fn test_write_only_fields_are_ignored_on_compare(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);
	let new_user = users.get_new();

	let mut stored = new_user.clone();
	stored.remove("password");
	DocumentAdapter::new(store.clone())
		.add_item("User", stored)
		.await
		.unwrap();

	let actual = users.find_by_id(&RecordId::from("u2")).await.unwrap().unwrap();
	let outcome = users.compare_with(
		Some(&Value::Record(actual)),
		Some(&Value::Record(new_user)),
		&Comparator::strict(),
	);
	assert_eq!(outcome, Ok(()));
}

#[rstest]
#[tokio::test]
async fn test_orchestrated_runs_report_in_supply_order(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let fixtures = seedbed.fixtures([
		Arc::new(ApplicationDataset) as Arc<dyn DatasetSource>,
		Arc::new(UserDataset) as Arc<dyn DatasetSource>,
	]);

	let reports = seedbed.insert_fixture_data(&fixtures).await.unwrap();
	let ids: Vec<_> = reports.iter().map(|r| r.fixture_id.as_str()).collect();
	assert_eq!(ids, vec!["Application", "User"]);
	assert_eq!(store.count("Application"), 2);
	assert_eq!(store.count("User"), 2);

	let reports = seedbed.upsert_fixture_data(&fixtures).await.unwrap();
	assert_eq!(reports.len(), 2);
	assert_eq!(store.count("User"), 2);

	let reports = seedbed.remove_fixture_data(&fixtures).await.unwrap();
	assert_eq!(reports[1].results.len(), 3);
	assert_eq!(store.count("Application"), 0);
	assert_eq!(store.count("User"), 0);
}

#[rstest]
#[tokio::test]
async fn test_orchestrated_run_fails_fast(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (_store, seedbed) = seeded;
	let fixtures = FixtureSet::new()
		.with(seedbed.fixture(UserDataset))
		.with(seedbed.fixture(ApplicationDataset));
	seedbed.insert_fixture_data(&fixtures).await.unwrap();

	let error = seedbed.insert_fixture_data(&fixtures).await.unwrap_err();

	match error {
		FixtureError::Crud { source, .. } => {
			assert!(matches!(source.error, StorageError::DuplicateKey { .. }));
			assert!(source.transaction.is_some());
		}
		other => panic!("unexpected error: {other}"),
	}
}

#[rstest]
#[tokio::test]
async fn test_references_populate_from_storage_and_dataset(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (_store, seedbed) = seeded;
	let users = seedbed.fixture(UserDataset);
	let applications = seedbed.fixture(ApplicationDataset);
	users.insert_all().await.unwrap();

	let owners: Vec<Value> = applications
		.get_all()
		.iter()
		.filter_map(|app| app.get("user").cloned())
		.collect();

	let from_storage = users.populate_ids(&owners).await.unwrap();
	let from_dataset = users.populate_ids_from_dataset(&owners);

	assert_eq!(from_storage, from_dataset);
	let emails: Vec<_> = from_dataset
		.iter()
		.filter_map(|v| v.as_ref().and_then(Value::as_record))
		.filter_map(|r| r.get("email").cloned())
		.collect();
	assert_eq!(emails, vec![Value::from("u0@x.com"), Value::from("u1@x.com")]);
}

#[rstest]
#[tokio::test]
async fn test_base_adapter_echoes_without_storing() {
	init_test_logging();
	let seedbed = Seedbed::default();
	let users = seedbed.fixture(UserDataset);

	let report = users.insert_all().await.unwrap();

	assert_eq!(report.results, UserDataset.get_all());
	assert!(users.find_by_id(&RecordId::from("u0")).await.unwrap().is_none());
}

#[rstest]
#[tokio::test]
async fn test_json_dataset_round_trip(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let dataset = JsonDataset::from_path(&data_path("users.json")).unwrap();
	let users = seedbed.fixture(dataset);

	users.insert_all().await.unwrap();
	assert_eq!(store.count("User"), 2);

	for expected in users.get_all() {
		let id = expected.id("_id").unwrap();
		assert_eq!(id.as_str().len(), 24);
		let actual = users.find_by_id(&id).await.unwrap().unwrap();
		assert_eq!(
			users.compare(Some(&Value::Record(actual)), Some(&Value::Record(expected))),
			Ok(())
		);
	}
}

#[rstest]
#[tokio::test]
async fn test_numeric_identifiers_are_kept(seeded: (Arc<MemoryStore>, Seedbed)) {
	let (store, seedbed) = seeded;
	let counters = seedbed.fixture(CounterDataset);

	counters.insert_all().await.unwrap();
	let stored_ids: Vec<_> = store
		.records("Counter")
		.iter()
		.filter_map(|r| r.get("_id").cloned())
		.collect();
	assert_eq!(stored_ids, vec![Value::from(1), Value::from(2)]);

	let found = counters.find_by_id(&RecordId::from("2")).await.unwrap().unwrap();
	assert_eq!(found.get("count"), Some(&Value::from(20)));
	assert_eq!(
		counters.find_in_dataset_by_id(&RecordId::from("1")).and_then(|r| r.get("count").cloned()),
		Some(Value::from(10))
	);

	counters.delete_all().await.unwrap();
	assert_eq!(store.count("Counter"), 0);

	counters.upsert_all().await.unwrap();
	counters.upsert_all().await.unwrap();
	assert_eq!(store.count("Counter"), 2);
	assert_eq!(store.records("Counter"), counters.get_all());
}
