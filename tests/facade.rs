//! Facade re-exports and Extended JSON records through the whole stack.

use std::sync::Arc;

use rstest::*;
use serde_json::json;

use seedbed::core::DatabaseSettings;
use seedbed::prelude::*;

struct Sessions;

impl DatasetSource for Sessions {
	fn id(&self) -> &str {
		"Session"
	}

	fn get_all(&self) -> Vec<Record> {
		let raw = json!({
			"_id": { "$oid": "65f000000000000000000001" },
			"user": { "$oid": "65f0000000000000000000aa" },
			"expires": { "$date": "2024-03-01T23:00:00.000Z" },
			"active": true
		});
		vec![Record::from_json(raw).unwrap()]
	}
}

#[rstest]
#[tokio::test]
async fn test_extended_json_dataset_round_trip() {
	let store = Arc::new(MemoryStore::new());
	let seedbed = Seedbed::builder()
		.settings(Settings::new().with_database(DatabaseSettings::with_type("document")))
		.store(store.clone())
		.build();
	let sessions = seedbed.fixture(Sessions);

	let reports = seedbed
		.insert_fixture_data(&FixtureSet::new().with(sessions.clone()))
		.await
		.unwrap();
	assert_eq!(reports.len(), 1);

	let stored = sessions
		.find_by_id(&RecordId::from("65f000000000000000000001"))
		.await
		.unwrap()
		.unwrap();
	assert!(matches!(stored.get("user"), Some(Value::Reference(_))));
	assert!(sessions.compare_records(&stored, &sessions.get_all()[0]).is_ok());

	assert_eq!(
		stored.to_json()["expires"],
		json!({ "$date": "2024-03-01T23:00:00.000Z" })
	);

	seedbed.remove_fixture_data(&FixtureSet::new().with(sessions)).await.unwrap();
	assert_eq!(store.count("Session"), 0);
}
