//! MongoDB document store.
//!
//! Records are converted to BSON documents field by field. Identifiers that
//! are 24-character hex strings are stored as `ObjectId`, integral numbers as
//! `Int64` and every other identifier as a plain string.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use seedbed_storage::{DocumentAdapter, MongoStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MongoStore::connect("mongodb://localhost:27017", "seedbed").await?;
//! let adapter = DocumentAdapter::new(Arc::new(store));
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{Bson, Document, doc};
use chrono::{DateTime, Utc};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Database};

use seedbed_core::{DEFAULT_ID_FIELD, Record, RecordId, Value};

use crate::error::{StorageError, StorageResult};
use crate::store::DocumentStore;

/// [`DocumentStore`] backed by a MongoDB database handle.
#[derive(Debug, Clone)]
pub struct MongoStore {
	database: Database,
}

impl MongoStore {
	/// Wraps an existing database handle.
	pub fn new(database: Database) -> Self {
		Self { database }
	}

	/// Connects to `url` and selects `database`.
	pub async fn connect(url: &str, database: &str) -> StorageResult<Self> {
		let client = Client::with_uri_str(url)
			.await
			.map_err(|e| StorageError::Database(e.to_string()))?;
		Ok(Self::new(client.database(database)))
	}

	/// The underlying database handle.
	pub fn database(&self) -> &Database {
		&self.database
	}

	fn collection(&self, name: &str) -> mongodb::Collection<Document> {
		self.database.collection::<Document>(name)
	}
}

#[async_trait]
impl DocumentStore for MongoStore {
	async fn find_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<Option<Record>> {
		let found = self
			.collection(collection)
			.find_one(id_filter(id))
			.await
			.map_err(|e| StorageError::Database(e.to_string()))?;
		Ok(found.map(document_to_record))
	}

	async fn insert(&self, collection: &str, record: Record) -> StorageResult<Record> {
		let mut document = record_to_document(&record);
		if record.try_id(DEFAULT_ID_FIELD)?.is_some() {
			if let Some(key) = record.get(DEFAULT_ID_FIELD) {
				document.insert(DEFAULT_ID_FIELD, key_to_bson(key));
			}
		} else {
			document.remove(DEFAULT_ID_FIELD);
		}

		let result = self
			.collection(collection)
			.insert_one(document.clone())
			.await
			.map_err(map_write_error(collection, &record))?;

		document.insert(DEFAULT_ID_FIELD, result.inserted_id);
		Ok(document_to_record(document))
	}

	async fn upsert_by_id(
		&self,
		collection: &str,
		id: &RecordId,
		key: Value,
		fields: Record,
	) -> StorageResult<Record> {
		let filter = doc! { "_id": key_to_bson(&key) };

		// An empty `$set` is rejected by the server.
		if fields.is_empty() {
			if let Some(existing) = self.find_by_id(collection, id).await? {
				return Ok(existing);
			}
			return self
				.insert(collection, Record::new().with(DEFAULT_ID_FIELD, key))
				.await;
		}

		let updated = self
			.collection(collection)
			.find_one_and_update(filter, doc! { "$set": record_to_document(&fields) })
			.upsert(true)
			.return_document(ReturnDocument::After)
			.await
			.map_err(|e| StorageError::Database(e.to_string()))?;

		updated.map(document_to_record).ok_or_else(|| {
			StorageError::Database(format!("upsert of {}/{} returned no document", collection, id))
		})
	}

	async fn delete_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<u64> {
		let result = self
			.collection(collection)
			.delete_one(id_filter(id))
			.await
			.map_err(|e| StorageError::Database(e.to_string()))?;
		Ok(result.deleted_count)
	}
}

fn map_write_error<'a>(
	collection: &'a str,
	record: &'a Record,
) -> impl FnOnce(mongodb::error::Error) -> StorageError + 'a {
	move |error| {
		// 11000 is the server's duplicate key code.
		let duplicate = matches!(
			error.kind.as_ref(),
			mongodb::error::ErrorKind::Write(mongodb::error::WriteFailure::WriteError(w)) if w.code == 11000
		);
		match (duplicate, record.id(DEFAULT_ID_FIELD)) {
			(true, Some(id)) => StorageError::DuplicateKey {
				collection: collection.to_string(),
				id: id.into_inner(),
			},
			_ => StorageError::Database(error.to_string()),
		}
	}
}

fn id_to_bson(id: &RecordId) -> Bson {
	match ObjectId::parse_str(id.as_str()) {
		Ok(oid) if id.as_str().len() == 24 => Bson::ObjectId(oid),
		_ => Bson::String(id.as_str().to_string()),
	}
}

// Identifier values keep their type; strings get the same treatment as ids.
fn key_to_bson(key: &Value) -> Bson {
	match key {
		Value::String(s) => id_to_bson(&RecordId::from(s.as_str())),
		other => value_to_bson(other),
	}
}

// A numeric identifier is matched in both its stored forms.
fn id_filter(id: &RecordId) -> Document {
	match id.as_str().parse::<i64>() {
		Ok(n) => doc! { "_id": { "$in": [id_to_bson(id), Bson::Int64(n)] } },
		Err(_) => doc! { "_id": id_to_bson(id) },
	}
}

fn record_to_document(record: &Record) -> Document {
	let mut document = Document::new();
	for (field, value) in record.iter() {
		document.insert(field, value_to_bson(value));
	}
	document
}

fn value_to_bson(value: &Value) -> Bson {
	match value {
		Value::Null => Bson::Null,
		Value::Bool(b) => Bson::Boolean(*b),
		Value::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Bson::Int64(*n as i64),
		Value::Number(n) => Bson::Double(*n),
		Value::String(s) => Bson::String(s.clone()),
		Value::Date(d) => Bson::DateTime(bson::DateTime::from_millis(d.timestamp_millis())),
		Value::Reference(id) => id_to_bson(id),
		Value::Record(record) => Bson::Document(record_to_document(record)),
		Value::List(items) => Bson::Array(items.iter().map(value_to_bson).collect()),
	}
}

fn document_to_record(document: Document) -> Record {
	document
		.into_iter()
		.map(|(field, value)| (field.to_string(), bson_to_value(value)))
		.collect()
}

fn bson_to_value(value: Bson) -> Value {
	match value {
		Bson::Null | Bson::Undefined => Value::Null,
		Bson::Boolean(b) => Value::Bool(b),
		Bson::Int32(n) => Value::Number(f64::from(n)),
		Bson::Int64(n) => Value::Number(n as f64),
		Bson::Double(n) => Value::Number(n),
		Bson::String(s) => Value::String(s),
		Bson::DateTime(d) => DateTime::<Utc>::from_timestamp_millis(d.timestamp_millis())
			.map(Value::Date)
			.unwrap_or(Value::Null),
		Bson::ObjectId(oid) => Value::Reference(RecordId::new(oid.to_hex())),
		Bson::Document(document) => Value::Record(document_to_record(document)),
		Bson::Array(items) => Value::List(items.into_iter().map(bson_to_value).collect()),
		other => Value::String(other.to_string()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("000000000000000000000001", true)]
	#[case("u0", false)]
	#[case("zzzzzzzzzzzzzzzzzzzzzzzz", false)]
	fn test_id_to_bson(#[case] id: &str, #[case] object_id: bool) {
		let bson = id_to_bson(&RecordId::from(id));
		assert_eq!(matches!(bson, Bson::ObjectId(_)), object_id);
	}

	#[rstest]
	fn test_record_document_conversion() {
		let created = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
		let record = Record::new()
			.with("_id", Value::Reference(RecordId::from("000000000000000000000001")))
			.with("email", "u0@x.com")
			.with("admin", false)
			.with("logins", 3)
			.with("created", created)
			.with("profile", Record::new().with("name", "Ada"));

		let document = record_to_document(&record);
		assert!(matches!(document.get("_id"), Some(Bson::ObjectId(_))));
		assert!(matches!(document.get("logins"), Some(Bson::Int64(3))));

		assert_eq!(document_to_record(document), record);
	}

	#[rstest]
	fn test_identifier_values_keep_their_type() {
		assert!(matches!(key_to_bson(&Value::from(7)), Bson::Int64(7)));
		assert!(matches!(
			key_to_bson(&Value::from("000000000000000000000001")),
			Bson::ObjectId(_)
		));
		assert!(matches!(key_to_bson(&Value::from("u0")), Bson::String(_)));
	}

	#[rstest]
	fn test_numeric_identifier_filter_matches_both_forms() {
		let filter = id_filter(&RecordId::from("7"));
		let candidates = filter.get_document("_id").unwrap().get_array("$in").unwrap();
		assert_eq!(candidates, &vec![Bson::String("7".to_string()), Bson::Int64(7)]);

		assert_eq!(id_filter(&RecordId::from("u0")), doc! { "_id": "u0" });
	}
}
