//! Dataset sources.
//!
//! A [`DatasetSource`] supplies the records of one named dataset: the
//! canonical set returned by [`get_all`](DatasetSource::get_all) and one
//! held-out record returned by [`get_new`](DatasetSource::get_new). Both are
//! returned by value on every call so fixture data stays reproducible.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use seedbed_core::{DEFAULT_ID_FIELD, Record};

use crate::error::{FixtureError, FixtureResult};

/// Records of one named dataset.
///
/// Only [`id`](DatasetSource::id) is required; the record accessors default
/// to an empty dataset.
///
/// # Example
///
/// ```
/// use seedbed_core::Record;
/// use seedbed_fixtures::DatasetSource;
///
/// struct Users;
///
/// impl DatasetSource for Users {
/// 	fn id(&self) -> &str {
/// 		"User"
/// 	}
///
/// 	fn get_all(&self) -> Vec<Record> {
/// 		vec![Record::new().with("_id", "u0").with("email", "u0@x.com")]
/// 	}
///
/// 	fn get_new(&self) -> Record {
/// 		Record::new().with("_id", "u9").with("email", "u9@x.com")
/// 	}
/// }
///
/// assert_eq!(Users.get_all().len(), 1);
/// ```
pub trait DatasetSource: Send + Sync {
	/// Dataset identifier, also used as the storage collection name.
	fn id(&self) -> &str;

	/// The canonical records.
	fn get_all(&self) -> Vec<Record> {
		Vec::new()
	}

	/// A record that is not part of the canonical set.
	fn get_new(&self) -> Record {
		Record::new()
	}

	/// Adjusts an expected record before comparison.
	///
	/// Datasets holding write-only attributes (password material, for
	/// example) drop them here so stored records can still be verified.
	fn prepare_expected(&self, expected: Record) -> Record {
		expected
	}
}

/// A dataset loaded from a JSON document.
///
/// ```json
/// {
///   "id": "User",
///   "records": [{ "_id": "u0", "activated": true }],
///   "new": { "_id": "u9", "activated": false }
/// }
/// ```
///
/// Identifiers are read from `_id` unless the document names another field
/// under `"id_field"`. It should match the identifier field of the store the
/// dataset is seeded into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonDataset {
	id: String,
	#[serde(default)]
	records: Vec<Record>,
	#[serde(default)]
	new: Record,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	write_only: Vec<String>,
	#[serde(default = "default_id_field", skip_serializing_if = "is_default_id_field")]
	id_field: String,
}

fn default_id_field() -> String {
	DEFAULT_ID_FIELD.to_string()
}

fn is_default_id_field(field: &str) -> bool {
	field == DEFAULT_ID_FIELD
}

impl JsonDataset {
	/// Creates a dataset from records in memory.
	pub fn new(id: impl Into<String>, records: Vec<Record>, new: Record) -> FixtureResult<Self> {
		let dataset = Self {
			id: id.into(),
			records,
			new,
			write_only: Vec::new(),
			id_field: default_id_field(),
		};
		dataset.validate()?;
		Ok(dataset)
	}

	/// Parses a dataset document.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Parse`] on malformed JSON or when identifiers
	/// are duplicated across the canonical and new records.
	pub fn from_json_str(content: &str) -> FixtureResult<Self> {
		let dataset: JsonDataset =
			serde_json::from_str(content).map_err(|e| FixtureError::Parse(e.to_string()))?;
		dataset.validate()?;
		Ok(dataset)
	}

	/// Reads and parses a dataset document.
	pub fn from_path(path: &Path) -> FixtureResult<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_json_str(&content)
	}

	/// Marks attributes that are dropped from expectations before comparison.
	pub fn with_write_only<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.write_only.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Reads identifiers from `field` and validates them again.
	///
	/// # Errors
	///
	/// Returns [`FixtureError::Parse`] when identifiers under `field` are
	/// duplicated or unusable.
	pub fn with_id_field(mut self, field: impl Into<String>) -> FixtureResult<Self> {
		self.id_field = field.into();
		self.validate()?;
		Ok(self)
	}

	/// Field holding record identifiers.
	pub fn id_field(&self) -> &str {
		&self.id_field
	}

	fn validate(&self) -> FixtureResult<()> {
		if self.id.trim().is_empty() {
			return Err(FixtureError::Parse("dataset id must not be empty".to_string()));
		}

		let mut seen = HashSet::new();
		for record in self.records.iter().chain(std::iter::once(&self.new)) {
			let id = record
				.try_id(&self.id_field)
				.map_err(|e| FixtureError::Parse(format!("dataset '{}': {}", self.id, e)))?;
			let Some(id) = id else {
				continue;
			};
			if !seen.insert(id.clone()) {
				return Err(FixtureError::Parse(format!(
					"dataset '{}' contains identifier '{}' more than once",
					self.id, id
				)));
			}
		}
		Ok(())
	}
}

impl DatasetSource for JsonDataset {
	fn id(&self) -> &str {
		&self.id
	}

	fn get_all(&self) -> Vec<Record> {
		self.records.clone()
	}

	fn get_new(&self) -> Record {
		self.new.clone()
	}

	fn prepare_expected(&self, mut expected: Record) -> Record {
		for field in &self.write_only {
			expected.remove(field);
		}
		expected
	}
}
