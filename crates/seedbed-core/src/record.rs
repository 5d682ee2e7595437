//! Insertion-ordered field maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::value::{RecordId, Value};

/// Default name of the identifier field.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// A mapping from field name to [`Value`].
///
/// Field order is preserved. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub struct Record {
	fields: IndexMap<String, Value>,
}

impl Record {
	/// Creates an empty record.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a record from a JSON object.
	///
	/// # Errors
	///
	/// Returns [`CoreError::InvalidRecord`] if `value` is not an object, or is
	/// an Extended JSON marker such as `{"$date": ...}`.
	///
	/// # Example
	///
	/// ```
	/// use seedbed_core::Record;
	/// use serde_json::json;
	///
	/// let record = Record::from_json(json!({ "_id": "u0", "activated": true })).unwrap();
	/// assert_eq!(record.len(), 2);
	/// ```
	pub fn from_json(value: serde_json::Value) -> CoreResult<Self> {
		match Value::from(value) {
			Value::Record(record) => Ok(record),
			other => Err(CoreError::InvalidRecord(format!(
				"expected an object, found {}",
				other
			))),
		}
	}

	/// Converts the record to a JSON object.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::from(self.clone())
	}

	/// Builder-style insert.
	pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(field.into(), value.into());
		self
	}

	/// Inserts a field, returning the previous value.
	pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.fields.insert(field.into(), value.into())
	}

	/// Removes a field, keeping the order of the remaining fields.
	pub fn remove(&mut self, field: &str) -> Option<Value> {
		self.fields.shift_remove(field)
	}

	/// Returns the value of a field.
	pub fn get(&self, field: &str) -> Option<&Value> {
		self.fields.get(field)
	}

	/// Returns `true` if the field is present.
	pub fn contains_key(&self, field: &str) -> bool {
		self.fields.contains_key(field)
	}

	/// Number of fields.
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Returns `true` if the record has no fields.
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	/// Field names in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.fields.keys().map(String::as_str)
	}

	/// Fields in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.fields.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Resolves the record identifier stored under `id_field`.
	///
	/// String, reference and integral number values are accepted. Use
	/// [`Record::try_id`] to tell an absent identifier from an unusable one.
	pub fn id(&self, id_field: &str) -> Option<RecordId> {
		self.try_id(id_field).ok().flatten()
	}

	/// Resolves the record identifier stored under `id_field`.
	///
	/// Returns `Ok(None)` when the field is missing, null or empty.
	///
	/// # Errors
	///
	/// Returns [`CoreError::InvalidRecord`] when the field holds a value that
	/// cannot identify a record, such as a fractional number or a nested record.
	pub fn try_id(&self, id_field: &str) -> CoreResult<Option<RecordId>> {
		let Some(value) = self.get(id_field).filter(|v| !v.is_omitted()) else {
			return Ok(None);
		};
		let id = match value {
			Value::Number(n) => integral_id(*n),
			other => other.as_record_id(),
		};
		id.map(Some).ok_or_else(|| {
			CoreError::InvalidRecord(format!(
				"field `{}` holds {} `{}` which cannot identify a record",
				id_field,
				value.kind(),
				value
			))
		})
	}

	/// Copies every field of `other` into this record, overwriting existing ones.
	pub fn merge(&mut self, other: Record) {
		self.fields.extend(other.fields);
	}
}

impl FromIterator<(String, Value)> for Record {
	fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
		Self {
			fields: iter.into_iter().collect(),
		}
	}
}

impl IntoIterator for Record {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.into_iter()
	}
}

impl TryFrom<serde_json::Value> for Record {
	type Error = CoreError;

	fn try_from(value: serde_json::Value) -> CoreResult<Self> {
		Record::from_json(value)
	}
}

impl From<Record> for serde_json::Value {
	fn from(record: Record) -> Self {
		serde_json::Value::Object(
			record
				.fields
				.into_iter()
				.map(|(k, v)| (k, serde_json::Value::from(v)))
				.collect(),
		)
	}
}

// Largest magnitude an f64 holds without skipping integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn integral_id(n: f64) -> Option<RecordId> {
	(n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER)
		.then(|| RecordId::new((n as i64).to_string()))
}
