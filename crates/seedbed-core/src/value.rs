//! Field values stored in records.
//!
//! [`Value`] is a closed set of variants. Comparison and storage code
//! dispatch on [`FieldKind`], which collapses the variants into the kinds
//! that have distinct verification rules.
//!
//! JSON interchange follows the MongoDB Extended JSON convention for the
//! two variants JSON cannot express natively:
//!
//! ```json
//! { "$date": "2024-05-01T12:00:00.000Z" }
//! { "$oid": "000000000000000000000001" }
//! ```

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::record::Record;

const DATE_MARKER: &str = "$date";
const OID_MARKER: &str = "$oid";

/// Identifier of a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
	/// Creates an identifier from anything string-like.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the identifier text.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Consumes the identifier, returning its text.
	pub fn into_inner(self) -> String {
		self.0
	}
}

impl fmt::Display for RecordId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RecordId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for RecordId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

/// Verification-relevant kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	/// `true` / `false`.
	Boolean,
	/// Text.
	String,
	/// Any number.
	Number,
	/// A point in time.
	Date,
	/// An identifier pointing at a record in another dataset.
	Reference,
	/// A nested record.
	Record,
	/// Anything else (null, lists).
	Unknown,
}

impl FieldKind {
	/// Human readable name used in diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			FieldKind::Boolean => "boolean",
			FieldKind::String => "string",
			FieldKind::Number => "number",
			FieldKind::Date => "date",
			FieldKind::Reference => "reference",
			FieldKind::Record => "record",
			FieldKind::Unknown => "unknown",
		}
	}
}

impl fmt::Display for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
	/// Absent value.
	#[default]
	Null,
	/// Boolean.
	Bool(bool),
	/// Number (integers are stored losslessly up to 2^53).
	Number(f64),
	/// Text.
	String(String),
	/// UTC timestamp.
	Date(DateTime<Utc>),
	/// Identifier of a record in another dataset.
	Reference(RecordId),
	/// Nested record.
	Record(Record),
	/// Ordered list of values.
	List(Vec<Value>),
}

impl Value {
	/// Builds a date value from epoch milliseconds.
	///
	/// Returns `None` when the timestamp is out of range.
	pub fn date_from_millis(millis: i64) -> Option<Self> {
		DateTime::from_timestamp_millis(millis).map(Value::Date)
	}

	/// Returns the verification kind of this value.
	pub fn kind(&self) -> FieldKind {
		match self {
			Value::Bool(_) => FieldKind::Boolean,
			Value::String(_) => FieldKind::String,
			Value::Number(_) => FieldKind::Number,
			Value::Date(_) => FieldKind::Date,
			Value::Reference(_) => FieldKind::Reference,
			Value::Record(_) => FieldKind::Record,
			Value::Null | Value::List(_) => FieldKind::Unknown,
		}
	}

	/// Returns `true` for values that count as "not provided".
	///
	/// Only `Null` and the empty string qualify; `false` and `0` are real values.
	pub fn is_omitted(&self) -> bool {
		match self {
			Value::Null => true,
			Value::String(s) => s.is_empty(),
			_ => false,
		}
	}

	/// Returns the text of a string or reference value.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			Value::Reference(id) => Some(id.as_str()),
			_ => None,
		}
	}

	/// Returns the boolean, if this is one.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	/// Returns the number, if this is one.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Returns the timestamp, if this is a date.
	pub fn as_datetime(&self) -> Option<&DateTime<Utc>> {
		match self {
			Value::Date(d) => Some(d),
			_ => None,
		}
	}

	/// Returns the nested record, if this is one.
	pub fn as_record(&self) -> Option<&Record> {
		match self {
			Value::Record(r) => Some(r),
			_ => None,
		}
	}

	/// Interprets a string or reference value as a record identifier.
	pub fn as_record_id(&self) -> Option<RecordId> {
		self.as_str().map(RecordId::from)
	}

	/// Converts this value to plain JSON using Extended JSON markers.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::from(self.clone())
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::String(s) => write!(f, "\"{}\"", s),
			Value::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
			Value::Reference(id) => write!(f, "ObjectId(\"{}\")", id),
			other => write!(f, "{}", other.to_json()),
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		match value {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or_default()),
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
			serde_json::Value::Object(map) => {
				if let Some(marker) = decode_marker(&map) {
					return marker;
				}
				Value::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
			}
		}
	}
}

/// Decodes a single-key `$date` / `$oid` object.
fn decode_marker(map: &serde_json::Map<String, serde_json::Value>) -> Option<Value> {
	if map.len() != 1 {
		return None;
	}
	if let Some(raw) = map.get(DATE_MARKER) {
		return match raw {
			serde_json::Value::String(s) => DateTime::parse_from_rfc3339(s)
				.ok()
				.map(|d| Value::Date(d.with_timezone(&Utc))),
			serde_json::Value::Number(n) => n.as_i64().and_then(Value::date_from_millis),
			_ => None,
		};
	}
	map.get(OID_MARKER)
		.and_then(serde_json::Value::as_str)
		.map(|s| Value::Reference(RecordId::from(s)))
}

impl From<Value> for serde_json::Value {
	fn from(value: Value) -> Self {
		match value {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(b),
			Value::Number(n) => number_to_json(n),
			Value::String(s) => serde_json::Value::String(s),
			Value::Date(d) => serde_json::json!({
				DATE_MARKER: d.to_rfc3339_opts(SecondsFormat::Millis, true)
			}),
			Value::Reference(id) => serde_json::json!({ OID_MARKER: id.into_inner() }),
			Value::Record(record) => serde_json::Value::from(record),
			Value::List(items) => {
				serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
			}
		}
	}
}

// Integral values go out as JSON integers so `0` does not become `0.0`.
fn number_to_json(n: f64) -> serde_json::Value {
	const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
	if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
		serde_json::Value::from(n as i64)
	} else {
		serde_json::Number::from_f64(n)
			.map(serde_json::Value::Number)
			.unwrap_or(serde_json::Value::Null)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Number(n)
	}
}

impl From<i64> for Value {
	fn from(n: i64) -> Self {
		Value::Number(n as f64)
	}
}

impl From<i32> for Value {
	fn from(n: i32) -> Self {
		Value::Number(f64::from(n))
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(d: DateTime<Utc>) -> Self {
		Value::Date(d)
	}
}

impl From<RecordId> for Value {
	fn from(id: RecordId) -> Self {
		Value::Reference(id)
	}
}

impl From<Record> for Value {
	fn from(record: Record) -> Self {
		Value::Record(record)
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Value::List(items)
	}
}
