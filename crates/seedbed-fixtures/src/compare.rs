//! Structural comparison of stored records against fixture expectations.
//!
//! The comparator walks the expected record and checks every attribute
//! against the actual record, stopping at the first mismatch. Each attribute
//! is checked according to the [`FieldKind`] of its expected value:
//!
//! | Kind        | Rule                                                          |
//! |-------------|---------------------------------------------------------------|
//! | `Boolean`   | exact equality                                                |
//! | `String`    | exact equality (a reference with the same text also matches)  |
//! | `Number`    | exact equality, or the same UTC day when the actual is a date |
//! | `Date`      | not compared                                                  |
//! | `Reference` | not compared                                                  |
//! | `Record`    | compared recursively with the same policy                     |
//! | `Unknown`   | not compared                                                  |
//!
//! Strict mode additionally requires equal attribute counts and a value for
//! every expected attribute. `Null` and the empty string count as "no value";
//! `false` and `0` are real values. Attributes listed in
//! [`Comparator::allow_empty`] may be empty even in strict mode.

use seedbed_core::{FieldKind, FixtureSettings, Record, Value};

use crate::error::{ComparisonOutcome, Mismatch};

/// Path reported for mismatches on the top-level record.
pub const ROOT_PATH: &str = "(root)";

/// Resolution of [`date_difference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePrecision {
	/// Whole UTC calendar days; time of day is discarded.
	Days,
	/// Raw milliseconds.
	Milliseconds,
}

/// Absolute difference between two date values.
///
/// Returns `None` when either value is not a date.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use seedbed_core::Value;
/// use seedbed_fixtures::compare::{DatePrecision, date_difference};
///
/// let morning = Value::from(Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap());
/// let evening = Value::from(Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).unwrap());
///
/// assert_eq!(date_difference(&morning, &evening, DatePrecision::Days), Some(0));
/// assert_eq!(
/// 	date_difference(&morning, &evening, DatePrecision::Milliseconds),
/// 	Some(52_200_000)
/// );
/// assert_eq!(date_difference(&morning, &Value::from(1), DatePrecision::Days), None);
/// ```
pub fn date_difference(a: &Value, b: &Value, precision: DatePrecision) -> Option<i64> {
	let (a, b) = (a.as_datetime()?, b.as_datetime()?);
	let difference = match precision {
		DatePrecision::Days => (a.date_naive() - b.date_naive()).num_days(),
		DatePrecision::Milliseconds => (*a - *b).num_milliseconds(),
	};
	Some(difference.abs())
}

/// Comparison policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparator {
	strict: bool,
	allow_empty: Vec<String>,
}

impl Comparator {
	/// Creates a comparator with the given strictness.
	pub fn new(strict: bool) -> Self {
		Self {
			strict,
			allow_empty: Vec::new(),
		}
	}

	/// Strict comparator.
	pub fn strict() -> Self {
		Self::new(true)
	}

	/// Non-strict comparator: extra attributes and empty expectations are accepted.
	pub fn lenient() -> Self {
		Self::new(false)
	}

	/// Comparator configured from the fixture settings section.
	pub fn from_settings(settings: &FixtureSettings) -> Self {
		Self::new(settings.strict).allow_empty(settings.allow_empty.iter().cloned())
	}

	/// Lets the named attributes be empty in strict mode.
	pub fn allow_empty<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.allow_empty.extend(fields.into_iter().map(Into::into));
		self
	}

	/// Returns `true` in strict mode.
	pub fn is_strict(&self) -> bool {
		self.strict
	}

	/// Compares an actual value against an expected one.
	pub fn compare(&self, actual: Option<&Value>, expected: Option<&Value>) -> ComparisonOutcome {
		self.compare_at(ROOT_PATH, actual, expected)
	}

	/// Compares two records.
	pub fn compare_records(&self, actual: &Record, expected: &Record) -> ComparisonOutcome {
		self.compare_record_at(ROOT_PATH, actual, expected)
	}

	fn compare_at(
		&self,
		path: &str,
		actual: Option<&Value>,
		expected: Option<&Value>,
	) -> ComparisonOutcome {
		match expected {
			Some(Value::Record(expected)) => match actual {
				Some(Value::Record(actual)) => self.compare_record_at(path, actual, expected),
				other => Err(Mismatch::Shape {
					path: path.to_string(),
					found: describe(other),
				}),
			},
			_ if self.strict => {
				if actual == expected {
					Ok(())
				} else {
					Err(value_mismatch(path, actual, expected))
				}
			}
			_ => match actual {
				None | Some(Value::Null) | Some(Value::Record(_)) => Ok(()),
				other => Err(Mismatch::Shape {
					path: path.to_string(),
					found: describe(other),
				}),
			},
		}
	}

	fn compare_record_at(&self, path: &str, actual: &Record, expected: &Record) -> ComparisonOutcome {
		if self.strict && actual.len() != expected.len() {
			return Err(Mismatch::AttributeCount {
				path: path.to_string(),
				actual: actual.len(),
				expected: expected.len(),
			});
		}

		for (key, expected_value) in expected.iter() {
			let field_path = join_path(path, key);
			if expected_value.is_omitted() {
				if self.strict && !self.allow_empty.iter().any(|f| f == key) {
					return Err(Mismatch::MissingValue { path: field_path });
				}
				continue;
			}
			self.compare_field(&field_path, actual.get(key), expected_value)?;
		}
		Ok(())
	}

	fn compare_field(&self, path: &str, actual: Option<&Value>, expected: &Value) -> ComparisonOutcome {
		let equal = match expected.kind() {
			FieldKind::Boolean => actual == Some(expected),
			FieldKind::String => match actual {
				Some(Value::Reference(id)) => expected.as_str() == Some(id.as_str()),
				other => other == Some(expected),
			},
			FieldKind::Number => match actual {
				Some(date @ Value::Date(_)) => expected
					.as_f64()
					.and_then(|millis| Value::date_from_millis(millis as i64))
					.and_then(|coerced| date_difference(date, &coerced, DatePrecision::Days))
					== Some(0),
				other => other == Some(expected),
			},
			FieldKind::Date | FieldKind::Reference => true,
			FieldKind::Record => return self.compare_at(path, actual, Some(expected)),
			FieldKind::Unknown => {
				tracing::debug!(path, value = %expected, "skipping attribute of unknown kind");
				true
			}
		};

		if equal {
			Ok(())
		} else {
			Err(value_mismatch(path, actual, Some(expected)))
		}
	}
}

fn join_path(parent: &str, key: &str) -> String {
	if parent == ROOT_PATH {
		key.to_string()
	} else {
		format!("{}.{}", parent, key)
	}
}

fn describe(value: Option<&Value>) -> String {
	match value {
		None => "nothing".to_string(),
		Some(Value::Null) => "null".to_string(),
		Some(value) => format!("{} {}", value.kind(), value),
	}
}

fn value_mismatch(path: &str, actual: Option<&Value>, expected: Option<&Value>) -> Mismatch {
	Mismatch::Value {
		path: path.to_string(),
		expected: describe(expected),
		actual: describe(actual),
	}
}
