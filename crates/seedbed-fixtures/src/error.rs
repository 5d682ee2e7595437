//! Error types for fixtures and record comparison.

use thiserror::Error;

use seedbed_core::CoreError;
use seedbed_storage::{CrudError, StorageError};

/// Errors raised while seeding, looking up or loading fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
	/// A batch mutation for one fixture failed.
	#[error("Fixture '{fixture_id}' failed: {source}")]
	Crud {
		/// Dataset identifier.
		fixture_id: String,
		/// The adapter failure, including its transaction.
		#[source]
		source: CrudError,
	},

	/// A storage lookup for one fixture failed.
	#[error("Lookup in fixture '{fixture_id}' failed: {source}")]
	Lookup {
		/// Dataset identifier.
		fixture_id: String,
		/// The adapter failure.
		#[source]
		source: StorageError,
	},

	/// A dataset document could not be parsed.
	#[error("Parse error: {0}")]
	Parse(String),

	/// Record model or settings error.
	#[error(transparent)]
	Core(#[from] CoreError),

	/// IO error while reading a dataset document.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl FixtureError {
	/// Identifier of the fixture the error belongs to, if any.
	pub fn fixture_id(&self) -> Option<&str> {
		match self {
			FixtureError::Crud { fixture_id, .. } | FixtureError::Lookup { fixture_id, .. } => {
				Some(fixture_id)
			}
			_ => None,
		}
	}
}

/// Result type alias for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;

/// First difference found between an actual and an expected record.
///
/// `path` is the dotted field path, or `(root)` for the top-level record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
	/// A record was expected but the actual value is missing or of another shape.
	#[error("{path}: expected a record, found {found}")]
	Shape {
		/// Field path.
		path: String,
		/// Description of the actual value.
		found: String,
	},

	/// Strict mode found a different number of attributes.
	#[error("{path}: record contains {actual} attributes when {expected} were expected in strict mode")]
	AttributeCount {
		/// Field path.
		path: String,
		/// Attribute count of the actual record.
		actual: usize,
		/// Attribute count of the expected record.
		expected: usize,
	},

	/// Strict mode found an expected attribute without a value.
	#[error("{path}: attribute is required in the expected record when using strict mode")]
	MissingValue {
		/// Field path.
		path: String,
	},

	/// Values differ.
	#[error("{path}: expected {expected}, found {actual}")]
	Value {
		/// Field path.
		path: String,
		/// Rendered expected value.
		expected: String,
		/// Rendered actual value.
		actual: String,
	},
}

impl Mismatch {
	/// Field path where the comparison stopped.
	pub fn path(&self) -> &str {
		match self {
			Mismatch::Shape { path, .. }
			| Mismatch::AttributeCount { path, .. }
			| Mismatch::MissingValue { path }
			| Mismatch::Value { path, .. } => path,
		}
	}
}

/// Outcome of a comparison: `Ok(())` when equal, otherwise the first mismatch.
pub type ComparisonOutcome = Result<(), Mismatch>;
