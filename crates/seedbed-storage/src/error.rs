//! Error types for storage adapters.

use thiserror::Error;

use seedbed_core::CoreError;

use crate::transaction::Transaction;

/// Errors raised by adapters, their transaction hooks and document stores.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Starting, ending or failing a transaction went wrong.
	#[error("Transaction error: {0}")]
	Transaction(String),

	/// The storage engine rejected a write or lookup.
	#[error("Database error: {0}")]
	Database(String),

	/// A record with the same identifier already exists.
	#[error("Duplicate key: {collection}/{id}")]
	DuplicateKey {
		/// Collection the insert targeted.
		collection: String,
		/// The conflicting identifier.
		id: String,
	},

	/// A record could not be written in its current shape.
	#[error("Invalid record: {0}")]
	InvalidRecord(String),

	/// Record model error.
	#[error(transparent)]
	Core(#[from] CoreError),

	/// The operation failed and closing its transaction failed as well.
	///
	/// `operation` is the original error, `transaction` the error raised by
	/// the fail hook.
	#[error("{operation} (failing the transaction also failed: {transaction})")]
	TransactionFailed {
		/// The error that aborted the operation.
		operation: Box<StorageError>,
		/// The error raised while recording the failure.
		transaction: Box<StorageError>,
	},
}

impl StorageError {
	/// Returns the errors in the order they were raised.
	///
	/// A double failure yields two entries; every other error yields itself.
	pub fn errors(&self) -> Vec<&StorageError> {
		match self {
			StorageError::TransactionFailed {
				operation,
				transaction,
			} => vec![operation.as_ref(), transaction.as_ref()],
			other => vec![other],
		}
	}
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of one `add`/`upsert`/`remove` batch.
///
/// Carries the transaction as it stood when the batch gave up, or `None`
/// when the transaction could not be started.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct CrudError {
	/// What went wrong.
	#[source]
	pub error: StorageError,

	/// The transaction, if one was started.
	pub transaction: Option<Transaction>,
}

impl CrudError {
	/// Creates a batch failure.
	pub fn new(error: StorageError, transaction: Option<Transaction>) -> Self {
		Self { error, transaction }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_double_failure_keeps_order() {
		let error = StorageError::TransactionFailed {
			operation: Box::new(StorageError::Database("write rejected".to_string())),
			transaction: Box::new(StorageError::Transaction("abort failed".to_string())),
		};

		let errors = error.errors();
		assert_eq!(errors.len(), 2);
		assert!(matches!(errors[0], StorageError::Database(_)));
		assert!(matches!(errors[1], StorageError::Transaction(_)));
		assert_eq!(
			error.to_string(),
			"Database error: write rejected (failing the transaction also failed: Transaction error: abort failed)"
		);
	}

	#[rstest]
	fn test_single_error_list() {
		let error = StorageError::Database("boom".to_string());
		assert_eq!(error.errors().len(), 1);
	}

	#[rstest]
	fn test_duplicate_key_message() {
		let error = StorageError::DuplicateKey {
			collection: "User".to_string(),
			id: "u0".to_string(),
		};
		assert_eq!(error.to_string(), "Duplicate key: User/u0");
	}
}
