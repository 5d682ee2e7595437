//! Transaction handles threaded through one batch mutation.
//!
//! A [`Transaction`] is bookkeeping, not an ACID guarantee. The base
//! lifecycle hooks leave it untouched; adapters with real session semantics
//! record whatever they need in [`Transaction::bookkeeping`].

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Kind of batch mutation a transaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
	/// `add`
	Insert,
	/// `upsert`
	Upsert,
	/// `remove`
	Delete,
}

impl TransactionKind {
	/// Returns the lowercase name of the kind.
	pub fn as_str(&self) -> &'static str {
		match self {
			TransactionKind::Insert => "insert",
			TransactionKind::Upsert => "upsert",
			TransactionKind::Delete => "delete",
		}
	}
}

impl fmt::Display for TransactionKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Opaque handle created by `start_transaction` and closed by exactly one of
/// `end_transaction` or `failed_transaction`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
	id: Uuid,
	kind: TransactionKind,
	collection: String,
	started_at: DateTime<Utc>,
	/// Adapter-specific state. Empty for the base lifecycle.
	pub bookkeeping: serde_json::Map<String, serde_json::Value>,
}

impl Transaction {
	/// Creates a transaction with empty bookkeeping.
	pub fn new(kind: TransactionKind, collection: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			kind,
			collection: collection.into(),
			started_at: Utc::now(),
			bookkeeping: serde_json::Map::new(),
		}
	}

	/// Unique identifier, useful for correlating log lines.
	pub fn id(&self) -> Uuid {
		self.id
	}

	/// The mutation kind.
	pub fn kind(&self) -> TransactionKind {
		self.kind
	}

	/// Collection the batch targets.
	pub fn collection(&self) -> &str {
		&self.collection
	}

	/// When the transaction was started.
	pub fn started_at(&self) -> DateTime<Utc> {
		self.started_at
	}
}
