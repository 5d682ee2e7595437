//! Storage adapters for seedbed.
//!
//! - [`StorageAdapter`] - the adapter contract and its transaction template
//! - [`BaseAdapter`] - no-op fallback adapter
//! - [`DocumentAdapter`] - adapter over a [`DocumentStore`] driver handle
//! - [`MemoryStore`] - in-process document store
//! - `MongoStore` - MongoDB document store (feature `mongodb`)
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use seedbed_core::Record;
//! use seedbed_storage::{CrudOptions, DocumentAdapter, Items, MemoryStore, StorageAdapter};
//!
//! # tokio_test::block_on(async {
//! let store = Arc::new(MemoryStore::new());
//! let adapter = DocumentAdapter::new(store.clone());
//!
//! let outcome = adapter
//! 	.add(Items::from(Record::new().with("_id", "u0")), &CrudOptions::new("User"))
//! 	.await
//! 	.unwrap();
//! assert_eq!(outcome.results.len(), 1);
//! assert_eq!(store.count("User"), 1);
//! # });
//! ```

#![warn(missing_docs)]

pub mod adapter;
pub mod base;
pub mod document_adapter;
pub mod error;
pub mod memory;
#[cfg(feature = "mongodb")]
pub mod mongo;
pub mod select;
pub mod store;
pub mod transaction;

pub use adapter::{CrudOptions, CrudOutcome, Items, StorageAdapter};
pub use base::BaseAdapter;
pub use document_adapter::DocumentAdapter;
pub use error::{CrudError, StorageError, StorageResult};
pub use memory::MemoryStore;
#[cfg(feature = "mongodb")]
pub use mongo::MongoStore;
pub use select::adapter_for;
pub use store::DocumentStore;
pub use transaction::{Transaction, TransactionKind};
