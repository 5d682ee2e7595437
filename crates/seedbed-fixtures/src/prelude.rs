//! Common imports for fixture definitions and tests.

pub use crate::compare::{Comparator, DatePrecision, date_difference};
pub use crate::error::{ComparisonOutcome, FixtureError, FixtureResult, Mismatch};
pub use crate::fixture::{Fixture, FixtureReport};
pub use crate::orchestrator::{FixtureSet, Seedbed};
pub use crate::source::{DatasetSource, JsonDataset};

pub use seedbed_core::{Record, RecordId, Settings, Value};
pub use seedbed_storage::{DocumentStore, MemoryStore, StorageAdapter};
