//! Fixture datasets, record comparison and batch orchestration.
//!
//! - [`DatasetSource`] / [`JsonDataset`] - where fixture records come from
//! - [`Fixture`] - a dataset bound to a storage adapter
//! - [`Comparator`] - structural comparison of stored and expected records
//! - [`Seedbed`] / [`FixtureSet`] - concurrent runs across many fixtures

#![warn(missing_docs)]

pub mod compare;
pub mod error;
pub mod fixture;
pub mod orchestrator;
pub mod prelude;
pub mod source;

pub use compare::{Comparator, DatePrecision, date_difference};
pub use error::{ComparisonOutcome, FixtureError, FixtureResult, Mismatch};
pub use fixture::{Fixture, FixtureReport};
pub use orchestrator::{FixtureSet, Seedbed, SeedbedBuilder};
pub use source::{DatasetSource, JsonDataset};
