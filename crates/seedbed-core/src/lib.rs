//! Record model, settings and core errors shared by the seedbed crates.
//!
//! - [`Value`] / [`FieldKind`] - field values and their verification kinds
//! - [`Record`] / [`RecordId`] - insertion-ordered records and their identifiers
//! - [`Settings`] - database and fixture configuration loaded from TOML

#![warn(missing_docs)]

pub mod error;
pub mod record;
pub mod settings;
pub mod value;

pub use error::{CoreError, CoreResult};
pub use record::{DEFAULT_ID_FIELD, Record};
pub use settings::{AdapterKind, DatabaseSettings, FixtureSettings, Settings};
pub use value::{FieldKind, RecordId, Value};
