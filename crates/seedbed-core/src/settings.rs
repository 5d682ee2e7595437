//! Settings consumed by the storage and fixture layers.
//!
//! Settings are loaded from TOML:
//!
//! ```toml
//! [database]
//! type = "memory"
//!
//! [fixture]
//! strict = true
//! allow_empty = ["deactivatedMessage"]
//! ```
//!
//! The live driver handle is not part of the settings file; it is supplied
//! next to the settings when the orchestrator is built.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Adapter family selected by `database.type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
	/// The document-store adapter.
	Document,
	/// The no-op base adapter.
	Base,
}

/// Database section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
	/// Adapter name, matched case-insensitively.
	#[serde(rename = "type")]
	pub engine: Option<String>,

	/// Connection URL for drivers that open their own connection.
	pub url: Option<String>,

	/// Database name.
	pub name: Option<String>,
}

impl DatabaseSettings {
	/// Database names that select the document adapter.
	pub const DOCUMENT_ENGINES: [&'static str; 4] = ["document", "memory", "mongodb", "mongoose"];

	/// Creates a database section for the given adapter name.
	pub fn with_type(engine: impl Into<String>) -> Self {
		Self {
			engine: Some(engine.into()),
			..Self::default()
		}
	}

	/// Maps `type` onto an adapter family.
	///
	/// Unrecognized or missing values select [`AdapterKind::Base`].
	///
	/// # Examples
	///
	/// ```
	/// use seedbed_core::settings::{AdapterKind, DatabaseSettings};
	///
	/// assert_eq!(DatabaseSettings::with_type("MongoDB").adapter_kind(), AdapterKind::Document);
	/// assert_eq!(DatabaseSettings::with_type("mongoose").adapter_kind(), AdapterKind::Document);
	/// assert_eq!(DatabaseSettings::with_type("couch").adapter_kind(), AdapterKind::Base);
	/// assert_eq!(DatabaseSettings::default().adapter_kind(), AdapterKind::Base);
	/// ```
	pub fn adapter_kind(&self) -> AdapterKind {
		match self.engine.as_deref().map(str::to_ascii_lowercase) {
			Some(engine) if Self::DOCUMENT_ENGINES.contains(&engine.as_str()) => AdapterKind::Document,
			_ => AdapterKind::Base,
		}
	}
}

/// Fixture section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
	/// Default strictness used by `Fixture::compare`.
	pub strict: bool,

	/// Fields whose expected value may be empty in strict mode.
	pub allow_empty: Vec<String>,
}

/// Top-level settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Database section.
	pub database: DatabaseSettings,

	/// Fixture section.
	pub fixture: FixtureSettings,
}

impl Settings {
	/// Creates default settings.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses settings from TOML text.
	///
	/// # Errors
	///
	/// Returns [`CoreError::Toml`] on malformed input and
	/// [`CoreError::Settings`] when a value is present but unusable.
	pub fn from_toml_str(content: &str) -> CoreResult<Self> {
		let settings: Settings = toml::from_str(content)?;
		settings.validate()?;
		Ok(settings)
	}

	/// Reads and parses a TOML settings file.
	pub fn from_path(path: &Path) -> CoreResult<Self> {
		let content = std::fs::read_to_string(path)?;
		Self::from_toml_str(&content)
	}

	/// Sets the database section.
	pub fn with_database(mut self, database: DatabaseSettings) -> Self {
		self.database = database;
		self
	}

	/// Sets the fixture section.
	pub fn with_fixture(mut self, fixture: FixtureSettings) -> Self {
		self.fixture = fixture;
		self
	}

	fn validate(&self) -> CoreResult<()> {
		if self
			.database
			.engine
			.as_deref()
			.is_some_and(|engine| engine.trim().is_empty())
		{
			return Err(CoreError::Settings(
				"database.type must not be blank".to_string(),
			));
		}
		if self.fixture.allow_empty.iter().any(|f| f.is_empty()) {
			return Err(CoreError::Settings(
				"fixture.allow_empty must not contain empty field names".to_string(),
			));
		}
		Ok(())
	}
}
