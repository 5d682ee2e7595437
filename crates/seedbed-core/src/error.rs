//! Error types for the core record model and settings.

use thiserror::Error;

/// Errors raised while building records or loading settings.
#[derive(Debug, Error)]
pub enum CoreError {
	/// A value could not be interpreted as a record.
	#[error("Invalid record: {0}")]
	InvalidRecord(String),

	/// Settings were structurally valid but semantically wrong.
	#[error("Settings error: {0}")]
	Settings(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// TOML deserialization error.
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
