//! Adapter selection from database settings.

use std::sync::Arc;

use seedbed_core::{AdapterKind, DatabaseSettings};

use crate::adapter::StorageAdapter;
use crate::base::BaseAdapter;
use crate::document_adapter::DocumentAdapter;
use crate::store::DocumentStore;

/// Picks the adapter for `settings`.
///
/// A document database type together with a driver handle yields a
/// [`DocumentAdapter`]. Everything else falls back to [`BaseAdapter`], with a
/// warning unless no database type was configured at all.
pub fn adapter_for(
	settings: &DatabaseSettings,
	store: Option<Arc<dyn DocumentStore>>,
) -> Arc<dyn StorageAdapter> {
	match (settings.adapter_kind(), store) {
		(AdapterKind::Document, Some(store)) => Arc::new(DocumentAdapter::new(store)),
		(AdapterKind::Document, None) => {
			tracing::warn!(
				database = settings.engine.as_deref().unwrap_or_default(),
				"no driver handle supplied, falling back to the base adapter"
			);
			Arc::new(BaseAdapter::new())
		}
		(AdapterKind::Base, _) => {
			if let Some(engine) = settings.engine.as_deref() {
				tracing::warn!(
					database = engine,
					known = ?DatabaseSettings::DOCUMENT_ENGINES,
					"unrecognized database type, using the base adapter"
				);
			}
			Arc::new(BaseAdapter::new())
		}
	}
}
