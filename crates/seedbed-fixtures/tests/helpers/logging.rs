//! Test logging initialization.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs a test-writer tracing subscriber once per process.
pub fn init_test_logging() {
	INIT.call_once(|| {
		let _ = tracing_subscriber::fmt()
			.with_test_writer()
			.with_max_level(tracing::Level::DEBUG)
			.try_init();
	});
}
