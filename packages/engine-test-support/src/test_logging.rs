//! Tracing setup shared by every test binary.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static GUARD: OnceCell<()> = OnceCell::new();

/// Install the test subscriber. Safe to call from any number of
/// `#[ctor]` hooks and test bodies; only the first call does work.
///
/// Verbosity comes from `TEST_LOG` when set, falling back to
/// `RUST_LOG`, and defaults to `warn` so passing runs stay quiet.
pub fn init() {
    GUARD.get_or_init(|| {
        let filter = ["TEST_LOG", "RUST_LOG"]
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .map(EnvFilter::new)
            .unwrap_or_else(|| EnvFilter::new("warn"));

        // Test writer so output is captured per-test; no timestamps so
        // failures diff cleanly between runs.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init();
    });
}
