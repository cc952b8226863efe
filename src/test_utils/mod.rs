//! Test utilities for jsdoc2md
//!
//! - [`TestEnvironment`]: a temporary project with private caches and a
//!   facade wired to them
//! - [`SourceFixture`]: sample JavaScript inputs
//! - [`init_test_logging`]: one-time tracing setup for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use jsdoc2md::Jsdoc2MdOptions;
//! use jsdoc2md::test_utils::{SourceFixture, TestEnvironment};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let env = TestEnvironment::with_sources(&[SourceFixture::math()])?;
//! let markdown = env.facade().render(&Jsdoc2MdOptions::with_files(["*.js"])).await?;
//! assert!(markdown.contains("add(a, b)"));
//! # Ok(())
//! # }
//! ```

pub mod environment;
pub mod fixtures;

pub use environment::TestEnvironment;
pub use fixtures::SourceFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `None`, logging is enabled only
/// when `RUST_LOG` is set:
///
/// ```bash
/// RUST_LOG=jsdoc2md=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
