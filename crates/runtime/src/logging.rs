//! Tracing subscriber setup for binaries embedding the runtime.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Installs a global subscriber writing to stderr.
///
/// `RUST_LOG` directives are honoured; anything it leaves unset logs at
/// `default_level`. Fails if a global subscriber is already installed.
pub fn setup_logging(default_level: tracing::Level) -> Result<(), TryInitError> {
    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
}
