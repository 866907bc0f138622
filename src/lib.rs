//! Floyd's triangle with a pluggable increment
//!
//! The printer either advances its counter itself or calls an `increment`
//! function supplied by the host. The host-supplied path comes in two forms:
//! - Any [`Increment`] handed straight to a [`TrianglePrinter`]
//! - A JIT-compiled native routine that imports `env.increment` from a
//!   [`HostEnv`] ([`backend::JitRuntime`])

pub mod backend;
pub mod host;
pub mod runtime;
pub mod triangle;

pub use host::{HostEnv, HostFunction, LinkError};
pub use triangle::{DEFAULT_ROWS, Increment, Local, TrianglePrinter, number_count, render};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber used by the binaries.
///
/// Verbosity comes from `RUST_LOG` and defaults to `warn`. Stdout is left
/// untouched so the triangle output stays exact.
pub fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
