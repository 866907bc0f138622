//! Delegated variant: the triangle is printed by JIT-compiled native code
//! that imports `env.increment` from this host.

use std::io::{self, Write};

use anyhow::{Context, Result};
use floyd::backend::{BackendConfig, JitRuntime};
use floyd::{DEFAULT_ROWS, HostEnv};

fn main() -> Result<()> {
    floyd::install_tracing();

    let env = HostEnv::default();
    let runtime = JitRuntime::instantiate(&env, &BackendConfig::default())
        .context("failed to instantiate the native triangle routine")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    runtime.floyd(DEFAULT_ROWS, &mut out)?;
    out.flush()?;

    Ok(())
}
