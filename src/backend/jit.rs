//! JIT runtime for the triangle routine
//!
//! Instantiation mirrors loading a guest module into a host: imports are
//! resolved against a [`HostEnv`], the routine is compiled with the resolved
//! function linked in, and the result can then be called any number of times.

use std::io::Write;

use tracing::{debug, info};

use super::cranelift::{ENTRY_NAME, FloydCodegen};
use super::{BackendConfig, BackendError};
use crate::host::HostEnv;
use crate::runtime::OutputSink;

/// Native signature of the compiled `floyd` routine.
type FloydFn = for<'a> extern "C" fn(i64, *mut OutputSink<'a>) -> i64;

/// A compiled, linked triangle routine ready to run
pub struct JitRuntime {
    /// Owns the executable memory `entry` points into
    _codegen: FloydCodegen,
    entry: FloydFn,
}

impl JitRuntime {
    /// Resolve `env.increment` from `env` and compile the routine against it.
    ///
    /// Fails with [`BackendError::Link`] before any code is generated when
    /// the import is missing.
    pub fn instantiate(env: &HostEnv, config: &BackendConfig) -> Result<Self, BackendError> {
        let increment = env.resolve_increment()?;
        debug!(opt_level = ?config.opt_level, verify = config.verify, "instantiating");

        let mut codegen = FloydCodegen::new(config, increment)?;
        codegen.compile()?;

        let ptr = codegen
            .get_func(ENTRY_NAME)
            .ok_or_else(|| BackendError::MissingFunction(ENTRY_NAME.into()))?;

        // Safety: `ptr` was compiled from the signature `FloydFn` describes
        // and stays valid while `codegen` is alive.
        let entry = unsafe { std::mem::transmute::<*const u8, FloydFn>(ptr) };
        info!("native triangle routine ready");

        Ok(Self {
            _codegen: codegen,
            entry,
        })
    }

    /// Print `rows` rows of the triangle to `out` using native code.
    pub fn floyd(&self, rows: i64, out: &mut dyn Write) -> Result<(), BackendError> {
        let mut sink = OutputSink::new(out);
        let next = (self.entry)(rows, &mut sink);
        debug!(rows, next, "native routine returned");

        sink.finish()?;
        Ok(())
    }

    /// Run the routine and collect its output as a `String`.
    pub fn render(&self, rows: i64) -> Result<String, BackendError> {
        let mut buf: Vec<u8> = Vec::new();
        self.floyd(rows, &mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| BackendError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}
