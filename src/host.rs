//! Host environment for native code imports
//!
//! A host exposes functions to embedded native code under a two-level name,
//! `module.name`, the way a WebAssembly host fills a guest's import section.
//! The triangle routine imports exactly one of them: `env.increment`.
//!
//! Imports are resolved once, when a routine is instantiated. A name the
//! host never defined is a link failure at that point; nothing is looked up
//! while the routine runs.

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::runtime::stubs::floyd_host_increment;
use crate::triangle::Increment;

/// Module the triangle routine imports from.
pub const IMPORT_MODULE: &str = "env";

/// Name of the increment import inside [`IMPORT_MODULE`].
pub const IMPORT_NAME: &str = "increment";

/// Calling convention for host functions: one integer in, one integer out.
pub type HostFn = extern "C" fn(i64) -> i64;

/// A resolved host function.
#[derive(Debug, Clone, Copy)]
pub struct HostFunction {
    func: HostFn,
}

impl HostFunction {
    pub fn new(func: HostFn) -> Self {
        Self { func }
    }

    #[inline]
    pub fn call(self, arg: i64) -> i64 {
        (self.func)(arg)
    }

    /// Raw entry address, for registering with the JIT linker.
    pub fn as_ptr(self) -> *const u8 {
        self.func as *const u8
    }
}

impl Increment for HostFunction {
    #[inline]
    fn increment(&mut self, current: i64) -> i64 {
        self.call(current)
    }
}

/// Resolution failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LinkError {
    #[error("unknown import module '{module}'")]
    UnknownModule { module: String },
    #[error("module '{module}' has no export named '{name}'")]
    UnknownImport { module: String, name: String },
}

/// Named collection of host functions, grouped by module.
#[derive(Debug, Clone)]
pub struct HostEnv {
    modules: HashMap<String, HashMap<String, HostFunction>>,
}

impl HostEnv {
    /// An environment with no modules at all.
    pub fn new() -> Self {
        Self {
            modules: HashMap::new(),
        }
    }

    /// Define `module.name`, replacing any earlier definition.
    pub fn define(&mut self, module: &str, name: &str, func: HostFn) -> &mut Self {
        debug!(module, name, "defining host function");
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(name.to_string(), HostFunction::new(func));
        self
    }

    pub fn resolve(&self, module: &str, name: &str) -> Result<HostFunction, LinkError> {
        let exports = self
            .modules
            .get(module)
            .ok_or_else(|| LinkError::UnknownModule {
                module: module.to_string(),
            })?;

        exports
            .get(name)
            .copied()
            .ok_or_else(|| LinkError::UnknownImport {
                module: module.to_string(),
                name: name.to_string(),
            })
    }

    /// Resolve the triangle routine's `env.increment` import.
    pub fn resolve_increment(&self) -> Result<HostFunction, LinkError> {
        self.resolve(IMPORT_MODULE, IMPORT_NAME)
    }
}

impl Default for HostEnv {
    /// `env.increment` bound to the successor function.
    fn default() -> Self {
        let mut env = Self::new();
        env.define(IMPORT_MODULE, IMPORT_NAME, floyd_host_increment);
        env
    }
}
