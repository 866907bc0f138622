//! Native code backend for the triangle routine
//!
//! The printer loop is emitted as Cranelift IR and JIT-compiled to machine
//! code. The compiled routine imports `env.increment` from the host and
//! calls back into runtime stubs for output.
//!
//! Architecture:
//! - `cranelift.rs` - builds and compiles the `floyd` function
//! - `jit.rs` - links host imports and runs the compiled routine

pub mod cranelift;
pub mod jit;

use thiserror::Error;

use crate::host::LinkError;

pub use jit::JitRuntime;

/// Optimization level for native compilation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptLevel {
    /// No optimization (fastest compile)
    None,
    /// Basic optimizations (default for JIT)
    Speed,
    /// Aggressive optimizations
    SpeedAndSize,
}

impl OptLevel {
    /// Value of Cranelift's `opt_level` setting.
    pub fn as_setting(self) -> &'static str {
        match self {
            OptLevel::None => "none",
            OptLevel::Speed => "speed",
            OptLevel::SpeedAndSize => "speed_and_size",
        }
    }
}

impl Default for OptLevel {
    fn default() -> Self {
        OptLevel::Speed
    }
}

/// Configuration for the native backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Optimization level
    pub opt_level: OptLevel,
    /// Run the Cranelift IR verifier before code generation
    pub verify: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            opt_level: OptLevel::Speed,
            verify: true,
        }
    }
}

/// Errors that can occur while building or running native code
#[derive(Debug, Error)]
pub enum BackendError {
    /// Cranelift compilation error
    #[error("Cranelift error: {0}")]
    Cranelift(String),
    /// Host import could not be resolved
    #[error("link error: {0}")]
    Link(#[from] LinkError),
    /// Output failed while the routine was running
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
    /// Compiled module has no such function
    #[error("function '{0}' not found")]
    MissingFunction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_config_default() {
        let config = BackendConfig::default();
        assert_eq!(config.opt_level, OptLevel::Speed);
        assert!(config.verify);
    }

    #[test]
    fn test_opt_level_settings() {
        assert_eq!(OptLevel::None.as_setting(), "none");
        assert_eq!(OptLevel::Speed.as_setting(), "speed");
        assert_eq!(OptLevel::SpeedAndSize.as_setting(), "speed_and_size");
    }

    #[test]
    fn test_link_error_converts() {
        let err: BackendError = LinkError::UnknownModule {
            module: "env".into(),
        }
        .into();
        assert_eq!(err.to_string(), "link error: unknown import module 'env'");
    }
}
