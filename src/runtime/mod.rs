//! Runtime kernel for native code execution
//!
//! The JIT-compiled triangle routine owns its loop and counter but calls back
//! into Rust for everything else:
//! - Output (stubs.rs), through an `OutputSink` passed in as a pointer
//! - The default host increment exported as `env.increment` (stubs.rs)

pub mod stubs;

pub use stubs::{OutputSink, floyd_emit_number, floyd_end_row, floyd_host_increment};
