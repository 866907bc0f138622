//! Runtime stubs callable from native-compiled code
//!
//! These extern "C" functions are the interface between the JIT-compiled
//! triangle routine and the Rust side. The calling convention is:
//! - Integers are passed and returned as i64
//! - The output sink travels as an opaque pointer argument
//! - Every stub returns a status: 0 while the sink is healthy, 1 after it failed
//!
//! Stubs never panic; an I/O failure is parked in the sink and reported by
//! the caller once the native routine has returned.

use std::io::{self, Write};

/// Status returned by the output stubs.
pub const STATUS_OK: i64 = 0;
pub const STATUS_FAILED: i64 = 1;

/// Output target handed to native code.
///
/// Holds the first write error; once set, later writes are skipped.
pub struct OutputSink<'a> {
    out: &'a mut dyn Write,
    error: Option<io::Error>,
}

impl<'a> OutputSink<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out, error: None }
    }

    fn write_with(&mut self, f: impl FnOnce(&mut dyn Write) -> io::Result<()>) -> i64 {
        if self.error.is_some() {
            return STATUS_FAILED;
        }
        match f(&mut *self.out) {
            Ok(()) => STATUS_OK,
            Err(e) => {
                self.error = Some(e);
                STATUS_FAILED
            }
        }
    }

    /// Consume the sink, returning the parked error if any write failed.
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// =========================================================================
// Output Stubs
// =========================================================================

/// Write one number followed by a space.
///
/// # Parameters
/// - `sink`: pointer to a live `OutputSink`, or null
/// - `number`: the value to print
pub extern "C" fn floyd_emit_number(sink: *mut OutputSink<'_>, number: i64) -> i64 {
    // Safety: the JIT routine only forwards the pointer its caller passed in,
    // which points at an OutputSink that outlives the call.
    let Some(sink) = (unsafe { sink.as_mut() }) else {
        return STATUS_FAILED;
    };
    sink.write_with(|out| write!(out, "{} ", number))
}

/// Terminate the current row with `.` and a newline.
pub extern "C" fn floyd_end_row(sink: *mut OutputSink<'_>) -> i64 {
    let Some(sink) = (unsafe { sink.as_mut() }) else {
        return STATUS_FAILED;
    };
    sink.write_with(|out| out.write_all(b".\n"))
}

// =========================================================================
// Host Functions
// =========================================================================

/// Successor function the default host environment exports as `env.increment`.
pub extern "C" fn floyd_host_increment(number: i64) -> i64 {
    number.wrapping_add(1)
}
