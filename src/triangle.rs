//! Floyd's triangle printer
//!
//! Row `i` holds `i` consecutive integers. The counter starts at 1 and runs
//! across the whole triangle; it is never reset between rows. Each number is
//! written followed by a single space, and every row ends with `.` and a
//! newline:
//!
//! ```text
//! 1 .
//! 2 3 .
//! 4 5 6 .
//! ```
//!
//! How the counter advances is pluggable through [`Increment`]: the printer
//! either adds one itself ([`Local`]) or hands the current value to a
//! collaborator and trusts whatever comes back.

use std::io::{self, Write};

/// Number of rows the binaries print.
pub const DEFAULT_ROWS: i64 = 10;

/// Value the counter holds before the first number is printed.
pub const FIRST_NUMBER: i64 = 1;

/// The step that turns the current counter into the next one.
pub trait Increment {
    fn increment(&mut self, current: i64) -> i64;
}

/// Plain successor, computed in place.
///
/// Overflow wraps; it is not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Local;

impl Increment for Local {
    #[inline]
    fn increment(&mut self, current: i64) -> i64 {
        current.wrapping_add(1)
    }
}

impl<F> Increment for F
where
    F: FnMut(i64) -> i64,
{
    #[inline]
    fn increment(&mut self, current: i64) -> i64 {
        self(current)
    }
}

/// Prints Floyd's triangle, delegating each counter step to `I`.
pub struct TrianglePrinter<I> {
    increment: I,
}

impl<I: Increment> TrianglePrinter<I> {
    pub fn new(increment: I) -> Self {
        Self { increment }
    }

    /// Write `rows` lines to `out`.
    ///
    /// `rows <= 0` writes nothing. The counter starts over at
    /// [`FIRST_NUMBER`] on every call.
    pub fn print<W: Write + ?Sized>(&mut self, rows: i64, out: &mut W) -> io::Result<()> {
        let mut number = FIRST_NUMBER;
        for row in 1..=rows {
            for _ in 0..row {
                write!(out, "{} ", number)?;
                number = self.increment.increment(number);
            }
            out.write_all(b".\n")?;
        }
        Ok(())
    }
}

/// Render the triangle into a `String`.
pub fn render<I: Increment>(rows: i64, increment: I) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    TrianglePrinter::new(increment).print(rows, &mut buf)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// How many numbers a triangle of `rows` rows contains.
///
/// Exact for every `i64`: the largest count, at `i64::MAX` rows, is below 2^125.
pub fn number_count(rows: i64) -> u128 {
    if rows <= 0 {
        return 0;
    }
    let rows = rows as u128;
    rows * (rows + 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_row() {
        assert_eq!(render(1, Local).unwrap(), "1 .\n");
    }

    #[test]
    fn test_three_rows() {
        assert_eq!(render(3, Local).unwrap(), "1 .\n2 3 .\n4 5 6 .\n");
    }

    #[test]
    fn test_non_positive_rows_print_nothing() {
        assert_eq!(render(0, Local).unwrap(), "");
        assert_eq!(render(-4, Local).unwrap(), "");
    }

    #[test]
    fn test_counter_does_not_reset_between_rows() {
        let text = render(4, Local).unwrap();
        let last = text.lines().last().unwrap();
        assert_eq!(last, "7 8 9 10 .");
    }

    #[test]
    fn test_counter_restarts_per_print() {
        let mut printer = TrianglePrinter::new(Local);
        let mut first: Vec<u8> = Vec::new();
        let mut second: Vec<u8> = Vec::new();
        printer.print(2, &mut first).unwrap();
        printer.print(2, &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_closure_increment_is_trusted() {
        // A collaborator that doubles instead of adding one
        assert_eq!(render(2, |n: i64| n * 2).unwrap(), "1 .\n2 4 .\n");
    }

    #[test]
    fn test_increment_called_once_per_number() {
        let mut calls = 0u128;
        let mut printer = TrianglePrinter::new(|n: i64| {
            calls += 1;
            n + 1
        });
        printer.print(10, &mut io::sink()).unwrap();
        drop(printer);
        assert_eq!(calls, number_count(10));
    }

    #[test]
    fn test_local_wraps_on_overflow() {
        assert_eq!(Local.increment(i64::MAX), i64::MIN);
    }

    #[test]
    fn test_number_count() {
        assert_eq!(number_count(0), 0);
        assert_eq!(number_count(-1), 0);
        assert_eq!(number_count(1), 1);
        assert_eq!(number_count(10), 55);
    }

    #[test]
    fn test_number_count_does_not_overflow() {
        assert_eq!(number_count(5_000_000_000), 12_500_000_002_500_000_000);
        let max = i64::MAX as u128;
        assert_eq!(number_count(i64::MAX), max * (max + 1) / 2);
        assert!(number_count(i64::MAX) > u64::MAX as u128);
    }

    #[test]
    fn test_write_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = TrianglePrinter::new(Local).print(3, &mut Broken).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
