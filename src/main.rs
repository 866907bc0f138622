use std::io::{self, Write};

use anyhow::Result;
use floyd::{DEFAULT_ROWS, Local, TrianglePrinter};
use tracing::debug;

fn main() -> Result<()> {
    floyd::install_tracing();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    debug!(rows = DEFAULT_ROWS, "printing with local increment");
    TrianglePrinter::new(Local).print(DEFAULT_ROWS, &mut out)?;
    out.flush()?;

    Ok(())
}
