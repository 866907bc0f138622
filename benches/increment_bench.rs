//! Increment strategy benchmarks
//!
//! Compares printing the triangle with the counter advanced locally, through
//! a host function pointer, and from JIT-compiled native code.
//!
//! Run with: cargo bench

use std::hint::black_box;
use std::io;
use std::time::Instant;

use floyd::backend::{BackendConfig, JitRuntime};
use floyd::{HostEnv, Local, TrianglePrinter};

// Simple timing macro for benchmarks
macro_rules! bench {
    ($name:expr, $iterations:expr, $code:block) => {{
        let start = Instant::now();
        for _ in 0..$iterations {
            let result = black_box($code);
            assert!(result.is_ok(), "{} failed: {:?}", $name, result.err());
        }
        let elapsed = start.elapsed();
        let per_iter = elapsed / $iterations;
        println!(
            "{}: {} iterations in {:?} ({:?}/iter, {:.0} ops/sec)",
            $name,
            $iterations,
            elapsed,
            per_iter,
            $iterations as f64 / elapsed.as_secs_f64()
        );
        elapsed
    }};
}

const ROWS: i64 = 200;

fn main() {
    println!("==============================================");
    println!("  Floyd's triangle: {} rows", ROWS);
    println!("==============================================\n");

    let iterations = 200;

    bench!("local increment", iterations, {
        TrianglePrinter::new(Local).print(ROWS, &mut io::sink())
    });

    let host = match HostEnv::default().resolve_increment() {
        Ok(host) => host,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    bench!("host function", iterations, {
        TrianglePrinter::new(host).print(ROWS, &mut io::sink())
    });

    let start = Instant::now();
    let runtime = match JitRuntime::instantiate(&HostEnv::default(), &BackendConfig::default()) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("JIT instantiate: {:?}", start.elapsed());

    bench!("native routine", iterations, {
        runtime.floyd(ROWS, &mut io::sink())
    });
}
