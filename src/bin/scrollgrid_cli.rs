//! CLI tool for scrollgrid - computes synchronized layout reports
//!
//! Usage:
//!   scrollgrid_cli <input.json>              # Output JSON to stdout
//!   scrollgrid_cli <input.json> -o out.json  # Output JSON to file
//!
//! The input carries a grid config plus measured natural row heights;
//! the output is the synchronized layout (see `scrollgrid::layout_report`).

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use scrollgrid::layout_report;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: scrollgrid_cli <input.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read input file
    let input = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Compute the synchronized layout
    let report = match layout_report(&input) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error computing layout: {}", e);
            std::process::exit(1);
        }
    };

    // Emit
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, report) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if writeln!(handle, "{}", report).is_err() {
                std::process::exit(1);
            }
        }
    }
}
