//! kbagent CLI entry point
//!
//! Parsing, configuration and dispatch all live in the CLI module. This
//! only prints the error and exits non-zero on failure.

use kbagent::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
