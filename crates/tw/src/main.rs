//! # tw
//!
//! Command-line client for the workflow platform. The binary is thin: `cli::run()`
//! does the work and this file only turns an error into `Error: ...` on stderr and
//! exit status 1.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (src/cli/)                                             │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - logging, config, dispatch, printing (commands.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  towerapp::api::TowerApp                                    │
//! │  - references, commands, responses                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so stdout stays parseable with `--output json|yaml`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
