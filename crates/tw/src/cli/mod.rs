//! # CLI
//!
//! The only place that knows about the terminal: argument parsing, logging setup,
//! color detection, printing. Commands follow a `<resource> <verb>` shape
//! (`tw compute-envs list`, `tw pipelines labels`).
//!
//! ## Module Structure
//!
//! - `setup`: clap definitions
//! - `commands`: context setup and dispatch to [`towerapp::api::TowerApp`]

mod commands;
pub mod setup;

pub use commands::run;
