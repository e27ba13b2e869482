//! # towerapp
//!
//! Core of the `tw` platform client: resolving the references users type into platform
//! identifiers, and rendering what the platform returns. The binary is a thin client of
//! this library.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (tw crate)                                             │
//! │  - Parses arguments, loads config, prints, sets exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API (api.rs)                                               │
//! │  - Parses references with environment defaults              │
//! │  - Dispatches to commands                                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (commands/*.rs)                                   │
//! │  - Resolve references, call the platform, build responses   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Platform (platform/)                                       │
//! │  - PlatformApi trait                                        │
//! │  - HttpPlatform (production), InMemoryPlatform (testing)    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Responses ([`responses`]) are plain serializable structs. [`render::render`] turns
//! one into a table, JSON or YAML string; only the CLI decides where that string goes.
//!
//! ## Module Overview
//!
//! - [`api`]: facade, `TowerApp<P>`
//! - [`commands`]: one module per resource group
//! - [`reference`] / [`resolve`]: parsing and resolving `-w`/`-o`/name arguments
//! - [`pagination`]: `--page`/`--offset`/`--max` arithmetic and footers
//! - [`labels`]: label set diffing with per-change failure reporting
//! - [`metrics`]: value formatters for run metrics
//! - [`render`]: output formats, table renderer, styles
//! - [`config`]: endpoint, token and reference defaults
//! - [`platform`]: platform access
//! - [`model`]: platform data types
//! - [`error`]: `TowerError`

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod labels;
pub mod metrics;
pub mod model;
pub mod pagination;
pub mod platform;
pub mod reference;
pub mod render;
pub mod resolve;
pub mod responses;
