//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`config`] - Configuration management (path, show, init)
//! - [`distance`] - One-shot distance, bearing and ETA calculator
//! - [`simulate`] - Demo run of a simulated vehicle through a live session

pub mod config;
pub mod distance;
pub mod simulate;
