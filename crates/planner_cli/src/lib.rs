//! # Build Planner CLI
//!
//! Command-line front end for `planner_core`:
//! - Argument parsing and configuration overrides
//! - RON configuration loading
//! - Text and JSON build-order output

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
