//! Core library for the `barrage` CLI.
//!
//! This crate provides the building blocks used by the binary: target
//! configuration and validation, the key-value string grammar, the
//! pattern-based random URL generator, request resolution, the concurrent
//! dispatcher, and outcome aggregation. The primary user-facing interface
//! is the `barrage` command-line application; library APIs may evolve as
//! the CLI grows.
pub mod args;
pub mod config;
pub mod dispatch;
pub mod entry;
pub mod error;
pub mod keyval;
pub mod logger;
pub mod outcome;
pub mod pattern;
pub mod request;
pub mod shutdown;
pub mod sinks;
pub mod summary;
pub mod transport;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
