//! Support library for the digitstrip CLI binary.
//!
//! Exposes the command pipeline, logging setup, progress rendering, and PNG
//! output so integration tests can drive a full generation without forking
//! a subprocess.

pub mod cli;
pub mod logging;
pub mod output;
pub mod progress;
