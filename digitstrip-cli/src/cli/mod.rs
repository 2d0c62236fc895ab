//! Command-line interface for rendering digit sequences.
//!
//! A single command parses the digits and layout options, opens (and if
//! needed downloads) the dataset, composes the canvas, and writes it as a
//! PNG next to any existing file rather than over it.

mod commands;

pub use commands::{
    Cli, CliError, Digits, FilterKind, GenerationSummary, SpacingArg, render_summary, run_cli,
};
