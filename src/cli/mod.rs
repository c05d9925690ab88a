//! cli
//!
//! Command-line interface layer for Folio.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Delegate to command handlers
//! - Does NOT contain composition logic
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! the [`crate::compose`] engine; the engine never performs I/O itself,
//! so reading manifests and writing output live here and in the command
//! handlers.

pub mod args;
pub mod commands;

pub use args::{Cli, Format, Shell};

use anyhow::Result;

use crate::ui::Verbosity;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);
    commands::dispatch(cli.command, cli.cwd.as_deref(), verbosity)
}
