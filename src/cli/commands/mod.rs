//! cli::commands
//!
//! Command handlers. Each handler is thin: it resolves configuration,
//! wires providers into the composer, and formats results.

pub mod completion;
pub mod compose;
pub mod inspect;

use anyhow::Result;

use crate::cli::args::Command;
use crate::ui::Verbosity;

/// Dispatch a parsed command.
pub fn dispatch(command: Command, cwd: Option<&std::path::Path>, verbosity: Verbosity) -> Result<()> {
    match command {
        Command::Compose {
            manifest,
            format,
            output,
            strict,
        } => compose::compose(&manifest, format, output.as_ref(), strict, cwd, verbosity),
        Command::Inspect { manifest, path } => {
            inspect::inspect(&manifest, path.as_deref(), cwd, verbosity)
        }
        Command::Completion { shell } => completion::completion(shell),
    }
}
