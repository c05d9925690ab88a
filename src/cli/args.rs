//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Folio - declarative document tree composer
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if folio was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Output formats for composed trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Pretty-printed JSON
    Json,
    /// Indented plain-text outline
    Outline,
}

/// Shells supported by the completion command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose a manifest into a document tree
    Compose {
        /// Path to the manifest file (TOML or JSON)
        #[arg(short = 'f', long)]
        manifest: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on the first degradation instead of continuing
        #[arg(long)]
        strict: bool,
    },

    /// Compose a manifest and show one subtree by path
    Inspect {
        /// Path to the manifest file (TOML or JSON)
        #[arg(short = 'f', long)]
        manifest: PathBuf,

        /// Node path inside the composed tree (see the path grammar);
        /// defaults to the root
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compose_args_parse() {
        let cli = Cli::try_parse_from([
            "folio", "compose", "-f", "doc.toml", "--format", "outline", "--strict",
        ])
        .unwrap();
        match cli.command {
            Command::Compose {
                manifest,
                format,
                strict,
                output,
            } => {
                assert_eq!(manifest, PathBuf::from("doc.toml"));
                assert_eq!(format, Format::Outline);
                assert!(strict);
                assert!(output.is_none());
            }
            _ => panic!("expected compose"),
        }
    }

    #[test]
    fn inspect_args_parse() {
        let cli =
            Cli::try_parse_from(["folio", "inspect", "-f", "doc.toml", "--path", "a/b"]).unwrap();
        match cli.command {
            Command::Inspect { path, .. } => assert_eq!(path.as_deref(), Some("a/b")),
            _ => panic!("expected inspect"),
        }
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "compose", "-f", "x.toml", "--quiet"]).unwrap();
        assert!(cli.quiet);
    }
}
