//! compose command - build a manifest into a document tree

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::args::Format;
use crate::compose::{Composer, ErrorPolicy, PlaceSettings};
use crate::core::config::Config;
use crate::emit;
use crate::provider::{AttrRenderer, ManifestProvider};
use crate::ui::output;
use crate::ui::Verbosity;

/// Build the manifest and emit the tree.
pub fn compose(
    manifest_path: &Path,
    format: Format,
    output_path: Option<&PathBuf>,
    strict: bool,
    cwd: Option<&Path>,
    verbosity: Verbosity,
) -> Result<()> {
    let project_dir = cwd
        .map(Path::to_path_buf)
        .or_else(|| manifest_path.parent().map(Path::to_path_buf));
    let config = Config::load(project_dir.as_deref()).context("loading configuration")?;

    let provider = ManifestProvider::from_path(manifest_path)
        .with_context(|| format!("loading manifest '{}'", manifest_path.display()))?;

    let policy = if strict {
        ErrorPolicy::Abort
    } else {
        ErrorPolicy::Continue
    };
    let renderer = AttrRenderer;
    let composition = Composer::new(&provider, &provider, &renderer)
        .with_policy(policy)
        .with_settings(PlaceSettings::from_config(&config))
        .compose(provider.root())
        .context("composing document")?;

    let rendered = match format {
        Format::Json => emit::to_json_string(&composition.tree),
        Format::Outline => emit::to_outline(&composition.tree),
    };

    match output_path {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("writing '{}'", path.display()))?;
            output::print(format!("wrote {}", path.display()), verbosity);
        }
        None => println!("{rendered}"),
    }

    output::report_summary(&composition.report, verbosity);
    Ok(())
}
