//! inspect command - compose and show one subtree by path

use std::path::Path;

use anyhow::{bail, Context as _, Result};

use crate::compose::Composer;
use crate::core::config::Config;
use crate::emit;
use crate::provider::{AttrRenderer, ManifestProvider};
use crate::ui::output;
use crate::ui::Verbosity;

/// Compose the manifest and print the subtree at `path`.
pub fn inspect(
    manifest_path: &Path,
    path: Option<&str>,
    cwd: Option<&Path>,
    verbosity: Verbosity,
) -> Result<()> {
    let project_dir = cwd
        .map(Path::to_path_buf)
        .or_else(|| manifest_path.parent().map(Path::to_path_buf));
    let config = Config::load(project_dir.as_deref()).context("loading configuration")?;

    let provider = ManifestProvider::from_path(manifest_path)
        .with_context(|| format!("loading manifest '{}'", manifest_path.display()))?;

    let renderer = AttrRenderer;
    let composition = Composer::new(&provider, &provider, &renderer)
        .with_settings(crate::compose::PlaceSettings::from_config(&config))
        .compose(provider.root())
        .context("composing document")?;

    let tree = &composition.tree;
    let node = match path {
        None | Some("") | Some(".") => tree.root(),
        Some(p) => match tree.get_target(tree.root(), p) {
            Some(node) => node,
            None => bail!("no node at path '{p}'"),
        },
    };

    print!("{}", emit::node_to_outline(tree, node));
    output::debug(
        format!("{} node(s) in subtree", 1 + tree.descendants(node).len()),
        verbosity,
    );
    Ok(())
}
