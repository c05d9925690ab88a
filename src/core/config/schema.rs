//! core::config::schema
//!
//! Configuration file schema (TOML).
//!
//! Both scopes share one schema; all fields are optional so that a file
//! only states what it overrides.

use serde::{Deserialize, Serialize};

/// Composition settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComposeSection {
    /// Separator joining hierarchical section titles (default `/`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,

    /// Title of the synthetic default section substituted when a sectioned
    /// scope has no usable default (default `General`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthetic_section_title: Option<String>,
}

/// Naming settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamingSection {
    /// Maximum length of a generated name slug (default 50).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_slug_len: Option<usize>,
}

/// One configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose: Option<ComposeSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming: Option<NamingSection>,
}

impl ConfigFile {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Overlay `other` on top of `self` (later scope wins).
    pub fn merged_with(&self, other: &ConfigFile) -> ConfigFile {
        let compose = match (&self.compose, &other.compose) {
            (None, None) => None,
            (base, overlay) => {
                let base = base.clone().unwrap_or_default();
                let overlay = overlay.clone().unwrap_or_default();
                Some(ComposeSection {
                    separator: overlay.separator.or(base.separator),
                    synthetic_section_title: overlay
                        .synthetic_section_title
                        .or(base.synthetic_section_title),
                })
            }
        };
        let naming = match (&self.naming, &other.naming) {
            (None, None) => None,
            (base, overlay) => {
                let base = base.clone().unwrap_or_default();
                let overlay = overlay.clone().unwrap_or_default();
                Some(NamingSection {
                    max_slug_len: overlay.max_slug_len.or(base.max_slug_len),
                })
            }
        };
        ConfigFile { compose, naming }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_parses() {
        let parsed = ConfigFile::from_toml("").unwrap();
        assert_eq!(parsed, ConfigFile::default());
    }

    #[test]
    fn full_file_parses() {
        let text = r#"
[compose]
separator = "::"
synthetic_section_title = "Misc"

[naming]
max_slug_len = 32
"#;
        let parsed = ConfigFile::from_toml(text).unwrap();
        assert_eq!(parsed.compose.as_ref().unwrap().separator.as_deref(), Some("::"));
        assert_eq!(parsed.naming.as_ref().unwrap().max_slug_len, Some(32));
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(ConfigFile::from_toml("[compose]\nbogus = 1\n").is_err());
        assert!(ConfigFile::from_toml("[mystery]\n").is_err());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile::from_toml("[compose]\nseparator = \"/\"\n").unwrap();
        let overlay = ConfigFile::from_toml("[compose]\nseparator = \"::\"\n").unwrap();
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.compose.unwrap().separator.as_deref(), Some("::"));
    }

    #[test]
    fn merge_keeps_base_when_overlay_silent() {
        let base = ConfigFile::from_toml(
            "[compose]\nseparator = \"/\"\nsynthetic_section_title = \"Misc\"\n",
        )
        .unwrap();
        let overlay = ConfigFile::from_toml("[compose]\nseparator = \"::\"\n").unwrap();
        let merged = base.merged_with(&overlay);
        let compose = merged.compose.unwrap();
        assert_eq!(compose.separator.as_deref(), Some("::"));
        assert_eq!(compose.synthetic_section_title.as_deref(), Some("Misc"));
    }

    #[test]
    fn toml_roundtrip() {
        let text = "[naming]\nmax_slug_len = 40\n";
        let parsed = ConfigFile::from_toml(text).unwrap();
        let reparsed = ConfigFile::from_toml(&parsed.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, reparsed);
    }
}
