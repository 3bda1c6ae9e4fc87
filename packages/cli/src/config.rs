use quill_parser::Serializer;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "quill.config.json";

/// Quill configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Indent used when writing markup
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Undo history per document (0 = unlimited)
    #[serde(default)]
    pub max_undo_levels: usize,

    /// File extensions edited as markup; everything else is plain text
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,

    /// Report every edit through the log
    #[serde(default)]
    pub log: bool,
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_markup_extensions() -> Vec<String> {
    vec!["xml".to_string()]
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Whether `path` should be opened as a markup document
    pub fn is_markup(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                self.markup_extensions
                    .iter()
                    .any(|m| m.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }

    pub fn serializer(&self) -> Serializer {
        Serializer::with_indent(&self.indent)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            max_undo_levels: 0,
            markup_extensions: default_markup_extensions(),
            log: false,
        }
    }
}
