//! Repository configuration (forge.toml)
//!
//! All knobs have defaults so a bare addon repository works without any
//! configuration file. Searched in order: forge.toml, .forge.toml.

use crate::core::error::{ForgeResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for addon-forge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
  /// Value written into every manifest's `provider-name` attribute
  pub provider: String,

  /// Upstream branch tracked by the embedded checkouts
  pub branch: String,

  /// Number of commit messages rendered into a news entry
  pub changelog_entries: usize,

  /// Glob patterns excluded from packaging (matched against file names)
  pub ignores: Vec<String>,

  /// Auxiliary files copied from the source checkout into the addon dir
  pub assets: Vec<String>,

  /// Default metadata field values; never overwrite authored content
  pub metadata: BTreeMap<String, String>,
}

impl Default for ForgeConfig {
  fn default() -> Self {
    let mut metadata = BTreeMap::new();
    metadata.insert("license".to_string(), "GNU General Public License, v2".to_string());
    metadata.insert("website".to_string(), String::new());

    Self {
      provider: String::new(),
      branch: "master".to_string(),
      changelog_entries: 5,
      ignores: vec![
        "__pycache__".to_string(),
        ".git*".to_string(),
        "*.pyc".to_string(),
        "*.pyo".to_string(),
        "test.py".to_string(),
        "*.psd".to_string(),
        "*.code-workspace".to_string(),
        ".vscode*".to_string(),
      ],
      assets: vec!["icon.png".to_string(), "fanart.jpg".to_string()],
      metadata,
    }
  }
}

impl ForgeConfig {
  /// Find the config file in search order: forge.toml, .forge.toml
  pub fn find_config_path(root: &Path) -> Option<PathBuf> {
    let candidates = vec![root.join("forge.toml"), root.join(".forge.toml")];
    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from the repository root, falling back to defaults
  pub fn load(root: &Path) -> ForgeResult<Self> {
    let Some(config_path) = Self::find_config_path(root) else {
      return Ok(Self::default());
    };

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ForgeConfig = toml_edit::de::from_str(&content)
      .map_err(|e| format!("Failed to parse config from {}: {}", config_path.display(), e))?;

    Ok(config)
  }

  /// The metadata defaults plus a computed news entry
  ///
  /// Built fresh per release so the defaults table itself stays immutable.
  pub fn metadata_defaults_with_news(&self, news: String) -> BTreeMap<String, String> {
    let mut defaults = self.metadata.clone();
    defaults.insert("news".to_string(), news);
    defaults
  }
}
