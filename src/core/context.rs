//! Repository context - build once, pass everywhere
//!
//! RepoContext carries the repository root and the loaded configuration so
//! commands never re-resolve paths or re-read forge.toml.

use crate::core::config::ForgeConfig;
use crate::core::error::ForgeResult;
use std::path::{Path, PathBuf};

/// File name of an addon manifest, at the addon level and inside `src/`
pub const ADDON_MANIFEST: &str = "addon.xml";

/// Directory name of the embedded source checkout inside an addon
pub const SRC_DIR: &str = "src";

/// File name of the repository-wide aggregate manifest
pub const INDEX_FILE: &str = "addons.xml";

/// Repository context containing shared per-invocation state
#[derive(Debug, Clone)]
pub struct RepoContext {
  /// Repository root directory
  pub root: PathBuf,

  /// Loaded configuration (defaults when no forge.toml exists)
  pub config: ForgeConfig,
}

impl RepoContext {
  /// Build a context rooted at the given directory
  pub fn build(root: &Path) -> ForgeResult<Self> {
    let config = ForgeConfig::load(root)?;
    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  /// Directory of a named addon
  pub fn addon_dir(&self, addon: &str) -> PathBuf {
    self.root.join(addon)
  }

  /// The addon-level manifest path
  pub fn addon_manifest(&self, addon: &str) -> PathBuf {
    self.addon_dir(addon).join(ADDON_MANIFEST)
  }

  /// The embedded source checkout of a named addon
  pub fn src_dir(&self, addon: &str) -> PathBuf {
    self.addon_dir(addon).join(SRC_DIR)
  }

  /// Path of the aggregate index manifest
  pub fn index_path(&self) -> PathBuf {
    self.root.join(INDEX_FILE)
  }

  /// Path of the index checksum sidecar
  pub fn index_checksum_path(&self) -> PathBuf {
    self.root.join(format!("{}.md5", INDEX_FILE))
  }
}
