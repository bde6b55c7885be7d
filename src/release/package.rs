//! Packaging: asset copy, staging tree and zip archives
//!
//! A release is packaged by copying the embedded checkout into a staging
//! directory named after the addon (minus ignored files), dropping the
//! freshly written manifest on top, and zipping the staging tree. The
//! staging directory is removed on success and failure alike.

use crate::core::context::{ADDON_MANIFEST, RepoContext};
use crate::core::error::{ForgeError, ForgeResult, ResultExt};
use glob::Pattern;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Paths of the archives produced for one release
#[derive(Debug, Clone)]
pub struct BuiltArchive {
  /// Versioned archive: `<addon>-<version>.zip`
  pub archive: PathBuf,

  /// Rolling copy: `<addon>-latest.zip`
  pub latest: PathBuf,
}

/// Copy auxiliary asset files from the source checkout into the addon dir
///
/// Existing copies are deleted first; missing sources are skipped.
pub fn copy_assets(src_dir: &Path, addon_dir: &Path, assets: &[String]) -> ForgeResult<()> {
  for name in assets {
    let src = src_dir.join(name);
    let dst = addon_dir.join(name);

    if dst.exists() {
      fs::remove_file(&dst).with_context(|| format!("Failed to remove stale asset {}", dst.display()))?;
    }
    if src.exists() {
      fs::copy(&src, &dst).with_context(|| format!("Failed to copy asset {}", src.display()))?;
    }
  }

  Ok(())
}

/// Build the release archives for an addon at a given version
pub fn build_archive(ctx: &RepoContext, addon: &str, version: &str) -> ForgeResult<BuiltArchive> {
  let addon_dir = ctx.addon_dir(addon);
  let ignores = compile_ignores(&ctx.config.ignores)?;

  let staging = StagingDir::create(addon_dir.join(addon))?;
  copy_tree(&ctx.src_dir(addon), staging.path(), &ignores)?;

  // The rewritten manifest replaces the embedded checkout's own copy
  fs::copy(ctx.addon_manifest(addon), staging.path().join(ADDON_MANIFEST))
    .with_context(|| format!("Failed to stage manifest for {}", addon))?;

  let archive = addon_dir.join(format!("{}-{}.zip", addon, version));
  zip_directory(staging.path(), addon, &archive)?;

  let latest = addon_dir.join(format!("{}-latest.zip", addon));
  fs::copy(&archive, &latest).with_context(|| format!("Failed to refresh {}", latest.display()))?;

  Ok(BuiltArchive { archive, latest })
}

/// Compile configured ignore globs
fn compile_ignores(patterns: &[String]) -> ForgeResult<Vec<Pattern>> {
  patterns
    .iter()
    .map(|p| Pattern::new(p).map_err(|e| ForgeError::message(format!("Invalid ignore pattern '{}': {}", p, e))))
    .collect()
}

/// Ignore patterns match against bare file names at every depth
fn is_ignored(name: &str, ignores: &[Pattern]) -> bool {
  ignores.iter().any(|pattern| pattern.matches(name))
}

/// Staging directory removed when it goes out of scope
struct StagingDir {
  path: PathBuf,
}

impl StagingDir {
  fn create(path: PathBuf) -> ForgeResult<Self> {
    // A stale staging tree from an aborted run must not leak into the copy
    if path.exists() {
      fs::remove_dir_all(&path)
        .with_context(|| format!("Failed to remove stale staging dir {}", path.display()))?;
    }
    fs::create_dir_all(&path).with_context(|| format!("Failed to create staging dir {}", path.display()))?;

    Ok(Self { path })
  }

  fn path(&self) -> &Path {
    &self.path
  }
}

impl Drop for StagingDir {
  fn drop(&mut self) {
    let _ = fs::remove_dir_all(&self.path);
  }
}

/// Copy a tree, pruning ignored files and directories
fn copy_tree(src: &Path, dst: &Path, ignores: &[Pattern]) -> ForgeResult<()> {
  let walker = WalkDir::new(src)
    .min_depth(1)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|entry| {
      entry
        .file_name()
        .to_str()
        .map(|name| !is_ignored(name, ignores))
        .unwrap_or(true)
    });

  for entry in walker {
    let entry = entry.map_err(|e| ForgeError::message(format!("Failed to walk {}: {}", src.display(), e)))?;
    let rel = entry
      .path()
      .strip_prefix(src)
      .map_err(|e| ForgeError::message(format!("Failed to relativize {}: {}", entry.path().display(), e)))?;
    let target = dst.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target).with_context(|| format!("Failed to create {}", target.display()))?;
    } else {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
      }
      fs::copy(entry.path(), &target)
        .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
    }
  }

  Ok(())
}

/// Zip a staging tree with every entry rooted at `prefix/`
fn zip_directory(staging: &Path, prefix: &str, zip_path: &Path) -> ForgeResult<()> {
  let file = File::create(zip_path).with_context(|| format!("Failed to create {}", zip_path.display()))?;
  let mut zip = ZipWriter::new(file);
  let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

  for entry in WalkDir::new(staging).min_depth(1).sort_by_file_name() {
    let entry = entry.map_err(|e| ForgeError::message(format!("Failed to walk staging dir: {}", e)))?;
    let rel = entry
      .path()
      .strip_prefix(staging)
      .map_err(|e| ForgeError::message(format!("Failed to relativize {}: {}", entry.path().display(), e)))?;
    let name = format!("{}/{}", prefix, zip_entry_name(rel));

    if entry.file_type().is_dir() {
      zip
        .add_directory(name, options)
        .map_err(|e| ForgeError::message(format!("Failed to add archive directory: {}", e)))?;
    } else {
      zip
        .start_file(name, options)
        .map_err(|e| ForgeError::message(format!("Failed to add archive entry: {}", e)))?;
      let mut source = File::open(entry.path())
        .with_context(|| format!("Failed to open {}", entry.path().display()))?;
      io::copy(&mut source, &mut zip)
        .with_context(|| format!("Failed to compress {}", entry.path().display()))?;
    }
  }

  zip
    .finish()
    .map_err(|e| ForgeError::message(format!("Failed to finish archive {}: {}", zip_path.display(), e)))?;

  Ok(())
}

/// Archive entry names always use forward slashes
fn zip_entry_name(rel: &Path) -> String {
  rel
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}
