//! Aggregate index: addons.xml plus its checksum sidecar
//!
//! The index is derived state. Every invocation rebuilds it from scratch by
//! collecting each addon's manifest root under a fresh `<addons>` element;
//! it is never patched incrementally.

use crate::core::context::{INDEX_FILE, RepoContext};
use crate::core::error::{ForgeError, ForgeResult, ResultExt};
use crate::manifest::Manifest;
use crate::manifest::tree::{XmlElement, XmlNode, serialize_document};
use md5::{Digest, Md5};
use std::fs;
use std::path::Path;

/// Result of an index rebuild
#[derive(Debug, Clone)]
pub struct IndexSummary {
  pub addon_count: usize,
  pub checksum: String,
}

/// Immediate subdirectories of the repository root, except VCS metadata
///
/// Sorted by name so the index children have a stable order.
pub fn addon_dirs(ctx: &RepoContext) -> ForgeResult<Vec<String>> {
  let mut addons = Vec::new();

  let entries = fs::read_dir(&ctx.root)
    .with_context(|| format!("Failed to list repository root {}", ctx.root.display()))?;
  for entry in entries {
    let entry = entry.with_context(|| format!("Failed to list repository root {}", ctx.root.display()))?;
    if !entry.path().is_dir() {
      continue;
    }

    let name = entry.file_name().to_string_lossy().into_owned();
    if name == ".git" {
      continue;
    }
    addons.push(name);
  }

  addons.sort();
  Ok(addons)
}

/// Fully rebuild addons.xml and its .md5 sidecar
pub fn rebuild(ctx: &RepoContext) -> ForgeResult<IndexSummary> {
  println!("\n🗂️ Updating {}", INDEX_FILE);

  let index_path = ctx.index_path();
  if let Some(old) = file_checksum(&index_path) {
    println!("   Old MD5: {}", old);
  }

  let mut root = XmlElement::new("addons");
  let mut count = 0usize;

  for addon in addon_dirs(ctx)? {
    let manifest_path = ctx.addon_manifest(&addon);
    if !manifest_path.exists() {
      // Not every subdirectory is an addon
      continue;
    }

    let manifest = Manifest::load(&manifest_path)?;
    root.append_child(XmlNode::Element(manifest.root));
    count += 1;
  }

  let bytes = serialize_document(&root)
    .map_err(|reason| ForgeError::message(format!("Failed to serialize index: {}", reason)))?;
  fs::write(&index_path, &bytes).with_context(|| format!("Failed to write {}", index_path.display()))?;

  let checksum = hex::encode(Md5::digest(&bytes));
  fs::write(ctx.index_checksum_path(), format!("{} {}", checksum, INDEX_FILE))
    .context("Failed to write index checksum sidecar")?;

  println!("   New MD5: {}", checksum);
  println!("   Addon count: {}", count);

  Ok(IndexSummary { addon_count: count, checksum })
}

fn file_checksum(path: &Path) -> Option<String> {
  fs::read(path).ok().map(|bytes| hex::encode(Md5::digest(&bytes)))
}
