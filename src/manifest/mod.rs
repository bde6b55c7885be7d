//! Addon manifest editing
//!
//! Loads `addon.xml` into an ordered tree, rewrites the root attributes,
//! fills metadata defaults without clobbering authored content, and writes
//! the stable serialized form back out.

pub mod tree;

use crate::core::error::{ForgeError, ForgeResult, ManifestError, ResultExt};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use self::tree::{XmlElement, XmlNode, parse_document, serialize_document};

/// Extension point identifying the metadata block inside a manifest
pub const METADATA_EXTENSION_POINT: &str = "xbmc.addon.metadata";

/// A loaded addon manifest
#[derive(Debug, Clone)]
pub struct Manifest {
  pub root: XmlElement,
}

impl Manifest {
  /// Load a manifest from disk
  pub fn load(path: &Path) -> ForgeResult<Self> {
    if !path.exists() {
      return Err(ManifestError::NotFound { path: path.to_path_buf() }.into());
    }

    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read manifest {}", path.display()))?;

    Self::parse(&content, path)
  }

  /// Parse manifest content, attributing failures to `path`
  pub fn parse(content: &str, path: &Path) -> ForgeResult<Self> {
    let root = parse_document(content).map_err(|reason| ManifestError::Malformed {
      path: path.to_path_buf(),
      reason,
    })?;

    Ok(Self { root })
  }

  /// The root `version` attribute, if present
  pub fn version(&self) -> Option<&str> {
    self.root.attribute("version")
  }

  /// Overwrite the named root attributes unconditionally
  pub fn set_attributes(&mut self, attrs: &[(&str, &str)]) {
    for (name, value) in attrs {
      self.root.set_attribute(name, value);
    }
  }

  /// Fill metadata fields from a defaults map
  ///
  /// Only absent children or children with empty/whitespace text receive the
  /// default; authored content is preserved verbatim. Without a metadata
  /// extension node this is a no-op.
  pub fn fill_metadata_defaults(&mut self, defaults: &BTreeMap<String, String>) {
    let Some(metadata) = self.metadata_node_mut() else {
      return;
    };

    for (key, value) in defaults {
      match metadata.child_element_mut(key) {
        Some(child) => {
          if child.text().trim().is_empty() {
            child.set_text(value);
          }
        }
        None => {
          let mut child = XmlElement::new(key.as_str());
          child.set_text(value);
          metadata.append_child(XmlNode::Element(child));
        }
      }
    }
  }

  fn metadata_node_mut(&mut self) -> Option<&mut XmlElement> {
    self.root.children.iter_mut().find_map(|node| match node {
      XmlNode::Element(el)
        if el.name == "extension" && el.attribute("point") == Some(METADATA_EXTENSION_POINT) =>
      {
        Some(el)
      }
      _ => None,
    })
  }

  /// Serialize to the stable on-disk form
  pub fn serialize(&self) -> ForgeResult<Vec<u8>> {
    serialize_document(&self.root)
      .map_err(|reason| ForgeError::message(format!("Failed to serialize manifest: {}", reason)))
  }

  /// Serialize fully, then write the file in a single publish step
  pub fn write(&self, path: &Path) -> ForgeResult<()> {
    let bytes = self.serialize()?;
    fs::write(path, bytes).with_context(|| format!("Failed to write manifest {}", path.display()))?;
    Ok(())
  }
}
