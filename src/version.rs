//! Dotted numeric addon versions with a total order
//!
//! Addon versions are plain dotted integers ("1.4", "2.10.0"), not full
//! semver: short versions are legal on input and are zero-padded before
//! comparison and packaging. Comparison pads both sides to the longer arity,
//! so "1.2" and "1.2.0" compare equal.

use crate::core::error::VersionError;
use std::cmp::Ordering;
use std::fmt;

/// Number of components a packaged release version carries
pub const RELEASE_COMPONENTS: usize = 3;

/// A parsed addon version: an ordered tuple of numeric components
#[derive(Debug, Clone)]
pub struct AddonVersion {
  components: Vec<u64>,
}

impl AddonVersion {
  /// The 0.0.0 baseline used when no released version can be read
  pub fn zero() -> Self {
    Self {
      components: vec![0; RELEASE_COMPONENTS],
    }
  }

  /// Parse a dotted numeric string
  ///
  /// Fails when the string is empty or any component is non-numeric.
  pub fn parse(input: &str) -> Result<Self, VersionError> {
    let invalid = || VersionError::Invalid { input: input.to_string() };

    if input.trim().is_empty() {
      return Err(invalid());
    }

    let components = input
      .trim()
      .split('.')
      .map(|part| part.parse::<u64>().map_err(|_| invalid()))
      .collect::<Result<Vec<u64>, VersionError>>()?;

    Ok(Self { components })
  }

  /// Number of dot-separated components as written
  pub fn component_count(&self) -> usize {
    self.components.len()
  }

  /// True iff `self` strictly exceeds `other` under the padded order
  pub fn is_higher_than(&self, other: &AddonVersion) -> bool {
    self.cmp(other) == Ordering::Greater
  }

  /// Same major, minor incremented, patch zeroed
  ///
  /// Operates on the 3-padded form, so "1.4" bumps to 1.5.0 and "2.9.0"
  /// bumps to 2.10.0 with no carry into the major component.
  pub fn bump_minor(&self) -> AddonVersion {
    let padded = self.padded(RELEASE_COMPONENTS);
    AddonVersion {
      components: vec![padded[0], padded[1] + 1, 0],
    }
  }

  /// Render with trailing zero components up to exactly three
  pub fn to_padded_string(&self) -> String {
    let padded = self.padded(RELEASE_COMPONENTS.max(self.components.len()));
    padded
      .iter()
      .map(|c| c.to_string())
      .collect::<Vec<String>>()
      .join(".")
  }

  fn padded(&self, arity: usize) -> Vec<u64> {
    let mut out = self.components.clone();
    out.resize(arity.max(out.len()), 0);
    out
  }
}

impl Ord for AddonVersion {
  fn cmp(&self, other: &Self) -> Ordering {
    let arity = self.components.len().max(other.components.len());
    self.padded(arity).cmp(&other.padded(arity))
  }
}

impl PartialOrd for AddonVersion {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl PartialEq for AddonVersion {
  fn eq(&self, other: &Self) -> bool {
    self.cmp(other) == Ordering::Equal
  }
}

impl Eq for AddonVersion {}

impl fmt::Display for AddonVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rendered = self
      .components
      .iter()
      .map(|c| c.to_string())
      .collect::<Vec<String>>()
      .join(".");
    write!(f, "{}", rendered)
  }
}
