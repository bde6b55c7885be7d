//! Addon reconciliation: decide whether a release is warranted and build it
//!
//! A release walks a fixed sequence for one addon: restore the tree to its
//! committed state, pull upstream, pin the requested commit, decide the next
//! version, rewrite the manifest, package. The first failing step aborts the
//! remaining ones; nothing is written to the live manifest before the new
//! content is fully rendered.

use crate::core::context::{ADDON_MANIFEST, RepoContext, SRC_DIR};
use crate::core::error::{ForgeError, ForgeResult, ReleaseError, VersionError};
use crate::core::vcs::{CommitRange, SystemGit};
use crate::manifest::Manifest;
use crate::release::changelog::{format_changes, news_entry};
use crate::release::package::{build_archive, copy_assets};
use crate::version::{AddonVersion, RELEASE_COMPONENTS};
use chrono::Local;
use std::fmt;
use std::path::PathBuf;

/// Requested release version: derive automatically or use an explicit one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionTarget {
  /// Bump the minor component of the baseline version
  Automatic,
  /// Use this version, which must exceed the baseline
  Explicit(String),
}

impl VersionTarget {
  /// Map the CLI positional; absent or `auto` means automatic
  pub fn from_arg(arg: Option<String>) -> Self {
    match arg {
      None => VersionTarget::Automatic,
      Some(raw) => {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("auto") {
          VersionTarget::Automatic
        } else {
          VersionTarget::Explicit(trimmed.to_string())
        }
      }
    }
  }
}

impl fmt::Display for VersionTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionTarget::Automatic => write!(f, "auto"),
      VersionTarget::Explicit(v) => write!(f, "{}", v),
    }
  }
}

/// Requested upstream commit: latest on the tracked branch or a pinned ref
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitTarget {
  /// Whatever the tracked branch resolves to after the merge
  Head,
  /// Check out this ref and verify the result matches it
  Explicit(String),
}

impl CommitTarget {
  /// Map the CLI positional; absent or `head` means the branch tip
  pub fn from_arg(arg: Option<String>) -> Self {
    match arg {
      None => CommitTarget::Head,
      Some(raw) => {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("head") {
          CommitTarget::Head
        } else {
          CommitTarget::Explicit(trimmed.to_string())
        }
      }
    }
  }
}

impl fmt::Display for CommitTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommitTarget::Head => write!(f, "head"),
      CommitTarget::Explicit(c) => write!(f, "{}", c),
    }
  }
}

/// What a completed release produced
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
  pub addon: String,
  pub version: String,
  pub commit: String,
  pub archive: PathBuf,
}

/// The (version, commit) pair read before fetching
struct Baseline {
  version: AddonVersion,
  commit: Option<String>,
}

/// Reconcile one addon against its release target
pub fn reconcile(
  ctx: &RepoContext,
  addon: &str,
  version_target: &VersionTarget,
  commit_target: &CommitTarget,
) -> ForgeResult<ReleaseOutcome> {
  println!("\n📦 Release {} (version: {}) (commit: {})", addon, version_target, commit_target);

  let addon_dir = ctx.addon_dir(addon);
  if !addon_dir.is_dir() {
    return Err(ForgeError::with_help(
      format!("Could not find addon path: {}", addon_dir.display()),
      "Addon names match directory names in the repository root.",
    ));
  }

  let src_dir = ctx.src_dir(addon);
  let addon_git = SystemGit::at(&addon_dir);
  let src_git = SystemGit::at(&src_dir);

  // CLEAN: back to the committed state before reading the baseline
  revert_addon(ctx, addon)?;

  // FETCHING: initialise a never-released addon, then pull upstream
  if !src_dir.join(ADDON_MANIFEST).exists() {
    addon_git.submodule_update(Some(SRC_DIR), true, false)?;
  }
  if !src_dir.exists() {
    return Err(ReleaseError::MissingSource { path: src_dir.clone() }.into());
  }

  let baseline = read_baseline(ctx, addon, &src_git);

  src_git.fetch("origin", &ctx.config.branch)?;
  src_git.merge(&format!("origin/{}", ctx.config.branch))?;
  src_git.submodule_init()?;
  src_git.submodule_update(None, false, true)?;

  // PINNED: optional explicit checkout, then record the resolved commit
  if let CommitTarget::Explicit(reference) = commit_target {
    src_git.checkout(reference)?;
  }

  let resolved = src_git.head_commit()?;
  if let CommitTarget::Explicit(reference) = commit_target {
    if !resolved.starts_with(reference) {
      return Err(
        ReleaseError::CheckoutMismatch {
          requested: reference.clone(),
          resolved: short_id(&resolved).to_string(),
        }
        .into(),
      );
    }
  }
  let commit = short_id(&resolved).to_string();

  // VERSION_DECIDED
  let next = decide_version(
    version_target,
    &baseline.version,
    baseline.commit.as_deref(),
    &resolved,
    addon,
    &commit,
  )?;
  let version = next.to_padded_string();

  // MANIFEST_WRITTEN: rewrite the embedded manifest and publish it
  let mut manifest = Manifest::load(&src_dir.join(ADDON_MANIFEST))?;
  manifest.set_attributes(&[
    ("version", version.as_str()),
    ("provider-name", ctx.config.provider.as_str()),
  ]);

  let range = match &baseline.commit {
    Some(old) => CommitRange::Between {
      old: old.clone(),
      new: resolved.clone(),
    },
    None => CommitRange::UpTo { new: resolved.clone() },
  };
  let messages = src_git.log_messages(&range, ctx.config.changelog_entries)?;
  let changes = format_changes(&messages, ctx.config.changelog_entries);
  let date = Local::now().format("%d/%m/%Y").to_string();
  let news = news_entry(&version, &commit, &date, &changes);

  manifest.fill_metadata_defaults(&ctx.config.metadata_defaults_with_news(news));
  manifest.write(&ctx.addon_manifest(addon))?;

  // PACKAGED
  copy_assets(&src_dir, &addon_dir, &ctx.config.assets)?;
  let built = build_archive(ctx, addon, &version)?;

  println!("✅ Built {} (version: {}) (commit: {})", addon, version, commit);

  Ok(ReleaseOutcome {
    addon: addon.to_string(),
    version,
    commit,
    archive: built.archive,
  })
}

/// Restore an addon to its committed state
///
/// Discards untracked files and local modifications in the addon tree, then
/// re-pins the embedded checkout (if present) and hard-resets it. Any
/// underlying command failure surfaces as `RevertFailed`.
pub fn revert_addon(ctx: &RepoContext, addon: &str) -> ForgeResult<()> {
  revert_steps(ctx, addon).map_err(|e| {
    ForgeError::Release(ReleaseError::RevertFailed {
      addon: addon.to_string(),
      reason: e.to_string(),
    })
  })
}

fn revert_steps(ctx: &RepoContext, addon: &str) -> ForgeResult<()> {
  let addon_dir = ctx.addon_dir(addon);
  let git = SystemGit::at(&addon_dir);

  git.clean()?;
  git.restore_tree()?;

  let src_dir = ctx.src_dir(addon);
  if src_dir.exists() {
    git.submodule_update(Some(SRC_DIR), false, false)?;
    SystemGit::at(&src_dir).reset_hard()?;
  }

  Ok(())
}

/// Read the pre-release baseline: manifest version and pinned commit
///
/// Both default (0.0.0 / absent) when unreadable, so a never-released addon
/// compares against nothing.
fn read_baseline(ctx: &RepoContext, addon: &str, src_git: &SystemGit) -> Baseline {
  let version = Manifest::load(&ctx.addon_manifest(addon))
    .ok()
    .and_then(|m| m.version().and_then(|v| AddonVersion::parse(v).ok()))
    .unwrap_or_else(AddonVersion::zero);

  Baseline {
    version,
    commit: src_git.current_commit(),
  }
}

/// Decide the next release version, or that no release is warranted
fn decide_version(
  target: &VersionTarget,
  baseline: &AddonVersion,
  baseline_commit: Option<&str>,
  resolved_commit: &str,
  addon: &str,
  short_commit: &str,
) -> ForgeResult<AddonVersion> {
  match target {
    VersionTarget::Automatic => {
      if baseline_commit == Some(resolved_commit) {
        return Err(
          ReleaseError::AlreadyUpToDate {
            addon: addon.to_string(),
            version: baseline.to_string(),
            commit: short_commit.to_string(),
          }
          .into(),
        );
      }
      Ok(baseline.bump_minor())
    }
    VersionTarget::Explicit(raw) => {
      let requested = AddonVersion::parse(raw)?;
      if !requested.is_higher_than(baseline) {
        return Err(
          VersionError::NotHigher {
            target: raw.clone(),
            current: baseline.to_string(),
          }
          .into(),
        );
      }
      if requested.component_count() > RELEASE_COMPONENTS {
        return Err(VersionError::TooManyParts { input: raw.clone() }.into());
      }
      Ok(requested)
    }
  }
}

fn short_id(sha: &str) -> &str {
  sha.get(..7).unwrap_or(sha)
}
