//! Update command implementation
//!
//! `update <addon> [version] [commit]` reconciles one addon and rebuilds the
//! index. Two target names are reserved: `xml` rebuilds the index only, and
//! `all` bulk-releases every addon directory best-effort.

use crate::core::context::RepoContext;
use crate::core::error::{ForgeResult, print_error};
use crate::index;
use crate::release::{CommitTarget, VersionTarget, reconcile};

/// Run the update command
pub fn run_update(
  ctx: &RepoContext,
  target: String,
  version: Option<String>,
  commit: Option<String>,
) -> ForgeResult<()> {
  let target = target.trim().to_lowercase();

  match target.as_str() {
    "xml" => {
      index::rebuild(ctx)?;
      Ok(())
    }
    "all" => run_update_all(ctx),
    addon => {
      let version_target = VersionTarget::from_arg(version);
      let commit_target = CommitTarget::from_arg(commit);

      let outcome = reconcile(ctx, addon, &version_target, &commit_target)?;
      index::rebuild(ctx)?;

      println!(
        "\n📤 {} {} (#{}) ready at {}",
        outcome.addon,
        outcome.version,
        outcome.commit,
        outcome.archive.display()
      );
      Ok(())
    }
  }
}

/// Bulk release: every addon directory, best-effort
///
/// A failing addon is reported and skipped; the remaining addons still get
/// processed and the index is rebuilt from whatever succeeded.
fn run_update_all(ctx: &RepoContext) -> ForgeResult<()> {
  for addon in index::addon_dirs(ctx)? {
    if let Err(err) = reconcile(ctx, &addon, &VersionTarget::Automatic, &CommitTarget::Head) {
      print_error(&err);
    }
  }

  index::rebuild(ctx)?;
  Ok(())
}
