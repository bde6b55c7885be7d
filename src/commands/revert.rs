//! Revert command implementation

use crate::core::context::RepoContext;
use crate::core::error::ForgeResult;
use crate::index;
use crate::release::revert_addon;

/// Run the revert command
pub fn run_revert(ctx: &RepoContext, addon: String) -> ForgeResult<()> {
  println!("\n🧹 Reverting {}", addon);

  revert_addon(ctx, &addon)?;
  index::rebuild(ctx)?;

  Ok(())
}
