//! Init command implementation

use crate::core::context::RepoContext;
use crate::core::error::ForgeResult;
use crate::core::vcs::SystemGit;

/// Initialise every embedded source checkout recursively
pub fn run_init(ctx: &RepoContext) -> ForgeResult<()> {
  let git = SystemGit::at(&ctx.root);
  let output = git.submodule_update(None, true, true)?;

  let trimmed = output.trim();
  if !trimmed.is_empty() {
    println!("{}", trimmed);
  }

  Ok(())
}
