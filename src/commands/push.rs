//! Push command implementation

use crate::core::context::RepoContext;
use crate::core::error::ForgeResult;
use crate::core::vcs::SystemGit;

/// Commit staged changes and force-push the repository to its remote
pub fn run_push(ctx: &RepoContext) -> ForgeResult<()> {
  println!("\n🚀 Pushing updates...");

  let git = SystemGit::at(&ctx.root);
  git.commit("Update")?;
  git.push_force("origin")?;

  println!("✅ Done");
  Ok(())
}
