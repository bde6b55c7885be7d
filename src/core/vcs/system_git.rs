//! System git backend - zero dependencies
//!
//! Every external version-control capability the reconciler composes is a
//! Result-returning method here, one subprocess per call. Subprocesses run
//! with an isolated environment so user-level git configuration cannot
//! change tool behavior.

use super::CommitRange;
use crate::core::error::{ForgeError, ForgeResult, GitError, ResultExt};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Record-separator byte used to split log messages unambiguously
const LOG_SEPARATOR: char = '\u{1e}';

/// Git backend using system git (zero crate dependencies)
pub struct SystemGit {
  /// Working directory all commands run against
  work_dir: PathBuf,
}

impl SystemGit {
  /// Bind the backend to a working directory
  pub fn at(path: &Path) -> Self {
    Self {
      work_dir: path.to_path_buf(),
    }
  }

  /// Get HEAD commit SHA
  pub fn head_commit(&self) -> ForgeResult<String> {
    let output = self.run(&["rev-parse", "HEAD"])?;
    Ok(output.trim().to_string())
  }

  /// Get HEAD commit SHA, absent when the tree has no readable HEAD
  pub fn current_commit(&self) -> Option<String> {
    self.head_commit().ok()
  }

  /// Remove untracked files from the working tree
  pub fn clean(&self) -> ForgeResult<()> {
    self.run(&["clean", "-f"]).map(|_| ())
  }

  /// Discard modifications to tracked files
  pub fn restore_tree(&self) -> ForgeResult<()> {
    self.run(&["checkout", "."]).map(|_| ())
  }

  /// Hard-reset the working tree to HEAD
  pub fn reset_hard(&self) -> ForgeResult<()> {
    self.run(&["reset", "--hard"]).map(|_| ())
  }

  /// Fetch a branch from a remote
  pub fn fetch(&self, remote: &str, branch: &str) -> ForgeResult<()> {
    self.run(&["fetch", remote, branch]).map(|_| ())
  }

  /// Merge a ref into the current HEAD
  pub fn merge(&self, reference: &str) -> ForgeResult<()> {
    self.run(&["merge", reference]).map(|_| ())
  }

  /// Check out a specific ref (commit, tag or branch)
  pub fn checkout(&self, reference: &str) -> ForgeResult<()> {
    self.run(&["checkout", reference]).map(|_| ())
  }

  /// Initialise submodule configuration
  pub fn submodule_init(&self) -> ForgeResult<()> {
    self.run(&["submodule", "init"]).map(|_| ())
  }

  /// Update submodules, optionally limited to one path
  pub fn submodule_update(&self, path: Option<&str>, init: bool, recursive: bool) -> ForgeResult<String> {
    let mut args = vec!["submodule", "update"];
    if init {
      args.push("--init");
    }
    if recursive {
      args.push("--recursive");
    }
    if let Some(path) = path {
      args.push(path);
    }
    self.run(&args)
  }

  /// Full commit messages for a range, newest first
  pub fn log_messages(&self, range: &CommitRange, limit: usize) -> ForgeResult<Vec<String>> {
    let count = limit.to_string();
    let range = range.to_string();
    // %x1e terminates each body so multi-paragraph messages split cleanly
    let output = self.run(&["log", "-n", &count, "--pretty=format:%B%x1e", &range])?;

    let messages = output
      .split(LOG_SEPARATOR)
      .map(|m| m.trim().to_string())
      .filter(|m| !m.is_empty())
      .collect();

    Ok(messages)
  }

  /// Commit staged changes
  pub fn commit(&self, message: &str) -> ForgeResult<()> {
    self.run(&["commit", "-m", message]).map(|_| ())
  }

  /// Force-push the current branch to a remote
  pub fn push_force(&self, remote: &str) -> ForgeResult<()> {
    self.run(&["push", remote, "-f"]).map(|_| ())
  }

  /// Run a git command, returning stdout on success
  fn run(&self, args: &[&str]) -> ForgeResult<String> {
    let output = self
      .git_cmd()
      .args(args)
      .output()
      .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(ForgeError::Git(GitError::CommandFailed {
        command: format!("git {}", args.join(" ")),
        stderr: stderr.trim().to_string(),
      }));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
  }

  /// Create a safe git command with isolated environment
  ///
  /// - Sets working directory to the bound path
  /// - Clears environment variables, whitelisting only PATH and HOME
  /// - Adds safe configuration overrides
  fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    cmd.arg("-C").arg(&self.work_dir);

    // Isolated environment (don't trust ambient git variables)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }

    // Force safe behavior (override user config)
    cmd.arg("-c").arg("protocol.version=2");
    cmd.arg("-c").arg("advice.detachedHead=false");
    cmd.arg("-c").arg("core.quotePath=false"); // Don't escape non-ASCII

    cmd
  }
}
