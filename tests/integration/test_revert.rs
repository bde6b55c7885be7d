//! Integration tests for `addon-forge revert` and the repository commands

use crate::helpers::{TestRepo, git, run_forge, run_forge_raw};
use anyhow::Result;
use tempfile::TempDir;

#[test]
fn test_revert_restores_manifest_and_removes_junk() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  std::fs::write(
    repo.path.join("plugin.video.example/addon.xml"),
    r#"<addon id="plugin.video.example" version="9.9.9"/>"#,
  )?;
  std::fs::write(repo.path.join("plugin.video.example/junk.txt"), "left behind")?;

  run_forge(&repo.path, &["revert", "plugin.video.example"])?;

  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="1.0.0""#), "manifest: {}", manifest);
  assert!(!repo.file_exists("plugin.video.example/junk.txt"));

  // Revert also rebuilds the index
  assert!(repo.file_exists("addons.xml"));
  assert!(repo.file_exists("addons.xml.md5"));

  Ok(())
}

#[test]
fn test_revert_resets_embedded_checkout() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  std::fs::write(repo.path.join("plugin.video.example/src/default.py"), "tampered\n")?;

  run_forge(&repo.path, &["revert", "plugin.video.example"])?;

  let restored = repo.read_file("plugin.video.example/src/default.py")?;
  assert_eq!(restored, "print('hello')\n");

  Ok(())
}

#[test]
fn test_revert_unknown_addon_fails() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  let output = run_forge_raw(&repo.path, &["revert", "no.such.addon"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Failed to revert no.such.addon"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_init_reinitializes_checkout() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  // Deinit keeps the module cache, so init can restore without cloning
  git(&repo.path, &["submodule", "deinit", "-f", "plugin.video.example/src"])?;
  assert!(!repo.file_exists("plugin.video.example/src/addon.xml"));

  run_forge(&repo.path, &["init"])?;

  assert!(repo.file_exists("plugin.video.example/src/addon.xml"));

  Ok(())
}

#[test]
fn test_push_commits_and_force_pushes() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  let remote = TempDir::new()?;
  git(remote.path(), &["init", "--bare", "--initial-branch=master"])?;
  git(
    &repo.path,
    &["remote", "add", "origin", remote.path().to_str().unwrap()],
  )?;

  // Stage a change, then let the tool commit and push it
  std::fs::write(repo.path.join("plugin.video.example/note.txt"), "shipped")?;
  git(&repo.path, &["add", "-A"])?;

  run_forge(&repo.path, &["push"])?;

  let output = git(remote.path(), &["log", "-1", "--format=%s", "master"])?;
  let subject = String::from_utf8_lossy(&output.stdout);
  assert_eq!(subject.trim(), "Update");

  Ok(())
}
