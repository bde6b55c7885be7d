//! Integration tests for `addon-forge update`

use crate::helpers::{TestRepo, run_forge, run_forge_raw};
use anyhow::Result;

#[test]
fn test_update_auto_bumps_and_packages() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;
  repo.add_upstream_commit("search.py", "def search(): pass\n", "Add search")?;

  run_forge(&repo.path, &["update", "plugin.video.example"])?;

  // Manifest rewritten with the bumped version and configured provider
  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="1.1.0""#), "manifest: {}", manifest);
  assert!(manifest.contains(r#"provider-name="Test Provider""#));

  // Stable serialized form: exact declaration first, CRLF endings
  assert!(manifest.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\r\n"));
  assert_eq!(manifest.matches('\n').count(), manifest.matches("\r\n").count());

  // News entry labelled with version and short commit, changelog bullets
  assert!(manifest.contains("<news>1.1.0 #"));
  assert!(manifest.contains("- Add search"));

  // Empty license field got the default; authored summary survived
  assert!(manifest.contains("<license>GNU General Public License, v2</license>"));
  assert!(manifest.contains("<summary>Example addon</summary>"));

  // Archives, assets and index
  assert!(repo.file_exists("plugin.video.example/plugin.video.example-1.1.0.zip"));
  assert!(repo.file_exists("plugin.video.example/plugin.video.example-latest.zip"));
  assert!(repo.file_exists("plugin.video.example/icon.png"));
  assert!(repo.file_exists("addons.xml"));
  assert!(repo.file_exists("addons.xml.md5"));

  // Staging directory is cleaned up
  assert!(!repo.file_exists("plugin.video.example/plugin.video.example"));

  // The index aggregates the freshly written manifest
  let index = repo.read_file("addons.xml")?;
  assert!(index.contains(r#"version="1.1.0""#));

  Ok(())
}

#[test]
fn test_update_without_new_commits_is_up_to_date() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  let output = run_forge_raw(&repo.path, &["update", "plugin.video.example"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("is already using #"), "stderr: {}", stderr);

  // The manifest was not touched
  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="1.0.0""#));

  Ok(())
}

#[test]
fn test_update_explicit_version_not_higher() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;
  repo.add_upstream_commit("fix.py", "pass\n", "Fix something")?;

  let output = run_forge_raw(&repo.path, &["update", "plugin.video.example", "0.5.0"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(3));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("is not higher than current version 1.0.0"), "stderr: {}", stderr);

  // No manifest write, no archive
  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="1.0.0""#));
  assert!(!repo.file_exists("plugin.video.example/plugin.video.example-0.5.0.zip"));

  Ok(())
}

#[test]
fn test_update_explicit_version_and_commit_pin() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;
  let pinned = repo.add_upstream_commit("second.py", "pass\n", "Second change")?;
  repo.add_upstream_commit("third.py", "pass\n", "Third change")?;

  let short = &pinned[..7];
  run_forge(&repo.path, &["update", "plugin.video.example", "2.0.0", short])?;

  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="2.0.0""#));
  assert!(manifest.contains(&format!("2.0.0 #{}", short)));

  // Changelog covers baseline..pinned only
  assert!(manifest.contains("- Second change"));
  assert!(!manifest.contains("- Third change"));

  assert!(repo.file_exists("plugin.video.example/plugin.video.example-2.0.0.zip"));

  Ok(())
}

#[test]
fn test_update_short_version_is_padded() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;
  repo.add_upstream_commit("more.py", "pass\n", "More code")?;

  run_forge(&repo.path, &["update", "plugin.video.example", "2"])?;

  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="2.0.0""#));
  assert!(repo.file_exists("plugin.video.example/plugin.video.example-2.0.0.zip"));

  Ok(())
}

#[test]
fn test_update_checkout_mismatch() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;
  repo.add_upstream_commit("more.py", "pass\n", "More code")?;

  // `master` checks out fine but the resolved sha does not start with it
  let output = run_forge_raw(&repo.path, &["update", "plugin.video.example", "2.0.0", "master"])?;
  assert!(!output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Could not checkout source at 'master'"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_update_missing_addon_fails() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;

  let output = run_forge_raw(&repo.path, &["update", "no.such.addon"])?;
  assert!(!output.status.success());
  assert_eq!(output.status.code(), Some(1));

  let stderr = String::from_utf8_lossy(&output.stderr);
  assert!(stderr.contains("Could not find addon path"), "stderr: {}", stderr);

  Ok(())
}

#[test]
fn test_update_all_continues_past_failures() -> Result<()> {
  let repo = TestRepo::new("plugin.video.example")?;
  repo.add_upstream_commit("feature.py", "pass\n", "Add feature")?;

  // A directory that is not a releasable addon; sorts before the good one
  std::fs::create_dir_all(repo.path.join("broken.addon"))?;
  std::fs::write(repo.path.join("broken.addon/readme.txt"), "not an addon")?;

  let output = run_forge(&repo.path, &["update", "all"])?;
  let stderr = String::from_utf8_lossy(&output.stderr);

  // The broken addon is reported, the good one still ships
  assert!(stderr.contains("broken.addon"), "stderr: {}", stderr);
  let manifest = repo.addon_manifest()?;
  assert!(manifest.contains(r#"version="1.1.0""#));
  assert!(repo.file_exists("addons.xml"));

  Ok(())
}
