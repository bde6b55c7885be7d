//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// An addon repository with one addon wrapping an upstream source checkout
pub struct TestRepo {
  _root: TempDir,
  _upstream: TempDir,
  pub path: PathBuf,
  pub upstream: PathBuf,
  pub addon: String,
}

impl TestRepo {
  /// Create a repository with one addon whose `src/` submodule tracks a
  /// local upstream repo, everything committed
  pub fn new(addon: &str) -> Result<Self> {
    let root = TempDir::new()?;
    let upstream_dir = TempDir::new()?;
    let path = root.path().to_path_buf();
    let upstream = upstream_dir.path().to_path_buf();

    // Upstream addon source with its own manifest
    git(&upstream, &["init", "--initial-branch=master"])?;
    git(&upstream, &["config", "user.name", "Test User"])?;
    git(&upstream, &["config", "user.email", "test@example.com"])?;
    std::fs::write(
      upstream.join("addon.xml"),
      format!(
        r#"<addon id="{}" version="0.0.1" provider-name="upstream">
  <requires>
    <import addon="xbmc.python" version="3.0.0"/>
  </requires>
  <extension point="xbmc.addon.metadata">
    <summary>Example addon</summary>
    <license></license>
  </extension>
</addon>
"#,
        addon
      ),
    )?;
    std::fs::write(upstream.join("default.py"), "print('hello')\n")?;
    std::fs::write(upstream.join("icon.png"), "icon bytes")?;
    git(&upstream, &["add", "."])?;
    git(&upstream, &["commit", "-m", "Initial addon source"])?;

    // Repository root: the addon dir wraps the upstream as a submodule
    git(&path, &["init", "--initial-branch=master"])?;
    git(&path, &["config", "user.name", "Test User"])?;
    git(&path, &["config", "user.email", "test@example.com"])?;

    std::fs::create_dir_all(path.join(addon))?;
    git(
      &path,
      &[
        "-c",
        "protocol.file.allow=always",
        "submodule",
        "add",
        upstream.to_str().context("upstream path not utf-8")?,
        &format!("{}/src", addon),
      ],
    )?;

    std::fs::write(
      path.join(addon).join("addon.xml"),
      format!(r#"<addon id="{}" version="1.0.0" provider-name="Test Provider"/>"#, addon),
    )?;
    std::fs::write(
      path.join("forge.toml"),
      "provider = \"Test Provider\"\nbranch = \"master\"\n",
    )?;

    git(&path, &["add", "."])?;
    git(&path, &["commit", "-m", "Add addon"])?;

    Ok(Self {
      _root: root,
      _upstream: upstream_dir,
      path,
      upstream,
      addon: addon.to_string(),
    })
  }

  /// Commit a new file upstream, returning the new HEAD sha
  pub fn add_upstream_commit(&self, file: &str, content: &str, message: &str) -> Result<String> {
    std::fs::write(self.upstream.join(file), content)?;
    git(&self.upstream, &["add", "."])?;
    git(&self.upstream, &["commit", "-m", message])?;

    let output = git(&self.upstream, &["rev-parse", "HEAD"])?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
  }

  /// Commit everything in the repository root
  pub fn commit_all(&self, message: &str) -> Result<()> {
    git(&self.path, &["add", "-A"])?;
    git(&self.path, &["commit", "-m", message])?;
    Ok(())
  }

  /// Read a file relative to the repository root
  pub fn read_file(&self, rel: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(rel))?)
  }

  /// Check if a file exists relative to the repository root
  pub fn file_exists(&self, rel: &str) -> bool {
    self.path.join(rel).exists()
  }

  /// Read the addon-level manifest
  pub fn addon_manifest(&self) -> Result<String> {
    self.read_file(&format!("{}/addon.xml", self.addon))
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run the addon-forge CLI, failing the test on a non-zero exit
pub fn run_forge(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_forge_raw(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "addon-forge command failed: addon-forge {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

/// Run the addon-forge CLI and hand back the raw output, whatever the exit
pub fn run_forge_raw(cwd: &Path, args: &[&str]) -> Result<Output> {
  let forge_bin = env!("CARGO_BIN_EXE_addon-forge");

  Command::new(forge_bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run addon-forge")
}
