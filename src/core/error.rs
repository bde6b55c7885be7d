//! Error types for addon-forge with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and
//! provides contextual help messages to users. Release preconditions that
//! fail (wrong version, nothing new to ship) are ordinary members of this
//! taxonomy, not panics.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for addon-forge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Release precondition failure (version ordering, nothing to release)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for addon-forge
#[derive(Debug)]
pub enum ForgeError {
  /// Version parsing/ordering errors
  Version(VersionError),

  /// Manifest load/parse errors
  Manifest(ManifestError),

  /// Git operation errors
  Git(GitError),

  /// Release reconciliation errors
  Release(ReleaseError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl ForgeError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    ForgeError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    ForgeError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      ForgeError::Message { message, context, help } => ForgeError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      ForgeError::Io(e) => ForgeError::Message {
        message: format!("I/O error: {}", e),
        context: Some(ctx_str),
        help: None,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      ForgeError::Version(_) => ExitCode::Validation,
      ForgeError::Manifest(_) => ExitCode::User,
      ForgeError::Git(_) => ExitCode::System,
      ForgeError::Release(_) => ExitCode::Validation,
      ForgeError::Io(_) => ExitCode::System,
      ForgeError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      ForgeError::Version(e) => e.help_message(),
      ForgeError::Release(e) => e.help_message(),
      ForgeError::Manifest(e) => e.help_message(),
      ForgeError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for ForgeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ForgeError::Version(e) => write!(f, "{}", e),
      ForgeError::Manifest(e) => write!(f, "{}", e),
      ForgeError::Git(e) => write!(f, "{}", e),
      ForgeError::Release(e) => write!(f, "{}", e),
      ForgeError::Io(e) => write!(f, "I/O error: {}", e),
      ForgeError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for ForgeError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      ForgeError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ForgeError {
  fn from(err: io::Error) -> Self {
    ForgeError::Io(err)
  }
}

impl From<String> for ForgeError {
  fn from(msg: String) -> Self {
    ForgeError::message(msg)
  }
}

impl From<&str> for ForgeError {
  fn from(msg: &str) -> Self {
    ForgeError::message(msg)
  }
}

impl From<VersionError> for ForgeError {
  fn from(err: VersionError) -> Self {
    ForgeError::Version(err)
  }
}

impl From<ManifestError> for ForgeError {
  fn from(err: ManifestError) -> Self {
    ForgeError::Manifest(err)
  }
}

impl From<GitError> for ForgeError {
  fn from(err: GitError) -> Self {
    ForgeError::Git(err)
  }
}

impl From<ReleaseError> for ForgeError {
  fn from(err: ReleaseError) -> Self {
    ForgeError::Release(err)
  }
}

/// Version parsing and ordering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
  /// A component is non-numeric or the string has no components
  Invalid { input: String },

  /// More than three dot-separated components requested for a release
  TooManyParts { input: String },

  /// Explicit target version does not exceed the current one
  NotHigher { target: String, current: String },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::NotHigher { current, .. } => Some(format!(
        "Pass a version higher than {} or omit it to bump the minor component automatically.",
        current
      )),
      VersionError::TooManyParts { .. } => {
        Some("Release versions use at most three numeric components (major.minor.patch).".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::Invalid { input } => {
        write!(f, "Invalid version '{}'", input)
      }
      VersionError::TooManyParts { input } => {
        write!(f, "Target version {} is not valid: too many components", input)
      }
      VersionError::NotHigher { target, current } => {
        write!(f, "Target version {} is not higher than current version {}", target, current)
      }
    }
  }
}

/// Manifest load and parse errors
#[derive(Debug)]
pub enum ManifestError {
  /// Manifest file does not exist
  NotFound { path: PathBuf },

  /// Manifest file is not well-formed XML
  Malformed { path: PathBuf, reason: String },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::NotFound { path } => Some(format!(
        "Expected an addon manifest at {}. Run `addon-forge init` if the source checkout is missing.",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::NotFound { path } => {
        write!(f, "Manifest not found: {}", path.display())
      }
      ManifestError::Malformed { path, reason } => {
        write!(f, "Malformed manifest {}: {}", path.display(), reason)
      }
    }
  }
}

/// Git operation errors
#[derive(Debug)]
pub enum GitError {
  /// Git command exited non-zero
  CommandFailed { command: String, stderr: String },
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
    }
  }
}

/// Release reconciliation errors
#[derive(Debug)]
pub enum ReleaseError {
  /// Automatic release requested but the source already points at the
  /// baseline commit; nothing to ship
  AlreadyUpToDate {
    addon: String,
    version: String,
    commit: String,
  },

  /// Embedded source checkout is missing even after initialization
  MissingSource { path: PathBuf },

  /// Checkout landed on a commit that does not match the requested ref
  CheckoutMismatch { requested: String, resolved: String },

  /// Restoring the addon tree to its committed state failed
  RevertFailed { addon: String, reason: String },
}

impl ReleaseError {
  fn help_message(&self) -> Option<String> {
    match self {
      ReleaseError::AlreadyUpToDate { .. } => {
        Some("The embedded checkout already points at this commit; a release would ship no changes.".to_string())
      }
      ReleaseError::MissingSource { .. } => {
        Some("Run `addon-forge init` to initialise the embedded source checkouts.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ReleaseError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ReleaseError::AlreadyUpToDate { addon, version, commit } => {
        write!(f, "{} {} is already using #{}", addon, version, commit)
      }
      ReleaseError::MissingSource { path } => {
        write!(f, "Missing addon source path: {}", path.display())
      }
      ReleaseError::CheckoutMismatch { requested, resolved } => {
        write!(f, "Could not checkout source at '{}' (resolved to {})", requested, resolved)
      }
      ReleaseError::RevertFailed { addon, reason } => {
        write!(f, "Failed to revert {}: {}", addon, reason)
      }
    }
  }
}

/// Result type alias for addon-forge
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> ForgeResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> ForgeResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<ForgeError>,
{
  fn context(self, ctx: impl Into<String>) -> ForgeResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> ForgeResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &ForgeError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
