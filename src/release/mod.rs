//! Release pipeline: reconciliation, changelog extraction and packaging

pub mod changelog;
pub mod package;
pub mod reconcile;

pub use self::reconcile::{CommitTarget, ReleaseOutcome, VersionTarget, reconcile, revert_addon};
