//! CLI commands for addon-forge
//!
//! - **update**: release one addon (or `all`), or rebuild the index (`xml`)
//! - **revert**: restore an addon to its committed state
//! - **push**: commit and force-push the repository
//! - **init**: initialise every embedded source checkout

pub mod init;
pub mod push;
pub mod revert;
pub mod update;

pub use self::init::run_init;
pub use self::push::run_push;
pub use self::revert::run_revert;
pub use self::update::run_update;
