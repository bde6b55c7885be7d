//! Integration tests for addon-forge
//!
//! These tests drive the compiled binary against real temporary git
//! repositories with an embedded upstream checkout per addon.

mod helpers;
mod test_revert;
mod test_update;
