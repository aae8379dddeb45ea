//! Git command interface for depsync
//!
//! The synchronizer talks to the secondary repository only through the
//! [`Vcs`] trait. [`GitCli`] implements it by spawning `git` with an explicit
//! working directory for every call.

pub mod command;
pub mod error;
pub mod status;
pub mod vcs;

pub use command::{GitCli, GitOutput};
pub use error::{Error, Result};
pub use status::{ChangeSet, StatusSummary};
pub use vcs::{Remote, TagOutcome, Vcs};
