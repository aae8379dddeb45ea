//! Package-manager command interface for depsync
//!
//! The synchronizer never resolves dependencies itself; it drives npm as an
//! opaque command through the [`PackageManager`] trait. This crate also owns
//! the platform-aware planning of `npm rebuild` invocations.

pub mod error;
pub mod npm;
pub mod rebuild;

pub use error::{Error, Result};
pub use npm::{InstallFlags, Npm, PackageManager};
pub use rebuild::{PackageGroup, Platform, RebuildPlan, plan_rebuild, required_platform};
