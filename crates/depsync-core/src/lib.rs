//! Synchronization protocol for depsync
//!
//! Keeps a project's installed `node_modules` in a dedicated git repository,
//! tagged by a fingerprint of the manifest's dependency sets, so the exact
//! installed tree is reproducible on every machine.
//!
//! # Architecture
//!
//! ```text
//!                  depsync-cli
//!                       |
//!                 depsync-core
//!                       |
//!       +---------------+---------------+
//!       |               |               |
//!  depsync-fs     depsync-git     depsync-npm
//! ```
//!
//! A run flows through the [`fingerprint`] engine, the [`probe`], and then
//! either the [`reuse`] path or the [`publish`] path; [`Synchronizer`] ties
//! them together.

pub mod config;
pub mod context;
pub mod error;
pub mod fingerprint;
pub mod hooks;
pub mod ignore;
pub mod manifest;
pub mod native;
pub mod probe;
pub mod publish;
pub mod reuse;
pub mod sync;

pub use config::{ConfigLayer, SyncConfig};
pub use context::SyncContext;
pub use error::{Error, Result};
pub use fingerprint::Fingerprint;
pub use hooks::LifecycleScript;
pub use ignore::IgnoreSet;
pub use manifest::Manifest;
pub use native::RebuildSummary;
pub use probe::RepositoryState;
pub use publish::PublishReport;
pub use reuse::{FallthroughReason, ReuseOutcome};
pub use sync::{SyncAction, SyncReport, Synchronizer};
