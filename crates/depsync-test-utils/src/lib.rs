//! Shared test utilities for the depsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`]: bare remotes, a committing identity and remote inspection
//! - [`recording`]: [`RecordingVcs`], a `Vcs` wrapper that logs every command
//!   and can inject failures
//! - [`npm`]: [`FakeNpm`], a package manager that writes a predictable tree
//! - [`project`]: [`TestProject`], a project directory wired to a bare remote

pub mod git;
pub mod npm;
pub mod project;
pub mod recording;

pub use npm::{FakeNpm, NpmCall};
pub use project::TestProject;
pub use recording::{RecordingVcs, VcsCall};
