//! The sync command

use std::path::Path;

use colored::Colorize;

use depsync_core::{SyncAction, SyncConfig, SyncReport, Synchronizer};
use depsync_git::{GitCli, TagOutcome};
use depsync_npm::Npm;

use crate::cli::SyncArgs;
use crate::error::Result;
use crate::logging;

/// Run one sync of `dir`.
///
/// Configuration is the defaults, then `.depsync.toml`, then `args`.
pub fn run_sync(dir: &Path, args: &SyncArgs, verbose: bool) -> Result<()> {
    let mut config = SyncConfig::load(dir)?;
    config.apply(args.layer(verbose));
    logging::init(config.verbose);

    println!(
        "{} Syncing dependencies in {}",
        "=>".blue().bold(),
        dir.display()
    );

    let npm = Npm::with_program(config.npm.clone());
    let synchronizer = Synchronizer::new(GitCli::new(), npm, config, dir);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let report = runtime.block_on(synchronizer.run())?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &SyncReport) {
    let fingerprint = report.fingerprint.as_str().cyan();

    if let Some(reason) = &report.fallthrough {
        println!("   {} {}", "-".dimmed(), reason);
    }

    match report.action {
        SyncAction::UpToDate => {
            println!("{} Already at {}", "OK".green().bold(), fingerprint);
        }
        SyncAction::Reused => {
            println!("{} Reused published tree {}", "OK".green().bold(), fingerprint);
        }
        SyncAction::Published => {
            let commit = if report.committed {
                "new commit"
            } else {
                "tree unchanged"
            };
            match report.tag {
                Some(TagOutcome::Created) => println!(
                    "{} Published {} ({})",
                    "OK".green().bold(),
                    fingerprint,
                    commit
                ),
                Some(TagOutcome::AlreadyExists) => println!(
                    "{} Republished {} (tag already present, {})",
                    "OK".green().bold(),
                    fingerprint,
                    commit
                ),
                None => println!(
                    "{} Nothing to publish for {}",
                    "OK".green().bold(),
                    fingerprint
                ),
            }
        }
    }
}
