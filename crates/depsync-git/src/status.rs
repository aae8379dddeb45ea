//! Parsing of `git status --porcelain -z --untracked-files=all`
//!
//! Records are NUL-terminated and paths are verbatim (no quoting). Each record
//! is `XY <path>`, where `X` describes the index and `Y` the working tree.
//! A rename or copy is followed by one extra record holding the original
//! path. Untracked files are `?? <path>`.

use crate::{Error, Result};

/// Paths grouped by kind of change, for one side (index or working tree).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub modified: Vec<String>,
    pub deleted: Vec<String>,
    pub renamed: Vec<String>,
    pub copied: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && self.renamed.is_empty()
            && self.copied.is_empty()
    }

    fn record(&mut self, code: char, path: &str) {
        let bucket = match code {
            'A' => &mut self.added,
            // type changes and unmerged paths count as modifications
            'M' | 'T' | 'U' => &mut self.modified,
            'D' => &mut self.deleted,
            'R' => &mut self.renamed,
            'C' => &mut self.copied,
            _ => return,
        };
        bucket.push(path.to_string());
    }
}

/// Parsed status of a working tree against its last commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSummary {
    /// Staged changes
    pub index: ChangeSet,
    /// Unstaged changes
    pub worktree: ChangeSet,
    /// Untracked paths (files, since `--untracked-files=all` is used)
    pub untracked: Vec<String>,
}

impl StatusSummary {
    /// Parse porcelain v1 output produced with `-z`.
    pub fn parse(output: &str) -> Result<Self> {
        let mut summary = Self::default();
        let mut records = output.split('\0').filter(|r| !r.is_empty());

        while let Some(record) = records.next() {
            let mut chars = record.chars();
            let (Some(x), Some(y), Some(' ')) = (chars.next(), chars.next(), chars.next())
            else {
                return Err(Error::StatusParse {
                    line: record.to_string(),
                });
            };
            let path = chars.as_str();
            if path.is_empty() {
                return Err(Error::StatusParse {
                    line: record.to_string(),
                });
            }

            match (x, y) {
                ('?', '?') => summary.untracked.push(path.to_string()),
                // ignored entries only appear with --ignored; nothing to track
                ('!', '!') => {}
                _ => {
                    if matches!(x, 'R' | 'C') || matches!(y, 'R' | 'C') {
                        // the original path; only the new one is recorded
                        if records.next().is_none() {
                            return Err(Error::StatusParse {
                                line: record.to_string(),
                            });
                        }
                    }
                    summary.index.record(x, path);
                    summary.worktree.record(y, path);
                }
            }
        }

        Ok(summary)
    }

    /// True when the working tree differs from the last commit, staged or not.
    ///
    /// Untracked files alone do not count: `commit -a` would not pick them up.
    pub fn has_changes(&self) -> bool {
        !self.index.is_empty() || !self.worktree.is_empty()
    }
}
