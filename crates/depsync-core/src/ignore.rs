//! The dependency repository's ignore-file
//!
//! After a platform-specific rebuild, build outputs show up as untracked
//! files. They are not portable between machines, so they are ignored rather
//! than committed.

use std::collections::BTreeSet;
use std::path::Path;

use crate::Result;

/// Sorted, deduplicated set of ignore patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    patterns: BTreeSet<String>,
}

impl IgnoreSet {
    /// Parse ignore-file content: one pattern per line, blank lines dropped.
    ///
    /// Patterns are kept verbatim; spaces may be significant.
    pub fn parse(content: &str) -> Self {
        let mut set = Self::default();
        set.extend(content.lines());
        set
    }

    /// Read the ignore-file at `path`; a missing file is an empty set.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(depsync_fs::io::read_optional_text(path)?
            .map(|content| Self::parse(&content))
            .unwrap_or_default())
    }

    /// Write the set to `path`, replacing the file.
    pub fn save(&self, path: &Path) -> Result<()> {
        depsync_fs::io::write_text(path, &self.render())?;
        Ok(())
    }

    /// Merge patterns into the set. Blank patterns are dropped.
    pub fn extend<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let pattern = pattern.as_ref().trim_end_matches('\r');
            if !pattern.trim().is_empty() {
                self.patterns.insert(pattern.to_string());
            }
        }
    }

    /// Merge literal paths, escaped so each matches only itself.
    ///
    /// A path containing a line break cannot be written as a pattern and is
    /// skipped.
    pub fn extend_paths<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            match escape_path(path.as_ref()) {
                Some(pattern) => {
                    self.patterns.insert(pattern);
                }
                None => tracing::warn!(path = path.as_ref(), "Cannot ignore path"),
            }
        }
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(pattern)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// File content: one pattern per line with a trailing newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for pattern in &self.patterns {
            out.push_str(pattern);
            out.push('\n');
        }
        out
    }
}

/// Escape a literal path as an ignore pattern.
fn escape_path(path: &str) -> Option<String> {
    if path.is_empty() || path.contains(['\n', '\r']) {
        return None;
    }

    let kept = path.trim_end_matches(' ');
    let mut pattern = String::with_capacity(path.len() + 2);
    if kept.starts_with(['#', '!']) {
        pattern.push('\\');
    }
    for c in kept.chars() {
        if matches!(c, '*' | '?' | '[' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    // trailing spaces are stripped by git unless escaped
    for _ in kept.len()..path.len() {
        pattern.push_str("\\ ");
    }
    Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn union_is_sorted_and_deduplicated() {
        let mut set = IgnoreSet::parse("zeta/build\nalpha/build\n\n");
        set.extend(["alpha/build", "mid/out.node", "  "]);

        assert_eq!(set.render(), "alpha/build\nmid/out.node\nzeta/build\n");
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn windows_line_endings_are_normalized() {
        let set = IgnoreSet::parse("a\r\nb\r\n");
        assert!(set.contains("a"));
        assert!(set.contains("b"));
    }

    #[test]
    fn significant_spaces_are_kept() {
        let set = IgnoreSet::parse(" leading\ntrailing\\ \n");
        assert!(set.contains(" leading"));
        assert!(set.contains("trailing\\ "));
    }

    #[rstest]
    #[case("pkg/build/out.node", "pkg/build/out.node")]
    #[case("pkg/build/café.node", "pkg/build/café.node")]
    #[case("#notes.txt", "\\#notes.txt")]
    #[case("!important.node", "\\!important.node")]
    #[case("pkg/#1/out.node", "pkg/#1/out.node")]
    #[case("pkg/a*b?[c].node", "pkg/a\\*b\\?\\[c].node")]
    #[case("pkg\\win.node", "pkg\\\\win.node")]
    #[case(" leading.node", " leading.node")]
    #[case("trailing.node  ", "trailing.node\\ \\ ")]
    fn paths_are_escaped_as_literal_patterns(#[case] path: &str, #[case] pattern: &str) {
        let mut set = IgnoreSet::default();
        set.extend_paths([path]);
        assert_eq!(set.render(), format!("{pattern}\n"));
    }

    #[test]
    fn unrepresentable_paths_are_skipped() {
        let mut set = IgnoreSet::default();
        set.extend_paths(["two\nlines.node", "", "ok.node"]);
        assert_eq!(set.render(), "ok.node\n");
    }

    #[test]
    fn escaped_paths_survive_a_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".gitignore");

        let mut set = IgnoreSet::default();
        set.extend_paths(["#hash.node", "space .node ", "glob[1].node"]);
        set.save(&path).unwrap();

        assert_eq!(IgnoreSet::load(&path).unwrap(), set);
    }

    #[test]
    fn load_missing_is_empty_and_save_round_trips() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".gitignore");

        let mut set = IgnoreSet::load(&path).unwrap();
        assert!(set.is_empty());

        set.extend(["fsevents/build/Release/fse.node"]);
        set.save(&path).unwrap();

        assert_eq!(IgnoreSet::load(&path).unwrap(), set);
    }
}
