//! Append release entries to a changelog file.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::domain::{Commit, Version};

/// Header written when the changelog file does not exist yet
pub const CHANGELOG_HEADER: &str = "# Changelog\n";

/// Receives a released version and the commits it contains
pub trait ChangelogWriter {
    /// Append one entry; commits are ordered oldest first
    fn append(&self, version: &Version, commits: &[Commit], path: &Path) -> io::Result<()>;
}

/// Writes plain markdown entries to a file on disk
#[derive(Debug, Default, Clone, Copy)]
pub struct FileChangelog;

impl ChangelogWriter for FileChangelog {
    fn append(&self, version: &Version, commits: &[Commit], path: &Path) -> io::Result<()> {
        let today = Local::now().format("%Y-%m-%d").to_string();
        let is_new = !path.exists();

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if is_new {
            file.write_all(CHANGELOG_HEADER.as_bytes())?;
        }
        file.write_all(format_entry(version, &today, commits).as_bytes())?;
        file.flush()
    }
}

/// Format one version section.
///
/// ```text
/// ## 1.4.0 - 2024-03-01
///
/// - 1a2b3c4 Fix walk order (Jane Doe)
/// ```
pub fn format_entry(version: &Version, date: &str, commits: &[Commit]) -> String {
    let mut entry = format!("\n## {} - {}\n\n", version, date);

    if commits.is_empty() {
        entry.push_str("- No changes\n");
    }
    for commit in commits {
        entry.push_str(&format!(
            "- {} {} ({})\n",
            commit.short_id(),
            commit.summary(),
            commit.author
        ));
    }

    entry
}
