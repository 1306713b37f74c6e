//! Changeset records consumed by an external version tool.
//!
//! A record is a markdown file with a front-matter block naming the package
//! and bump kind, followed by a free-text message.

use crate::error::Result;
use crate::version::VersionBump;
use std::path::{Path, PathBuf};

/// An ephemeral changeset record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangesetRecord {
    /// Package name from the manifest
    pub package: String,
    /// Requested bump
    pub bump: VersionBump,
    /// Summary written below the front matter
    pub message: String,
}

impl ChangesetRecord {
    /// Create a record
    pub fn new(package: &str, bump: VersionBump, message: &str) -> Self {
        Self {
            package: package.to_string(),
            bump,
            message: message.to_string(),
        }
    }

    /// Render the record file contents
    pub fn render(&self) -> String {
        format!(
            "---\n\"{}\": {}\n---\n\n{}\n",
            self.package,
            self.bump,
            self.message.trim_end()
        )
    }

    /// File name derived from the package name and bump kind
    pub fn file_name(&self) -> String {
        let slug: String = self
            .package
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
            .collect();
        format!("{}-{}.md", slug.trim_matches('-'), self.bump)
    }

    /// Write the record into `directory`, creating it if needed
    pub fn write(&self, directory: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(directory)?;
        let path = directory.join(self.file_name());
        std::fs::write(&path, self.render())?;
        log::debug!("Wrote changeset {}", path.display());
        Ok(path)
    }
}
