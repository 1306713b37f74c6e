//! Changelog editing.
//!
//! `CHANGELOG.md` is a title line followed by `## ` sections, newest first.
//! New sections are always spliced in above the first existing one.

use crate::error::Result;
use std::path::Path;

/// Title written when the changelog is created from scratch
pub const CHANGELOG_TITLE: &str = "# Changelog";

/// Subjects longer than this many characters are truncated
const MAX_SUBJECT_CHARS: usize = 98;

/// Characters kept from a truncated subject before the ellipsis
const TRUNCATED_SUBJECT_CHARS: usize = 95;

/// A single dated changelog section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    /// Version the section describes
    pub version: String,
    /// Release date, `YYYY-MM-DD`
    pub date: String,
    /// Whether the heading carries the `(hotfix)` marker
    pub hotfix: bool,
    /// Section body, without trailing blank lines
    pub body: String,
}

impl ChangelogEntry {
    /// Section built from commit subjects, one bullet each.
    ///
    /// Falls back to a single `<kind> release` bullet when there are no subjects.
    pub fn from_subjects(version: &str, date: &str, subjects: &[String], kind: &str) -> Self {
        Self {
            version: version.to_string(),
            date: date.to_string(),
            hotfix: false,
            body: render_bullets(subjects, kind),
        }
    }

    /// Hotfix section whose body is the operator's message verbatim
    pub fn hotfix(version: &str, date: &str, message: &str) -> Self {
        Self {
            version: version.to_string(),
            date: date.to_string(),
            hotfix: true,
            body: message.trim_end().to_string(),
        }
    }

    /// Heading line, e.g. `## [2.2.0] - 2024-05-01`
    pub fn heading(&self) -> String {
        if self.hotfix {
            format!("## [{}] - {} (hotfix)", self.version, self.date)
        } else {
            format!("## [{}] - {}", self.version, self.date)
        }
    }

    /// Render as markdown, ending in a single newline
    pub fn to_markdown(&self) -> String {
        format!("{}\n\n{}\n", self.heading(), self.body)
    }
}

/// Render commit subjects as markdown bullets
pub fn render_bullets(subjects: &[String], kind: &str) -> String {
    if subjects.is_empty() {
        return format!("- {kind} release");
    }

    subjects
        .iter()
        .map(|subject| format!("- {}", truncate_subject(subject)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Truncate to 95 characters plus `...` when longer than 98 characters
pub fn truncate_subject(subject: &str) -> String {
    if subject.chars().count() > MAX_SUBJECT_CHARS {
        let kept: String = subject.chars().take(TRUNCATED_SUBJECT_CHARS).collect();
        format!("{kept}...")
    } else {
        subject.to_string()
    }
}

/// Insert `section` into the document text, returning the new text.
///
/// `section` is a complete `## ...` block. The search for an existing section
/// skips position 0 so a document that opens directly with a section heading
/// is treated as having a title line. A blank document gets the title first.
pub fn insert_section(existing: &str, section: &str) -> String {
    let section = section.trim_end();

    match existing.find("\n## ") {
        Some(newline) => {
            let split = newline + 1;
            let (before, after) = existing.split_at(split);
            let mut out = String::with_capacity(existing.len() + section.len() + 2);
            out.push_str(before);
            out.push_str(section);
            out.push_str("\n\n");
            out.push_str(after);
            out
        }
        None if existing.trim().is_empty() => format!("{CHANGELOG_TITLE}\n\n{section}\n"),
        None => format!("{}\n\n{}\n", existing.trim_end(), section),
    }
}

/// Insert `section` into the changelog at `path`, creating the file if absent
pub fn insert(path: &Path, section: &str) -> Result<()> {
    let existing = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        log::info!("Creating {}", path.display());
        String::new()
    };

    std::fs::write(path, insert_section(&existing, section))?;
    Ok(())
}
