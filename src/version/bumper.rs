//! Semantic version bump arithmetic.

use crate::error::VersionError;
use semver::Version;
use std::fmt;

/// Kind of version bump requested for a release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionBump {
    /// `M.N.P` -> `M.N.(P+1)`
    Patch,
    /// `M.N.P` -> `M.(N+1).0`
    Minor,
    /// `M.N.P` -> `(M+1).0.0`
    Major,
}

impl VersionBump {
    /// Resolve a bump kind from free text.
    ///
    /// Anything other than `major` or `minor` behaves as `patch`. Inputs that are
    /// not one of the three exact literals are logged so a typo does not go
    /// unnoticed.
    pub fn from_kind_lenient(kind: &str) -> Self {
        match kind {
            "major" => VersionBump::Major,
            "minor" => VersionBump::Minor,
            "patch" => VersionBump::Patch,
            other => {
                log::warn!("Unrecognized bump kind '{other}', falling back to patch");
                VersionBump::Patch
            }
        }
    }

    /// Lowercase name used in commit messages and changeset records
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        }
    }

    /// Apply this bump to a version. Pre-release and build metadata are dropped.
    pub fn apply(&self, current: &Version) -> Version {
        match self {
            VersionBump::Major => Version::new(current.major + 1, 0, 0),
            VersionBump::Minor => Version::new(current.major, current.minor + 1, 0),
            VersionBump::Patch => Version::new(current.major, current.minor, current.patch + 1),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a strict `MAJOR.MINOR.PATCH` string.
///
/// Exactly three dot-separated non-negative integers are accepted. Pre-release
/// suffixes, `v` prefixes and surrounding whitespace are rejected.
pub fn parse_version(current: &str) -> Result<Version, VersionError> {
    let invalid = || VersionError::InvalidVersionFormat {
        version: current.to_string(),
    };

    let parts: Vec<&str> = current.split('.').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Compute the next version string for `kind`.
pub fn bump_version(current: &str, kind: &str) -> Result<String, VersionError> {
    let version = parse_version(current)?;
    Ok(VersionBump::from_kind_lenient(kind).apply(&version).to_string())
}
