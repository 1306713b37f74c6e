//! Version management for single-package releases.
//!
//! This module provides semantic version bumping and in-place editing of the
//! package manifest's `version` field.

mod bumper;
mod manifest;

pub use bumper::{VersionBump, bump_version, parse_version};
pub use manifest::PackageManifest;

use crate::error::Result;
use std::path::Path;

/// Bump the version stored in the manifest at `manifest_path`.
///
/// Returns the loaded manifest (already saved) together with the new version.
pub fn bump_manifest(
    manifest_path: &Path,
    bump: VersionBump,
) -> Result<(PackageManifest, semver::Version)> {
    let mut manifest = PackageManifest::load(manifest_path)?;
    let current = parse_version(manifest.version()?)?;
    let next = bump.apply(&current);

    manifest.set_version(&next.to_string());
    manifest.save()?;

    log::info!("Bumped {} from {} to {}", manifest.path().display(), current, next);
    Ok((manifest, next))
}
