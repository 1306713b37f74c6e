//! Package manifest (`package.json`) access.
//!
//! The manifest is round-tripped through a full JSON parse so every field other
//! than `version` survives untouched and in its original order.

use crate::error::{ManifestError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// In-memory view of a package manifest
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    document: Map<String, Value>,
}

impl PackageManifest {
    /// Load and validate the manifest at `path`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ManifestError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        let document = match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => map,
            _ => {
                return Err(ManifestError::NotAnObject {
                    path: path.to_path_buf(),
                }
                .into());
            }
        };

        let manifest = Self {
            path: path.to_path_buf(),
            document,
        };
        // Validate required fields up front
        manifest.name()?;
        manifest.version()?;
        Ok(manifest)
    }

    /// Package name
    pub fn name(&self) -> Result<&str> {
        self.string_field("name")
    }

    /// Current version string (unvalidated; see [`crate::version::parse_version`])
    pub fn version(&self) -> Result<&str> {
        self.string_field("version")
    }

    /// Replace the version in memory
    pub fn set_version(&mut self, version: &str) {
        self.document
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// Write back with two-space indentation and a trailing newline
    pub fn save(&self) -> Result<()> {
        let mut rendered = serde_json::to_string_pretty(&self.document)?;
        rendered.push('\n');
        std::fs::write(&self.path, rendered)?;
        Ok(())
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn string_field(&self, field: &str) -> Result<&str> {
        self.document
            .get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ManifestError::MissingField {
                    path: self.path.clone(),
                    field: field.to_string(),
                }
                .into()
            })
    }
}
