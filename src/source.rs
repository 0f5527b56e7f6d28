//! Input and output value types for one expansion pass.
//!
//! A [`SourceFile`] is an already-materialized source text handed in by the
//! host; a [`GeneratedUnit`] is one named fragment handed back to the host's
//! source-addition sink. Both are plain immutable data.

use std::path::Path;

/// One source text unit supplied by the host for a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Display name, used in diagnostics.
    pub name: String,
    /// Full source text.
    pub text: String,
}

impl SourceFile {
    /// Creates a source file from a name and text.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Reads a source file from disk. Convenience for hosts and tests; the
    /// engine itself never touches the filesystem.
    pub fn from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, text })
    }
}

/// One emitted source fragment, uniquely named per directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Unique unit name (ends in `.g.cs`).
    pub name: String,
    /// Full text payload.
    pub text: String,
}

impl GeneratedUnit {
    /// Creates a generated unit.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}
