//! Typed configuration structs for host integration.
//!
//! The host build tool owns its own configuration syntax; by the time values
//! reach this crate they are already shape-validated. These structs give the
//! host a serde-deserializable form of a file-set declaration plus a
//! conversion that performs the remaining domain validation (pattern
//! compilation) and reports a structured configuration error.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fileset::{ArchiveFileSet, FileSet, PatternSet};

/// Declarative form of a [`FileSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSetConfig {
    /// Root directory of the selection.
    pub dir: PathBuf,
    /// Include regular expressions; empty means include everything.
    #[serde(default)]
    pub include: Vec<String>,
    /// Exclude regular expressions, evaluated after includes.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Whether the root must exist at resolution time.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl FileSetConfig {
    /// Compile the patterns and build the file-set.
    pub fn into_fileset(self) -> Result<FileSet> {
        let patterns = PatternSet::compile(&self.include, &self.exclude)?;
        Ok(if self.required {
            FileSet::required(self.dir, patterns)
        } else {
            FileSet::optional(self.dir, patterns)
        })
    }
}

/// Declarative form of an [`ArchiveFileSet`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArchiveFileSetConfig {
    pub fileset: FileSetConfig,
    /// Archive path prefix prepended to every member name.
    #[serde(default)]
    pub prefix: String,
    /// Permission-bit override for every member.
    #[serde(default)]
    pub mode: Option<u32>,
    /// Owner override for every member.
    #[serde(default)]
    pub owner: Option<String>,
    /// Group override for every member.
    #[serde(default)]
    pub group: Option<String>,
}

impl ArchiveFileSetConfig {
    pub fn into_archive_fileset(self) -> Result<ArchiveFileSet> {
        let mut afs = ArchiveFileSet::new(self.fileset.into_fileset()?).with_prefix(&self.prefix);
        if let Some(mode) = self.mode {
            afs = afs.with_mode(mode);
        }
        if let Some(owner) = self.owner {
            afs = afs.with_owner(owner);
        }
        if let Some(group) = self.group {
            afs = afs.with_group(group);
        }
        Ok(afs)
    }
}
