//! Rename selected files in place via token substitution.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fileset::{ArchiveFileSet, FileSet, Selection};
use crate::filter::{apply_all, TokenFilter};

/// Renames every resolved entry whose filtered path differs from the
/// original.
///
/// Filters apply to the *entire origin path string*, not just the file name:
/// a token appearing in a parent-directory segment also gets rewritten, and
/// the file is moved there. This is documented, literal behavior.
///
/// Renaming is not idempotent across repeated runs unless the filters
/// themselves are.
pub struct RenamePipeline {
    selections: Vec<Selection>,
    filters: Vec<TokenFilter>,
}

impl RenamePipeline {
    pub fn new() -> Self {
        RenamePipeline {
            selections: Vec::new(),
            filters: Vec::new(),
        }
    }

    pub fn add_fileset(&mut self, fileset: FileSet) -> &mut Self {
        self.selections.push(Selection::Files(fileset));
        self
    }

    pub fn add_archive_fileset(&mut self, fileset: ArchiveFileSet) -> &mut Self {
        self.selections.push(Selection::Archive(fileset));
        self
    }

    pub fn add_filter(&mut self, filter: TokenFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Perform the rename pass. Returns the count of files whose path
    /// actually changed; untouched entries are not counted.
    ///
    /// Zero registered filters is a configuration error: a rename with no
    /// substitution rules is always a no-op and signals caller misuse.
    pub fn rename(self) -> Result<u64> {
        if self.filters.is_empty() {
            return Err(Error::config(
                "rename requires at least one token filter".to_string(),
            ));
        }

        let mut renamed = 0;
        for selection in &self.selections {
            for entry in selection.resolve()? {
                let original = entry.origin.to_string_lossy().into_owned();
                let replaced = apply_all(&self.filters, &original);
                if replaced == original {
                    continue;
                }

                let new_path = PathBuf::from(&replaced);
                if let Some(parent) = new_path.parent() {
                    fs::create_dir_all(parent).map_err(Error::io(parent))?;
                }
                if new_path.exists() {
                    fs::remove_file(&new_path).map_err(Error::io(&new_path))?;
                }
                fs::rename(&entry.origin, &new_path).map_err(Error::io(&entry.origin))?;
                renamed += 1;
            }
        }
        Ok(renamed)
    }
}

impl Default for RenamePipeline {
    fn default() -> Self {
        RenamePipeline::new()
    }
}
