//! Remove selected files.

use std::fs;
use std::io;

use crate::error::{Error, Result};
use crate::fileset::{ArchiveFileSet, FileSet, Selection};

/// Deletes every resolved entry. A file already absent by deletion time is
/// not an error and is not counted.
pub struct DeletePipeline {
    selections: Vec<Selection>,
}

impl DeletePipeline {
    pub fn new() -> Self {
        DeletePipeline {
            selections: Vec::new(),
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

    /// Perform the delete pass. Returns the count of files actually removed.
    pub fn delete(self) -> Result<u64> {
        let mut deleted = 0;
        for selection in &self.selections {
            for entry in selection.resolve()? {
                match fs::remove_file(&entry.origin) {
                    Ok(()) => deleted += 1,
                    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                    Err(err) => return Err(Error::io(&entry.origin)(err)),
                }
            }
        }
        Ok(deleted)
    }
}

impl Default for DeletePipeline {
    fn default() -> Self {
        DeletePipeline::new()
    }
}
