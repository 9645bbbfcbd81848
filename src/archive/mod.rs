//! Archive assembly: one generic builder driving three container formats.
//!
//! The three variants (jar, tar, zip) share the input model and the write
//! loop; only entry serialization differs. [`ArchiveBuilder`] owns the
//! ordered input list and the target path, an [`ArchiveFormat`] opens the
//! container, and its [`EntrySink`] serializes each member. Formats are
//! composed in by the caller, not inherited.
//!
//! Duplicate member names across inputs are written as-is, never
//! deduplicated: most extraction tools show last-write-wins, which is
//! accepted behavior here.

pub mod jar;
pub mod manifest;
pub mod tar;
pub mod zip;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::fileset::{ArchiveFileSet, FileEntry, FileSet, Selection};

/// Serializes members into one open container.
pub trait EntrySink {
    /// Write one regular-file member.
    fn put_file(&mut self, entry: &FileEntry) -> Result<()>;

    /// Write one explicit directory member.
    fn put_dir(&mut self, name: &str) -> Result<()>;

    /// Flush and close the container, returning the total member count
    /// written (including any members the format wrote on open).
    fn close(self) -> Result<u64>;
}

/// A container format the builder can drive.
pub trait ArchiveFormat {
    type Sink: EntrySink;

    /// Open the target for writing. Parent directories exist by the time
    /// this is called; a pre-existing file at the target is overwritten.
    fn open(&self, target: &Path) -> Result<Self::Sink>;
}

/// One input in builder order.
#[derive(Debug, Clone)]
enum ArchiveInput {
    Selection(Selection),
    /// An explicit, caller-declared empty-directory member.
    Dir(String),
}

/// Assembles one archive from an ordered list of file-set inputs.
///
/// Entries are resolved and written in the order the inputs were added;
/// within one input, in the file-set's deterministic traversal order.
pub struct ArchiveBuilder<F: ArchiveFormat> {
    format: F,
    target: PathBuf,
    inputs: Vec<ArchiveInput>,
}

impl<F: ArchiveFormat> ArchiveBuilder<F> {
    pub fn new(format: F, target: impl Into<PathBuf>) -> Self {
        ArchiveBuilder {
            format,
            target: target.into(),
            inputs: Vec::new(),
        }
    }

    pub fn add_fileset(&mut self, fileset: FileSet) -> &mut Self {
        self.inputs
            .push(ArchiveInput::Selection(Selection::Files(fileset)));
        self
    }

    pub fn add_archive_fileset(&mut self, fileset: ArchiveFileSet) -> &mut Self {
        self.inputs
            .push(ArchiveInput::Selection(Selection::Archive(fileset)));
        self
    }

    /// Declare an empty directory member. Names use forward slashes; a
    /// trailing slash is implied by the format.
    pub fn add_dir(&mut self, name: impl AsRef<str>) -> &mut Self {
        self.inputs
            .push(ArchiveInput::Dir(name.as_ref().trim_matches('/').to_string()));
        self
    }

    /// Resolve every input and serialize the archive.
    ///
    /// Returns the count of members written. Any failure aborts the build
    /// and leaves the target in whatever state the write reached.
    pub fn build(self) -> Result<u64> {
        let mut sink = self.format.open(&self.target)?;
        for input in &self.inputs {
            match input {
                ArchiveInput::Selection(selection) => {
                    for entry in selection.resolve()? {
                        sink.put_file(&entry)?;
                    }
                }
                ArchiveInput::Dir(name) => sink.put_dir(name)?,
            }
        }
        sink.close()
    }
}

/// Create the target's parent directories and open it for writing,
/// truncating any pre-existing file.
pub(crate) fn create_target(target: &Path) -> Result<File> {
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(Error::io(parent))?;
        }
    }
    File::create(target).map_err(Error::io(target))
}
