//! File-set selection: the shared data model and traversal algorithm.
//!
//! A [`FileSet`] is a declarative, filtered view over a directory subtree.
//! Resolving it walks the tree once, applies the [`PatternSet`] to each
//! forward-slash relative path, and yields an ordered sequence of
//! [`FileEntry`] values. Ordering is deterministic for a given filesystem
//! state (sorted by relative path) so archive member ordering and copy
//! ordering are reproducible across runs.
//!
//! An [`ArchiveFileSet`] decorates a file-set with an archive-relative path
//! prefix and optional mode/owner/group overrides applied to every entry it
//! yields. [`Selection`] is the common input type every pipeline consumes.

mod entry;
mod matcher;

pub use entry::FileEntry;
pub use matcher::PatternSet;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// A filtered view over a directory subtree.
#[derive(Debug, Clone)]
pub struct FileSet {
    root: PathBuf,
    patterns: PatternSet,
    required: bool,
}

impl FileSet {
    /// A file-set whose root must exist and be a directory at resolution
    /// time; a missing root is a configuration error.
    pub fn required(root: impl Into<PathBuf>, patterns: PatternSet) -> Self {
        FileSet {
            root: root.into(),
            patterns,
            required: true,
        }
    }

    /// A file-set that silently resolves to an empty sequence when its root
    /// is absent. A root that exists but is a regular file is still an
    /// error - a file can never stand in for a directory root.
    pub fn optional(root: impl Into<PathBuf>, patterns: PatternSet) -> Self {
        FileSet {
            root: root.into(),
            patterns,
            required: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and yield every matching regular file, sorted by
    /// relative path.
    ///
    /// Symbolic links are followed for content; a link cycle aborts the
    /// resolution with an I/O error.
    pub fn resolve(&self) -> Result<Vec<FileEntry>> {
        match fs::metadata(&self.root) {
            Ok(md) if md.is_dir() => {}
            Ok(_) => {
                return Err(Error::config(format!(
                    "file-set root '{}' is not a directory",
                    self.root.display()
                )))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                if self.required {
                    return Err(Error::config(format!(
                        "required file-set root '{}' does not exist",
                        self.root.display()
                    )));
                }
                return Ok(Vec::new());
            }
            Err(err) => return Err(Error::io(&self.root)(err)),
        }

        let mut entries = Vec::new();
        for dirent in WalkDir::new(&self.root).follow_links(true) {
            let dirent = dirent.map_err(walk_error)?;
            if !dirent.file_type().is_file() {
                continue;
            }
            let relative = dirent
                .path()
                .strip_prefix(&self.root)
                .unwrap_or_else(|_| dirent.path())
                .to_string_lossy()
                .replace('\\', "/");
            if !self.patterns.matches(&relative) {
                continue;
            }
            let md = dirent.metadata().map_err(walk_error)?;
            entries.push(FileEntry::from_metadata(
                dirent.path().to_path_buf(),
                relative,
                &md,
            ));
        }

        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        Ok(entries)
    }
}

/// A file-set decorated with an archive path prefix and permission overrides.
///
/// Unset overrides pass the filesystem-read value through unchanged.
#[derive(Debug, Clone)]
pub struct ArchiveFileSet {
    fileset: FileSet,
    prefix: String,
    mode: Option<u32>,
    owner: Option<String>,
    group: Option<String>,
}

impl ArchiveFileSet {
    pub fn new(fileset: FileSet) -> Self {
        ArchiveFileSet {
            fileset,
            prefix: String::new(),
            mode: None,
            owner: None,
            group: None,
        }
    }

    /// Prefix prepended to every relative path before it is used as an
    /// archive member name. Leading and trailing slashes are trimmed.
    pub fn with_prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.prefix = prefix.as_ref().trim_matches('/').to_string();
        self
    }

    /// Replace every entry's permission bits.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode & 0o7777);
        self
    }

    /// Replace every entry's owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Replace every entry's group.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Resolve the underlying file-set and apply prefix and overrides.
    pub fn resolve(&self) -> Result<Vec<FileEntry>> {
        let mut entries = self.fileset.resolve()?;
        for entry in &mut entries {
            if !self.prefix.is_empty() {
                entry.relative = format!("{}/{}", self.prefix, entry.relative);
            }
            if let Some(mode) = self.mode {
                entry.mode = mode;
            }
            if let Some(owner) = &self.owner {
                entry.owner = Some(owner.clone());
            }
            if let Some(group) = &self.group {
                entry.group = Some(group.clone());
            }
        }
        Ok(entries)
    }
}

/// One input to a pipeline: a plain or an archive-decorated file-set.
#[derive(Debug, Clone)]
pub enum Selection {
    Files(FileSet),
    Archive(ArchiveFileSet),
}

impl Selection {
    pub fn resolve(&self) -> Result<Vec<FileEntry>> {
        match self {
            Selection::Files(fs) => fs.resolve(),
            Selection::Archive(afs) => afs.resolve(),
        }
    }
}

impl From<FileSet> for Selection {
    fn from(fs: FileSet) -> Self {
        Selection::Files(fs)
    }
}

impl From<ArchiveFileSet> for Selection {
    fn from(afs: ArchiveFileSet) -> Self {
        Selection::Archive(afs)
    }
}

fn walk_error(err: walkdir::Error) -> Error {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    if let Some(ancestor) = err.loop_ancestor() {
        let source = io::Error::new(
            io::ErrorKind::Other,
            format!("symlink loop back to '{}'", ancestor.display()),
        );
        return Error::Io { path, source };
    }
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "directory walk failed"));
    Error::Io { path, source }
}
