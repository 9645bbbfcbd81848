//! Zip container format: deflate-compressed entries with unix modes.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use zip::write::FileOptions;
use zip::ZipWriter;

use crate::archive::{create_target, ArchiveFormat, EntrySink};
use crate::error::{Error, Result};
use crate::fileset::FileEntry;

/// The zip variant of [`ArchiveFormat`]. Always compressed; zip has no
/// portable owner/group, so only permission bits are stored.
#[derive(Debug, Clone, Default)]
pub struct ZipFormat;

impl ArchiveFormat for ZipFormat {
    type Sink = ZipSink;

    fn open(&self, target: &Path) -> Result<Self::Sink> {
        let file = create_target(target)?;
        Ok(ZipSink {
            writer: ZipWriter::new(file),
            target: target.to_path_buf(),
            written: 0,
        })
    }
}

pub struct ZipSink {
    writer: ZipWriter<File>,
    target: PathBuf,
    written: u64,
}

impl ZipSink {
    /// Write one member from an in-memory buffer. Used by the jar format for
    /// its manifest entry.
    pub(crate) fn put_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.writer
            .start_file(name, FileOptions::default().unix_permissions(0o644))
            .map_err(|e| zip_error(&self.target, e))?;
        self.writer
            .write_all(bytes)
            .map_err(Error::io(&self.target))?;
        self.written += 1;
        Ok(())
    }
}

impl EntrySink for ZipSink {
    fn put_file(&mut self, entry: &FileEntry) -> Result<()> {
        self.writer
            .start_file(
                entry.relative.as_str(),
                FileOptions::default().unix_permissions(entry.mode),
            )
            .map_err(|e| zip_error(&self.target, e))?;
        let mut file = File::open(&entry.origin).map_err(Error::io(&entry.origin))?;
        io::copy(&mut file, &mut self.writer).map_err(Error::io(&entry.origin))?;
        self.written += 1;
        Ok(())
    }

    fn put_dir(&mut self, name: &str) -> Result<()> {
        self.writer
            .add_directory(name, FileOptions::default().unix_permissions(0o755))
            .map_err(|e| zip_error(&self.target, e))?;
        self.written += 1;
        Ok(())
    }

    fn close(self) -> Result<u64> {
        let mut writer = self.writer;
        writer
            .finish()
            .map_err(|e| zip_error(&self.target, e))?;
        Ok(self.written)
    }
}

fn zip_error(target: &Path, err: zip::result::ZipError) -> Error {
    Error::Io {
        path: target.to_path_buf(),
        source: io::Error::new(io::ErrorKind::Other, err),
    }
}
