//! Tar container format: GNU headers, optional gzip, ownership flags.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::archive::{create_target, ArchiveFormat, EntrySink};
use crate::error::{Error, Result};
use crate::fileset::FileEntry;

/// Tar-specific build flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TarOptions {
    /// Gzip the finished tar stream.
    #[serde(default)]
    pub compress: bool,
    /// Write each entry's owner into its header.
    #[serde(default)]
    pub store_owner: bool,
    /// Write each entry's group into its header.
    #[serde(default)]
    pub store_group: bool,
}

/// The tar variant of [`ArchiveFormat`].
///
/// Uses GNU headers throughout so member names longer than the classic
/// fixed-length limit do not corrupt the archive.
#[derive(Debug, Clone, Default)]
pub struct TarFormat {
    options: TarOptions,
}

impl TarFormat {
    pub fn new(options: TarOptions) -> Self {
        TarFormat { options }
    }
}

impl ArchiveFormat for TarFormat {
    type Sink = TarSink;

    fn open(&self, target: &Path) -> Result<Self::Sink> {
        let file = create_target(target)?;
        let stream = if self.options.compress {
            TarStream::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            TarStream::Plain(file)
        };
        Ok(TarSink {
            builder: tar::Builder::new(stream),
            options: self.options.clone(),
            target: target.to_path_buf(),
            written: 0,
        })
    }
}

pub struct TarSink {
    builder: tar::Builder<TarStream>,
    options: TarOptions,
    target: PathBuf,
    written: u64,
}

impl EntrySink for TarSink {
    fn put_file(&mut self, entry: &FileEntry) -> Result<()> {
        // Size comes from the file opened here, not from resolution time, so
        // the header always matches the bytes streamed after it. A vanished
        // source surfaces as the I/O error from the open.
        let mut file = File::open(&entry.origin).map_err(Error::io(&entry.origin))?;
        let md = file.metadata().map_err(Error::io(&entry.origin))?;

        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(md.len());
        header.set_mtime(
            md.modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .map(|d| d.as_secs())
                .unwrap_or(0),
        );
        header.set_uid(0);
        header.set_gid(0);
        header.set_mode(entry.mode);
        if self.options.store_owner {
            if let Some(owner) = &entry.owner {
                header
                    .set_username(owner)
                    .map_err(Error::io(&self.target))?;
            }
        }
        if self.options.store_group {
            if let Some(group) = &entry.group {
                header
                    .set_groupname(group)
                    .map_err(Error::io(&self.target))?;
            }
        }
        header.set_cksum();

        self.builder
            .append_data(&mut header, Path::new(&entry.relative), &mut file)
            .map_err(Error::io(&self.target))?;
        self.written += 1;
        Ok(())
    }

    fn put_dir(&mut self, name: &str) -> Result<()> {
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Directory);
        header.set_size(0);
        header.set_mtime(0);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mode(0o755);
        header.set_cksum();
        self.builder
            .append_data(&mut header, format!("{name}/"), io::empty())
            .map_err(Error::io(&self.target))?;
        self.written += 1;
        Ok(())
    }

    fn close(self) -> Result<u64> {
        let stream = self
            .builder
            .into_inner()
            .map_err(Error::io(&self.target))?;
        stream.finish().map_err(Error::io(&self.target))?;
        Ok(self.written)
    }
}

/// The output stream under the tar builder, gzipped or not.
enum TarStream {
    Plain(File),
    Gzip(GzEncoder<File>),
}

impl TarStream {
    fn finish(self) -> io::Result<File> {
        match self {
            TarStream::Plain(file) => Ok(file),
            TarStream::Gzip(encoder) => encoder.finish(),
        }
    }
}

impl Write for TarStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TarStream::Plain(file) => file.write(buf),
            TarStream::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TarStream::Plain(file) => file.flush(),
            TarStream::Gzip(encoder) => encoder.flush(),
        }
    }
}
