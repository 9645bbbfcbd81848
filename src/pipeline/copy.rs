//! Copy selected files into a destination tree, optionally filtering
//! content.

use std::fs::{self, File};
use std::path::PathBuf;

use filetime::FileTime;

use crate::error::{Error, Result};
use crate::fileset::{ArchiveFileSet, FileSet, Selection};
use crate::filter::{apply_all, TokenFilter};

/// Copies every resolved entry to `to_root / entry.relative`.
///
/// With no filters registered, files are copied as opaque bytes. With one or
/// more filters, content is decoded as UTF-8 text, every filter applied in
/// registration order, and the result re-encoded. Pre-existing destination
/// files are overwritten; permission bits and the source mtime are preserved
/// where the target filesystem supports it.
pub struct Copier {
    to: PathBuf,
    selections: Vec<Selection>,
    filters: Vec<TokenFilter>,
}

impl Copier {
    pub fn new(to: impl Into<PathBuf>) -> Self {
        Copier {
            to: to.into(),
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

    /// Perform the copy pass. Returns the count of files copied.
    pub fn copy(self) -> Result<u64> {
        let mut copied = 0;
        for selection in &self.selections {
            for entry in selection.resolve()? {
                let dest = self.to.join(&entry.relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent).map_err(Error::io(parent))?;
                }

                if self.filters.is_empty() {
                    fs::copy(&entry.origin, &dest).map_err(Error::io(&entry.origin))?;
                } else {
                    let text =
                        fs::read_to_string(&entry.origin).map_err(Error::io(&entry.origin))?;
                    fs::write(&dest, apply_all(&self.filters, &text))
                        .map_err(Error::io(&dest))?;
                }

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    fs::set_permissions(&dest, fs::Permissions::from_mode(entry.mode))
                        .map_err(Error::io(&dest))?;
                }

                let md = File::open(&entry.origin)
                    .and_then(|f| f.metadata())
                    .map_err(Error::io(&entry.origin))?;
                filetime::set_file_mtime(&dest, FileTime::from_last_modification_time(&md))
                    .map_err(Error::io(&dest))?;

                copied += 1;
            }
        }
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileset::PatternSet;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path, content: &[u8]) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn copies_tree_preserving_relative_layout() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("etc/app.conf"), b"port=8080\n");
        touch(&src.join("bin/app"), b"\x7fELF");

        let mut copier = Copier::new(&dst);
        copier.add_fileset(FileSet::required(&src, PatternSet::match_all()));
        assert_eq!(copier.copy().unwrap(), 2);

        assert_eq!(fs::read(dst.join("etc/app.conf")).unwrap(), b"port=8080\n");
        assert_eq!(fs::read(dst.join("bin/app")).unwrap(), b"\x7fELF");
    }

    #[test]
    fn filters_substitute_content_in_order() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("app.conf"), b"host=@HOST@ port=@PORT@\n");

        let mut copier = Copier::new(&dst);
        copier
            .add_fileset(FileSet::required(&src, PatternSet::match_all()))
            .add_filter(TokenFilter::new("@HOST@", "db.internal"))
            .add_filter(TokenFilter::new("@PORT@", "5432"));
        copier.copy().unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("app.conf")).unwrap(),
            "host=db.internal port=5432\n"
        );
    }

    #[test]
    fn unfiltered_copies_are_binary_safe() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        // Not valid UTF-8; must copy untouched when no filters exist.
        touch(&src.join("blob.bin"), &[0xff, 0xfe, 0x00, 0x01]);

        let mut copier = Copier::new(&dst);
        copier.add_fileset(FileSet::required(&src, PatternSet::match_all()));
        copier.copy().unwrap();

        assert_eq!(fs::read(dst.join("blob.bin")).unwrap(), vec![0xff, 0xfe, 0x00, 0x01]);
    }

    #[test]
    fn copy_twice_is_byte_identical_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("f.txt"), b"fresh");
        touch(&dst.join("f.txt"), b"stale-and-longer");

        for _ in 0..2 {
            let mut copier = Copier::new(&dst);
            copier.add_fileset(FileSet::required(&src, PatternSet::match_all()));
            assert_eq!(copier.copy().unwrap(), 1);
            assert_eq!(fs::read(dst.join("f.txt")).unwrap(), b"fresh");
        }
    }

    #[test]
    fn archive_fileset_prefix_lands_under_destination() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("lib.so"), b"x");

        let mut copier = Copier::new(&dst);
        copier.add_archive_fileset(
            ArchiveFileSet::new(FileSet::required(&src, PatternSet::match_all()))
                .with_prefix("usr/lib"),
        );
        copier.copy().unwrap();

        assert!(dst.join("usr/lib/lib.so").exists());
    }

    #[cfg(unix)]
    #[test]
    fn copy_preserves_mode_and_mtime() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        touch(&src.join("run.sh"), b"#!/bin/sh\n");
        fs::set_permissions(src.join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
        filetime::set_file_mtime(src.join("run.sh"), FileTime::from_unix_time(1_500_000_000, 0))
            .unwrap();

        let mut copier = Copier::new(&dst);
        copier.add_fileset(FileSet::required(&src, PatternSet::match_all()));
        copier.copy().unwrap();

        let md = fs::metadata(dst.join("run.sh")).unwrap();
        assert_eq!(md.permissions().mode() & 0o777, 0o755);
        assert_eq!(FileTime::from_last_modification_time(&md).unix_seconds(), 1_500_000_000);
    }
}
