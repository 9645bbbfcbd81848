//! Concatenate selected file contents onto a destination file.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::fileset::{ArchiveFileSet, FileSet, Selection};

/// Appends the bytes of every resolved entry, in input order, onto the end
/// of the destination file.
///
/// No separators are inserted between files; a caller wanting separators
/// includes separator content as its own selected file. The destination and
/// its parent directories are created if absent.
pub struct AppendPipeline {
    to: PathBuf,
    selections: Vec<Selection>,
}

impl AppendPipeline {
    pub fn new(to: impl Into<PathBuf>) -> Self {
        AppendPipeline {
            to: to.into(),
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

    /// Perform the append pass. Returns the count of files appended.
    pub fn append(self) -> Result<u64> {
        if let Some(parent) = self.to.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(Error::io(parent))?;
            }
        }
        let mut dest = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.to)
            .map_err(Error::io(&self.to))?;

        let mut appended = 0;
        for selection in &self.selections {
            for entry in selection.resolve()? {
                let mut file = File::open(&entry.origin).map_err(Error::io(&entry.origin))?;
                io::copy(&mut file, &mut dest).map_err(Error::io(&self.to))?;
                appended += 1;
            }
        }
        Ok(appended)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileset::PatternSet;
    use tempfile::TempDir;

    #[test]
    fn appends_in_order_with_no_separators() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("1-one.txt"), "one\n").unwrap();
        fs::write(src.join("2-two.txt"), "two\n").unwrap();

        let dest = tmp.path().join("out/combined.txt");
        let mut pipeline = AppendPipeline::new(&dest);
        pipeline.add_fileset(FileSet::required(&src, PatternSet::match_all()));
        assert_eq!(pipeline.append().unwrap(), 2);

        assert_eq!(fs::read_to_string(&dest).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn appends_onto_existing_content() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("extra.txt"), "extra").unwrap();

        let dest = tmp.path().join("log.txt");
        fs::write(&dest, "existing|").unwrap();

        let mut pipeline = AppendPipeline::new(&dest);
        pipeline.add_fileset(FileSet::required(&src, PatternSet::match_all()));
        pipeline.append().unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "existing|extra");
    }

    #[test]
    fn input_order_beats_path_order_across_filesets() {
        let tmp = TempDir::new().unwrap();
        let late = tmp.path().join("late");
        let early = tmp.path().join("early");
        fs::create_dir_all(&late).unwrap();
        fs::create_dir_all(&early).unwrap();
        fs::write(late.join("z.txt"), "Z").unwrap();
        fs::write(early.join("a.txt"), "A").unwrap();

        let dest = tmp.path().join("combined.txt");
        let mut pipeline = AppendPipeline::new(&dest);
        pipeline
            .add_fileset(FileSet::required(&late, PatternSet::match_all()))
            .add_fileset(FileSet::required(&early, PatternSet::match_all()));
        pipeline.append().unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "ZA");
    }
}
