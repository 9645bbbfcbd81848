//! The canonical description of one selected file.

use std::fs::Metadata;
use std::path::PathBuf;

/// One file selected by a file-set traversal.
///
/// Immutable once produced: created by [`FileSet::resolve`], consumed exactly
/// once by whichever pipeline requested it, never mutated.
///
/// [`FileSet::resolve`]: crate::fileset::FileSet::resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the file on disk.
    pub origin: PathBuf,
    /// Path relative to the owning file-set root, always forward-slash
    /// separated so it is portable into archives and destination trees.
    pub relative: String,
    /// Size in bytes at traversal time.
    pub size: u64,
    /// POSIX-style permission bits (lower 12 bits significant).
    pub mode: u32,
    /// Owning user name, when resolvable on this platform.
    pub owner: Option<String>,
    /// Owning group name, when resolvable on this platform.
    pub group: Option<String>,
}

impl FileEntry {
    pub(crate) fn from_metadata(origin: PathBuf, relative: String, md: &Metadata) -> Self {
        let (mode, owner, group) = project_permissions(md);
        FileEntry {
            origin,
            relative,
            size: md.len(),
            mode,
            owner,
            group,
        }
    }
}

#[cfg(unix)]
fn project_permissions(md: &Metadata) -> (u32, Option<String>, Option<String>) {
    use std::os::unix::fs::MetadataExt;
    use std::os::unix::fs::PermissionsExt;

    let owner = uzers::get_user_by_uid(md.uid())
        .map(|u| u.name().to_string_lossy().into_owned());
    let group = uzers::get_group_by_gid(md.gid())
        .map(|g| g.name().to_string_lossy().into_owned());
    (md.permissions().mode() & 0o7777, owner, group)
}

#[cfg(not(unix))]
fn project_permissions(md: &Metadata) -> (u32, Option<String>, Option<String>) {
    let mode = if md.permissions().readonly() { 0o444 } else { 0o644 };
    (mode, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn entry_captures_size_and_mode() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.bin");
        fs::write(&path, b"12345").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        }

        let md = fs::metadata(&path).unwrap();
        let entry = FileEntry::from_metadata(path.clone(), "data.bin".to_string(), &md);

        assert_eq!(entry.origin, path);
        assert_eq!(entry.relative, "data.bin");
        assert_eq!(entry.size, 5);
        #[cfg(unix)]
        assert_eq!(entry.mode & 0o777, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn entry_resolves_owner_of_own_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("mine.txt");
        fs::write(&path, b"x").unwrap();

        let md = fs::metadata(&path).unwrap();
        let entry = FileEntry::from_metadata(path, "mine.txt".to_string(), &md);

        // We created the file, so the owner must resolve to the current user.
        let me = uzers::get_current_username().unwrap();
        assert_eq!(entry.owner.as_deref(), me.to_str());
    }
}
