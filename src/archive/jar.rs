//! Jar container format: a zip container with a manifest entry written
//! first.

use std::path::Path;

use crate::archive::manifest::{build_manifest, JarIdentity, ManifestSpec};
use crate::archive::zip::{ZipFormat, ZipSink};
use crate::archive::ArchiveFormat;
use crate::error::Result;

pub const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";

/// The jar variant of [`ArchiveFormat`].
///
/// A jar without *some* manifest is never produced: with no
/// [`ManifestSpec`] at all, a minimal manifest carrying the identity
/// attributes is synthesized.
#[derive(Debug, Clone)]
pub struct JarFormat {
    identity: JarIdentity,
    manifest: Option<ManifestSpec>,
}

impl JarFormat {
    pub fn new(identity: JarIdentity) -> Self {
        JarFormat {
            identity,
            manifest: None,
        }
    }

    /// Supply caller manifest attributes, from a file or a flat map.
    pub fn with_manifest(mut self, spec: ManifestSpec) -> Self {
        self.manifest = Some(spec);
        self
    }
}

impl ArchiveFormat for JarFormat {
    type Sink = ZipSink;

    fn open(&self, target: &Path) -> Result<Self::Sink> {
        // Merge before touching the target so manifest configuration errors
        // abort with no bytes written.
        let manifest = build_manifest(self.manifest.as_ref(), &self.identity)?;
        let mut sink = ZipFormat.open(target)?;
        sink.put_bytes(MANIFEST_NAME, manifest.render().as_bytes())?;
        Ok(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveBuilder;
    use crate::fileset::{FileSet, PatternSet};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::Read;
    use tempfile::TempDir;

    fn identity() -> JarIdentity {
        JarIdentity {
            implementation_version: "3.1".to_string(),
            implementation_vendor: "Example Corp".to_string(),
        }
    }

    fn manifest_text(target: &Path) -> String {
        let mut archive = zip::ZipArchive::new(File::open(target).unwrap()).unwrap();
        let mut text = String::new();
        archive
            .by_name(MANIFEST_NAME)
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn jar_without_manifest_directive_synthesizes_one() {
        let tmp = TempDir::new().unwrap();
        let classes = tmp.path().join("classes");
        fs::create_dir_all(classes.join("a")).unwrap();
        fs::write(classes.join("a/B.class"), b"\xca\xfe\xba\xbe").unwrap();

        let target = tmp.path().join("out/app.jar");
        let mut builder = ArchiveBuilder::new(JarFormat::new(identity()), &target);
        builder.add_fileset(FileSet::required(&classes, PatternSet::match_all()));
        // Manifest counts as a written member.
        assert_eq!(builder.build().unwrap(), 2);

        let mut archive = zip::ZipArchive::new(File::open(&target).unwrap()).unwrap();
        assert!(archive.by_name("a/B.class").is_ok());

        let text = manifest_text(&target);
        assert!(text.contains("Implementation-Version: 3.1\n"));
        assert!(text.contains("Implementation-Vendor: Example Corp\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn manifest_entry_is_the_first_member() {
        let tmp = TempDir::new().unwrap();
        let classes = tmp.path().join("classes");
        fs::create_dir_all(&classes).unwrap();
        fs::write(classes.join("X.class"), b"x").unwrap();

        let target = tmp.path().join("app.jar");
        let mut builder = ArchiveBuilder::new(JarFormat::new(identity()), &target);
        builder.add_fileset(FileSet::required(&classes, PatternSet::match_all()));
        builder.build().unwrap();

        let mut archive = zip::ZipArchive::new(File::open(&target).unwrap()).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), MANIFEST_NAME);
    }

    #[test]
    fn caller_attributes_merge_under_identity() {
        let tmp = TempDir::new().unwrap();
        let classes = tmp.path().join("classes");
        fs::create_dir_all(&classes).unwrap();

        let mut attrs = BTreeMap::new();
        attrs.insert("Main-Class".to_string(), "com.example.Main".to_string());
        attrs.insert("Implementation-Vendor".to_string(), "Impostor".to_string());

        let target = tmp.path().join("app.jar");
        let format = JarFormat::new(identity()).with_manifest(ManifestSpec::Attributes(attrs));
        let mut builder = ArchiveBuilder::new(format, &target);
        builder.add_fileset(FileSet::optional(&classes, PatternSet::match_all()));
        builder.build().unwrap();

        let text = manifest_text(&target);
        assert!(text.starts_with("Manifest-Version: 1.0\n"));
        assert!(text.contains("Main-Class: com.example.Main\n"));
        assert!(text.contains("Implementation-Vendor: Example Corp\n"));
        assert!(!text.contains("Impostor"));
    }
}
