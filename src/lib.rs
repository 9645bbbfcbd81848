//! Declarative file-set selection and archive assembly for build pipelines.
//!
//! This crate turns a build tool's output files into copied trees, renamed
//! trees, and packaged archives. It provides:
//!
//! - **File-set model** - pattern-filtered, deterministic selection of a
//!   directory subtree into portable, relocatable entries
//! - **Permission projection** - mode/owner/group read at traversal time,
//!   optionally overridden per archive file-set
//! - **Archive builders** - jar, tar, and zip containers driven by one
//!   generic builder over one format trait
//! - **Pipelines** - copy (with content token substitution), rename, append,
//!   and delete passes over the same selections
//!
//! The host build tool owns configuration parsing, orchestration, and
//! logging. This crate never prints: each operation returns a count of files
//! affected, and its errors are one of two kinds ([`ErrorKind::Config`] or
//! [`ErrorKind::Io`]) the host can branch on.
//!
//! # Example
//!
//! ```rust,ignore
//! use fileset_engine::{
//!     ArchiveBuilder, FileSet, JarFormat, JarIdentity, PatternSet,
//! };
//!
//! let classes = FileSet::required("build/classes", PatternSet::match_all());
//! let identity = JarIdentity {
//!     implementation_version: "1.4.2".into(),
//!     implementation_vendor: "Example Corp".into(),
//! };
//! let mut builder = ArchiveBuilder::new(JarFormat::new(identity), "dist/app.jar");
//! builder.add_fileset(classes);
//! let members = builder.build()?;
//! ```

pub mod archive;
pub mod config;
pub mod error;
pub mod fileset;
pub mod filter;
pub mod pipeline;

pub use archive::jar::JarFormat;
pub use archive::manifest::{JarIdentity, Manifest, ManifestSpec};
pub use archive::tar::{TarFormat, TarOptions};
pub use archive::zip::ZipFormat;
pub use archive::{ArchiveBuilder, ArchiveFormat, EntrySink};
pub use config::{ArchiveFileSetConfig, FileSetConfig};
pub use error::{Error, ErrorKind, Result};
pub use fileset::{ArchiveFileSet, FileEntry, FileSet, PatternSet, Selection};
pub use filter::TokenFilter;
pub use pipeline::{AppendPipeline, Copier, DeletePipeline, RenamePipeline};
