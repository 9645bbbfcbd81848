//! Single-pass pipelines over resolved file-set entries.
//!
//! Each pipeline owns its selection list for the duration of one invocation,
//! resolves it exactly once, performs one synchronous pass, and returns the
//! count of files affected. No pipeline prints; reporting is the host's job.

mod append;
mod copy;
mod delete;
mod rename;

pub use append::AppendPipeline;
pub use copy::Copier;
pub use delete::DeletePipeline;
pub use rename::RenamePipeline;
