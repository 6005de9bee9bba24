//! Git history extraction.

pub mod commit;
pub mod error;
pub mod repository;

pub use commit::{Author, CommitInfo, FileChange, FileStatus};
pub use error::ExtractionError;
pub use repository::{ExtractOptions, GitRepository};

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
