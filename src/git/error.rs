//! Errors raised while turning a commit range into commit records.

use thiserror::Error;

/// Commit range extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The range resolved to zero commits.
    #[error("No commits found in range '{0}'")]
    EmptyRange(String),

    /// The range string could not be understood.
    #[error("Invalid commit range '{0}'. Expected REV or START..END")]
    InvalidRange(String),
}
