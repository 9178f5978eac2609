use thiserror::Error;

use crate::chain::{ProviderAttempt, format_attempts};

#[derive(Error, Debug)]
pub enum VibeError {
    #[error("Invalid video URL, no video identifier found in {url}")]
    IdentifierNotFound { url: String },

    #[error("All {resource} providers failed:\n{}", format_attempts(.attempts))]
    AllProvidersExhausted {
        resource: &'static str,
        attempts: Vec<ProviderAttempt>,
    },

    #[error(
        "Cannot proceed: both transcript and comments unavailable\ntranscript: {transcript}\ncomments: {comments}"
    )]
    NothingToAnalyze { transcript: String, comments: String },
}

pub type Result<T> = std::result::Result<T, VibeError>;
