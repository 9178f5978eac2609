//! Audience "vibe check" for YouTube videos.
//!
//! Metadata, transcript and top comments are gathered through ordered
//! provider chains (the local `yt-dlp` extractor first, then public
//! Invidious mirrors), ranked and bounded into a prompt, and handed to a
//! language model that reports how the audience feels.

pub mod analysis;
pub mod chain;
pub mod comments;
pub mod config;
pub mod error;
pub mod format;
pub mod llm;
pub mod metadata;
pub mod mirror;
pub mod pipeline;
pub mod prompt;
pub mod transcript;
pub mod types;
pub mod video_id;
pub mod ytdlp;

pub use analysis::analyze;
pub use chain::{Fetched, Provider, ProviderAttempt, ProviderChain, ProviderError};
pub use comments::{CommentFetcher, DEFAULT_COMMENT_LIMIT, format_comment, rank_comments};
pub use config::FetchConfig;
pub use error::{Result, VibeError};
pub use format::{format_duration, format_report_readable, format_usage};
pub use llm::{ChatCompletionsModel, Completion, LanguageModel, LlmError, LlmProvider};
pub use metadata::MetadataFetcher;
pub use pipeline::{Progress, Stage, VibeCheck, coverage};
pub use prompt::build_prompt;
pub use transcript::TranscriptFetcher;
pub use types::{
    AnalysisResult, Comment, Coverage, Notice, TargetLanguage, Transcript, UsageStats,
    VibeReport, VideoId, VideoMetadata, VideoTarget,
};
pub use video_id::{extract_video_id, video_target};
