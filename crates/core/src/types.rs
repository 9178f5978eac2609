use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical 11-character video identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub(crate) fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What every provider receives: the URL as the user typed it and the
/// identifier derived from it.
#[derive(Debug, Clone)]
pub struct VideoTarget {
    pub url: String,
    pub id: VideoId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub channel: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
    pub like_count: u64,
}

impl Comment {
    pub fn new(text: impl Into<String>, like_count: u64) -> Self {
        Self {
            text: text.into(),
            like_count,
        }
    }

    /// Sources report likes as nullable and occasionally negative integers.
    pub(crate) fn from_raw(text: Option<String>, likes: Option<i64>) -> Self {
        Self {
            text: text.unwrap_or_default(),
            like_count: likes.unwrap_or(0).max(0) as u64,
        }
    }
}

/// Flattened spoken text, no timing retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub text: String,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageStats {
    pub prompt_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

impl UsageStats {
    pub fn is_empty(&self) -> bool {
        self.total_tokens == 0 && self.prompt_tokens == 0 && self.output_tokens == 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    Auto,
    English,
    French,
    Spanish,
    German,
    Japanese,
    Portuguese,
    Hindi,
    Arabic,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 9] = [
        TargetLanguage::Auto,
        TargetLanguage::English,
        TargetLanguage::French,
        TargetLanguage::Spanish,
        TargetLanguage::German,
        TargetLanguage::Japanese,
        TargetLanguage::Portuguese,
        TargetLanguage::Hindi,
        TargetLanguage::Arabic,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::Auto => "Auto",
            TargetLanguage::English => "English",
            TargetLanguage::French => "French",
            TargetLanguage::Spanish => "Spanish",
            TargetLanguage::German => "German",
            TargetLanguage::Japanese => "Japanese",
            TargetLanguage::Portuguese => "Portuguese",
            TargetLanguage::Hindi => "Hindi",
            TargetLanguage::Arabic => "Arabic",
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub text: String,
    pub usage: UsageStats,
}

/// Which evidence made it into the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coverage {
    Full,
    TranscriptOnly,
    CommentsOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    TranscriptUnavailable { reason: String },
    CommentsUnavailable { reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::TranscriptUnavailable { reason } => write!(
                f,
                "Could not fetch transcript, continuing with comments only: {reason}"
            ),
            Notice::CommentsUnavailable { reason } => write!(
                f,
                "Could not fetch comments, continuing with transcript only: {reason}"
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VibeReport {
    pub video_id: VideoId,
    pub url: String,
    pub metadata: VideoMetadata,
    pub metadata_source: String,
    pub transcript_source: Option<String>,
    pub comments_source: Option<String>,
    /// Ranked, formatted comment lines that were sent to the model.
    pub comments: Vec<String>,
    pub coverage: Coverage,
    pub notices: Vec<Notice>,
    pub target_language: TargetLanguage,
    pub model: String,
    pub analysis: AnalysisResult,
}
