//! The end-to-end vibe check: identify, fetch, decide, analyze.

use std::fmt;

use tracing::{info, warn};

use crate::{
    analysis::analyze,
    comments::CommentFetcher,
    config::FetchConfig,
    error::{Result, VibeError},
    llm::LanguageModel,
    metadata::MetadataFetcher,
    transcript::TranscriptFetcher,
    types::{Coverage, Notice, TargetLanguage, VibeReport},
    video_id::video_target,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Metadata,
    Transcript,
    Comments,
    Analysis,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Metadata => "metadata",
            Stage::Transcript => "transcript",
            Stage::Comments => "comments",
            Stage::Analysis => "analysis",
        })
    }
}

/// Emitted while [`VibeCheck::run_with_progress`] works through its stages.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Started(Stage),
    Finished { stage: Stage, summary: String },
    Degraded(Notice),
}

/// Which evidence goes to the model, or `None` when there is nothing to
/// analyze.
pub fn coverage(has_transcript: bool, has_comments: bool) -> Option<Coverage> {
    match (has_transcript, has_comments) {
        (true, true) => Some(Coverage::Full),
        (true, false) => Some(Coverage::TranscriptOnly),
        (false, true) => Some(Coverage::CommentsOnly),
        (false, false) => None,
    }
}

pub struct VibeCheck {
    metadata: MetadataFetcher,
    transcript: TranscriptFetcher,
    comments: CommentFetcher,
    model: Box<dyn LanguageModel>,
}

impl VibeCheck {
    pub fn new(
        metadata: MetadataFetcher,
        transcript: TranscriptFetcher,
        comments: CommentFetcher,
        model: Box<dyn LanguageModel>,
    ) -> Self {
        Self {
            metadata,
            transcript,
            comments,
            model,
        }
    }

    pub fn from_config(
        config: &FetchConfig,
        comment_limit: usize,
        model: Box<dyn LanguageModel>,
    ) -> Self {
        Self::new(
            MetadataFetcher::from_config(config),
            TranscriptFetcher::from_config(config),
            CommentFetcher::from_config(config, comment_limit),
            model,
        )
    }

    pub fn model(&self) -> &str {
        self.model.model()
    }

    pub async fn run(&self, url: &str, language: TargetLanguage) -> Result<VibeReport> {
        self.run_with_progress(url, language, |_| {}).await
    }

    /// Metadata failure is fatal. Transcript or comments may each fail
    /// alone, which degrades the analysis; if both fail the run stops
    /// before the model is called.
    pub async fn run_with_progress(
        &self,
        url: &str,
        language: TargetLanguage,
        mut on_progress: impl FnMut(Progress),
    ) -> Result<VibeReport> {
        let target = video_target(url)?;
        info!(video_id = %target.id, %language, "Starting vibe check");

        on_progress(Progress::Started(Stage::Metadata));
        let metadata = self.metadata.fetch(&target).await?;
        on_progress(Progress::Finished {
            stage: Stage::Metadata,
            summary: format!(
                "{} via {}",
                metadata.value.title.as_deref().unwrap_or("Unknown Title"),
                metadata.provider
            ),
        });

        let mut notices = Vec::new();

        on_progress(Progress::Started(Stage::Transcript));
        let (transcript, transcript_source, transcript_failure) =
            match self.transcript.fetch(&target).await {
                Ok(fetched) => {
                    on_progress(Progress::Finished {
                        stage: Stage::Transcript,
                        summary: format!(
                            "{} characters via {}",
                            fetched.value.text.chars().count(),
                            fetched.provider
                        ),
                    });
                    (Some(fetched.value), Some(fetched.provider), None)
                }
                Err(e) => {
                    warn!(error = %e, "Transcript unavailable");
                    (None, None, Some(e.to_string()))
                }
            };

        on_progress(Progress::Started(Stage::Comments));
        let (comments, comments_source, comments_failure) =
            match self.comments.fetch(&target).await {
                Ok(fetched) if fetched.value.is_empty() => {
                    warn!(provider = %fetched.provider, "Video has no comments");
                    (
                        Vec::new(),
                        Some(fetched.provider),
                        Some("the video has no comments".to_string()),
                    )
                }
                Ok(fetched) => {
                    on_progress(Progress::Finished {
                        stage: Stage::Comments,
                        summary: format!(
                            "{} comments via {}",
                            fetched.value.len(),
                            fetched.provider
                        ),
                    });
                    (fetched.value, Some(fetched.provider), None)
                }
                Err(e) => {
                    warn!(error = %e, "Comments unavailable");
                    (Vec::new(), None, Some(e.to_string()))
                }
            };

        let Some(coverage) = coverage(transcript.is_some(), !comments.is_empty()) else {
            return Err(VibeError::NothingToAnalyze {
                transcript: transcript_failure.unwrap_or_default(),
                comments: comments_failure.unwrap_or_default(),
            });
        };

        if let Some(reason) = transcript_failure {
            let notice = Notice::TranscriptUnavailable { reason };
            on_progress(Progress::Degraded(notice.clone()));
            notices.push(notice);
        }
        if let Some(reason) = comments_failure {
            let notice = Notice::CommentsUnavailable { reason };
            on_progress(Progress::Degraded(notice.clone()));
            notices.push(notice);
        }

        on_progress(Progress::Started(Stage::Analysis));
        let analysis = analyze(
            self.model.as_ref(),
            transcript.as_ref().map(|t| t.text.as_str()),
            &comments,
            &metadata.value,
            language,
        )
        .await;
        on_progress(Progress::Finished {
            stage: Stage::Analysis,
            summary: format!("{} tokens", analysis.usage.total_tokens),
        });

        info!(?coverage, notices = notices.len(), "Vibe check complete");

        Ok(VibeReport {
            video_id: target.id,
            url: target.url,
            metadata: metadata.value,
            metadata_source: metadata.provider,
            transcript_source,
            comments_source,
            comments,
            coverage,
            notices,
            target_language: language,
            model: self.model.model().to_string(),
            analysis,
        })
    }
}
