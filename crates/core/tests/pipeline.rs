mod mocks;

use mocks::{language_model::MockLanguageModel, provider::MockProvider};
use vibecheck_core::{
    Comment, CommentFetcher, Coverage, MetadataFetcher, Notice, ProviderChain, ProviderError,
    Progress, Stage, TargetLanguage, Transcript, TranscriptFetcher, UsageStats, VibeCheck,
    VibeError, VideoMetadata, prompt::NO_TRANSCRIPT,
};

const RICK: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn metadata() -> VideoMetadata {
    VideoMetadata {
        title: Some("Never Gonna Give You Up".into()),
        description: Some("The official video".into()),
        channel: Some("Rick Astley".into()),
        thumbnail_url: None,
        duration_seconds: Some(212),
    }
}

fn transcript() -> Transcript {
    Transcript {
        text: "Never gonna give you up never gonna let you down".into(),
        language: Some("en".into()),
    }
}

fn comments() -> Vec<Comment> {
    vec![
        Comment::new("rickrolled again", 120),
        Comment::new("all-time classic", 5000),
    ]
}

struct Harness {
    metadata: Vec<MockProvider<VideoMetadata>>,
    transcript: Vec<MockProvider<Transcript>>,
    comments: Vec<MockProvider<Vec<Comment>>>,
    model: MockLanguageModel,
}

impl Harness {
    fn healthy() -> Self {
        Self {
            metadata: vec![MockProvider::new("native extractor", metadata())],
            transcript: vec![MockProvider::new("native captions", transcript())],
            comments: vec![MockProvider::new("native extractor", comments())],
            model: MockLanguageModel::new("## Speaker Analysis\nLoved.\n\n## Vibe Check\nJoyful."),
        }
    }

    fn build(&self) -> VibeCheck {
        let metadata = self
            .metadata
            .iter()
            .cloned()
            .fold(ProviderChain::new("metadata"), |c, p| c.with(p));
        let transcript = self
            .transcript
            .iter()
            .cloned()
            .fold(ProviderChain::new("transcript"), |c, p| c.with(p));
        let comments = self
            .comments
            .iter()
            .cloned()
            .fold(ProviderChain::new("comments"), |c, p| c.with(p));

        VibeCheck::new(
            MetadataFetcher::new(metadata),
            TranscriptFetcher::new(transcript),
            CommentFetcher::new(comments, 1000),
            Box::new(self.model.clone()),
        )
    }

    fn prompts(&self) -> Vec<String> {
        self.model.prompts.lock().unwrap().clone()
    }
}

// ─── Happy path ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_full_coverage_after_primary_timeout() {
    let mut harness = Harness::healthy();
    harness.metadata = vec![
        MockProvider::failing("native extractor", || ProviderError::Timeout),
        MockProvider::new("mirror https://inv.tux.pizza", metadata()),
    ];

    let report = harness.build().run(RICK, TargetLanguage::Auto).await.unwrap();

    assert_eq!(report.video_id.as_str(), "dQw4w9WgXcQ");
    assert_eq!(report.metadata.title.as_deref(), Some("Never Gonna Give You Up"));
    assert_eq!(report.metadata_source, "mirror https://inv.tux.pizza");
    assert_eq!(report.transcript_source.as_deref(), Some("native captions"));
    assert_eq!(report.coverage, Coverage::Full);
    assert!(report.notices.is_empty());
    assert_eq!(report.model, "mock-llm");
    assert!(report.analysis.text.contains("## Vibe Check"));
    assert_eq!(report.analysis.usage.total_tokens, 1500);

    assert_eq!(
        report.comments,
        vec!["(Likes: 5000) all-time classic", "(Likes: 120) rickrolled again"]
    );

    let prompts = harness.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("**Video Title:** Never Gonna Give You Up"));
    assert!(prompts[0].contains("never gonna let you down"));
    assert!(prompts[0].contains("- (Likes: 5000) all-time classic\n- (Likes: 120) rickrolled again"));
}

#[tokio::test]
async fn test_explicit_language_reaches_prompt() {
    let harness = Harness::healthy();
    let report = harness
        .build()
        .run(RICK, TargetLanguage::Spanish)
        .await
        .unwrap();

    assert_eq!(report.target_language, TargetLanguage::Spanish);
    assert!(harness.prompts()[0].contains("Write the whole report in Spanish."));
}

#[tokio::test]
async fn test_progress_events_follow_stage_order() {
    let harness = Harness::healthy();
    let mut started = Vec::new();
    harness
        .build()
        .run_with_progress(RICK, TargetLanguage::Auto, |event| {
            if let Progress::Started(stage) = event {
                started.push(stage);
            }
        })
        .await
        .unwrap();

    assert_eq!(
        started,
        vec![
            Stage::Metadata,
            Stage::Transcript,
            Stage::Comments,
            Stage::Analysis
        ]
    );
}

// ─── Degraded modes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_transcript_failure_degrades_to_comments_only() {
    let mut harness = Harness::healthy();
    harness.transcript = vec![
        MockProvider::failing("native captions", || {
            ProviderError::NotFound("no caption tracks available".into())
        }),
        MockProvider::failing("mirror https://inv.tux.pizza", || {
            ProviderError::Malformed("response looks like HTML, not captions".into())
        }),
    ];

    let report = harness.build().run(RICK, TargetLanguage::Auto).await.unwrap();

    assert_eq!(report.coverage, Coverage::CommentsOnly);
    assert_eq!(report.transcript_source, None);
    assert_eq!(report.notices.len(), 1);
    let Notice::TranscriptUnavailable { reason } = &report.notices[0] else {
        panic!("unexpected notice: {:?}", report.notices[0]);
    };
    assert!(reason.contains("All transcript providers failed"));
    assert!(reason.contains("[native captions] not found: no caption tracks available"));
    assert!(reason.contains("looks like HTML"));

    assert!(harness.prompts()[0].contains(NO_TRANSCRIPT));
}

#[tokio::test]
async fn test_comment_failure_degrades_to_transcript_only() {
    let mut harness = Harness::healthy();
    harness.comments = vec![MockProvider::failing("native extractor", || {
        ProviderError::Extractor("exit status: 1 (comments are disabled)".into())
    })];

    let report = harness.build().run(RICK, TargetLanguage::Auto).await.unwrap();

    assert_eq!(report.coverage, Coverage::TranscriptOnly);
    assert!(report.comments.is_empty());
    assert!(matches!(
        report.notices.as_slice(),
        [Notice::CommentsUnavailable { .. }]
    ));
    assert!(harness.prompts()[0].contains("No comments available."));
}

#[tokio::test]
async fn test_empty_comment_list_counts_as_absent() {
    let mut harness = Harness::healthy();
    harness.comments = vec![MockProvider::new("native extractor", Vec::new())];

    let report = harness.build().run(RICK, TargetLanguage::Auto).await.unwrap();

    assert_eq!(report.coverage, Coverage::TranscriptOnly);
    assert_eq!(report.comments_source.as_deref(), Some("native extractor"));
    assert!(matches!(
        report.notices.as_slice(),
        [Notice::CommentsUnavailable { .. }]
    ));
}

// ─── Fatal conditions ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_nothing_to_analyze_skips_the_model() {
    let mut harness = Harness::healthy();
    harness.transcript = vec![MockProvider::failing("native captions", || {
        ProviderError::Timeout
    })];
    harness.comments = vec![MockProvider::failing("native extractor", || {
        ProviderError::Status { status: 429 }
    })];

    let err = harness
        .build()
        .run(RICK, TargetLanguage::Auto)
        .await
        .unwrap_err();

    let VibeError::NothingToAnalyze {
        transcript,
        comments,
    } = &err
    else {
        panic!("unexpected error: {err}");
    };
    assert!(transcript.contains("[native captions] timed out"));
    assert!(comments.contains("unexpected HTTP status 429"));
    assert!(err.to_string().starts_with("Cannot proceed"));
    assert!(harness.prompts().is_empty());
}

#[tokio::test]
async fn test_metadata_failure_stops_before_other_fetches() {
    let mut harness = Harness::healthy();
    harness.metadata = vec![
        MockProvider::failing("native extractor", || ProviderError::Timeout),
        MockProvider::failing("mirror https://inv.tux.pizza", || {
            ProviderError::Status { status: 502 }
        }),
    ];

    let err = harness
        .build()
        .run(RICK, TargetLanguage::Auto)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VibeError::AllProvidersExhausted {
            resource: "metadata",
            ..
        }
    ));
    assert_eq!(harness.transcript[0].call_count(), 0);
    assert_eq!(harness.comments[0].call_count(), 0);
    assert!(harness.prompts().is_empty());
}

#[tokio::test]
async fn test_invalid_url_calls_no_provider() {
    let harness = Harness::healthy();
    let err = harness
        .build()
        .run("https://example.com/nope", TargetLanguage::Auto)
        .await
        .unwrap_err();

    assert!(matches!(err, VibeError::IdentifierNotFound { .. }));
    assert_eq!(harness.metadata[0].call_count(), 0);
}

// ─── Model failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_model_failure_is_reported_in_text() {
    let mut harness = Harness::healthy();
    harness.model = MockLanguageModel::failing("quota exceeded");

    let report = harness.build().run(RICK, TargetLanguage::Auto).await.unwrap();

    assert!(
        report
            .analysis
            .text
            .starts_with("Error generating analysis:")
    );
    assert!(report.analysis.text.contains("quota exceeded"));
    assert_eq!(report.analysis.usage, UsageStats::default());
}

#[tokio::test]
async fn test_missing_usage_defaults_to_zero() {
    let mut harness = Harness::healthy();
    harness.model = MockLanguageModel::without_usage("## Vibe Check\nFine.");

    let report = harness.build().run(RICK, TargetLanguage::Auto).await.unwrap();

    assert_eq!(report.analysis.text, "## Vibe Check\nFine.");
    assert!(report.analysis.usage.is_empty());
}
