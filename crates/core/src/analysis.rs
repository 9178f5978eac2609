use tracing::{error, info};

use crate::{
    llm::LanguageModel,
    prompt::build_prompt,
    types::{AnalysisResult, TargetLanguage, UsageStats, VideoMetadata},
};

/// Run the model over the assembled prompt. Never fails: a model error is
/// reported inside the returned text with zero usage.
pub async fn analyze(
    model: &dyn LanguageModel,
    transcript: Option<&str>,
    comments: &[String],
    metadata: &VideoMetadata,
    language: TargetLanguage,
) -> AnalysisResult {
    let prompt = build_prompt(metadata, transcript, comments, language);
    info!(
        model = model.model(),
        prompt_chars = prompt.chars().count(),
        comments = comments.len(),
        %language,
        "Generating analysis"
    );

    match model.complete(&prompt).await {
        Ok(completion) => AnalysisResult {
            text: completion.text,
            usage: completion.usage.unwrap_or_default(),
        },
        Err(e) => {
            error!(error = %e, "Analysis failed");
            AnalysisResult {
                text: format!("Error generating analysis: {e}"),
                usage: UsageStats::default(),
            }
        }
    }
}
