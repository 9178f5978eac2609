use crate::types::{TargetLanguage, VideoMetadata};

pub const DESCRIPTION_LIMIT: usize = 1000;
pub const TRANSCRIPT_LIMIT: usize = 50_000;
pub const NO_TRANSCRIPT: &str = "No transcript available.";
pub const NO_COMMENTS: &str = "No comments available.";

/// First `max` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

pub fn language_directive(language: TargetLanguage) -> String {
    match language {
        TargetLanguage::Auto => {
            "Write the whole report in the same language as the video and its comments.".to_string()
        }
        other => format!("Write the whole report in {}.", other.name()),
    }
}

/// Assemble the model input. Pure: the same inputs always give the same
/// prompt.
pub fn build_prompt(
    metadata: &VideoMetadata,
    transcript: Option<&str>,
    comments: &[String],
    language: TargetLanguage,
) -> String {
    let title = metadata.title.as_deref().unwrap_or("Unknown Title");
    let channel = metadata.channel.as_deref().unwrap_or("Unknown Channel");
    let description = truncate_chars(metadata.description.as_deref().unwrap_or(""), DESCRIPTION_LIMIT);

    let transcript = match transcript.map(str::trim) {
        Some(text) if !text.is_empty() => truncate_chars(text, TRANSCRIPT_LIMIT),
        _ => NO_TRANSCRIPT,
    };

    let comments_block = if comments.is_empty() {
        NO_COMMENTS.to_string()
    } else {
        comments
            .iter()
            .map(|c| format!("- {c}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are an expert social media analyst. Below is data about a YouTube video: its metadata, an excerpt of its transcript and its top comments ranked by like count.

**Video Title:** {title}
**Channel:** {channel}
**Description:**
{description}

**Transcript (excerpt):**
{transcript}

**Top Comments (with like counts):**
{comments_block}

Write the analysis as Markdown in exactly the following structure.
{language}

## Speaker Analysis
Identify the main speakers from the transcript and context. For each speaker, summarize how the audience feels about them.
Weight the evidence by like count: a comment with many likes represents the majority opinion and must count for significantly more than a comment with few likes.
If no comments address a speaker, infer the sentiment towards them from the video content and the overall reaction.

## Vibe Check
Summarize the overall sentiment of the audience. Is the reaction positive, negative, controversial, funny, educational? Describe the general vibe, again giving the most weight to the most liked comments."#,
        language = language_directive(language),
    )
}
