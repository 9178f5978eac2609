//! Invidious-compatible mirror endpoints.

use serde::Deserialize;
use tracing::debug;

use crate::{
    chain::ProviderError,
    types::{Comment, VideoId, VideoMetadata},
};

#[derive(Debug, Clone)]
pub struct Mirror {
    base: String,
    name: String,
}

impl Mirror {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        let name = format!("mirror {base}");
        Self { base, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn video_url(&self, id: &VideoId) -> String {
        format!("{}/api/v1/videos/{}", self.base, id)
    }

    pub fn captions_url(&self, id: &VideoId, lang: &str) -> String {
        format!("{}/api/v1/captions/{}?lang={}", self.base, id, lang)
    }

    pub fn comments_url(&self, id: &VideoId) -> String {
        format!("{}/api/v1/comments/{}", self.base, id)
    }

    async fn get_text(&self, client: &reqwest::Client, url: &str) -> Result<String, ProviderError> {
        debug!(mirror = %self.base, url, "Requesting mirror resource");

        let response = client.get(url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }

    pub async fn video(
        &self,
        client: &reqwest::Client,
        id: &VideoId,
    ) -> Result<MirrorVideo, ProviderError> {
        let body = self.get_text(client, &self.video_url(id)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Raw caption-track markup. HTML bodies are rejected: some instances
    /// answer with an error page and a 200.
    pub async fn captions(
        &self,
        client: &reqwest::Client,
        id: &VideoId,
        lang: &str,
    ) -> Result<String, ProviderError> {
        let body = self.get_text(client, &self.captions_url(id, lang)).await?;
        if looks_like_html(&body) {
            return Err(ProviderError::Malformed(
                "response looks like HTML, not captions".into(),
            ));
        }
        Ok(body)
    }

    pub async fn comments(
        &self,
        client: &reqwest::Client,
        id: &VideoId,
    ) -> Result<MirrorComments, ProviderError> {
        let body = self.get_text(client, &self.comments_url(id)).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

pub fn looks_like_html(body: &str) -> bool {
    let lower = body.to_ascii_lowercase();
    lower.contains("<html") || lower.contains("<!doctype")
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub video_thumbnails: Vec<MirrorThumbnail>,
    pub length_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorThumbnail {
    pub url: Option<String>,
}

impl From<MirrorVideo> for VideoMetadata {
    fn from(video: MirrorVideo) -> Self {
        VideoMetadata {
            title: video.title,
            description: video.description,
            channel: video.author,
            thumbnail_url: video.video_thumbnails.into_iter().next().and_then(|t| t.url),
            duration_seconds: video.length_seconds,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MirrorComments {
    #[serde(default)]
    pub comments: Vec<MirrorComment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MirrorComment {
    pub content: Option<String>,
    #[serde(alias = "likeCount")]
    pub likes: Option<i64>,
}

impl From<MirrorComments> for Vec<Comment> {
    fn from(payload: MirrorComments) -> Self {
        payload
            .comments
            .into_iter()
            .map(|c| Comment::from_raw(c.content, c.likes))
            .collect()
    }
}
