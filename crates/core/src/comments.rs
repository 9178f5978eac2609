//! Comment retrieval, ranking and formatting.

use async_trait::async_trait;
use tracing::info;

use crate::{
    chain::{Fetched, Provider, ProviderChain, ProviderError},
    config::FetchConfig,
    error::Result,
    mirror::Mirror,
    types::{Comment, VideoTarget},
    ytdlp::YtDlp,
};

pub const DEFAULT_COMMENT_LIMIT: usize = 1000;

pub struct NativeComments {
    extractor: YtDlp,
}

impl NativeComments {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            extractor: YtDlp::from_config(config).with_comments(),
        }
    }
}

#[async_trait]
impl Provider<Vec<Comment>> for NativeComments {
    fn name(&self) -> &str {
        "native extractor"
    }

    /// An empty list is a valid answer; a missing list is not.
    async fn fetch(&self, target: &VideoTarget) -> std::result::Result<Vec<Comment>, ProviderError> {
        let info = self.extractor.extract_info(&target.url).await?;
        info.to_comments()
            .ok_or_else(|| ProviderError::NotFound("extractor returned no comment list".into()))
    }
}

pub struct MirrorComments {
    mirror: Mirror,
    config: FetchConfig,
}

impl MirrorComments {
    pub fn new(mirror: Mirror, config: &FetchConfig) -> Self {
        Self {
            mirror,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Provider<Vec<Comment>> for MirrorComments {
    fn name(&self) -> &str {
        self.mirror.name()
    }

    async fn fetch(&self, target: &VideoTarget) -> std::result::Result<Vec<Comment>, ProviderError> {
        let client = self.config.http_client()?;
        let payload = self.mirror.comments(&client, &target.id).await?;
        Ok(payload.into())
    }
}

/// Order by like count (highest first, ties keep their original order),
/// keep the first `limit`, then drop the ones with empty text.
pub fn rank_comments(mut comments: Vec<Comment>, limit: usize) -> Vec<Comment> {
    comments.sort_by(|a, b| b.like_count.cmp(&a.like_count));
    comments.truncate(limit);
    comments.retain(|c| !c.text.is_empty());
    comments
}

/// One line per comment: `(Likes: N) text`.
pub fn format_comment(comment: &Comment) -> String {
    let text = comment
        .text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    format!("(Likes: {}) {}", comment.like_count, text)
}

pub struct CommentFetcher {
    chain: ProviderChain<Vec<Comment>>,
    limit: usize,
}

impl CommentFetcher {
    pub fn new(chain: ProviderChain<Vec<Comment>>, limit: usize) -> Self {
        Self { chain, limit }
    }

    pub fn from_config(config: &FetchConfig, limit: usize) -> Self {
        let chain = config.mirrors.iter().fold(
            ProviderChain::new("comments").with(NativeComments::new(config)),
            |chain, base| chain.with(MirrorComments::new(Mirror::new(base.as_str()), config)),
        );
        Self { chain, limit }
    }

    pub fn chain(&self) -> &ProviderChain<Vec<Comment>> {
        &self.chain
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Ranked, truncated, formatted comment lines.
    pub async fn fetch(&self, target: &VideoTarget) -> Result<Fetched<Vec<String>>> {
        info!(url = %target.url, limit = self.limit, "Fetching comments");
        let fetched = self.chain.fetch(target).await?;
        let total = fetched.value.len();
        let limit = self.limit;

        let fetched = fetched.map(|comments| {
            rank_comments(comments, limit)
                .iter()
                .map(format_comment)
                .collect::<Vec<_>>()
        });
        info!(total, kept = fetched.value.len(), "Ranked comments");
        Ok(fetched)
    }
}
