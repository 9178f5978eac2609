//! Transcript retrieval.
//!
//! Attempts, in order: the native extractor without credentials, the native
//! extractor with the credentials file (only when one exists), then the
//! captions resource of every mirror.

pub mod tracks;
pub mod webvtt;

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    chain::{Fetched, Provider, ProviderChain, ProviderError},
    config::FetchConfig,
    error::Result,
    mirror::Mirror,
    types::{Transcript, VideoTarget},
    video_id::watch_url,
    ytdlp::YtDlp,
};

pub use tracks::{CaptionTrack, TrackChoice, TrackKind, caption_tracks, select_track};
pub use webvtt::parse_webvtt;

pub struct NativeCaptions {
    name: String,
    extractor: YtDlp,
    config: FetchConfig,
}

impl NativeCaptions {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            name: "native captions".to_string(),
            extractor: YtDlp::from_config(config),
            config: config.clone(),
        }
    }

    pub fn with_credentials(config: &FetchConfig, credentials: impl Into<PathBuf>) -> Self {
        Self {
            name: "native captions (credentials)".to_string(),
            extractor: YtDlp::from_config(config).with_cookies(credentials),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Provider<Transcript> for NativeCaptions {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, target: &VideoTarget) -> std::result::Result<Transcript, ProviderError> {
        let info = self.extractor.extract_info(&watch_url(&target.id)).await?;
        let tracks = caption_tracks(&info);

        let (choice, track) = select_track(&tracks, &self.config.caption_language)
            .ok_or_else(|| ProviderError::NotFound("no caption tracks available".into()))?;
        debug!(
            ?choice,
            language = %track.language,
            kind = ?track.kind,
            credentials = self.extractor.cookies().is_some(),
            "Selected caption track"
        );

        let client = self.config.http_client()?;
        let text = tracks::fetch_track_text(&client, track).await?;
        if text.trim().is_empty() {
            return Err(ProviderError::Empty);
        }

        Ok(Transcript {
            text,
            language: Some(track.language.clone()),
        })
    }
}

pub struct MirrorCaptions {
    mirror: Mirror,
    config: FetchConfig,
}

impl MirrorCaptions {
    pub fn new(mirror: Mirror, config: &FetchConfig) -> Self {
        Self {
            mirror,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Provider<Transcript> for MirrorCaptions {
    fn name(&self) -> &str {
        self.mirror.name()
    }

    async fn fetch(&self, target: &VideoTarget) -> std::result::Result<Transcript, ProviderError> {
        let client = self.config.http_client()?;
        let markup = self
            .mirror
            .captions(&client, &target.id, &self.config.caption_language)
            .await?;

        let text = parse_webvtt(&markup);
        if text.trim().is_empty() {
            return Err(ProviderError::Empty);
        }

        Ok(Transcript {
            text,
            language: Some(self.config.caption_language.clone()),
        })
    }
}

pub struct TranscriptFetcher {
    chain: ProviderChain<Transcript>,
}

impl TranscriptFetcher {
    pub fn new(chain: ProviderChain<Transcript>) -> Self {
        Self { chain }
    }

    /// Builds the full attempt sequence. The credentials file is looked up
    /// once, here.
    pub fn from_config(config: &FetchConfig) -> Self {
        let mut chain = ProviderChain::new("transcript").with(NativeCaptions::new(config));

        if let Some(credentials) = config.resolve_credentials() {
            chain = chain.with(NativeCaptions::with_credentials(config, credentials));
        }

        for base in &config.mirrors {
            chain = chain.with(MirrorCaptions::new(Mirror::new(base.as_str()), config));
        }

        Self { chain }
    }

    pub fn chain(&self) -> &ProviderChain<Transcript> {
        &self.chain
    }

    pub async fn fetch(&self, target: &VideoTarget) -> Result<Fetched<Transcript>> {
        info!(video_id = %target.id, "Fetching transcript");
        self.chain.fetch(target).await
    }
}
