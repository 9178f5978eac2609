use async_trait::async_trait;
use tracing::info;

use crate::{
    chain::{Fetched, Provider, ProviderChain, ProviderError},
    config::FetchConfig,
    error::Result,
    mirror::Mirror,
    types::{VideoMetadata, VideoTarget},
    ytdlp::YtDlp,
};

fn non_empty(metadata: VideoMetadata) -> std::result::Result<VideoMetadata, ProviderError> {
    if metadata == VideoMetadata::default() {
        Err(ProviderError::Empty)
    } else {
        Ok(metadata)
    }
}

pub struct NativeMetadata {
    extractor: YtDlp,
}

impl NativeMetadata {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            extractor: YtDlp::from_config(config),
        }
    }
}

#[async_trait]
impl Provider<VideoMetadata> for NativeMetadata {
    fn name(&self) -> &str {
        "native extractor"
    }

    async fn fetch(
        &self,
        target: &VideoTarget,
    ) -> std::result::Result<VideoMetadata, ProviderError> {
        let info = self.extractor.extract_info(&target.url).await?;
        non_empty(info.to_metadata())
    }
}

pub struct MirrorMetadata {
    mirror: Mirror,
    config: FetchConfig,
}

impl MirrorMetadata {
    pub fn new(mirror: Mirror, config: &FetchConfig) -> Self {
        Self {
            mirror,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl Provider<VideoMetadata> for MirrorMetadata {
    fn name(&self) -> &str {
        self.mirror.name()
    }

    async fn fetch(
        &self,
        target: &VideoTarget,
    ) -> std::result::Result<VideoMetadata, ProviderError> {
        let client = self.config.http_client()?;
        let video = self.mirror.video(&client, &target.id).await?;
        non_empty(video.into())
    }
}

pub struct MetadataFetcher {
    chain: ProviderChain<VideoMetadata>,
}

impl MetadataFetcher {
    pub fn new(chain: ProviderChain<VideoMetadata>) -> Self {
        Self { chain }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        let chain = config.mirrors.iter().fold(
            ProviderChain::new("metadata").with(NativeMetadata::new(config)),
            |chain, base| chain.with(MirrorMetadata::new(Mirror::new(base.as_str()), config)),
        );
        Self { chain }
    }

    pub fn chain(&self) -> &ProviderChain<VideoMetadata> {
        &self.chain
    }

    pub async fn fetch(&self, target: &VideoTarget) -> Result<Fetched<VideoMetadata>> {
        info!(url = %target.url, "Fetching metadata");
        self.chain.fetch(target).await
    }
}
