//! The native extractor: `yt-dlp` run as a subprocess that dumps the video
//! info dictionary as JSON.

use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::{
    chain::ProviderError,
    config::FetchConfig,
    types::{Comment, VideoMetadata},
};

#[derive(Debug, Clone)]
pub struct YtDlp {
    program: PathBuf,
    user_agent: String,
    socket_timeout: Duration,
    process_timeout: Duration,
    retries: u32,
    cookies: Option<PathBuf>,
    comments: bool,
}

impl YtDlp {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            program: config.ytdlp_program.clone(),
            user_agent: config.user_agent.clone(),
            socket_timeout: config.timeout,
            process_timeout: config.extractor_timeout,
            retries: config.retries,
            cookies: None,
            comments: false,
        }
    }

    pub fn with_cookies(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookies = Some(path.into());
        self
    }

    /// Also extract comments, for exactly the one video.
    pub fn with_comments(mut self) -> Self {
        self.comments = true;
        self
    }

    pub fn cookies(&self) -> Option<&Path> {
        self.cookies.as_deref()
    }

    fn args(&self, url: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--dump-single-json".into(),
            "--skip-download".into(),
            "--quiet".into(),
            "--no-warnings".into(),
            "--user-agent".into(),
            self.user_agent.clone().into(),
            "--socket-timeout".into(),
            self.socket_timeout.as_secs().max(1).to_string().into(),
            "--retries".into(),
            self.retries.to_string().into(),
            "--extractor-retries".into(),
            self.retries.to_string().into(),
        ];

        if let Some(cookies) = &self.cookies {
            args.push("--cookies".into());
            args.push(cookies.clone().into_os_string());
        }

        if self.comments {
            args.push("--write-comments".into());
            args.push("--playlist-items".into());
            args.push("0".into());
        }

        args.push("--".into());
        args.push(url.into());
        args
    }

    pub async fn extract_info(&self, url: &str) -> Result<VideoInfo, ProviderError> {
        debug!(
            program = %self.program.display(),
            url,
            cookies = self.cookies.is_some(),
            comments = self.comments,
            "Running native extractor"
        );

        let mut command = Command::new(&self.program);
        command.args(self.args(url)).kill_on_drop(true);

        let output = tokio::time::timeout(self.process_timeout, command.output())
            .await
            .map_err(|_| ProviderError::Timeout)??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no error output")
                .trim()
                .to_string();
            return Err(ProviderError::Extractor(format!("{} ({reason})", output.status)));
        }

        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

/// The subset of the extractor's info dictionary this crate reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub uploader: Option<String>,
    pub channel: Option<String>,
    pub thumbnail: Option<String>,
    pub duration: Option<f64>,
    pub subtitles: Option<BTreeMap<String, Vec<CaptionFormat>>>,
    pub automatic_captions: Option<BTreeMap<String, Vec<CaptionFormat>>>,
    /// `None` when the extractor produced no comment list at all, which is
    /// different from an empty one.
    pub comments: Option<Vec<InfoComment>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaptionFormat {
    pub ext: String,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InfoComment {
    pub text: Option<String>,
    pub like_count: Option<i64>,
}

impl VideoInfo {
    pub fn to_metadata(&self) -> VideoMetadata {
        VideoMetadata {
            title: self.title.clone(),
            description: self.description.clone(),
            channel: self.uploader.clone().or_else(|| self.channel.clone()),
            thumbnail_url: self.thumbnail.clone(),
            duration_seconds: self
                .duration
                .filter(|d| d.is_finite() && *d >= 0.0)
                .map(|d| d.round() as u64),
        }
    }

    pub fn to_comments(&self) -> Option<Vec<Comment>> {
        self.comments.as_ref().map(|comments| {
            comments
                .iter()
                .map(|c| Comment::from_raw(c.text.clone(), c.like_count))
                .collect()
        })
    }
}
