use std::{path::PathBuf, time::Duration};

use tracing::{debug, warn};

use crate::chain::ProviderError;

/// Public Invidious instances, in the order they are tried.
pub const DEFAULT_MIRRORS: [&str; 5] = [
    "https://inv.tux.pizza",
    "https://invidious.jing.rocks",
    "https://vid.puffyan.us",
    "https://invidious.nerdvpn.de",
    "https://iv.ggtyler.dev",
];

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_EXTRACTOR_TIMEOUT: Duration = Duration::from_secs(60);
pub const CREDENTIALS_FILE_NAME: &str = "cookies.txt";

/// Everything the fetch layer needs to know about its environment.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Mirror base URLs without a trailing slash.
    pub mirrors: Vec<String>,
    /// Per-request timeout for mirror and caption-track HTTP calls, also
    /// passed to the native extractor as its socket timeout.
    pub timeout: Duration,
    /// Upper bound on one native extractor process.
    pub extractor_timeout: Duration,
    pub user_agent: String,
    /// Retry count handed to the native extractor. Nothing else retries.
    pub retries: u32,
    pub ytdlp_program: PathBuf,
    /// Explicit credentials (cookies) file. When unset the default
    /// locations are probed.
    pub credentials: Option<PathBuf>,
    pub caption_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            timeout: DEFAULT_TIMEOUT,
            extractor_timeout: DEFAULT_EXTRACTOR_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retries: 1,
            ytdlp_program: PathBuf::from("yt-dlp"),
            credentials: None,
            caption_language: "en".to_string(),
        }
    }
}

impl FetchConfig {
    pub fn with_mirrors<I, S>(mut self, mirrors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.mirrors = mirrors
            .into_iter()
            .map(|m| m.as_ref().trim().trim_end_matches('/').to_string())
            .filter(|m| !m.is_empty())
            .collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_credentials(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials = Some(path.into());
        self
    }

    pub fn with_ytdlp_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.ytdlp_program = program.into();
        self
    }

    /// Locate the credentials artifact: the explicit path if it exists,
    /// else `./cookies.txt`, else `<config dir>/vibecheck/cookies.txt`.
    pub fn resolve_credentials(&self) -> Option<PathBuf> {
        if let Some(explicit) = &self.credentials {
            if explicit.is_file() {
                return Some(explicit.clone());
            }
            warn!(path = %explicit.display(), "Credentials file not found, ignoring");
            return None;
        }

        let candidates = [
            Some(PathBuf::from(CREDENTIALS_FILE_NAME)),
            dirs::config_dir().map(|dir| dir.join("vibecheck").join(CREDENTIALS_FILE_NAME)),
        ];
        let found = candidates.into_iter().flatten().find(|p| p.is_file());
        if let Some(path) = &found {
            debug!(path = %path.display(), "Using credentials file");
        }
        found
    }

    /// A fresh client per call; nothing is shared between fetches.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, ProviderError> {
        reqwest::Client::builder()
            .user_agent(&self.user_agent)
            .timeout(self.timeout)
            .build()
            .map_err(|e| ProviderError::Network(format!("failed to build HTTP client: {e}")))
    }
}
