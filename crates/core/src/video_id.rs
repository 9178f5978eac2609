use std::sync::LazyLock;

use regex::Regex;

use crate::{
    error::{Result, VibeError},
    types::{VideoId, VideoTarget},
};

// 11 id characters after `v=` or a `/`, not followed by another id character.
static VIDEO_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)")
        .expect("video id pattern is valid")
});

/// Extract the video identifier from a watch, short-link, embed or shorts URL.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    VIDEO_ID_REGEX
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId::new_unchecked(m.as_str()))
}

pub fn video_target(url: &str) -> Result<VideoTarget> {
    let id = extract_video_id(url).ok_or_else(|| VibeError::IdentifierNotFound {
        url: url.to_string(),
    })?;
    Ok(VideoTarget {
        url: url.trim().to_string(),
        id,
    })
}

/// Canonical watch URL for an identifier.
pub fn watch_url(id: &VideoId) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}
