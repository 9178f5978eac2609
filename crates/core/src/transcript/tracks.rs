use serde::Deserialize;

use crate::{
    chain::ProviderError,
    transcript::webvtt::{decode_entities, parse_webvtt},
    ytdlp::{CaptionFormat, VideoInfo},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Manual,
    AutoGenerated,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language: String,
    pub kind: TrackKind,
    pub formats: Vec<CaptionFormat>,
}

/// Which branch of the selection table picked the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackChoice {
    PreferredManual,
    PreferredAuto,
    AnyAvailable,
}

impl CaptionTrack {
    fn matches_language(&self, preferred: &str) -> bool {
        self.language == preferred
            || self
                .language
                .strip_prefix(preferred)
                .is_some_and(|rest| rest.starts_with('-'))
    }

    /// `json3` carries the cue list directly; `vtt` is the fallback.
    pub fn best_format(&self) -> Option<&CaptionFormat> {
        self.formats
            .iter()
            .find(|f| f.ext == "json3")
            .or_else(|| self.formats.iter().find(|f| f.ext == "vtt"))
    }
}

/// Decision table, first match wins:
///
/// | branch            | kind           | language      |
/// |-------------------|----------------|---------------|
/// | `PreferredManual` | manual         | preferred     |
/// | `PreferredAuto`   | auto-generated | preferred     |
/// | `AnyAvailable`    | any            | any (first)   |
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    preferred: &str,
) -> Option<(TrackChoice, &'a CaptionTrack)> {
    let preferred_of = |kind: TrackKind| {
        tracks
            .iter()
            .find(|t| t.kind == kind && t.matches_language(preferred))
    };

    if let Some(track) = preferred_of(TrackKind::Manual) {
        return Some((TrackChoice::PreferredManual, track));
    }
    if let Some(track) = preferred_of(TrackKind::AutoGenerated) {
        return Some((TrackChoice::PreferredAuto, track));
    }
    tracks.first().map(|track| (TrackChoice::AnyAvailable, track))
}

/// Manual tracks first, then auto-generated ones. Among auto-generated
/// tracks the original-language (`-orig`) track comes before the machine
/// translations.
pub fn caption_tracks(info: &VideoInfo) -> Vec<CaptionTrack> {
    let collect = |map: &Option<std::collections::BTreeMap<String, Vec<CaptionFormat>>>,
                   kind: TrackKind| {
        map.iter()
            .flatten()
            .filter(|(_, formats)| !formats.is_empty())
            .map(|(language, formats)| CaptionTrack {
                language: language.clone(),
                kind,
                formats: formats.clone(),
            })
            .collect::<Vec<_>>()
    };

    let mut tracks = collect(&info.subtitles, TrackKind::Manual);
    let mut auto = collect(&info.automatic_captions, TrackKind::AutoGenerated);
    auto.sort_by_key(|t| !t.language.ends_with("-orig"));
    tracks.extend(auto);
    tracks
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// Cue texts of a `json3` caption document, in time order.
pub fn json3_cues(body: &str) -> Result<Vec<String>, ProviderError> {
    let doc: Json3 = serde_json::from_str(body)?;
    Ok(doc
        .events
        .iter()
        .map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            decode_entities(&text.split_whitespace().collect::<Vec<_>>().join(" "))
        })
        .filter(|cue| !cue.is_empty())
        .collect())
}

/// Download a track and flatten it to text.
pub async fn fetch_track_text(
    client: &reqwest::Client,
    track: &CaptionTrack,
) -> Result<String, ProviderError> {
    let format = track.best_format().ok_or_else(|| {
        ProviderError::NotFound(format!(
            "no json3 or vtt format for caption track '{}'",
            track.language
        ))
    })?;

    let response = client.get(&format.url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Status {
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;

    let text = match format.ext.as_str() {
        "json3" => json3_cues(&body)?.join(" "),
        _ => parse_webvtt(&body),
    };
    Ok(text)
}
