//! Registry of the YouTube Data API parts ytmeta requests.
//!
//! Every [Entity] has a fixed table of [Parts](Part). Each entry names the
//! part as the API knows it, a display title, and a transform that turns
//! the part's JSON into derived markup. The tables double as the list of
//! parts requested from the API, so their order is the request order and
//! the display order.
//!
//! Parts that cannot be read with an API key (`fileDetails`,
//! `processingDetails`, `suggestions`, `auditDetails`) and parts that
//! carry nothing worth showing (`id`, `player`) are left out.

use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::{query::Query, span, Error};

mod channel;
mod playlist;
mod video;

/// Signature every part transform shares.
pub type Transform = fn(&Value, &Context) -> Result<Transformed, Error>;

/// One requestable part of an entity.
#[derive(Clone, Copy)]
pub struct Part {
    /// Name of the part in requests and responses.
    pub name: &'static str,
    /// Panel title.
    pub title: &'static str,
    pub transform: Transform,
}

impl fmt::Debug for Part {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Part")
            .field("name", &self.name)
            .field("title", &self.title)
            .finish()
    }
}

/// Inputs to a transform beyond the part itself.
#[derive(Debug, Clone)]
pub struct Context {
    /// Instant that relative times are measured against.
    pub now: DateTime<Utc>,
    /// Google Maps Static API key. Without one, locations are only linked.
    pub maps_key: Option<String>,
}

impl Context {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            maps_key: None,
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Output of a transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    /// Markup appended below the raw JSON.
    pub html: String,
    /// Queries this part points at, e.g. the channel that owns a video.
    pub follow_ups: Vec<Query>,
}

impl Transformed {
    fn push(&mut self, html: impl AsRef<str>) {
        self.html.push_str(html.as_ref());
    }
}

/// Kinds of entity the API is queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Video,
    Channel,
    Playlist,
}

impl Entity {
    /// Page order of the sections.
    pub const ALL: [Entity; 3] = [Entity::Video, Entity::Channel, Entity::Playlist];

    /// Data API resource answering queries for this entity.
    pub fn endpoint(self) -> &'static str {
        match self {
            Entity::Video => "videos",
            Entity::Channel => "channels",
            Entity::Playlist => "playlists",
        }
    }

    pub fn section_id(self) -> &'static str {
        match self {
            Entity::Video => "video-section",
            Entity::Channel => "channel-section",
            Entity::Playlist => "playlist-section",
        }
    }

    pub fn parts(self) -> &'static [Part] {
        match self {
            Entity::Video => VIDEO,
            Entity::Channel => CHANNEL,
            Entity::Playlist => PLAYLIST,
        }
    }

    pub fn part(self, name: &str) -> Option<&'static Part> {
        self.parts().iter().find(|p| p.name == name)
    }

    /// Value of the `part` request parameter.
    pub fn part_list(self) -> String {
        self.parts()
            .iter()
            .map(|p| p.name)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Video => "video",
            Entity::Channel => "channel",
            Entity::Playlist => "playlist",
        })
    }
}

pub const VIDEO: &[Part] = &[
    Part {
        name: "snippet",
        title: "Snippet",
        transform: video::snippet,
    },
    Part {
        name: "statistics",
        title: "Statistics",
        transform: video::statistics,
    },
    Part {
        name: "recordingDetails",
        title: "Geolocation",
        transform: video::recording_details,
    },
    Part {
        name: "status",
        title: "Status",
        transform: video::status,
    },
    Part {
        name: "liveStreamingDetails",
        title: "Livestream Details",
        transform: video::live_streaming_details,
    },
    Part {
        name: "localizations",
        title: "Localizations",
        transform: raw_only,
    },
    Part {
        name: "contentDetails",
        title: "Content Details",
        transform: video::content_details,
    },
    Part {
        name: "topicDetails",
        title: "Topic Details",
        transform: topic_details,
    },
];

pub const CHANNEL: &[Part] = &[
    Part {
        name: "snippet",
        title: "Snippet",
        transform: channel::snippet,
    },
    Part {
        name: "brandingSettings",
        title: "Branding Settings",
        transform: channel::branding_settings,
    },
    Part {
        name: "contentDetails",
        title: "Content Details",
        transform: channel::content_details,
    },
    Part {
        name: "contentOwnerDetails",
        title: "Content Owner Details",
        transform: raw_only,
    },
    Part {
        name: "invideoPromotion",
        title: "In-Video Promotion",
        transform: raw_only,
    },
    Part {
        name: "localizations",
        title: "Localizations",
        transform: raw_only,
    },
    Part {
        name: "status",
        title: "Status",
        transform: channel::status,
    },
    Part {
        name: "topicDetails",
        title: "Topic Details",
        transform: topic_details,
    },
];

pub const PLAYLIST: &[Part] = &[
    Part {
        name: "snippet",
        title: "Snippet",
        transform: playlist::snippet,
    },
    Part {
        name: "status",
        title: "Status",
        transform: raw_only,
    },
    Part {
        name: "localizations",
        title: "Localizations",
        transform: raw_only,
    },
    Part {
        name: "contentDetails",
        title: "Content Details",
        transform: playlist::content_details,
    },
];

/// Escape text for interpolation into markup, attribute values included.
pub fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Standard paragraph. `inner` is markup and is not escaped.
fn p(inner: impl Display) -> String {
    format!("<p class='mb-15'>{}</p>", inner)
}

fn orange(text: impl Display) -> String {
    format!("<span class='orange'>{}</span>", text)
}

/// Fields of `snippet` shared by videos, channels and playlists.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    channel_id: Option<String>,
    channel_title: Option<String>,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    thumbnails: Thumbnails,
    tags: Option<Vec<String>>,
    country: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
}

#[derive(Deserialize, Debug)]
struct Thumbnail {
    url: String,
}

impl Snippet {
    fn thumbnail(&self, class: &str) -> Option<String> {
        self.thumbnails
            .medium
            .as_ref()
            .or_else(|| self.thumbnails.default.as_ref())
            .map(|t| format!("<img src='{}' class='{}'>", escape(&t.url), class))
    }

    fn heading(&self) -> String {
        format!(
            "<p class='mb-15' style='font-size: 1.25em'>{}</p>",
            escape(&self.title)
        )
    }

    fn publisher(&self, label: &str) -> Option<String> {
        let id = self.channel_id.as_ref()?;
        let title = self.channel_title.as_deref().unwrap_or(id);
        Some(p(format!(
            "<strong>{}</strong> <a href='https://www.youtube.com/channel/{}' target='_blank'>{}</a>",
            label,
            escape(id),
            escape(title)
        )))
    }

    fn dated(&self, label: &str, ctx: &Context) -> Option<String> {
        let at = self.published_at?;
        Some(p(format!(
            "<strong>{}</strong> {} ({})",
            label,
            orange(span::utc_string(at)),
            span::from_now(at, ctx.now)
        )))
    }

    fn owner_follow_up(&self) -> Option<Query> {
        self.channel_id
            .as_ref()
            .map(|id| Query::follow_up(crate::query::Kind::ChannelId, id.as_str()))
    }
}

fn raw_only(_: &Value, _: &Context) -> Result<Transformed, Error> {
    Ok(Transformed::default())
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct TopicDetails {
    #[serde(default)]
    topic_categories: Vec<String>,
}

/// Readable name of a topic category, e.g. `Role-playing video game` for
/// `https://en.wikipedia.org/wiki/Role-playing_video_game`.
pub fn topic_name(url: &str) -> String {
    let tail = match url.rfind('/') {
        Some(i) => &url[i + 1..],
        None => url,
    };
    tail.replace('_', " ")
}

fn topic_details(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let topics = TopicDetails::deserialize(part)?;

    let mut out = Transformed::default();
    for url in &topics.topic_categories {
        out.push(p(format!(
            "<a href='{}'>{}</a>",
            escape(url),
            escape(&topic_name(url))
        )));
    }
    Ok(out)
}
