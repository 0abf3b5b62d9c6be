//! Query resolved by ytmeta.
//!
//! Handles classifying channel, video, playlist URLs and IDs into
//! ytmeta-managed queries, and the share links that carry a query between
//! runs.

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use lazy_static::lazy_static;
use regex::Regex;

use crate::{parts::Entity, Error};

lazy_static! {
    // Each pattern's first capture group is the identifier. Patterns are
    // tried in order and the first hit wins.
    static ref PATTERNS: Vec<(Kind, Regex)> = vec![
        (
            Kind::VideoId,
            Regex::new(r"(?i)https?://(?:(?:www|m)\.)?youtube\.com/watch\?v=([\w-]+)(?:&.*)?").unwrap(),
        ),
        (
            Kind::VideoId,
            Regex::new(r"(?i)https?://youtu\.be/([\w-]+)(?:\?.*)?").unwrap(),
        ),
        (
            Kind::PlaylistId,
            Regex::new(r"(?i)https?://(?:(?:www|m)\.)?youtube\.com/playlist\?list=([\w-]+)(?:&.*)?").unwrap(),
        ),
        (
            Kind::ChannelUser,
            Regex::new(r"(?i)https?://(?:(?:www|m)\.)?youtube\.com/user/([\w-]+)(?:\?.*)?").unwrap(),
        ),
        (
            Kind::ChannelId,
            Regex::new(r"(?i)https?://(?:(?:www|m)\.)?youtube\.com/channel/([\w-]+)(?:\?.*)?").unwrap(),
        ),
    ];

    // Bare identifiers, only consulted when no URL shape matched.
    static ref BARE: Vec<(Kind, Regex)> = vec![
        (Kind::ChannelId, Regex::new(r"^(UC[\w-]{22})$").unwrap()),
        (Kind::PlaylistId, Regex::new(r"^((?:PL|UU|LL|FL|OL|RD)[\w-]{12,})$").unwrap()),
        (Kind::VideoId, Regex::new(r"^([\w-]{11})$").unwrap()),
    ];
}

/// What an input string identifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    VideoId,
    PlaylistId,
    ChannelUser,
    ChannelId,
    Unknown,
}

impl Kind {
    /// The entity a query of this kind is answered by.
    pub fn entity(self) -> Option<Entity> {
        match self {
            Kind::VideoId => Some(Entity::Video),
            Kind::PlaylistId => Some(Entity::Playlist),
            Kind::ChannelUser | Kind::ChannelId => Some(Entity::Channel),
            Kind::Unknown => None,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::VideoId => "video_id",
            Kind::PlaylistId => "playlist_id",
            Kind::ChannelUser => "channel_user",
            Kind::ChannelId => "channel_id",
            Kind::Unknown => "unknown",
        })
    }
}

/// A classified input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    kind: Kind,
    value: Option<String>,
    may_hide_others: bool,
}

impl Query {
    /// A query derived from another entity's metadata, e.g. the channel
    /// that published a video. Derived queries never hide other sections.
    pub fn follow_up(kind: Kind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(value.into()),
            may_hide_others: false,
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether the input matched a known shape and can be looked up.
    pub fn is_recognized(&self) -> bool {
        self.kind != Kind::Unknown && self.value.is_some()
    }

    /// Whether answering this query should hide the sections of entities
    /// it is unrelated to.
    pub fn may_hide_others(&self) -> bool {
        self.may_hide_others
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "{} {}", self.kind, v),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Classify free text as a video, playlist, or channel.
pub fn classify(input: &str) -> Query {
    let input = input.trim();

    let hit = PATTERNS
        .iter()
        .chain(BARE.iter())
        .find_map(|(kind, re)| re.captures(input).map(|c| (*kind, c[1].to_string())));

    match hit {
        Some((kind, value)) => Query {
            kind,
            value: Some(value),
            may_hide_others: true,
        },
        None => Query {
            kind: Kind::Unknown,
            value: None,
            may_hide_others: true,
        },
    }
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(classify(s))
    }
}

/// Link that pre-fills `raw` and submits it immediately.
pub fn share_link(base: &str, raw: &str) -> Result<String, Error> {
    let qs = serde_urlencoded::to_string(&[("url", raw), ("submit", "true")])
        .map_err(|e| Error::Encoding(e.to_string()))?;
    Ok(format!("{}?{}", base, qs))
}

/// Parameters carried by a share link.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareParams {
    pub url: Option<String>,
    pub submit: bool,
}

impl ShareParams {
    /// Parse the query string of a share link, with or without its
    /// leading `?`. A full link is accepted too.
    pub fn parse(s: &str) -> Result<Self, Error> {
        let qs = if let Some(rest) = s.strip_prefix('?') {
            rest
        } else if s.starts_with("url=") || s.starts_with("submit=") {
            s
        } else {
            // A full link: its query starts at the first `?`.
            s.find('?').map(|i| &s[i + 1..]).unwrap_or("")
        };
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(qs).map_err(|e| Error::Encoding(e.to_string()))?;

        let mut params = Self::default();
        for (k, v) in pairs {
            match k.as_str() {
                "url" => params.url = Some(v),
                "submit" => params.submit = v.eq_ignore_ascii_case("true"),
                _ => {}
            }
        }
        Ok(params)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn kv(input: &str) -> (Kind, Option<String>) {
        let q = classify(input);
        (q.kind(), q.value().map(str::to_string))
    }

    #[test]
    fn video_urls() {
        assert_eq!(
            kv("https://www.youtube.com/watch?v=VfWgE7D1pYY"),
            (Kind::VideoId, Some("VfWgE7D1pYY".into()))
        );
        assert_eq!(
            kv("http://m.youtube.com/watch?v=VfWgE7D1pYY&t=42s"),
            (Kind::VideoId, Some("VfWgE7D1pYY".into()))
        );
        assert_eq!(
            kv("  https://youtu.be/dQw4w9WgXcQ?t=1  "),
            (Kind::VideoId, Some("dQw4w9WgXcQ".into()))
        );
        assert_eq!(
            kv("HTTPS://WWW.YOUTUBE.COM/watch?v=abc_DEF-123"),
            (Kind::VideoId, Some("abc_DEF-123".into()))
        );
    }

    #[test]
    fn playlist_and_channel_urls() {
        assert_eq!(
            kv("https://www.youtube.com/playlist?list=PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"),
            (Kind::PlaylistId, Some("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf".into()))
        );
        assert_eq!(
            kv("https://www.youtube.com/user/GoogleDevelopers"),
            (Kind::ChannelUser, Some("GoogleDevelopers".into()))
        );
        assert_eq!(
            kv("https://www.youtube.com/channel/UC_x5XG1OV2P6uZZ5FSM9Ttw?view_as=subscriber"),
            (Kind::ChannelId, Some("UC_x5XG1OV2P6uZZ5FSM9Ttw".into()))
        );
    }

    #[test]
    fn bare_identifiers() {
        assert_eq!(kv("dQw4w9WgXcQ"), (Kind::VideoId, Some("dQw4w9WgXcQ".into())));
        assert_eq!(
            kv("UC_x5XG1OV2P6uZZ5FSM9Ttw"),
            (Kind::ChannelId, Some("UC_x5XG1OV2P6uZZ5FSM9Ttw".into()))
        );
        assert_eq!(
            kv("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf"),
            (Kind::PlaylistId, Some("PLrAXtmErZgOeiKm4sgNOknGvNjby9efdf".into()))
        );
    }

    #[test]
    fn unknown_input() {
        for input in &["", "hello world", "https://vimeo.com/12345", "https://www.youtube.com/"] {
            let q = classify(input);
            assert_eq!(q.kind(), Kind::Unknown, "{:?}", input);
            assert_eq!(q.value(), None);
            assert!(q.may_hide_others());
            assert!(!q.is_recognized());
        }
    }

    #[test]
    fn follow_ups_do_not_hide() {
        let q = Query::follow_up(Kind::ChannelId, "UC_x5XG1OV2P6uZZ5FSM9Ttw");
        assert!(!q.may_hide_others());
        assert_eq!(q.kind().entity(), Some(Entity::Channel));
        assert!(q.is_recognized());
        assert!(classify("dQw4w9WgXcQ").may_hide_others());
    }

    #[test]
    fn share_links_round_trip() {
        let link =
            share_link("https://example.org/meta", "https://youtu.be/dQw4w9WgXcQ?t=1").unwrap();
        assert_eq!(
            link,
            "https://example.org/meta?url=https%3A%2F%2Fyoutu.be%2FdQw4w9WgXcQ%3Ft%3D1&submit=true"
        );

        let params = ShareParams::parse(&link).unwrap();
        assert_eq!(params.url.as_deref(), Some("https://youtu.be/dQw4w9WgXcQ?t=1"));
        assert!(params.submit);
    }

    #[test]
    fn bare_query_keeps_unencoded_url() {
        let params = ShareParams::parse("url=https://youtu.be/x?t=1&submit=true").unwrap();
        assert_eq!(params.url.as_deref(), Some("https://youtu.be/x?t=1"));
        assert!(params.submit);

        let params = ShareParams::parse("?url=https://youtu.be/x?t=1").unwrap();
        assert_eq!(params.url.as_deref(), Some("https://youtu.be/x?t=1"));
        assert!(!params.submit);

        assert_eq!(
            ShareParams::parse("https://example.org/meta").unwrap(),
            ShareParams::default()
        );
    }

    #[test]
    fn share_params_submit_flag() {
        assert!(ShareParams::parse("?url=x&submit=TRUE").unwrap().submit);
        assert!(!ShareParams::parse("url=x&submit=yes").unwrap().submit);
        assert_eq!(ShareParams::parse("").unwrap(), ShareParams::default());
    }
}
