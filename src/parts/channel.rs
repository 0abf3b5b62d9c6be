//! Transforms for the parts of a channel.

use serde::Deserialize;
use serde_json::Value;

use super::{escape, orange, p, Context, Snippet, Transformed};
use crate::Error;

pub(super) fn snippet(part: &Value, ctx: &Context) -> Result<Transformed, Error> {
    let s = Snippet::deserialize(part)?;
    let mut out = Transformed::default();

    if let Some(img) = s.thumbnail("mb-15 profile") {
        out.push(img);
    }
    out.push(s.heading());
    if let Some(on) = s.dated("Channel created on", ctx) {
        out.push(on);
    }

    match &s.country {
        Some(code) => out.push(p(format!(
            "The channel is associated with the country code {}.",
            orange(escape(code))
        ))),
        None => out.push(p("The channel has no associated country.")),
    }

    Ok(out)
}

// The Analytics and moderation flags live under `channel`; older
// responses carried them at the top level.
fn branding_flag<'a>(part: &'a Value, key: &str) -> Option<&'a Value> {
    part.get("channel")
        .and_then(|c| c.get(key))
        .or_else(|| part.get(key))
}

pub(super) fn branding_settings(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let mut out = Transformed::default();

    if branding_flag(part, "trackingAnalyticsAccountId").is_some() {
        out.push(p(
            "This channel tracks and measures its traffic with Google Analytics.",
        ));
    }
    if branding_flag(part, "moderateComments").and_then(Value::as_bool) == Some(true) {
        out.push(p(
            "Comments on the channel page require approval by the channel owner.",
        ));
    }

    Ok(out)
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default)]
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Deserialize, Debug, Default)]
struct RelatedPlaylists {
    uploads: Option<String>,
    favorites: Option<String>,
    likes: Option<String>,
}

pub(super) fn content_details(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let details = ContentDetails::deserialize(part)?;
    let mut out = Transformed::default();

    if let Some(related) = details.related_playlists {
        let lists = [
            ("Uploads", related.uploads),
            ("Favorites", related.favorites),
            ("Likes", related.likes),
        ];
        for (label, id) in lists.iter() {
            if let Some(id) = id {
                out.push(p(format!(
                    "<a href='https://www.youtube.com/playlist?list={}'>{} playlist</a>",
                    escape(id),
                    label
                )));
            }
        }
    }

    Ok(out)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Status {
    long_uploads_status: Option<String>,
    made_for_kids: Option<bool>,
    self_declared_made_for_kids: Option<bool>,
}

pub(super) fn status(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let status = Status::deserialize(part)?;
    let mut out = Transformed::default();
    let long = orange("longer than 15 minutes");

    match status.long_uploads_status.as_deref() {
        Some("allowed") => out.push(p(format!("This channel can upload videos {}.", long))),
        Some("disallowed") => out.push(p(format!(
            "This channel <strong>cannot</strong> upload videos {}.",
            long
        ))),
        Some("eligible") => out.push(p(format!(
            "This channel is eligible to upload videos {} but has not enabled it yet.",
            long
        ))),
        _ => out.push(p(
            "It is not specified whether this channel can upload videos longer than 15 minutes.",
        )),
    }

    match status.made_for_kids {
        Some(true) => out.push(p(format!("This channel is designated as {}.", orange("made for kids")))),
        Some(false) => out.push(p("This channel is not made for kids.")),
        None => {}
    }
    match status.self_declared_made_for_kids {
        Some(true) => out.push(p(format!(
            "The owner designated this channel as {}.",
            orange("made for kids")
        ))),
        Some(false) => out.push(p("The owner designated this channel as not made for kids.")),
        None => {}
    }

    Ok(out)
}
