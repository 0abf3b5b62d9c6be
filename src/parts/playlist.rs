//! Transforms for the parts of a playlist.

use serde::Deserialize;
use serde_json::Value;

use super::{p, Context, Snippet, Transformed};
use crate::Error;

pub(super) fn snippet(part: &Value, ctx: &Context) -> Result<Transformed, Error> {
    let s = Snippet::deserialize(part)?;
    let mut out = Transformed::default();

    if let Some(img) = s.thumbnail("mb-15") {
        out.push(img);
    }
    out.push(s.heading());
    if let Some(by) = s.publisher("Published by") {
        out.push(by);
    }
    if let Some(on) = s.dated("Playlist created on", ctx) {
        out.push(on);
    }

    out.follow_ups.extend(s.owner_follow_up());
    Ok(out)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default, deserialize_with = "crate::serde::number::from_str_option")]
    item_count: Option<u64>,
}

pub(super) fn content_details(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let details = ContentDetails::deserialize(part)?;
    let mut out = Transformed::default();

    if let Some(n) = details.item_count {
        out.push(p(format!(
            "This playlist has <span class='orange'>{}</span> item(s).",
            n
        )));
    }
    Ok(out)
}
