//! Transforms for the parts of a video.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{escape, orange, p, Context, Snippet, Transformed};
use crate::{span, Error};

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
    if let Some(on) = s.dated("Published on", ctx) {
        out.push(on);
    }

    match &s.tags {
        Some(tags) if !tags.is_empty() => {
            let chips: Vec<String> = tags
                .iter()
                .map(|t| format!("<span class='tag'>{}</span>", escape(t)))
                .collect();
            out.push(p(format!("<strong>Tag(s): </strong>{}", chips.join(""))));
        }
        _ => out.push(p("There were no tags.")),
    }

    out.follow_ups.extend(s.owner_follow_up());
    Ok(out)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Statistics {
    #[serde(default, deserialize_with = "crate::serde::number::from_str_option")]
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::serde::number::from_str_option")]
    like_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::serde::number::from_str_option")]
    dislike_count: Option<u64>,
    #[serde(default, deserialize_with = "crate::serde::number::from_str_option")]
    comment_count: Option<u64>,
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

/// Reduce likes and dislikes to "N per 1" or "1 per N", truncating the
/// larger side. When either count is zero the raw counts come back.
pub fn like_ratio(likes: u64, dislikes: u64) -> (u64, u64) {
    if likes == 0 || dislikes == 0 {
        return (likes, dislikes);
    }

    let g = gcd(likes, dislikes);
    let (l, d) = (likes / g, dislikes / g);
    if l > d {
        (l / d, 1)
    } else {
        (1, d / l)
    }
}

pub(super) fn statistics(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let stats = Statistics::deserialize(part)?;
    let mut out = Transformed::default();

    match (stats.like_count, stats.dislike_count) {
        (Some(likes), Some(dislikes)) => {
            let (l, d) = like_ratio(likes, dislikes);
            out.push(p(format!(
                "<strong>Normalized like ratio:</strong> \
                 <span style='color:green'>{} like(s)</span> per \
                 <span style='color:red'>{} dislike(s)</span>",
                l, d
            )));
        }
        // Dislike counts stopped being public in late 2021.
        (Some(likes), None) => {
            out.push(p(format!(
                "<strong>Likes:</strong> <span style='color:green'>{}</span> \
                 (the dislike count is not public)",
                likes
            )));
        }
        (None, _) => out.push(p("This video has <strong>likes disabled.</strong>")),
    }

    if stats.view_count.is_none() {
        out.push(p("This video has the <strong>view count disabled.</strong>"));
    }
    if stats.comment_count.is_none() {
        out.push(p("This video has <strong>comments disabled.</strong>"));
    }

    Ok(out)
}

#[derive(Deserialize, Debug, Default)]
struct RecordingDetails {
    #[serde(default)]
    location: Option<Location>,
}

#[derive(Deserialize, Debug, Default)]
struct Location {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

pub(super) fn recording_details(part: &Value, ctx: &Context) -> Result<Transformed, Error> {
    let details = RecordingDetails::deserialize(part)?;
    let mut out = Transformed::default();

    let loc = match details.location {
        Some(loc) if loc.latitude != 0.0 && loc.longitude != 0.0 => loc,
        _ => return Ok(out),
    };
    let latlng = format!("{},{}", loc.latitude, loc.longitude);

    let image = match &ctx.maps_key {
        Some(key) => {
            let src = format!(
                "https://maps.googleapis.com/maps/api/staticmap?center={0}&zoom=13&size=1000x300&key={1}&markers=color:red|{0}",
                latlng, key
            );
            format!(
                "<img class='mb-15' src='{}' alt='Google Maps Static Map'>",
                escape(&src)
            )
        }
        None => String::new(),
    };

    out.push(format!(
        "<a href='https://maps.google.com/maps?q=loc:{}' target='_blank'>{}<p>Open {} in Google Maps</p></a>",
        latlng, image, latlng
    ));
    Ok(out)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Status {
    embeddable: Option<bool>,
    made_for_kids: Option<bool>,
    self_declared_made_for_kids: Option<bool>,
}

pub(super) fn status(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let status = Status::deserialize(part)?;
    let mut out = Transformed::default();

    match status.embeddable {
        Some(true) => out.push(p("This video can be embedded on other websites.")),
        Some(false) => out.push(p("This video cannot be embedded on other websites.")),
        None => {}
    }
    match status.made_for_kids {
        Some(true) => out.push(p(format!(
            "This video is designated as {}.",
            orange("made for kids")
        ))),
        Some(false) => out.push(p("This video is not made for kids.")),
        None => {}
    }
    match status.self_declared_made_for_kids {
        Some(true) => out.push(p(format!(
            "The owner designated this video as {}.",
            orange("made for kids")
        ))),
        Some(false) => out.push(p("The owner designated this video as not made for kids.")),
        None => {}
    }

    Ok(out)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LiveStreamingDetails {
    scheduled_start_time: Option<DateTime<Utc>>,
    actual_start_time: Option<DateTime<Utc>>,
    actual_end_time: Option<DateTime<Utc>>,
}

pub(super) fn live_streaming_details(part: &Value, ctx: &Context) -> Result<Transformed, Error> {
    let live = LiveStreamingDetails::deserialize(part)?;
    let now = ctx.now;
    let mut out = Transformed::default();

    if let (Some(scheduled), None) = (live.scheduled_start_time, live.actual_start_time) {
        let gap = orange(span::format(span::between(scheduled, now), false));
        if scheduled > now {
            out.push(p(format!(
                "The stream has not started yet. It starts in {}.",
                gap
            )));
        } else {
            out.push(p(format!(
                "The stream never started. It was supposed to start {} ago.",
                gap
            )));
        }
    }

    if let (Some(start), Some(scheduled)) = (live.actual_start_time, live.scheduled_start_time) {
        let gap = orange(span::format(span::between(start, scheduled), false));
        if start > scheduled {
            out.push(p(format!("The stream started {} late.", gap)));
        } else {
            out.push(p(format!("The stream started {} early.", gap)));
        }
    }

    match (live.actual_start_time, live.actual_end_time) {
        (Some(start), None) => out.push(p(format!(
            "The stream is still live. It has been running for {}.",
            orange(span::format(span::between(start, now), false))
        ))),
        (Some(start), Some(end)) => out.push(p(format!(
            "The stream is over. It lasted {}.",
            orange(span::format(span::between(start, end), false))
        ))),
        _ => {}
    }

    Ok(out)
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default, deserialize_with = "crate::serde::duration::from_iso8601_option")]
    duration: Option<Duration>,
}

pub(super) fn content_details(part: &Value, _: &Context) -> Result<Transformed, Error> {
    let details = ContentDetails::deserialize(part)?;
    let duration = details.duration.unwrap_or_else(Duration::zero);

    let mut out = Transformed::default();
    match span::format(duration, false).as_str() {
        "0s" => out.push(p(
            "Livestream? A video should not be 0 seconds long.",
        )),
        length => out.push(p(format!(
            "The video is <span style='color:orange'>{}</span> long.",
            length
        ))),
    }
    Ok(out)
}
