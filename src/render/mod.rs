//! The document ytmeta renders into.
//!
//! A [Page] holds one [Section] per [Entity] and one [Panel] per registry
//! part. Rendering an API response marks each panel good or bad, attaches
//! the raw part as pretty-printed JSON, and appends whatever the part's
//! transform derives from it.

use log::{debug, warn};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};

use crate::{
    parts::{escape, Context, Entity, Part},
    query::{Kind, Query},
    Error,
};

/// Presence of a part in the last response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Unknown,
    Good,
    Bad,
}

impl Status {
    pub fn class(self) -> &'static str {
        match self {
            Status::Unknown => "unknown",
            Status::Good => "good",
            Status::Bad => "bad",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Status::Unknown => "question",
            Status::Good => "check",
            Status::Bad => "minus",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Panel {
    part: &'static Part,
    status: Status,
    body: Vec<String>,
}

impl Panel {
    fn new(part: &'static Part) -> Self {
        Self {
            part,
            status: Status::Unknown,
            body: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.part.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Markup appended to this panel so far.
    pub fn body(&self) -> String {
        self.body.concat()
    }

    fn to_html(&self) -> String {
        format!(
            "<div id='{}' class='part-section'>\
             <div class='section-header {}'><i class='expand {}'></i><span>{}</span></div>\
             {}</div>\n",
            self.part.name,
            self.status.class(),
            self.status.icon(),
            escape(self.part.title),
            self.body()
        )
    }
}

#[derive(Debug, Clone)]
pub struct Section {
    entity: Entity,
    hidden: bool,
    panels: Vec<Panel>,
}

impl Section {
    fn new(entity: Entity) -> Self {
        Self {
            entity,
            hidden: false,
            panels: entity.parts().iter().map(Panel::new).collect(),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn panel(&self, name: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.name() == name)
    }
}

/// The whole document.
#[derive(Debug, Clone)]
pub struct Page {
    input: String,
    share_link: Option<String>,
    sections: Vec<Section>,
    thumbnails: Vec<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Self {
            input: String::new(),
            share_link: None,
            sections: Entity::ALL.iter().map(|&e| Section::new(e)).collect(),
            thumbnails: Vec::new(),
        }
    }

    /// Reset every section to its unrendered skeleton and show it again.
    /// The input and share link survive.
    pub fn rebuild(&mut self) {
        self.sections = Entity::ALL.iter().map(|&e| Section::new(e)).collect();
        self.thumbnails.clear();
    }

    pub fn set_input(&mut self, input: impl Into<String>, share_link: Option<String>) {
        self.input = input.into();
        self.share_link = share_link;
    }

    pub fn section(&self, entity: Entity) -> &Section {
        // Sections are built from Entity::ALL, in that order.
        &self.sections[Entity::ALL.iter().position(|&e| e == entity).unwrap_or(0)]
    }

    fn section_mut(&mut self, entity: Entity) -> &mut Section {
        &mut self.sections[Entity::ALL.iter().position(|&e| e == entity).unwrap_or(0)]
    }

    pub fn thumbnails(&self) -> &[String] {
        &self.thumbnails
    }

    /// Hide the sections a top-level query of `kind` has nothing to say
    /// about. The channel section always stays, since videos and
    /// playlists pull in their owner.
    pub fn hide_for(&mut self, kind: Kind) {
        let hide: &[Entity] = match kind {
            Kind::VideoId => &[Entity::Playlist],
            Kind::PlaylistId => &[Entity::Video],
            Kind::ChannelId | Kind::ChannelUser => &[Entity::Video, Entity::Playlist],
            Kind::Unknown => &[],
        };
        for &entity in hide {
            self.section_mut(entity).hidden = true;
        }
    }

    /// Render the first item of an API list response into the section for
    /// `entity`. Returns the follow-up queries the transforms asked for.
    pub fn render(
        &mut self,
        entity: Entity,
        response: &Value,
        ctx: &Context,
    ) -> Result<Vec<Query>, Error> {
        let item = response
            .get("items")
            .and_then(Value::as_array)
            .and_then(|items| items.first())
            .ok_or(Error::NotFound(entity))?;

        let mut follow_ups = Vec::new();
        for panel in self.section_mut(entity).panels.iter_mut() {
            let name = panel.part.name;

            let part = match item.get(name) {
                Some(part) => part,
                None => {
                    panel.status = Status::Bad;
                    panel.body.push(format!(
                        "<p class='mb-15 bad'>The {} does not have {}.</p>",
                        entity, name
                    ));
                    continue;
                }
            };

            panel.status = Status::Good;
            panel.body.push(format!(
                "<pre><code class=\"prettyprint json-lang\">{}</code></pre>",
                escape(&pretty(part)?)
            ));

            match (panel.part.transform)(part, ctx) {
                Ok(out) => {
                    debug!("{} {} yields {} follow-up(s)", entity, name, out.follow_ups.len());
                    panel.body.push(out.html);
                    follow_ups.extend(out.follow_ups);
                }
                Err(e) => {
                    warn!("Could not interpret {} {}: {}", entity, name, e);
                    panel.body.push(format!(
                        "<p class='mb-15 bad'>Could not interpret {}: {}</p>",
                        name,
                        escape(&e.to_string())
                    ));
                }
            }
        }

        Ok(follow_ups)
    }

    /// The four stock thumbnails of a video, each linked to a reverse
    /// image search.
    pub fn show_thumbnails(&mut self, video_id: &str) {
        let id = escape(video_id);
        self.thumbnails = (0..4)
            .map(|i| {
                let url = format!("https://img.youtube.com/vi/{}/{}.jpg", id, i);
                format!(
                    "<div class='mb-15 column'>\
                     <a href='https://www.google.com/searchbyimage?image_url={0}' target='_blank'>\
                     <img src='{0}' alt='Thumb {1}' style='max-width: 200px;'>\
                     <p>Click for reverse image search</p></a></div>",
                    url, i
                )
            })
            .collect();
    }

    pub fn to_html(&self) -> String {
        let mut html = String::from(
            "<!DOCTYPE html>\n<html lang='en'>\n<head>\n<meta charset='utf-8'>\n\
             <title>YouTube Metadata</title>\n</head>\n<body>\n",
        );

        html.push_str(&format!(
            "<div id='controls'>\n<input id='value' type='text' value='{}'>\n",
            escape(&self.input)
        ));
        match &self.share_link {
            Some(link) => html.push_str(&format!(
                "<input id='shareLink' class='clipboard' type='text' value='{}' readonly>\n",
                escape(link)
            )),
            None => html.push_str("<input id='shareLink' class='clipboard' type='text' disabled>\n"),
        }
        html.push_str("</div>\n");

        for section in &self.sections {
            let wrapper = section.entity.to_string();
            html.push_str(&format!(
                "<div id='{}'{}>\n<div id='{}'>\n",
                wrapper,
                if section.hidden { " hidden" } else { "" },
                section.entity.section_id()
            ));
            for panel in &section.panels {
                html.push_str(&panel.to_html());
            }
            html.push_str("</div>\n");
            if section.entity == Entity::Video {
                html.push_str(&format!(
                    "<div id='thumbnails'>{}</div>\n",
                    self.thumbnails.concat()
                ));
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

/// Pretty-print with four-space indentation.
fn pretty(v: &Value) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    v.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::Encoding(e.to_string()))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn video_response() -> Value {
        json!({
            "kind": "youtube#videoListResponse",
            "items": [{
                "id": "dQw4w9WgXcQ",
                "snippet": {
                    "title": "Never Gonna Give You Up",
                    "channelId": "UCuAXFkgsw1L7xaCfnd5JJOw",
                    "channelTitle": "Rick Astley",
                    "publishedAt": "2009-10-25T06:57:33Z"
                },
                "statistics": { "viewCount": "1", "likeCount": "2", "dislikeCount": "1", "commentCount": "0" },
                "contentDetails": { "duration": "bogus" }
            }]
        })
    }

    #[test]
    fn skeleton_has_every_part() {
        let page = Page::new();
        for &entity in Entity::ALL.iter() {
            let section = page.section(entity);
            assert!(!section.is_hidden());
            assert_eq!(section.panels().len(), entity.parts().len());
            assert!(section.panels().iter().all(|p| p.status() == Status::Unknown));
        }
        assert!(page.thumbnails().is_empty());
    }

    #[test]
    fn render_marks_presence() {
        let mut page = Page::new();
        let follow_ups = page
            .render(Entity::Video, &video_response(), &Context::default())
            .unwrap();

        let section = page.section(Entity::Video);
        assert_eq!(section.panel("snippet").unwrap().status(), Status::Good);
        assert_eq!(section.panel("statistics").unwrap().status(), Status::Good);
        assert_eq!(section.panel("status").unwrap().status(), Status::Bad);
        assert!(section
            .panel("topicDetails")
            .unwrap()
            .body()
            .contains("The video does not have topicDetails."));

        let snippet = section.panel("snippet").unwrap().body();
        assert!(snippet.contains(
            "<pre><code class=\"prettyprint json-lang\">{\n    &quot;title&quot;: &quot;Never Gonna Give You Up&quot;,"
        ));

        assert_eq!(follow_ups.len(), 1);
        assert_eq!(follow_ups[0].value(), Some("UCuAXFkgsw1L7xaCfnd5JJOw"));

        // Other sections are untouched.
        assert!(page
            .section(Entity::Channel)
            .panels()
            .iter()
            .all(|p| p.status() == Status::Unknown));
    }

    #[test]
    fn raw_json_keeps_api_key_order() {
        let response: Value = serde_json::from_str(
            r#"{"items":[{"snippet":{
                "publishedAt":"2009-10-25T06:57:33Z",
                "channelId":"UCuAXFkgsw1L7xaCfnd5JJOw",
                "title":"Never Gonna Give You Up"
            }}]}"#,
        )
        .unwrap();
        let mut page = Page::new();
        page.render(Entity::Video, &response, &Context::default())
            .unwrap();

        let body = page.section(Entity::Video).panel("snippet").unwrap().body();
        let published = body.find("&quot;publishedAt&quot;").unwrap();
        let channel = body.find("&quot;channelId&quot;").unwrap();
        let title = body.find("&quot;title&quot;").unwrap();
        assert!(published < channel);
        assert!(channel < title);
    }

    #[test]
    fn transform_failure_keeps_panel_good() {
        let mut page = Page::new();
        page.render(Entity::Video, &video_response(), &Context::default())
            .unwrap();

        let panel = page.section(Entity::Video).panel("contentDetails").unwrap();
        assert_eq!(panel.status(), Status::Good);
        assert!(panel.body().contains("Could not interpret contentDetails"));
    }

    #[test]
    fn empty_items_is_not_found() {
        let mut page = Page::new();
        let err = page
            .render(Entity::Channel, &json!({ "items": [] }), &Context::default())
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Channel)));

        assert!(page
            .render(Entity::Channel, &json!({}), &Context::default())
            .is_err());
    }

    #[test]
    fn hiding_and_rebuilding() {
        let mut page = Page::new();
        page.hide_for(Kind::ChannelUser);
        assert!(page.section(Entity::Video).is_hidden());
        assert!(page.section(Entity::Playlist).is_hidden());
        assert!(!page.section(Entity::Channel).is_hidden());

        page.show_thumbnails("dQw4w9WgXcQ");
        page.render(Entity::Video, &video_response(), &Context::default())
            .unwrap();
        page.rebuild();

        assert!(!page.section(Entity::Video).is_hidden());
        assert!(page.thumbnails().is_empty());
        assert_eq!(
            page.section(Entity::Video).panel("snippet").unwrap().status(),
            Status::Unknown
        );

        page.hide_for(Kind::VideoId);
        assert!(page.section(Entity::Playlist).is_hidden());
        assert!(!page.section(Entity::Channel).is_hidden());
    }

    #[test]
    fn thumbnails_link_to_reverse_search() {
        let mut page = Page::new();
        page.show_thumbnails("dQw4w9WgXcQ");
        assert_eq!(page.thumbnails().len(), 4);
        assert!(page.thumbnails()[3].contains(
            "searchbyimage?image_url=https://img.youtube.com/vi/dQw4w9WgXcQ/3.jpg"
        ));
    }

    #[test]
    fn document_markup() {
        let mut page = Page::new();
        page.set_input("<script>", Some("https://x.test/?url=a&submit=true".into()));
        page.hide_for(Kind::PlaylistId);
        let html = page.to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("value='&lt;script&gt;'"));
        assert!(html.contains("value='https://x.test/?url=a&amp;submit=true' readonly"));
        assert!(html.contains("<div id='video' hidden>"));
        assert!(html.contains("<div id='channel-section'>"));
        assert!(html.contains(
            "<div id='snippet' class='part-section'><div class='section-header unknown'><i class='expand question'></i><span>Snippet</span></div></div>"
        ));
    }
}
