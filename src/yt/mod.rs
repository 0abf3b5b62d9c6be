//! Dispatch of classified queries against the YouTube Data API.

use std::collections::{HashSet, VecDeque};

use log::{debug, error, info, warn};

use crate::{
    parts::{Context, Entity},
    query::{Kind, Query},
    render::Page,
    Error, Fetch,
};

/// Data API root to request against.
pub const ENDPOINT_URI: &str = "https://www.googleapis.com/youtube/v3";

/// One list request for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    entity: Entity,
    params: Vec<(&'static str, String)>,
}

impl Request {
    /// The request answering `query`, or [None] when the query was not
    /// recognized.
    pub fn for_query(query: &Query) -> Option<Self> {
        let entity = query.kind().entity()?;
        let value = query.value()?.to_string();
        let by = match query.kind() {
            Kind::ChannelUser => "forUsername",
            _ => "id",
        };

        Some(Self {
            entity,
            params: vec![("part", entity.part_list()), (by, value)],
        })
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn endpoint(&self) -> &'static str {
        self.entity.endpoint()
    }

    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }
}

/// Answer `query` into `page`, then chase the queries its parts point at
/// (the owning channel of a video or playlist). Each entity is fetched at
/// most once per submission. Follow-up failures are logged and do not fail
/// the submission.
pub async fn submit<F>(
    page: &mut Page,
    fetcher: &F,
    query: Query,
    ctx: &Context,
) -> Result<(), Error>
where
    F: Fetch + ?Sized,
{
    info!("Submitting {}", query);

    let request = match Request::for_query(&query) {
        Some(r) => r,
        None => {
            warn!("Didn't recognize the input");
            return Err(Error::Unrecognized(query.to_string()));
        }
    };

    if query.may_hide_others() {
        page.hide_for(query.kind());
    }

    let mut seen = HashSet::new();
    if let Some(value) = query.value() {
        seen.insert((request.entity(), value.to_string()));
    }

    let mut queue: VecDeque<Query> =
        answer(page, fetcher, &query, &request, ctx).await?.into();

    while let Some(next) = queue.pop_front() {
        let request = match Request::for_query(&next) {
            Some(r) => r,
            None => continue,
        };
        let key = (request.entity(), next.value().unwrap_or_default().to_string());
        if !seen.insert(key) {
            debug!("Already answered {}", next);
            continue;
        }

        if next.may_hide_others() {
            page.hide_for(next.kind());
        }
        match answer(page, fetcher, &next, &request, ctx).await {
            Ok(more) => queue.extend(more),
            Err(e) => error!("Follow-up {} failed: {}", next, e),
        }
    }

    Ok(())
}

async fn answer<F>(
    page: &mut Page,
    fetcher: &F,
    query: &Query,
    request: &Request,
    ctx: &Context,
) -> Result<Vec<Query>, Error>
where
    F: Fetch + ?Sized,
{
    info!("Grabbing {} {}", request.entity(), query.value().unwrap_or_default());

    let res = fetcher.fetch(request.endpoint(), request.params()).await?;
    debug!("{}", res);

    let follow_ups = page.render(request.entity(), &res, ctx)?;

    if query.kind() == Kind::VideoId {
        if let Some(id) = query.value() {
            page.show_thumbnails(id);
        }
    }

    Ok(follow_ups)
}

#[cfg(feature = "client")]
pub use client::Client;

#[cfg(feature = "client")]
mod client {
    use async_trait::async_trait;
    use hyper::{body, client::HttpConnector, header::CONTENT_TYPE, Body, Uri};
    use hyper_tls::HttpsConnector;
    use log::debug;
    use serde_json::Value;

    use crate::{Config, Error, Fetch};

    /// [Fetch] over HTTPS with an API key.
    pub struct Client {
        inner: hyper::Client<HttpsConnector<HttpConnector>, Body>,
        base: String,
        key: String,
    }

    impl Client {
        pub fn new(config: &Config) -> Result<Self, Error> {
            if config.api_key.trim().is_empty() {
                return Err(Error::MissingKey);
            }

            let https = HttpsConnector::new();
            Ok(Self {
                inner: hyper::Client::builder().build::<_, Body>(https),
                base: config.api_base.trim_end_matches('/').to_string(),
                key: config.api_key.clone(),
            })
        }
    }

    fn is_json(content_type: Option<&str>) -> bool {
        content_type
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .map(|m| m.type_() == mime::APPLICATION && m.subtype() == mime::JSON)
            .unwrap_or(false)
    }

    // Google wraps failures as {"error": {"code": 400, "message": "..."}}.
    fn api_message(body: &[u8]) -> Option<String> {
        let v: Value = serde_json::from_slice(body).ok()?;
        v.get("error")?
            .get("message")?
            .as_str()
            .map(str::to_string)
    }

    #[async_trait]
    impl Fetch for Client {
        async fn fetch(
            &self,
            endpoint: &str,
            params: &[(&'static str, String)],
        ) -> Result<Value, Error> {
            let mut pairs: Vec<(&str, &str)> =
                params.iter().map(|(k, v)| (*k, v.as_str())).collect();
            let qs = serde_urlencoded::to_string(&pairs)
                .map_err(|e| Error::Encoding(e.to_string()))?;
            debug!("GET {}/{}?{}", self.base, endpoint, qs);

            pairs.push(("key", self.key.as_str()));
            let qs = serde_urlencoded::to_string(&pairs)
                .map_err(|e| Error::Encoding(e.to_string()))?;
            let uri: Uri = format!("{}/{}?{}", self.base, endpoint, qs).parse()?;

            let mut res = self.inner.get(uri).await?;
            let status = res.status();
            let content_type = res
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let bytes = body::to_bytes(res.body_mut()).await?;

            if !status.is_success() {
                return Err(Error::Api {
                    status: status.as_u16(),
                    message: api_message(&bytes).unwrap_or_else(|| {
                        status.canonical_reason().unwrap_or("unknown").to_string()
                    }),
                });
            }
            if !is_json(content_type.as_deref()) {
                return Err(Error::UnexpectedContent(
                    content_type.unwrap_or_else(|| "no content type".to_string()),
                ));
            }

            Ok(serde_json::from_slice(&bytes)?)
        }
    }

    #[cfg(test)]
    mod test {
        use super::*;

        #[test]
        fn json_content_types() {
            assert!(is_json(Some("application/json; charset=UTF-8")));
            assert!(is_json(Some("application/json")));
            assert!(!is_json(Some("text/html")));
            assert!(!is_json(None));
        }

        #[test]
        fn api_error_messages() {
            let body = br#"{"error":{"code":403,"message":"The request cannot be completed because you have exceeded your quota."}}"#;
            assert_eq!(
                api_message(body).as_deref(),
                Some("The request cannot be completed because you have exceeded your quota.")
            );
            assert_eq!(api_message(b"<html>"), None);
        }

        #[test]
        fn needs_a_key() {
            assert!(matches!(Client::new(&Config::new(" ")), Err(Error::MissingKey)));
        }
    }
}
