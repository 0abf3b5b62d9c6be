//! # ytmeta
//!
//! An async library for grabbing everything publicly available about a
//! YouTube video, playlist, or channel from the YouTube Data API, and
//! rendering it as an HTML report.
//!
//! ## Features
//!
//! By default, ytmeta's API client built on [hyper](https://hyper.rs/) is
//! used. To disable it, turn off default features; [Fetch] can then be
//! implemented over any transport.
//!
//! ## Example
//!
//! ```
//! use ytmeta::{parts::Context, render::Page, yt, Config};
//!
//! // ...
//!
//! let config = Config::new("my-api-key");
//! let client = yt::Client::new(&config)?;
//!
//! let mut page = Page::new();
//! let query = ytmeta::query::classify("https://youtu.be/VfWgE7D1pYY");
//! yt::submit(&mut page, &client, query, &Context::default()).await?;
//!
//! println!("{}", page.to_html());
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::{
    error,
    fmt::{self, Display, Formatter},
};

pub mod parts;
pub mod query;
pub mod render;
pub mod serde;
pub mod span;
pub mod yt;

use parts::Entity;

#[async_trait]
/// A transport able to issue one Data API request. Type signatures may be
/// imposing, but this is an [async_trait].
pub trait Fetch: Send + Sync {
    /// GET `endpoint` (e.g. `videos`) with the given query parameters and
    /// return the decoded JSON body.
    async fn fetch(
        &self,
        endpoint: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value, Error>;
}

/// Settings for talking to the API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Data API key.
    pub api_key: String,
    /// Base of the Data API, without a trailing slash.
    pub api_base: String,
    /// Google Maps Static API key, used to draw recording locations.
    pub maps_key: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base: yt::ENDPOINT_URI.to_string(),
            maps_key: None,
        }
    }
}

#[derive(Debug)]
pub enum Error {
    /// Input matched none of the known URL or identifier shapes.
    Unrecognized(String),
    /// The API answered with an empty item list.
    NotFound(Entity),
    MissingKey,
    /// The API answered with a non-success status.
    Api { status: u16, message: String },
    UnexpectedContent(String),
    Encoding(String),
    Json(serde_json::Error),
    #[cfg(feature = "client")]
    Http(hyper::Error),
    #[cfg(feature = "client")]
    Uri(hyper::http::uri::InvalidUri),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Json(e) => Some(e),
            #[cfg(feature = "client")]
            Error::Http(e) => Some(e),
            #[cfg(feature = "client")]
            Error::Uri(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unrecognized(input) => write!(f, "didn't recognize input {:?}", input),
            Error::NotFound(entity) => write!(f, "no such {}", entity),
            Error::MissingKey => write!(f, "no API key configured"),
            Error::Api { status, message } => write!(f, "API error {}: {}", status, message),
            Error::UnexpectedContent(kind) => write!(f, "expected JSON, got {}", kind),
            Error::Encoding(e) => write!(f, "encoding failed: {}", e),
            Error::Json(e) => write!(f, "bad JSON: {}", e),
            #[cfg(feature = "client")]
            Error::Http(e) => write!(f, "request failed: {}", e),
            #[cfg(feature = "client")]
            Error::Uri(e) => write!(f, "bad request URI: {}", e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e)
    }
}

#[cfg(feature = "client")]
impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::Http(e)
    }
}

#[cfg(feature = "client")]
impl From<hyper::http::uri::InvalidUri> for Error {
    fn from(e: hyper::http::uri::InvalidUri) -> Self {
        Error::Uri(e)
    }
}
