//! Requests and responses seen by the offline cache

use crate::Result;
use url::Url;

/// What the request will be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    Other,
}

/// An outgoing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub destination: Destination,
}

impl Request {
    /// GET request for `url`
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self {
            method: "GET".to_string(),
            url: Url::parse(url)?,
            destination: Destination::Other,
        })
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_uppercase();
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    /// Key responses are stored under: the URL without its fragment
    pub fn cache_key(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.into()
    }
}

/// A response from the network or a cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    /// 2xx status
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_drops_fragment() {
        let request = Request::get("https://maru.example/app.js#top").unwrap();
        assert_eq!(request.cache_key(), "https://maru.example/app.js");
    }

    #[test]
    fn test_method() {
        let request = Request::get("https://maru.example/").unwrap();
        assert!(request.is_get());
        assert!(!request.with_method("post").is_get());
        assert!(Response::new(204, "").ok());
        assert!(!Response::new(404, "").ok());
    }
}
