use std::str::FromStr;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use super::default::{DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_UA};
use super::error::ExtractorError;
use crate::media::ResolvedStream;
use crate::transport::{HttpTransport, TransportError, TransportResponse};

/// Base extractor shared by platform implementations.
///
/// Holds the page URL, a borrowed or owned transport, and the headers sent
/// with every request. The default headers mimic a desktop browser because
/// the hosting pages reject bot-like user agents.
#[derive(Debug, Clone)]
pub struct Extractor<T> {
    // url to extract from, e.g., "https://vivo.sx/0123456789"
    pub url: String,
    // name of the platform, e.g., "Vivo"
    pub platform_name: String,
    transport: T,
    platform_headers: HeaderMap,
}

impl<T: HttpTransport> Extractor<T> {
    pub fn new<S1: Into<String>, S2: Into<String>>(
        platform_name: S1,
        platform_url: S2,
        transport: T,
    ) -> Self {
        Self {
            platform_name: platform_name.into(),
            url: platform_url.into(),
            transport,
            platform_headers: default_headers(),
        }
    }

    /// Insert an arbitrary header. Invalid names or values are skipped.
    pub fn add_header<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) {
        match HeaderName::from_str(key.as_ref()) {
            Ok(name) => match HeaderValue::from_str(value.as_ref()) {
                Ok(value) => {
                    self.platform_headers.insert(name, value);
                }
                Err(e) => {
                    debug!(error = %e, "Invalid header value; skipping");
                }
            },
            Err(e) => {
                debug!(error = %e, "Invalid header name; skipping");
            }
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.platform_headers
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn get(&self, url: &str) -> Result<TransportResponse, TransportError> {
        debug!(platform = %self.platform_name, url = %url, "GET");
        self.transport.get(url, &self.platform_headers).await
    }
}

/// Browser-like headers sent with page, probe and download requests.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(DEFAULT_UA),
    );
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static(DEFAULT_ACCEPT),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
    );
    headers
}

#[async_trait]
pub trait PlatformExtractor: Send + Sync {
    fn platform_name(&self) -> &str;

    fn page_url(&self) -> &str;

    async fn extract(&self) -> Result<ResolvedStream, ExtractorError>;
}
