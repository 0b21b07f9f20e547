use std::collections::HashMap;
use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue};

use super::{HttpTransport, TransportError, TransportResponse};

enum Route {
    Body {
        status: StatusCode,
        content_type: Option<&'static str>,
        chunks: Vec<Bytes>,
        /// Announced `content-length`; the real body size when `None`.
        claimed_length: Option<u64>,
    },
    /// Serve the first chunks, then fail mid-stream.
    Truncated { chunks: Vec<Bytes> },
    Fail,
}

/// In-memory transport that records every request.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<(String, HeaderMap)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, html: &str) -> Self {
        self.with_body(url, Some("text/html; charset=utf-8"), html.as_bytes().to_vec())
    }

    pub fn with_body(
        mut self,
        url: &str,
        content_type: Option<&'static str>,
        body: impl Into<Bytes>,
    ) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                status: StatusCode::OK,
                content_type,
                chunks: vec![body.into()],
                claimed_length: None,
            },
        );
        self
    }

    pub fn with_chunks(mut self, url: &str, chunks: Vec<Bytes>) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                status: StatusCode::OK,
                content_type: Some("video/mp4"),
                chunks,
                claimed_length: None,
            },
        );
        self
    }

    pub fn with_status(mut self, url: &str, status: StatusCode, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                status,
                content_type: Some("text/html"),
                chunks: vec![Bytes::copy_from_slice(body.as_bytes())],
                claimed_length: None,
            },
        );
        self
    }

    /// Serve `html` while announcing `claimed_length` bytes.
    pub fn with_claimed_length(mut self, url: &str, html: &str, claimed_length: u64) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Body {
                status: StatusCode::OK,
                content_type: Some("text/html"),
                chunks: vec![Bytes::copy_from_slice(html.as_bytes())],
                claimed_length: Some(claimed_length),
            },
        );
        self
    }

    pub fn with_truncated(mut self, url: &str, chunks: Vec<Bytes>) -> Self {
        self.routes
            .insert(url.to_string(), Route::Truncated { chunks });
        self
    }

    pub fn with_failure(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Route::Fail);
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn request_headers(&self, index: usize) -> Option<HeaderMap> {
        self.requests.lock().get(index).map(|(_, h)| h.clone())
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push((url.to_string(), headers.clone()));

        match self.routes.get(url) {
            Some(Route::Body {
                status,
                content_type,
                chunks,
                claimed_length,
            }) => {
                let mut response_headers = HeaderMap::new();
                let len = claimed_length
                    .unwrap_or_else(|| chunks.iter().map(|c| c.len() as u64).sum());
                response_headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
                if let Some(content_type) = content_type {
                    response_headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                let items: Vec<Result<Bytes, TransportError>> =
                    chunks.iter().cloned().map(Ok).collect();
                Ok(TransportResponse::new(
                    *status,
                    response_headers,
                    Box::pin(futures::stream::iter(items)),
                ))
            }
            Some(Route::Truncated { chunks }) => {
                let mut items: Vec<Result<Bytes, TransportError>> =
                    chunks.iter().cloned().map(Ok).collect();
                items.push(Err(TransportError::Io(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                ))));
                Ok(TransportResponse::new(
                    StatusCode::OK,
                    HeaderMap::new(),
                    Box::pin(futures::stream::iter(items)),
                ))
            }
            Some(Route::Fail) => Err(TransportError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            None => Err(TransportError::Other(format!("no route for {url}"))),
        }
    }
}
