//! HTTP transport seam.
//!
//! Resolution and download only ever talk to the network through
//! [`HttpTransport`]. [`ReqwestTransport`] is the production implementation;
//! tests substitute an in-memory transport.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod proxy;

pub use client::{ClientOptions, ReqwestTransport};
pub use error::TransportError;
pub use proxy::{ProxyAuth, ProxyConfig, ProxyType, build_proxy_from_config};

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap};

/// Upper bound for the buffer pre-allocated from a `content-length` header.
const MAX_PREALLOC: usize = 1 << 20;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue a GET request. Only transport-level failures are errors; any
    /// status code is returned as a response.
    async fn get(&self, url: &str, headers: &HeaderMap)
    -> Result<TransportResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        (**self).get(url, headers).await
    }
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        (**self).get(url, headers).await
    }
}

/// Response head plus an owned body stream. Dropping the value releases the
/// underlying connection.
pub struct TransportResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl TransportResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: ByteStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
    }

    /// Length announced by the `content-length` header, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    }

    /// Drain the body into memory. The announced length is only a capped
    /// allocation hint.
    pub async fn bytes(mut self) -> Result<Bytes, TransportError> {
        let hint = self
            .content_length()
            .map_or(0, |len| usize::try_from(len).unwrap_or(usize::MAX))
            .min(MAX_PREALLOC);
        let mut buf = BytesMut::with_capacity(hint);
        while let Some(chunk) = self.body.next().await {
            buf.extend_from_slice(&chunk?);
        }
        Ok(buf.freeze())
    }

    pub async fn text(self) -> Result<String, TransportError> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
