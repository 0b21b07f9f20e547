use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use reqwest::header::HeaderMap;
use rustls::{ClientConfig, crypto::aws_lc_rs};
use rustls_platform_verifier::BuilderVerifierExt;
use tracing::debug;

use super::{
    HttpTransport, ProxyConfig, TransportError, TransportResponse, build_proxy_from_config,
};

/// Options used to build a [`ReqwestTransport`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whole-request timeout. `None` leaves requests unbounded.
    pub timeout: Option<Duration>,
    pub connect_timeout: Duration,
    pub proxy: Option<ProxyConfig>,
    /// Disable transparent gzip/deflate so `content-length` matches the bytes
    /// actually served.
    pub disable_compression: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            connect_timeout: Duration::from_secs(30),
            proxy: None,
            disable_compression: true,
        }
    }
}

/// [`HttpTransport`] backed by a `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(options: &ClientOptions) -> Result<Self, TransportError> {
        let provider = Arc::new(aws_lc_rs::default_provider());
        let tls_config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_platform_verifier()?
            .with_no_client_auth();

        let mut builder = Client::builder()
            .use_preconfigured_tls(tls_config)
            .connect_timeout(options.connect_timeout);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy) = &options.proxy {
            debug!(proxy = %proxy.url, "Using proxy");
            builder = builder.proxy(build_proxy_from_config(proxy)?);
        }

        if options.disable_compression {
            builder = builder.no_gzip().no_deflate();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &HeaderMap,
    ) -> Result<TransportResponse, TransportError> {
        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes_stream().map_err(TransportError::from);

        Ok(TransportResponse::new(status, headers, Box::pin(body)))
    }
}
