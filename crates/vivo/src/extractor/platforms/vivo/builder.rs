use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWrite;
use tracing::{debug, warn};

use super::cipher::decode_source;
use super::page::{extract_title, parse_stream_config};
use super::url::normalize_url;
use crate::{
    extractor::{
        download::copy_to_sink,
        error::ExtractorError,
        platform_extractor::{Extractor, PlatformExtractor},
    },
    media::ResolvedStream,
    transport::{HttpTransport, TransportError},
};

/// What to do when the metadata probe against the media URL fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbePolicy {
    /// Log a warning and return the stream with empty mime type and zero length.
    #[default]
    Tolerate,
    /// Fail the whole resolution with a network error.
    Fatal,
}

#[derive(Debug, Default)]
struct ProbeInfo {
    mime_type: String,
    length: u64,
}

pub struct Vivo<T> {
    pub extractor: Extractor<T>,
    probe_policy: ProbePolicy,
}

impl<T: HttpTransport> Vivo<T> {
    pub fn new(url: impl Into<String>, transport: T) -> Self {
        Self {
            extractor: Extractor::new("Vivo", url, transport),
            probe_policy: ProbePolicy::default(),
        }
    }

    pub fn with_probe_policy(mut self, policy: ProbePolicy) -> Self {
        self.probe_policy = policy;
        self
    }

    pub fn probe_policy(&self) -> ProbePolicy {
        self.probe_policy
    }

    /// Stream the media of an already resolved page into `sink`, sending the
    /// same headers used during resolution.
    pub async fn download<W>(
        &self,
        stream: &ResolvedStream,
        sink: &mut W,
    ) -> Result<u64, ExtractorError>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        self.download_with_progress(stream, sink, |_| {}).await
    }

    pub async fn download_with_progress<W, F>(
        &self,
        stream: &ResolvedStream,
        sink: &mut W,
        on_progress: F,
    ) -> Result<u64, ExtractorError>
    where
        W: AsyncWrite + Unpin + ?Sized,
        F: FnMut(u64) + Send,
    {
        copy_to_sink(
            stream,
            self.extractor.transport(),
            self.extractor.headers(),
            sink,
            on_progress,
        )
        .await
    }

    /// GET the media URL and keep only the response head. The body is
    /// dropped unread when this returns.
    async fn probe(&self, media_url: &str) -> Result<ProbeInfo, TransportError> {
        let response = self.extractor.get(media_url).await?;
        debug!(status = %response.status, url = %media_url, "Probed media");
        Ok(ProbeInfo {
            mime_type: response.content_type().unwrap_or_default().to_string(),
            length: response.content_length().unwrap_or(0),
        })
    }
}

#[async_trait]
impl<T: HttpTransport> PlatformExtractor for Vivo<T> {
    fn platform_name(&self) -> &str {
        &self.extractor.platform_name
    }

    fn page_url(&self) -> &str {
        &self.extractor.url
    }

    async fn extract(&self) -> Result<ResolvedStream, ExtractorError> {
        let page_url = normalize_url(&self.extractor.url)?;

        let html = {
            let response = self.extractor.get(&page_url).await?;
            if !response.status.is_success() {
                debug!(status = %response.status, url = %page_url, "Page returned non-OK status");
            }
            response.text().await?
        };

        let config = parse_stream_config(&html);
        let title = extract_title(&html).unwrap_or_default();

        let Some(source) = config.source else {
            return Err(ExtractorError::NoMediaFound(page_url));
        };

        let media_url = decode_source(&source)?;
        if media_url.trim().is_empty() {
            return Err(ExtractorError::NoMediaFound(page_url));
        }
        debug!(media_url = %media_url, "Decoded media url");

        let probe = match self.probe(&media_url).await {
            Ok(probe) => probe,
            Err(e) if self.probe_policy == ProbePolicy::Tolerate => {
                warn!(error = %e, url = %media_url, "Metadata probe failed; continuing without size");
                ProbeInfo::default()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ResolvedStream::builder(page_url, media_url)
            .title(title)
            .quality(config.quality.unwrap_or_default())
            .mime_type(probe.mime_type)
            .length(probe.length)
            .build())
    }
}

/// Resolve a page URL with the default (tolerant) probe policy.
pub async fn resolve<T>(page_url: &str, transport: &T) -> Result<ResolvedStream, ExtractorError>
where
    T: HttpTransport + ?Sized,
{
    Vivo::new(page_url, transport).extract().await
}
