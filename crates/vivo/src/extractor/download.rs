use futures::StreamExt;
use reqwest::header::HeaderMap;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use super::error::ExtractorError;
use super::platform_extractor::default_headers;
use crate::media::ResolvedStream;
use crate::transport::HttpTransport;

/// Stream the media bytes of `stream` into `sink`.
///
/// Returns the number of bytes written. The sink is flushed on success and
/// left as-is on failure, so a partially written sink is possible.
pub async fn download<T, W>(
    stream: &ResolvedStream,
    transport: &T,
    sink: &mut W,
) -> Result<u64, ExtractorError>
where
    T: HttpTransport + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    download_with_progress(stream, transport, sink, |_| {}).await
}

/// Like [`download`], reporting the running byte count after every chunk.
pub async fn download_with_progress<T, W, F>(
    stream: &ResolvedStream,
    transport: &T,
    sink: &mut W,
    on_progress: F,
) -> Result<u64, ExtractorError>
where
    T: HttpTransport + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
    F: FnMut(u64) + Send,
{
    copy_to_sink(stream, transport, &default_headers(), sink, on_progress).await
}

pub(crate) async fn copy_to_sink<T, W, F>(
    stream: &ResolvedStream,
    transport: &T,
    headers: &HeaderMap,
    sink: &mut W,
    mut on_progress: F,
) -> Result<u64, ExtractorError>
where
    T: HttpTransport + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
    F: FnMut(u64) + Send,
{
    let url = stream.media_url();
    debug!(url = %url, "Starting download");

    let mut response = transport
        .get(url, headers)
        .await
        .map_err(|e| ExtractorError::DownloadError(format!("request failed: {e}")))?;

    if !response.status.is_success() {
        debug!(status = %response.status, "Media request returned non-OK status");
    }

    let mut written: u64 = 0;
    while let Some(chunk) = response.body.next().await {
        let chunk = chunk
            .map_err(|e| ExtractorError::DownloadError(format!("read failed after {written} bytes: {e}")))?;
        sink.write_all(&chunk)
            .await
            .map_err(|e| ExtractorError::DownloadError(format!("write failed: {e}")))?;
        written += chunk.len() as u64;
        on_progress(written);
    }

    sink.flush()
        .await
        .map_err(|e| ExtractorError::DownloadError(format!("flush failed: {e}")))?;

    debug!(bytes = written, stream_id = %stream.stream_id(), "Download finished");
    Ok(written)
}
