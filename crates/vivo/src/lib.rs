//! Resolve direct media URLs from vivo.sx / vivo.st pages and stream them to a sink.
//!
//! Resolution takes the page URL and an [`HttpTransport`]. The transport is
//! always passed in by the caller; this crate keeps no global client.
//!
//! ```rust,no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use vivo_parser::{ClientOptions, ReqwestTransport, download, resolve};
//!
//! let transport = ReqwestTransport::new(&ClientOptions::default())?;
//! let stream = resolve("vivo.sx/abcdefghij", &transport).await?;
//! let mut file = tokio::fs::File::create(stream.stream_id()).await?;
//! download(&stream, &transport, &mut file).await?;
//! # Ok(())
//! # }
//! ```

pub mod extractor;
pub mod media;
pub mod transport;

pub use extractor::download::{download, download_with_progress};
pub use extractor::error::ExtractorError;
pub use extractor::platforms::vivo::{ProbePolicy, Vivo, resolve};
pub use media::ResolvedStream;
pub use transport::{
    ClientOptions, HttpTransport, ProxyConfig, ProxyType, ReqwestTransport, TransportError,
    TransportResponse,
};
