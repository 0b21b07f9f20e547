use serde::Serialize;
use std::fmt;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// The result of resolving a vivo page: where the media lives and what the
/// server reported about it.
///
/// Instances are built once by the resolver and never mutated afterwards.
/// `media_url` is guaranteed non-empty for any value returned by
/// [`crate::resolve`].
///
/// # Examples
///
/// ```rust
/// use vivo_parser::media::ResolvedStream;
///
/// let stream = ResolvedStream::builder("https://vivo.sx/abcdefghij", "https://node.example/v.mp4")
///     .title("Sample")
///     .quality("720p")
///     .mime_type("video/mp4")
///     .length(1024)
///     .build();
/// assert_eq!(stream.stream_id(), "abcdefghij");
/// ```
pub struct ResolvedStream {
    page_url: String,
    stream_id: String,
    title: String,
    media_url: String,
    mime_type: String,
    quality: String,
    length: u64,
}

#[derive(Debug, Clone)]
pub struct ResolvedStreamBuilder {
    page_url: String,
    media_url: String,
    title: String,
    mime_type: String,
    quality: String,
    length: u64,
}

impl ResolvedStream {
    pub fn builder(
        page_url: impl Into<String>,
        media_url: impl Into<String>,
    ) -> ResolvedStreamBuilder {
        ResolvedStreamBuilder::new(page_url, media_url)
    }

    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    pub fn stream_id(&self) -> &str {
        &self.stream_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn media_url(&self) -> &str {
        &self.media_url
    }

    /// Content type reported by the metadata probe, empty when unknown.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn quality(&self) -> &str {
        &self.quality
    }

    /// Size in bytes reported by the metadata probe, zero when unknown.
    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn length_mb(&self) -> f64 {
        self.length as f64 / 1024.0 / 1024.0
    }

    /// Serialize the ResolvedStream to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize the ResolvedStream to a pretty-formatted JSON string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert to a serde_json::Value for flexible manipulation
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl fmt::Display for ResolvedStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quality.is_empty() {
            write!(f, "{} ({})", self.stream_id, self.media_url)
        } else {
            write!(
                f,
                "{} - {} ({})",
                self.stream_id, self.quality, self.media_url
            )
        }
    }
}

impl ResolvedStreamBuilder {
    pub fn new(page_url: impl Into<String>, media_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            media_url: media_url.into(),
            title: String::new(),
            mime_type: String::new(),
            quality: String::new(),
            length: 0,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = quality.into();
        self
    }

    pub fn length(mut self, length: u64) -> Self {
        self.length = length;
        self
    }

    pub fn build(self) -> ResolvedStream {
        let page_url = self.page_url.trim().to_string();
        let stream_id = page_url
            .rsplit_once('/')
            .map(|(_, id)| id.to_string())
            .unwrap_or_default();

        ResolvedStream {
            page_url,
            stream_id,
            title: self.title.trim().to_string(),
            media_url: self.media_url.trim().to_string(),
            mime_type: self.mime_type.trim().to_string(),
            quality: self.quality.trim().to_string(),
            length: self.length,
        }
    }
}
