use std::sync::LazyLock;

use regex::Regex;

use crate::extractor::error::ExtractorError;

pub static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<scheme>https?://)?vivo\.(?:sx|st)/(?:embed/)?.{10,}").unwrap()
});

/// Validate a page URL and rewrite it to its canonical form: scheme-qualified
/// and without the `embed/` segment. No network access happens here.
pub fn normalize_url(input: &str) -> Result<String, ExtractorError> {
    let trimmed = input.trim();
    let url = trimmed.strip_suffix('/').unwrap_or(trimmed);

    let caps = URL_REGEX
        .captures(url)
        .ok_or_else(|| ExtractorError::InvalidUrl(input.to_string()))?;

    let mut url = if caps.name("scheme").is_some() {
        url.to_string()
    } else {
        format!("https://{url}")
    };

    if url.contains("/embed/") {
        url = url.replace("/embed/", "/");
    }

    Ok(url)
}
