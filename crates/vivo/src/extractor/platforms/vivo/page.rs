use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::extractor::utils::{capture_group_1, decode_html_entities};

static CONFIG_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"InitializeStream\s*\(\s*\{([\s\S]*?)\}\s*\)").unwrap()
});

static TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h1>Watch ([\s\S]+?)&nbsp;").unwrap());

/// Fields recognized in the page's `InitializeStream({...})` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamConfig {
    /// Quality label with the `p` suffix, e.g. `720p`.
    pub quality: Option<String>,
    /// Obfuscated, still percent-encoded media URL.
    pub source: Option<String>,
}

/// Locate and parse the stream configuration block. A page without a block
/// yields an empty config.
pub fn parse_stream_config(html: &str) -> StreamConfig {
    let mut config = StreamConfig::default();

    let Some(block) = capture_group_1(&CONFIG_BLOCK_REGEX, html) else {
        debug!("No InitializeStream block found");
        return config;
    };

    let block: String = block.chars().filter(|c| !matches!(c, '\t' | '\n' | '\r')).collect();

    for pair in split_top_level(&block) {
        let Some((key, value)) = pair.split_once(':') else {
            continue;
        };
        let key = unquote(key.trim());
        let value = unquote(value.trim()).trim();

        match key {
            "quality" => {
                let quality = decode_html_entities(value).trim().to_string();
                if !quality.is_empty() {
                    config.quality = Some(if quality.ends_with('p') {
                        quality
                    } else {
                        format!("{quality}p")
                    });
                }
            }
            // Passed to the decoder byte for byte.
            "source" if !value.is_empty() => config.source = Some(value.to_string()),
            _ => debug!(key, "Ignoring stream config field"),
        }
    }

    config
}

/// Title from the `<h1>Watch ...&nbsp;` heading, entity-decoded and trimmed.
pub fn extract_title(html: &str) -> Option<String> {
    capture_group_1(&TITLE_REGEX, html)
        .map(|raw| decode_html_entities(raw).trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Split on commas that are not inside a quoted value. Single and double
/// quotes are treated the same.
fn split_top_level(block: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in block.char_indices() {
        match (quote, c) {
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, ',') => {
                parts.push(&block[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&block[start..]);

    parts.into_iter().filter(|p| !p.trim().is_empty()).collect()
}

fn unquote(s: &str) -> &str {
    for q in ['\'', '"'] {
        if let Some(inner) = s.strip_prefix(q).and_then(|s| s.strip_suffix(q)) {
            return inner;
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_quoted_block() {
        let html = "<script>InitializeStream({quality: '720', source: '%33%34abc'});</script>";
        let config = parse_stream_config(html);
        assert_eq!(config.quality.as_deref(), Some("720p"));
        assert_eq!(config.source.as_deref(), Some("%33%34abc"));
    }

    #[test]
    fn test_parse_multiline_double_quoted_block() {
        let html = r#"
            <script>
            InitializeStream ( {
            	"source": "abc%2Cdef",
            	"quality": "1080",
            	"autoplay": true,
            	"poster": "https://img.example/a,b.jpg"
            } );
            </script>
        "#;
        let config = parse_stream_config(html);
        assert_eq!(config.quality.as_deref(), Some("1080p"));
        assert_eq!(config.source.as_deref(), Some("abc%2Cdef"));
    }

    #[test]
    fn test_commas_inside_quotes_do_not_split() {
        let html = "InitializeStream({title: 'a, b: c', source: 'x,y'})";
        let config = parse_stream_config(html);
        assert_eq!(config.source.as_deref(), Some("x,y"));
        assert_eq!(config.quality, None);
    }

    #[test]
    fn test_quality_suffix_not_doubled() {
        let config = parse_stream_config("InitializeStream({quality: '480p', source: 'x'})");
        assert_eq!(config.quality.as_deref(), Some("480p"));
    }

    #[test]
    fn test_unquoted_values() {
        let config = parse_stream_config("InitializeStream({quality: 360, source: abc})");
        assert_eq!(config.quality.as_deref(), Some("360p"));
        assert_eq!(config.source.as_deref(), Some("abc"));
    }

    #[test]
    fn test_source_keeps_entities_verbatim() {
        let config = parse_stream_config("InitializeStream({quality: '720&#112;', source: 'ab&amp;cd'})");
        assert_eq!(config.source.as_deref(), Some("ab&amp;cd"));
        assert_eq!(config.quality.as_deref(), Some("720p"));
    }

    #[test]
    fn test_missing_block_is_empty() {
        let config = parse_stream_config("<html><body>source: 'abc'</body></html>");
        assert_eq!(config, StreamConfig::default());
    }

    #[test]
    fn test_empty_source_is_none() {
        let config = parse_stream_config("InitializeStream({quality: '720', source: ''})");
        assert_eq!(config.source, None);
    }

    #[test]
    fn test_extract_title() {
        let html = "<h1>Watch Big &amp; Small&nbsp;<strong>720p</strong></h1>";
        assert_eq!(extract_title(html).as_deref(), Some("Big & Small"));
    }

    #[test]
    fn test_extract_title_stops_at_first_nbsp() {
        let html = "<h1>Watch First&nbsp;<strong>x</strong></h1><p>a&nbsp;b</p>";
        assert_eq!(extract_title(html).as_deref(), Some("First"));
    }

    #[test]
    fn test_extract_title_missing() {
        assert_eq!(extract_title("<h1>Something else</h1>"), None);
        assert_eq!(extract_title("<h1>Watch &nbsp;</h1>"), None);
    }
}
