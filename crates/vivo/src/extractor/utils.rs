use std::borrow::Cow;

use regex::Regex;

#[inline]
pub fn capture_group_1<'a>(re: &Regex, input: &'a str) -> Option<&'a str> {
    re.captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Decode the HTML entities that show up in page text: the named ones for
/// markup characters plus `&nbsp;`, and decimal / hex numeric references.
/// Unknown entities are left untouched.
pub fn decode_html_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            decode_entity(entity).map(|c| (c, end + 1))
        });

        match decoded {
            Some((c, consumed)) => {
                out.push(c);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_group_1() {
        let re = Regex::new(r"id=(\d+)").unwrap();
        assert_eq!(capture_group_1(&re, "x?id=42&y"), Some("42"));
        assert_eq!(capture_group_1(&re, "nothing"), None);
    }

    #[test]
    fn test_decode_html_entities() {
        assert_eq!(decode_html_entities("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(
            decode_html_entities("&quot;quoted&quot; &#39;single&#39;"),
            "\"quoted\" 'single'"
        );
        assert_eq!(decode_html_entities("caf&#xE9;"), "café");
        assert_eq!(decode_html_entities("a&nbsp;b"), "a b");
    }

    #[test]
    fn test_decode_html_entities_leaves_unknown() {
        assert_eq!(decode_html_entities("AT&T"), "AT&T");
        assert_eq!(decode_html_entities("&bogus; &"), "&bogus; &");
        assert!(matches!(
            decode_html_entities("plain text"),
            Cow::Borrowed(_)
        ));
    }
}
