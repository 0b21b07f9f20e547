use crate::extractor::error::ExtractorError;

/// Rotate every printable ASCII character (33..=126) by 47 positions.
/// Everything else passes through. The rotation is its own inverse.
pub fn rot47(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            let code = c as u32;
            if (33..=126).contains(&code) {
                char::from_u32(33 + ((code + 14) % 94)).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Query-style percent decoding: `+` is a space, `%XX` is a byte, and any
/// other use of `%` is an error. The decoded bytes must be UTF-8.
pub fn query_unescape(input: &str) -> Result<String, ExtractorError> {
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                let end = (i + 3).min(bytes.len());
                return Err(ExtractorError::DecodeError(format!(
                    "invalid escape {:?} at offset {i}",
                    String::from_utf8_lossy(&bytes[i..end])
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    let spaced = input.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| ExtractorError::DecodeError(e.to_string()))
}

/// Turn the obfuscated `source` value from the page into the media URL.
pub fn decode_source(source: &str) -> Result<String, ExtractorError> {
    let unescaped = query_unescape(source)?;
    Ok(rot47(&unescaped))
}
