//! Display-name and extension derivation for fetched files.
//!
//! The streaming path names files by caller-supplied prefix plus the URL's
//! extension; the single-file path derives a human-facing display name from
//! the Content-Disposition header with a URL-basename fallback.

use url::Url;

/// Extracts the extension (including the leading dot) from a URL's last path
/// segment, e.g. `".zip"` for `https://host/data/set.zip`.
///
/// Returns `None` when the segment has no usable suffix. Suffixes longer
/// than 12 characters are rejected as query-like noise.
#[must_use]
pub fn extension_from_url(url: &Url) -> Option<String> {
    let last_segment = url.path_segments()?.next_back()?;
    let dot_index = last_segment.rfind('.')?;
    let ext = &last_segment[dot_index..];
    if ext.len() <= 1 || ext.len() > 12 {
        return None;
    }
    Some(ext.to_lowercase())
}

/// Derives a display name from a URL: the last path segment, percent-decoded.
///
/// May be empty when the URL has no path (`https://host/`); callers treat
/// that the same way a response with no usable name is treated.
#[must_use]
pub fn display_name_from_url(url: &Url) -> String {
    let Some(last) = url.path_segments().and_then(|mut s| s.next_back()) else {
        return String::new();
    };
    urlencoding::decode(last)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| last.to_string())
}

/// Returns the file type of a display name: the extension without its dot,
/// or an empty string when there is none.
///
/// A leading dot alone (`.profile`) is a hidden-file marker, not an
/// extension.
#[must_use]
pub fn file_type_from_name(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) if pos > 0 => name[pos + 1..].to_string(),
        _ => String::new(),
    }
}

/// Parses a Content-Disposition header to extract the filename parameter.
///
/// Handles:
/// - `attachment; filename="example.zip"`
/// - `attachment; filename=example.zip`
/// - `attachment; filename*=UTF-8''example.zip` (RFC 5987)
#[must_use]
pub fn parse_content_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            let encoded_name = encoded[..end].trim();
            if let Ok(decoded) = urlencoding::decode(encoded_name) {
                return Some(decoded.into_owned());
            }
        }
    }

    // Try regular filename=
    if let Some(pos) = header.find("filename=") {
        let value = header[pos + 9..].trim();

        // Handle quoted filename
        if let Some(stripped) = value.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                return Some(stripped[..end].to_string());
            }
        } else {
            // Unquoted - take until ; or end
            let end = value.find(';').unwrap_or(value.len());
            let filename = value[..end].trim();
            if !filename.is_empty() {
                return Some(filename.to_string());
            }
        }
    }

    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extension_from_url_simple() {
        assert_eq!(
            extension_from_url(&url("https://example.com/files/data.zip")),
            Some(".zip".to_string())
        );
    }

    #[test]
    fn test_extension_from_url_lowercases() {
        assert_eq!(
            extension_from_url(&url("https://example.com/Data.PNG")),
            Some(".png".to_string())
        );
    }

    #[test]
    fn test_extension_from_url_missing() {
        assert_eq!(extension_from_url(&url("https://example.com/files")), None);
        assert_eq!(extension_from_url(&url("https://example.com/")), None);
    }

    #[test]
    fn test_extension_from_url_rejects_overlong_suffix() {
        assert_eq!(
            extension_from_url(&url("https://example.com/file.tooooooooolong")),
            None
        );
    }

    #[test]
    fn test_display_name_from_url_basename() {
        assert_eq!(
            display_name_from_url(&url("https://example.com/sets/train.zip")),
            "train.zip"
        );
    }

    #[test]
    fn test_display_name_from_url_percent_decoded() {
        assert_eq!(
            display_name_from_url(&url("https://example.com/my%20set.zip")),
            "my set.zip"
        );
    }

    #[test]
    fn test_display_name_from_url_empty_path() {
        assert_eq!(display_name_from_url(&url("https://example.com/")), "");
    }

    #[test]
    fn test_file_type_from_name() {
        assert_eq!(file_type_from_name("train.zip"), "zip");
        assert_eq!(file_type_from_name("photo.final.JPG"), "JPG");
        assert_eq!(file_type_from_name("README"), "");
        assert_eq!(file_type_from_name(".profile"), "");
        assert_eq!(file_type_from_name(""), "");
    }

    #[test]
    fn test_parse_content_disposition_quoted() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="data.txt""#),
            Some("data.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_unquoted() {
        assert_eq!(
            parse_content_disposition("attachment; filename=data.txt"),
            Some("data.txt".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_rfc5987() {
        assert_eq!(
            parse_content_disposition("attachment; filename*=UTF-8''my%20set.zip"),
            Some("my set.zip".to_string())
        );
    }

    #[test]
    fn test_parse_content_disposition_absent_filename() {
        assert_eq!(parse_content_disposition("inline"), None);
        assert_eq!(parse_content_disposition(""), None);
    }
}
