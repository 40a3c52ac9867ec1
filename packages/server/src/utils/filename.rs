/// Sanitizes an externally supplied filename or user-id segment before it is
/// used to build a storage path.
///
/// Newline and carriage-return characters break the storage backends' path
/// handling and are stripped; everything else is preserved so stored names
/// stay recognizable.
pub fn sanitize(input: &str) -> String {
    input.replace(['\n', '\r'], "")
}

/// Extracts the trailing path segment of a public blob URL.
///
/// Used on delete to locate the stored image of a listing from its
/// `image_url`. Returns `None` for empty input or URLs ending in `/`.
pub fn trailing_url_segment(url: &str) -> Option<&str> {
    let segment = url.rsplit('/').next()?;
    if segment.is_empty() { None } else { Some(segment) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_newlines_and_carriage_returns() {
        assert_eq!(sanitize("photo\n.jpg"), "photo.jpg");
        assert_eq!(sanitize("user\r\nid"), "userid");
        assert_eq!(sanitize("\r\n"), "");
    }

    #[test]
    fn sanitize_preserves_everything_else() {
        assert_eq!(sanitize("my photo (1).JPG"), "my photo (1).JPG");
        assert_eq!(sanitize("ünïcode.png"), "ünïcode.png");
        assert_eq!(sanitize("a\tb"), "a\tb");
    }

    #[test]
    fn trailing_url_segment_takes_the_last_component() {
        assert_eq!(
            trailing_url_segment("http://host/media/images/u1/abc_photo.jpg"),
            Some("abc_photo.jpg")
        );
        assert_eq!(trailing_url_segment("bare-name.png"), Some("bare-name.png"));
    }

    #[test]
    fn trailing_url_segment_rejects_empty() {
        assert_eq!(trailing_url_segment(""), None);
        assert_eq!(trailing_url_segment("http://host/media/"), None);
    }
}
