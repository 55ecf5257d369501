//! Transport helpers shared by the reqwest adapters.

use reqwest::{StatusCode, Url};

const PREVIEW_CHAR_LIMIT: usize = 160;

/// How an unsuccessful HTTP status should surface through a port error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusFailure {
    RateLimited,
    Timeout,
    InvalidRequest,
    Transport,
}

/// Classify a non-success status: 429 is rate limiting, 408/504 are
/// timeouts, other 4xx are rejected requests and everything else is a
/// transport failure.
pub(crate) fn classify_status(status: StatusCode) -> StatusFailure {
    match status {
        StatusCode::TOO_MANY_REQUESTS => StatusFailure::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => StatusFailure::Timeout,
        _ if status.is_client_error() => StatusFailure::InvalidRequest,
        _ => StatusFailure::Transport,
    }
}

/// `status N` or `status N: <body preview>`.
pub(crate) fn status_message(status: StatusCode, body: &[u8]) -> String {
    let preview = body_preview(body);
    if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    }
}

/// Whitespace-collapsed body text, cut to 160 characters.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

/// Append path segments to `base`. Segments are pushed verbatim, so names
/// such as `odpt:Station` are never read as a URL scheme.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .extend(segments);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, StatusFailure::RateLimited)]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT, StatusFailure::Timeout)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, StatusFailure::Timeout)]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, StatusFailure::InvalidRequest)]
    #[case::bad_request(StatusCode::BAD_REQUEST, StatusFailure::InvalidRequest)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, StatusFailure::Transport)]
    #[case::bad_gateway(StatusCode::BAD_GATEWAY, StatusFailure::Transport)]
    fn classifies_statuses(#[case] status: StatusCode, #[case] expected: StatusFailure) {
        assert_eq!(classify_status(status), expected);
    }

    #[test]
    fn preview_collapses_whitespace_and_truncates() {
        let body = format!("  {}\n\t tail", "x".repeat(200));
        let preview = body_preview(body.as_bytes());

        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
        assert!(!preview.contains('\n'));
    }

    #[test]
    fn status_message_omits_empty_body() {
        assert_eq!(status_message(StatusCode::BAD_GATEWAY, b"  "), "status 502");
        assert_eq!(
            status_message(StatusCode::FORBIDDEN, b"{\"title\": \"bad key\"}"),
            "status 403: {\"title\": \"bad key\"}"
        );
    }

    #[rstest]
    #[case::trailing_slash("https://api.odpt.org/api/v4/")]
    #[case::no_trailing_slash("https://api.odpt.org/api/v4")]
    fn endpoint_url_appends_segments(#[case] base: &str) {
        let base = Url::parse(base).expect("valid base");

        let url = endpoint_url(&base, &["odpt:Station"]).expect("base can hold a path");

        assert_eq!(url.as_str(), "https://api.odpt.org/api/v4/odpt:Station");
    }

    #[test]
    fn endpoint_url_supports_nested_paths() {
        let base = Url::parse("https://maps.googleapis.com/maps/api/").expect("valid base");

        let url = endpoint_url(&base, &["place", "textsearch", "json"]).expect("path");

        assert_eq!(
            url.as_str(),
            "https://maps.googleapis.com/maps/api/place/textsearch/json"
        );
    }
}
