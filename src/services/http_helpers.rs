use reqwest::{StatusCode, Url};

use crate::errors::{AttemptError, AttemptResult};

/// Appends percent-encoded path segments to the API base URL.
pub fn endpoint(base_url: &str, segments: &[&str]) -> AttemptResult<Url> {
    let mut url = Url::parse(base_url).map_err(|e| {
        AttemptError::ValidationError(format!("Invalid API base URL '{}': {}", base_url, e))
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            AttemptError::ValidationError(format!("API base URL '{}' cannot be a base", base_url))
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// Maps a non-success HTTP status to the matching error
pub fn error_for_status(status: StatusCode, body: &str) -> AttemptError {
    let detail = if body.trim().is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.trim())
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AttemptError::Unauthorized(detail),
        StatusCode::NOT_FOUND => AttemptError::NotFound(detail),
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            AttemptError::ValidationError(detail)
        }
        s if s.is_server_error() => AttemptError::ServerError(detail),
        _ => AttemptError::InternalError(detail),
    }
}
