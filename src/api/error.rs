/// Failures surfaced by the backend client.
///
/// Non-2xx statuses are "expected" failures; `message` carries the
/// server-provided reason when the body has one, or the caller's fixed
/// description otherwise.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to send http request: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("Failed to parse response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("Invalid request url: {0}")]
    Url(#[from] url::ParseError),
}
