use thiserror::Error;

/// Failure of the catalog collaborator. The loader recovers from it through
/// its fallback policy; it is never returned from `fetch_catalog`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("catalog request timed out")]
    Timeout,
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("catalog endpoint returned status {0}")]
    Status(u16),
    #[error("catalog response could not be decoded: {0}")]
    Decode(String),
    #[error("catalog response contained no usable products")]
    Empty,
    #[error("catalog source unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::Status(status.as_u16())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err)
        }
    }
}
