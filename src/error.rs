use thiserror::Error;

/// Errors surfaced by the analyzer.
///
/// Validation problems are raised before any network call; a failed playlist
/// fetch is fatal, while per-artist lookup failures are downgraded to
/// warnings by the callers that can tolerate them.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("invalid playlist URL: {0}")]
    Validation(String),

    #[error("malformed catalog record: {0}")]
    Data(String),

    #[error("playlist has no tracks; scoring is undefined")]
    EmptyPlaylist,

    #[error("catalog request failed: {0}")]
    Upstream(String),
}
