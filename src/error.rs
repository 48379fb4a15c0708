use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ScaffoldError {
    #[error("directory already exists: {0}")]
    #[diagnostic(help("remove the partial service tree before running again"))]
    PathCollision(Utf8PathBuf),

    #[error("lablog request to {url} failed: {message}")]
    FetchHttp { url: String, message: String },

    #[error("lablog request to {url} returned status {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("failed to render {stage} lablog: {message}")]
    Template { stage: String, message: String },

    #[error("network access is disabled in offline mode: {0}")]
    NetworkDisabled(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

impl ScaffoldError {
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            ScaffoldError::FetchHttp { .. } | ScaffoldError::FetchStatus { .. }
        )
    }
}
