use plantbuddy_api::Id;

/// Failures of a single call against the remote state store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("Device {0} not found")]
    NotFound(Id),

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Write rejected by a concurrent update")]
    Conflict,
}

impl RemoteError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::NetworkFailure(message.into())
    }

    /// Transient failures are expected to clear on a later tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::NetworkFailure(_) | RemoteError::Conflict)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::NetworkFailure(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type Result<T> = std::result::Result<T, Error>;
