use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("server unreachable: {0}")]
    Offline(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("request worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    /// Classify a transport failure. Connection-level failures mean the
    /// client has no route to the server and are reported as offline.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            ApiError::Offline(err.to_string())
        } else {
            ApiError::Transport(err)
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, ApiError::Offline(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid WORKOUT_API_BASE '{value}': {reason}")]
    BaseUrl { value: String, reason: String },

    #[error("WORKOUT_API_TIMEOUT_SECS must be a whole number of seconds, got '{0}'")]
    Timeout(String),

    #[error("WORKOUT_SESSION_COOKIE is not a valid header value")]
    Cookie,

    #[error("failed to build http client: {0}")]
    Client(String),
}
