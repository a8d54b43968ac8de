use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build request URL: {0}")]
    Url(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned status {status}")]
    Remote {
        status: u16,
        /// `message` field of the backend's error body, if any.
        message: Option<String>,
    },
}

impl ClientError {
    /// Message the backend supplied for this failure.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ClientError::Remote {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}
