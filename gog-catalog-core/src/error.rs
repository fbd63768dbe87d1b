/// Errors returned by host store and upload implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Request to host failed: {0}")]
    Transport(String),

    #[error("Host returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected host response: {0}")]
    Decode(String),

    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub fn transport(msg: impl ToString) -> Self {
        Self::Transport(msg.to_string())
    }

    pub fn decode(msg: impl ToString) -> Self {
        Self::Decode(msg.to_string())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
