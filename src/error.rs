use thiserror::Error;

#[derive(Error, Debug)]
pub enum HacktoberError {
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
    },

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HacktoberError {
    #[cfg(test)]
    pub fn api(message: impl Into<String>) -> Self {
        HacktoberError::Api {
            status: None,
            message: message.into(),
        }
    }

    /// Transport failures without a status, server errors, timeouts and
    /// secondary rate limits are worth another attempt. Everything else is final.
    pub fn is_retryable(&self) -> bool {
        match self {
            HacktoberError::Api { status: None, .. } => true,
            HacktoberError::Api {
                status: Some(code), ..
            } => *code >= 500 || *code == 408 || *code == 429,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, HacktoberError>;
