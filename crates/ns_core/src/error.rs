use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Please add at least one keyword")]
    EmptyKeywords,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Server error: {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Errors raised before any request is issued.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::EmptyKeywords | Error::Validation(_) | Error::InvalidUrl(_))
    }

    /// Errors raised by a request that reached (or tried to reach) the backend.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Server { .. } | Error::Parse(_))
    }
}

/// Every reqwest failure in the client goes through `?`, so this is the one
/// place deciding between transport, server and parse errors.
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Error::Parse(err.to_string());
        }
        if let Some(status) = err.status() {
            return Error::Server {
                status: status.as_u16(),
                body: err.to_string(),
            };
        }
        Error::Transport(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::EmptyKeywords.is_validation());
        assert!(!Error::EmptyKeywords.is_fetch());

        let server = Error::Server { status: 503, body: "down".to_string() };
        assert!(server.is_fetch());
        assert_eq!(server.to_string(), "Server error: 503: down");

        assert!(Error::Parse("bad json".to_string()).is_fetch());
        assert!(!Error::Storage("disk full".to_string()).is_fetch());
    }

    #[test]
    fn test_reqwest_error_without_status_is_transport() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let err = Error::from(err);
        assert!(matches!(err, Error::Transport(_)));
        assert!(err.is_fetch());
    }
}
