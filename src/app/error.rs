use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtifyError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid artwork id: {0}")]
    InvalidArtworkId(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl ArtifyError {
    /// Whether this is a missing-or-rejected credential.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ArtifyError::Unauthenticated)
    }

    /// Whether this came back from a status-check endpoint meaning
    /// "no interaction yet" rather than a real failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ArtifyError::Api { status: 404, .. })
    }
}

impl From<crate::config::ConfigError> for ArtifyError {
    fn from(e: crate::config::ConfigError) -> Self {
        ArtifyError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArtifyError>;
