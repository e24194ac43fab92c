use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading response body from {url} failed: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransferError {
    /// The request never completed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The server answered with something other than 200 OK.
    #[error("response was not OK (status {0})")]
    Status(u16),
    /// The server answered an upload with a message instead of a link.
    #[error("{0}")]
    Rejected(String),
    #[error("invalid file {path}: {reason}")]
    InvalidFile { path: String, reason: String },
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("could not write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid origin {origin:?}: {reason}")]
    InvalidOrigin { origin: String, reason: String },
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
}
