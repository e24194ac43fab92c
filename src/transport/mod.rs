use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;

use crate::error::TransportError;

pub mod http;
#[cfg(test)]
pub mod mock;

/// The three exchanges the file drop server understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Store,
    Retrieve,
    Remove,
}

impl Method {
    pub fn as_http(self) -> reqwest::Method {
        match self {
            Method::Store => reqwest::Method::PUT,
            Method::Retrieve => reqwest::Method::GET,
            Method::Remove => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_http())
    }
}

#[derive(Clone, Debug)]
pub struct TransferRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Bytes>,
}

impl TransferRequest {
    pub fn store(url: String, body: Bytes) -> Self {
        TransferRequest {
            method: Method::Store,
            url,
            body: Some(body),
        }
    }

    pub fn retrieve(url: String) -> Self {
        TransferRequest {
            method: Method::Retrieve,
            url,
            body: None,
        }
    }

    pub fn remove(url: String) -> Self {
        TransferRequest {
            method: Method::Remove,
            url,
            body: None,
        }
    }
}

/// A fully read response. Bodies are small enough to hold in memory.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: Bytes,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransferRequest) -> Result<RawResponse, TransportError>;
}
