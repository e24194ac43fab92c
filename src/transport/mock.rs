use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::Mutex;

use super::{RawResponse, TransferRequest, Transport};
use crate::error::TransportError;

pub enum Reply {
    Respond(u16, Bytes),
    Unreachable,
}

/// Replays canned replies in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<TransferRequest>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Reply>) -> Self {
        MockTransport {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(status: u16, body: &'static [u8]) -> Self {
        MockTransport::new(vec![Reply::Respond(status, Bytes::from_static(body))])
    }

    pub fn unreachable() -> Self {
        MockTransport::new(vec![Reply::Unreachable])
    }

    pub fn requests(&self) -> Vec<TransferRequest> {
        self.requests.lock().unwrap().clone()
    }
}

// A real reqwest::Error, produced without touching the network.
fn request_error() -> reqwest::Error {
    reqwest::Client::new().get("http://").build().unwrap_err()
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransferRequest) -> Result<RawResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Respond(status, body)) => Ok(RawResponse { status, body }),
            Some(Reply::Unreachable) | None => Err(TransportError::Request {
                url,
                source: request_error(),
            }),
        }
    }
}
