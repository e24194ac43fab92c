use async_trait::async_trait;
use bytes::BytesMut;
use futures_util::stream::StreamExt;
use std::time::Duration;

use super::{RawResponse, TransferRequest, Transport};
use crate::error::TransportError;
use crate::utils;

const USER_AGENT: &str = concat!("crabdrop/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpTransport {
    /// `idle_timeout` bounds connecting and each wait for the next chunk,
    /// never the whole transfer.
    pub fn new(idle_timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(idle_timeout)
            .read_timeout(idle_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(HttpTransport {
            client,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransferRequest) -> Result<RawResponse, TransportError> {
        let TransferRequest { method, url, body } = request;
        tracing::debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method.as_http(), &url);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status().as_u16();
        let pb = utils::create_progress_bar(response.content_length(), self.show_progress);

        // Read the body chunk by chunk so large downloads can report progress
        let mut stream = response.bytes_stream();
        let mut data = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| TransportError::Body {
                url: url.clone(),
                source,
            })?;
            pb.inc(chunk.len() as u64);
            data.extend_from_slice(&chunk);
        }
        pb.finish_and_clear();

        tracing::debug!(%method, %url, status, bytes = data.len(), "response received");

        Ok(RawResponse {
            status,
            body: data.freeze(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::HttpTransport;
    use crate::error::TransportError;
    use crate::transport::{TransferRequest, Transport};
    use bytes::Bytes;
    use std::io::Write;
    use std::time::Duration;

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn should_put_body_and_read_text_reply() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/notes%20v2.txt")
            .match_body("hello")
            .with_status(200)
            .with_body("http://files.example/ab12cd/notes v2.txt\r\n")
            .create_async()
            .await;

        let url = format!("{}/notes%20v2.txt", server.url());
        let response = transport()
            .send(TransferRequest::store(url, Bytes::from_static(b"hello")))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(
            &response.body[..],
            b"http://files.example/ab12cd/notes v2.txt\r\n"
        );
    }

    #[tokio::test]
    async fn should_return_status_and_body_for_get() {
        let mut server = mockito::Server::new_async().await;
        let payload = vec![0u8, 159, 146, 150, 255];
        server
            .mock("GET", "/ab12cd/blob.bin")
            .with_status(200)
            .with_body(payload.clone())
            .create_async()
            .await;

        let url = format!("{}/ab12cd/blob.bin", server.url());
        let response = transport()
            .send(TransferRequest::retrieve(url))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body.to_vec(), payload);
    }

    #[tokio::test]
    async fn should_pass_error_statuses_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/ab12cd/gone.txt")
            .with_status(404)
            .with_body("Failed to delete \"ab12cd/gone.txt\"")
            .create_async()
            .await;

        let url = format!("{}/ab12cd/gone.txt", server.url());
        let response = transport()
            .send(TransferRequest::remove(url))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn should_keep_reading_slow_but_steady_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ab12cd/slow.bin")
            .with_status(200)
            .with_chunked_body(|w| {
                for chunk in [b"ab", b"cd", b"ef"] {
                    std::thread::sleep(Duration::from_millis(600));
                    w.write_all(chunk)?;
                }
                Ok(())
            })
            .create_async()
            .await;

        // Whole body takes longer than the timeout, no single gap does
        let url = format!("{}/ab12cd/slow.bin", server.url());
        let response = HttpTransport::new(Duration::from_secs(1))
            .unwrap()
            .send(TransferRequest::retrieve(url))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], b"abcdef");
    }

    #[tokio::test]
    async fn should_fail_when_body_stalls() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ab12cd/stuck.bin")
            .with_status(200)
            .with_chunked_body(|w| {
                w.write_all(b"ab")?;
                std::thread::sleep(Duration::from_millis(2500));
                w.write_all(b"cd")
            })
            .create_async()
            .await;

        let url = format!("{}/ab12cd/stuck.bin", server.url());
        let result = HttpTransport::new(Duration::from_secs(1))
            .unwrap()
            .send(TransferRequest::retrieve(url))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn should_fail_when_server_is_unreachable() {
        // Port 9 (discard) is closed on test machines
        let result = transport()
            .send(TransferRequest::retrieve(
                "http://127.0.0.1:9/missing".to_owned(),
            ))
            .await;

        assert!(matches!(result, Err(TransportError::Request { .. })));
    }
}
