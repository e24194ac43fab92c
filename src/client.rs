use bytes::Bytes;
use futures_util::future::join_all;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::{path::Path, sync::Arc};

use crate::{
    endpoint::{self, Location},
    error::TransferError,
    render::{self, Region, StatusSink},
    save::SaveTrigger,
    transport::{TransferRequest, Transport},
};

/// Upload replies starting with this are links to the stored file.
pub const UPLOAD_LINK_PREFIX: &str = "http://";

/// Everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the set browsers
/// leave alone in `encodeURIComponent`. The server stores the path segment
/// as sent, so the escaped set has to match exactly.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_file_name(name: &str) -> String {
    utf8_percent_encode(name, URI_COMPONENT).to_string()
}

pub fn upload_path(location: &dyn Location, file_name: &str) -> String {
    endpoint::request_url(location, &encode_file_name(file_name))
}

/// Anything that is not a link is a message from the server, shown as is.
pub fn interpret_upload_body(body: &str) -> Result<String, TransferError> {
    if body.starts_with(UPLOAD_LINK_PREFIX) {
        Ok(body.to_owned())
    } else {
        Err(TransferError::Rejected(body.to_owned()))
    }
}

pub struct TransferClient {
    transport: Arc<dyn Transport>,
    location: Arc<dyn Location>,
    saver: Arc<dyn SaveTrigger>,
    sink: Arc<dyn StatusSink>,
}

impl TransferClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        location: Arc<dyn Location>,
        saver: Arc<dyn SaveTrigger>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        TransferClient {
            transport,
            location,
            saver,
            sink,
        }
    }

    pub async fn upload(&self, file_name: &str, content: Bytes) -> Result<String, TransferError> {
        let url = upload_path(self.location.as_ref(), file_name);
        let response = self
            .transport
            .send(TransferRequest::store(url, content))
            .await?;

        interpret_upload_body(&String::from_utf8_lossy(&response.body))
    }

    pub async fn upload_file(&self, file_path: &Path) -> Result<String, TransferError> {
        let invalid = |reason: String| TransferError::InvalidFile {
            path: file_path.display().to_string(),
            reason,
        };

        let file_name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| invalid("path does not contain a file name".to_owned()))?;

        let content = tokio::fs::read(file_path)
            .await
            .map_err(|e| invalid(e.to_string()))?;

        self.upload(&file_name, content.into()).await
    }

    pub async fn download(&self, id: &str) -> Result<Bytes, TransferError> {
        let url = endpoint::request_url(self.location.as_ref(), id);
        let response = self.transport.send(TransferRequest::retrieve(url)).await?;

        if response.status != 200 {
            return Err(TransferError::Status(response.status));
        }

        Ok(response.body)
    }

    /// Any response at all counts as a completed delete. Only a request that
    /// never got an answer is an error.
    pub async fn delete(&self, id: &str) -> Result<u16, TransferError> {
        let url = endpoint::request_url(self.location.as_ref(), id);
        let response = self.transport.send(TransferRequest::remove(url)).await?;

        if !(200..300).contains(&response.status) {
            tracing::warn!(
                id,
                status = response.status,
                body = %String::from_utf8_lossy(&response.body).trim_end(),
                "server did not confirm delete"
            );
        }

        Ok(response.status)
    }

    pub async fn handle_upload(&self, file_path: &Path) {
        let outcome = self.upload_file(file_path).await;
        match &outcome {
            Ok(url) => tracing::info!(file = %file_path.display(), url = url.trim_end(), "uploaded"),
            Err(e) => tracing::error!(file = %file_path.display(), "upload failed: {}", e),
        }
        self.sink.show(Region::Upload, render::render_upload(&outcome));
    }

    pub async fn handle_download(&self, id: &str) {
        let outcome = match self.download(id).await {
            Ok(payload) => self.saver.save(id, &payload).await.map_err(TransferError::from),
            Err(e) => Err(e),
        };
        match &outcome {
            Ok(path) => tracing::info!(id, path = %path.display(), "downloaded"),
            Err(e) => tracing::error!(id, "download failed: {}", e),
        }
        self.sink
            .show(Region::Download, render::render_download(id, &outcome));
    }

    pub async fn handle_delete(&self, id: &str) {
        let outcome = self.delete(id).await;
        if let Err(e) = &outcome {
            tracing::error!(id, "delete failed: {}", e);
        }
        self.sink
            .show(Region::Delete, render::render_delete(id, &outcome));
    }

    // The batch handlers run every transfer at once; outcomes land in any order.

    pub async fn handle_uploads(&self, file_paths: &[impl AsRef<Path>]) {
        join_all(file_paths.iter().map(|path| self.handle_upload(path.as_ref()))).await;
    }

    pub async fn handle_downloads(&self, ids: &[String]) {
        join_all(ids.iter().map(|id| self.handle_download(id))).await;
    }

    pub async fn handle_deletes(&self, ids: &[String]) {
        join_all(ids.iter().map(|id| self.handle_delete(id))).await;
    }
}
