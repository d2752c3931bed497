//! Native storage backends for the layout gateway: a JSON file standing in
//! for the browser's local storage, and the HTTP layout API via `reqwest`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use canvas::gateway::{GatewayError, LayoutSnapshot, LocalCache, RemoteEnvelope, RemoteStore, SaveReply};

/// [`LocalCache`] backed by a single JSON file.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn local_err(e: &std::io::Error) -> GatewayError {
    GatewayError::LocalStorageUnavailable(e.to_string())
}

impl LocalCache for FileCache {
    fn read(&self) -> Result<Option<String>, GatewayError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(local_err(&e)),
        }
    }

    fn write(&self, raw: &str) -> Result<(), GatewayError> {
        std::fs::write(&self.path, raw).map_err(|e| local_err(&e))
    }

    fn remove(&self) -> Result<(), GatewayError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(local_err(&e)),
        }
    }
}

/// [`RemoteStore`] speaking to `/api/boxes` on a layout server.
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRemote {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { client: reqwest::Client::new(), endpoint: boxes_url(base_url) }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// The layout endpoint under `base_url`.
#[must_use]
pub fn boxes_url(base_url: &str) -> String {
    format!("{}/api/boxes", base_url.trim_end_matches('/'))
}

fn transport(e: reqwest::Error) -> GatewayError {
    GatewayError::RemoteUnavailable(e.to_string())
}

/// Parse a response body as JSON. A body that is not JSON at all (an HTML
/// error page from a wrong base URL, a proxy message) means the layout API
/// is not what answered, so it is a remote failure rather than a bad document.
fn decode_body(status: reqwest::StatusCode, body: &str) -> Result<serde_json::Value, GatewayError> {
    serde_json::from_str(body)
        .map_err(|e| GatewayError::RemoteUnavailable(format!("HTTP {status}: response is not JSON ({e})")))
}

impl RemoteStore for HttpRemote {
    async fn fetch_latest(&self) -> Result<RemoteEnvelope, GatewayError> {
        let response = self.client.get(&self.endpoint).send().await.map_err(transport)?;
        // Failures still carry an envelope with `success: false`; decode either way.
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        Ok(serde_json::from_value(decode_body(status, &body)?)?)
    }

    async fn append(&self, snapshot: &LayoutSnapshot) -> Result<SaveReply, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(snapshot)
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        let body = response.text().await.map_err(transport)?;
        Ok(serde_json::from_value(decode_body(status, &body)?)?)
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
