//! Persistence gateway: remote row-store, local cache, and the fallback chain.
//!
//! DESIGN
//! ======
//! Loading walks remote -> local cache -> empty document and never fails:
//! every error is logged at the boundary and treated as "no data here". The
//! local cache is written synchronously after every mutation; the remote
//! store only on an explicit save, and only that path reports failure back
//! to the caller so the user learns the shared copy was not updated.
//!
//! Every remote save appends a full snapshot; the store's latest row wins.
//! There is no retry and no rollback of interaction state.

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::camera::Point;
use crate::consts::DEFAULT_ZOOM;
use crate::doc::LayoutBox;

// =============================================================================
// WIRE TYPES
// =============================================================================

fn default_zoom() -> f64 {
    DEFAULT_ZOOM
}

/// A complete layout document as stored remotely and locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    #[serde(default)]
    pub boxes: Vec<LayoutBox>,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub theme: bool,
    /// Canvas pan offset. Older caches wrote it as `gridPanning`.
    #[serde(default, alias = "gridPanning", skip_serializing_if = "Option::is_none")]
    pub panning: Option<Point>,
}

impl Default for LayoutSnapshot {
    fn default() -> Self {
        Self { boxes: Vec::new(), zoom: DEFAULT_ZOOM, theme: false, panning: None }
    }
}

/// Local cache entry: the snapshot plus the time it was written (ms).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLayout {
    #[serde(flatten)]
    pub snapshot: LayoutSnapshot,
    #[serde(default)]
    pub timestamp: i64,
}

/// Response body of `GET /api/boxes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteEnvelope {
    pub success: bool,
    #[serde(default)]
    pub data: Option<LayoutSnapshot>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response body of `POST /api/boxes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("local storage unavailable: {0}")]
    LocalStorageUnavailable(String),
    #[error("malformed stored document: {0}")]
    MalformedStoredDocument(#[from] serde_json::Error),
}

impl GatewayError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RemoteUnavailable(_) => "E_REMOTE_UNAVAILABLE",
            Self::LocalStorageUnavailable(_) => "E_LOCAL_STORAGE",
            Self::MalformedStoredDocument(_) => "E_MALFORMED_DOCUMENT",
        }
    }
}

// =============================================================================
// STORAGE SEAMS
// =============================================================================

/// Synchronous durable storage for one serialized document.
pub trait LocalCache {
    /// The raw cached document, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::LocalStorageUnavailable`] if storage cannot be read.
    fn read(&self) -> Result<Option<String>, GatewayError>;

    /// Replace the cached document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::LocalStorageUnavailable`] on quota or access failure.
    fn write(&self, raw: &str) -> Result<(), GatewayError>;

    /// Drop the cached document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::LocalStorageUnavailable`] if storage cannot be written.
    fn remove(&self) -> Result<(), GatewayError>;
}

/// The shared row-store: read the latest snapshot, append a new one.
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    /// Fetch the latest stored document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteUnavailable`] on transport failure and
    /// [`GatewayError::MalformedStoredDocument`] if the body cannot be decoded.
    async fn fetch_latest(&self) -> Result<RemoteEnvelope, GatewayError>;

    /// Append a snapshot as the new latest row.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteUnavailable`] on transport failure.
    async fn append(&self, snapshot: &LayoutSnapshot) -> Result<SaveReply, GatewayError>;
}

/// In-process [`LocalCache`] for tests and headless hosts.
#[derive(Debug, Default)]
pub struct MemoryCache {
    slot: RefCell<Option<String>>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache pre-filled with `raw`.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self { slot: RefCell::new(Some(raw.into())) }
    }

    /// Current raw contents.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl LocalCache for MemoryCache {
    fn read(&self) -> Result<Option<String>, GatewayError> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&self, raw: &str) -> Result<(), GatewayError> {
        *self.slot.borrow_mut() = Some(raw.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), GatewayError> {
        *self.slot.borrow_mut() = None;
        Ok(())
    }
}

// =============================================================================
// GATEWAY
// =============================================================================

/// Where a loaded document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    LocalCache,
    Default,
}

impl LoadSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::LocalCache => "local",
            Self::Default => "default",
        }
    }
}

/// Result of [`LayoutGateway::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded {
    pub snapshot: LayoutSnapshot,
    pub source: LoadSource,
}

/// Persistence front door combining a local cache and a remote store.
pub struct LayoutGateway<L, R> {
    local: L,
    remote: R,
}

impl<L: LocalCache, R: RemoteStore> LayoutGateway<L, R> {
    #[must_use]
    pub fn new(local: L, remote: R) -> Self {
        Self { local, remote }
    }

    #[must_use]
    pub fn local(&self) -> &L {
        &self.local
    }

    #[must_use]
    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Load the document: remote if it holds boxes, else the local cache,
    /// else an empty document. Never fails.
    pub async fn load(&self) -> Loaded {
        match self.remote.fetch_latest().await {
            Ok(envelope) if envelope.success => match envelope.data {
                Some(snapshot) if !snapshot.boxes.is_empty() => {
                    info!(boxes = snapshot.boxes.len(), zoom = snapshot.zoom, "loaded layout from remote store");
                    return Loaded { snapshot, source: LoadSource::Remote };
                }
                _ => debug!(source = ?envelope.source, "remote store holds no boxes"),
            },
            Ok(envelope) => warn!(error = ?envelope.error, "remote store reported a failed read"),
            Err(e) => warn!(error = %e, code = e.error_code(), "remote load failed"),
        }

        match self.read_local() {
            Ok(Some(cached)) => {
                info!(boxes = cached.snapshot.boxes.len(), "loaded layout from local cache");
                return Loaded { snapshot: cached.snapshot, source: LoadSource::LocalCache };
            }
            Ok(None) => debug!("local cache empty"),
            Err(e) => warn!(error = %e, code = e.error_code(), "local cache unreadable"),
        }

        Loaded { snapshot: LayoutSnapshot::default(), source: LoadSource::Default }
    }

    /// Read and decode the local cache.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::LocalStorageUnavailable`] if storage cannot be
    /// read, or [`GatewayError::MalformedStoredDocument`] if it does not parse.
    pub fn read_local(&self) -> Result<Option<CachedLayout>, GatewayError> {
        let Some(raw) = self.local.read()? else {
            return Ok(None);
        };
        let cached: CachedLayout = serde_json::from_str(&raw)?;
        Ok(Some(cached))
    }

    /// Write the local cache. Failures are logged, never surfaced.
    ///
    /// Returns `true` if the write succeeded.
    pub fn save_local(&self, snapshot: &LayoutSnapshot, now_ms: i64) -> bool {
        let cached = CachedLayout { snapshot: snapshot.clone(), timestamp: now_ms };
        let result = serde_json::to_string(&cached)
            .map_err(GatewayError::from)
            .and_then(|raw| self.local.write(&raw));
        match result {
            Ok(()) => {
                debug!(boxes = snapshot.boxes.len(), "saved layout to local cache");
                true
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "local cache write failed");
                false
            }
        }
    }

    /// Save locally, then append to the remote store when `remote` is set.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::RemoteUnavailable`] if the remote append fails
    /// or the store rejects it. Local failures are only logged.
    pub async fn save(&self, snapshot: &LayoutSnapshot, now_ms: i64, remote: bool) -> Result<(), GatewayError> {
        self.save_local(snapshot, now_ms);
        if !remote {
            return Ok(());
        }
        let reply = self.remote.append(snapshot).await.inspect_err(|e| {
            error!(error = %e, code = e.error_code(), "remote save failed");
        })?;
        if reply.success {
            info!(boxes = snapshot.boxes.len(), "saved layout to remote store");
            Ok(())
        } else {
            let reason = reply.error.unwrap_or_else(|| "store rejected the snapshot".to_owned());
            error!(error = %reason, "remote save rejected");
            Err(GatewayError::RemoteUnavailable(reason))
        }
    }

    /// Explicit save: like [`Self::save`] with the remote leg on, but hands the
    /// outcome to `on_done` so the page can show whether the store took it.
    pub async fn save_and_report<F>(&self, snapshot: &LayoutSnapshot, now_ms: i64, on_done: F)
    where
        F: FnOnce(Result<(), GatewayError>),
    {
        on_done(self.save(snapshot, now_ms, true).await);
    }

    /// Remove the local cache (the "clear all" command).
    pub fn clear_local(&self) {
        if let Err(e) = self.local.remove() {
            error!(error = %e, code = e.error_code(), "local cache clear failed");
        }
    }
}
