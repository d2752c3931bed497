//! Layout store: append-only history of layout documents.
//!
//! DESIGN
//! ======
//! Every save appends a row; the row with the highest id is "the" layout.
//! Rows are never updated or deleted, so the table doubles as an audit
//! trail. The document body is stored as opaque JSON: the server checks the
//! envelope (`boxes`, `zoom`, `theme`, `panning`) but never inspects boxes.
//!
//! Two backends implement [`LayoutStore`]: Postgres for deployments and an
//! in-memory vector for local runs without `DATABASE_URL` and for tests.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;
use tokio::sync::RwLock;
use tracing::info;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored layout is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Database(_) => "E_DATABASE",
            Self::Malformed(_) => "E_MALFORMED_LAYOUT",
            Self::Unavailable(_) => "E_STORE_UNAVAILABLE",
        }
    }
}

fn default_zoom() -> f64 {
    1.0
}

/// Pan offset as persisted by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Panning {
    pub x: f64,
    pub y: f64,
}

/// One stored layout. Boxes pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    #[serde(default)]
    pub boxes: Vec<serde_json::Value>,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub theme: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panning: Option<Panning>,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self { boxes: Vec::new(), zoom: default_zoom(), theme: false, panning: None }
    }
}

// =============================================================================
// STORE TRAIT
// =============================================================================

/// Backend-neutral access to the layout history. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LayoutStore: Send + Sync {
    /// The most recently appended layout, or `None` for an empty store.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend cannot be read.
    async fn latest(&self) -> Result<Option<LayoutDocument>, StoreError>;

    /// Append a layout as the new latest row, returning its id.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend rejects the write.
    async fn append(&self, doc: &LayoutDocument) -> Result<i64, StoreError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

/// [`LayoutStore`] over the `alliance_layout` table.
pub struct PgLayoutStore {
    pool: PgPool,
}

impl PgLayoutStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl LayoutStore for PgLayoutStore {
    async fn latest(&self) -> Result<Option<LayoutDocument>, StoreError> {
        let row = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT data FROM alliance_layout ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }

    async fn append(&self, doc: &LayoutDocument) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>("INSERT INTO alliance_layout (data) VALUES ($1) RETURNING id")
            .bind(Json(doc))
            .fetch_one(&self.pool)
            .await?;

        info!(id, boxes = doc.boxes.len(), "layout row appended");
        Ok(id)
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// [`LayoutStore`] kept in process memory. History is lost on restart.
#[derive(Default)]
pub struct MemoryLayoutStore {
    rows: RwLock<Vec<LayoutDocument>>,
}

impl MemoryLayoutStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl MemoryLayoutStore {
    /// Number of rows appended so far.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl LayoutStore for MemoryLayoutStore {
    async fn latest(&self) -> Result<Option<LayoutDocument>, StoreError> {
        Ok(self.rows.read().await.last().cloned())
    }

    async fn append(&self, doc: &LayoutDocument) -> Result<i64, StoreError> {
        let mut rows = self.rows.write().await;
        rows.push(doc.clone());
        let id = i64::try_from(rows.len()).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(id)
    }
}

#[cfg(test)]
#[path = "layout_test.rs"]
mod tests;
