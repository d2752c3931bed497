//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the layout store behind a trait object so the same router serves
//! Postgres in production and memory in local runs and tests.

use std::sync::Arc;

use crate::services::layout::LayoutStore;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; the store is Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn LayoutStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn LayoutStore>) -> Self {
        Self { store }
    }
}
