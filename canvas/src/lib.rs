//! Interaction core for the box layout editor.
//!
//! This crate owns everything between raw pointer/touch/wheel input and the
//! persisted layout document: translating screen coordinates into document
//! space under zoom, snapping and collision-checking dragged boxes, unifying
//! mouse drags, touch drags and pinch-zoom into one state machine, and the
//! persistence gateway that falls back from the remote row-store to the local
//! cache to an empty document. The host (browser page or CLI) only wires
//! events in and applies the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`]: the interaction state machine |
//! | [`doc`] | Layout boxes and the ordered document |
//! | [`camera`] | Zoom/pan viewport and screen-to-document conversion |
//! | [`input`] | Input event types and the interaction state enum |
//! | [`geometry`] | Grid snapping, overlap test, insertion heuristic |
//! | [`palette`] | Golden-angle color palette |
//! | [`hit`] | Hit-testing boxes under a document point |
//! | [`gateway`] | Remote/local persistence with fallback chain |
//! | [`consts`] | Shared numeric constants (zoom limits, sizes, timings) |
//! | `browser` | wasm32-only bindings: `localStorage`, `fetch`, DOM container |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod gateway;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod palette;

#[cfg(target_arch = "wasm32")]
pub mod browser;
