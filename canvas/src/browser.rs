//! Browser bindings: `localStorage` cache, `fetch` remote store, and the
//! DOM-facing [`Engine`] wrapper around [`EngineCore`].
//!
//! Only compiled for `wasm32`. Everything here is glue; behavior lives in the
//! target-independent modules so it can be tested natively.

use std::rc::Rc;

use tracing::info;
use web_sys::{HtmlElement, Storage};

use crate::camera::Point;
use crate::consts::STORAGE_KEY;
use crate::doc::BoxId;
use crate::engine::{Action, EngineCore, needs_save};
use crate::gateway::{GatewayError, LayoutGateway, LayoutSnapshot, LoadSource, LocalCache, RemoteEnvelope, RemoteStore, SaveReply};
use crate::input::{Button, Key, Modifiers, TouchPoint, WheelDelta};

/// Endpoint serving the latest layout.
pub const DEFAULT_ENDPOINT: &str = "/api/boxes";

/// Gateway wired to the browser's storage and network.
pub type BrowserGateway = LayoutGateway<BrowserStorage, FetchRemote>;

fn js_err(e: &wasm_bindgen::JsValue) -> GatewayError {
    GatewayError::LocalStorageUnavailable(format!("{e:?}"))
}

fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[allow(clippy::cast_possible_truncation)]
fn now_ms_i64() -> i64 {
    now_ms() as i64
}

/// [`LocalCache`] backed by `window.localStorage`.
pub struct BrowserStorage {
    key: String,
}

impl Default for BrowserStorage {
    fn default() -> Self {
        Self { key: STORAGE_KEY.to_owned() }
    }
}

impl BrowserStorage {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self { key: key.to_owned() }
    }

    fn storage(&self) -> Result<Storage, GatewayError> {
        let window =
            web_sys::window().ok_or_else(|| GatewayError::LocalStorageUnavailable("no window".to_owned()))?;
        window
            .local_storage()
            .map_err(|e| js_err(&e))?
            .ok_or_else(|| GatewayError::LocalStorageUnavailable("localStorage disabled".to_owned()))
    }
}

impl LocalCache for BrowserStorage {
    fn read(&self) -> Result<Option<String>, GatewayError> {
        self.storage()?.get_item(&self.key).map_err(|e| js_err(&e))
    }

    fn write(&self, raw: &str) -> Result<(), GatewayError> {
        self.storage()?.set_item(&self.key, raw).map_err(|e| js_err(&e))
    }

    fn remove(&self) -> Result<(), GatewayError> {
        self.storage()?.remove_item(&self.key).map_err(|e| js_err(&e))
    }
}

/// [`RemoteStore`] that talks to the layout API with `fetch`.
pub struct FetchRemote {
    endpoint: String,
}

impl Default for FetchRemote {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl FetchRemote {
    #[must_use]
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: endpoint.to_owned() }
    }
}

fn transport(e: &gloo_net::Error) -> GatewayError {
    GatewayError::RemoteUnavailable(e.to_string())
}

impl RemoteStore for FetchRemote {
    async fn fetch_latest(&self) -> Result<RemoteEnvelope, GatewayError> {
        let resp = gloo_net::http::Request::get(&self.endpoint)
            .send()
            .await
            .map_err(|e| transport(&e))?;
        // Error responses still carry an envelope; decode regardless of status.
        resp.json::<RemoteEnvelope>().await.map_err(|e| transport(&e))
    }

    async fn append(&self, snapshot: &LayoutSnapshot) -> Result<SaveReply, GatewayError> {
        let resp = gloo_net::http::Request::post(&self.endpoint)
            .json(snapshot)
            .map_err(|e| transport(&e))?
            .send()
            .await
            .map_err(|e| transport(&e))?;
        resp.json::<SaveReply>().await.map_err(|e| transport(&e))
    }
}

/// The engine as seen by the page: owns the container element and the
/// persistence gateway, and writes the local cache after every mutation.
pub struct Engine {
    container: HtmlElement,
    pub core: EngineCore,
    gateway: Rc<BrowserGateway>,
}

impl Engine {
    /// Create an engine bound to the canvas container element.
    #[must_use]
    pub fn new(container: HtmlElement) -> Self {
        let gateway = LayoutGateway::new(BrowserStorage::default(), FetchRemote::default());
        Self { container, core: EngineCore::new(), gateway: Rc::new(gateway) }
    }

    /// Load the initial document through the fallback chain.
    pub async fn load(&mut self) -> LoadSource {
        let loaded = self.gateway.load().await;
        info!(source = loaded.source.as_str(), boxes = loaded.snapshot.boxes.len(), "layout loaded");
        self.core.load(loaded.snapshot);
        self.sync_viewport();
        loaded.source
    }

    /// Re-read the container's on-screen rectangle.
    pub fn sync_viewport(&mut self) {
        let rect = self.container.get_bounding_client_rect();
        self.core.set_viewport(Point::new(rect.left(), rect.top()), rect.width(), rect.height());
    }

    /// Push the current document to the remote store in the background.
    /// `on_done` receives the outcome so the page can report a failed save.
    pub fn save_remote<F>(&self, on_done: F)
    where
        F: FnOnce(Result<(), GatewayError>) + 'static,
    {
        let gateway = Rc::clone(&self.gateway);
        let snapshot = self.core.snapshot();
        wasm_bindgen_futures::spawn_local(async move {
            gateway.save_and_report(&snapshot, now_ms_i64(), on_done).await;
        });
    }

    fn persist(&self, actions: Vec<Action>) -> Vec<Action> {
        if actions.contains(&Action::Cleared) {
            self.gateway.clear_local();
        }
        if needs_save(&actions) {
            self.gateway.save_local(&self.core.snapshot(), now_ms_i64());
        }
        actions
    }

    // --- Commands ---

    pub fn add_box(&mut self) -> Vec<Action> {
        let actions = self.core.add_box(now_ms());
        self.persist(actions)
    }

    pub fn delete_box(&mut self, id: BoxId) -> Vec<Action> {
        let actions = self.core.delete_box(id);
        self.persist(actions)
    }

    pub fn clear(&mut self) -> Vec<Action> {
        let actions = self.core.clear();
        self.persist(actions)
    }

    pub fn toggle_theme(&mut self) -> Vec<Action> {
        let actions = self.core.toggle_theme();
        self.persist(actions)
    }

    pub fn focus_box(&mut self, id: BoxId) -> Vec<Action> {
        self.core.focus_box(id)
    }

    pub fn start_list_edit(&mut self, id: BoxId) -> Vec<Action> {
        let actions = self.core.start_list_edit(id);
        self.persist(actions)
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        self.core.set_draft(text)
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        self.sync_viewport();
        let actions = self.core.on_pointer_down(screen, button, modifiers);
        self.persist(actions)
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let actions = self.core.on_pointer_move(screen);
        self.persist(actions)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        self.sync_viewport();
        let actions = self.core.on_double_click(screen);
        self.persist(actions)
    }

    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        let actions = self.core.on_wheel(delta, modifiers);
        self.persist(actions)
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        self.sync_viewport();
        let actions = self.core.on_touch_start(touches, now_ms());
        self.persist(actions)
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        let actions = self.core.on_touch_move(touches);
        self.persist(actions)
    }

    pub fn on_touch_end(&mut self) -> Vec<Action> {
        self.core.on_touch_end(now_ms())
    }

    /// Drive the long-press timer; call from an interval or animation frame.
    pub fn on_timer(&mut self) -> Vec<Action> {
        self.core.on_timer(now_ms())
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        let actions = self.core.on_key_down(key);
        self.persist(actions)
    }

    pub fn on_blur(&mut self) -> Vec<Action> {
        let actions = self.core.on_blur();
        self.persist(actions)
    }

    pub fn set_new_box_size(&mut self, raw: &str) {
        self.core.set_new_box_size(raw);
    }

    pub fn set_new_font_size(&mut self, raw: &str) {
        self.core.set_new_font_size(raw);
    }
}
