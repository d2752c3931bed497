//! Interaction engine: turns raw input into document, viewport and UI changes.
//!
//! `EngineCore` is the sole writer of the layout session. Every handler runs
//! synchronously and returns the [`Action`]s the host must reflect (redraw,
//! show an input, persist). Mutating actions report `is_mutation() == true`;
//! the host writes the local cache after each batch that contains one.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::trace;

use crate::camera::{Pinch, Point, Viewport, clamp_zoom, touch_distance};
use crate::consts::{LONG_PRESS_MS, TAP_MAX_MS, TOUCH_DRAG_THRESHOLD};
use crate::doc::{BoxId, BoxIdAllocator, Document, LayoutBox};
use crate::gateway::LayoutSnapshot;
use crate::geometry::{clamp_axis, next_insertion_point, snap_to_grid};
use crate::hit::hit_test;
use crate::input::{Button, InteractionState, Key, Modifiers, TouchPoint, UiState, WheelDelta};
use crate::palette::pick_color;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BoxAdded(LayoutBox),
    BoxMoved { id: BoxId, x: f64, y: f64 },
    BoxDeleted { id: BoxId },
    TextCommitted { id: BoxId, text: String },
    /// Show a label editor for `id`, pre-filled with `text`.
    EditStarted { id: BoxId, text: String, in_list: bool },
    /// Hide the label editor.
    EditEnded,
    SelectionChanged(Option<BoxId>),
    HoverChanged(Option<BoxId>),
    ZoomChanged(f64),
    PanChanged(Point),
    ThemeChanged(bool),
    Cleared,
    /// Bring the list entry / canvas box for `id` into view.
    ScrollIntoView(BoxId),
    SetCursor(&'static str),
}

impl Action {
    /// Whether the action changed persisted state.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::BoxAdded(_)
                | Self::BoxMoved { .. }
                | Self::BoxDeleted { .. }
                | Self::TextCommitted { .. }
                | Self::ZoomChanged(_)
                | Self::PanChanged(_)
                | Self::ThemeChanged(_)
                | Self::Cleared
        )
    }
}

/// Whether any action in a batch requires a local save.
#[must_use]
pub fn needs_save(actions: &[Action]) -> bool {
    actions.iter().any(Action::is_mutation)
}

/// Core engine state: all logic that doesn't depend on the DOM.
///
/// Separated from the browser `Engine` so it can be tested natively.
pub struct EngineCore {
    pub doc: Document,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InteractionState,
    /// Screen position of the canvas container's top-left corner.
    pub container_origin: Point,
    /// Container width in screen pixels.
    pub container_width: f64,
    /// Container height in screen pixels.
    pub container_height: f64,
    ids: BoxIdAllocator,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self {
            doc: Document::new(),
            viewport: Viewport::default(),
            ui: UiState::default(),
            input: InteractionState::default(),
            container_origin: Point::default(),
            container_width: 0.0,
            container_height: 0.0,
            ids: BoxIdAllocator::default(),
        }
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Data ---

    /// Replace the session with a loaded document. Transient state is reset.
    pub fn load(&mut self, snapshot: LayoutSnapshot) {
        self.doc = Document::from_boxes(snapshot.boxes);
        self.viewport.zoom = clamp_zoom(snapshot.zoom);
        self.viewport.pan = snapshot.panning.unwrap_or_default();
        self.ui.theme = snapshot.theme;
        self.ui.selected = None;
        self.ui.hovered = None;
        self.input = InteractionState::Idle;
        self.ids.observe(&self.doc);
    }

    /// The full persisted document.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            boxes: self.doc.boxes().to_vec(),
            zoom: self.viewport.zoom,
            theme: self.ui.theme,
            panning: Some(self.viewport.pan),
        }
    }

    /// Update the container's on-screen rectangle.
    pub fn set_viewport(&mut self, origin: Point, width: f64, height: f64) {
        self.container_origin = origin;
        self.container_width = width;
        self.container_height = height;
    }

    // --- Commands ---

    /// Append a box after the most recent one. No-op once the document is full.
    pub fn add_box(&mut self, now_ms: f64) -> Vec<Action> {
        if self.doc.is_full() {
            trace!(count = self.doc.len(), "add_box ignored: document full");
            return Vec::new();
        }
        let pos = next_insertion_point(self.doc.boxes());
        let color = pick_color(self.doc.boxes().iter().map(|b| b.color.as_str()), self.doc.len());
        let b = LayoutBox {
            id: self.ids.next(now_ms),
            x: pos.x,
            y: pos.y,
            color,
            size: self.ui.new_box.size,
            text: format!("Box {}", self.doc.len() + 1),
            font_size: self.ui.new_box.font_size,
        };
        if !self.doc.push(b.clone()) {
            return Vec::new();
        }
        vec![Action::BoxAdded(b)]
    }

    /// Remove a box and every state reference to it.
    pub fn delete_box(&mut self, id: BoxId) -> Vec<Action> {
        if self.doc.remove(id).is_none() {
            return Vec::new();
        }
        let mut actions = vec![Action::BoxDeleted { id }];
        if self.input.box_id() == Some(id) {
            if self.input.is_editing() {
                actions.push(Action::EditEnded);
            }
            self.input = InteractionState::Idle;
        }
        if self.ui.selected == Some(id) {
            self.set_selected(None, &mut actions);
        }
        if self.ui.hovered == Some(id) {
            self.set_hovered(None, &mut actions);
        }
        actions
    }

    /// Remove every box and reset selection and edits.
    pub fn clear(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.input.is_editing() {
            actions.push(Action::EditEnded);
        }
        self.input = InteractionState::Idle;
        self.set_selected(None, &mut actions);
        self.set_hovered(None, &mut actions);
        self.doc.clear();
        actions.push(Action::Cleared);
        actions
    }

    pub fn toggle_theme(&mut self) -> Vec<Action> {
        self.ui.theme = !self.ui.theme;
        vec![Action::ThemeChanged(self.ui.theme)]
    }

    /// Select a box from the list and bring it into view.
    pub fn focus_box(&mut self, id: BoxId) -> Vec<Action> {
        if !self.doc.contains(id) {
            return Vec::new();
        }
        let mut actions = Vec::new();
        self.set_selected(Some(id), &mut actions);
        actions.push(Action::ScrollIntoView(id));
        actions
    }

    /// Open the list-label editor for a box.
    pub fn start_list_edit(&mut self, id: BoxId) -> Vec<Action> {
        let mut actions = self.commit_edit();
        let Some(b) = self.doc.get(id) else {
            return actions;
        };
        let text = b.text.clone();
        self.input = InteractionState::EditingListLabel { id, draft: text.clone() };
        actions.push(Action::EditStarted { id, text, in_list: true });
        actions
    }

    pub fn set_new_box_size(&mut self, raw: &str) {
        self.ui.new_box.set_size(raw);
    }

    pub fn set_new_font_size(&mut self, raw: &str) {
        self.ui.new_box.set_font_size(raw);
    }

    // --- Text editing ---

    /// Replace the uncommitted label text. Returns false if no edit is open.
    pub fn set_draft(&mut self, text: &str) -> bool {
        match &mut self.input {
            InteractionState::EditingBoxText { draft, .. } | InteractionState::EditingListLabel { draft, .. } => {
                text.clone_into(draft);
                true
            }
            _ => false,
        }
    }

    /// Enter commits, Escape discards; other keys are ignored.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if !self.input.is_editing() {
            return Vec::new();
        }
        if key.is_enter() {
            self.commit_edit()
        } else if key.is_escape() {
            self.input = InteractionState::Idle;
            vec![Action::EditEnded]
        } else {
            Vec::new()
        }
    }

    /// The label editor lost focus: same as Enter.
    pub fn on_blur(&mut self) -> Vec<Action> {
        self.commit_edit()
    }

    fn commit_edit(&mut self) -> Vec<Action> {
        if !self.input.is_editing() {
            return Vec::new();
        }
        let (InteractionState::EditingBoxText { id, draft } | InteractionState::EditingListLabel { id, draft }) =
            std::mem::take(&mut self.input)
        else {
            return Vec::new();
        };
        let mut actions = Vec::new();
        if self.doc.set_text(id, draft.clone()) {
            actions.push(Action::TextCommitted { id, text: draft });
        }
        actions.push(Action::EditEnded);
        actions
    }

    fn begin_box_edit(&mut self, id: BoxId, actions: &mut Vec<Action>) {
        let Some(b) = self.doc.get(id) else {
            return;
        };
        let text = b.text.clone();
        self.set_selected(Some(id), actions);
        self.input = InteractionState::EditingBoxText { id, draft: text.clone() };
        actions.push(Action::EditStarted { id, text, in_list: false });
    }

    // --- Mouse ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button, modifiers: Modifiers) -> Vec<Action> {
        let mut actions = self.commit_edit();

        if button == Button::Middle || modifiers.shift {
            let pan = self.viewport.pan;
            self.input = InteractionState::PanningGrid { anchor: Point::new(screen.x - pan.x, screen.y - pan.y) };
            actions.push(Action::SetCursor(self.input.cursor()));
            return actions;
        }
        if button != Button::Primary {
            return actions;
        }

        let doc_pt = self.to_document(screen);
        match hit_test(self.to_layer(screen), &self.doc) {
            Some(id) if !modifiers.any() => {
                let grab = self.grab_offset(id, doc_pt);
                self.set_selected(Some(id), &mut actions);
                self.input = InteractionState::DraggingBox { id, grab };
                actions.push(Action::SetCursor(self.input.cursor()));
            }
            Some(_) => {}
            None => {
                self.set_selected(None, &mut actions);
                self.input = InteractionState::Idle;
            }
        }
        actions
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        match self.input {
            InteractionState::DraggingBox { id, grab } => {
                let doc_pt = self.to_document(screen);
                self.drag_to(id, grab, doc_pt)
            }
            InteractionState::PanningGrid { anchor } => {
                let pan = Point::new(screen.x - anchor.x, screen.y - anchor.y);
                if pan == self.viewport.pan {
                    return Vec::new();
                }
                self.viewport.pan = pan;
                vec![Action::PanChanged(pan)]
            }
            InteractionState::Idle => {
                let hit = hit_test(self.to_layer(screen), &self.doc);
                let mut actions = Vec::new();
                self.set_hovered(hit, &mut actions);
                actions
            }
            _ => Vec::new(),
        }
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        match self.input {
            InteractionState::DraggingBox { .. } | InteractionState::PanningGrid { .. } => {
                self.input = InteractionState::Idle;
                vec![Action::SetCursor(self.input.cursor())]
            }
            _ => Vec::new(),
        }
    }

    /// The pointer left the container: end any gesture and drop hover.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        let mut actions = self.on_pointer_up();
        self.set_hovered(None, &mut actions);
        actions
    }

    pub fn on_double_click(&mut self, screen: Point) -> Vec<Action> {
        let mut actions = self.commit_edit();
        if let Some(id) = hit_test(self.to_layer(screen), &self.doc) {
            self.input = InteractionState::Idle;
            self.begin_box_edit(id, &mut actions);
        }
        actions
    }

    /// Zoom by one step per event while ctrl/meta is held. Returns nothing
    /// (and the host should let the page scroll) otherwise.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if !(modifiers.ctrl || modifiers.meta) {
            return Vec::new();
        }
        if self.viewport.wheel_zoom(delta.dy) {
            vec![Action::ZoomChanged(self.viewport.zoom)]
        } else {
            Vec::new()
        }
    }

    // --- Touch ---

    pub fn on_touch_start(&mut self, touches: &[TouchPoint], now_ms: f64) -> Vec<Action> {
        match touches {
            [] => Vec::new(),
            [a, b, ..] => {
                let actions = self.commit_edit();
                self.input = InteractionState::PinchZooming { last_distance: touch_distance(a.point(), b.point()) };
                actions
            }
            [only] => {
                let mut actions = self.commit_edit();
                let doc_pt = self.to_document(only.point());
                let hit = hit_test(self.to_layer(only.point()), &self.doc);
                if self.ui.hovered != hit {
                    self.set_hovered(None, &mut actions);
                }
                match hit {
                    Some(id) => {
                        let grab = self.grab_offset(id, doc_pt);
                        self.set_selected(Some(id), &mut actions);
                        self.input = InteractionState::TouchPending {
                            id,
                            grab,
                            origin: doc_pt,
                            started_ms: now_ms,
                            long_pressed: false,
                        };
                    }
                    None => {
                        self.set_selected(None, &mut actions);
                        self.input = InteractionState::Idle;
                    }
                }
                actions
            }
        }
    }

    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> Vec<Action> {
        match touches {
            [] => Vec::new(),
            [a, b, ..] => self.pinch_to(touch_distance(a.point(), b.point())),
            [only] => {
                let doc_pt = self.to_document(only.point());
                match self.input {
                    InteractionState::TouchPending { id, grab, origin, .. } => {
                        if origin.distance(doc_pt) <= TOUCH_DRAG_THRESHOLD {
                            return Vec::new();
                        }
                        self.input = InteractionState::DraggingBox { id, grab };
                        self.drag_to(id, grab, doc_pt)
                    }
                    InteractionState::DraggingBox { id, grab } => self.drag_to(id, grab, doc_pt),
                    _ => Vec::new(),
                }
            }
        }
    }

    /// A finger lifted. A pending touch released quickly opens the editor.
    pub fn on_touch_end(&mut self, now_ms: f64) -> Vec<Action> {
        let mut actions = Vec::new();
        match std::mem::take(&mut self.input) {
            InteractionState::TouchPending { id, started_ms, long_pressed, .. } => {
                if !long_pressed && now_ms - started_ms < TAP_MAX_MS {
                    self.begin_box_edit(id, &mut actions);
                }
            }
            InteractionState::DraggingBox { .. } | InteractionState::PinchZooming { .. } => {}
            other => self.input = other,
        }
        actions
    }

    /// Host timer tick: fires the long-press affordance once a pending touch
    /// has been held long enough.
    pub fn on_timer(&mut self, now_ms: f64) -> Vec<Action> {
        let InteractionState::TouchPending { id, started_ms, long_pressed: false, grab, origin } = self.input else {
            return Vec::new();
        };
        if now_ms - started_ms < LONG_PRESS_MS {
            return Vec::new();
        }
        self.input = InteractionState::TouchPending { id, grab, origin, started_ms, long_pressed: true };
        let mut actions = Vec::new();
        self.set_hovered(Some(id), &mut actions);
        actions
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<BoxId> {
        self.ui.selected
    }

    #[must_use]
    pub fn hovered(&self) -> Option<BoxId> {
        self.ui.hovered
    }

    #[must_use]
    pub fn state(&self) -> &InteractionState {
        &self.input
    }

    #[must_use]
    pub fn object(&self, id: BoxId) -> Option<&LayoutBox> {
        self.doc.get(id)
    }

    #[must_use]
    pub fn add_enabled(&self) -> bool {
        self.doc.add_enabled()
    }

    #[must_use]
    pub fn zoom_percent(&self) -> i64 {
        self.viewport.zoom_percent()
    }

    // --- Internals ---

    fn to_document(&self, screen: Point) -> Point {
        self.viewport.screen_to_document(screen, self.container_origin)
    }

    fn to_layer(&self, screen: Point) -> Point {
        self.viewport.screen_to_layer(screen, self.container_origin)
    }

    fn grab_offset(&self, id: BoxId, doc_pt: Point) -> Point {
        self.doc
            .get(id)
            .map_or_else(Point::default, |b| Point::new(doc_pt.x - b.x, doc_pt.y - b.y))
    }

    /// Move a dragged box toward `doc_pt`, snapping and clamping, and refuse
    /// the move outright if it would overlap another box.
    fn drag_to(&mut self, id: BoxId, grab: Point, doc_pt: Point) -> Vec<Action> {
        let Some(b) = self.doc.get(id) else {
            self.input = InteractionState::Idle;
            return Vec::new();
        };
        let size = f64::from(b.size);
        let zoom = self.viewport.zoom;
        let x = clamp_axis(snap_to_grid(doc_pt.x - grab.x), size, self.container_width, zoom);
        let y = clamp_axis(snap_to_grid(doc_pt.y - grab.y), size, self.container_height, zoom);
        if x == b.x && y == b.y {
            return Vec::new();
        }
        if self.doc.overlaps_any(id, x, y) {
            trace!(id, x, y, "move rejected: overlap");
            return Vec::new();
        }
        self.doc.move_to(id, x, y);
        vec![Action::BoxMoved { id, x, y }]
    }

    fn pinch_to(&mut self, distance: f64) -> Vec<Action> {
        let mut actions = self.commit_edit();
        if let InteractionState::PinchZooming { last_distance } = self.input {
            let mut pinch = Pinch::new(last_distance);
            if let Some(scale) = pinch.update(distance) {
                if self.viewport.pinch_zoom(scale) {
                    actions.push(Action::ZoomChanged(self.viewport.zoom));
                }
            }
        } else if self.ui.hovered.is_some() {
            self.set_hovered(None, &mut actions);
        }
        self.input = InteractionState::PinchZooming { last_distance: distance };
        actions
    }

    fn set_selected(&mut self, id: Option<BoxId>, actions: &mut Vec<Action>) {
        if self.ui.selected != id {
            self.ui.selected = id;
            actions.push(Action::SelectionChanged(id));
        }
    }

    fn set_hovered(&mut self, id: Option<BoxId>, actions: &mut Vec<Action>) {
        if self.ui.hovered != id {
            self.ui.hovered = id;
            actions.push(Action::HoverChanged(id));
        }
    }
}
