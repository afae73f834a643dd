#![forbid(unsafe_code)]

//! The editor facade.
//!
//! [`Editor`] owns the whole editing state: document, camera, viewport,
//! tool, interaction session, hover target, undo history, the dirty flag,
//! and the layout store handle. There are no ambient singletons; hosts
//! construct one editor and feed it [`InputEvent`]s.
//!
//! # Design Notes
//!
//! - `handle` returns [`Effect`]s instead of touching the surface, so the
//!   whole interaction model is testable without a host.
//! - Undoable mutations go through one funnel that snapshots the
//!   pre-mutation document only when the mutation applies. Camera,
//!   viewport, tool, and bare selection changes never snapshot.
//! - Rendering is pull-based: the host calls [`Editor::take_scene`] once
//!   per scheduler tick and paints only when it returns a scene.

use gridplan_core::document::{
    ComponentId, ComponentType, Document, EditError, ItemRef, MutationOutcome, PlaceMode,
    Selection, Tool,
};
use gridplan_core::event::{InputEvent, PointerEvent, PointerId, PointerPhase, WheelEvent};
use gridplan_core::geometry::{
    CELL_SIZE, Camera, Cell, Point, Viewport, ZOOM_MAX, ZOOM_MIN, canvas_to_world,
    visible_cell_bounds, world_to_cell,
};
use gridplan_store::{Clock, LayoutMeta, LayoutStore, SavedLayout, StorageResult, SystemClock};

use crate::history::UndoHistory;
use crate::render::{Scene, build_scene};
use crate::session::{Cursor, Effect, HoverTarget, Session};

/// Multiplicative zoom change per wheel notch.
const ZOOM_STEP: f64 = 1.1;

/// Minimum zoom after auto-focusing an off-screen selection.
const FOCUS_ZOOM: f64 = 1.2;

/// Read-only view of the editor state, for chrome.
#[derive(Debug)]
pub struct EditorState<'a> {
    pub document: &'a Document,
    pub camera: &'a Camera,
    pub viewport: Viewport,
    pub tool: Tool,
    pub place_mode: PlaceMode,
    pub active_component_type: ComponentType,
}

/// The owned editing engine.
pub struct Editor {
    document: Document,
    camera: Camera,
    viewport: Viewport,
    tool: Tool,
    place_mode: PlaceMode,
    active_component_type: ComponentType,
    session: Session,
    hover: Option<HoverTarget>,
    history: UndoHistory,
    dirty: bool,
    /// Latest resize notification, applied on the next `commit_resize`.
    pending_resize: Option<Viewport>,
    store: LayoutStore,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("tool", &self.tool)
            .field("session", &self.session)
            .field("undo_depth", &self.history.depth())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Editor {
    /// Create an editor over the given layout store, using wall-clock time
    /// for layout timestamps.
    #[must_use]
    pub fn new(store: LayoutStore) -> Self {
        Self::with_clock(store, Box::new(SystemClock))
    }

    /// Create an editor with an explicit clock. Tests use this for
    /// deterministic timestamps.
    #[must_use]
    pub fn with_clock(store: LayoutStore, clock: Box<dyn Clock>) -> Self {
        Self {
            document: Document::default(),
            camera: Camera::default(),
            viewport: Viewport::default(),
            tool: Tool::default(),
            place_mode: PlaceMode::default(),
            active_component_type: ComponentType::default(),
            session: Session::Idle,
            hover: None,
            history: UndoHistory::default(),
            dirty: true,
            pending_resize: None,
            store,
            clock,
        }
    }

    /// Create an editor over in-memory storage.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(LayoutStore::in_memory())
    }

    // ------------------------------------------------------------------
    // Input dispatch
    // ------------------------------------------------------------------

    /// Process one input event and return the effects the host must apply.
    pub fn handle(&mut self, event: InputEvent) -> Vec<Effect> {
        self.with_effects(|editor, effects| match event {
            InputEvent::Pointer(e) => editor.handle_pointer(e, effects),
            InputEvent::Wheel(e) => editor.handle_wheel(e),
            InputEvent::Resize { width, height } => editor.notify_resize(width, height),
            InputEvent::WindowRelease(id) => editor.resolve_release(id, None, effects),
        })
    }

    /// Switch the active tool, aborting any in-flight session first.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Effect> {
        self.with_effects(|editor, effects| {
            if tool == editor.tool {
                return;
            }
            editor.abort_session(effects);
            editor.tool = tool;
            tracing::debug!(?tool, "tool switched");
        })
    }

    /// Switch the place-tool sub-mode.
    pub fn set_place_mode(&mut self, mode: PlaceMode) -> Vec<Effect> {
        self.with_effects(|editor, _| {
            editor.place_mode = mode;
        })
    }

    /// Choose the component type the place tool will put down.
    pub fn set_active_component_type(&mut self, kind: ComponentType) -> Vec<Effect> {
        self.with_effects(|editor, _| {
            editor.active_component_type = kind;
        })
    }

    fn with_effects(&mut self, f: impl FnOnce(&mut Self, &mut Vec<Effect>)) -> Vec<Effect> {
        let mut effects = Vec::new();
        let cursor_before = self.cursor();
        let dirty_before = self.dirty;

        f(self, &mut effects);

        if self.dirty && !dirty_before {
            effects.push(Effect::RequestRedraw);
        }
        let cursor_after = self.cursor();
        if cursor_after != cursor_before {
            effects.push(Effect::CursorChanged(cursor_after));
        }
        effects
    }

    fn handle_pointer(&mut self, e: PointerEvent, effects: &mut Vec<Effect>) {
        match e.phase {
            PointerPhase::Down => {
                if e.is_primary_down() && self.session.is_idle() {
                    self.begin_session(e, effects);
                }
            }
            PointerPhase::Move => self.pointer_move(e),
            // Cancel resolves exactly like Up.
            PointerPhase::Up | PointerPhase::Cancel => {
                self.resolve_release(e.id, Some(e.position), effects);
            }
        }
    }

    fn begin_session(&mut self, e: PointerEvent, effects: &mut Vec<Effect>) {
        let cell = self.cell_under(e.position);
        match self.tool {
            Tool::Pan => {
                self.session = Session::Pan {
                    pointer: e.id,
                    last: e.position,
                };
                effects.push(Effect::CapturePointer(e.id));
            }
            Tool::Select => {
                let Some(cell) = cell else {
                    if self.document.clear_selection() {
                        self.mark_dirty();
                    }
                    return;
                };
                if let Some(component) = self.document.component_at(cell) {
                    let id = component.id.clone();
                    self.document.select_component(&id);
                    self.session = Session::DragComponent {
                        pointer: e.id,
                        id,
                        origin: cell,
                        hover: Some(cell),
                    };
                    effects.push(Effect::CapturePointer(e.id));
                    self.mark_dirty();
                } else if self.document.is_blocked(cell) {
                    let key = cell.key();
                    self.document.select_blocked(&key);
                    self.session = Session::DragBlocked {
                        pointer: e.id,
                        from_key: key,
                        hover: Some(cell),
                    };
                    effects.push(Effect::CapturePointer(e.id));
                    self.mark_dirty();
                } else if self.document.clear_selection() {
                    self.mark_dirty();
                }
            }
            Tool::Place => {
                let Some(cell) = cell else { return };
                match self.place_mode {
                    PlaceMode::Component => {
                        let kind = self.active_component_type;
                        self.apply_undoable(|doc| doc.place_component(cell, kind));
                    }
                    PlaceMode::InvalidCell => {
                        let outcome = self.apply_undoable(|doc| doc.toggle_blocked(cell));
                        if outcome.is_applied() && self.document.is_blocked(cell) {
                            self.document.select_blocked(&cell.key());
                        }
                    }
                }
                self.update_hover(e.position);
            }
            Tool::Erase => {
                let Some(cell) = cell else { return };
                self.apply_undoable(|doc| doc.erase_at(cell));
                self.update_hover(e.position);
            }
        }
    }

    fn pointer_move(&mut self, e: PointerEvent) {
        match self.session.clone() {
            Session::Pan { pointer, last } if pointer == e.id => {
                self.camera
                    .pan_by(e.position.x - last.x, e.position.y - last.y);
                self.session = Session::Pan {
                    pointer,
                    last: e.position,
                };
                self.mark_dirty();
            }
            Session::DragComponent {
                pointer,
                id,
                origin,
                hover,
            } if pointer == e.id => {
                let next = self.cell_under(e.position);
                if next != hover {
                    self.session = Session::DragComponent {
                        pointer,
                        id,
                        origin,
                        hover: next,
                    };
                    self.mark_dirty();
                }
            }
            Session::DragBlocked {
                pointer,
                from_key,
                hover,
            } if pointer == e.id => {
                let next = self.cell_under(e.position);
                if next != hover {
                    self.session = Session::DragBlocked {
                        pointer,
                        from_key,
                        hover: next,
                    };
                    self.mark_dirty();
                }
            }
            Session::Idle => self.update_hover(e.position),
            // Events from a different pointer never affect the session.
            _ => {}
        }
    }

    fn resolve_release(
        &mut self,
        id: PointerId,
        position: Option<Point>,
        effects: &mut Vec<Effect>,
    ) {
        if self.session.pointer() != Some(id) {
            return;
        }
        match std::mem::take(&mut self.session) {
            Session::Idle => {}
            Session::Pan { .. } => {
                effects.push(Effect::ReleasePointer(id));
            }
            Session::DragComponent {
                id: component,
                origin,
                hover,
                ..
            } => {
                if let Some(to) = hover
                    && to != origin
                {
                    // An invalid drop reverts silently.
                    self.apply_undoable(|doc| doc.move_component(&component, to));
                }
                effects.push(Effect::ReleasePointer(id));
                self.mark_dirty();
            }
            Session::DragBlocked { from_key, hover, .. } => {
                if let Some(to) = hover {
                    let to_key = to.key();
                    self.apply_undoable(|doc| doc.move_blocked(&from_key, &to_key));
                }
                effects.push(Effect::ReleasePointer(id));
                self.mark_dirty();
            }
        }
        if let Some(position) = position {
            self.update_hover(position);
        }
    }

    fn abort_session(&mut self, effects: &mut Vec<Effect>) {
        if let Some(pointer) = self.session.pointer() {
            self.session = Session::Idle;
            effects.push(Effect::ReleasePointer(pointer));
            self.mark_dirty();
        }
    }

    fn handle_wheel(&mut self, e: WheelEvent) {
        if e.delta_y == 0.0 {
            return;
        }
        let factor = if e.delta_y < 0.0 {
            ZOOM_STEP
        } else {
            1.0 / ZOOM_STEP
        };
        let new_zoom = (self.camera.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        if new_zoom == self.camera.zoom {
            return;
        }
        // Keep the world point under the cursor fixed.
        let world = canvas_to_world(e.position, &self.camera);
        self.camera.zoom = new_zoom;
        self.camera.pan_x = e.position.x - world.x * new_zoom;
        self.camera.pan_y = e.position.y - world.y * new_zoom;
        self.mark_dirty();
    }

    // ------------------------------------------------------------------
    // Resize coalescing
    // ------------------------------------------------------------------

    /// Record a resize. Only the latest size before the next
    /// [`commit_resize`](Self::commit_resize) is kept.
    pub fn notify_resize(&mut self, width: f64, height: f64) {
        self.pending_resize = Some(Viewport::new(width, height));
    }

    /// Apply the pending resize, if any. Called once per scheduler tick.
    pub fn commit_resize(&mut self) {
        if let Some(viewport) = self.pending_resize.take()
            && viewport != self.viewport
        {
            self.viewport = viewport;
            self.mark_dirty();
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Take the scene for this tick, if anything changed since the last
    /// call. Clears the dirty flag.
    pub fn take_scene(&mut self) -> Option<Scene> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(build_scene(
            &self.document,
            &self.camera,
            self.viewport,
            &self.session,
            self.hover.as_ref(),
            CELL_SIZE,
        ))
    }

    /// The cursor shape for the current tool, session, and hover target.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        if !self.session.is_idle() {
            return Cursor::Grabbing;
        }
        match self.tool {
            Tool::Pan => Cursor::Grab,
            Tool::Select => match &self.hover {
                Some(HoverTarget::Component(_) | HoverTarget::Blocked(_)) => Cursor::Pointer,
                _ => Cursor::Default,
            },
            Tool::Erase => Cursor::Crosshair,
            Tool::Place => match (&self.hover, self.place_mode) {
                // An empty in-grid cell is the only legal component target;
                // the blocked toggle is legal anywhere inside the grid.
                (Some(HoverTarget::Cell(_)), PlaceMode::Component) => Cursor::Crosshair,
                (Some(_), PlaceMode::InvalidCell) => Cursor::Crosshair,
                _ => Cursor::NotAllowed,
            },
        }
    }

    // ------------------------------------------------------------------
    // Document operations (undoable)
    // ------------------------------------------------------------------

    /// Place a component.
    pub fn place_component(&mut self, cell: Cell, kind: ComponentType) -> MutationOutcome {
        self.apply_undoable(|doc| doc.place_component(cell, kind))
    }

    /// Move a component to another cell.
    pub fn move_component(&mut self, id: &ComponentId, to: Cell) -> MutationOutcome {
        self.apply_undoable(|doc| doc.move_component(id, to))
    }

    /// Erase whatever occupies a cell.
    pub fn erase_at(&mut self, cell: Cell) -> MutationOutcome {
        self.apply_undoable(|doc| doc.erase_at(cell))
    }

    /// Flip a cell's blocked state.
    pub fn toggle_blocked(&mut self, cell: Cell) -> MutationOutcome {
        self.apply_undoable(|doc| doc.toggle_blocked(cell))
    }

    /// Move a blocked cell, carrying its label.
    pub fn move_blocked(&mut self, from_key: &str, to_key: &str) -> MutationOutcome {
        self.apply_undoable(|doc| doc.move_blocked(from_key, to_key))
    }

    /// Resize the grid.
    pub fn resize_grid(&mut self, cols: u32, rows: u32) -> MutationOutcome {
        self.apply_undoable(|doc| doc.resize_grid(cols, rows))
    }

    /// Remove a component or blocked entry.
    pub fn delete_item(&mut self, target: &ItemRef) -> MutationOutcome {
        self.apply_undoable(|doc| doc.delete_item(target))
    }

    /// Empty the document, keeping the grid size.
    pub fn clear_all(&mut self) -> MutationOutcome {
        self.apply_undoable(Document::clear_all)
    }

    /// Rename a component or blocked cell. A conflicting name fails without
    /// mutating or snapshotting.
    pub fn rename(&mut self, target: &ItemRef, label: &str) -> Result<MutationOutcome, EditError> {
        let before = self.document.clone();
        let outcome = self.document.rename(target, label)?;
        if outcome.is_applied() {
            self.history.push(before);
            self.mark_dirty();
        }
        Ok(outcome)
    }

    fn apply_undoable(
        &mut self,
        f: impl FnOnce(&mut Document) -> MutationOutcome,
    ) -> MutationOutcome {
        let before = self.document.clone();
        let outcome = f(&mut self.document);
        if outcome.is_applied() {
            self.history.push(before);
            self.mark_dirty();
            tracing::debug!(undo_depth = self.history.depth(), "mutation applied");
        }
        outcome
    }

    // ------------------------------------------------------------------
    // Selection (not undoable)
    // ------------------------------------------------------------------

    /// Select a component, auto-focusing the camera if it is off screen.
    pub fn select_component(&mut self, id: &ComponentId) -> bool {
        if !self.document.select_component(id) {
            return false;
        }
        self.mark_dirty();
        self.maybe_auto_focus();
        true
    }

    /// Select a blocked cell, auto-focusing the camera if it is off screen.
    pub fn select_blocked(&mut self, key: &str) -> bool {
        if !self.document.select_blocked(key) {
            return false;
        }
        self.mark_dirty();
        self.maybe_auto_focus();
        true
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) -> bool {
        if self.document.clear_selection() {
            self.mark_dirty();
            return true;
        }
        false
    }

    /// Recenter on the newly selected cell when it is fully outside the
    /// visible window. Runs only when no session is active, and at most
    /// once per selection change because the callers fire only on an
    /// actual change.
    fn maybe_auto_focus(&mut self) {
        if !self.session.is_idle() || self.viewport.is_empty() {
            return;
        }
        let cell = match &self.document.selection {
            Selection::Component(id) => match self.document.component(id) {
                Some(component) => component.cell,
                None => return,
            },
            Selection::Blocked(key) => match Cell::parse_key(key) {
                Some(cell) => cell,
                None => return,
            },
            Selection::None => return,
        };

        let visible = visible_cell_bounds(self.viewport, &self.camera, self.document.grid, CELL_SIZE);
        if visible.is_some_and(|bounds| bounds.contains(cell)) {
            return;
        }

        let zoom = self.camera.zoom.max(FOCUS_ZOOM);
        let center_x = (f64::from(cell.x) + 0.5) * CELL_SIZE;
        let center_y = (f64::from(cell.y) + 0.5) * CELL_SIZE;
        self.camera = Camera::new(
            self.viewport.width / 2.0 - center_x * zoom,
            self.viewport.height / 2.0 - center_y * zoom,
            zoom,
        );
        self.mark_dirty();
        tracing::debug!(x = cell.x, y = cell.y, "auto-focused selection");
    }

    // ------------------------------------------------------------------
    // Undo
    // ------------------------------------------------------------------

    /// Undo the most recent applied mutation. Camera and viewport are
    /// untouched. Returns `false` when the history is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo() else {
            return false;
        };
        self.document = previous;
        self.mark_dirty();
        tracing::debug!(undo_depth = self.history.depth(), "undo");
        true
    }

    /// Check whether undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    // ------------------------------------------------------------------
    // Layouts
    // ------------------------------------------------------------------

    /// Save the current state as a layout.
    ///
    /// When a layout is currently selected, it is overwritten in place and
    /// its `updated_at` refreshed; otherwise a new record with a fresh id
    /// is created and selected. Returns the layout id.
    pub fn save_layout(&mut self, name: &str) -> StorageResult<String> {
        let mut layouts = self.store.load_layouts();
        let snapshot = gridplan_store::encode(
            &self.document,
            &self.camera,
            self.tool,
            self.place_mode,
            self.active_component_type,
        );
        let now = self.clock.now_ms();
        let name = {
            let trimmed = name.trim();
            if trimmed.is_empty() { "Untitled" } else { trimmed }.to_string()
        };

        if let Some(selected) = self.store.selected_layout_id()
            && let Some(existing) = layouts.iter_mut().find(|l| l.id == selected)
        {
            existing.name = name;
            existing.data = snapshot;
            existing.updated_at = now;
            self.store.save_layouts(&layouts)?;
            tracing::debug!(id = %selected, "layout overwritten");
            return Ok(selected);
        }

        let id = next_layout_id(&layouts);
        layouts.push(SavedLayout {
            schema_version: gridplan_store::LAYOUT_SCHEMA_VERSION,
            id: id.clone(),
            name,
            created_at: now,
            updated_at: now,
            data: snapshot,
        });
        self.store.save_layouts(&layouts)?;
        self.store.set_selected_layout_id(Some(&id))?;
        tracing::debug!(id = %id, "layout saved");
        Ok(id)
    }

    /// Open a saved layout, replacing the whole editing state. The undo
    /// stack is cleared. Returns `false` when the id is unknown or the
    /// record no longer decodes.
    pub fn open_layout(&mut self, id: &str) -> StorageResult<bool> {
        let layouts = self.store.load_layouts();
        let Some(layout) = layouts.iter().find(|l| l.id == id) else {
            return Ok(false);
        };
        let restored = match gridplan_store::decode(&layout.data) {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "layout snapshot no longer decodes");
                return Ok(false);
            }
        };

        self.session = Session::Idle;
        self.hover = None;
        self.document = restored.document;
        self.camera = restored.camera;
        self.tool = restored.tool;
        self.place_mode = restored.place_mode;
        self.active_component_type = restored.active_component_type;
        self.history.clear();
        self.store.set_selected_layout_id(Some(id))?;
        self.mark_dirty();
        tracing::debug!(id = %id, "layout opened");
        Ok(true)
    }

    /// Rename a saved layout. Returns `false` when the id is unknown.
    pub fn rename_layout(&mut self, id: &str, name: &str) -> StorageResult<bool> {
        let mut layouts = self.store.load_layouts();
        let Some(layout) = layouts.iter_mut().find(|l| l.id == id) else {
            return Ok(false);
        };
        layout.name = name.trim().to_string();
        layout.updated_at = self.clock.now_ms();
        self.store.save_layouts(&layouts)?;
        Ok(true)
    }

    /// Delete a saved layout. Deleting the selected layout clears the
    /// selected-id key. Returns `false` when the id is unknown.
    pub fn delete_layout(&mut self, id: &str) -> StorageResult<bool> {
        let mut layouts = self.store.load_layouts();
        let before = layouts.len();
        layouts.retain(|l| l.id != id);
        if layouts.len() == before {
            return Ok(false);
        }
        self.store.save_layouts(&layouts)?;
        if self.store.selected_layout_id().as_deref() == Some(id) {
            self.store.set_selected_layout_id(None)?;
        }
        Ok(true)
    }

    /// Detach from the currently-selected layout without touching the
    /// document. The next save creates a new record.
    pub fn clear_selected_layout(&mut self) -> StorageResult<()> {
        self.store.set_selected_layout_id(None)
    }

    /// Replace everything with a fresh empty document and default camera.
    /// The undo stack is cleared and the selected layout detached.
    pub fn new_document(&mut self) -> StorageResult<()> {
        self.session = Session::Idle;
        self.hover = None;
        self.document = Document::default();
        self.camera = Camera::default();
        self.history.clear();
        self.store.set_selected_layout_id(None)?;
        self.mark_dirty();
        Ok(())
    }

    /// Metadata for all saved layouts, for list views.
    #[must_use]
    pub fn saved_layouts_meta(&self) -> Vec<LayoutMeta> {
        self.store.load_layouts().iter().map(LayoutMeta::from).collect()
    }

    /// The currently-selected layout id, if any.
    #[must_use]
    pub fn selected_layout_id(&self) -> Option<String> {
        self.store.selected_layout_id()
    }

    // ------------------------------------------------------------------
    // Read-only state
    // ------------------------------------------------------------------

    /// A read-only view of the whole editing state.
    #[must_use]
    pub fn state(&self) -> EditorState<'_> {
        EditorState {
            document: &self.document,
            camera: &self.camera,
            viewport: self.viewport,
            tool: self.tool,
            place_mode: self.place_mode,
            active_component_type: self.active_component_type,
        }
    }

    /// The document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The current hover target, if any.
    #[must_use]
    pub fn hover(&self) -> Option<&HoverTarget> {
        self.hover.as_ref()
    }

    /// The in-flight session.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn cell_under(&self, position: Point) -> Option<Cell> {
        let cell = world_to_cell(canvas_to_world(position, &self.camera), CELL_SIZE);
        self.document.grid.contains(cell).then_some(cell)
    }

    fn update_hover(&mut self, position: Point) {
        let next = self.cell_under(position).map(|cell| {
            if let Some(component) = self.document.component_at(cell) {
                HoverTarget::Component(component.id.clone())
            } else if self.document.is_blocked(cell) {
                HoverTarget::Blocked(cell.key())
            } else {
                HoverTarget::Cell(cell)
            }
        });
        // Only an identity change redraws; same-cell jitter stays quiet.
        if next != self.hover {
            self.hover = next;
            self.mark_dirty();
        }
    }
}

fn next_layout_id(layouts: &[SavedLayout]) -> String {
    let max = layouts
        .iter()
        .filter_map(|l| l.id.strip_prefix("layout-"))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("layout-{}", max + 1)
}
