#![forbid(unsafe_code)]

//! The document model: grid, placed components, blocked cells, labels, and
//! selection.
//!
//! All mutation goes through the typed operations on [`Document`]; there is
//! no other writer. Each operation reports a [`MutationOutcome`] so the
//! caller can decide whether to record an undo snapshot (only applied,
//! document-affecting mutations are recorded).
//!
//! # Invariants
//!
//! 1. At most one component per cell.
//! 2. A blocked cell and a component never coexist in the same cell.
//! 3. Every blocked-cell label's key is present in the blocked set.
//! 4. Display names (custom label, else auto-name) are unique
//!    case-insensitively across all components and blocked cells.
//! 5. Selection references an existing component or blocked key, or is
//!    `None`; at most one of the two kinds at a time.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Cell, Grid};

/// The closed set of placeable component types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentType {
    Light,
    Switch,
    Outlet,
    Camera,
    Thermostat,
}

impl ComponentType {
    /// All component types, in palette order.
    pub const ALL: [ComponentType; 5] = [
        ComponentType::Light,
        ComponentType::Switch,
        ComponentType::Outlet,
        ComponentType::Camera,
        ComponentType::Thermostat,
    ];

    /// The auto-name prefix for this type.
    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        match self {
            ComponentType::Light => "L",
            ComponentType::Switch => "S",
            ComponentType::Outlet => "O",
            ComponentType::Camera => "C",
            ComponentType::Thermostat => "T",
        }
    }
}

impl Default for ComponentType {
    fn default() -> Self {
        ComponentType::Light
    }
}

/// Globally unique, immutable component identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    /// Wrap a raw id string.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A component placed on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedComponent {
    /// Unique, immutable identity.
    pub id: ComponentId,
    /// The component type.
    pub kind: ComponentType,
    /// The occupied cell.
    pub cell: Cell,
    /// Generated name, assigned once at creation and never recomputed.
    pub auto_name: String,
    /// Custom label; always stored trimmed and non-empty.
    pub label: Option<String>,
}

impl PlacedComponent {
    /// The display name: the custom label if set, else the auto-name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.auto_name)
    }
}

/// The current selection. At most one target at a time; selecting one kind
/// clears the other.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected.
    #[default]
    None,
    /// A component is selected.
    Component(ComponentId),
    /// A blocked cell is selected, by its canonical key.
    Blocked(String),
}

/// A reference to a renameable/deletable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// A placed component.
    Component(ComponentId),
    /// A blocked cell, by its canonical key.
    Blocked(String),
}

/// Why a mutation was rejected. Rejections are silent no-ops at the
/// document level; presentation (e.g. the red drop outline) is the
/// engine's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Target cell is outside the grid.
    OutOfBounds,
    /// Target cell already holds a different component.
    CellOccupied,
    /// Target cell is blocked.
    CellBlocked,
    /// Target cell is already blocked.
    AlreadyBlocked,
    /// The referenced item does not exist.
    NotFound,
    /// The operation would not change the document.
    NoChange,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::OutOfBounds => f.write_str("out of bounds"),
            RejectReason::CellOccupied => f.write_str("cell occupied"),
            RejectReason::CellBlocked => f.write_str("cell blocked"),
            RejectReason::AlreadyBlocked => f.write_str("already blocked"),
            RejectReason::NotFound => f.write_str("not found"),
            RejectReason::NoChange => f.write_str("no change"),
        }
    }
}

/// Outcome of a document mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The document changed.
    Applied,
    /// The document is untouched.
    Rejected(RejectReason),
}

impl MutationOutcome {
    /// Check whether the mutation changed the document.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, MutationOutcome::Applied)
    }
}

/// User-visible editing errors. Everything else in the taxonomy is handled
/// locally as a silent rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The requested display name collides with an existing one
    /// (case-insensitive, across all components and blocked cells).
    NameConflict {
        /// The offending name, trimmed.
        name: String,
    },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::NameConflict { name } => {
                write!(f, "the name \"{name}\" is already in use")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// The active interaction tool. Not undoable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Pan,
    #[default]
    Select,
    Place,
    Erase,
}

/// Sub-mode for the place tool. Not undoable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaceMode {
    #[serde(rename = "component")]
    #[default]
    Component,
    #[serde(rename = "invalidCell")]
    InvalidCell,
}

/// The maximum numeric auto-name suffix present for a type's prefix.
///
/// Only names of the exact form `<prefix><digits>` count; a custom label
/// that happens to look like one does not (auto-names are compared, not
/// display names).
#[must_use]
pub fn max_auto_suffix(components: &[PlacedComponent], kind: ComponentType) -> u32 {
    let prefix = kind.prefix();
    components
        .iter()
        .filter(|c| c.kind == kind)
        .filter_map(|c| c.auto_name.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

/// The editable document: everything the undo history snapshots.
///
/// Camera and viewport live outside the document; they are never part of a
/// snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Grid dimensions; bounds all other entities.
    pub grid: Grid,
    /// Placed components, in placement order.
    pub components: Vec<PlacedComponent>,
    /// Blocked ("invalid") cells, by canonical key. Ordered for
    /// deterministic encoding.
    pub blocked: BTreeSet<String>,
    /// Labels attached to blocked cells. Values are trimmed and non-empty.
    pub blocked_labels: BTreeMap<String, String>,
    /// The current selection.
    pub selection: Selection,
    /// Per-type auto-name counters; monotone for the life of the document.
    auto_counters: BTreeMap<ComponentType, u32>,
    /// Next component id suffix.
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Grid::default())
    }
}

impl Document {
    /// Create an empty document with the given grid.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            components: Vec::new(),
            blocked: BTreeSet::new(),
            blocked_labels: BTreeMap::new(),
            selection: Selection::None,
            auto_counters: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Assemble a document from already-sanitized parts (snapshot restore).
    ///
    /// Seeds the per-type auto-name counters from the maximum suffix
    /// present, and the id allocator past any existing `c<n>` id, so
    /// restored documents never reuse names or ids.
    #[must_use]
    pub fn from_parts(
        grid: Grid,
        components: Vec<PlacedComponent>,
        blocked: BTreeSet<String>,
        blocked_labels: BTreeMap<String, String>,
        selection: Selection,
    ) -> Self {
        let mut auto_counters = BTreeMap::new();
        for kind in ComponentType::ALL {
            let max = max_auto_suffix(&components, kind);
            if max > 0 {
                auto_counters.insert(kind, max);
            }
        }
        let next_id = components
            .iter()
            .filter_map(|c| c.id.as_str().strip_prefix('c'))
            .filter_map(|suffix| suffix.parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);

        Self {
            grid,
            components,
            blocked,
            blocked_labels,
            selection,
            auto_counters,
            next_id,
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// The component occupying a cell, if any.
    #[must_use]
    pub fn component_at(&self, cell: Cell) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| c.cell == cell)
    }

    /// Look up a component by id.
    #[must_use]
    pub fn component(&self, id: &ComponentId) -> Option<&PlacedComponent> {
        self.components.iter().find(|c| &c.id == id)
    }

    /// Check whether a cell is blocked.
    #[must_use]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked.contains(&cell.key())
    }

    /// Check whether a component could legally move to `to`.
    ///
    /// Component moves may not land on blocked cells or on cells occupied
    /// by a different component. Landing on its own cell is trivially
    /// valid.
    #[must_use]
    pub fn can_move_component(&self, id: &ComponentId, to: Cell) -> bool {
        if !self.grid.contains(to) || self.is_blocked(to) {
            return false;
        }
        match self.component_at(to) {
            Some(other) => &other.id == id,
            None => true,
        }
    }

    /// Check whether a blocked cell could legally move to `to`.
    ///
    /// Unlike component moves, landing on a cell occupied by a component is
    /// valid: the drop evicts the occupant. Landing on another blocked cell
    /// is not.
    #[must_use]
    pub fn can_move_blocked(&self, from_key: &str, to: Cell) -> bool {
        if !self.grid.contains(to) {
            return false;
        }
        let to_key = to.key();
        to_key == from_key || !self.blocked.contains(&to_key)
    }

    /// Check whether a display name is already taken, case-insensitively,
    /// across all components and blocked-cell labels, excluding `exclude`.
    #[must_use]
    pub fn name_taken(&self, name: &str, exclude: Option<&ItemRef>) -> bool {
        let needle = name.trim().to_lowercase();
        for component in &self.components {
            if matches!(exclude, Some(ItemRef::Component(id)) if id == &component.id) {
                continue;
            }
            if component.display_name().to_lowercase() == needle {
                return true;
            }
        }
        for (key, label) in &self.blocked_labels {
            if matches!(exclude, Some(ItemRef::Blocked(k)) if k == key) {
                continue;
            }
            if label.to_lowercase() == needle {
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Resize the grid, clamping each dimension to `[1, 1000]`.
    ///
    /// Components and blocked cells outside the new bounds are dropped,
    /// labels are re-sanitized against the surviving blocked set, and the
    /// selection is cleared if it referenced a dropped entity.
    pub fn resize_grid(&mut self, cols: u32, rows: u32) -> MutationOutcome {
        let grid = Grid::new(cols, rows);
        if grid == self.grid {
            return MutationOutcome::Rejected(RejectReason::NoChange);
        }
        self.grid = grid;

        self.components.retain(|c| grid.contains(c.cell));
        self.blocked
            .retain(|key| Cell::parse_key(key).is_some_and(|cell| grid.contains(cell)));
        let blocked = &self.blocked;
        self.blocked_labels.retain(|key, _| blocked.contains(key));
        self.sanitize_selection();

        MutationOutcome::Applied
    }

    /// Place a new component. No-op if the cell is occupied, blocked, or
    /// out of bounds.
    pub fn place_component(&mut self, cell: Cell, kind: ComponentType) -> MutationOutcome {
        if !self.grid.contains(cell) {
            return MutationOutcome::Rejected(RejectReason::OutOfBounds);
        }
        if self.is_blocked(cell) {
            return MutationOutcome::Rejected(RejectReason::CellBlocked);
        }
        if self.component_at(cell).is_some() {
            return MutationOutcome::Rejected(RejectReason::CellOccupied);
        }

        let id = self.alloc_id();
        let auto_name = self.next_auto_name(kind);
        self.components.push(PlacedComponent {
            id,
            kind,
            cell,
            auto_name,
            label: None,
        });
        MutationOutcome::Applied
    }

    /// Move a component to another cell, identity and name unchanged.
    ///
    /// Rejected if the destination is out of bounds, blocked, or occupied
    /// by a different component (reported to the user as an invalid drop).
    pub fn move_component(&mut self, id: &ComponentId, to: Cell) -> MutationOutcome {
        let Some(index) = self.components.iter().position(|c| &c.id == id) else {
            return MutationOutcome::Rejected(RejectReason::NotFound);
        };
        if !self.grid.contains(to) {
            return MutationOutcome::Rejected(RejectReason::OutOfBounds);
        }
        if self.is_blocked(to) {
            return MutationOutcome::Rejected(RejectReason::CellBlocked);
        }
        if let Some(other) = self.component_at(to)
            && &other.id != id
        {
            return MutationOutcome::Rejected(RejectReason::CellOccupied);
        }
        if self.components[index].cell == to {
            return MutationOutcome::Rejected(RejectReason::NoChange);
        }
        self.components[index].cell = to;
        MutationOutcome::Applied
    }

    /// Erase whatever occupies a cell: a component if present, else a
    /// blocked marker (component takes priority).
    pub fn erase_at(&mut self, cell: Cell) -> MutationOutcome {
        if let Some(index) = self.components.iter().position(|c| c.cell == cell) {
            let removed = self.components.remove(index);
            if self.selection == Selection::Component(removed.id) {
                self.selection = Selection::None;
            }
            return MutationOutcome::Applied;
        }
        let key = cell.key();
        if self.blocked.remove(&key) {
            self.blocked_labels.remove(&key);
            if self.selection == Selection::Blocked(key) {
                self.selection = Selection::None;
            }
            return MutationOutcome::Applied;
        }
        MutationOutcome::Rejected(RejectReason::NotFound)
    }

    /// Flip a cell's blocked state.
    ///
    /// Blocking evicts any occupying component; unblocking discards the
    /// cell's label. The selection is cleared if it referenced the toggled
    /// cell or the evicted component.
    pub fn toggle_blocked(&mut self, cell: Cell) -> MutationOutcome {
        if !self.grid.contains(cell) {
            return MutationOutcome::Rejected(RejectReason::OutOfBounds);
        }
        let key = cell.key();
        if self.blocked.remove(&key) {
            self.blocked_labels.remove(&key);
            if self.selection == Selection::Blocked(key) {
                self.selection = Selection::None;
            }
            return MutationOutcome::Applied;
        }

        if let Some(index) = self.components.iter().position(|c| c.cell == cell) {
            let evicted = self.components.remove(index);
            if self.selection == Selection::Component(evicted.id) {
                self.selection = Selection::None;
            }
        }
        self.blocked.insert(key);
        MutationOutcome::Applied
    }

    /// Move a blocked cell to another cell, carrying its label.
    ///
    /// Rejected if the destination is out of bounds or already blocked
    /// (unless it is the same key). A component on the destination cell is
    /// evicted: blocked cells may displace components on drop, unlike
    /// component-to-component moves.
    pub fn move_blocked(&mut self, from_key: &str, to_key: &str) -> MutationOutcome {
        if !self.blocked.contains(from_key) {
            return MutationOutcome::Rejected(RejectReason::NotFound);
        }
        if to_key == from_key {
            return MutationOutcome::Rejected(RejectReason::NoChange);
        }
        let Some(to) = Cell::parse_key(to_key) else {
            return MutationOutcome::Rejected(RejectReason::OutOfBounds);
        };
        if !self.grid.contains(to) {
            return MutationOutcome::Rejected(RejectReason::OutOfBounds);
        }
        if self.blocked.contains(to_key) {
            return MutationOutcome::Rejected(RejectReason::AlreadyBlocked);
        }

        if let Some(index) = self.components.iter().position(|c| c.cell == to) {
            let evicted = self.components.remove(index);
            if self.selection == Selection::Component(evicted.id) {
                self.selection = Selection::None;
            }
        }

        self.blocked.remove(from_key);
        self.blocked.insert(to_key.to_string());
        if let Some(label) = self.blocked_labels.remove(from_key) {
            self.blocked_labels.insert(to_key.to_string(), label);
        }
        if self.selection == Selection::Blocked(from_key.to_string()) {
            self.selection = Selection::Blocked(to_key.to_string());
        }
        MutationOutcome::Applied
    }

    /// Rename a component or blocked cell.
    ///
    /// An empty (after trimming) label clears the custom name, reverting to
    /// auto-name display. A non-empty label must be unique across the whole
    /// display-name set or the operation fails with
    /// [`EditError::NameConflict`] and nothing is mutated.
    pub fn rename(&mut self, target: &ItemRef, new_label: &str) -> Result<MutationOutcome, EditError> {
        let trimmed = new_label.trim();

        match target {
            ItemRef::Component(id) => {
                let Some(index) = self.components.iter().position(|c| &c.id == id) else {
                    return Ok(MutationOutcome::Rejected(RejectReason::NotFound));
                };
                if trimmed.is_empty() {
                    if self.components[index].label.take().is_none() {
                        return Ok(MutationOutcome::Rejected(RejectReason::NoChange));
                    }
                    return Ok(MutationOutcome::Applied);
                }
                if self.components[index].label.as_deref() == Some(trimmed) {
                    return Ok(MutationOutcome::Rejected(RejectReason::NoChange));
                }
                if self.name_taken(trimmed, Some(target)) {
                    return Err(EditError::NameConflict {
                        name: trimmed.to_string(),
                    });
                }
                self.components[index].label = Some(trimmed.to_string());
                Ok(MutationOutcome::Applied)
            }
            ItemRef::Blocked(key) => {
                if !self.blocked.contains(key) {
                    return Ok(MutationOutcome::Rejected(RejectReason::NotFound));
                }
                if trimmed.is_empty() {
                    if self.blocked_labels.remove(key).is_none() {
                        return Ok(MutationOutcome::Rejected(RejectReason::NoChange));
                    }
                    return Ok(MutationOutcome::Applied);
                }
                if self.blocked_labels.get(key).map(String::as_str) == Some(trimmed) {
                    return Ok(MutationOutcome::Rejected(RejectReason::NoChange));
                }
                if self.name_taken(trimmed, Some(target)) {
                    return Err(EditError::NameConflict {
                        name: trimmed.to_string(),
                    });
                }
                self.blocked_labels.insert(key.clone(), trimmed.to_string());
                Ok(MutationOutcome::Applied)
            }
        }
    }

    /// Remove a component or a blocked-cell entry (with its label).
    pub fn delete_item(&mut self, target: &ItemRef) -> MutationOutcome {
        match target {
            ItemRef::Component(id) => {
                let Some(index) = self.components.iter().position(|c| &c.id == id) else {
                    return MutationOutcome::Rejected(RejectReason::NotFound);
                };
                let removed = self.components.remove(index);
                if self.selection == Selection::Component(removed.id) {
                    self.selection = Selection::None;
                }
                MutationOutcome::Applied
            }
            ItemRef::Blocked(key) => {
                if !self.blocked.remove(key) {
                    return MutationOutcome::Rejected(RejectReason::NotFound);
                }
                self.blocked_labels.remove(key);
                if self.selection == Selection::Blocked(key.clone()) {
                    self.selection = Selection::None;
                }
                MutationOutcome::Applied
            }
        }
    }

    /// Empty components, blocked cells, labels, and selection. Grid size is
    /// unchanged. Auto-name counters keep counting: clearing is not a
    /// license to reuse names within the session.
    pub fn clear_all(&mut self) -> MutationOutcome {
        if self.components.is_empty() && self.blocked.is_empty() {
            return MutationOutcome::Rejected(RejectReason::NoChange);
        }
        self.components.clear();
        self.blocked.clear();
        self.blocked_labels.clear();
        self.selection = Selection::None;
        MutationOutcome::Applied
    }

    // ------------------------------------------------------------------
    // Selection (not undoable)
    // ------------------------------------------------------------------

    /// Select a component. Returns `true` if the selection changed.
    pub fn select_component(&mut self, id: &ComponentId) -> bool {
        if self.component(id).is_none() {
            return false;
        }
        let next = Selection::Component(id.clone());
        if self.selection == next {
            return false;
        }
        self.selection = next;
        true
    }

    /// Select a blocked cell by key. Returns `true` if the selection
    /// changed.
    pub fn select_blocked(&mut self, key: &str) -> bool {
        if !self.blocked.contains(key) {
            return false;
        }
        let next = Selection::Blocked(key.to_string());
        if self.selection == next {
            return false;
        }
        self.selection = next;
        true
    }

    /// Clear the selection. Returns `true` if anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        if self.selection == Selection::None {
            return false;
        }
        self.selection = Selection::None;
        true
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn sanitize_selection(&mut self) {
        let valid = match &self.selection {
            Selection::None => true,
            Selection::Component(id) => self.components.iter().any(|c| &c.id == id),
            Selection::Blocked(key) => self.blocked.contains(key),
        };
        if !valid {
            self.selection = Selection::None;
        }
    }

    fn alloc_id(&mut self) -> ComponentId {
        loop {
            let candidate = format!("c{}", self.next_id);
            self.next_id += 1;
            if !self.components.iter().any(|c| c.id.as_str() == candidate) {
                return ComponentId::new(candidate);
            }
        }
    }

    fn next_auto_name(&mut self, kind: ComponentType) -> String {
        let counter = self.auto_counters.entry(kind).or_insert(0);
        *counter += 1;
        format!("{}{}", kind.prefix(), counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(cols: u32, rows: u32) -> Document {
        Document::new(Grid::new(cols, rows))
    }

    #[test]
    fn place_assigns_monotone_auto_names() {
        let mut doc = doc(5, 5);
        for x in 0..3 {
            assert!(doc.place_component(Cell::new(x, 0), ComponentType::Light).is_applied());
        }
        let names: Vec<_> = doc.components.iter().map(|c| c.auto_name.clone()).collect();
        assert_eq!(names, ["L1", "L2", "L3"]);
    }

    #[test]
    fn deleting_never_causes_reuse() {
        let mut doc = doc(5, 5);
        for x in 0..3 {
            doc.place_component(Cell::new(x, 0), ComponentType::Light);
        }
        let first = doc.components[0].id.clone();
        assert!(doc.delete_item(&ItemRef::Component(first)).is_applied());

        doc.place_component(Cell::new(0, 1), ComponentType::Light);
        assert_eq!(doc.components.last().unwrap().auto_name, "L4");
    }

    #[test]
    fn counters_are_per_type() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.place_component(Cell::new(1, 0), ComponentType::Switch);
        doc.place_component(Cell::new(2, 0), ComponentType::Light);
        let names: Vec<_> = doc.components.iter().map(|c| c.auto_name.clone()).collect();
        assert_eq!(names, ["L1", "S1", "L2"]);
    }

    #[test]
    fn place_rejects_occupied_blocked_and_out_of_bounds() {
        let mut doc = doc(3, 3);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        assert_eq!(
            doc.place_component(Cell::new(0, 0), ComponentType::Switch),
            MutationOutcome::Rejected(RejectReason::CellOccupied)
        );

        doc.toggle_blocked(Cell::new(1, 1));
        assert_eq!(
            doc.place_component(Cell::new(1, 1), ComponentType::Light),
            MutationOutcome::Rejected(RejectReason::CellBlocked)
        );

        assert_eq!(
            doc.place_component(Cell::new(3, 0), ComponentType::Light),
            MutationOutcome::Rejected(RejectReason::OutOfBounds)
        );
        assert_eq!(doc.components.len(), 1);
    }

    #[test]
    fn move_component_rejections() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.place_component(Cell::new(1, 0), ComponentType::Light);
        doc.toggle_blocked(Cell::new(2, 2));
        let id = doc.components[0].id.clone();

        assert_eq!(
            doc.move_component(&id, Cell::new(1, 0)),
            MutationOutcome::Rejected(RejectReason::CellOccupied)
        );
        assert_eq!(
            doc.move_component(&id, Cell::new(2, 2)),
            MutationOutcome::Rejected(RejectReason::CellBlocked)
        );
        assert_eq!(
            doc.move_component(&id, Cell::new(-1, 0)),
            MutationOutcome::Rejected(RejectReason::OutOfBounds)
        );
        // Identity and cell untouched.
        assert_eq!(doc.components[0].cell, Cell::new(0, 0));

        assert!(doc.move_component(&id, Cell::new(3, 3)).is_applied());
        assert_eq!(doc.components[0].cell, Cell::new(3, 3));
        assert_eq!(doc.components[0].auto_name, "L1");
    }

    #[test]
    fn move_component_onto_own_cell_is_no_change() {
        let mut doc = doc(3, 3);
        doc.place_component(Cell::new(1, 1), ComponentType::Light);
        let id = doc.components[0].id.clone();
        assert_eq!(
            doc.move_component(&id, Cell::new(1, 1)),
            MutationOutcome::Rejected(RejectReason::NoChange)
        );
    }

    #[test]
    fn blocking_evicts_component() {
        let mut doc = doc(3, 3);
        doc.place_component(Cell::new(1, 1), ComponentType::Light);
        let id = doc.components[0].id.clone();
        doc.select_component(&id);

        assert!(doc.toggle_blocked(Cell::new(1, 1)).is_applied());
        assert!(doc.components.is_empty());
        assert!(doc.is_blocked(Cell::new(1, 1)));
        assert_eq!(doc.selection, Selection::None);
    }

    #[test]
    fn unblocking_discards_label_and_selection() {
        let mut doc = doc(3, 3);
        doc.toggle_blocked(Cell::new(0, 0));
        doc.rename(&ItemRef::Blocked("0,0".into()), "Closet").unwrap();
        doc.select_blocked("0,0");

        assert!(doc.toggle_blocked(Cell::new(0, 0)).is_applied());
        assert!(!doc.is_blocked(Cell::new(0, 0)));
        assert!(doc.blocked_labels.is_empty());
        assert_eq!(doc.selection, Selection::None);
    }

    #[test]
    fn move_blocked_evicts_destination_component() {
        let mut doc = doc(5, 5);
        doc.toggle_blocked(Cell::new(2, 2));
        doc.place_component(Cell::new(4, 4), ComponentType::Light);

        assert!(doc.move_blocked("2,2", "4,4").is_applied());
        assert!(doc.components.is_empty());
        assert!(doc.blocked.contains("4,4"));
        assert!(!doc.blocked.contains("2,2"));
    }

    #[test]
    fn move_blocked_carries_label_and_selection() {
        let mut doc = doc(5, 5);
        doc.toggle_blocked(Cell::new(0, 0));
        doc.rename(&ItemRef::Blocked("0,0".into()), "Pillar").unwrap();
        doc.select_blocked("0,0");

        assert!(doc.move_blocked("0,0", "1,1").is_applied());
        assert_eq!(doc.blocked_labels.get("1,1").map(String::as_str), Some("Pillar"));
        assert_eq!(doc.selection, Selection::Blocked("1,1".into()));
    }

    #[test]
    fn move_blocked_rejections() {
        let mut doc = doc(3, 3);
        doc.toggle_blocked(Cell::new(0, 0));
        doc.toggle_blocked(Cell::new(1, 1));

        assert_eq!(
            doc.move_blocked("0,0", "1,1"),
            MutationOutcome::Rejected(RejectReason::AlreadyBlocked)
        );
        assert_eq!(
            doc.move_blocked("0,0", "9,9"),
            MutationOutcome::Rejected(RejectReason::OutOfBounds)
        );
        assert_eq!(
            doc.move_blocked("5,5", "2,2"),
            MutationOutcome::Rejected(RejectReason::NotFound)
        );
        assert_eq!(
            doc.move_blocked("0,0", "0,0"),
            MutationOutcome::Rejected(RejectReason::NoChange)
        );
    }

    #[test]
    fn erase_prefers_component_over_blocked() {
        let mut doc = doc(3, 3);
        doc.toggle_blocked(Cell::new(0, 0));
        // A component cannot share the blocked cell, so use neighbours.
        doc.place_component(Cell::new(1, 0), ComponentType::Light);

        assert!(doc.erase_at(Cell::new(1, 0)).is_applied());
        assert!(doc.components.is_empty());

        assert!(doc.erase_at(Cell::new(0, 0)).is_applied());
        assert!(doc.blocked.is_empty());

        assert_eq!(
            doc.erase_at(Cell::new(2, 2)),
            MutationOutcome::Rejected(RejectReason::NotFound)
        );
    }

    #[test]
    fn rename_collision_is_rejected_case_insensitively() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.place_component(Cell::new(1, 0), ComponentType::Light);
        let second = doc.components[1].id.clone();

        let err = doc
            .rename(&ItemRef::Component(second.clone()), "l1")
            .unwrap_err();
        assert_eq!(
            err,
            EditError::NameConflict {
                name: "l1".to_string()
            }
        );
        assert_eq!(doc.components[1].label, None);

        assert!(doc
            .rename(&ItemRef::Component(second.clone()), "Kitchen")
            .unwrap()
            .is_applied());
        assert_eq!(doc.component(&second).unwrap().display_name(), "Kitchen");
    }

    #[test]
    fn rename_conflicts_with_blocked_labels_too() {
        let mut doc = doc(5, 5);
        doc.toggle_blocked(Cell::new(0, 0));
        doc.rename(&ItemRef::Blocked("0,0".into()), "Kitchen").unwrap();
        doc.place_component(Cell::new(1, 0), ComponentType::Light);
        let id = doc.components[0].id.clone();

        assert!(doc.rename(&ItemRef::Component(id), "KITCHEN").is_err());
    }

    #[test]
    fn rename_empty_clears_label() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        let id = doc.components[0].id.clone();
        doc.rename(&ItemRef::Component(id.clone()), "Hall").unwrap();
        assert_eq!(doc.component(&id).unwrap().display_name(), "Hall");

        assert!(doc.rename(&ItemRef::Component(id.clone()), "   ").unwrap().is_applied());
        assert_eq!(doc.component(&id).unwrap().display_name(), "L1");
    }

    #[test]
    fn rename_trims_whitespace() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        let id = doc.components[0].id.clone();
        doc.rename(&ItemRef::Component(id.clone()), "  Porch  ").unwrap();
        assert_eq!(doc.component(&id).unwrap().display_name(), "Porch");
    }

    #[test]
    fn freed_display_name_becomes_available() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.place_component(Cell::new(1, 0), ComponentType::Light);
        let first = doc.components[0].id.clone();
        let second = doc.components[1].id.clone();

        // "L1" is L1's display name until it is renamed away.
        doc.rename(&ItemRef::Component(first), "Attic").unwrap();
        assert!(doc.rename(&ItemRef::Component(second), "L1").is_ok());
    }

    #[test]
    fn resize_drops_out_of_bounds_entities() {
        let mut doc = doc(10, 10);
        doc.place_component(Cell::new(9, 9), ComponentType::Light);
        doc.place_component(Cell::new(1, 1), ComponentType::Switch);
        doc.toggle_blocked(Cell::new(8, 2));
        doc.rename(&ItemRef::Blocked("8,2".into()), "Stairs").unwrap();
        doc.toggle_blocked(Cell::new(2, 2));

        assert!(doc.resize_grid(5, 5).is_applied());
        assert_eq!(doc.components.len(), 1);
        assert_eq!(doc.components[0].kind, ComponentType::Switch);
        assert_eq!(doc.blocked.len(), 1);
        assert!(doc.blocked.contains("2,2"));
        assert!(doc.blocked_labels.is_empty());
    }

    #[test]
    fn resize_clears_dangling_selection() {
        let mut doc = doc(10, 10);
        doc.place_component(Cell::new(9, 9), ComponentType::Light);
        let id = doc.components[0].id.clone();
        doc.select_component(&id);

        doc.resize_grid(5, 5);
        assert_eq!(doc.selection, Selection::None);
    }

    #[test]
    fn resize_same_size_is_no_change() {
        let mut doc = doc(5, 5);
        assert_eq!(
            doc.resize_grid(5, 5),
            MutationOutcome::Rejected(RejectReason::NoChange)
        );
    }

    #[test]
    fn clear_all_keeps_grid_and_counters() {
        let mut doc = doc(7, 3);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.toggle_blocked(Cell::new(1, 1));

        assert!(doc.clear_all().is_applied());
        assert!(doc.components.is_empty());
        assert!(doc.blocked.is_empty());
        assert_eq!(doc.grid, Grid::new(7, 3));

        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        assert_eq!(doc.components[0].auto_name, "L2");
    }

    #[test]
    fn selection_is_mutually_exclusive() {
        let mut doc = doc(5, 5);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.toggle_blocked(Cell::new(1, 1));
        let id = doc.components[0].id.clone();

        assert!(doc.select_component(&id));
        assert_eq!(doc.selection, Selection::Component(id.clone()));

        assert!(doc.select_blocked("1,1"));
        assert_eq!(doc.selection, Selection::Blocked("1,1".into()));

        assert!(doc.select_component(&id));
        assert_eq!(doc.selection, Selection::Component(id));

        assert!(doc.clear_selection());
        assert_eq!(doc.selection, Selection::None);
        assert!(!doc.clear_selection());
    }

    #[test]
    fn select_missing_target_is_ignored() {
        let mut doc = doc(5, 5);
        assert!(!doc.select_component(&ComponentId::new("c99")));
        assert!(!doc.select_blocked("4,4"));
        assert_eq!(doc.selection, Selection::None);
    }

    #[test]
    fn from_parts_seeds_counters_and_ids() {
        let components = vec![
            PlacedComponent {
                id: ComponentId::new("c7"),
                kind: ComponentType::Light,
                cell: Cell::new(0, 0),
                auto_name: "L9".to_string(),
                label: None,
            },
            PlacedComponent {
                id: ComponentId::new("custom-id"),
                kind: ComponentType::Switch,
                cell: Cell::new(1, 0),
                auto_name: "S2".to_string(),
                label: None,
            },
        ];
        let mut doc = Document::from_parts(
            Grid::new(5, 5),
            components,
            BTreeSet::new(),
            BTreeMap::new(),
            Selection::None,
        );

        doc.place_component(Cell::new(2, 0), ComponentType::Light);
        let placed = doc.components.last().unwrap();
        assert_eq!(placed.auto_name, "L10");
        assert_eq!(placed.id.as_str(), "c8");
    }

    #[test]
    fn enum_wire_forms_are_stable() {
        assert_eq!(serde_json::to_string(&Tool::Select).unwrap(), "\"select\"");
        assert_eq!(serde_json::to_string(&PlaceMode::Component).unwrap(), "\"component\"");
        assert_eq!(
            serde_json::to_string(&PlaceMode::InvalidCell).unwrap(),
            "\"invalidCell\""
        );
        assert_eq!(
            serde_json::to_string(&ComponentType::Thermostat).unwrap(),
            "\"thermostat\""
        );
        assert_eq!(serde_json::from_str::<Tool>("\"pan\"").unwrap(), Tool::Pan);
        assert!(serde_json::from_str::<Tool>("\"lasso\"").is_err());
    }

    #[test]
    fn uniqueness_invariant_holds_under_mixed_ops() {
        let mut doc = doc(4, 4);
        doc.place_component(Cell::new(0, 0), ComponentType::Light);
        doc.place_component(Cell::new(1, 1), ComponentType::Camera);
        doc.toggle_blocked(Cell::new(1, 1));
        doc.move_blocked("1,1", "0,0");
        doc.place_component(Cell::new(2, 2), ComponentType::Light);
        doc.toggle_blocked(Cell::new(0, 0));

        // No two components share a cell; no component on a blocked cell.
        for (i, a) in doc.components.iter().enumerate() {
            assert!(!doc.blocked.contains(&a.cell.key()));
            for b in doc.components.iter().skip(i + 1) {
                assert_ne!(a.cell, b.cell);
            }
        }
    }
}
