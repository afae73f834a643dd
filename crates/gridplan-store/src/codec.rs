#![forbid(unsafe_code)]

//! Versioned serialization of document snapshots.
//!
//! The wire form is JSON, version-tagged with `v: 1`. Decoding validates
//! the whole snapshot once and hands back a fully-typed, sanitized
//! [`RestoredState`]; interaction logic never sees "maybe this field
//! exists" data. A snapshot that fails structural validation is rejected
//! outright — callers fall back to an empty document, never a partially
//! populated one.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use gridplan_core::document::{
    ComponentId, ComponentType, Document, PlaceMode, PlacedComponent, Selection, Tool,
    max_auto_suffix,
};
use gridplan_core::geometry::{Camera, Cell, Grid, ZOOM_MAX, ZOOM_MIN};

/// The current snapshot wire version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Errors produced while decoding a persisted snapshot.
#[derive(Debug)]
pub enum CodecError {
    /// The snapshot is structurally invalid: unparseable JSON, missing
    /// required fields, wrong version, or an invalid camera.
    Corrupt(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Corrupt(msg) => write!(f, "corrupt snapshot: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}

/// A component in wire form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    pub cell: Cell,
    /// Missing in very old saves; backfilled during sanitization.
    #[serde(default)]
    pub auto_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The persisted snapshot, version 1.
///
/// The viewport is deliberately absent: it is runtime-only and supplied by
/// the hosting surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub v: u32,
    pub grid: Grid,
    pub components: Vec<ComponentRecord>,
    pub camera: Camera,
    pub tool: Tool,
    pub active_component_type: ComponentType,
    pub place_mode: PlaceMode,
    pub selected_component_id: Option<String>,
    pub invalid_cells: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_invalid_cell_key: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub invalid_cell_labels: BTreeMap<String, String>,
}

/// Everything a decoded snapshot restores: the document plus the
/// non-undoable editor state that travels with it.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredState {
    pub document: Document,
    pub camera: Camera,
    pub tool: Tool,
    pub place_mode: PlaceMode,
    pub active_component_type: ComponentType,
}

impl Default for RestoredState {
    fn default() -> Self {
        Self {
            document: Document::default(),
            camera: Camera::default(),
            tool: Tool::default(),
            place_mode: PlaceMode::default(),
            active_component_type: ComponentType::default(),
        }
    }
}

/// Encode the live editor state into a wire snapshot.
///
/// Blocked cells are emitted in sorted key order so equal documents encode
/// byte-identically.
#[must_use]
pub fn encode(
    document: &Document,
    camera: &Camera,
    tool: Tool,
    place_mode: PlaceMode,
    active_component_type: ComponentType,
) -> Snapshot {
    let components = document
        .components
        .iter()
        .map(|c| ComponentRecord {
            id: c.id.as_str().to_string(),
            kind: c.kind,
            cell: c.cell,
            auto_name: c.auto_name.clone(),
            label: c.label.clone(),
        })
        .collect();

    let selected_component_id = match &document.selection {
        Selection::Component(id) => Some(id.as_str().to_string()),
        _ => None,
    };
    let selected_invalid_cell_key = match &document.selection {
        Selection::Blocked(key) => Some(key.clone()),
        _ => None,
    };

    Snapshot {
        v: SNAPSHOT_VERSION,
        grid: document.grid,
        components,
        camera: *camera,
        tool,
        active_component_type,
        place_mode,
        selected_component_id,
        invalid_cells: document.blocked.iter().cloned().collect(),
        selected_invalid_cell_key,
        invalid_cell_labels: document.blocked_labels.clone(),
    }
}

/// Serialize a snapshot to JSON text.
pub fn to_json(snapshot: &Snapshot) -> Result<String, CodecError> {
    serde_json::to_string(snapshot).map_err(|e| CodecError::Corrupt(e.to_string()))
}

/// Parse and sanitize a snapshot from JSON text.
pub fn from_json(json: &str) -> Result<RestoredState, CodecError> {
    let snapshot: Snapshot =
        serde_json::from_str(json).map_err(|e| CodecError::Corrupt(e.to_string()))?;
    decode(&snapshot)
}

/// Validate and sanitize a parsed snapshot into fully-typed editor state.
///
/// Sanitization repairs what it can and drops what it cannot:
/// out-of-bounds or malformed blocked keys, labels whose key is not
/// blocked or whose value trims empty, components that are out of bounds
/// or collide with a blocked cell or an earlier component, and dangling
/// selections. Missing auto-names are backfilled continuing each per-type
/// counter from the maximum suffix already present.
pub fn decode(snapshot: &Snapshot) -> Result<RestoredState, CodecError> {
    if snapshot.v != SNAPSHOT_VERSION {
        return Err(CodecError::Corrupt(format!(
            "unsupported snapshot version {}",
            snapshot.v
        )));
    }
    if !snapshot.camera.zoom.is_finite() || snapshot.camera.zoom <= 0.0 {
        return Err(CodecError::Corrupt("invalid camera zoom".into()));
    }
    if !snapshot.camera.pan_x.is_finite() || !snapshot.camera.pan_y.is_finite() {
        return Err(CodecError::Corrupt("invalid camera pan".into()));
    }

    let grid = Grid::new(snapshot.grid.cols, snapshot.grid.rows);

    // Blocked cells: parseable, in bounds, deduplicated.
    let mut blocked = BTreeSet::new();
    for key in &snapshot.invalid_cells {
        match Cell::parse_key(key) {
            Some(cell) if grid.contains(cell) => {
                blocked.insert(cell.key());
            }
            _ => tracing::warn!(key = %key, "dropping invalid blocked-cell key"),
        }
    }

    // Labels: key must be blocked, value must survive trimming.
    let mut blocked_labels = BTreeMap::new();
    for (key, label) in &snapshot.invalid_cell_labels {
        let trimmed = label.trim();
        if blocked.contains(key) && !trimmed.is_empty() {
            blocked_labels.insert(key.clone(), trimmed.to_string());
        }
    }

    // Components: in bounds, off blocked cells, one per cell, unique ids.
    let mut components: Vec<PlacedComponent> = Vec::with_capacity(snapshot.components.len());
    for record in &snapshot.components {
        let cell = record.cell;
        if !grid.contains(cell)
            || blocked.contains(&cell.key())
            || components.iter().any(|c| c.cell == cell)
            || components.iter().any(|c| c.id.as_str() == record.id)
        {
            tracing::warn!(id = %record.id, "dropping conflicting component record");
            continue;
        }
        let label = record
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string);
        components.push(PlacedComponent {
            id: ComponentId::new(record.id.clone()),
            kind: record.kind,
            cell,
            auto_name: record.auto_name.trim().to_string(),
            label,
        });
    }

    // Backfill missing auto-names, continuing each per-type counter from
    // the maximum suffix already present so numbers are never reused.
    let mut counters: BTreeMap<ComponentType, u32> = BTreeMap::new();
    for kind in ComponentType::ALL {
        counters.insert(kind, max_auto_suffix(&components, kind));
    }
    for component in &mut components {
        if component.auto_name.is_empty() {
            let counter = counters.entry(component.kind).or_insert(0);
            *counter += 1;
            component.auto_name = format!("{}{}", component.kind.prefix(), counter);
        }
    }

    // Selection: at most one target, and it must exist after sanitization.
    let selection = if let Some(id) = snapshot
        .selected_component_id
        .as_ref()
        .filter(|id| components.iter().any(|c| c.id.as_str() == id.as_str()))
    {
        Selection::Component(ComponentId::new(id.clone()))
    } else if let Some(key) = snapshot
        .selected_invalid_cell_key
        .as_ref()
        .filter(|key| blocked.contains(key.as_str()))
    {
        Selection::Blocked(key.clone())
    } else {
        Selection::None
    };

    let camera = Camera::new(
        snapshot.camera.pan_x,
        snapshot.camera.pan_y,
        snapshot.camera.zoom.clamp(ZOOM_MIN, ZOOM_MAX),
    );

    Ok(RestoredState {
        document: Document::from_parts(grid, components, blocked, blocked_labels, selection),
        camera,
        tool: snapshot.tool,
        place_mode: snapshot.place_mode,
        active_component_type: snapshot.active_component_type,
    })
}
