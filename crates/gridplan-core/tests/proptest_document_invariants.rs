#![forbid(unsafe_code)]

//! Property tests for document-model invariants under arbitrary operation
//! sequences.

use gridplan_core::document::{ComponentType, Document, ItemRef, Selection};
use gridplan_core::geometry::{Cell, Grid};
use proptest::prelude::*;

const COLS: i32 = 12;
const ROWS: i32 = 12;

#[derive(Debug, Clone)]
enum Op {
    Place(Cell, ComponentType),
    MoveNth(usize, Cell),
    Erase(Cell),
    Toggle(Cell),
    MoveBlockedNth(usize, Cell),
    RenameNth(usize, String),
    DeleteNth(usize),
    Resize(u32, u32),
    ClearAll,
}

fn arb_cell() -> impl Strategy<Value = Cell> {
    (0..COLS, 0..ROWS).prop_map(|(x, y)| Cell::new(x, y))
}

fn arb_kind() -> impl Strategy<Value = ComponentType> {
    prop::sample::select(ComponentType::ALL.to_vec())
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (arb_cell(), arb_kind()).prop_map(|(c, k)| Op::Place(c, k)),
        (0..8usize, arb_cell()).prop_map(|(n, c)| Op::MoveNth(n, c)),
        arb_cell().prop_map(Op::Erase),
        arb_cell().prop_map(Op::Toggle),
        (0..8usize, arb_cell()).prop_map(|(n, c)| Op::MoveBlockedNth(n, c)),
        (0..8usize, "[a-z]{0,6}").prop_map(|(n, s)| Op::RenameNth(n, s)),
        (0..8usize).prop_map(Op::DeleteNth),
        (1u32..16, 1u32..16).prop_map(|(c, r)| Op::Resize(c, r)),
        Just(Op::ClearAll),
    ]
}

fn apply(doc: &mut Document, op: Op) {
    match op {
        Op::Place(cell, kind) => {
            doc.place_component(cell, kind);
        }
        Op::MoveNth(n, cell) => {
            if let Some(id) = doc.components.get(n).map(|c| c.id.clone()) {
                doc.move_component(&id, cell);
            }
        }
        Op::Erase(cell) => {
            doc.erase_at(cell);
        }
        Op::Toggle(cell) => {
            doc.toggle_blocked(cell);
        }
        Op::MoveBlockedNth(n, cell) => {
            if let Some(key) = doc.blocked.iter().nth(n).cloned() {
                doc.move_blocked(&key, &cell.key());
            }
        }
        Op::RenameNth(n, label) => {
            if let Some(id) = doc.components.get(n).map(|c| c.id.clone()) {
                // Conflicts are allowed to fail; the invariants below must
                // hold either way.
                let _ = doc.rename(&ItemRef::Component(id), &label);
            }
        }
        Op::DeleteNth(n) => {
            if let Some(id) = doc.components.get(n).map(|c| c.id.clone()) {
                doc.delete_item(&ItemRef::Component(id));
            }
        }
        Op::Resize(cols, rows) => {
            doc.resize_grid(cols, rows);
        }
        Op::ClearAll => {
            doc.clear_all();
        }
    }
}

fn assert_invariants(doc: &Document) {
    // 1. At most one component per cell; everything in bounds.
    for (i, a) in doc.components.iter().enumerate() {
        assert!(doc.grid.contains(a.cell), "component out of bounds");
        for b in doc.components.iter().skip(i + 1) {
            assert_ne!(a.cell, b.cell, "two components share a cell");
        }
    }
    // 2. No component on a blocked cell; blocked keys parse and are in
    //    bounds.
    for key in &doc.blocked {
        let cell = Cell::parse_key(key).expect("blocked key must parse");
        assert!(doc.grid.contains(cell), "blocked cell out of bounds");
        assert!(doc.component_at(cell).is_none(), "component on blocked cell");
    }
    // 3. Every label's key is blocked; labels are trimmed and non-empty.
    for (key, label) in &doc.blocked_labels {
        assert!(doc.blocked.contains(key), "dangling blocked label");
        assert_eq!(label.trim(), label.as_str());
        assert!(!label.is_empty());
    }
    // 4. Display names are unique, case-insensitively.
    let mut names: Vec<String> = doc
        .components
        .iter()
        .map(|c| c.display_name().to_lowercase())
        .chain(doc.blocked_labels.values().map(|l| l.to_lowercase()))
        .collect();
    let before = names.len();
    names.sort();
    names.dedup();
    assert_eq!(before, names.len(), "duplicate display name");
    // 5. Selection references something that exists.
    match &doc.selection {
        Selection::None => {}
        Selection::Component(id) => assert!(doc.component(id).is_some()),
        Selection::Blocked(key) => assert!(doc.blocked.contains(key)),
    }
}

proptest! {
    #[test]
    fn invariants_hold_under_random_op_sequences(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut doc = Document::new(Grid::new(COLS as u32, ROWS as u32));
        for op in ops {
            apply(&mut doc, op);
            assert_invariants(&doc);
        }
    }

    /// Auto-names never repeat across a document's lifetime, even through
    /// deletions and clears.
    #[test]
    fn auto_names_never_reused(ops in prop::collection::vec(arb_op(), 0..60)) {
        let mut doc = Document::new(Grid::new(COLS as u32, ROWS as u32));
        let mut seen: Vec<String> = Vec::new();
        for op in ops {
            let before: Vec<String> = doc.components.iter().map(|c| c.auto_name.clone()).collect();
            apply(&mut doc, op);
            for c in &doc.components {
                if !before.contains(&c.auto_name) {
                    // Newly assigned name must never have been seen before.
                    assert!(!seen.contains(&c.auto_name), "auto-name {} reused", c.auto_name);
                    seen.push(c.auto_name.clone());
                }
            }
        }
    }
}
