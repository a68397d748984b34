//! The page surface the view controller drives.
//!
//! [`Document`] is the minimal capability the controller needs from a page:
//! read and write element text, toggle a marker on table rows, and navigate.
//! [`MemoryDocument`] is the in-process implementation used by the terminal
//! host and by tests. It mirrors the table skeleton the server renders.

use crate::record::TestRunRecord;
use std::collections::{BTreeMap, BTreeSet};

pub const STATUS_LABEL_ID: &str = "view-test";
pub const SORT_TOGGLE_ID: &str = "sort-toggle";
pub const VIEW_SUMMARY_ID: &str = "view-summary";
pub const SELECTED_MARKER: &str = "selected";

/// A selectable table row, identified by its place in the document.
/// This is element identity, not record identity: rows never move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

/// The five per-position text cells of a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Id,
    Config,
    Start,
    End,
    Workers,
}

impl Slot {
    pub const ALL: [Slot; 5] = [Slot::Id, Slot::Config, Slot::Start, Slot::End, Slot::Workers];

    fn suffix(self) -> &'static str {
        match self {
            Slot::Id => "id",
            Slot::Config => "cfg",
            Slot::Start => "start",
            Slot::End => "end",
            Slot::Workers => "workers",
        }
    }

    /// Element id of this slot at a 1-based table position, e.g. `3-cfg`.
    pub fn element_id(self, position: usize) -> String {
        format!("{}-{}", position, self.suffix())
    }

    pub fn text_for(self, record: &TestRunRecord) -> String {
        match self {
            Slot::Id => record.id.to_string(),
            Slot::Config => record.config.clone(),
            Slot::Start => record.start.clone(),
            Slot::End => record.end_text().to_string(),
            Slot::Workers => record.workers.map(|w| w.to_string()).unwrap_or_default(),
        }
    }
}

pub trait Document {
    fn has_element(&self, id: &str) -> bool;

    fn text(&self, id: &str) -> Option<String>;

    /// Replaces the text of element `id`. Returns `false` if there is no such element.
    fn set_text(&mut self, id: &str, text: &str) -> bool;

    /// All rows tagged as selectable, in document order.
    fn rows(&self) -> Vec<RowId>;

    fn row_first_cell(&self, row: RowId) -> Option<String>;

    fn add_marker(&mut self, row: RowId, marker: &str);

    fn remove_marker(&mut self, row: RowId, marker: &str);

    fn has_marker(&self, row: RowId, marker: &str) -> bool;

    /// Same-window navigation. Fire-and-forget.
    fn navigate(&mut self, url: &str);
}

#[derive(Debug, Clone, Default)]
struct MemoryRow {
    cells: Vec<String>,
    markers: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: BTreeMap<String, String>,
    rows: Vec<MemoryRow>,
    navigations: Vec<String>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the page the server renders for `records`: newest run first,
    /// plus the status label, sort dropdown and view-summary trigger.
    pub fn skeleton(records: &[TestRunRecord]) -> Self {
        let mut doc = Self::new();
        doc.insert_element(STATUS_LABEL_ID, "");
        doc.insert_element(SORT_TOGGLE_ID, "Workers");
        doc.insert_element(VIEW_SUMMARY_ID, "View Summary");

        let mut ordered: Vec<&TestRunRecord> = records.iter().collect();
        ordered.sort_by(|a, b| b.id.cmp(&a.id));
        for (idx, record) in ordered.iter().enumerate() {
            let position = idx + 1;
            let mut cells = Vec::with_capacity(Slot::ALL.len());
            for slot in Slot::ALL {
                let id = slot.element_id(position);
                doc.insert_element(&id, &slot.text_for(record));
                cells.push(id);
            }
            doc.push_row(cells);
        }
        doc
    }

    pub fn insert_element(&mut self, id: &str, text: &str) {
        self.elements.insert(id.to_string(), text.to_string());
    }

    pub fn remove_element(&mut self, id: &str) -> Option<String> {
        self.elements.remove(id)
    }

    /// Appends a selectable row whose cells are the given element ids.
    pub fn push_row(&mut self, cells: Vec<String>) -> RowId {
        self.rows.push(MemoryRow {
            cells,
            markers: BTreeSet::new(),
        });
        RowId(self.rows.len() - 1)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Current text of every cell of `row`, left to right.
    pub fn row_texts(&self, row: RowId) -> Vec<String> {
        self.rows.get(row.0).map_or_else(Vec::new, |r| {
            r.cells
                .iter()
                .map(|id| self.elements.get(id).cloned().unwrap_or_default())
                .collect()
        })
    }

    pub fn marked_rows(&self, marker: &str) -> Vec<RowId> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.markers.contains(marker))
            .map(|(i, _)| RowId(i))
            .collect()
    }

    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    pub fn last_navigation(&self) -> Option<&str> {
        self.navigations.last().map(String::as_str)
    }

    /// Drains navigations recorded since the last call.
    pub fn take_navigations(&mut self) -> Vec<String> {
        std::mem::take(&mut self.navigations)
    }
}

impl Document for MemoryDocument {
    fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    fn text(&self, id: &str) -> Option<String> {
        self.elements.get(id).cloned()
    }

    fn set_text(&mut self, id: &str, text: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(slot) => {
                text.clone_into(slot);
                true
            }
            None => false,
        }
    }

    fn rows(&self) -> Vec<RowId> {
        (0..self.rows.len()).map(RowId).collect()
    }

    fn row_first_cell(&self, row: RowId) -> Option<String> {
        let first = self.rows.get(row.0)?.cells.first()?;
        self.elements.get(first).cloned()
    }

    fn add_marker(&mut self, row: RowId, marker: &str) {
        if let Some(r) = self.rows.get_mut(row.0) {
            r.markers.insert(marker.to_string());
        }
    }

    fn remove_marker(&mut self, row: RowId, marker: &str) {
        if let Some(r) = self.rows.get_mut(row.0) {
            r.markers.remove(marker);
        }
    }

    fn has_marker(&self, row: RowId, marker: &str) -> bool {
        self.rows
            .get(row.0)
            .is_some_and(|r| r.markers.contains(marker))
    }

    fn navigate(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }
}
