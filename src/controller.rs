//! View controller for the test-run table.
//!
//! Owns the run list, the current sort key and the selected run id, and keeps
//! the [`Document`] consistent with them. Rows are addressed by position after
//! a sort: re-rendering rewrites cell text only, so the `selected` marker stays
//! on the same row element even when a different run now occupies it.

use crate::document::{
    Document, RowId, Slot, SELECTED_MARKER, SORT_TOGGLE_ID, STATUS_LABEL_ID, VIEW_SUMMARY_ID,
};
use crate::record::TestRunRecord;
use color_eyre::eyre::{eyre, Result};
use std::cmp::Ordering;

/// Base of the per-run detail page. The selected id is appended verbatim.
pub const SUMMARY_BASE_URL: &str = "http://localhost:5000/tests/";
pub const STATUS_PLACEHOLDER: &str = "Select Test";

const REQUIRED_ELEMENTS: [&str; 3] = [STATUS_LABEL_ID, SORT_TOGGLE_ID, VIEW_SUMMARY_ID];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Start,
    Workers,
    Id,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Start, SortKey::Workers, SortKey::Id];

    /// Maps a sort menu item's element id to a key. Unknown ids map to `None`.
    pub fn from_menu_id(id: &str) -> Option<Self> {
        match id {
            "start" => Some(SortKey::Start),
            "workers" => Some(SortKey::Workers),
            "id" => Some(SortKey::Id),
            _ => None,
        }
    }

    pub fn menu_id(self) -> &'static str {
        match self {
            SortKey::Start => "start",
            SortKey::Workers => "workers",
            SortKey::Id => "id",
        }
    }

    /// Text of the sort menu item.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Start => "Start Time",
            SortKey::Workers => "Workers",
            SortKey::Id => "Test ID",
        }
    }

    pub fn compare(self, a: &TestRunRecord, b: &TestRunRecord) -> Ordering {
        match self {
            SortKey::Start => compare_start(a, b),
            // `None < Some`, so runs without a worker count go last
            SortKey::Workers => b.workers.cmp(&a.workers),
            SortKey::Id => a.id.cmp(&b.id),
        }
    }
}

// Unparseable starts are equal to each other and sort after every parseable
// one. `sort_by` requires a total order.
fn compare_start(a: &TestRunRecord, b: &TestRunRecord) -> Ordering {
    match (a.started_at(), b.started_at()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// A user interaction on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    RowClicked(RowId),
    SortItemClicked { menu_id: String, label: String },
    ViewSummaryClicked,
}

pub struct ViewController<D: Document> {
    records: Vec<TestRunRecord>,
    sort_by: String,
    selected: String,
    document: D,
}

impl<D: Document> ViewController<D> {
    /// Binds the controller to `document`. Fails if the status label, sort
    /// toggle or view-summary trigger is absent.
    pub fn new(records: Vec<TestRunRecord>, mut document: D) -> Result<Self> {
        for id in REQUIRED_ELEMENTS {
            if !document.has_element(id) {
                return Err(eyre!("Missing required page element #{id}"));
            }
        }
        document.set_text(STATUS_LABEL_ID, STATUS_PLACEHOLDER);
        tracing::info!(runs = records.len(), "view controller ready");
        Ok(Self {
            records,
            sort_by: SortKey::Workers.menu_id().to_string(),
            selected: String::new(),
            document,
        })
    }

    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::RowClicked(row) => self.select_row(row),
            ViewEvent::SortItemClicked { menu_id, label } => {
                self.change_sort_key(&menu_id, &label);
            }
            ViewEvent::ViewSummaryClicked => {
                self.view_summary();
            }
        }
    }

    pub fn select_row(&mut self, row: RowId) {
        for r in self.document.rows() {
            self.document.remove_marker(r, SELECTED_MARKER);
        }
        self.document.add_marker(row, SELECTED_MARKER);

        self.selected = self.document.row_first_cell(row).unwrap_or_else(|| {
            tracing::warn!(row = row.0, "clicked row has no id cell");
            String::new()
        });
        let label = format!("View Test {}", self.selected);
        self.document.set_text(STATUS_LABEL_ID, &label);
    }

    /// Handles a click on the sort menu item `menu_id` whose text is `label`.
    /// Returns `true` if the table was reordered.
    pub fn change_sort_key(&mut self, menu_id: &str, label: &str) -> bool {
        tracing::debug!(menu_id, "sort key chosen");
        menu_id.clone_into(&mut self.sort_by);
        self.document.set_text(SORT_TOGGLE_ID, label);

        let Some(key) = SortKey::from_menu_id(menu_id) else {
            tracing::debug!(menu_id, "unrecognized sort key, order unchanged");
            return false;
        };
        self.records.sort_by(|a, b| key.compare(a, b));
        self.render_rows();
        true
    }

    /// Navigates to the detail page of the selected run and returns the URL.
    /// With nothing selected the id segment is empty.
    pub fn view_summary(&mut self) -> String {
        let url = self.summary_url();
        tracing::info!(%url, "view summary");
        self.document.navigate(&url);
        url
    }

    pub fn summary_url(&self) -> String {
        format!("{SUMMARY_BASE_URL}{}", self.selected)
    }

    fn render_rows(&mut self) {
        for (idx, record) in self.records.iter().enumerate() {
            let position = idx + 1;
            tracing::trace!(position, id = record.id, "render row");
            for slot in Slot::ALL {
                let element = slot.element_id(position);
                if !self.document.set_text(&element, &slot.text_for(record)) {
                    tracing::warn!(%element, "table slot missing, skipped");
                }
            }
        }
    }

    pub fn records(&self) -> &[TestRunRecord] {
        &self.records
    }

    /// Raw id of the last sort menu item clicked, recognized or not.
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    pub fn sort_key(&self) -> Option<SortKey> {
        SortKey::from_menu_id(&self.sort_by)
    }

    /// Selected run id as read from the row, empty when nothing is selected.
    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryDocument;
    use pretty_assertions::assert_eq;

    fn record(id: u64, workers: u64, start: &str) -> TestRunRecord {
        TestRunRecord {
            id,
            config: format!("cfg-{id}"),
            start: start.to_string(),
            end: None,
            workers: Some(workers),
            locustfile: None,
        }
    }

    fn controller(records: Vec<TestRunRecord>) -> ViewController<MemoryDocument> {
        let doc = MemoryDocument::skeleton(&records);
        ViewController::new(records, doc).unwrap()
    }

    fn ids(c: &ViewController<MemoryDocument>) -> Vec<u64> {
        c.records().iter().map(|r| r.id).collect()
    }

    fn displayed_ids(c: &ViewController<MemoryDocument>) -> Vec<String> {
        c.document()
            .rows()
            .into_iter()
            .filter_map(|r| c.document().row_first_cell(r))
            .collect()
    }

    fn sort(c: &mut ViewController<MemoryDocument>, key: SortKey) -> bool {
        c.change_sort_key(key.menu_id(), key.label())
    }

    fn two_runs() -> Vec<TestRunRecord> {
        vec![record(1, 3, "2024-01-02"), record(2, 7, "2024-01-01")]
    }

    // --- Initialization ---

    #[test]
    fn init_sets_placeholder_and_default_key() {
        let c = controller(two_runs());
        assert_eq!(
            c.document().text(STATUS_LABEL_ID).as_deref(),
            Some(STATUS_PLACEHOLDER)
        );
        assert_eq!(c.sort_key(), Some(SortKey::Workers));
        assert_eq!(c.selected(), "");
    }

    #[test]
    fn init_does_not_reorder() {
        let c = controller(vec![record(5, 1, ""), record(9, 2, ""), record(2, 3, "")]);
        assert_eq!(ids(&c), vec![5, 9, 2]);
    }

    #[test]
    fn init_fails_without_required_elements() {
        for id in REQUIRED_ELEMENTS {
            let mut doc = MemoryDocument::skeleton(&two_runs());
            doc.remove_element(id);
            let err = ViewController::new(two_runs(), doc).err().unwrap();
            assert!(err.to_string().contains(id), "error should name #{id}");
        }
    }

    // --- Sorting ---

    #[test]
    fn scenario_two_runs() {
        let mut c = controller(two_runs());
        assert!(sort(&mut c, SortKey::Workers));
        assert_eq!(ids(&c), vec![2, 1]);
        assert!(sort(&mut c, SortKey::Id));
        assert_eq!(ids(&c), vec![1, 2]);
        assert!(sort(&mut c, SortKey::Start));
        assert_eq!(ids(&c), vec![2, 1]);
    }

    #[test]
    fn sort_rewrites_all_five_slots() {
        let mut runs = two_runs();
        runs[1].end = Some("2024-01-01 10:00:00".to_string());
        let mut c = controller(runs);
        sort(&mut c, SortKey::Id);
        let doc = c.document();
        assert_eq!(doc.text("1-id").as_deref(), Some("1"));
        assert_eq!(doc.text("1-cfg").as_deref(), Some("cfg-1"));
        assert_eq!(doc.text("1-start").as_deref(), Some("2024-01-02"));
        assert_eq!(doc.text("1-end").as_deref(), Some(""));
        assert_eq!(doc.text("1-workers").as_deref(), Some("3"));
        assert_eq!(doc.text("2-end").as_deref(), Some("2024-01-01 10:00:00"));
        assert_eq!(displayed_ids(&c), vec!["1", "2"]);
    }

    #[test]
    fn workers_descending() {
        let mut c = controller(vec![
            record(1, 10, ""),
            record(2, 400, ""),
            record(3, 0, ""),
            record(4, 50, ""),
        ]);
        sort(&mut c, SortKey::Workers);
        let workers: Vec<u64> = c.records().iter().filter_map(|r| r.workers).collect();
        assert_eq!(workers, vec![400, 50, 10, 0]);
    }

    #[test]
    fn workers_without_count_sort_last() {
        let mut unknown = record(2, 0, "");
        unknown.workers = None;
        let mut c = controller(vec![record(1, 0, ""), unknown, record(3, 7, "")]);
        sort(&mut c, SortKey::Workers);
        let ids: Vec<u64> = c.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(c.document().text("3-workers").as_deref(), Some(""));
    }

    #[test]
    fn start_handles_server_format_across_years() {
        let mut c = controller(vec![
            record(1, 1, "09:00:00 01/05/2025"),
            record(2, 1, "23:59:59 12/31/2024"),
            record(3, 1, "00:00:01 01/05/2025"),
        ]);
        sort(&mut c, SortKey::Start);
        assert_eq!(ids(&c), vec![2, 3, 1]);
    }

    #[test]
    fn start_with_unparseable_dates_completes() {
        let mut c = controller(vec![
            record(1, 1, "not a date"),
            record(2, 1, "2024-02-01"),
            record(3, 1, ""),
            record(4, 1, "2024-01-01"),
        ]);
        assert!(sort(&mut c, SortKey::Start));
        assert_eq!(ids(&c), vec![4, 2, 1, 3]);
    }

    #[test]
    fn sort_is_idempotent() {
        for key in SortKey::ALL {
            let mut c = controller(vec![
                record(3, 5, "2024-03-01"),
                record(1, 5, "2024-01-01"),
                record(2, 9, "2024-02-01"),
            ]);
            sort(&mut c, key);
            let once = displayed_ids(&c);
            sort(&mut c, key);
            assert_eq!(displayed_ids(&c), once, "key {key:?}");
        }
    }

    #[test]
    fn unknown_key_only_updates_label() {
        let mut c = controller(vec![record(5, 1, ""), record(9, 2, "")]);
        let before_rows = displayed_ids(&c);
        assert!(!c.change_sort_key("config", "Config"));
        assert_eq!(ids(&c), vec![5, 9]);
        assert_eq!(displayed_ids(&c), before_rows);
        assert_eq!(c.document().text(SORT_TOGGLE_ID).as_deref(), Some("Config"));
        assert_eq!(c.sort_by(), "config");
        assert_eq!(c.sort_key(), None);
    }

    #[test]
    fn sort_updates_toggle_label() {
        let mut c = controller(two_runs());
        sort(&mut c, SortKey::Start);
        assert_eq!(
            c.document().text(SORT_TOGGLE_ID).as_deref(),
            Some("Start Time")
        );
    }

    #[test]
    fn sort_with_missing_slot_still_renders_rest() {
        let runs = two_runs();
        let mut doc = MemoryDocument::skeleton(&runs);
        doc.remove_element("1-cfg");
        let mut c = ViewController::new(runs, doc).unwrap();
        sort(&mut c, SortKey::Id);
        assert_eq!(c.document().text("1-id").as_deref(), Some("1"));
        assert_eq!(c.document().text("2-cfg").as_deref(), Some("cfg-2"));
        assert!(!c.document().has_element("1-cfg"));
    }

    // --- Selection ---

    #[test]
    fn select_row_updates_label_and_marker() {
        let mut c = controller(vec![record(7, 1, ""), record(3, 1, "")]);
        // skeleton is newest first: row 0 = 7, row 1 = 3
        c.select_row(RowId(0));
        assert_eq!(c.selected(), "7");
        assert_eq!(
            c.document().text(STATUS_LABEL_ID).as_deref(),
            Some("View Test 7")
        );
        c.select_row(RowId(1));
        assert_eq!(c.selected(), "3");
        assert_eq!(
            c.document().text(STATUS_LABEL_ID).as_deref(),
            Some("View Test 3")
        );
        assert_eq!(c.document().marked_rows(SELECTED_MARKER), vec![RowId(1)]);
    }

    #[test]
    fn select_same_row_twice_is_idempotent() {
        let mut c = controller(two_runs());
        c.select_row(RowId(1));
        c.select_row(RowId(1));
        assert_eq!(c.document().marked_rows(SELECTED_MARKER), vec![RowId(1)]);
        assert_eq!(c.selected(), "1");
    }

    #[test]
    fn selection_is_exclusive_over_many_clicks() {
        let runs: Vec<_> = (1..=6).map(|i| record(i, i, "")).collect();
        let mut c = controller(runs);
        for row in [3, 0, 5, 5, 2, 4, 1] {
            c.select_row(RowId(row));
            assert_eq!(c.document().marked_rows(SELECTED_MARKER), vec![RowId(row)]);
        }
    }

    #[test]
    fn selection_marker_stays_on_row_after_sort() {
        // Known property: the marker belongs to the row element, so after a
        // reorder it highlights whichever run now sits in that row, while the
        // stored selection keeps the id that was clicked.
        let mut c = controller(two_runs());
        c.select_row(RowId(0));
        assert_eq!(c.selected(), "2");
        sort(&mut c, SortKey::Id);
        assert_eq!(c.document().marked_rows(SELECTED_MARKER), vec![RowId(0)]);
        assert_eq!(c.document().row_first_cell(RowId(0)).as_deref(), Some("1"));
        assert_eq!(c.selected(), "2");
        assert_eq!(c.summary_url(), format!("{SUMMARY_BASE_URL}2"));
    }

    // --- View summary ---

    #[test]
    fn view_summary_with_selection() {
        let mut c = controller(vec![record(42, 1, "")]);
        c.select_row(RowId(0));
        let url = c.view_summary();
        assert_eq!(url, "http://localhost:5000/tests/42");
        assert_eq!(c.document().last_navigation(), Some(url.as_str()));
    }

    #[test]
    fn view_summary_without_selection_has_empty_suffix() {
        let mut c = controller(two_runs());
        let url = c.view_summary();
        assert_eq!(url, "http://localhost:5000/tests/");
        assert_eq!(c.document().navigations().len(), 1);
    }

    // --- Dispatch ---

    #[test]
    fn dispatch_routes_events() {
        let mut c = controller(two_runs());
        c.dispatch(ViewEvent::SortItemClicked {
            menu_id: "id".to_string(),
            label: "Test ID".to_string(),
        });
        assert_eq!(ids(&c), vec![1, 2]);
        c.dispatch(ViewEvent::RowClicked(RowId(1)));
        assert_eq!(c.selected(), "2");
        c.dispatch(ViewEvent::ViewSummaryClicked);
        assert_eq!(
            c.document().last_navigation(),
            Some("http://localhost:5000/tests/2")
        );
    }
}
