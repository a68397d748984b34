use crate::controller::{SortKey, ViewController, ViewEvent};
use crate::document::{Document, MemoryDocument, RowId};
use crate::record::TestRunRecord;
use color_eyre::eyre::Result;
use std::time::Instant;

// UI constants
pub const NOTIFICATION_TTL_SECS: u64 = 5;
pub const ERROR_TTL_SECS: u64 = 10;
pub const QUICK_SELECT_MAX: usize = 9;
pub const NARROW_WIDTH_THRESHOLD: u16 = 60;
pub const TICK_RATE_MS: u64 = 100;

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub timestamp: Instant,
}

/// Immutable configuration set at startup.
pub struct AppConfig {
    pub source: String,
    pub open_browser: bool,
}

/// Terminal host state around the view controller. The focus cursor plays
/// the part of the mouse pointer: it says which row a click would land on.
pub struct AppState {
    pub config: AppConfig,
    pub view: ViewController<MemoryDocument>,
    pub cursor: usize,
    pub notifications: Vec<Notification>,
    pub error: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl AppState {
    /// Builds the server-side table skeleton for `records` and binds a
    /// controller to it.
    pub fn new(config: AppConfig, records: Vec<TestRunRecord>) -> Result<Self> {
        let document = MemoryDocument::skeleton(&records);
        let view = ViewController::new(records, document)?;
        Ok(Self {
            config,
            view,
            cursor: 0,
            notifications: Vec::new(),
            error: None,
            should_quit: false,
        })
    }

    pub fn row_count(&self) -> usize {
        self.view.document().row_count()
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_cursor_down(&mut self) {
        let rows = self.row_count();
        if rows > 0 && self.cursor < rows - 1 {
            self.cursor += 1;
        }
    }

    /// Focuses the nth row (1-indexed). Out of range does nothing.
    pub fn quick_select(&mut self, n: usize) {
        if n >= 1 && n <= self.row_count() {
            self.cursor = n - 1;
        }
    }

    pub fn click_focused_row(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        self.view.dispatch(ViewEvent::RowClicked(RowId(self.cursor)));
    }

    pub fn click_sort_item(&mut self, key: SortKey) {
        self.click_sort_menu_id(key.menu_id());
    }

    /// Clicks the sort menu item with element id `menu_id`. Ids outside the
    /// menu use the id itself as the item text.
    pub fn click_sort_menu_id(&mut self, menu_id: &str) {
        let label = SortKey::from_menu_id(menu_id).map_or(menu_id, |k| k.label());
        self.view.dispatch(ViewEvent::SortItemClicked {
            menu_id: menu_id.to_string(),
            label: label.to_string(),
        });
    }

    pub fn click_view_summary(&mut self) {
        self.view.dispatch(ViewEvent::ViewSummaryClicked);
    }

    /// Navigations the page requested since the last call.
    pub fn take_navigations(&mut self) -> Vec<String> {
        self.view.document_mut().take_navigations()
    }

    pub fn is_focused_row_selected(&self) -> bool {
        self.view
            .document()
            .has_marker(RowId(self.cursor), crate::document::SELECTED_MARKER)
    }

    pub fn status_label(&self) -> String {
        self.view
            .document()
            .text(crate::document::STATUS_LABEL_ID)
            .unwrap_or_default()
    }

    pub fn sort_label(&self) -> String {
        self.view
            .document()
            .text(crate::document::SORT_TOGGLE_ID)
            .unwrap_or_default()
    }

    pub fn notify(&mut self, message: String) {
        self.notifications.push(Notification {
            message,
            timestamp: Instant::now(),
        });
    }

    pub fn prune_notifications(&mut self) {
        let now = Instant::now();
        self.notifications
            .retain(|n| now.duration_since(n.timestamp).as_secs() < NOTIFICATION_TTL_SECS);
    }

    pub fn set_error(&mut self, msg: String) {
        self.error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn prune_error(&mut self) {
        if let Some((_, ts)) = &self.error {
            if ts.elapsed().as_secs() >= ERROR_TTL_SECS {
                self.error = None;
            }
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }
}
