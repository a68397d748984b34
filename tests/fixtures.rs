#![allow(dead_code)]

use testview::app::{AppConfig, AppState};
use testview::controller::ViewController;
use testview::document::MemoryDocument;
use testview::record::TestRunRecord;

pub fn default_record() -> TestRunRecord {
    record_with_id(1)
}

pub fn record_with_id(id: u64) -> TestRunRecord {
    TestRunRecord {
        id,
        config: format!("Test Frontend Config {id}"),
        start: "12:00:00 06/01/2024".to_string(),
        end: Some("12:30:00 06/01/2024".to_string()),
        workers: Some(50),
        locustfile: None,
    }
}

pub fn record(id: u64, workers: u64, start: &str) -> TestRunRecord {
    let mut r = record_with_id(id);
    r.workers = Some(workers);
    r.start = start.to_string();
    r
}

pub fn running_record(id: u64) -> TestRunRecord {
    let mut r = record_with_id(id);
    r.end = None;
    r
}

pub fn make_controller(records: Vec<TestRunRecord>) -> ViewController<MemoryDocument> {
    let doc = MemoryDocument::skeleton(&records);
    ViewController::new(records, doc).expect("skeleton has all controls")
}

pub fn make_state(records: Vec<TestRunRecord>) -> AppState {
    let config = AppConfig {
        source: "runs.json".to_string(),
        open_browser: false,
    };
    AppState::new(config, records).expect("skeleton has all controls")
}

/// Ids as currently shown in the first cell of each row, top to bottom.
pub fn displayed_ids(view: &ViewController<MemoryDocument>) -> Vec<String> {
    use testview::document::Document;
    let doc = view.document();
    doc.rows()
        .into_iter()
        .filter_map(|r| doc.row_first_cell(r))
        .collect()
}
