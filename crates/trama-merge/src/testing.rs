//! Shared helpers for this crate's tests.

use std::sync::Mutex;

use serde_json::Value;
use trama_types::{Content, TextEntry};

use crate::observer::WriteObserver;

/// Records observer events in order, for asserting engine/observer interplay.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl WriteObserver for RecordingObserver {
    fn on_persisted(&self, page_id: &str, json_key: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("persist {page_id}:{json_key}"));
    }

    fn on_deleted(&self, page_id: &str, json_key: &str) {
        self.events
            .lock()
            .unwrap()
            .push(format!("delete {page_id}:{json_key}"));
    }
}

pub fn entry(page: &str, key: &str, content: Value) -> TextEntry {
    TextEntry::new(page, key, Content::from_value(content))
}
