//! Run metadata.

use serde::{Deserialize, Serialize};

use crate::trace::TraceIndex;

pub type RunId = String;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub worksheet_name: String,
    /// RFC 3339.
    pub timestamp: String,
    pub engine_version: String,
    pub rows: usize,
    pub cols: usize,
    pub outputs: Vec<String>,
    #[serde(default)]
    pub failed_cells: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
    /// Byte offsets of trajectory blocks in `trace.txt`.
    #[serde(default)]
    pub trace_index: TraceIndex,
}

impl RunManifest {
    pub fn now_timestamp() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}
