//! Content-based hashing for run ids.

use ff_project::Worksheet;
use sha2::{Digest, Sha256};

pub fn compute_run_id(worksheet: &Worksheet, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let worksheet_json = serde_json::to_string(worksheet).unwrap_or_default();
    hasher.update(worksheet_json.as_bytes());
    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
