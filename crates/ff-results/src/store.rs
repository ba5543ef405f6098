//! Run storage API.
//!
//! Layout: `<root>/<run_id>/{manifest.json, table.json, trace.txt}`.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::table::ResultTable;
use crate::trace::TraceReader;
use crate::types::RunManifest;
use crate::{ResultsError, ResultsResult};

const MANIFEST: &str = "manifest.json";
const TABLE: &str = "table.json";
const TRACE: &str = "trace.txt";

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Runs live beside the worksheet in `.fireflow/runs`.
    pub fn for_worksheet(worksheet_path: &Path) -> ResultsResult<Self> {
        let dir = worksheet_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "worksheet path has no parent directory".to_string(),
            })?;
        Self::new(dir.join(".fireflow").join("runs"))
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST).exists()
    }

    /// Writes the trace and table before the manifest, so a manifest on
    /// disk always means a complete run.
    pub fn save_run(
        &self,
        manifest: &RunManifest,
        table: &ResultTable,
        trace: &[u8],
    ) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        fs::write(run_dir.join(TRACE), trace)?;
        fs::write(run_dir.join(TABLE), serde_json::to_string(table)?)?;
        fs::write(run_dir.join(MANIFEST), serde_json::to_string_pretty(manifest)?)?;
        Ok(())
    }

    fn existing(&self, run_id: &str, file: &str) -> ResultsResult<PathBuf> {
        let path = self.run_dir(run_id).join(file);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        Ok(path)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let content = fs::read_to_string(self.existing(run_id, MANIFEST)?)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn load_table(&self, run_id: &str) -> ResultsResult<ResultTable> {
        let content = fs::read_to_string(self.existing(run_id, TABLE)?)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn trace_path(&self, run_id: &str) -> ResultsResult<PathBuf> {
        self.existing(run_id, TRACE)
    }

    pub fn open_trace(&self, run_id: &str) -> ResultsResult<TraceReader<BufReader<File>>> {
        let file = File::open(self.trace_path(run_id)?)?;
        Ok(TraceReader::new(BufReader::new(file)))
    }

    /// Manifests of every stored run for the named worksheet, oldest first.
    pub fn list_runs(&self, worksheet_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.worksheet_name == worksheet_name
                {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
