use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use ff_core::UnitSpec;
use ff_results::*;

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("{}_{}", prefix, nanos));
    dir
}

fn column() -> ColumnDef {
    ColumnDef {
        name: "vContainStatus".into(),
        label: "Containment status".into(),
        native: UnitSpec::new("", 0),
        display: UnitSpec::new("", 0),
    }
}

fn manifest(run_id: &str, index: TraceIndex) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        worksheet_name: "Initial attack".to_string(),
        timestamp: RunManifest::now_timestamp(),
        engine_version: "0.1.0".to_string(),
        rows: 2,
        cols: 1,
        outputs: vec!["vContainStatus".into()],
        failed_cells: 0,
        diagnostics: vec![],
        trace_index: index,
    }
}

/// Two cells, each with a trajectory block.
fn write_trace() -> (Vec<u8>, TraceIndex) {
    let mut w = TraceWriter::new(Vec::new());
    for row in 0..2 {
        w.cell(row, 0, "vContainStatus", &CellRecord::Discrete { index: 0, code: "Contained".into() })
            .unwrap();
        let io = vec![
            IoLine {
                output: false,
                name: "vSurfaceFireSpreadAtHead".into(),
                value: format!("{}", 10 * (row + 1)),
                decimals: 2,
                units: "ft/min".into(),
            },
            IoLine {
                output: true,
                name: "vContainPerimeterPath".into(),
                value: "3".into(),
                decimals: 0,
                units: String::new(),
            },
        ];
        let points: Vec<(f64, f64)> = (0..3).map(|i| (i as f64 + row as f64, -(i as f64))).collect();
        w.trajectory(row, 0, "fContainSimulation", &io, "vContainPerimeterPath", &points)
            .unwrap();
    }
    w.finish().unwrap()
}

#[test]
fn save_list_load_roundtrip() {
    let dir = unique_temp_dir("ff_results_project");
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    let worksheet_path = dir.join("worksheet.yaml");
    fs::write(&worksheet_path, "version: 1\nname: test\n").expect("failed to write worksheet");

    let store = RunStore::for_worksheet(&worksheet_path).expect("failed to create run store");
    let (trace, index) = write_trace();
    let mut table = ResultTable::new(2, 1, vec![column()]);
    table.set(0, 0, 0, CellValue::Item { index: 0, code: "Contained".into() });
    table.mark_failed(1, 0, "no spread");

    store
        .save_run(&manifest("run-1", index.clone()), &table, &trace)
        .expect("failed to save run");
    assert!(store.has_run("run-1"));

    let runs = store.list_runs("Initial attack").expect("failed to list runs");
    assert_eq!(runs.len(), 1);
    assert!(store.list_runs("other").unwrap().is_empty());

    let loaded = store.load_manifest("run-1").unwrap();
    assert_eq!(loaded.trace_index, index);
    assert_eq!(store.load_table("run-1").unwrap(), table);

    store.delete_run("run-1").unwrap();
    assert!(!store.has_run("run-1"));
    assert!(matches!(
        store.load_manifest("run-1"),
        Err(ResultsError::RunNotFound { .. })
    ));
}

#[test]
fn seek_to_trajectory_by_offset() {
    let dir = unique_temp_dir("ff_results_seek");
    let store = RunStore::new(dir).unwrap();
    let (trace, index) = write_trace();
    let mut table = ResultTable::new(2, 1, vec![column()]);
    table.set(0, 0, 0, CellValue::Item { index: 0, code: "Contained".into() });
    store.save_run(&manifest("run-2", index.clone()), &table, &trace).unwrap();

    let block = index.block(1, 0, "vContainPerimeterPath").unwrap();
    assert_eq!(block.points, 3);
    let mut reader = store.open_trace("run-2").unwrap();

    let header = reader.read_lines_at(block.marker_offset, 1 + block.io_lines).unwrap();
    assert_eq!(header[0], "begin proc fContainSimulation()");
    assert_eq!(header[1], "in vSurfaceFireSpreadAtHead 20 2 ft/min");
    assert_eq!(header[2], "out vContainPerimeterPath 3 0 -");

    let points = reader.read_points_at(block.points_offset, block.points).unwrap();
    assert_eq!(points, vec![(1.0, 0.0), (2.0, -1.0), (3.0, -2.0)]);

    // Scanning finds the same block through its output marker.
    let (offset, line) = reader
        .find_marker(&["begin output", "vContainPerimeterPath", " 1 0"])
        .unwrap()
        .unwrap();
    assert!(offset > block.points_offset);
    assert_eq!(line, "begin output vContainPerimeterPath 1 0");
    assert_eq!(
        reader.scan_trajectory(1, 0, "vContainPerimeterPath").unwrap(),
        Some(points)
    );

    assert_eq!(
        reader.cell_value(1, 0, "vContainStatus").unwrap(),
        Some(CellRecord::Discrete { index: 0, code: "Contained".into() })
    );
    assert_eq!(reader.cell_value(5, 0, "vContainStatus").unwrap(), None);
}
