//! End-to-end runs through the worksheet file, the run store and the trace.

mod common;

use std::fs;

use ff_app::{RunOptions, RunRequest, query, run_service};
use ff_catalog::names::*;
use ff_results::{CellRecord, RunStore, TraceReader};

use common::{contain_sheet, surface_sheet, write_sheet};

#[test]
fn surface_run_fills_every_cell_and_caches() {
    let path = write_sheet("ff_app_surface", &surface_sheet());

    let response = run_service::ensure_run(&RunRequest::new(&path)).expect("run failed");
    assert!(!response.loaded_from_cache);
    assert_eq!((response.table.rows, response.table.cols), (3, 2));
    assert_eq!(
        response.manifest.outputs,
        vec![V_SPREAD_AT_HEAD.to_string(), V_FLAME_LENG_AT_HEAD.to_string()]
    );
    let summary = query::get_run_summary(&response.table);
    assert_eq!(summary.populated, 3 * 2 * 2);
    assert_eq!(summary.failed_cells, 0);

    // More wind, faster spread, in both fuel models.
    let rates = query::extract_output_series(&response.table, V_SPREAD_AT_HEAD).unwrap();
    for col in 0..2 {
        let calm = rates[col].2.as_ref().and_then(|v| v.as_number()).unwrap();
        let windy = rates[2 * 2 + col].2.as_ref().and_then(|v| v.as_number()).unwrap();
        assert!(windy > calm, "column {col}: {windy} <= {calm}");
    }

    let again = run_service::ensure_run(&RunRequest::new(&path)).expect("cached run failed");
    assert!(again.loaded_from_cache);
    assert_eq!(again.run_id, response.run_id);
    assert_eq!(again.table.outputs, response.table.outputs);
    assert_eq!(again.table.row_axis, response.table.row_axis);

    let runs = run_service::list_runs(&path).unwrap();
    assert_eq!(runs.len(), 1);
    let (manifest, table) = run_service::load_run(&path, &response.run_id).unwrap();
    assert_eq!(manifest.run_id, response.run_id);
    assert_eq!(table.rows, 3);

    let csv = query::table_to_csv(&table).unwrap();
    assert_eq!(csv.lines().count(), 1 + 3 * 2);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn trace_cells_match_the_table() {
    let path = write_sheet("ff_app_trace", &surface_sheet());
    let request = RunRequest {
        worksheet_path: &path,
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
        cancel: None,
    };
    let response = run_service::ensure_run(&request).unwrap();

    let file = fs::File::open(&response.trace_path).unwrap();
    let mut reader = TraceReader::new(std::io::BufReader::new(file));
    let record = reader.cell_value(1, 1, V_SPREAD_AT_HEAD).unwrap().unwrap();
    let CellRecord::Continuous { value, units, .. } = record else {
        panic!("expected a continuous record");
    };
    assert_eq!(units, "ft/min");
    let stored = response.table.get(1, 1, 0).and_then(|v| v.as_number()).unwrap();
    assert_eq!(value, stored);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn contain_run_indexes_crew_trajectories() {
    let path = write_sheet("ff_app_contain", &contain_sheet());
    let response = run_service::ensure_run(&RunRequest::new(&path)).unwrap();
    assert_eq!(response.table.rows, 2);

    let blocks = &response.manifest.trace_index.blocks;
    assert_eq!(blocks.len(), 2);
    let block = response
        .manifest
        .trace_index
        .block(1, 0, V_CONTAIN_PATH)
        .expect("second row trajectory");
    assert!(block.points > 0);

    let store = RunStore::for_worksheet(&path).unwrap();
    let mut reader = store.open_trace(&response.run_id).unwrap();
    let header = reader.read_lines_at(block.marker_offset, 1).unwrap();
    assert!(header[0].starts_with("begin proc "), "{}", header[0]);
    let points = reader.read_points_at(block.points_offset, block.points).unwrap();
    assert_eq!(points.len(), block.points);

    let marker = reader
        .find_marker(&[&format!("begin output {V_CONTAIN_PATH} 1 0")])
        .unwrap()
        .expect("output marker");
    assert!(marker.0 > block.points_offset);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
