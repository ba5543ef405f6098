//! Progress events and cooperative cancellation.

mod common;

use std::fs;

use ff_app::{
    AppError, CancelFlag, RunOptions, RunProgressEvent, RunRequest, RunStage,
    ensure_run_with_progress,
};
use ff_results::RunStore;

use common::{surface_sheet, write_sheet};

fn uncached(path: &std::path::Path, cancel: Option<CancelFlag>) -> RunRequest<'_> {
    RunRequest {
        worksheet_path: path,
        options: RunOptions {
            use_cache: false,
            ..RunOptions::default()
        },
        cancel,
    }
}

#[test]
fn cell_progress_is_reported() {
    let path = write_sheet("ff_app_progress", &surface_sheet());
    let mut events: Vec<RunProgressEvent> = Vec::new();
    let response = ensure_run_with_progress(
        &uncached(&path, None),
        Some(&mut |event| events.push(event)),
    )
    .expect("run with progress should succeed");

    assert!(!response.loaded_from_cache);
    assert!(events.iter().any(|e| e.stage == RunStage::Reconciling));
    let cells: Vec<_> = events.iter().filter_map(|e| e.cells.clone()).collect();
    assert_eq!(cells.first().map(|c| c.done), Some(0));
    let last = cells.last().unwrap();
    assert_eq!((last.done, last.total), (6, 6));
    assert!(cells.windows(2).all(|w| w[0].done <= w[1].done));
    assert_eq!(events.last().map(|e| e.stage.clone()), Some(RunStage::Completed));
    assert!(response.timing.total_time_s > 0.0);
    assert!(response.timing.computations > 0);

    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn cancelling_between_cells_stops_the_run() {
    let path = write_sheet("ff_app_cancel", &surface_sheet());
    let flag = CancelFlag::new();
    let trigger = flag.clone();
    let mut cells_seen = 0;

    let result = ensure_run_with_progress(
        &uncached(&path, Some(flag)),
        Some(&mut |event: RunProgressEvent| {
            if let Some(cells) = event.cells
                && cells.done >= 1
            {
                cells_seen = cells.done;
                trigger.cancel();
            }
        }),
    );

    assert!(matches!(result, Err(AppError::Cancelled)));
    assert_eq!(cells_seen, 1);

    let store = RunStore::for_worksheet(&path).unwrap();
    assert!(store.list_runs("Grass and brush").unwrap().is_empty());

    let _ = fs::remove_dir_all(path.parent().unwrap());
}
