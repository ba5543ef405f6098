//! The sample worksheets shipped with the repository load and prepare.

use std::path::Path;

use ff_app::worksheet_service;

const SAMPLES: &[&str] = &[
    "../../worksheets/surface_wind_sweep.yaml",
    "../../worksheets/initial_attack.yaml",
];

#[test]
fn samples_prepare_without_diagnostics() {
    for sample in SAMPLES {
        let path = Path::new(sample);
        let worksheet = worksheet_service::load_worksheet(path)
            .unwrap_or_else(|e| panic!("{sample}: {e}"));
        worksheet_service::check_names(&worksheet).unwrap();

        let prepared = worksheet_service::prepare(&worksheet)
            .unwrap_or_else(|e| panic!("{sample}: {e}"));
        assert!(
            prepared.reconciliation.diagnostics.is_empty(),
            "{sample}: {:?}",
            prepared.reconciliation.diagnostics
        );
        assert!(!prepared.columns.is_empty());
        assert!(prepared.rows.len() > 1);
    }
}
