//! Progress events streamed while a run executes.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStage {
    LoadingWorksheet,
    CheckingCache,
    LoadingCachedResult,
    BuildingModel,
    Reconciling,
    ApplyingInputs,
    EvaluatingCells,
    WritingTrace,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingWorksheet => "loading worksheet",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::BuildingModel => "building model",
            RunStage::Reconciling => "reconciling",
            RunStage::ApplyingInputs => "applying inputs",
            RunStage::EvaluatingCells => "evaluating cells",
            RunStage::WritingTrace => "writing trace",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellProgress {
    /// Cells evaluated so far.
    pub done: usize,
    pub total: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub cells: Option<CellProgress>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
            cells: None,
        }
    }
}
