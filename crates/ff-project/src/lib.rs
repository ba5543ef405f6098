//! ff-project: worksheet file format and validation.

pub mod schema;
pub mod validate;

use std::path::Path;

pub use schema::*;
pub use validate::{ValidationError, validate_worksheet};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported worksheet extension: {path}")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &Path) -> ProjectResult<Worksheet> {
    let content = std::fs::read_to_string(path)?;
    let worksheet: Worksheet = serde_yaml::from_str(&content)?;
    validate_worksheet(&worksheet)?;
    Ok(worksheet)
}

pub fn save_yaml(path: &Path, worksheet: &Worksheet) -> ProjectResult<()> {
    validate_worksheet(worksheet)?;
    let content = serde_yaml::to_string(worksheet)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Worksheet> {
    let content = std::fs::read_to_string(path)?;
    let worksheet: Worksheet = serde_json::from_str(&content)?;
    validate_worksheet(&worksheet)?;
    Ok(worksheet)
}

pub fn save_json(path: &Path, worksheet: &Worksheet) -> ProjectResult<()> {
    validate_worksheet(worksheet)?;
    let content = serde_json::to_string_pretty(worksheet)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, `.yaml`/`.yml` as YAML.
pub fn load(path: &Path) -> ProjectResult<Worksheet> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        Some("yaml") | Some("yml") => load_yaml(path),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}
