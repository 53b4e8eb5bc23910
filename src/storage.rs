use crate::model::Dataset;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATASET_FILE: &str = "groove.json";

/// Resolution order: explicit path, `groove.json` walking up from the
/// current directory, then the per-user data directory.
pub fn locate_dataset(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    let cwd = env::current_dir()?;
    if let Some(found) = find_dataset_upwards(&cwd) {
        return Ok(found);
    }
    let dirs = ProjectDirs::from("", "", "groove").context("locating data directory")?;
    Ok(dirs.data_dir().join(DEFAULT_DATASET_FILE))
}

pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let data = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    let dataset: Dataset = serde_json::from_str(&data).context("parsing dataset file")?;
    dataset.validate().context("validating dataset")?;
    Ok(dataset)
}

fn find_dataset_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(DEFAULT_DATASET_FILE);
        if candidate.exists() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}
