//! JSON runtime configuration for the binaries.
//!
//! Every file is a serde document; missing keys fall back to defaults where
//! the type allows it.
pub mod enhance_demo;
pub mod match_demo;

use crate::error::{MatchError, Result};
use crate::params::MatchParams;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

pub use enhance_demo::EnhanceDemoConfig;
pub use match_demo::MatchDemoConfig;

/// Read and parse any JSON config.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .map_err(|e| MatchError::config(path, format!("failed to read: {e}")))?;
    serde_json::from_str(&contents)
        .map_err(|e| MatchError::config(path, format!("failed to parse: {e}")))
}

/// Load a [`MatchParams`] file and validate it.
pub fn load_params(path: &Path) -> Result<MatchParams> {
    let params: MatchParams = load_config(path)?;
    params
        .validate()
        .map_err(|e| MatchError::config(path, e))?;
    Ok(params)
}
