use crate::params::EnhanceParams;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct EnhanceDemoConfig {
    pub input: PathBuf,
    #[serde(default)]
    pub params: EnhanceParams,
    pub output: EnhanceDemoOutput,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceDemoOutput {
    /// Final mask image.
    pub mask: PathBuf,
    /// One `NN_<label>.png` per stage when set.
    #[serde(default)]
    pub stages_dir: Option<PathBuf>,
    /// Stage shapes and timings.
    #[serde(default)]
    pub report_json: Option<PathBuf>,
}
