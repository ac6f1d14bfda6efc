use crate::params::MatchParams;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct MatchDemoConfig {
    pub first: PathBuf,
    pub second: PathBuf,
    #[serde(default)]
    pub params: MatchParams,
    #[serde(default)]
    pub output: MatchDemoOutput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MatchDemoOutput {
    /// Directory receiving `image1.png` and `image2.png`.
    pub masks_dir: Option<PathBuf>,
    pub report_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_section_is_optional() {
        let cfg: MatchDemoConfig =
            serde_json::from_str(r#"{ "first": "a.jpg", "second": "b.jpg" }"#).unwrap();
        assert!(cfg.output.masks_dir.is_none());
        assert_eq!(cfg.params, MatchParams::default());
    }
}
