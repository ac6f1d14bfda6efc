//! Parameter types for the enhancement pipeline and the grid comparator.
//!
//! The defaults are the tuned values the decision quality depends on; change
//! them together or not at all. Every struct deserializes with
//! `#[serde(default)]`, so a JSON file only needs the keys it overrides.

use crate::error::{MatchError, Result};
use crate::filters::Clahe;
use serde::{Deserialize, Serialize};

/// Full parameter set handed to [`crate::RetinaMatcher`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchParams {
    pub enhance: EnhanceParams,
    pub compare: CompareParams,
}

impl MatchParams {
    pub fn validate(&self) -> Result<()> {
        self.enhance.validate()?;
        self.compare.validate()
    }
}

/// Constants of the 12-stage enhancement pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceParams {
    /// Output size of the resize stage, in percent of the input.
    pub resize_percent: u32,
    /// Border removal after resizing.
    pub crop: CropParams,
    /// Side of the square structuring element for opening and closing.
    pub morph_kernel: usize,
    /// Weighted self-sum used for sharpening.
    pub sharpen: SharpenParams,
    /// Gaussian aperture (odd) for both blur stages.
    pub blur_kernel: usize,
    /// Gaussian sigma for both blur stages.
    pub blur_sigma: f64,
    /// Adaptive histogram equalization.
    pub clahe: ClaheParams,
    /// Edge extraction.
    pub laplacian: LaplacianParams,
    /// Median aperture (odd) applied to the edge response.
    pub median_kernel: usize,
    /// Final binarization.
    pub threshold: ThresholdParams,
}

impl Default for EnhanceParams {
    fn default() -> Self {
        Self {
            resize_percent: 60,
            crop: CropParams::default(),
            morph_kernel: 5,
            sharpen: SharpenParams::default(),
            blur_kernel: 7,
            blur_sigma: 7.0,
            clahe: ClaheParams::default(),
            laplacian: LaplacianParams::default(),
            median_kernel: 7,
            threshold: ThresholdParams::default(),
        }
    }
}

impl EnhanceParams {
    pub fn validate(&self) -> Result<()> {
        if self.resize_percent == 0 {
            return Err(MatchError::invalid_params("resize_percent must be positive"));
        }
        if self.morph_kernel == 0 {
            return Err(MatchError::invalid_params("morph_kernel must be positive"));
        }
        for (name, k) in [
            ("blur_kernel", self.blur_kernel),
            ("median_kernel", self.median_kernel),
            ("laplacian.kernel", self.laplacian.kernel),
        ] {
            if k % 2 == 0 {
                return Err(MatchError::invalid_params(format!(
                    "{name} must be odd, got {k}"
                )));
            }
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(MatchError::invalid_params(format!(
                "blur_sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if self.clahe.tiles_x == 0 || self.clahe.tiles_y == 0 {
            return Err(MatchError::invalid_params("clahe tile grid must be non-empty"));
        }
        self.crop.validate()
    }
}

/// Translation and window used to cut away the photograph border.
///
/// With input `w × h` the window origin moves to `(w / shift_x_div,
/// h / shift_y_div)` and the window measures
/// `(w - (w / trim_w_div) * trim_w_mul, h - h / trim_h_div)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropParams {
    pub shift_x_div: usize,
    pub shift_y_div: usize,
    pub trim_w_div: usize,
    pub trim_w_mul: usize,
    pub trim_h_div: usize,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            shift_x_div: 7,
            shift_y_div: 13,
            trim_w_div: 19,
            trim_w_mul: 6,
            trim_h_div: 7,
        }
    }
}

impl CropParams {
    fn validate(&self) -> Result<()> {
        if self.shift_x_div == 0
            || self.shift_y_div == 0
            || self.trim_w_div == 0
            || self.trim_h_div == 0
        {
            return Err(MatchError::invalid_params("crop divisors must be positive"));
        }
        if self.trim_h_div < 2 {
            return Err(MatchError::invalid_params(format!(
                "crop trim_h_div must be at least 2, got {}",
                self.trim_h_div
            )));
        }
        if self.trim_w_mul >= self.trim_w_div {
            return Err(MatchError::invalid_params(
                "crop trim_w_mul must be smaller than trim_w_div",
            ));
        }
        Ok(())
    }

    /// `(shift_x, shift_y, window_w, window_h)` for an input of `w × h`.
    pub fn window(&self, w: usize, h: usize) -> (usize, usize, usize, usize) {
        (
            w / self.shift_x_div,
            h / self.shift_y_div,
            w - (w / self.trim_w_div) * self.trim_w_mul,
            h - h / self.trim_h_div,
        )
    }
}

/// `out = alpha * img + beta * img + gamma`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for SharpenParams {
    fn default() -> Self {
        Self {
            alpha: 2.0,
            beta: -0.5,
            gamma: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaheParams {
    pub clip_limit: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for ClaheParams {
    fn default() -> Self {
        let clahe = Clahe::default();
        Self {
            clip_limit: clahe.clip_limit,
            tiles_x: clahe.tiles_x,
            tiles_y: clahe.tiles_y,
        }
    }
}

impl From<&ClaheParams> for Clahe {
    fn from(p: &ClaheParams) -> Self {
        Clahe {
            clip_limit: p.clip_limit,
            tiles_x: p.tiles_x,
            tiles_y: p.tiles_y,
        }
    }
}

/// `saturate(scale * laplacian + delta)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaplacianParams {
    pub kernel: usize,
    pub scale: f32,
    pub delta: f32,
}

impl Default for LaplacianParams {
    fn default() -> Self {
        Self {
            kernel: 5,
            scale: 1.0,
            delta: 1.0,
        }
    }
}

/// Inverted binarization: samples above `cutoff` become 0, the rest
/// `max_value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdParams {
    pub cutoff: u8,
    pub max_value: u8,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            cutoff: 100,
            max_value: 255,
        }
    }
}

/// Grid comparator constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareParams {
    /// Grid is `splits × splits` cells over the first mask.
    pub splits: usize,
    /// A cell matches when its best correlation is strictly above this.
    pub match_threshold: f64,
    /// Matching cells needed for an overall match.
    pub votes_required: usize,
}

impl Default for CompareParams {
    fn default() -> Self {
        Self {
            splits: 4,
            match_threshold: 0.45,
            votes_required: 3,
        }
    }
}

impl CompareParams {
    pub fn validate(&self) -> Result<()> {
        if self.splits == 0 {
            return Err(MatchError::invalid_params("splits must be positive"));
        }
        if !self.match_threshold.is_finite() {
            return Err(MatchError::invalid_params("match_threshold must be finite"));
        }
        Ok(())
    }
}
