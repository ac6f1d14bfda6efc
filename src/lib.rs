#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod compare;
pub mod diagnostics;
pub mod enhance;
pub mod error;
pub mod image;
pub mod matcher;
pub mod params;
pub mod types;

// Operator and tooling modules; public for the binaries and for experiments.
pub mod config;
pub mod filters;

// --- High-level re-exports -------------------------------------------------

pub use crate::compare::Comparator;
pub use crate::enhance::Enhancer;
pub use crate::error::{MatchError, Result};
pub use crate::matcher::{DetailedMatch, RetinaMatcher};
pub use crate::params::{CompareParams, EnhanceParams, MatchParams};
pub use crate::types::{CellScore, MatchReport};

pub use crate::diagnostics::{EnhanceReport, StageTiming, TimingBreakdown};

/// Enhance one photograph with the default parameters.
pub fn enhance(image: crate::image::ImageU8<'_>) -> Result<crate::image::Image> {
    Enhancer::default().enhance(image)
}

/// Compare two masks with the default grid, threshold and vote count.
pub fn matches(mask_a: &crate::image::Image, mask_b: &crate::image::Image) -> Result<bool> {
    Comparator::default().matches(mask_a, mask_b)
}

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use retina_match::prelude::*;
///
/// # fn main() -> retina_match::Result<()> {
/// let (w, h) = (640usize, 480usize);
/// let rgb = vec![0u8; w * h * 3];
/// let img = ImageU8::rgb(w, h, &rgb);
///
/// let report = RetinaMatcher::default().process(img, img)?;
/// println!("{} votes={}", report.decision_digit(), report.votes);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::{Image, ImageU8};
    pub use crate::{Comparator, Enhancer, MatchParams, MatchReport, RetinaMatcher};
}
