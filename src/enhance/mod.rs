//! Raw fundus photograph → binary vein-edge mask.
//!
//! Overview
//! - Normalizes resolution (resize to 60 %) and cuts a fixed-proportion
//!   border (crop) so kernel sizes have the same relative reach on every
//!   input.
//! - Builds vessel contrast: opening, sharpening, luma, Gaussian blur and
//!   CLAHE.
//! - Extracts vessel boundaries with a 5×5 Laplacian, then cleans the
//!   response with median and Gaussian blurs, an inverted threshold and a
//!   closing. Vessels end up black on a white background.
//!
//! Each stage is a pure function (see [`stages`]); the enhancer owns only the
//! parameters and the objects derived from them once (structuring element,
//! Gaussian taps, CLAHE settings).

pub mod stages;

use crate::diagnostics::{EnhanceReport, StageOutput, TimingBreakdown};
use crate::error::Result;
use crate::filters::{Clahe, GaussianFilter, StructuringElement};
use crate::image::{Image, ImageU8};
use crate::params::EnhanceParams;
use log::debug;
use std::time::Instant;

pub use stages::Stage;

#[derive(Clone, Debug)]
pub struct Enhancer {
    params: EnhanceParams,
    element: StructuringElement,
    blur: GaussianFilter,
    clahe: Clahe,
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::new(EnhanceParams::default())
    }
}

impl Enhancer {
    pub fn new(params: EnhanceParams) -> Self {
        let element = StructuringElement::rect(params.morph_kernel);
        let blur = GaussianFilter::new(params.blur_kernel, params.blur_sigma);
        let clahe = Clahe::from(&params.clahe);
        Self {
            params,
            element,
            blur,
            clahe,
        }
    }

    pub fn params(&self) -> &EnhanceParams {
        &self.params
    }

    pub fn element(&self) -> StructuringElement {
        self.element
    }

    pub fn blur(&self) -> &GaussianFilter {
        &self.blur
    }

    pub fn clahe(&self) -> &Clahe {
        &self.clahe
    }

    /// Produce the binary vein mask of `image`.
    ///
    /// Fails with `InvalidImage` on an empty or malformed buffer and with
    /// `InvalidParams` when the parameter set does not validate.
    pub fn enhance(&self, image: ImageU8<'_>) -> Result<Image> {
        self.run(image, false).map(|report| report.mask)
    }

    /// Like [`Enhancer::enhance`] but keeps every intermediate image.
    pub fn enhance_traced(&self, image: ImageU8<'_>) -> Result<EnhanceReport> {
        self.run(image, true)
    }

    fn run(&self, image: ImageU8<'_>, keep_stages: bool) -> Result<EnhanceReport> {
        self.params.validate()?;
        let t0 = Instant::now();
        let mut current = Image::from_view(&image)?;
        let mut timing = TimingBreakdown::default();
        let mut stages = Vec::with_capacity(Stage::ALL.len());

        for stage in Stage::ALL {
            let ts = Instant::now();
            current = stage.apply(self, &current)?;
            let elapsed_ms = ts.elapsed().as_secs_f64() * 1000.0;
            debug!(
                "Enhancer stage {:<16} -> {}x{}x{} in {:.2} ms",
                stage.label(),
                current.w,
                current.h,
                current.channels,
                elapsed_ms
            );
            timing.push(stage.label(), elapsed_ms);
            stages.push(StageOutput {
                label: stage.label(),
                width: current.w,
                height: current.h,
                channels: current.channels,
                image: keep_stages.then(|| current.clone()),
            });
        }

        timing.total_ms = t0.elapsed().as_secs_f64() * 1000.0;
        Ok(EnhanceReport {
            mask: current,
            stages,
            timing,
        })
    }
}
