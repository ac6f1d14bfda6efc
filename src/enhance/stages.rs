//! The twelve enhancement stages as pure `Image -> Image` functions.
//!
//! Order matters: signal-building stages (opening, sharpening, blur,
//! equalization) come before the Laplacian, and clean-up stages (median,
//! blur, threshold, closing) turn its real-valued response into strokes.
use super::Enhancer;
use crate::error::{MatchError, Result};
use crate::filters::{self, separable};
use crate::image::Image;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Resize,
    Crop,
    Opening,
    Sharpen,
    Grayscale,
    Blur,
    Equalize,
    Laplacian,
    Median,
    Smooth,
    Threshold,
    Closing,
}

impl Stage {
    pub const ALL: [Stage; 12] = [
        Stage::Resize,
        Stage::Crop,
        Stage::Opening,
        Stage::Sharpen,
        Stage::Grayscale,
        Stage::Blur,
        Stage::Equalize,
        Stage::Laplacian,
        Stage::Median,
        Stage::Smooth,
        Stage::Threshold,
        Stage::Closing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Resize => "resize",
            Stage::Crop => "crop",
            Stage::Opening => "opening",
            Stage::Sharpen => "sharpen",
            Stage::Grayscale => "grayscale",
            Stage::Blur => "gaussian_blur",
            Stage::Equalize => "clahe",
            Stage::Laplacian => "laplacian",
            Stage::Median => "median_blur",
            Stage::Smooth => "gaussian_smooth",
            Stage::Threshold => "threshold",
            Stage::Closing => "closing",
        }
    }

    pub fn apply(self, enhancer: &Enhancer, img: &Image) -> Result<Image> {
        let p = enhancer.params();
        match self {
            Stage::Resize => Ok(filters::resize_percent(img, p.resize_percent)),
            Stage::Crop => crop(enhancer, img),
            Stage::Opening => Ok(filters::open(img, enhancer.element())),
            Stage::Sharpen => {
                filters::add_weighted(img, p.sharpen.alpha, img, p.sharpen.beta, p.sharpen.gamma)
            }
            Stage::Grayscale => filters::to_gray(img),
            Stage::Blur | Stage::Smooth => Ok(separable::apply(enhancer.blur(), img)),
            Stage::Equalize => Ok(enhancer.clahe().apply(img)),
            Stage::Laplacian => Ok(filters::laplacian(
                img,
                p.laplacian.kernel,
                p.laplacian.scale,
                p.laplacian.delta,
            )),
            Stage::Median => Ok(filters::median_blur(img, p.median_kernel)),
            Stage::Threshold => Ok(filters::threshold_binary_inv(
                img,
                p.threshold.cutoff,
                p.threshold.max_value,
            )),
            Stage::Closing => Ok(filters::close(img, enhancer.element())),
        }
    }
}

fn crop(enhancer: &Enhancer, img: &Image) -> Result<Image> {
    let (dx, dy, w, h) = enhancer.params().crop.window(img.w, img.h);
    if w == 0 || h == 0 {
        return Err(MatchError::invalid_image(format!(
            "crop window of {}x{} input is empty ({w}x{h})",
            img.w, img.h
        )));
    }
    filters::translate(img, -(dx as isize), -(dy as isize), w, h)
}
