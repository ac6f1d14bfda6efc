//! Per-sample operators: weighted sums, luma conversion and thresholding.
use super::border::saturate_u8;
use crate::error::{MatchError, Result};
use crate::image::Image;

/// `saturate(alpha * a + beta * b + gamma)` per sample.
pub fn add_weighted(a: &Image, alpha: f64, b: &Image, beta: f64, gamma: f64) -> Result<Image> {
    if a.dimensions() != b.dimensions() || a.channels != b.channels {
        return Err(MatchError::invalid_image(format!(
            "weighted sum of {}x{}x{} and {}x{}x{}",
            a.w, a.h, a.channels, b.w, b.h, b.channels
        )));
    }
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&va, &vb)| saturate_u8((alpha * va as f64 + beta * vb as f64 + gamma) as f32))
        .collect();
    Image::from_raw(a.w, a.h, a.channels, data)
}

// Rec.601 luma in 14-bit fixed point.
const LUMA_SHIFT: u32 = 14;
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;

/// RGB to single-channel luma. Single-channel input is returned unchanged.
pub fn to_gray(src: &Image) -> Result<Image> {
    match src.channels {
        1 => Ok(src.clone()),
        3 => {
            let data = src
                .data
                .chunks_exact(3)
                .map(|px| {
                    let acc = px[0] as u32 * LUMA_R
                        + px[1] as u32 * LUMA_G
                        + px[2] as u32 * LUMA_B
                        + (1 << (LUMA_SHIFT - 1));
                    (acc >> LUMA_SHIFT) as u8
                })
                .collect();
            Image::from_raw(src.w, src.h, 1, data)
        }
        n => Err(MatchError::invalid_image(format!(
            "cannot convert {n}-channel image to gray"
        ))),
    }
}

/// Inverted binary threshold: `v > cutoff -> 0`, otherwise `max_value`.
pub fn threshold_binary_inv(src: &Image, cutoff: u8, max_value: u8) -> Image {
    Image {
        data: src
            .data
            .iter()
            .map(|&v| if v > cutoff { 0 } else { max_value })
            .collect(),
        ..src.clone()
    }
}
