//! Separable 2-D convolution and the Gaussian blur built on it.
//!
//! A horizontal pass writes into an `ImageF32` scratch buffer, then a
//! vertical pass produces the output. Taps are applied as correlation (no
//! kernel flip), which is the same thing for the symmetric kernels used here.
use super::border::{saturate_u8, Border};
use crate::image::{Image, ImageF32, ImageView, ImageViewMut};

/// Trait implemented by separable 1D filters.
pub trait SeparableFilter {
    /// Return the 1D taps (in left-to-right order). Applied identically along
    /// both axes.
    fn taps(&self) -> &[f32];
}

/// Normalised Gaussian kernel of odd length.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianFilter {
    taps: Vec<f32>,
}

impl GaussianFilter {
    /// Sampled Gaussian `exp(-(i - r)^2 / (2 sigma^2))`, normalised to sum 1.
    ///
    /// A non-positive `sigma` derives it from the size as
    /// `0.3 * ((ksize - 1) * 0.5 - 1) + 0.8`.
    pub fn new(ksize: usize, sigma: f64) -> Self {
        let ksize = ksize.max(1);
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((ksize as f64 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let centre = (ksize as f64 - 1.0) * 0.5;
        let scale = -0.5 / (sigma * sigma);
        let raw: Vec<f64> = (0..ksize)
            .map(|i| {
                let d = i as f64 - centre;
                (scale * d * d).exp()
            })
            .collect();
        let sum: f64 = raw.iter().sum();
        Self {
            taps: raw.iter().map(|v| (v / sum) as f32).collect(),
        }
    }
}

impl SeparableFilter for GaussianFilter {
    #[inline]
    fn taps(&self) -> &[f32] {
        &self.taps
    }
}

/// Correlate `src` with `kx` along rows and `ky` along columns.
pub fn convolve_separable(src: &ImageF32, kx: &[f32], ky: &[f32], border: Border) -> ImageF32 {
    let (w, h) = (src.w, src.h);
    let mut tmp = ImageF32::new(w, h);
    let mut out = ImageF32::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }
    let rx = (kx.len() / 2) as isize;
    let ry = (ky.len() / 2) as isize;

    // Column lookup is shared by all rows.
    let x_index: Vec<Vec<usize>> = (0..w as isize)
        .map(|x| {
            (0..kx.len() as isize)
                .map(|k| border.index(x + k - rx, w))
                .collect()
        })
        .collect();

    for y in 0..h {
        let src_row = src.row(y);
        let dst_row = tmp.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (tap, &sx) in kx.iter().zip(&x_index[x]) {
                acc += tap * src_row[sx];
            }
            *dst_px = acc;
        }
    }

    for y in 0..h {
        let rows: Vec<&[f32]> = (0..ky.len() as isize)
            .map(|k| tmp.row(border.index(y as isize + k - ry, h)))
            .collect();
        let dst_row = out.row_mut(y);
        for (x, dst_px) in dst_row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (tap, row) in ky.iter().zip(&rows) {
                acc += tap * row[x];
            }
            *dst_px = acc;
        }
    }
    out
}

/// Blur every channel of an 8-bit image with a separable filter
/// (reflect-101 border, results rounded back to 8 bits).
pub fn apply(filter: &dyn SeparableFilter, image: &Image) -> Image {
    let taps = filter.taps();
    image.map_planes(|plane| {
        let blurred = convolve_separable(
            &ImageF32::from_plane(plane),
            taps,
            taps,
            Border::Reflect101,
        );
        to_u8(&blurred, 1.0, 0.0)
    })
}

/// Scale, shift and saturate a float plane into an 8-bit image.
pub fn to_u8(src: &ImageF32, scale: f32, delta: f32) -> Image {
    let mut out = Image::new(src.w, src.h, 1);
    for (dst, &v) in out.data.iter_mut().zip(&src.data) {
        *dst = saturate_u8(v * scale + delta);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_taps_are_normalised_and_symmetric() {
        let g = GaussianFilter::new(7, 7.0);
        let taps = g.taps();
        assert_eq!(taps.len(), 7);
        let sum: f32 = taps.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "sum={sum}");
        for i in 0..3 {
            assert!((taps[i] - taps[6 - i]).abs() < 1e-7);
        }
        assert!(taps[3] > taps[0]);
    }

    #[test]
    fn blur_preserves_flat_image() {
        let img = Image::filled(9, 6, 1, 137);
        let out = apply(&GaussianFilter::new(7, 7.0), &img);
        assert_eq!(out, img);
    }

    #[test]
    fn blur_spreads_an_impulse() {
        let mut img = Image::new(11, 11, 1);
        img.set(5, 5, 0, 255);
        let out = apply(&GaussianFilter::new(7, 7.0), &img);
        assert!(out.get(5, 5, 0) < 255);
        assert!(out.get(4, 5, 0) > 0);
        assert_eq!(out.get(4, 5, 0), out.get(6, 5, 0));
        assert_eq!(out.get(0, 0, 0), 0);
    }
}
