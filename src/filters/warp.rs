//! Affine warping with inverse mapping, bilinear sampling and a zero border.
//!
//! Transforms are 3×3 homogeneous matrices with last row `[0, 0, 1]`; the
//! crop stage and the grid template extraction both use pure translations.
use super::border::saturate_u8;
use crate::error::{MatchError, Result};
use crate::image::Image;
use nalgebra::{Matrix3, Vector3};

const EPS: f64 = 1e-12;

/// Translation by `(dx, dy)` in homogeneous form.
pub fn translation(dx: f64, dy: f64) -> Matrix3<f64> {
    Matrix3::new(1.0, 0.0, dx, 0.0, 1.0, dy, 0.0, 0.0, 1.0)
}

/// Map `src` through the forward transform `m` into a `dst_w x dst_h` image.
/// Destination pixels whose preimage falls outside `src` read as 0.
pub fn warp_affine(src: &Image, m: &Matrix3<f64>, dst_w: usize, dst_h: usize) -> Result<Image> {
    if (m[(2, 0)].abs() > EPS) || (m[(2, 1)].abs() > EPS) {
        return Err(MatchError::invalid_image(
            "warp matrix is projective, expected affine",
        ));
    }
    let inv = m
        .try_inverse()
        .ok_or_else(|| MatchError::invalid_image("warp matrix is not invertible"))?;
    let ch = src.channels;
    let mut out = Image::new(dst_w, dst_h, ch);
    for y in 0..dst_h {
        for x in 0..dst_w {
            let p = inv * Vector3::new(x as f64, y as f64, 1.0);
            for c in 0..ch {
                out.set(x, y, c, sample_bilinear(src, p[0], p[1], c));
            }
        }
    }
    Ok(out)
}

/// Integer translation into a window; exact copy with zero fill.
pub fn translate(src: &Image, dx: isize, dy: isize, dst_w: usize, dst_h: usize) -> Result<Image> {
    warp_affine(src, &translation(dx as f64, dy as f64), dst_w, dst_h)
}

fn sample_bilinear(src: &Image, sx: f64, sy: f64, c: usize) -> u8 {
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;
    let (x0, y0) = (x0 as isize, y0 as isize);
    let at = |x: isize, y: isize| -> f64 {
        if x < 0 || y < 0 || x >= src.w as isize || y >= src.h as isize {
            0.0
        } else {
            src.get(x as usize, y as usize, c) as f64
        }
    };
    if fx.abs() < EPS && fy.abs() < EPS {
        return at(x0, y0) as u8;
    }
    let top = at(x0, y0) * (1.0 - fx) + at(x0 + 1, y0) * fx;
    let bottom = at(x0, y0 + 1) * (1.0 - fx) + at(x0 + 1, y0 + 1) * fx;
    saturate_u8((top * (1.0 - fy) + bottom * fy) as f32)
}
