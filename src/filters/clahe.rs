//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! The image is divided into `tiles_x × tiles_y` tiles. Each tile gets a
//! clipped, redistributed histogram and the equalization LUT derived from it.
//! Output pixels interpolate bilinearly between the LUTs of the four tiles
//! whose centres surround them.
//!
//! When the image size is not a multiple of the tile grid, histograms are
//! gathered from a reflect-101 padded copy (padding added on the right and
//! bottom only) so that every tile has the same area.
use super::border::{saturate_u8, Border};
use crate::image::Image;

const BINS: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clahe {
    pub clip_limit: f64,
    pub tiles_x: usize,
    pub tiles_y: usize,
}

impl Default for Clahe {
    fn default() -> Self {
        Self {
            clip_limit: 40.0,
            tiles_x: 8,
            tiles_y: 8,
        }
    }
}

impl Clahe {
    /// Equalize every channel independently.
    pub fn apply(&self, src: &Image) -> Image {
        src.map_planes(|plane| self.apply_plane(plane))
    }

    fn apply_plane(&self, src: &Image) -> Image {
        if src.is_empty() {
            return src.clone();
        }
        let tx = self.tiles_x.max(1);
        let ty = self.tiles_y.max(1);
        let divisible = src.w % tx == 0 && src.h % ty == 0;
        let (ext_w, ext_h) = if divisible {
            (src.w, src.h)
        } else {
            (src.w + tx - src.w % tx, src.h + ty - src.h % ty)
        };
        let tile_w = ext_w / tx;
        let tile_h = ext_h / ty;
        let tile_area = tile_w * tile_h;

        let clip = if self.clip_limit > 0.0 {
            ((self.clip_limit * tile_area as f64 / BINS as f64) as usize).max(1)
        } else {
            usize::MAX
        };
        let lut_scale = 255.0 / tile_area as f32;

        let sample = |x: usize, y: usize| -> u8 {
            if divisible {
                src.get(x, y, 0)
            } else {
                let sx = Border::Reflect101.index(x as isize, src.w);
                let sy = Border::Reflect101.index(y as isize, src.h);
                src.get(sx, sy, 0)
            }
        };

        let mut luts = vec![[0u8; BINS]; tx * ty];
        for j in 0..ty {
            for i in 0..tx {
                let mut hist = [0usize; BINS];
                for y in j * tile_h..(j + 1) * tile_h {
                    for x in i * tile_w..(i + 1) * tile_w {
                        hist[sample(x, y) as usize] += 1;
                    }
                }
                clip_histogram(&mut hist, clip);
                let lut = &mut luts[j * tx + i];
                let mut sum = 0usize;
                for (bin, count) in hist.iter().enumerate() {
                    sum += count;
                    lut[bin] = saturate_u8(sum as f32 * lut_scale);
                }
            }
        }

        let inv_tw = 1.0 / tile_w as f32;
        let inv_th = 1.0 / tile_h as f32;
        let x_plan: Vec<(usize, usize, f32)> = (0..src.w)
            .map(|x| tile_neighbours(x as f32 * inv_tw - 0.5, tx))
            .collect();
        let mut out = Image::new(src.w, src.h, 1);
        for y in 0..src.h {
            let (ty1, ty2, ya) = tile_neighbours(y as f32 * inv_th - 0.5, ty);
            for (x, &(tx1, tx2, xa)) in x_plan.iter().enumerate() {
                let v = src.get(x, y, 0) as usize;
                let l11 = luts[ty1 * tx + tx1][v] as f32;
                let l12 = luts[ty1 * tx + tx2][v] as f32;
                let l21 = luts[ty2 * tx + tx1][v] as f32;
                let l22 = luts[ty2 * tx + tx2][v] as f32;
                let res = (l11 * (1.0 - xa) + l12 * xa) * (1.0 - ya)
                    + (l21 * (1.0 - xa) + l22 * xa) * ya;
                out.set(x, y, 0, saturate_u8(res));
            }
        }
        out
    }
}

/// Clip bins at `clip` and spread the excess evenly, remainder stepped
/// across the histogram from bin 0.
fn clip_histogram(hist: &mut [usize; BINS], clip: usize) {
    if clip == usize::MAX {
        return;
    }
    let mut clipped = 0usize;
    for count in hist.iter_mut() {
        if *count > clip {
            clipped += *count - clip;
            *count = clip;
        }
    }
    let batch = clipped / BINS;
    let mut residual = clipped - batch * BINS;
    for count in hist.iter_mut() {
        *count += batch;
    }
    if residual != 0 {
        let step = (BINS / residual).max(1);
        let mut bin = 0;
        while bin < BINS && residual > 0 {
            hist[bin] += 1;
            residual -= 1;
            bin += step;
        }
    }
}

/// Neighbouring tile indices and the weight of the second one.
fn tile_neighbours(pos: f32, tiles: usize) -> (usize, usize, f32) {
    let base = pos.floor();
    let weight = pos - base;
    let t1 = (base as isize).max(0) as usize;
    let t2 = ((base as isize + 1).max(0) as usize).min(tiles - 1);
    (t1.min(tiles - 1), t2, weight)
}
