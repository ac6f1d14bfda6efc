//! Bilinear resampling with half-pixel centre alignment.
//!
//! Destination pixel `x` samples the source at `(x + 0.5) * sw / dw - 0.5`;
//! coordinates falling outside the source clamp to the edge (replicate).
use super::border::saturate_u8;
use crate::image::Image;

/// Per-axis sample plan: left index, right index and right weight.
fn axis_plan(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = src_len as f64 / dst_len as f64;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let f = (d as f64 + 0.5) * scale - 0.5;
            let base = f.floor();
            let frac = (f - base) as f32;
            if base < 0.0 {
                (0, 0, 0.0)
            } else if base as usize >= last {
                (last, last, 0.0)
            } else {
                let i = base as usize;
                (i, i + 1, frac)
            }
        })
        .collect()
}

/// Resize to `dst_w x dst_h` (both clamped to at least 1).
pub fn resize_bilinear(src: &Image, dst_w: usize, dst_h: usize) -> Image {
    let dst_w = dst_w.max(1);
    let dst_h = dst_h.max(1);
    if src.is_empty() {
        return Image::new(dst_w, dst_h, src.channels);
    }
    if (dst_w, dst_h) == src.dimensions() {
        return src.clone();
    }
    let xs = axis_plan(src.w, dst_w);
    let ys = axis_plan(src.h, dst_h);
    let ch = src.channels;
    let mut out = Image::new(dst_w, dst_h, ch);
    for (y, &(y0, y1, fy)) in ys.iter().enumerate() {
        for (x, &(x0, x1, fx)) in xs.iter().enumerate() {
            for c in 0..ch {
                let top = src.get(x0, y0, c) as f32 * (1.0 - fx) + src.get(x1, y0, c) as f32 * fx;
                let bottom =
                    src.get(x0, y1, c) as f32 * (1.0 - fx) + src.get(x1, y1, c) as f32 * fx;
                out.set(x, y, c, saturate_u8(top * (1.0 - fy) + bottom * fy));
            }
        }
    }
    out
}

/// Scale both axes by `percent / 100`, truncating like integer pixel sizes do.
pub fn resize_percent(src: &Image, percent: u32) -> Image {
    let w = src.w * percent as usize / 100;
    let h = src.h * percent as usize / 100;
    resize_bilinear(src, w, h)
}
