//! Second-derivative edge response `d²/dx² + d²/dy²`.
//!
//! For aperture sizes above 1 each second derivative is a separable pair: a
//! binomial second-difference kernel along the differentiated axis and a
//! binomial smoothing kernel along the other, e.g. for size 5
//! `[1, 0, -2, 0, 1]` and `[1, 4, 6, 4, 1]`. Size 1 uses the plain 3×3
//! cross `[0 1 0; 1 -4 1; 0 1 0]`. Borders reflect (101).
use super::border::Border;
use super::separable::{convolve_separable, to_u8};
use crate::image::{Image, ImageF32};

/// Binomial smoothing kernel of odd length `n` (row `n - 1` of Pascal's triangle).
fn smoothing_kernel(n: usize) -> Vec<f32> {
    let mut k = vec![1.0f32];
    for _ in 1..n {
        let mut next = vec![0.0f32; k.len() + 1];
        for (i, &v) in k.iter().enumerate() {
            next[i] += v;
            next[i + 1] += v;
        }
        k = next;
    }
    k
}

/// Second-difference kernel of odd length `n >= 3`: `[1, -2, 1]` convolved
/// with binomial smoothing of length `n - 2`.
fn second_derivative_kernel(n: usize) -> Vec<f32> {
    let base = [1.0f32, -2.0, 1.0];
    let smooth = smoothing_kernel(n - 2);
    let mut k = vec![0.0f32; n];
    for (i, &s) in smooth.iter().enumerate() {
        for (j, &b) in base.iter().enumerate() {
            k[i + j] += s * b;
        }
    }
    k
}

/// Real-valued Laplacian of a single-channel float image.
pub fn laplacian_f32(src: &ImageF32, ksize: usize) -> ImageF32 {
    if ksize <= 1 {
        let d2 = [1.0f32, -2.0, 1.0];
        let id = [0.0f32, 1.0, 0.0];
        let dxx = convolve_separable(src, &d2, &id, Border::Reflect101);
        let dyy = convolve_separable(src, &id, &d2, Border::Reflect101);
        return sum(&dxx, &dyy);
    }
    let n = ksize | 1;
    let d2 = second_derivative_kernel(n);
    let smooth = smoothing_kernel(n);
    let dxx = convolve_separable(src, &d2, &smooth, Border::Reflect101);
    let dyy = convolve_separable(src, &smooth, &d2, Border::Reflect101);
    sum(&dxx, &dyy)
}

fn sum(a: &ImageF32, b: &ImageF32) -> ImageF32 {
    let mut out = a.clone();
    for (dst, &v) in out.data.iter_mut().zip(&b.data) {
        *dst += v;
    }
    out
}

/// Laplacian of every channel, `saturate(scale * lap + delta)` to 8 bits.
/// Negative responses clip to 0.
pub fn laplacian(src: &Image, ksize: usize, scale: f32, delta: f32) -> Image {
    src.map_planes(|plane| to_u8(&laplacian_f32(&ImageF32::from_plane(plane), ksize), scale, delta))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_five_kernels_match_binomial_form() {
        assert_eq!(smoothing_kernel(5), vec![1.0, 4.0, 6.0, 4.0, 1.0]);
        assert_eq!(second_derivative_kernel(5), vec![1.0, 0.0, -2.0, 0.0, 1.0]);
    }

    #[test]
    fn flat_image_yields_delta() {
        let img = Image::filled(12, 10, 1, 180);
        let out = laplacian(&img, 5, 1.0, 1.0);
        assert!(out.data.iter().all(|&v| v == 1));
    }

    #[test]
    fn dark_line_gives_strong_positive_response() {
        let mut img = Image::filled(21, 21, 1, 200);
        for y in 0..21 {
            img.set(10, y, 0, 120);
        }
        let out = laplacian(&img, 5, 1.0, 1.0);
        assert_eq!(out.get(10, 10, 0), 255);
        // Flanks of a valley are concave, so the response clips to zero.
        assert_eq!(out.get(12, 10, 0), 0);
        assert_eq!(out.get(0, 10, 0), 1);
    }
}
