//! Square median filter with replicated borders.
//!
//! Uses a running 256-bin histogram per row (Huang's algorithm): moving the
//! window one column right removes the leaving column and adds the entering
//! one, so the cost per pixel is O(k) instead of O(k²).
use super::border::Border;
use crate::image::Image;

/// Median over a `ksize × ksize` window (`ksize` forced odd), per channel.
pub fn median_blur(src: &Image, ksize: usize) -> Image {
    let k = ksize.max(1) | 1;
    if k == 1 || src.is_empty() {
        return src.clone();
    }
    src.map_planes(|plane| median_plane(plane, k))
}

fn median_plane(src: &Image, k: usize) -> Image {
    let r = (k / 2) as isize;
    let (w, h) = src.dimensions();
    let half = (k * k) / 2;
    let mut out = Image::new(w, h, 1);
    let col = |x: isize| Border::Replicate.index(x, w);
    let row = |y: isize| Border::Replicate.index(y, h);

    for y in 0..h as isize {
        let rows: Vec<usize> = (-r..=r).map(|dy| row(y + dy)).collect();
        let mut hist = [0u32; 256];
        for dx in -r..=r {
            let sx = col(dx);
            for &sy in &rows {
                hist[src.get(sx, sy, 0) as usize] += 1;
            }
        }
        out.set(0, y as usize, 0, histogram_rank(&hist, half));
        for x in 1..w as isize {
            let leaving = col(x - r - 1);
            let entering = col(x + r);
            for &sy in &rows {
                hist[src.get(leaving, sy, 0) as usize] -= 1;
                hist[src.get(entering, sy, 0) as usize] += 1;
            }
            out.set(x as usize, y as usize, 0, histogram_rank(&hist, half));
        }
    }
    out
}

/// Smallest value whose cumulative count exceeds `rank`.
fn histogram_rank(hist: &[u32; 256], rank: usize) -> u8 {
    let mut acc = 0usize;
    for (v, &count) in hist.iter().enumerate() {
        acc += count as usize;
        if acc > rank {
            return v as u8;
        }
    }
    255
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_salt_and_pepper() {
        let mut img = Image::filled(20, 20, 1, 128);
        img.set(3, 4, 0, 255);
        img.set(10, 10, 0, 0);
        img.set(17, 2, 0, 255);
        let out = median_blur(&img, 7);
        assert!(out.data.iter().all(|&v| v == 128));
    }

    #[test]
    fn matches_sorted_window_median() {
        let mut img = Image::new(9, 9, 1);
        for (i, v) in img.data.iter_mut().enumerate() {
            *v = ((i * 37) % 251) as u8;
        }
        let out = median_blur(&img, 7);
        let mut window = Vec::new();
        for y in 1..8 {
            for x in 1..8 {
                window.push(img.get(x, y, 0));
            }
        }
        window.sort_unstable();
        assert_eq!(out.get(4, 4, 0), window[24]);
    }

    #[test]
    fn preserves_step_edge() {
        let mut img = Image::new(16, 8, 1);
        for y in 0..8 {
            for x in 8..16 {
                img.set(x, y, 0, 255);
            }
        }
        assert_eq!(median_blur(&img, 7), img);
    }
}
