//! Zero-mean normalized cross-correlation of a template over a search image.
//!
//! For a template `T` (`tw × th`, `n` samples) placed at `(x, y)` in image `I`:
//!
//! ```text
//! R(x, y) = Σ T'(u, v) · I'(x + u, y + v) / sqrt(Σ T'² · Σ I'²)
//! ```
//!
//! where `T'` and `I'` are the template and the covered window minus their
//! means. Numerators for every placement come from one FFT cross-correlation
//! of `I` with `T'` (no padding is needed: valid placements never wrap).
//! Window sums come from integral images, kept in integers so a constant
//! window is detected exactly.
//!
//! Degenerate cases:
//! - constant template: every placement scores 1;
//! - constant window under a textured template: scores 0;
//! - ratios that drift slightly past ±1 snap to ±1; far outliers score 0.
use crate::image::{Image, ImageF32};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Search image prepared once and shared by many templates.
pub struct CorrelationSearch {
    w: usize,
    h: usize,
    spectrum: Vec<Complex<f64>>,
    integral: Vec<u64>,
    integral_sq: Vec<u64>,
    row_fft: Arc<dyn Fft<f64>>,
    col_fft: Arc<dyn Fft<f64>>,
    row_ifft: Arc<dyn Fft<f64>>,
    col_ifft: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for CorrelationSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationSearch")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

/// Best placement of a template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    pub score: f64,
    pub x: usize,
    pub y: usize,
    /// The template had no variance, so every placement scored 1.
    pub uniform_template: bool,
}

struct TemplateStats {
    n: u128,
    sum: u64,
    ssd_n: u128, // n * Σt² - (Σt)²
}

impl CorrelationSearch {
    /// Prepare the first channel of `image` for searching. `image` must not
    /// be empty.
    pub fn new(image: &Image) -> Self {
        let (w, h) = image.dimensions();
        let mut planner = FftPlanner::<f64>::new();
        let row_fft = planner.plan_fft_forward(w);
        let col_fft = planner.plan_fft_forward(h);
        let row_ifft = planner.plan_fft_inverse(w);
        let col_ifft = planner.plan_fft_inverse(h);

        let mut spectrum: Vec<Complex<f64>> = (0..w * h)
            .map(|i| Complex::new(image.data[i * image.channels] as f64, 0.0))
            .collect();
        fft2d(&mut spectrum, w, h, row_fft.as_ref(), col_fft.as_ref());

        let (integral, integral_sq) = integral_images(image);
        Self {
            w,
            h,
            spectrum,
            integral,
            integral_sq,
            row_fft,
            col_fft,
            row_ifft,
            col_ifft,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Correlation coefficient for every placement, `(W - tw + 1) × (H - th + 1)`.
    /// `None` when the template is empty or larger than the search image.
    pub fn surface(&self, template: &Image) -> Option<ImageF32> {
        let (rw, rh) = self.placements(template)?;
        let mut out = ImageF32::new(rw, rh);
        for (dst, &score) in out.data.iter_mut().zip(&self.scores(template)) {
            *dst = score as f32;
        }
        Some(out)
    }

    /// Highest-scoring placement of `template`; ties keep the first in
    /// row-major order. Scores stay in `f64` so thresholds see them unrounded.
    pub fn best_match(&self, template: &Image) -> Option<Peak> {
        let (rw, _) = self.placements(template)?;
        if template_stats(template).ssd_n == 0 {
            return Some(Peak {
                score: 1.0,
                x: 0,
                y: 0,
                uniform_template: true,
            });
        }
        let mut best: Option<(f64, usize)> = None;
        for (i, &score) in self.scores(template).iter().enumerate() {
            if best.map_or(true, |(b, _)| score > b) {
                best = Some((score, i));
            }
        }
        let (score, i) = best?;
        Some(Peak {
            score,
            x: i % rw,
            y: i / rw,
            uniform_template: false,
        })
    }

    fn placements(&self, template: &Image) -> Option<(usize, usize)> {
        let (tw, th) = template.dimensions();
        if tw == 0 || th == 0 || tw > self.w || th > self.h {
            return None;
        }
        Some((self.w - tw + 1, self.h - th + 1))
    }

    /// Row-major scores for every placement; the template must fit.
    fn scores(&self, template: &Image) -> Vec<f64> {
        let (tw, th) = template.dimensions();
        let (rw, rh) = (self.w - tw + 1, self.h - th + 1);
        let stats = template_stats(template);
        if stats.ssd_n == 0 {
            return vec![1.0; rw * rh];
        }

        let numerators = self.cross_correlate(template, &stats);
        let t_ssd = stats.ssd_n as f64 / stats.n as f64;
        let mut scores = Vec::with_capacity(rw * rh);
        for y in 0..rh {
            for x in 0..rw {
                let (s1, s2) = self.window_sums(x, y, tw, th);
                let w_ssd_n = (stats.n * s2 as u128).saturating_sub(s1 as u128 * s1 as u128);
                scores.push(if w_ssd_n == 0 {
                    0.0
                } else {
                    let denom = (t_ssd * (w_ssd_n as f64 / stats.n as f64)).sqrt();
                    normalize(numerators[y * self.w + x], denom)
                });
            }
        }
        scores
    }

    /// `Σ T'(u, v) · I(x + u, y + v)` for every `(x, y)`, row-major with
    /// stride `self.w`.
    fn cross_correlate(&self, template: &Image, stats: &TemplateStats) -> Vec<f64> {
        let (w, h) = (self.w, self.h);
        let mean = stats.sum as f64 / stats.n as f64;
        let mut buf = vec![Complex::new(0.0f64, 0.0); w * h];
        for v in 0..template.h {
            for u in 0..template.w {
                buf[v * w + u] = Complex::new(template.get(u, v, 0) as f64 - mean, 0.0);
            }
        }
        fft2d(&mut buf, w, h, self.row_fft.as_ref(), self.col_fft.as_ref());
        for (b, s) in buf.iter_mut().zip(&self.spectrum) {
            *b = s * b.conj();
        }
        fft2d(&mut buf, w, h, self.row_ifft.as_ref(), self.col_ifft.as_ref());
        let norm = 1.0 / (w * h) as f64;
        buf.iter().map(|c| c.re * norm).collect()
    }

    fn window_sums(&self, x: usize, y: usize, tw: usize, th: usize) -> (u64, u64) {
        let stride = self.w + 1;
        let rect = |table: &[u64]| {
            table[(y + th) * stride + x + tw] + table[y * stride + x]
                - table[y * stride + x + tw]
                - table[(y + th) * stride + x]
        };
        (rect(&self.integral), rect(&self.integral_sq))
    }
}

fn normalize(num: f64, denom: f64) -> f64 {
    if num.abs() < denom {
        num / denom
    } else if num.abs() < denom * 1.125 {
        num.signum()
    } else {
        0.0
    }
}

fn template_stats(template: &Image) -> TemplateStats {
    let mut sum = 0u64;
    let mut sum_sq = 0u64;
    for y in 0..template.h {
        for x in 0..template.w {
            let v = template.get(x, y, 0) as u64;
            sum += v;
            sum_sq += v * v;
        }
    }
    let n = (template.w * template.h) as u128;
    TemplateStats {
        n,
        sum,
        ssd_n: n * sum_sq as u128 - sum as u128 * sum as u128,
    }
}

/// Summed-area tables of `I` and `I²` with a zero first row and column.
fn integral_images(image: &Image) -> (Vec<u64>, Vec<u64>) {
    let (w, h) = image.dimensions();
    let stride = w + 1;
    let mut integral = vec![0u64; stride * (h + 1)];
    let mut integral_sq = vec![0u64; stride * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        let mut row_sum_sq = 0u64;
        for x in 0..w {
            let v = image.get(x, y, 0) as u64;
            row_sum += v;
            row_sum_sq += v * v;
            integral[(y + 1) * stride + x + 1] = integral[y * stride + x + 1] + row_sum;
            integral_sq[(y + 1) * stride + x + 1] = integral_sq[y * stride + x + 1] + row_sum_sq;
        }
    }
    (integral, integral_sq)
}

/// In-place 2-D transform: rows first, then columns via a transpose.
fn fft2d(buf: &mut [Complex<f64>], w: usize, h: usize, rows: &dyn Fft<f64>, cols: &dyn Fft<f64>) {
    rows.process(buf);
    let mut transposed = vec![Complex::new(0.0, 0.0); w * h];
    for y in 0..h {
        for x in 0..w {
            transposed[x * h + y] = buf[y * w + x];
        }
    }
    cols.process(&mut transposed);
    for x in 0..w {
        for y in 0..h {
            buf[y * w + x] = transposed[x * h + y];
        }
    }
}
