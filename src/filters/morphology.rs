//! Grayscale morphology with a rectangular structuring element.
//!
//! Erosion takes the minimum and dilation the maximum over the element
//! footprint; neighbours outside the image are ignored. A rectangle is
//! separable, so each operator runs as a row pass followed by a column pass.
//! Channels are processed independently.
use crate::image::Image;

/// Rectangular `w x h` footprint anchored at its centre.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    pub w: usize,
    pub h: usize,
}

impl StructuringElement {
    pub fn rect(size: usize) -> Self {
        let size = size.max(1);
        Self { w: size, h: size }
    }

    #[inline]
    fn anchor(&self) -> (usize, usize) {
        (self.w / 2, self.h / 2)
    }
}

#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

impl Extremum {
    #[inline]
    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Extremum::Min => a.min(b),
            Extremum::Max => a.max(b),
        }
    }
}

fn rank_filter(src: &Image, se: StructuringElement, op: Extremum) -> Image {
    if src.is_empty() {
        return src.clone();
    }
    let (ax, ay) = se.anchor();
    let ch = src.channels;
    let mut rows = src.clone();
    for y in 0..src.h {
        for x in 0..src.w {
            let lo = x.saturating_sub(ax);
            let hi = (x + se.w - ax).min(src.w);
            for c in 0..ch {
                let mut acc = src.get(lo, y, c);
                for sx in lo + 1..hi {
                    acc = op.pick(acc, src.get(sx, y, c));
                }
                rows.set(x, y, c, acc);
            }
        }
    }
    let mut out = rows.clone();
    for y in 0..src.h {
        let lo = y.saturating_sub(ay);
        let hi = (y + se.h - ay).min(src.h);
        for x in 0..src.w {
            for c in 0..ch {
                let mut acc = rows.get(x, lo, c);
                for sy in lo + 1..hi {
                    acc = op.pick(acc, rows.get(x, sy, c));
                }
                out.set(x, y, c, acc);
            }
        }
    }
    out
}

pub fn erode(src: &Image, se: StructuringElement) -> Image {
    rank_filter(src, se, Extremum::Min)
}

pub fn dilate(src: &Image, se: StructuringElement) -> Image {
    rank_filter(src, se, Extremum::Max)
}

/// Erode then dilate: removes bright specks smaller than the element.
pub fn open(src: &Image, se: StructuringElement) -> Image {
    dilate(&erode(src, se), se)
}

/// Dilate then erode: fills dark gaps smaller than the element.
pub fn close(src: &Image, se: StructuringElement) -> Image {
    erode(&dilate(src, se), se)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_removes_small_bright_speck() {
        let mut img = Image::filled(15, 15, 1, 20);
        img.set(7, 7, 0, 250);
        img.set(8, 7, 0, 250);
        let out = open(&img, StructuringElement::rect(5));
        assert!(out.data.iter().all(|&v| v == 20));
    }

    #[test]
    fn opening_keeps_large_bright_block() {
        let mut img = Image::filled(16, 16, 1, 0);
        for y in 4..12 {
            for x in 4..12 {
                img.set(x, y, 0, 180);
            }
        }
        let out = open(&img, StructuringElement::rect(5));
        assert_eq!(out, img);
    }

    #[test]
    fn closing_fills_narrow_dark_gap() {
        let mut img = Image::filled(15, 9, 1, 255);
        for y in 0..9 {
            img.set(7, y, 0, 0);
        }
        let out = close(&img, StructuringElement::rect(5));
        assert!(out.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn erosion_ignores_pixels_outside_the_image() {
        let img = Image::filled(3, 3, 2, 77);
        let out = erode(&img, StructuringElement::rect(5));
        assert_eq!(out, img);
    }
}
