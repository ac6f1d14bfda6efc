//! Owned 8-bit image with interleaved channels (stride == width * channels).
//!
//! This is the value threaded through the enhancement stages and the type of
//! the final mask.
use super::traits::{ImageView, ImageViewMut};
use super::ImageU8;
use crate::error::{MatchError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub data: Vec<u8>,
}

impl Image {
    /// Zero-filled image.
    pub fn new(w: usize, h: usize, channels: usize) -> Self {
        Self::filled(w, h, channels, 0)
    }

    pub fn filled(w: usize, h: usize, channels: usize, value: u8) -> Self {
        Self {
            w,
            h,
            channels,
            data: vec![value; w * h * channels],
        }
    }

    /// Wrap a tightly packed buffer, checking its length.
    pub fn from_raw(w: usize, h: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if data.len() != w * h * channels {
            return Err(MatchError::invalid_image(format!(
                "buffer of {} samples does not fit {w}x{h}x{channels}",
                data.len()
            )));
        }
        Ok(Self {
            w,
            h,
            channels,
            data,
        })
    }

    /// Copy a (possibly strided) view into a packed owned buffer.
    pub fn from_view(view: &ImageU8<'_>) -> Result<Self> {
        view.validate()?;
        let row_len = view.w * view.channels;
        let mut data = Vec::with_capacity(row_len * view.h);
        for row in view.rows() {
            data.extend_from_slice(row);
        }
        Ok(Self {
            w: view.w,
            h: view.h,
            channels: view.channels,
            data,
        })
    }

    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.w,
            h: self.h,
            channels: self.channels,
            stride: self.w * self.channels,
            data: &self.data,
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, c: usize) -> usize {
        (y * self.w + x) * self.channels + c
    }
    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[self.idx(x, y, c)]
    }
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, c: usize, v: u8) {
        let i = self.idx(x, y, c);
        self.data[i] = v;
    }

    /// Split into one single-channel image per channel.
    pub fn planes(&self) -> Vec<Image> {
        if self.channels == 1 {
            return vec![self.clone()];
        }
        (0..self.channels)
            .map(|c| Image {
                w: self.w,
                h: self.h,
                channels: 1,
                data: self
                    .data
                    .iter()
                    .skip(c)
                    .step_by(self.channels)
                    .copied()
                    .collect(),
            })
            .collect()
    }

    /// Apply a single-channel operator to every plane and re-interleave.
    pub fn map_planes<F>(&self, op: F) -> Image
    where
        F: Fn(&Image) -> Image,
    {
        if self.channels == 1 {
            return op(self);
        }
        let planes: Vec<Image> = self.planes().iter().map(op).collect();
        let (w, h) = planes[0].dimensions();
        let channels = planes.len();
        let mut out = Image::new(w, h, channels);
        for (c, plane) in planes.iter().enumerate() {
            for (i, &v) in plane.data.iter().enumerate() {
                out.data[i * channels + c] = v;
            }
        }
        out
    }
}

impl ImageView for Image {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.w * self.channels
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let len = self.w * self.channels;
        &self.data[y * len..(y + 1) * len]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        Some(&self.data)
    }
}

impl ImageViewMut for Image {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let len = self.w * self.channels;
        &mut self.data[y * len..(y + 1) * len]
    }

    #[inline]
    fn as_mut_slice(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.data)
    }
}
