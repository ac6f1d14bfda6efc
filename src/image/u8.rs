use crate::error::{MatchError, Result};

/// Borrowed 8-bit image with 1 (gray) or 3 (RGB) interleaved channels.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub channels: usize,
    pub stride: usize, // samples between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Tightly packed single-channel view.
    pub fn gray(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            channels: 1,
            stride: w,
            data,
        }
    }

    /// Tightly packed RGB view.
    pub fn rgb(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            channels: 3,
            stride: w * 3,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, c: usize) -> u8 {
        self.data[y * self.stride + x * self.channels + c]
    }

    /// Check the view describes a non-empty, fully backed buffer.
    pub fn validate(&self) -> Result<()> {
        if self.w == 0 || self.h == 0 {
            return Err(MatchError::invalid_image(format!(
                "empty image {}x{}",
                self.w, self.h
            )));
        }
        if self.channels != 1 && self.channels != 3 {
            return Err(MatchError::invalid_image(format!(
                "unsupported channel count {}",
                self.channels
            )));
        }
        let row_len = self.w * self.channels;
        if self.stride < row_len {
            return Err(MatchError::invalid_image(format!(
                "stride {} shorter than row length {row_len}",
                self.stride
            )));
        }
        let required = self.stride * (self.h - 1) + row_len;
        if self.data.len() < required {
            return Err(MatchError::invalid_image(format!(
                "buffer holds {} samples, {required} required",
                self.data.len()
            )));
        }
        Ok(())
    }
}

impl<'a> crate::image::traits::ImageView for ImageU8<'a> {
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
        self.stride
    }
    #[inline]
    fn channels(&self) -> usize {
        self.channels
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * self.channels]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        let len = self.w * self.channels * self.h;
        (self.stride == self.w * self.channels).then(|| &self.data[..len])
    }
}
