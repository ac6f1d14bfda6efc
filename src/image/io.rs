//! I/O helpers for fundus photographs, masks and JSON reports.
//!
//! - `load_image`: decode a PNG/JPEG/etc. into an owned RGB or gray buffer.
//! - `save_image`: write an owned 1- or 3-channel buffer to disk.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::Image;
use crate::error::{MatchError, Result};
use image::{DynamicImage, GrayImage, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk. Gray sources stay single-channel, everything
/// else is converted to 8-bit RGB.
pub fn load_image(path: &Path) -> Result<Image> {
    let decoded = image::open(path).map_err(|e| MatchError::image_io(path, e))?;
    let gray_source = matches!(
        decoded,
        DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_)
    );
    let (w, h, channels, data) = if gray_source {
        let img = decoded.into_luma8();
        (img.width(), img.height(), 1, img.into_raw())
    } else {
        let img = decoded.into_rgb8();
        (img.width(), img.height(), 3, img.into_raw())
    };
    Image::from_raw(w as usize, h as usize, channels, data)
}

/// Save a 1- or 3-channel image; the format follows the file extension.
pub fn save_image(image: &Image, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let (w, h) = (image.w as u32, image.h as u32);
    let data = image.data.clone();
    let dynamic = match image.channels {
        1 => GrayImage::from_raw(w, h, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, data).map(DynamicImage::ImageRgb8),
        n => {
            return Err(MatchError::image_io(
                path,
                format!("cannot encode {n}-channel image"),
            ))
        }
    }
    .ok_or_else(|| MatchError::image_io(path, "buffer does not match dimensions"))?;
    dynamic.save(path).map_err(|e| MatchError::image_io(path, e))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| MatchError::config(path, e))?;
    fs::write(path, json).map_err(|e| MatchError::config(path, e))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| MatchError::image_io(parent, e))?;
        }
    }
    Ok(())
}
