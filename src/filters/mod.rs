//! Image operators composed by the enhancement pipeline.
//!
//! Every operator is a pure function from borrowed input to a new owned
//! image. Multi-channel inputs are processed per channel unless the operator
//! is a channel conversion. Border conventions:
//!
//! - warps (crop, grid extraction): constant zero outside the source;
//! - resize and median: replicate;
//! - Gaussian, Laplacian and CLAHE padding: reflect-101;
//! - morphology: out-of-image neighbours do not take part.

pub mod border;
pub mod clahe;
pub mod laplacian;
pub mod median;
pub mod morphology;
pub mod pointwise;
pub mod resize;
pub mod separable;
pub mod warp;

pub use border::Border;
pub use clahe::Clahe;
pub use laplacian::laplacian;
pub use median::median_blur;
pub use morphology::{close, dilate, erode, open, StructuringElement};
pub use pointwise::{add_weighted, threshold_binary_inv, to_gray};
pub use resize::{resize_bilinear, resize_percent};
pub use separable::{apply as apply_separable, GaussianFilter, SeparableFilter};
pub use warp::{translate, translation, warp_affine};
