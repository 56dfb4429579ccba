//! Render-world plugins
//!
//! [`ImageCopyPlugin`] reads the offscreen camera target back to the CPU.

pub mod image_copy;

pub use image_copy::ImageCopyPlugin;
