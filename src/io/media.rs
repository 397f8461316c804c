// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Page image loading.
//!
//! Images are decoded to RGBA8 on a worker thread so the UI thread only
//! has to upload the texture.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// A decoded image ready for `egui::ColorImage::from_rgba_unmultiplied`.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl LoadedImage {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}

/// Decode an image file into RGBA8 pixels.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let img = image::open(path).with_context(|| format!("Failed to open image {}", path.display()))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(LoadedImage {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Resolve a page's `imagePath` against an optional assets root.
pub fn resolve_asset(root: Option<&Path>, image_path: &str) -> PathBuf {
    match root {
        Some(root) => root.join(image_path),
        None => PathBuf::from(image_path),
    }
}

/// Put `dir` first in the image search roots, without duplicating it.
pub fn promote_root(roots: &mut Vec<PathBuf>, dir: &Path) {
    roots.retain(|root| root != dir);
    roots.insert(0, dir.to_path_buf());
}
