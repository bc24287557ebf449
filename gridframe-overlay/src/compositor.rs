use std::path::{Path, PathBuf};

use gridframe_core::OVERLAY_FILE_NAME;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageFormat, Luma, RgbaImage};

use crate::OverlayError;

/// Corner radius of the icon silhouette, in pixels. Fixed regardless of icon size.
pub const CORNER_RADIUS: u32 = 120;

/// Path of the frame asset for a console: `<overlays_root>/<console>/overlay.png`.
pub fn overlay_path(overlays_root: &Path, console: &str) -> PathBuf {
    overlays_root.join(console).join(OVERLAY_FILE_NAME)
}

/// Decode downloaded bytes into an RGBA bitmap.
///
/// Opaque sources gain an all-255 alpha channel.
pub fn decode_icon(bytes: &[u8]) -> Result<RgbaImage, OverlayError> {
    Ok(image::load_from_memory(bytes)?.into_rgba8())
}

/// Clip `base` to a rounded rectangle and draw the console's frame over it.
///
/// The frame is resized to the icon's dimensions when they differ; the icon
/// itself is never resized. Any alpha `base` carried before is replaced by the
/// rounded mask.
pub fn composite(
    mut base: RgbaImage,
    console: &str,
    overlays_root: &Path,
) -> Result<RgbaImage, OverlayError> {
    let (w, h) = base.dimensions();
    if w == 0 || h == 0 {
        return Err(OverlayError::EmptyImage);
    }

    let frame_path = overlay_path(overlays_root, console);
    if !frame_path.is_file() {
        return Err(OverlayError::OverlayNotFound(frame_path));
    }
    let frame = image::open(&frame_path)?.into_rgba8();
    let frame = conform_frame(frame, w, h);

    let mask = rounded_mask(w, h, CORNER_RADIUS);
    apply_mask(&mut base, &mask)?;

    imageops::overlay(&mut base, &frame, 0, 0);
    Ok(base)
}

/// Resize the frame to exactly `w`x`h` if it isn't already.
pub(crate) fn conform_frame(frame: RgbaImage, w: u32, h: u32) -> RgbaImage {
    if frame.dimensions() == (w, h) {
        return frame;
    }
    log::debug!(
        "Resizing overlay from {}x{} to {}x{}",
        frame.width(),
        frame.height(),
        w,
        h
    );
    imageops::resize(&frame, w, h, FilterType::Lanczos3)
}

/// Build a single-channel mask covering the full bounds: 255 inside a rounded
/// rectangle with corner radius `radius`, 0 elsewhere.
///
/// The radius is clamped to half the shorter side so that it always fits.
pub fn rounded_mask(w: u32, h: u32, radius: u32) -> GrayImage {
    let r = radius.min(w / 2).min(h / 2) as f64;
    let mut mask = GrayImage::new(w, h);

    for (x, y, px) in mask.enumerate_pixels_mut() {
        if inside_rounded_rect(x, y, w, h, r) {
            *px = Luma([255]);
        }
    }

    mask
}

/// Whether the centre of pixel (x,y) lies inside the rounded rectangle
/// spanning `[0, w] x [0, h]`.
fn inside_rounded_rect(x: u32, y: u32, w: u32, h: u32, r: f64) -> bool {
    let px = x as f64 + 0.5;
    let py = y as f64 + 0.5;

    // Nearest point on the inner rectangle whose offset by r forms the shape.
    // Outside the corner squares this is on the same row or column, so the
    // distance is below r.
    let cx = px.clamp(r, w as f64 - r);
    let cy = py.clamp(r, h as f64 - r);

    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy <= r * r
}

/// Replace the alpha channel of `img` with `mask`.
pub fn apply_mask(img: &mut RgbaImage, mask: &GrayImage) -> Result<(), OverlayError> {
    if img.dimensions() != mask.dimensions() {
        return Err(OverlayError::DimensionMismatch {
            image_w: img.width(),
            image_h: img.height(),
            mask_w: mask.width(),
            mask_h: mask.height(),
        });
    }

    for (px, m) in img.pixels_mut().zip(mask.pixels()) {
        px[3] = m[0];
    }
    Ok(())
}

/// Write `img` as PNG, creating parent directories. The format does not
/// depend on the path's extension.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), OverlayError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
#[path = "tests/compositor_tests.rs"]
mod tests;
