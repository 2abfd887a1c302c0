use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage, imageops};

use super::{Compositor, StampEntry, numbered_output};
use crate::error::Result;
use crate::qr::QrRaster;
use crate::selection::PlacementRect;

/// Pastes each QR code onto a fresh copy of the source image and saves it as
/// `output_image_<n>.png`.
pub struct RasterPerPayload {
    base: RgbImage,
    rect: PlacementRect,
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl RasterPerPayload {
    pub fn new(base: RgbImage, rect: PlacementRect, output_dir: &Path) -> Self {
        Self {
            base,
            rect,
            output_dir: output_dir.to_path_buf(),
            written: Vec::new(),
        }
    }
}

impl Compositor for RasterPerPayload {
    fn stamp(&mut self, entry: &StampEntry, qr: &QrRaster) -> Result<()> {
        let mut canvas = self.base.clone();
        match qr.fit_to(&self.rect) {
            Some(code) => imageops::replace(
                &mut canvas,
                &code,
                i64::from(self.rect.x1),
                i64::from(self.rect.y1),
            ),
            None => log::warn!("Placement {} has no area, nothing pasted", self.rect),
        }

        let path = numbered_output(&self.output_dir, "output_image", self.written.len() + 1, "png");
        canvas.save_with_format(&path, ImageFormat::Png)?;
        log::info!("Generated: {:?} for {:?}", path, entry.payload);
        self.written.push(path);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<PathBuf>> {
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QrSettings;
    use crate::qr::generate_qr;
    use image::Rgb;

    const GREY: Rgb<u8> = Rgb([128, 128, 128]);

    #[test]
    fn test_pastes_qr_inside_rect_only() {
        let dir = tempfile::tempdir().unwrap();
        let rect = PlacementRect::from_corners((10, 20), (60, 70));
        let mut compositor = Box::new(RasterPerPayload::new(
            RgbImage::from_pixel(100, 100, GREY),
            rect,
            dir.path(),
        ));

        let qr = generate_qr("https://example.com", &QrSettings::default()).unwrap();
        compositor
            .stamp(&StampEntry::single("https://example.com"), &qr)
            .unwrap();
        let written = compositor.finish().unwrap();
        assert_eq!(written, vec![dir.path().join("output_image_1.png")]);

        let out = image::open(&written[0]).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (100, 100));
        // Outside the rectangle the source is untouched.
        assert_eq!(*out.get_pixel(9, 20), GREY);
        assert_eq!(*out.get_pixel(60, 70), GREY);
        // Inside, only pure black and white remain.
        for y in 20..70 {
            for x in 10..60 {
                let p = out.get_pixel(x, y);
                assert!(p.0 == [0, 0, 0] || p.0 == [255, 255, 255], "{p:?} at {x},{y}");
            }
        }
    }

    #[test]
    fn test_files_are_numbered_and_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("output_image_1.png"), b"stale").unwrap();

        let rect = PlacementRect::from_corners((0, 0), (20, 20));
        let mut compositor =
            RasterPerPayload::new(RgbImage::from_pixel(40, 40, GREY), rect, dir.path());
        for payload in ["a", "b"] {
            let qr = generate_qr(payload, &QrSettings::default()).unwrap();
            compositor.stamp(&StampEntry::single(payload), &qr).unwrap();
        }
        let written = Box::new(compositor).finish().unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[1].ends_with("output_image_2.png"));
        assert!(image::open(&written[0]).is_ok(), "stale file replaced");
    }

    #[test]
    fn test_zero_area_rect_writes_untouched_copy() {
        let dir = tempfile::tempdir().unwrap();
        let rect = PlacementRect::from_corners((5, 5), (5, 30));
        let mut compositor =
            RasterPerPayload::new(RgbImage::from_pixel(40, 40, GREY), rect, dir.path());
        let qr = generate_qr("a", &QrSettings::default()).unwrap();
        compositor.stamp(&StampEntry::single("a"), &qr).unwrap();

        let out = image::open(dir.path().join("output_image_1.png"))
            .unwrap()
            .to_rgb8();
        assert!(out.pixels().all(|p| *p == GREY));
    }
}
