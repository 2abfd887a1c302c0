//! Preview scaling between the on-screen canvas and the full-resolution source.

use image::DynamicImage;
use image::imageops::FilterType;

/// Ratio of source pixels to preview pixels on each axis.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScaleFactor {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactor {
    pub const IDENTITY: Self = Self { x: 1.0, y: 1.0 };

    pub fn between(source: (u32, u32), preview: (u32, u32)) -> Self {
        Self {
            x: f64::from(source.0) / f64::from(preview.0.max(1)),
            y: f64::from(source.1) / f64::from(preview.1.max(1)),
        }
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A thumbnail of a source surface together with the factor that maps it back.
#[derive(Debug, Clone)]
pub struct Preview {
    pub image: DynamicImage,
    pub scale: ScaleFactor,
}

impl Preview {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Computes the largest size that fits `bound` while keeping the aspect ratio.
///
/// Sources that already fit are left untouched.
pub fn fit_within(source: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (w, h) = source;
    let (max_w, max_h) = bound;
    if w <= max_w && h <= max_h {
        return (w, h);
    }

    let ratio = (f64::from(max_w) / f64::from(w)).min(f64::from(max_h) / f64::from(h));
    let fit = |side: u32| ((f64::from(side) * ratio).round() as u32).max(1);
    (fit(w).min(max_w), fit(h).min(max_h))
}

/// Shrinks `source` to fit `bound` and records the resulting scale factor.
pub fn scale_to_preview(source: &DynamicImage, bound: (u32, u32)) -> Preview {
    let dims = (source.width(), source.height());
    let (w, h) = fit_within(dims, bound);

    let image = if (w, h) == dims {
        source.clone()
    } else {
        source.resize_exact(w, h, FilterType::Triangle)
    };

    let scale = ScaleFactor::between(dims, (w, h));
    log::debug!(
        "Preview {}x{} -> {}x{}, scale ({:.4}, {:.4})",
        dims.0,
        dims.1,
        w,
        h,
        scale.x,
        scale.y
    );

    Preview { image, scale }
}
