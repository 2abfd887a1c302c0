//! QR code rasterisation.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use qrcode::QrCode;

use crate::config::{MAX_QR_SIDE, QrSettings};
use crate::error::{Result, StampError};
use crate::selection::PlacementRect;

const DARK: Rgb<u8> = Rgb([0, 0, 0]);
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// An opaque black-on-white QR code image.
#[derive(Debug, Clone, PartialEq)]
pub struct QrRaster {
    image: RgbImage,
    /// Symbol width in modules, excluding the border.
    modules: usize,
}

impl QrRaster {
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    pub fn modules(&self) -> usize {
        self.modules
    }

    /// Stretches the raster to exactly the rectangle's size.
    ///
    /// Aspect ratio is not preserved. Returns `None` for zero-area rectangles.
    pub fn fit_to(&self, rect: &PlacementRect) -> Option<RgbImage> {
        if rect.is_empty() {
            return None;
        }
        Some(imageops::resize(
            &self.image,
            rect.width(),
            rect.height(),
            FilterType::Nearest,
        ))
    }
}

/// Encodes `payload` and renders it with the given settings.
///
/// The symbol version grows to fit the payload; payloads that do not fit in
/// the largest version are reported as [`crate::StampError::Qr`], and
/// settings whose image would exceed [`MAX_QR_SIDE`] as
/// [`crate::StampError::QrTooLarge`].
pub fn generate_qr(payload: &str, settings: &QrSettings) -> Result<QrRaster> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), settings.ec_level)?;
    let modules = code.width();
    let module_px = settings.module_px.max(1);
    let too_large = || StampError::QrTooLarge {
        border: settings.border,
        module_px,
    };

    let side = u32::try_from(modules)
        .ok()
        .and_then(|m| settings.border.checked_mul(2)?.checked_add(m))
        .and_then(|m| m.checked_mul(module_px))
        .filter(|&side| side <= MAX_QR_SIDE)
        .ok_or_else(too_large)?;

    let symbol = code
        .render::<Rgb<u8>>()
        .quiet_zone(false)
        .dark_color(DARK)
        .light_color(LIGHT)
        .module_dimensions(module_px, module_px)
        .build();

    let image = if settings.border == 0 {
        symbol
    } else {
        let mut canvas = RgbImage::from_pixel(side, side, LIGHT);
        let offset = i64::from(settings.border * module_px);
        imageops::overlay(&mut canvas, &symbol, offset, offset);
        canvas
    };

    log::debug!(
        "Generated QR for {} byte payload: {modules} modules, {side}x{side} px",
        payload.len()
    );

    Ok(QrRaster { image, modules })
}
