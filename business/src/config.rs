use std::path::PathBuf;

use qrcode::EcLevel;

/// Maximum number of payload lines the placement tool accepts per run.
pub const PAYLOAD_LINE_LIMIT: usize = 20;

/// Default preview canvas bound, in pixels.
pub const PREVIEW_MAX_WIDTH: u32 = 600;
pub const PREVIEW_MAX_HEIGHT: u32 = 400;

/// Largest QR image edge, in pixels, before it is fitted into a rectangle.
pub const MAX_QR_SIDE: u32 = 8192;

/// QR rendering settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QrSettings {
    pub ec_level: EcLevel,
    /// Light modules drawn around the symbol.
    pub border: u32,
    /// Pixel edge length of one module.
    pub module_px: u32,
}

impl Default for QrSettings {
    fn default() -> Self {
        Self {
            ec_level: EcLevel::L,
            border: 1,
            module_px: 10,
        }
    }
}

/// Where and how the roster name is written on batch pages.
///
/// Offsets are measured from the bottom-right corner of the page to the
/// text baseline origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelStyle {
    pub offset_x: f32,
    pub offset_y: f32,
    pub font_size: f32,
    /// One of the 14 standard PDF fonts.
    pub base_font: String,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            offset_x: 100.0,
            offset_y: 30.0,
            font_size: 10.0,
            base_font: "Helvetica".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StampConfig {
    pub qr: QrSettings,
    pub label: LabelStyle,
    pub preview_max: (u32, u32),
    pub payload_line_limit: usize,
    /// Directory that receives `output_image_<n>.png` / `output_pdf_<n>.pdf`.
    pub output_dir: PathBuf,
}

impl StampConfig {
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_qr(mut self, qr: QrSettings) -> Self {
        self.qr = qr;
        self
    }
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            qr: QrSettings::default(),
            label: LabelStyle::default(),
            preview_max: (PREVIEW_MAX_WIDTH, PREVIEW_MAX_HEIGHT),
            payload_line_limit: PAYLOAD_LINE_LIMIT,
            output_dir: PathBuf::from("."),
        }
    }
}
