use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("Please load an image or PDF first.")]
    NoSource,
    #[error("Please load a PDF template first.")]
    NoTemplate,
    #[error("Please load a CSV file first.")]
    NoRoster,
    #[error("Please select a position for the QR code.")]
    NoPlacement,
    #[error("Please enter at least one link.")]
    NoPayloads,
    #[error("You can enter up to {limit} links only (got {count}).")]
    TooManyPayloads { count: usize, limit: usize },

    #[error("CSV must contain 'Link', 'Name', and 'Amount' columns (missing: {})", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
    #[error("Row {row}: Amount must be a non-negative whole number, got {value:?}")]
    InvalidAmount { row: usize, value: String },
    #[error("Row {row}: Link is empty")]
    EmptyLink { row: usize },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("PDF template has no pages")]
    EmptyTemplate,
    #[error("Unsupported source file: {}", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("QR encoding failed: {0}")]
    Qr(#[from] qrcode::types::QrError),
    #[error("QR image too large: border {border} and {module_px} px modules exceed {max} px", max = crate::config::MAX_QR_SIDE)]
    QrTooLarge { border: u32, module_px: u32 },
    #[error("Failed to render PDF page: {0}")]
    Render(String),
}

impl StampError {
    pub fn invalid_amount(row: usize, value: impl Into<String>) -> Self {
        Self::InvalidAmount {
            row,
            value: value.into(),
        }
    }

    pub fn render(context: impl std::fmt::Display) -> Self {
        Self::Render(context.to_string())
    }

    /// Errors a user can fix by completing a step in the tool, as opposed to
    /// bad input files or library failures.
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(
            self,
            Self::NoSource | Self::NoTemplate | Self::NoRoster | Self::NoPlacement
        )
    }
}

pub type Result<T, E = StampError> = std::result::Result<T, E>;
