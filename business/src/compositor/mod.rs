//! Writing QR codes into target surfaces.
//!
//! A [`Compositor`] receives one [`StampEntry`] at a time together with its
//! rendered QR code and decides how output files are produced:
//!
//! - [`RasterPerPayload`] and [`PdfPerPayload`] write one file per entry.
//! - [`PdfAccumulator`] collects every page into one document written by
//!   [`Compositor::finish`].

mod document;
mod raster;

use std::path::{Path, PathBuf};

pub use document::{PdfAccumulator, PdfPerPayload};
pub use raster::RasterPerPayload;

use crate::error::Result;
use crate::qr::QrRaster;
use crate::roster::RosterRow;
use crate::selection::PlacementRect;
use crate::source::{SourceSurface, SurfaceKind};

/// What to stamp: the QR payload, an optional text label and how many copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampEntry {
    pub payload: String,
    pub label: Option<String>,
    pub copies: u32,
}

impl StampEntry {
    pub fn single(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            label: None,
            copies: 1,
        }
    }
}

impl From<&RosterRow> for StampEntry {
    fn from(row: &RosterRow) -> Self {
        Self {
            payload: row.link.clone(),
            label: Some(row.name.clone()),
            copies: row.amount,
        }
    }
}

pub trait Compositor {
    fn stamp(&mut self, entry: &StampEntry, qr: &QrRaster) -> Result<()>;

    /// Writes anything still pending and returns every file produced.
    fn finish(self: Box<Self>) -> Result<Vec<PathBuf>>;
}

/// Picks the one-file-per-payload compositor matching the source type.
pub fn per_payload_compositor(
    source: &SourceSurface,
    rect: PlacementRect,
    output_dir: &Path,
) -> Box<dyn Compositor> {
    match source.kind() {
        SurfaceKind::Raster => Box::new(RasterPerPayload::new(
            source.first_page().to_rgb8(),
            rect,
            output_dir,
        )),
        SurfaceKind::Document => Box::new(PdfPerPayload::new(source.path(), rect, output_dir)),
    }
}

/// `output_image_<n>.png` / `output_pdf_<n>.pdf`, 1-indexed.
pub(crate) fn numbered_output(dir: &Path, stem: &str, index: usize, ext: &str) -> PathBuf {
    dir.join(format!("{stem}_{index}.{ext}"))
}
