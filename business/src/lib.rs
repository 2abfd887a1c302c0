//! Core of the QR stamping tools: previews, drag selection, QR rendering,
//! roster parsing and writing stamped images and PDFs.

pub mod batch;
pub mod compositor;
pub mod config;
pub mod error;
pub mod pdf;
pub mod placement;
pub mod preview;
pub mod qr;
pub mod roster;
pub mod selection;
pub mod source;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use batch::{BatchOutput, BatchSession, BatchStage};
pub use compositor::{Compositor, StampEntry};
pub use config::{LabelStyle, QrSettings, StampConfig};
pub use error::{Result, StampError};
pub use placement::{PlacementSession, split_payloads};
pub use preview::{Preview, ScaleFactor};
pub use qr::{QrRaster, generate_qr};
pub use roster::{Roster, RosterRow, load_roster};
pub use selection::{PlacementRect, PreviewPoint, SelectionPhase, SelectionTracker};
pub use source::{
    BlankPageRasterizer, PageRasterizer, PdfiumRasterizer, SourceSurface, SurfaceKind,
    default_rasterizer,
};
