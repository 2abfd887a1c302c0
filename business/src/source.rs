//! Loading source surfaces (raster images and PDF templates).
//!
//! Raster images are decoded with `image`. PDFs are rasterised through the
//! [`PageRasterizer`] seam so the preview can come from pdfium when the
//! library is available and from a blank page of the right size otherwise.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, Rgb, RgbImage};

use crate::error::{Result, StampError};
use crate::pdf::{first_page_geometry, load_document};
use crate::preview::{Preview, scale_to_preview};

/// Renders the first page of a PDF at 72 DPI, so one pixel equals one point.
pub trait PageRasterizer {
    fn first_page(&self, path: &Path) -> Result<DynamicImage>;
}

/// Renders PDF pages with the pdfium library.
pub struct PdfiumRasterizer {
    pdfium: pdfium_render::prelude::Pdfium,
}

impl PdfiumRasterizer {
    /// Binds to the system pdfium library.
    pub fn bind() -> Result<Self> {
        use pdfium_render::prelude::Pdfium;

        let bindings = Pdfium::bind_to_system_library().map_err(StampError::render)?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn first_page(&self, path: &Path) -> Result<DynamicImage> {
        use pdfium_render::prelude::PdfRenderConfig;

        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .map_err(StampError::render)?;
        let page = document.pages().get(0).map_err(StampError::render)?;

        let width = page.width().value.round().max(1.0) as i32;
        let height = page.height().value.round().max(1.0) as i32;
        let config = PdfRenderConfig::new()
            .set_target_width(width)
            .set_maximum_height(height);
        let bitmap = page
            .render_with_config(&config)
            .map_err(StampError::render)?;

        let (w, h) = (bitmap.width() as u32, bitmap.height() as u32);
        let rgba = image::RgbaImage::from_raw(w, h, bitmap.as_rgba_bytes())
            .ok_or_else(|| StampError::render("bitmap size does not match its buffer"))?;
        log::debug!("Rendered first page of {:?} at {w}x{h}", path);
        Ok(DynamicImage::ImageRgba8(rgba))
    }
}

/// Produces a white page with the template's dimensions.
///
/// Used when pdfium cannot be loaded: placement still works, the preview just
/// lacks the template artwork.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlankPageRasterizer;

impl PageRasterizer for BlankPageRasterizer {
    fn first_page(&self, path: &Path) -> Result<DynamicImage> {
        let doc = load_document(path)?;
        let geometry = first_page_geometry(&doc)?;
        let w = geometry.width.round().max(1.0) as u32;
        let h = geometry.height.round().max(1.0) as u32;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            w,
            h,
            Rgb([255, 255, 255]),
        )))
    }
}

/// Picks pdfium when it can be bound, else the blank-page fallback.
pub fn default_rasterizer() -> Box<dyn PageRasterizer> {
    match PdfiumRasterizer::bind() {
        Ok(r) => Box::new(r),
        Err(e) => {
            log::warn!("pdfium unavailable, PDF previews will be blank: {e}");
            Box::new(BlankPageRasterizer)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Raster,
    Document,
}

/// A loaded source: the file it came from and its first page as a raster.
#[derive(Debug, Clone)]
pub struct SourceSurface {
    path: PathBuf,
    kind: SurfaceKind,
    first_page: DynamicImage,
}

impl SourceSurface {
    /// Opens an image or a PDF, chosen by the `.pdf` extension.
    pub fn open(path: &Path, rasterizer: &dyn PageRasterizer) -> Result<Self> {
        if is_pdf(path) {
            return Self::open_pdf(path, rasterizer);
        }

        let first_page = image::open(path).map_err(|e| match e {
            ImageError::Unsupported(_) => StampError::UnsupportedSource(path.to_path_buf()),
            other => StampError::Image(other),
        })?;
        log::info!(
            "Loaded image {:?} ({}x{})",
            path,
            first_page.width(),
            first_page.height()
        );

        Ok(Self {
            path: path.to_path_buf(),
            kind: SurfaceKind::Raster,
            first_page,
        })
    }

    pub fn open_pdf(path: &Path, rasterizer: &dyn PageRasterizer) -> Result<Self> {
        if !is_pdf(path) {
            return Err(StampError::UnsupportedSource(path.to_path_buf()));
        }
        let first_page = rasterizer.first_page(path)?;
        log::info!(
            "Loaded PDF {:?}, first page {}x{}",
            path,
            first_page.width(),
            first_page.height()
        );

        Ok(Self {
            path: path.to_path_buf(),
            kind: SurfaceKind::Document,
            first_page,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn first_page(&self) -> &DynamicImage {
        &self.first_page
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.first_page.width(), self.first_page.height())
    }

    pub fn preview(&self, bound: (u32, u32)) -> Preview {
        scale_to_preview(&self.first_page, bound)
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::write_blank_pdf;

    #[test]
    fn test_is_pdf_ignores_case() {
        assert!(is_pdf(Path::new("flyer.PDF")));
        assert!(is_pdf(Path::new("/tmp/flyer.pdf")));
        assert!(!is_pdf(Path::new("flyer.png")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_open_raster_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("source.png");
        RgbImage::from_pixel(40, 20, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let surface = SourceSurface::open(&path, &BlankPageRasterizer).unwrap();
        assert_eq!(surface.kind(), SurfaceKind::Raster);
        assert_eq!(surface.dimensions(), (40, 20));
        assert_eq!(surface.file_name(), "source.png");
    }

    #[test]
    fn test_open_pdf_uses_rasterizer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.pdf");
        write_blank_pdf(&path, &[(612.0, 792.0)]);

        let surface = SourceSurface::open(&path, &BlankPageRasterizer).unwrap();
        assert_eq!(surface.kind(), SurfaceKind::Document);
        assert_eq!(surface.dimensions(), (612, 792));

        let preview = surface.preview((600, 400));
        assert_eq!((preview.width(), preview.height()), (309, 400));
    }

    #[test]
    fn test_open_pdf_rejects_images() {
        let err = SourceSurface::open_pdf(Path::new("photo.jpg"), &BlankPageRasterizer)
            .unwrap_err();
        assert!(matches!(err, StampError::UnsupportedSource(_)));
    }

    #[test]
    fn test_open_unknown_extension_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image").unwrap();
        let err = SourceSurface::open(&path, &BlankPageRasterizer).unwrap_err();
        assert!(matches!(err, StampError::UnsupportedSource(_)), "{err:?}");
    }
}
