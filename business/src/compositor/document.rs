use std::path::{Path, PathBuf};

use lopdf::{Document, ObjectId};

use super::{Compositor, StampEntry, numbered_output};
use crate::config::LabelStyle;
use crate::error::Result;
use crate::pdf::{self, Label};
use crate::qr::QrRaster;
use crate::selection::PlacementRect;

fn embed_qr(doc: &mut Document, qr: &QrRaster, rect: &PlacementRect) -> Option<ObjectId> {
    match qr.fit_to(rect) {
        Some(code) => Some(pdf::add_image_xobject(doc, &code)),
        None => {
            log::warn!("Placement {rect} has no area, QR code skipped");
            None
        }
    }
}

/// Stamps the QR code onto every page of a fresh copy of the source PDF and
/// saves it as `output_pdf_<n>.pdf`.
pub struct PdfPerPayload {
    source: PathBuf,
    rect: PlacementRect,
    output_dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PdfPerPayload {
    pub fn new(source: &Path, rect: PlacementRect, output_dir: &Path) -> Self {
        Self {
            source: source.to_path_buf(),
            rect,
            output_dir: output_dir.to_path_buf(),
            written: Vec::new(),
        }
    }
}

impl Compositor for PdfPerPayload {
    fn stamp(&mut self, entry: &StampEntry, qr: &QrRaster) -> Result<()> {
        let mut doc = pdf::load_document(&self.source)?;
        let image = embed_qr(&mut doc, qr, &self.rect);
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for page in pages {
            pdf::stamp_page(&mut doc, page, &self.rect, image, None)?;
        }

        let path = numbered_output(&self.output_dir, "output_pdf", self.written.len() + 1, "pdf");
        pdf::save_document(&mut doc, &path)?;
        log::info!("Generated: {:?} for {:?}", path, entry.payload);
        self.written.push(path);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<Vec<PathBuf>> {
        Ok(self.written)
    }
}

/// Builds one document out of stamped copies of a template's first page.
///
/// Each entry contributes `copies` pages in order, all sharing one embedded
/// QR image. Nothing is written until [`Compositor::finish`].
pub struct PdfAccumulator {
    doc: Document,
    template_page: ObjectId,
    pages_root: ObjectId,
    font: ObjectId,
    rect: PlacementRect,
    style: LabelStyle,
    output: PathBuf,
    pages: Vec<ObjectId>,
}

impl PdfAccumulator {
    pub fn new(
        template: &Path,
        rect: PlacementRect,
        style: LabelStyle,
        output: &Path,
    ) -> Result<Self> {
        Self::from_document(pdf::load_document(template)?, rect, style, output)
    }

    pub fn from_document(
        mut doc: Document,
        rect: PlacementRect,
        style: LabelStyle,
        output: &Path,
    ) -> Result<Self> {
        let template_page = pdf::first_page_id(&doc)?;
        let pages_root = pdf::pages_root(&doc)?;
        let font = pdf::add_standard_font(&mut doc, &style.base_font);
        Ok(Self {
            doc,
            template_page,
            pages_root,
            font,
            rect,
            style,
            output: output.to_path_buf(),
            pages: Vec::new(),
        })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl Compositor for PdfAccumulator {
    fn stamp(&mut self, entry: &StampEntry, qr: &QrRaster) -> Result<()> {
        if entry.copies == 0 {
            log::debug!("Skipping {:?}: zero copies", entry.payload);
            return Ok(());
        }

        let image = embed_qr(&mut self.doc, qr, &self.rect);
        let label = entry.label.as_deref().map(|text| Label {
            text,
            style: &self.style,
            font: self.font,
        });
        for _ in 0..entry.copies {
            let page = pdf::copy_page(&mut self.doc, self.template_page, self.pages_root)?;
            pdf::stamp_page(&mut self.doc, page, &self.rect, image, label.as_ref())?;
            self.pages.push(page);
        }
        log::debug!("Added {} page(s) for {:?}", entry.copies, entry.payload);
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<Vec<PathBuf>> {
        pdf::replace_pages(&mut self.doc, &self.pages)?;
        pdf::save_document(&mut self.doc, &self.output)?;
        Ok(vec![self.output])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QrSettings;
    use crate::qr::generate_qr;
    use crate::test_utils::{find_operands, numbers, page_ids, write_blank_pdf};

    fn letter_template(dir: &Path) -> PathBuf {
        let path = dir.join("template.pdf");
        write_blank_pdf(&path, &[(612.0, 792.0)]);
        path
    }

    fn entry(link: &str, name: &str, copies: u32) -> StampEntry {
        StampEntry {
            payload: link.to_string(),
            label: Some(name.to_string()),
            copies,
        }
    }

    #[test]
    fn test_per_payload_stamps_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source.pdf");
        write_blank_pdf(&source, &[(612.0, 792.0), (612.0, 792.0)]);
        let rect = PlacementRect::from_corners((50, 700), (150, 750));

        let mut compositor = Box::new(PdfPerPayload::new(&source, rect, dir.path()));
        let qr = generate_qr("https://a.example", &QrSettings::default()).unwrap();
        compositor
            .stamp(&StampEntry::single("https://a.example"), &qr)
            .unwrap();
        let written = compositor.finish().unwrap();
        assert_eq!(written, vec![dir.path().join("output_pdf_1.pdf")]);

        let doc = Document::load(&written[0]).unwrap();
        let pages = page_ids(&doc);
        assert_eq!(pages.len(), 2);
        for page in pages {
            let cm = find_operands(&doc, page, "cm").expect("stamped page");
            assert_eq!(numbers(&cm), vec![100.0, 0.0, 0.0, 50.0, 50.0, 42.0]);
        }
    }

    #[test]
    fn test_per_payload_leaves_source_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = letter_template(dir.path());
        let before = std::fs::read(&source).unwrap();
        let rect = PlacementRect::from_corners((0, 0), (10, 10));

        let mut compositor = PdfPerPayload::new(&source, rect, dir.path());
        for payload in ["a", "b", "c"] {
            let qr = generate_qr(payload, &QrSettings::default()).unwrap();
            compositor.stamp(&StampEntry::single(payload), &qr).unwrap();
        }
        let written = Box::new(compositor).finish().unwrap();
        assert_eq!(written.len(), 3);
        assert!(written[2].ends_with("output_pdf_3.pdf"));
        assert_eq!(std::fs::read(&source).unwrap(), before);
    }

    #[test]
    fn test_accumulator_repeats_pages_per_copy() {
        let dir = tempfile::tempdir().unwrap();
        let template = letter_template(dir.path());
        let output = dir.path().join("out.pdf");
        let rect = PlacementRect::from_corners((50, 700), (150, 750));

        let mut compositor = Box::new(
            PdfAccumulator::new(&template, rect, LabelStyle::default(), &output).unwrap(),
        );
        let settings = QrSettings::default();
        for e in [
            entry("https://a.example", "Alice", 2),
            entry("https://b.example", "Bob", 0),
            entry("https://c.example", "Carol", 1),
        ] {
            let qr = generate_qr(&e.payload, &settings).unwrap();
            compositor.stamp(&e, &qr).unwrap();
        }
        assert_eq!(compositor.page_count(), 3);
        assert_eq!(compositor.finish().unwrap(), vec![output.clone()]);

        let doc = Document::load(&output).unwrap();
        let pages = page_ids(&doc);
        assert_eq!(pages.len(), 3);
        let labels: Vec<Vec<u8>> = pages
            .iter()
            .map(|&p| find_operands(&doc, p, "Tj").unwrap()[0].as_str().unwrap().to_vec())
            .collect();
        assert_eq!(
            labels,
            vec![b"Alice".to_vec(), b"Alice".to_vec(), b"Carol".to_vec()]
        );
        let td = find_operands(&doc, pages[0], "Td").unwrap();
        assert_eq!(numbers(&td), vec![512.0, 30.0]);
    }

    #[test]
    fn test_accumulator_with_no_pages_writes_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let template = letter_template(dir.path());
        let output = dir.path().join("empty.pdf");
        let rect = PlacementRect::from_corners((0, 0), (10, 10));

        let compositor = Box::new(
            PdfAccumulator::new(&template, rect, LabelStyle::default(), &output).unwrap(),
        );
        compositor.finish().unwrap();

        let doc = Document::load(&output).unwrap();
        assert!(doc.get_pages().is_empty());
    }
}
