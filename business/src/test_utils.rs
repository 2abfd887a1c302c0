//! Fixtures shared by unit tests and the integration tests of dependent crates.

use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// Writes a PDF with one page per `(width, height)` entry, in points.
///
/// Every page carries a small content stream (a filled square in the
/// bottom-left corner) so copies of the page have something to share.
pub fn write_blank_pdf(path: &Path, pages: &[(f32, f32)]) {
    let mut doc = blank_pdf(pages);
    doc.save(path).expect("write test PDF");
}

pub fn blank_pdf(pages: &[(f32, f32)]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let content = Content {
        operations: vec![
            Operation::new("g", vec![Object::Real(0.5)]),
            Operation::new(
                "re",
                vec![
                    Object::Integer(10),
                    Object::Integer(10),
                    Object::Integer(20),
                    Object::Integer(20),
                ],
            ),
            Operation::new("f", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode test content"),
    ));

    let kids: Vec<Object> = pages
        .iter()
        .map(|&(w, h)| {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(w),
                    Object::Real(h),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {},
            });
            Object::Reference(page_id)
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

/// Concatenated, decoded content of a page.
pub fn page_content(doc: &Document, page_id: ObjectId) -> String {
    let bytes = doc.get_page_content(page_id).expect("page content");
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Decoded `(operator, operands)` pairs of a page, in drawing order.
pub fn page_operations(doc: &Document, page_id: ObjectId) -> Vec<(String, Vec<Object>)> {
    let bytes = doc.get_page_content(page_id).expect("page content");
    Content::decode(&bytes)
        .expect("decodable content")
        .operations
        .into_iter()
        .map(|op| (op.operator, op.operands))
        .collect()
}

/// Operands of the first occurrence of `operator` on a page.
pub fn find_operands(doc: &Document, page_id: ObjectId, operator: &str) -> Option<Vec<Object>> {
    page_operations(doc, page_id)
        .into_iter()
        .find(|(op, _)| op == operator)
        .map(|(_, operands)| operands)
}

/// Numeric operands as `f32`, panicking on anything else.
pub fn numbers(operands: &[Object]) -> Vec<f32> {
    operands
        .iter()
        .map(|o| match o {
            Object::Integer(i) => *i as f32,
            Object::Real(f) => *f,
            other => panic!("not a number: {other:?}"),
        })
        .collect()
}

/// The `/QrStamp` image drawn on a page, rebuilt from its XObject stream.
pub fn stamped_image(doc: &Document, page_id: ObjectId) -> Option<RgbImage> {
    let dict_at = |dict: &Dictionary, key: &[u8]| -> Option<Dictionary> {
        let (_, obj) = doc.dereference(dict.get(key).ok()?).ok()?;
        obj.as_dict().ok().cloned()
    };
    let page = doc.get_dictionary(page_id).ok()?;
    let xobjects = dict_at(&dict_at(page, b"Resources")?, b"XObject")?;
    let image_id = xobjects.get(b"QrStamp").ok()?.as_reference().ok()?;
    let stream = doc.get_object(image_id).ok()?.as_stream().ok()?;

    let width = stream.dict.get(b"Width").ok()?.as_i64().ok()?;
    let height = stream.dict.get(b"Height").ok()?.as_i64().ok()?;
    let pixels = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    RgbImage::from_raw(
        u32::try_from(width).ok()?,
        u32::try_from(height).ok()?,
        pixels,
    )
}

/// Page ids in page order.
pub fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}
