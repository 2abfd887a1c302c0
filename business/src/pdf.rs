//! PDF page helpers built on `lopdf`: page geometry, page copies and stamping
//! images and text onto existing pages.
//!
//! Placement rectangles use a top-left origin with y pointing down, the way
//! the page looks on screen. PDF user space has its origin at the bottom-left
//! of the media box, so every coordinate is flipped on the way in.

use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

use crate::config::LabelStyle;
use crate::error::{Result, StampError};
use crate::selection::PlacementRect;

const IMAGE_RESOURCE: &str = "QrStamp";
const FONT_RESOURCE: &str = "QrLabel";

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Guard against malformed page trees whose parent links loop.
const MAX_TREE_DEPTH: usize = 64;

pub fn load_document(path: &Path) -> Result<Document> {
    let doc = Document::load(path)?;
    log::debug!("Loaded {:?}: {} pages", path, doc.get_pages().len());
    Ok(doc)
}

/// The media box of a page, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub left: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl PageGeometry {
    /// Converts a top-left point to PDF user space.
    pub fn to_user_space(&self, x: f32, y: f32) -> (f32, f32) {
        (self.left + x, self.bottom + self.height - y)
    }

    /// Lower-left corner, width and height of `rect` in PDF user space.
    pub fn rect_to_user_space(&self, rect: &PlacementRect) -> (f32, f32, f32, f32) {
        let (x, y) = self.to_user_space(rect.x1 as f32, rect.y2 as f32);
        (x, y, rect.width() as f32, rect.height() as f32)
    }
}

/// Letter size, used when neither the page nor its ancestors carry a media box.
const FALLBACK_GEOMETRY: PageGeometry = PageGeometry {
    left: 0.0,
    bottom: 0.0,
    width: 612.0,
    height: 792.0,
};

pub fn page_geometry(doc: &Document, page_id: ObjectId) -> PageGeometry {
    inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|obj| media_box(doc, &obj))
        .unwrap_or_else(|| {
            log::warn!("Page {page_id:?} has no MediaBox, assuming US Letter");
            FALLBACK_GEOMETRY
        })
}

pub fn first_page_id(doc: &Document) -> Result<ObjectId> {
    doc.get_pages()
        .into_values()
        .next()
        .ok_or(StampError::EmptyTemplate)
}

pub fn first_page_geometry(doc: &Document) -> Result<PageGeometry> {
    Ok(page_geometry(doc, first_page_id(doc)?))
}

fn media_box(doc: &Document, obj: &Object) -> Option<PageGeometry> {
    let arr = resolve(doc, obj).as_array().ok()?;
    let [llx, lly, urx, ury] = arr.as_slice() else {
        return None;
    };
    let (llx, lly, urx, ury) = (
        number(doc, llx)?,
        number(doc, lly)?,
        number(doc, urx)?,
        number(doc, ury)?,
    );
    Some(PageGeometry {
        left: llx.min(urx),
        bottom: lly.min(ury),
        width: (urx - llx).abs(),
        height: (ury - lly).abs(),
    })
}

fn number(doc: &Document, obj: &Object) -> Option<f32> {
    match resolve(doc, obj) {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        other => other,
    }
}

/// Looks `key` up on the page, then on each ancestor in the page tree.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

/// A copy of `obj` as an owned dictionary, following one level of reference.
fn owned_dict(doc: &Document, obj: Option<&Object>) -> Dictionary {
    match obj.map(|o| resolve(doc, o)) {
        Some(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    }
}

/// Adds a new page whose content and resources are those of `template`.
///
/// Inherited attributes are materialised on the copy so it renders the same
/// when attached directly under `parent`. Annotations are not copied because
/// they point back at their original page.
pub fn copy_page(doc: &mut Document, template: ObjectId, parent: ObjectId) -> Result<ObjectId> {
    let mut page = doc.get_dictionary(template)?.clone();
    for key in INHERITABLE {
        if !page.has(key)
            && let Some(value) = inherited_attribute(doc, template, key)
        {
            page.set(key.to_vec(), value);
        }
    }
    page.set("Parent", parent);
    page.remove(b"Annots");
    Ok(doc.add_object(page))
}

/// Embeds an RGB raster as an image XObject.
pub fn add_image_xobject(doc: &mut Document, image: &RgbImage) -> ObjectId {
    let (w, h) = image.dimensions();
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(w),
            "Height" => i64::from(h),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        image.as_raw().clone(),
    );
    doc.add_object(stream)
}

/// Adds one of the standard 14 fonts with WinAnsi encoding.
pub fn add_standard_font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Text drawn on a page with a previously added font.
#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    pub text: &'a str,
    pub style: &'a LabelStyle,
    pub font: ObjectId,
}

/// Draws `image` into `rect` and `label` near the bottom-right corner of a page.
///
/// The page's existing content is wrapped in `q`/`Q` first so whatever
/// graphics state it leaves behind does not leak into the stamp.
pub fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    rect: &PlacementRect,
    image: Option<ObjectId>,
    label: Option<&Label<'_>>,
) -> Result<()> {
    let geometry = page_geometry(doc, page_id);
    let mut resources = owned_dict(
        doc,
        inherited_attribute(doc, page_id, b"Resources").as_ref(),
    );
    let mut operations = vec![Operation::new("Q", vec![])];

    if let Some(image_id) = image {
        let mut xobjects = owned_dict(doc, resources.get(b"XObject").ok());
        xobjects.set(IMAGE_RESOURCE, image_id);
        resources.set("XObject", xobjects);

        let (x, y, w, h) = geometry.rect_to_user_space(rect);
        operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(w),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(h),
                    Object::Real(x),
                    Object::Real(y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.into())]),
            Operation::new("Q", vec![]),
        ]);
    }

    if let Some(label) = label {
        let mut fonts = owned_dict(doc, resources.get(b"Font").ok());
        fonts.set(FONT_RESOURCE, label.font);
        resources.set("Font", fonts);

        let (x, y) = geometry.to_user_space(
            geometry.width - label.style.offset_x,
            geometry.height - label.style.offset_y,
        );
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "rg",
                vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
            ),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.into()),
                    Object::Real(label.style.font_size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new(
                "Tj",
                vec![Object::String(
                    to_win_ansi(label.text),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]);
    }

    let existing = existing_contents(doc, page_id)?;
    let stamp = Content { operations }.encode()?;
    let open_id = doc.add_object(Stream::new(dictionary! {}, b"q\n".to_vec()));
    let stamp_id = doc.add_object(Stream::new(dictionary! {}, stamp));

    let mut contents = vec![Object::Reference(open_id)];
    contents.extend(existing);
    contents.push(Object::Reference(stamp_id));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;

    page.set("Contents", contents);
    page.set("Resources", resources);
    Ok(())
}

/// The page's content streams as a flat list of references.
///
/// `/Contents` may be a stream reference, an inline array, or a reference
/// to an array; the last form is spliced rather than nested.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc.get_dictionary(page_id)?;
    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}

/// Replaces the page list under the root `Pages` node.
///
/// Catalog entries that point into the old page list (outlines, structure
/// tree, page labels) are dropped along with the pages.
pub fn replace_pages(doc: &mut Document, pages: &[ObjectId]) -> Result<()> {
    let root_id = pages_root(doc)?;
    let root = doc.get_object_mut(root_id)?.as_dict_mut()?;
    root.set(
        "Kids",
        pages
            .iter()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    root.set("Count", pages.len() as i64);

    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let catalog = doc.get_object_mut(catalog_id)?.as_dict_mut()?;
    for key in [b"Outlines".as_slice(), b"StructTreeRoot", b"PageLabels"] {
        catalog.remove(key);
    }

    doc.prune_objects();
    Ok(())
}

pub fn pages_root(doc: &Document) -> Result<ObjectId> {
    Ok(doc.catalog()?.get(b"Pages")?.as_reference()?)
}

/// Compresses streams and writes the document.
pub fn save_document(doc: &mut Document, path: &Path) -> Result<()> {
    doc.compress();
    doc.save(path)?;
    log::info!("Saved {:?} ({} pages)", path, doc.get_pages().len());
    Ok(())
}

/// Maps text onto the WinAnsi code page used by the standard fonts.
///
/// Latin-1 characters map to themselves; anything else becomes `?`.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}
