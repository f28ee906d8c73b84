//! PDF overlay engine.
//!
//! Loads the template, draws a render plan onto its pages and serializes
//! the result. The template's own content is left untouched: each page's
//! existing content streams are wrapped in `q`/`Q` and the overlay is
//! appended as a new stream after them.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;

use super::fonts::FontSet;
use super::plan::{DrawOp, RenderPlan};
use super::renderer::PageCanvas;
use super::resources::TemplateResources;
use super::GeneratorError;

// Page trees are shallow; cap the walk in case of a Parent cycle.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Stateless engine for drawing render plans onto a PDF template.
pub struct PdfOverlayEngine;

impl PdfOverlayEngine {
    /// Draw `plan` onto the template and return the serialized document.
    ///
    /// # Arguments
    /// * `resources` - Template and font bytes for this generation.
    /// * `plan` - Draws in order; later draws paint over earlier ones.
    pub fn render(
        resources: TemplateResources,
        plan: &RenderPlan,
    ) -> Result<Vec<u8>, GeneratorError> {
        let TemplateResources {
            template,
            body_font,
            symbol_font,
        } = resources;

        let mut doc = Document::load_mem(&template).map_err(GeneratorError::Template)?;
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if let Some(last) = plan.last_page() {
            if last >= pages.len() {
                return Err(GeneratorError::PageOutOfRange {
                    index: last,
                    count: pages.len(),
                });
            }
        }

        let mut fonts = FontSet::register(&mut doc, body_font, symbol_font)?;

        let mut canvases: BTreeMap<usize, PageCanvas> = BTreeMap::new();
        for op in plan.ops() {
            let canvas = canvases.entry(op.page()).or_default();
            match op {
                DrawOp::Field {
                    placement, value, ..
                } => canvas.draw_field(&mut fonts, placement, value),
                DrawOp::Image {
                    field,
                    placement,
                    bytes,
                } => {
                    if let Err(e) = canvas.draw_image(&mut doc, placement, bytes) {
                        log::warn!("Skipping {:?}: {}", field, e);
                    }
                }
            }
        }

        fonts.write_objects(&mut doc)?;

        for (index, canvas) in canvases {
            if canvas.is_empty() {
                continue;
            }
            apply_canvas(&mut doc, pages[index], canvas, &fonts)?;
        }

        log::debug!(
            "Rendered {} draw(s) across {} page(s)",
            plan.len(),
            pages.len()
        );

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| GeneratorError::Serialize(e.to_string()))?;
        Ok(buffer)
    }
}

/// Register the canvas resources on the page and append its content.
fn apply_canvas(
    doc: &mut Document,
    page_id: ObjectId,
    canvas: PageCanvas,
    fonts: &FontSet,
) -> Result<(), GeneratorError> {
    inline_resources(doc, page_id)?;
    inline_resource_category(doc, page_id, b"Font")?;
    inline_resource_category(doc, page_id, b"XObject")?;

    let font_dict = page_resources_mut(doc, page_id)?
        .get_mut(b"Font")?
        .as_dict_mut()?;
    for font in canvas.fonts() {
        let font = fonts.get(font);
        font_dict.set(font.resource_name, Object::Reference(font.object_id));
    }
    let xobject_dict = page_resources_mut(doc, page_id)?
        .get_mut(b"XObject")?
        .as_dict_mut()?;
    for (name, id) in canvas.images() {
        xobject_dict.set(name.as_bytes().to_vec(), Object::Reference(*id));
    }

    let overlay = canvas
        .into_content()
        .encode()
        .map_err(|e| GeneratorError::Serialize(e.to_string()))?;
    append_overlay(doc, page_id, overlay)
}

fn page_resources_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary, GeneratorError> {
    Ok(doc
        .get_dictionary_mut(page_id)?
        .get_mut(b"Resources")?
        .as_dict_mut()?)
}

/// Give the page its own inline Resources dictionary, copying referenced or
/// inherited resources so other pages are unaffected.
fn inline_resources(doc: &mut Document, page_id: ObjectId) -> Result<(), GeneratorError> {
    let page = doc.get_dictionary(page_id)?;
    let resolved = match page.get(b"Resources") {
        Ok(Object::Dictionary(_)) => return Ok(()),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?.clone(),
        _ => inherited_resources(doc, page).unwrap_or_default(),
    };
    doc.get_dictionary_mut(page_id)?
        .set("Resources", Object::Dictionary(resolved));
    Ok(())
}

fn inherited_resources(doc: &Document, page: &Dictionary) -> Option<Dictionary> {
    let mut current = page;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let parent_id = current.get(b"Parent").and_then(Object::as_reference).ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
        match current.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => return Some(dict.clone()),
            Ok(Object::Reference(id)) => return doc.get_dictionary(*id).ok().cloned(),
            _ => {}
        }
    }
    None
}

/// Make `Resources/<key>` an inline dictionary on the page.
fn inline_resource_category(
    doc: &mut Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<(), GeneratorError> {
    let resources = doc
        .get_dictionary(page_id)?
        .get(b"Resources")?
        .as_dict()?;
    let resolved = match resources.get(key) {
        Ok(Object::Dictionary(_)) => return Ok(()),
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?.clone(),
        _ => Dictionary::new(),
    };
    page_resources_mut(doc, page_id)?.set(key.to_vec(), Object::Dictionary(resolved));
    Ok(())
}

/// Wrap the page's existing content in `q`/`Q` and append the overlay, so
/// graphics state left behind by the template cannot shift the overlay.
fn append_overlay(
    doc: &mut Document,
    page_id: ObjectId,
    overlay: Vec<u8>,
) -> Result<(), GeneratorError> {
    let existing = match doc.get_dictionary(page_id)?.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
    let mut closing = b"\nQ\n".to_vec();
    closing.extend(overlay);
    let overlay_id = doc.add_object(Stream::new(Dictionary::new(), closing));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(open_id));
    contents.extend(existing);
    contents.push(Object::Reference(overlay_id));

    doc.get_dictionary_mut(page_id)?
        .set("Contents", Object::Array(contents));
    Ok(())
}
