//! Field renderer: turns draw operations into PDF content operators.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::GenericImageView;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeSet;
use std::io::Write;

use super::fonts::{word_wrap, EmbeddedFont, FontSet, CHECKMARK};
use super::layout::{FontRef, ImagePlacement, PlacementDescriptor};
use super::RenderError;

pub(crate) fn deflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Overlay content and the resources it needs for a single page.
#[derive(Debug, Default)]
pub struct PageCanvas {
    operations: Vec<Operation>,
    fonts: BTreeSet<FontRef>,
    images: Vec<(String, ObjectId)>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Fonts drawn with on this page.
    pub fn fonts(&self) -> impl Iterator<Item = FontRef> + '_ {
        self.fonts.iter().copied()
    }

    /// Image XObjects drawn on this page, by resource name.
    pub fn images(&self) -> &[(String, ObjectId)] {
        &self.images
    }

    /// Draw a text value, or the checkmark for glyph marks.
    pub fn draw_field(&mut self, fonts: &mut FontSet, placement: &PlacementDescriptor, value: &str) {
        let text = if placement.glyph_mark {
            CHECKMARK.to_string()
        } else {
            value.to_string()
        };
        let font = fonts.get_mut(placement.font);
        let lines = layout_lines(font, &text, placement);
        if lines.is_empty() {
            return;
        }
        let line_height = placement.line_height.unwrap_or(placement.size);

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new("BT", vec![]));
        self.operations.push(Operation::new(
            "Tf",
            vec![
                Object::Name(font.resource_name.as_bytes().to_vec()),
                Object::Real(placement.size),
            ],
        ));
        self.operations.push(Operation::new(
            "rg",
            vec![
                Object::Real(placement.color.r),
                Object::Real(placement.color.g),
                Object::Real(placement.color.b),
            ],
        ));
        for (i, line) in lines.iter().enumerate() {
            let y = placement.y - i as f32 * line_height;
            self.operations.push(Operation::new(
                "Tm",
                vec![
                    Object::Integer(1),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(1),
                    Object::Real(placement.x),
                    Object::Real(y),
                ],
            ));
            self.operations
                .push(Operation::new("Tj", vec![font.encode(line)]));
        }
        self.operations.push(Operation::new("ET", vec![]));
        self.operations.push(Operation::new("Q", vec![]));
        self.fonts.insert(placement.font);
    }

    /// Embed an encoded image and scale it into the placement box.
    ///
    /// Nothing is added to the page when the image cannot be decoded.
    pub fn draw_image(
        &mut self,
        doc: &mut Document,
        placement: &ImagePlacement,
        bytes: &[u8],
    ) -> Result<(), RenderError> {
        let xobject_id = embed_image(doc, bytes)?;
        let name = format!("RfImg{}", self.images.len());

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                Object::Real(placement.width),
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(placement.height),
                Object::Real(placement.x),
                Object::Real(placement.y),
            ],
        ));
        self.operations
            .push(Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]));
        self.operations.push(Operation::new("Q", vec![]));
        self.images.push((name, xobject_id));
        Ok(())
    }

    pub fn into_content(self) -> Content {
        Content {
            operations: self.operations,
        }
    }
}

/// Split a value into drawn lines: explicit line breaks first, then word
/// wrap when the placement has a maximum width.
fn layout_lines(font: &EmbeddedFont, text: &str, placement: &PlacementDescriptor) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        match placement.max_width {
            Some(max_width) => lines.extend(word_wrap(paragraph, max_width, |s| {
                font.text_width(s, placement.size)
            })),
            None => {
                if !paragraph.is_empty() {
                    lines.push(paragraph.to_string());
                }
            }
        }
    }
    lines
}

/// Decode PNG/JPEG bytes into an RGB image XObject, with alpha as a soft mask.
fn embed_image(doc: &mut Document, bytes: &[u8]) -> Result<ObjectId, RenderError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();
    let rgba = image.to_rgba8();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    let mut alpha = Vec::with_capacity((width * height) as usize);
    let mut opaque = true;
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
        opaque &= pixel.0[3] == u8::MAX;
    }

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
        "Filter" => "FlateDecode",
    };

    if !opaque {
        let mask_id = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(&alpha)?,
        ));
        image_dict.set("SMask", mask_id);
    }

    Ok(doc.add_object(Stream::new(image_dict, deflate(&rgb)?)))
}
