#![allow(dead_code)]

use async_trait::async_trait;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use reservation_form_server::form::{ResourceFetchError, ResourceLocations, ResourceSource};
use reservation_form_server::reservation::{
    Applicant, Payment, ReservationRecord, Scalar, Signature, SignatureData, SignatureKind,
};

pub const TEMPLATE_LOCATION: &str = "forms/template.pdf";
pub const BODY_FONT_LOCATION: &str = "forms/body.ttf";
pub const SYMBOL_FONT_LOCATION: &str = "forms/symbol.ttf";

/// First and last printable ASCII codes mapped by the test fonts.
const FIRST_CODE: u16 = 0x20;
const LAST_CODE: u16 = 0x7E;
const ADVANCE: u16 = 500;

pub fn locations() -> ResourceLocations {
    ResourceLocations {
        template: TEMPLATE_LOCATION.to_string(),
        body_font: BODY_FONT_LOCATION.to_string(),
        symbol_font: SYMBOL_FONT_LOCATION.to_string(),
    }
}

/// Build a minimal template with `pages` pages sharing a Helvetica resource.
pub fn template_pdf(pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::with_capacity(pages);
    for index in 0..pages {
        let content = format!("BT /F1 10 Tf 72 760 Td (Template page {}) Tj ET\n", index + 1);
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Minimal TrueType font mapping printable ASCII to glyphs 1..=95.
///
/// With `symbol` set the cmap is a Windows Symbol subtable at
/// `0xF020..=0xF07E`, the layout symbol fonts use.
pub fn truetype_font(symbol: bool) -> Vec<u8> {
    let num_glyphs = LAST_CODE - FIRST_CODE + 2;

    let mut head = Vec::new();
    push_u16(&mut head, 1); // majorVersion
    push_u16(&mut head, 0);
    push_u32(&mut head, 0x0001_0000); // fontRevision
    push_u32(&mut head, 0); // checksumAdjustment
    push_u32(&mut head, 0x5F0F_3CF5);
    push_u16(&mut head, 0); // flags
    push_u16(&mut head, 1000); // unitsPerEm
    head.extend_from_slice(&[0; 16]); // created, modified
    push_i16(&mut head, 0); // xMin
    push_i16(&mut head, -200);
    push_i16(&mut head, 1000);
    push_i16(&mut head, 800);
    push_u16(&mut head, 0); // macStyle
    push_u16(&mut head, 8); // lowestRecPPEM
    push_i16(&mut head, 2); // fontDirectionHint
    push_i16(&mut head, 0); // indexToLocFormat
    push_i16(&mut head, 0); // glyphDataFormat

    let mut hhea = Vec::new();
    push_u32(&mut hhea, 0x0001_0000);
    push_i16(&mut hhea, 800); // ascender
    push_i16(&mut hhea, -200); // descender
    push_i16(&mut hhea, 0); // lineGap
    push_u16(&mut hhea, ADVANCE); // advanceWidthMax
    hhea.extend_from_slice(&[0; 22]);
    push_u16(&mut hhea, num_glyphs); // numberOfHMetrics

    let mut maxp = Vec::new();
    push_u32(&mut maxp, 0x0000_5000);
    push_u16(&mut maxp, num_glyphs);

    let mut hmtx = Vec::new();
    for _ in 0..num_glyphs {
        push_u16(&mut hmtx, ADVANCE);
        push_i16(&mut hmtx, 0);
    }

    let (encoding_id, start) = if symbol {
        (0, 0xF000 + FIRST_CODE)
    } else {
        (1, FIRST_CODE)
    };
    let end = start + (LAST_CODE - FIRST_CODE);
    let delta = 1u16.wrapping_sub(start);

    let mut cmap = Vec::new();
    push_u16(&mut cmap, 0); // version
    push_u16(&mut cmap, 1); // numTables
    push_u16(&mut cmap, 3); // platformID: Windows
    push_u16(&mut cmap, encoding_id);
    push_u32(&mut cmap, 12);
    push_u16(&mut cmap, 4); // format
    push_u16(&mut cmap, 32); // length
    push_u16(&mut cmap, 0); // language
    push_u16(&mut cmap, 4); // segCountX2
    push_u16(&mut cmap, 4); // searchRange
    push_u16(&mut cmap, 1); // entrySelector
    push_u16(&mut cmap, 0); // rangeShift
    push_u16(&mut cmap, end);
    push_u16(&mut cmap, 0xFFFF);
    push_u16(&mut cmap, 0); // reservedPad
    push_u16(&mut cmap, start);
    push_u16(&mut cmap, 0xFFFF);
    push_u16(&mut cmap, delta);
    push_u16(&mut cmap, 1);
    push_u16(&mut cmap, 0); // idRangeOffset
    push_u16(&mut cmap, 0);

    // Table records must be sorted by tag.
    let tables: [(&[u8; 4], Vec<u8>); 5] = [
        (b"cmap", cmap),
        (b"head", head),
        (b"hhea", hhea),
        (b"hmtx", hmtx),
        (b"maxp", maxp),
    ];

    let mut font = Vec::new();
    push_u32(&mut font, 0x0001_0000);
    push_u16(&mut font, tables.len() as u16);
    push_u16(&mut font, 64); // searchRange
    push_u16(&mut font, 2); // entrySelector
    push_u16(&mut font, 16); // rangeShift

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        font.extend_from_slice(*tag);
        push_u32(&mut font, 0); // checksum
        push_u32(&mut font, offset as u32);
        push_u32(&mut font, data.len() as u32);

        body.extend_from_slice(data);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        offset = 12 + 16 * tables.len() + body.len();
    }
    font.extend(body);
    font
}

fn push_u16(buf: &mut Vec<u8>, value: u16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_i16(buf: &mut Vec<u8>, value: i16) {
    buf.extend_from_slice(&value.to_be_bytes());
}

fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_be_bytes());
}

/// Identity-H glyph bytes the test fonts produce for `text`.
pub fn glyphs(text: &str) -> Vec<u8> {
    text.chars()
        .flat_map(|ch| (ch as u16 - FIRST_CODE + 1).to_be_bytes())
        .collect()
}

/// Encoded PNG with a translucent fill.
pub fn png_signature() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(8, 4, image::Rgba([20, 20, 160, 200]));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// In-memory resource source that records every requested location.
pub struct RecordingSource {
    resources: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl RecordingSource {
    pub fn new(resources: HashMap<String, Vec<u8>>) -> Self {
        Self {
            resources,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Source serving a `pages`-page template and both test fonts.
    pub fn with_template(pages: usize) -> Self {
        let mut resources = HashMap::new();
        resources.insert(TEMPLATE_LOCATION.to_string(), template_pdf(pages));
        resources.insert(BODY_FONT_LOCATION.to_string(), truetype_font(false));
        resources.insert(SYMBOL_FONT_LOCATION.to_string(), truetype_font(true));
        Self::new(resources)
    }

    pub fn without(mut self, location: &str) -> Self {
        self.resources.remove(location);
        self
    }

    pub fn replace(mut self, location: &str, bytes: Vec<u8>) -> Self {
        self.resources.insert(location.to_string(), bytes);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl ResourceSource for RecordingSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, ResourceFetchError> {
        self.requests.lock().push(location.to_string());
        self.resources
            .get(location)
            .cloned()
            .ok_or_else(|| ResourceFetchError::Status {
                location: location.to_string(),
                status: 404,
            })
    }
}

pub fn shared(source: RecordingSource) -> Arc<RecordingSource> {
    Arc::new(source)
}

/// A complete, valid reservation.
pub fn sample_record() -> ReservationRecord {
    ReservationRecord {
        guest_name: Some("Jane Doe".to_string()),
        guest_gender: Some("FEMALE".to_string()),
        address: Some("12 Park Street, Kolkata".to_string()),
        number_of_guests: Some(Scalar::Number(2.0)),
        number_of_rooms: Some(Scalar::from("1")),
        room_type: Some("Double".to_string()),
        arrival_date: Some("2024-03-05T00:00:00Z".to_string()),
        arrival_time: Some("14:00".to_string()),
        departure_date: Some("2024-03-07".to_string()),
        departure_time: Some("10:00".to_string()),
        purpose: Some("Conference".to_string()),
        category: Some("ES-A".to_string()),
        applicant: Some(Applicant {
            name: Some("R. Sharma".to_string()),
            designation: Some("Professor".to_string()),
            department: Some("Physics".to_string()),
            code: Some(Scalar::from("PH-12")),
            mobile: Some(Scalar::from("9876543210")),
        }),
        payment: Some(Payment {
            source: Some("GUEST".to_string()),
            source_name: None,
        }),
        ..Default::default()
    }
}

pub fn text_signature(text: &str) -> Signature {
    Signature {
        kind: SignatureKind::Text,
        data: Some(SignatureData::Encoded(text.to_string())),
    }
}

/// One `Tj` draw found in a page's content.
#[derive(Debug, Clone)]
pub struct DrawnText {
    pub font: Vec<u8>,
    pub x: f32,
    pub y: f32,
    pub glyphs: Vec<u8>,
}

/// Every text draw on `page_index`, with the position set by the last `Tm`.
pub fn drawn_text(pdf: &[u8], page_index: usize) -> Vec<DrawnText> {
    let doc = Document::load_mem(pdf).unwrap();
    let page_id = doc.get_pages().into_values().nth(page_index).unwrap();
    let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();

    let mut drawn = Vec::new();
    let mut font = Vec::new();
    let (mut x, mut y) = (0.0, 0.0);
    for op in content.operations {
        match op.operator.as_str() {
            "Tf" => font = op.operands[0].as_name().unwrap().to_vec(),
            "Tm" => {
                x = op.operands[4].as_float().unwrap();
                y = op.operands[5].as_float().unwrap();
            }
            "Tj" => {
                if let Object::String(bytes, _) = &op.operands[0] {
                    drawn.push(DrawnText {
                        font: font.clone(),
                        x,
                        y,
                        glyphs: bytes.clone(),
                    });
                }
            }
            _ => {}
        }
    }
    drawn
}

/// Draws of `text` in the body font.
pub fn find_text<'a>(drawn: &'a [DrawnText], text: &str) -> Vec<&'a DrawnText> {
    let wanted = glyphs(text);
    drawn
        .iter()
        .filter(|d| d.font == b"RfBody" && d.glyphs == wanted)
        .collect()
}

/// Positions of checkmarks drawn with the symbol font.
pub fn checkmarks(drawn: &[DrawnText]) -> Vec<(f32, f32)> {
    drawn
        .iter()
        .filter(|d| d.font == b"RfSymbol")
        .map(|d| (d.x, d.y))
        .collect()
}

pub fn page_count(pdf: &[u8]) -> usize {
    Document::load_mem(pdf).unwrap().get_pages().len()
}
