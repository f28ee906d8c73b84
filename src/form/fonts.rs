//! TrueType font embedding for overlay text.
//!
//! Fonts are embedded whole as Type0 composite fonts with Identity-H
//! encoding, so every drawn string is a sequence of big-endian glyph ids.
//! Glyph widths and the ToUnicode map are written for the glyphs actually
//! drawn, once all drawing is done.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use ttf_parser::{name_id, Face, GlyphId, PlatformId};

use super::layout::FontRef;
use super::renderer::deflate;
use super::GeneratorError;

/// Wingdings 2 maps its checkmark to the letter `P`.
pub const CHECKMARK: char = 'P';

const SYMBOL_ENCODING: u16 = 0;
const SYMBOL_PRIVATE_USE_BASE: u32 = 0xF000;

#[derive(Debug, Clone, Copy)]
struct UsedGlyph {
    ch: char,
    advance: u16,
}

/// One TrueType font registered against a template document.
#[derive(Debug)]
pub struct EmbeddedFont {
    /// Name used in page resource dictionaries and `Tf` operators.
    pub resource_name: &'static str,
    pub object_id: ObjectId,
    role: &'static str,
    data: Vec<u8>,
    postscript_name: String,
    symbolic: bool,
    units_per_em: f32,
    ascent: i16,
    descent: i16,
    cap_height: i16,
    bbox: [i16; 4],
    cmap: HashMap<u32, u16>,
    advances: Vec<u16>,
    used: BTreeMap<u16, UsedGlyph>,
}

impl EmbeddedFont {
    /// Parse font bytes and reserve the object id the font will occupy.
    pub fn register(
        doc: &mut Document,
        role: &'static str,
        resource_name: &'static str,
        data: Vec<u8>,
        symbolic: bool,
    ) -> Result<Self, GeneratorError> {
        let face = Face::parse(&data, 0).map_err(|e| GeneratorError::Font {
            name: role,
            reason: e.to_string(),
        })?;

        let cmap = collect_cmap(&face);
        if cmap.is_empty() {
            return Err(GeneratorError::Font {
                name: role,
                reason: "font has no usable character map".to_string(),
            });
        }

        let advances = (0..face.number_of_glyphs())
            .map(|gid| face.glyph_hor_advance(GlyphId(gid)).unwrap_or(0))
            .collect();
        let bbox = face.global_bounding_box();
        let postscript_name = face
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id::POST_SCRIPT_NAME)
            .and_then(|name| name.to_string())
            .map(|name| sanitize_font_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Form{}", resource_name));

        let font = Self {
            resource_name,
            object_id: doc.new_object_id(),
            role,
            postscript_name,
            symbolic,
            units_per_em: f32::from(face.units_per_em()),
            ascent: face.ascender(),
            descent: face.descender(),
            cap_height: face.capital_height().unwrap_or_else(|| face.ascender()),
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            cmap,
            advances,
            used: BTreeMap::new(),
            data,
        };
        log::debug!(
            "Registered {} font {} ({} glyphs)",
            font.role,
            font.postscript_name,
            font.advances.len()
        );
        Ok(font)
    }

    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        let code = u32::from(ch);
        self.cmap
            .get(&code)
            .or_else(|| self.cmap.get(&(SYMBOL_PRIVATE_USE_BASE + code)))
            .copied()
    }

    fn advance(&self, gid: u16) -> u16 {
        self.advances.get(usize::from(gid)).copied().unwrap_or(0)
    }

    /// Rendered width of `text` in points.
    pub fn text_width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|ch| u32::from(self.advance(self.glyph_id(ch).unwrap_or(0))))
            .sum();
        units as f32 * size / self.units_per_em
    }

    /// Encode `text` as Identity-H glyph ids, recording each glyph used.
    pub fn encode(&mut self, text: &str) -> Object {
        let mut bytes = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let gid = match self.glyph_id(ch) {
                Some(gid) => gid,
                None => {
                    log::warn!("{} font has no glyph for {:?}", self.role, ch);
                    0
                }
            };
            if gid != 0 {
                let advance = self.advance(gid);
                self.used.entry(gid).or_insert(UsedGlyph { ch, advance });
            }
            bytes.extend_from_slice(&gid.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }

    fn to_pdf_units(&self, value: f32) -> i64 {
        (value * 1000.0 / self.units_per_em).round() as i64
    }

    /// Write the font program, descriptor, CID font and Type0 dictionary.
    pub fn write_objects(&self, doc: &mut Document) -> Result<(), GeneratorError> {
        let program = deflate(&self.data).map_err(GeneratorError::Encode)?;
        let program_id = doc.add_object(Stream::new(
            dictionary! {
                "Length1" => self.data.len() as i64,
                "Filter" => "FlateDecode",
            },
            program,
        ));

        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.postscript_name.clone().into_bytes()),
            "Flags" => if self.symbolic { 4 } else { 32 },
            "FontBBox" => self
                .bbox
                .iter()
                .map(|v| Object::Integer(self.to_pdf_units(f32::from(*v))))
                .collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => self.to_pdf_units(f32::from(self.ascent)),
            "Descent" => self.to_pdf_units(f32::from(self.descent)),
            "CapHeight" => self.to_pdf_units(f32::from(self.cap_height)),
            "StemV" => 80,
            "FontFile2" => program_id,
        });

        let mut widths = Vec::with_capacity(self.used.len() * 2);
        for (gid, glyph) in &self.used {
            widths.push(Object::Integer(i64::from(*gid)));
            widths.push(Object::Array(vec![Object::Integer(
                self.to_pdf_units(f32::from(glyph.advance)),
            )]));
        }

        let cid_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.postscript_name.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode_id =
            doc.add_object(Stream::new(Dictionary::new(), self.to_unicode_cmap().into_bytes()));

        doc.objects.insert(
            self.object_id,
            Object::Dictionary(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type0",
                "BaseFont" => Object::Name(self.postscript_name.clone().into_bytes()),
                "Encoding" => "Identity-H",
                "DescendantFonts" => vec![Object::Reference(cid_font_id)],
                "ToUnicode" => to_unicode_id,
            }),
        );
        Ok(())
    }

    fn to_unicode_cmap(&self) -> String {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );

        let entries: Vec<_> = self.used.iter().collect();
        // bfchar blocks are limited to 100 entries each.
        for chunk in entries.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for (gid, glyph) in chunk {
                let mut units = [0u16; 2];
                let target: String = glyph
                    .ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!("{:04X}", unit))
                    .collect();
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, target);
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str(
            "endcmap\n\
             CMapName currentdict /CMap defineresource pop\n\
             end\n\
             end\n",
        );
        cmap
    }

    /// Number of distinct glyphs drawn so far.
    pub fn used_glyph_count(&self) -> usize {
        self.used.len()
    }
}

/// Character map across every Unicode subtable, plus the Windows Symbol
/// subtable that symbol fonts such as Wingdings use.
fn collect_cmap(face: &Face<'_>) -> HashMap<u32, u16> {
    let mut map = HashMap::new();
    let Some(cmap) = face.tables().cmap else {
        return map;
    };
    for subtable in cmap.subtables {
        let symbol = subtable.platform_id == PlatformId::Windows
            && subtable.encoding_id == SYMBOL_ENCODING;
        if !subtable.is_unicode() && !symbol {
            continue;
        }
        subtable.codepoints(|code| {
            if let Some(gid) = subtable.glyph_index(code) {
                map.entry(code).or_insert(gid.0);
            }
        });
    }
    map
}

fn sanitize_font_name(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .collect()
}

/// The body and symbol fonts of one generation.
#[derive(Debug)]
pub struct FontSet {
    pub body: EmbeddedFont,
    pub symbol: EmbeddedFont,
}

impl FontSet {
    /// Register both fonts. Must run after the template is loaded, since
    /// the fonts reserve object ids in the template's object table.
    pub fn register(
        doc: &mut Document,
        body: Vec<u8>,
        symbol: Vec<u8>,
    ) -> Result<Self, GeneratorError> {
        Ok(Self {
            body: EmbeddedFont::register(doc, "body", "RfBody", body, false)?,
            symbol: EmbeddedFont::register(doc, "symbol", "RfSymbol", symbol, true)?,
        })
    }

    pub fn get(&self, font: FontRef) -> &EmbeddedFont {
        match font {
            FontRef::Body => &self.body,
            FontRef::Symbol => &self.symbol,
        }
    }

    pub fn get_mut(&mut self, font: FontRef) -> &mut EmbeddedFont {
        match font {
            FontRef::Body => &mut self.body,
            FontRef::Symbol => &mut self.symbol,
        }
    }

    pub fn write_objects(&self, doc: &mut Document) -> Result<(), GeneratorError> {
        self.body.write_objects(doc)?;
        self.symbol.write_objects(doc)
    }
}

/// Greedy word wrap to `max_width` using the supplied width measure.
///
/// Words wider than `max_width` are broken at character boundaries.
pub fn word_wrap(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let space_width = measure(" ");
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width: f32 = 0.0;

    for word in text.split_whitespace() {
        let word_width = measure(word);

        if word_width > max_width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            let mut chunk = String::new();
            let mut chunk_width: f32 = 0.0;
            for c in word.chars() {
                let char_width = measure(c.encode_utf8(&mut [0; 4]));
                if chunk_width + char_width > max_width && !chunk.is_empty() {
                    lines.push(std::mem::take(&mut chunk));
                    chunk_width = 0.0;
                }
                chunk.push(c);
                chunk_width += char_width;
            }
            current_line = chunk;
            current_width = chunk_width;
            continue;
        }

        if current_line.is_empty() {
            current_line = word.to_string();
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::replace(&mut current_line, word.to_string()));
            current_width = word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}
