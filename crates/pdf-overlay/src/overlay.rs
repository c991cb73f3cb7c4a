//! Form page selection and placement overlay

use crate::{OverlayError, Result};
use form_core::{DrawPos, Placement, Position};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::fmt::Write as _;
use std::path::Path;

/// The fixed form font: a non-embedded Japanese CID font every
/// CJK-capable viewer ships a substitute for.
pub const FORM_FONT: &str = "HeiseiMin-W3";

/// Resource name of the form font on the page
const FONT_RESOURCE: &str = "Fb1";

/// One page of a form template, ready to receive text overlays.
pub struct FormPage {
    doc: Document,
    page_num: u32,
    page_id: ObjectId,
    font_registered: bool,
}

impl FormPage {
    /// Load a template PDF and select its form page (1-indexed).
    pub fn from_bytes(data: &[u8], page_num: usize) -> Result<Self> {
        let doc = Document::load_mem(data).map_err(|e| OverlayError::Open(e.to_string()))?;
        let pages = doc.get_pages();
        let page_id = *pages
            .get(&(page_num as u32))
            .ok_or(OverlayError::InvalidPage(page_num, pages.len()))?;

        Ok(Self {
            doc,
            page_num: page_num as u32,
            page_id,
            font_registered: false,
        })
    }

    /// Draw every drawable placement onto the page.
    ///
    /// Suppressed placements are skipped; they exist in the sequence
    /// for traceability only.
    pub fn overlay(&mut self, placements: &[Placement]) -> Result<()> {
        let mut ops = String::new();
        for placement in placements {
            let Position::Drawable(pos) = placement.position else {
                continue;
            };
            write_text_block(&mut ops, &placement.text, &pos);
        }

        if ops.is_empty() {
            return Ok(());
        }

        self.ensure_font()?;
        self.append_content(ops.into_bytes())
    }

    /// Serialize a document containing only the form page.
    pub fn extract_to_bytes(&mut self) -> Result<Vec<u8>> {
        self.prune_other_pages();
        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| OverlayError::Save(e.to_string()))?;
        Ok(buffer)
    }

    /// Serialize the single-page result to a file.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.prune_other_pages();
        self.doc
            .save(path)
            .map_err(|e| OverlayError::Save(e.to_string()))?;
        Ok(())
    }

    fn prune_other_pages(&mut self) {
        let others: Vec<u32> = self
            .doc
            .get_pages()
            .keys()
            .copied()
            .filter(|num| *num != self.page_num)
            .collect();
        if !others.is_empty() {
            self.doc.delete_pages(&others);
            // the kept page is now page 1
            self.page_num = 1;
        }
    }

    /// Register the non-embedded CID font in the page resources once.
    fn ensure_font(&mut self) -> Result<()> {
        if self.font_registered {
            return Ok(());
        }

        let descendant_id = self.doc.add_object(cid_descendant_font());
        let mut font = Dictionary::new();
        font.set(b"Type", Object::Name(b"Font".to_vec()));
        font.set(b"Subtype", Object::Name(b"Type0".to_vec()));
        font.set(b"BaseFont", Object::Name(FORM_FONT.as_bytes().to_vec()));
        font.set(b"Encoding", Object::Name(b"UniJIS-UCS2-H".to_vec()));
        font.set(
            b"DescendantFonts",
            Object::Array(vec![Object::Reference(descendant_id)]),
        );
        let font_id = self.doc.add_object(font);

        let page_dict = self.page_dict()?;
        let mut resources = match page_dict.get(b"Resources") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(Object::Dictionary(dict)) => dict.clone(),
                _ => Dictionary::new(),
            },
            _ => Dictionary::new(),
        };

        let mut fonts = match resources.get(b"Font") {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            Ok(Object::Reference(id)) => match self.doc.get_object(*id) {
                Ok(Object::Dictionary(dict)) => dict.clone(),
                _ => Dictionary::new(),
            },
            _ => Dictionary::new(),
        };
        fonts.set(FONT_RESOURCE.as_bytes(), Object::Reference(font_id));
        resources.set(b"Font", Object::Dictionary(fonts));

        let mut new_page_dict = self.page_dict()?.clone();
        new_page_dict.set(b"Resources", Object::Dictionary(resources));
        self.doc.objects.insert(self.page_id, new_page_dict.into());

        self.font_registered = true;
        Ok(())
    }

    /// Append drawing operators as a new content stream on the page.
    fn append_content(&mut self, content: Vec<u8>) -> Result<()> {
        let stream_id = self
            .doc
            .add_object(Stream::new(Dictionary::new(), content));

        let page_dict = self.page_dict()?;
        let contents = match page_dict.get(b"Contents") {
            Ok(Object::Reference(id)) => {
                vec![Object::Reference(*id), Object::Reference(stream_id)]
            }
            Ok(Object::Array(existing)) => {
                let mut all = existing.clone();
                all.push(Object::Reference(stream_id));
                all
            }
            _ => vec![Object::Reference(stream_id)],
        };

        let mut new_page_dict = page_dict.clone();
        new_page_dict.set(b"Contents", Object::Array(contents));
        self.doc.objects.insert(self.page_id, new_page_dict.into());
        Ok(())
    }

    fn page_dict(&self) -> Result<&Dictionary> {
        self.doc
            .get_object(self.page_id)?
            .as_dict()
            .map_err(|_| OverlayError::PageTree("page object is not a dictionary".to_string()))
    }

    /// The page count of the loaded template.
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &Document {
        &self.doc
    }
}

fn cid_descendant_font() -> Dictionary {
    let mut system_info = Dictionary::new();
    system_info.set(b"Registry", Object::string_literal("Adobe"));
    system_info.set(b"Ordering", Object::string_literal("Japan1"));
    system_info.set(b"Supplement", Object::Integer(6));

    let mut descendant = Dictionary::new();
    descendant.set(b"Type", Object::Name(b"Font".to_vec()));
    descendant.set(b"Subtype", Object::Name(b"CIDFontType0".to_vec()));
    descendant.set(b"BaseFont", Object::Name(FORM_FONT.as_bytes().to_vec()));
    descendant.set(b"CIDSystemInfo", Object::Dictionary(system_info));
    descendant.set(b"DW", Object::Integer(1000));
    descendant
}

/// Emit one BT..ET block: font, char spacing, position, UTF-16BE text.
fn write_text_block(ops: &mut String, text: &str, pos: &DrawPos) {
    ops.push_str("BT\n");
    let _ = writeln!(ops, "/{FONT_RESOURCE} {} Tf", pos.font_size);
    let _ = writeln!(ops, "{} Tc", pos.char_space);
    let _ = writeln!(ops, "{} {} Td", pos.x, pos.y);
    ops.push('<');
    for unit in text.encode_utf16() {
        let _ = write!(ops, "{unit:04X}");
    }
    ops.push_str("> Tj\nET\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_operators() {
        let pos = DrawPos {
            x: 62.0,
            y: 747.0,
            font_size: 9.0,
            char_space: 2.0,
        };
        let mut ops = String::new();

        write_text_block(&mut ops, "30", &pos);

        assert!(ops.starts_with("BT\n"));
        assert!(ops.contains("/Fb1 9 Tf"));
        assert!(ops.contains("2 Tc"));
        assert!(ops.contains("62 747 Td"));
        // "30" as UTF-16BE hex
        assert!(ops.contains("<00330030> Tj"));
        assert!(ops.ends_with("ET\n"));
    }

    #[test]
    fn test_text_block_multibyte() {
        let pos = DrawPos {
            x: 0.0,
            y: 0.0,
            font_size: 16.0,
            char_space: 0.0,
        };
        let mut ops = String::new();

        write_text_block(&mut ops, "○", &pos);

        assert!(ops.contains("<25CB> Tj"));
    }
}
