//! PDF text strings (outline titles): PDFDocEncoding-compatible bytes when the
//! text allows it, UTF-16BE with a byte order mark otherwise.

use lopdf::{Object, StringFormat};

const UTF16_BOM: [u8; 2] = [0xFE, 0xFF];

/// Characters that mean the same in PDFDocEncoding and Latin-1.
fn is_pdf_doc_compatible(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A1}'..='\u{FF}') && c != '\u{AD}'
}

pub fn encode(text: &str) -> Object {
    if text.chars().all(is_pdf_doc_compatible) {
        let bytes = text.chars().map(|c| c as u8).collect();
        Object::String(bytes, StringFormat::Literal)
    } else {
        let mut bytes = UTF16_BOM.to_vec();
        bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

pub fn decode(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&UTF16_BOM) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
