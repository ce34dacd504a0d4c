//! A reader for `/ToUnicode` CMap streams.
//!
//! Only the `bfchar` and `bfrange` sections matter for text extraction; every
//! other construct in the CMap program (the `CIDInit` resource lookup, the
//! `CIDSystemInfo` dictionary, `codespacerange`) is tokenized and skipped.

use log::warn;
use std::collections::HashMap;

/// Ranges larger than this are assumed to be corrupt and are truncated.
const MAX_RANGE_LEN: u32 = 0x1_0000;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Hex(Vec<u8>),
    ArrayStart,
    ArrayEnd,
    Word(String),
}

/// Character code to Unicode text mapping built from a CMap program.
#[derive(Debug, Default, Clone)]
pub struct ToUnicodeMap {
    map: HashMap<u32, String>,
}

impl ToUnicodeMap {
    pub fn parse(data: &[u8]) -> Self {
        let tokens = tokenize(data);
        let mut map = HashMap::new();
        let mut i = 0;
        while i < tokens.len() {
            match &tokens[i] {
                Token::Word(w) if w == "beginbfchar" => {
                    i = parse_bfchar(&tokens, i + 1, &mut map);
                }
                Token::Word(w) if w == "beginbfrange" => {
                    i = parse_bfrange(&tokens, i + 1, &mut map);
                }
                _ => i += 1,
            }
        }
        Self { map }
    }

    pub fn get(&self, code: u32) -> Option<&str> {
        self.map.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn parse_bfchar(tokens: &[Token], mut i: usize, map: &mut HashMap<u32, String>) -> usize {
    while i + 1 < tokens.len() {
        match (&tokens[i], &tokens[i + 1]) {
            (Token::Hex(src), Token::Hex(dst)) => {
                map.insert(code_value(src), utf16_be(dst));
                i += 2;
            }
            (Token::Word(w), _) if w == "endbfchar" => return i + 1,
            _ => {
                warn!("Unexpected token in bfchar section: {:?}", tokens[i]);
                i += 1;
            }
        }
    }
    tokens.len()
}

fn parse_bfrange(tokens: &[Token], mut i: usize, map: &mut HashMap<u32, String>) -> usize {
    while i < tokens.len() {
        if let Token::Word(w) = &tokens[i] {
            if w == "endbfrange" {
                return i + 1;
            }
        }
        let (Some(Token::Hex(lo)), Some(Token::Hex(hi))) = (tokens.get(i), tokens.get(i + 1))
        else {
            warn!("Unexpected token in bfrange section: {:?}", tokens[i]);
            i += 1;
            continue;
        };
        let (lo, hi) = (code_value(lo), code_value(hi));
        let span = hi.saturating_sub(lo).min(MAX_RANGE_LEN - 1);
        match tokens.get(i + 2) {
            Some(Token::Hex(dst)) => {
                let units = utf16_units(dst);
                for offset in 0..=span {
                    map.insert(lo + offset, offset_units(&units, offset));
                }
                i += 3;
            }
            Some(Token::ArrayStart) => {
                let mut j = i + 3;
                let mut offset = 0;
                while let Some(Token::Hex(dst)) = tokens.get(j) {
                    if offset <= span {
                        map.insert(lo + offset, utf16_be(dst));
                    }
                    offset += 1;
                    j += 1;
                }
                // Skip the closing bracket.
                i = j + 1;
            }
            _ => i += 2,
        }
    }
    tokens.len()
}

fn code_value(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => u16::from_be_bytes([*hi, *lo]),
            [single] => u16::from(*single),
            _ => 0,
        })
        .collect()
}

fn utf16_be(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}

/// Destination of a range entry: the base string with its last code unit incremented.
fn offset_units(units: &[u16], offset: u32) -> String {
    let mut units = units.to_vec();
    if let Some(last) = units.last_mut() {
        *last = last.wrapping_add(offset as u16);
    }
    String::from_utf16_lossy(&units)
}

fn tokenize(data: &[u8]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let b = data[i];
        match b {
            b'%' => {
                while i < data.len() && data[i] != b'\n' && data[i] != b'\r' {
                    i += 1;
                }
            }
            b'<' if data.get(i + 1) == Some(&b'<') => {
                tokens.push(Token::Word("<<".into()));
                i += 2;
            }
            b'>' if data.get(i + 1) == Some(&b'>') => {
                tokens.push(Token::Word(">>".into()));
                i += 2;
            }
            b'<' => {
                let start = i + 1;
                let end = data[start..]
                    .iter()
                    .position(|&c| c == b'>')
                    .map_or(data.len(), |p| start + p);
                tokens.push(Token::Hex(decode_hex(&data[start..end])));
                i = end + 1;
            }
            b'[' => {
                tokens.push(Token::ArrayStart);
                i += 1;
            }
            b']' => {
                tokens.push(Token::ArrayEnd);
                i += 1;
            }
            b'(' => {
                // Literal strings only appear in the CIDSystemInfo header.
                let mut depth = 0;
                while i < data.len() {
                    match data[i] {
                        b'\\' => i += 1,
                        b'(' => depth += 1,
                        b')' => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        _ => {}
                    }
                    i += 1;
                }
                i += 1;
            }
            c if c.is_ascii_whitespace() => i += 1,
            _ => {
                let start = i;
                while i < data.len() && !is_delimiter(data[i]) {
                    i += 1;
                }
                if i == start {
                    i += 1;
                    continue;
                }
                tokens.push(Token::Word(
                    String::from_utf8_lossy(&data[start..i]).into_owned(),
                ));
            }
        }
    }
    tokens
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'<' | b'>' | b'[' | b']' | b'(' | b')' | b'%')
}

fn decode_hex(digits: &[u8]) -> Vec<u8> {
    let nibbles: Vec<u8> = digits
        .iter()
        .filter_map(|&c| (c as char).to_digit(16).map(|d| d as u8))
        .collect();
    nibbles
        .chunks(2)
        .map(|pair| match pair {
            [hi, lo] => (hi << 4) | lo,
            [hi] => hi << 4,
            _ => 0,
        })
        .collect()
}
