//! Single-byte encodings used by simple fonts and the glyph names their
//! `/Differences` arrays refer to.

use once_cell::sync::Lazy;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseEncoding {
    #[default]
    Standard,
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"StandardEncoding" => Some(Self::Standard),
            b"WinAnsiEncoding" => Some(Self::WinAnsi),
            b"MacRomanEncoding" => Some(Self::MacRoman),
            _ => None,
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        match self {
            Self::Standard => standard(code),
            Self::WinAnsi => win_ansi(code),
            Self::MacRoman => mac_roman(code),
        }
    }
}

fn printable_ascii(code: u8) -> Option<char> {
    (0x20..=0x7E).contains(&code).then_some(char::from(code))
}

fn win_ansi(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => printable_ascii(code),
        0x80..=0x9F => WIN_ANSI_80_9F[usize::from(code - 0x80)],
        0xA0..=0xFF => Some(char::from(code)),
        _ => None,
    }
}

const WIN_ANSI_80_9F: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

fn standard(code: u8) -> Option<char> {
    match code {
        0x27 => Some('’'),
        0x60 => Some('‘'),
        0x20..=0x7E => printable_ascii(code),
        0xA1 => Some('¡'),
        0xA2 => Some('¢'),
        0xA3 => Some('£'),
        0xA4 => Some('⁄'),
        0xA5 => Some('¥'),
        0xA6 => Some('ƒ'),
        0xA7 => Some('§'),
        0xA8 => Some('¤'),
        0xA9 => Some('\''),
        0xAA => Some('“'),
        0xAB => Some('«'),
        0xAC => Some('‹'),
        0xAD => Some('›'),
        0xAE => Some('ﬁ'),
        0xAF => Some('ﬂ'),
        0xB1 => Some('–'),
        0xB2 => Some('†'),
        0xB3 => Some('‡'),
        0xB4 => Some('·'),
        0xB6 => Some('¶'),
        0xB7 => Some('•'),
        0xB8 => Some('‚'),
        0xB9 => Some('„'),
        0xBA => Some('”'),
        0xBB => Some('»'),
        0xBC => Some('…'),
        0xBD => Some('‰'),
        0xBF => Some('¿'),
        0xC1 => Some('`'),
        0xC2 => Some('´'),
        0xC3 => Some('ˆ'),
        0xC4 => Some('˜'),
        0xC5 => Some('¯'),
        0xC6 => Some('˘'),
        0xC7 => Some('˙'),
        0xC8 => Some('¨'),
        0xCA => Some('˚'),
        0xCB => Some('¸'),
        0xCD => Some('˝'),
        0xCE => Some('˛'),
        0xCF => Some('ˇ'),
        0xD0 => Some('—'),
        0xE1 => Some('Æ'),
        0xE3 => Some('ª'),
        0xE8 => Some('Ł'),
        0xE9 => Some('Ø'),
        0xEA => Some('Œ'),
        0xEB => Some('º'),
        0xF1 => Some('æ'),
        0xF5 => Some('ı'),
        0xF8 => Some('ł'),
        0xF9 => Some('ø'),
        0xFA => Some('œ'),
        0xFB => Some('ß'),
        _ => None,
    }
}

fn mac_roman(code: u8) -> Option<char> {
    match code {
        0x20..=0x7E => printable_ascii(code),
        0x80..=0xFF => Some(MAC_ROMAN_HIGH[usize::from(code - 0x80)]),
        _ => None,
    }
}

const MAC_ROMAN_HIGH: [char; 128] = [
    'Ä', 'Å', 'Ç', 'É', 'Ñ', 'Ö', 'Ü', 'á', 'à', 'â', 'ä', 'ã', 'å', 'ç', 'é', 'è', //
    'ê', 'ë', 'í', 'ì', 'î', 'ï', 'ñ', 'ó', 'ò', 'ô', 'ö', 'õ', 'ú', 'ù', 'û', 'ü', //
    '†', '°', '¢', '£', '§', '•', '¶', 'ß', '®', '©', '™', '´', '¨', '≠', 'Æ', 'Ø', //
    '∞', '±', '≤', '≥', '¥', 'µ', '∂', '∑', '∏', 'π', '∫', 'ª', 'º', 'Ω', 'æ', 'ø', //
    '¿', '¡', '¬', '√', 'ƒ', '≈', '∆', '«', '»', '…', '\u{a0}', 'À', 'Ã', 'Õ', 'Œ', 'œ', //
    '–', '—', '“', '”', '‘', '’', '÷', '◊', 'ÿ', 'Ÿ', '⁄', '€', '‹', '›', 'ﬁ', 'ﬂ', //
    '‡', '·', '‚', '„', '‰', 'Â', 'Ê', 'Á', 'Ë', 'È', 'Í', 'Î', 'Ï', 'Ì', 'Ó', 'Ô', //
    '\u{f8ff}', 'Ò', 'Ú', 'Û', 'Ù', 'ı', 'ˆ', '˜', '¯', '˘', '˙', '˚', '¸', '˝', '˛', 'ˇ',
];

const LATIN1_UPPER_NAMES: [&str; 64] = [
    "Agrave", "Aacute", "Acircumflex", "Atilde", "Adieresis", "Aring", "AE", "Ccedilla",
    "Egrave", "Eacute", "Ecircumflex", "Edieresis", "Igrave", "Iacute", "Icircumflex",
    "Idieresis", "Eth", "Ntilde", "Ograve", "Oacute", "Ocircumflex", "Otilde", "Odieresis",
    "multiply", "Oslash", "Ugrave", "Uacute", "Ucircumflex", "Udieresis", "Yacute", "Thorn",
    "germandbls", "agrave", "aacute", "acircumflex", "atilde", "adieresis", "aring", "ae",
    "ccedilla", "egrave", "eacute", "ecircumflex", "edieresis", "igrave", "iacute",
    "icircumflex", "idieresis", "eth", "ntilde", "ograve", "oacute", "ocircumflex", "otilde",
    "odieresis", "divide", "oslash", "ugrave", "uacute", "ucircumflex", "udieresis", "yacute",
    "thorn", "ydieresis",
];

const DIGIT_NAMES: [&str; 10] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

static GLYPH_NAMES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, char> = [
        ("space", ' '),
        ("exclam", '!'),
        ("quotedbl", '"'),
        ("numbersign", '#'),
        ("dollar", '$'),
        ("percent", '%'),
        ("ampersand", '&'),
        ("quotesingle", '\''),
        ("quoteright", '’'),
        ("parenleft", '('),
        ("parenright", ')'),
        ("asterisk", '*'),
        ("plus", '+'),
        ("comma", ','),
        ("hyphen", '-'),
        ("minus", '−'),
        ("period", '.'),
        ("slash", '/'),
        ("colon", ':'),
        ("semicolon", ';'),
        ("less", '<'),
        ("equal", '='),
        ("greater", '>'),
        ("question", '?'),
        ("at", '@'),
        ("bracketleft", '['),
        ("backslash", '\\'),
        ("bracketright", ']'),
        ("asciicircum", '^'),
        ("underscore", '_'),
        ("grave", '`'),
        ("quoteleft", '‘'),
        ("braceleft", '{'),
        ("bar", '|'),
        ("braceright", '}'),
        ("asciitilde", '~'),
        ("bullet", '•'),
        ("endash", '–'),
        ("emdash", '—'),
        ("quotedblleft", '“'),
        ("quotedblright", '”'),
        ("quotesinglbase", '‚'),
        ("quotedblbase", '„'),
        ("ellipsis", '…'),
        ("dagger", '†'),
        ("daggerdbl", '‡'),
        ("perthousand", '‰'),
        ("guilsinglleft", '‹'),
        ("guilsinglright", '›'),
        ("guillemotleft", '«'),
        ("guillemotright", '»'),
        ("fi", 'ﬁ'),
        ("fl", 'ﬂ'),
        ("florin", 'ƒ'),
        ("trademark", '™'),
        ("copyright", '©'),
        ("registered", '®'),
        ("degree", '°'),
        ("section", '§'),
        ("paragraph", '¶'),
        ("periodcentered", '·'),
        ("cent", '¢'),
        ("sterling", '£'),
        ("yen", '¥'),
        ("Euro", '€'),
        ("exclamdown", '¡'),
        ("questiondown", '¿'),
        ("nbspace", '\u{a0}'),
        ("sfthyphen", '\u{ad}'),
        ("plusminus", '±'),
        ("mu", 'µ'),
        ("dotlessi", 'ı'),
        ("OE", 'Œ'),
        ("oe", 'œ'),
        ("Lslash", 'Ł'),
        ("lslash", 'ł'),
        ("Scaron", 'Š'),
        ("scaron", 'š'),
        ("Zcaron", 'Ž'),
        ("zcaron", 'ž'),
        ("Ydieresis", 'Ÿ'),
        ("ordfeminine", 'ª'),
        ("ordmasculine", 'º'),
        ("onehalf", '½'),
        ("onequarter", '¼'),
        ("threequarters", '¾'),
        ("logicalnot", '¬'),
        ("currency", '¤'),
        ("brokenbar", '¦'),
        ("dieresis", '¨'),
        ("macron", '¯'),
        ("acute", '´'),
        ("cedilla", '¸'),
        ("circumflex", 'ˆ'),
        ("tilde", '˜'),
    ]
    .into_iter()
    .collect();
    for (i, name) in LATIN1_UPPER_NAMES.iter().enumerate() {
        if let Some(c) = char::from_u32(0xC0 + i as u32) {
            map.insert(*name, c);
        }
    }
    for (i, name) in DIGIT_NAMES.iter().enumerate() {
        if let Some(c) = char::from_digit(i as u32, 10) {
            map.insert(*name, c);
        }
    }
    map
});

/// Maps an Adobe glyph name to its character.
///
/// Handles the named glyphs common in Latin text, single-letter names and the
/// `uniXXXX` / `uXXXX[XX]` conventions.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    if let Some(c) = GLYPH_NAMES.get(name) {
        return Some(*c);
    }
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c);
        }
    }
    let hex = name
        .strip_prefix("uni")
        .filter(|h| h.len() == 4)
        .or_else(|| name.strip_prefix('u').filter(|h| (4..=6).contains(&h.len())))?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
