//! Helvetica regular/bold: PDF font dictionaries, advance widths and
//! WinAnsi text encoding.

use lopdf::{dictionary, Dictionary};

use crate::transfer::wrap::TextMeasure;

/// Advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a..m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    333, 333, 584, 584, 584, 611, 975, // :..@
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A..M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N..Z
    333, 278, 333, 584, 556, 333, // [..`
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a..m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n..z
    389, 280, 389, 584, // {..~
];

/// The two faces a transfer order is set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    pub const ALL: [FontFace; 2] = [FontFace::Regular, FontFace::Bold];

    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name on the page. Kept unusual so it cannot collide with the
    /// fonts of a letterhead.
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Regular => "OrdreVirementRegular",
            Self::Bold => "OrdreVirementBold",
        }
    }

    pub fn dictionary(&self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.base_font(),
            "Encoding" => "WinAnsiEncoding",
        }
    }

    fn ascii_width(&self, byte: u8) -> u16 {
        let table = match self {
            Self::Regular => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        };
        table[(byte - 32) as usize]
    }

    /// Advance width of `c` in 1/1000 em.
    pub fn char_width(&self, c: char) -> u16 {
        if c.is_whitespace() {
            return self.ascii_width(b' ');
        }
        if (' '..='~').contains(&c) {
            return self.ascii_width(c as u8);
        }
        if let Some(base) = accent_base(c) {
            return self.ascii_width(base as u8);
        }

        let bold = matches!(self, Self::Bold);
        match c {
            'ì' | 'í' | 'î' | 'ï' => 278,
            'œ' => 944,
            'Œ' | 'Æ' => 1000,
            'æ' => 889,
            'ß' => 611,
            '°' => 400,
            '©' | '®' => 737,
            '«' | '»' | '€' => 556,
            '\u{2018}' | '\u{2019}' => {
                if bold {
                    278
                } else {
                    222
                }
            }
            '\u{2013}' => 556,
            '\u{2014}' => 1000,
            '\u{2026}' => 1000,
            _ => self.ascii_width(b'?'),
        }
    }
}

impl TextMeasure for FontFace {
    fn width(&self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

/// Unaccented ASCII letter sharing the width of an accented Latin-1 letter.
fn accent_base(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'Ç' => 'C',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ñ' => 'N',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ý' => 'Y',
        _ => return None,
    };
    Some(base)
}

/// Encode `text` for a WinAnsiEncoding font. Whitespace becomes a plain
/// space; characters outside the code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            c if c.is_whitespace() && c != '\u{a0}' => b' ',
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '\u{2026}' => 0x85,
            'Œ' => 0x8c,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201c}' => 0x93,
            '\u{201d}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            'œ' => 0x9c,
            _ => b'?',
        })
        .collect()
}
