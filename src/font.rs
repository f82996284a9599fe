use crate::units::Pt;
use serde::{Deserialize, Serialize};

/// The font families available to documents. These map onto the PDF standard
/// fonts, which every viewer provides, so nothing is embedded in the output.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Helvetica,
    Courier,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

/// A font selection: family, style, and size. This is the label passed to the
/// text measurer and recorded with every span of text.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct FontSpec {
    pub family: FontFamily,
    pub style: FontStyle,
    pub size: Pt,
}

impl FontSpec {
    pub fn new(family: FontFamily, style: FontStyle, size: Pt) -> FontSpec {
        FontSpec {
            family,
            style,
            size,
        }
    }

    /// Regular Helvetica at the given size
    pub fn regular(size: f32) -> FontSpec {
        FontSpec::new(FontFamily::Helvetica, FontStyle::Regular, Pt(size))
    }

    /// Bold Helvetica at the given size
    pub fn bold(size: f32) -> FontSpec {
        FontSpec::new(FontFamily::Helvetica, FontStyle::Bold, Pt(size))
    }

    /// Italic Helvetica at the given size
    pub fn italic(size: f32) -> FontSpec {
        FontSpec::new(FontFamily::Helvetica, FontStyle::Italic, Pt(size))
    }

    pub fn standard_font(&self) -> StandardFont {
        StandardFont::from_family(self.family, self.style)
    }
}

/// One of the PDF standard-14 fonts we emit
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    pub fn from_family(family: FontFamily, style: FontStyle) -> StandardFont {
        match (family, style) {
            (FontFamily::Helvetica, FontStyle::Regular) => StandardFont::Helvetica,
            (FontFamily::Helvetica, FontStyle::Bold) => StandardFont::HelveticaBold,
            (FontFamily::Helvetica, FontStyle::Italic) => StandardFont::HelveticaOblique,
            (FontFamily::Helvetica, FontStyle::BoldItalic) => StandardFont::HelveticaBoldOblique,
            (FontFamily::Courier, FontStyle::Regular) => StandardFont::Courier,
            (FontFamily::Courier, FontStyle::Bold) => StandardFont::CourierBold,
            (FontFamily::Courier, FontStyle::Italic) => StandardFont::CourierOblique,
            (FontFamily::Courier, FontStyle::BoldItalic) => StandardFont::CourierBoldOblique,
        }
    }

    /// The PostScript name written as the font's `/BaseFont`
    pub fn base_font(&self) -> &'static [u8] {
        match self {
            StandardFont::Helvetica => b"Helvetica",
            StandardFont::HelveticaBold => b"Helvetica-Bold",
            StandardFont::HelveticaOblique => b"Helvetica-Oblique",
            StandardFont::HelveticaBoldOblique => b"Helvetica-BoldOblique",
            StandardFont::Courier => b"Courier",
            StandardFont::CourierBold => b"Courier-Bold",
            StandardFont::CourierOblique => b"Courier-Oblique",
            StandardFont::CourierBoldOblique => b"Courier-BoldOblique",
        }
    }

    /// Index used to name the font in page resource dictionaries (`/F{index}`)
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Advance width of a WinAnsi-encoded byte, in 1/1000 of an em
    pub fn advance(&self, byte: u8) -> u16 {
        match self {
            StandardFont::Courier
            | StandardFont::CourierBold
            | StandardFont::CourierOblique
            | StandardFont::CourierBoldOblique => 600,
            StandardFont::Helvetica | StandardFont::HelveticaOblique => {
                helvetica_advance(byte, &HELVETICA_ASCII)
            }
            StandardFont::HelveticaBold | StandardFont::HelveticaBoldOblique => {
                helvetica_advance(byte, &HELVETICA_BOLD_ASCII)
            }
        }
    }
}

fn helvetica_advance(byte: u8, ascii: &[u16; 95]) -> u16 {
    match byte {
        0x20..=0x7E => ascii[(byte - 0x20) as usize],
        0xA0 => 278,
        0x91 | 0x92 => 222,
        0x93 | 0x94 => 333,
        0x95 => 350,
        0x96 => 556,
        0x97 | 0x89 => 1000,
        0x85 => 1000,
        0x80 => 556,
        0xC0..=0xC5 | 0xC8..=0xCB | 0xD0..=0xD6 | 0xD8..=0xDD => 722,
        0xCC..=0xCF | 0xEC..=0xEF => 278,
        _ => 556,
    }
}

// AFM advance widths for WinAnsi 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Convert a string into WinAnsiEncoding bytes, the encoding used by the
/// standard fonts. Characters that have no WinAnsi code point are replaced
/// with `?`; control characters (including tabs and newlines) become spaces.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(ch: char) -> u8 {
    match ch {
        '\u{20}'..='\u{7E}' => ch as u8,
        '\u{A0}'..='\u{FF}' => ch as u32 as u8,
        c if c.is_control() => b' ',
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => b'?',
    }
}
