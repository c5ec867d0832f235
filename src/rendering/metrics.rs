//! Static Helvetica metrics used to position text without loading a font.
//!
//! Widths are the Adobe AFM advance widths in 1/1000 em for ASCII 0x20..=0x7E.
//! Index = (char as usize) - 32. Characters outside that range use
//! `fallback` so measurements stay deterministic for any input.

use serde::{Deserialize, Serialize};

/// Millimetres per PostScript point.
pub const PT_TO_MM: f32 = 0.352_778;

/// Helvetica cap height in em.
pub const CAP_HEIGHT_EM: f32 = 0.718;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

pub struct FontMetricTable {
    widths: [u16; 95],
    fallback: u16,
}

impl FontMetricTable {
    fn advance(&self, c: char) -> u16 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.fallback
        }
    }

    /// Width of `s` in 1/1000 em.
    pub fn measure_units(&self, s: &str) -> u32 {
        s.chars().map(|c| self.advance(c) as u32).sum()
    }
}

static HELVETICA: FontMetricTable = FontMetricTable {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, // sp ! " # $ % & '
        333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
        278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
        334, 260, 334, 584, // { | } ~
    ],
    fallback: 556,
};

static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, // sp ! " # $ % & '
        333, 333, 389, 584, 278, 333, 278, 278, // ( ) * + , - . /
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
        333, 333, 584, 584, 584, 611, 975, // : ; < = > ? @
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
        333, 278, 333, 584, 556, 333, // [ \ ] ^ _ `
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
        389, 280, 389, 584, // { | } ~
    ],
    fallback: 611,
};

pub fn get_metrics(weight: FontWeight) -> &'static FontMetricTable {
    match weight {
        FontWeight::Regular => &HELVETICA,
        FontWeight::Bold => &HELVETICA_BOLD,
    }
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * PT_TO_MM
}

/// Rendered width of `text` in mm at `size_pt`.
pub fn text_width(text: &str, size_pt: f32, weight: FontWeight) -> f32 {
    get_metrics(weight).measure_units(text) as f32 / 1000.0 * pt_to_mm(size_pt)
}

pub fn cap_height(size_pt: f32) -> f32 {
    CAP_HEIGHT_EM * pt_to_mm(size_pt)
}

/// Greedy word wrap to `max_width` mm. A single word wider than the line is
/// kept whole on its own line.
pub fn wrap_text(text: &str, max_width: f32, size_pt: f32, weight: FontWeight) -> Vec<String> {
    let space = text_width(" ", size_pt, weight);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_w = 0.0_f32;

    for word in text.split_whitespace() {
        let w = text_width(word, size_pt, weight);
        if !current.is_empty() && current_w + space + w > max_width {
            lines.push(std::mem::take(&mut current));
            current_w = 0.0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_w += space;
        }
        current.push_str(word);
        current_w += w;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
