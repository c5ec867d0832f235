//! Draw instructions emitted by the layout engine.
//!
//! A page carries two views of the same content: a flat display list of
//! positioned primitives (what the PDF backend paints) and the semantic
//! blocks those primitives were generated from (what the HTML backend
//! renders). Coordinates are mm, origin top-left, y growing down.

use serde::{Deserialize, Serialize};

use crate::classify::Tier;
use crate::rendering::metrics::FontWeight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const WHITE: Color = Color::gray(255);

    pub const fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Script {
    Latin,
    Malayalam,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: Option<Stroke>,
        fill: Option<Color>,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Stroke,
    },
    /// `x` is the left edge of the run; alignment is resolved by the layout engine.
    Text {
        x: f32,
        baseline: f32,
        text: String,
        size: f32,
        weight: FontWeight,
        color: Color,
        script: Script,
    },
}

impl PaintCommand {
    pub fn text(&self) -> Option<&str> {
        match self {
            PaintCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// What a prize section shows below its header band.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrizeBody {
    /// A single large number, optionally with its selling location.
    Featured {
        number: String,
        location: Option<String>,
    },
    Grid {
        columns: usize,
        cells: Vec<String>,
    },
    /// Consolation winners summarized by two-letter series.
    Series { series: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeBlock {
    pub tier: Tier,
    pub label: String,
    pub amount_text: String,
    pub body: PrizeBody,
    /// Set on the second and later fragments of a grid split across pages.
    pub continued: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Header {
        draw_number: String,
        lottery_name: String,
        date: String,
    },
    Prize(PrizeBlock),
    /// 2nd and 3rd prizes sharing one row.
    PairRow { prizes: Vec<PrizeBlock> },
    Footer {
        english: String,
        malayalam: String,
    },
}

/// One laid-out page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based.
    pub number: usize,
    pub commands: Vec<PaintCommand>,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            commands: Vec::new(),
            blocks: Vec::new(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(PaintCommand::text)
    }

    pub fn prize_blocks(&self) -> impl Iterator<Item = &PrizeBlock> {
        self.blocks.iter().flat_map(|b| match b {
            Block::Prize(p) => std::slice::from_ref(p),
            Block::PairRow { prizes } => prizes.as_slice(),
            _ => &[][..],
        })
    }
}
