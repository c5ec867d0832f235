//! PDF backend: paints the display list with printpdf's builtin Helvetica.
//!
//! Layout space has its origin top-left with y growing down; PDF space grows
//! up from the bottom edge, so every y is flipped against the page height.
//!
//! Output is reproducible: the info dates are pinned to the epoch and the
//! trailer `/ID` pair is derived from the layout fingerprint.

use std::path::Path;

use printpdf::{
    BuiltinFont, Color as PdfColor, FontId, Line, LinePoint, Mm, OffsetDateTime, Op, PaintMode,
    ParsedFont, PdfDocument, PdfPage, PdfSaveOptions, Point, Polygon, PolygonRing, Pt, Rgb,
    TextItem, WindingOrder,
};

use crate::rendering::layout::LaidOutDocument;
use crate::rendering::metrics::{FontWeight, PT_TO_MM};
use crate::rendering::paint::{Color, PaintCommand, Script, Stroke};
use crate::{BackendKind, Error, RenderBackend, RenderedDocument, Result};

/// Resource name of the embedded Malayalam face. Fixed so repeated renders
/// produce the same font dictionary.
const MALAYALAM_FONT_ID: &str = "KLMalayalam";

/// Length of each string in the trailer `/ID` array written by printpdf.
const TRAILER_ID_LEN: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct PdfBackend {
    /// Raw face bytes; parsed per render since `ParsedFont` is not `Send`.
    malayalam_font: Option<Vec<u8>>,
}

fn parse_font(font_bytes: &[u8]) -> Option<ParsedFont> {
    let mut warnings = Vec::new();
    let font = ParsedFont::from_bytes(font_bytes, 0, &mut warnings);
    if !warnings.is_empty() {
        log::debug!("font parser reported {} warnings", warnings.len());
    }
    font
}

impl PdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed a TrueType/OpenType face for the Malayalam footer. Without one
    /// the Malayalam runs are left out and reported in the document notes.
    pub fn with_malayalam_font(mut self, font_bytes: &[u8]) -> Result<Self> {
        if parse_font(font_bytes).is_none() {
            return Err(Error::ConfigError(
                "Malayalam font is not a readable TrueType/OpenType face".into(),
            ));
        }
        self.malayalam_font = Some(font_bytes.to_vec());
        Ok(self)
    }

    pub fn with_malayalam_font_file(self, path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        log::debug!("loaded Malayalam font {} ({} bytes)", path.display(), bytes.len());
        self.with_malayalam_font(&bytes)
    }

    pub fn embeds_malayalam(&self) -> bool {
        self.malayalam_font.is_some()
    }
}

/// Overwrite the two literal strings of the trailer `/ID` array with `id`.
///
/// printpdf fills them with random letters; both are replaced in place with
/// a same-length value so the cross-reference offsets stay valid.
fn pin_trailer_id(bytes: &mut [u8], id: &str) -> Result<()> {
    let id = id.as_bytes();
    if id.len() != TRAILER_ID_LEN {
        return Err(Error::RenderError(format!(
            "trailer id must be {} bytes, got {}",
            TRAILER_ID_LEN,
            id.len()
        )));
    }
    let start = bytes
        .windows(3)
        .rposition(|w| w == b"/ID")
        .ok_or_else(|| Error::RenderError("PDF trailer has no /ID entry".into()))?;
    let mut pos = start + 3;
    for _ in 0..2 {
        let open = bytes[pos..]
            .iter()
            .position(|&b| b == b'(')
            .map(|i| pos + i + 1)
            .ok_or_else(|| Error::RenderError("PDF trailer /ID is not a string pair".into()))?;
        let close = open + TRAILER_ID_LEN;
        if bytes.get(close) != Some(&b')') {
            return Err(Error::RenderError(
                "PDF trailer /ID strings have an unexpected length".into(),
            ));
        }
        bytes[open..close].copy_from_slice(id);
        pos = close + 1;
    }
    Ok(())
}

fn rgb(c: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(
        c.r as f32 / 255.0,
        c.g as f32 / 255.0,
        c.b as f32 / 255.0,
        None,
    ))
}

fn builtin(weight: FontWeight) -> BuiltinFont {
    match weight {
        FontWeight::Regular => BuiltinFont::Helvetica,
        FontWeight::Bold => BuiltinFont::HelveticaBold,
    }
}

/// Builtin fonts only cover WinAnsi; anything outside printable ASCII becomes `?`.
fn winansi_safe(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

/// Collects printpdf operations for one page.
struct PageOps {
    height: f32,
    malayalam: Option<FontId>,
    ops: Vec<Op>,
    skipped_runs: usize,
}

impl PageOps {
    fn new(height: f32, malayalam: Option<FontId>) -> Self {
        Self {
            height,
            malayalam,
            ops: Vec::new(),
            skipped_runs: 0,
        }
    }

    fn point(&self, x: f32, y: f32) -> LinePoint {
        LinePoint {
            p: Point::new(Mm(x), Mm(self.height - y)),
            bezier: false,
        }
    }

    fn set_stroke(&mut self, stroke: &Stroke) {
        self.ops.push(Op::SetOutlineColor {
            col: rgb(stroke.color),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(stroke.width / PT_TO_MM),
        });
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, stroke: Option<&Stroke>, fill: Option<Color>) {
        let ring = PolygonRing {
            points: vec![
                self.point(x, y),
                self.point(x + w, y),
                self.point(x + w, y + h),
                self.point(x, y + h),
            ],
        };
        if let Some(fill) = fill {
            self.ops.push(Op::SetFillColor { col: rgb(fill) });
            self.ops.push(Op::DrawPolygon {
                polygon: Polygon {
                    rings: vec![ring.clone()],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                },
            });
        }
        if let Some(stroke) = stroke {
            self.set_stroke(stroke);
            self.ops.push(Op::DrawPolygon {
                polygon: Polygon {
                    rings: vec![ring],
                    mode: PaintMode::Stroke,
                    winding_order: WindingOrder::NonZero,
                },
            });
        }
    }

    fn paint(&mut self, cmd: &PaintCommand) {
        match cmd {
            PaintCommand::Rect {
                x,
                y,
                width,
                height,
                stroke,
                fill,
            } => self.rect(*x, *y, *width, *height, stroke.as_ref(), *fill),
            PaintCommand::Line {
                x1,
                y1,
                x2,
                y2,
                stroke,
            } => {
                self.set_stroke(stroke);
                let points = vec![self.point(*x1, *y1), self.point(*x2, *y2)];
                self.ops.push(Op::DrawLine {
                    line: Line {
                        points,
                        is_closed: false,
                    },
                });
            }
            PaintCommand::Text {
                x,
                baseline,
                text,
                size,
                weight,
                color,
                script,
            } => {
                if *script == Script::Malayalam {
                    match self.malayalam.clone() {
                        Some(font) => {
                            self.ops.push(Op::StartTextSection);
                            self.ops.push(Op::SetFillColor { col: rgb(*color) });
                            self.ops.push(Op::SetFontSize {
                                size: Pt(*size),
                                font: font.clone(),
                            });
                            self.ops.push(Op::SetTextCursor {
                                pos: Point::new(Mm(*x), Mm(self.height - baseline)),
                            });
                            self.ops.push(Op::WriteText {
                                items: vec![TextItem::Text(text.clone())],
                                font,
                            });
                            self.ops.push(Op::EndTextSection);
                        }
                        None => self.skipped_runs += 1,
                    }
                    return;
                }
                let font = builtin(*weight);
                self.ops.push(Op::StartTextSection);
                self.ops.push(Op::SetFillColor { col: rgb(*color) });
                self.ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(*size),
                    font,
                });
                self.ops.push(Op::SetTextCursor {
                    pos: Point::new(Mm(*x), Mm(self.height - baseline)),
                });
                self.ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(winansi_safe(text))],
                    font,
                });
                self.ops.push(Op::EndTextSection);
            }
        }
    }
}

impl RenderBackend for PdfBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Pdf
    }

    fn render(&self, doc: &LaidOutDocument) -> Result<RenderedDocument> {
        let g = doc.config.page;
        let title = format!("{} {}", doc.lottery_name, doc.date_text);
        let mut pdf = PdfDocument::new(&title);
        let epoch =
            OffsetDateTime::from_unix_timestamp(0).map_err(|e| Error::RenderError(e.into()))?;
        pdf.metadata.info.creation_date = epoch;
        pdf.metadata.info.modification_date = epoch;
        pdf.metadata.info.metadata_date = epoch;
        pdf.metadata.xmp = None;

        let malayalam = match &self.malayalam_font {
            Some(font_bytes) => {
                let font = parse_font(font_bytes)
                    .ok_or_else(|| Error::RenderError("Malayalam font failed to parse".into()))?;
                let id = FontId(MALAYALAM_FONT_ID.to_string());
                pdf.resources.fonts.map.insert(id.clone(), font);
                Some(id)
            }
            None => None,
        };

        let mut skipped = 0;
        let mut pages = Vec::with_capacity(doc.pages.len());
        for page in &doc.pages {
            let mut ops = PageOps::new(g.height, malayalam.clone());
            for cmd in &page.commands {
                ops.paint(cmd);
            }
            skipped += ops.skipped_runs;
            pages.push(PdfPage::new(Mm(g.width), Mm(g.height), ops.ops));
        }
        pdf.with_pages(pages);

        let mut warnings = Vec::new();
        let mut bytes = pdf.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            log::debug!("printpdf reported {} warnings for {}", warnings.len(), title);
        }
        pin_trailer_id(&mut bytes, &doc.fingerprint()[..TRAILER_ID_LEN])?;

        let mut notes = Vec::new();
        if skipped > 0 {
            log::warn!(
                "{} Malayalam text runs left out of the PDF; no Malayalam font configured",
                skipped
            );
            notes.push(format!(
                "{} Malayalam text runs omitted: configure a Malayalam font to include them",
                skipped
            ));
        }

        Ok(RenderedDocument {
            kind: BackendKind::Pdf,
            file_name: doc.file_name(BackendKind::Pdf.extension()),
            media_type: BackendKind::Pdf.media_type(),
            bytes,
            page_count: doc.page_count(),
            warnings: doc.warnings.clone(),
            notes,
        })
    }
}
