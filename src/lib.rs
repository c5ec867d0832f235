//! klbulletin: Kerala lottery result bulletins
//!
//! Turns a result from the Kerala lottery Results API into a printable
//! bulletin that follows the official result sheet: bordered A4 page,
//! watermark, tiered prize sections and a bilingual legal footer.
//!
//! # Features
//!
//! - **pdf** (default): vector PDF output through `printpdf`
//! - **html** (default): print-styled HTML through `minijinja`
//! - **api** (default): blocking client for the Results API
//!
//! # Example
//!
//! ```no_run
//! use klbulletin::{normalize::normalize_str, render_document, LayoutConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("result.json")?;
//! let result = normalize_str(&json)?;
//! let backend = klbulletin::default_backend()?;
//! let doc = render_document(&result, &LayoutConfig::default(), backend.as_ref())?;
//! println!("{} ({} pages)", doc.file_name, doc.page_count);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod error;
pub use error::{Error, Result};

pub mod classify;
pub mod format;
pub mod model;
pub mod normalize;

pub mod rendering;

// Backend acquisition with an explicit attempt budget
pub mod bootstrap;

// Results API client
#[cfg(feature = "api")]
pub mod api;

// Serialized render worker for async callers
pub mod async_api;

pub mod output;

pub use async_api::Printer;
pub use classify::{classify, ClassifiedPrizes, ColumnTable, ColumnThreshold, Tier, TierLayoutSpec};
pub use model::{Amount, DrawDate, LotteryResult, Prize, Ticket};
pub use rendering::layout::{LaidOutDocument, LayoutEngine, LayoutOverflowWarning};

/// What to do with a section that does not fit on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Drop the section and every section after it, recording a warning.
    SinglePage,
    /// Continue on a new page; grids taller than a page are split by rows.
    #[default]
    Paginate,
}

/// How the consolation prize is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsolationStyle {
    /// Every ticket in a fixed-width grid.
    #[default]
    Grid,
    /// One line listing the distinct two-letter series.
    Series,
}

/// Page size, margin and outer border, in mm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub border_width: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 7.0,
            border_width: 0.8,
        }
    }
}

impl PageGeometry {
    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

/// Header band: draw number, lottery name and date over a rule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderStyle {
    pub height: f32,
    pub title_size: f32,
    pub side_size: f32,
    /// Baseline offset from the top of the band.
    pub baseline: f32,
    pub rule_width: f32,
    /// Space between the rule and the first section.
    pub gap: f32,
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self {
            height: 10.0,
            title_size: 14.0,
            side_size: 11.0,
            baseline: 6.5,
            rule_width: 0.8,
            gap: 2.0,
        }
    }
}

/// Shaded header sub-band of every prize section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionStyle {
    pub header_height: f32,
    pub label_size: f32,
    pub baseline: f32,
    pub fill_gray: u8,
    /// Horizontal inset of the label and amount.
    pub text_inset: f32,
    pub border_width: f32,
    /// Vertical gap after each section.
    pub gap: f32,
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            header_height: 5.0,
            label_size: 9.0,
            baseline: 3.5,
            fill_gray: 248,
            text_inset: 2.0,
            border_width: 0.3,
            gap: 1.0,
        }
    }
}

/// Single-number tiers (1st, 2nd, 3rd).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturedStyle {
    pub first_size: f32,
    pub first_height: f32,
    pub first_baseline: f32,
    pub first_location_baseline: f32,
    pub second_size: f32,
    pub second_height: f32,
    pub second_baseline: f32,
    pub second_location_baseline: f32,
    pub location_size: f32,
    /// Padding around the bordered first-prize number.
    pub box_padding: f32,
    /// Gap between the 2nd and 3rd prize columns.
    pub pair_gap: f32,
}

impl Default for FeaturedStyle {
    fn default() -> Self {
        Self {
            first_size: 20.0,
            first_height: 14.0,
            first_baseline: 7.5,
            first_location_baseline: 12.0,
            second_size: 16.0,
            second_height: 12.0,
            second_baseline: 6.5,
            second_location_baseline: 10.5,
            location_size: 8.0,
            box_padding: 1.5,
            pair_gap: 2.0,
        }
    }
}

/// Ticket grids (consolation and lower tiers).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridStyle {
    pub consolation_columns: usize,
    pub consolation_cell_height: f32,
    pub consolation_font_size: f32,
    pub lower_cell_height: f32,
    pub lower_font_size: f32,
    /// Horizontal inset of the grid inside the section.
    pub inset: f32,
    /// Vertical padding above and below the grid.
    pub padding: f32,
    pub line_width: f32,
    /// Height of the one-line series summary.
    pub series_height: f32,
}

impl Default for GridStyle {
    fn default() -> Self {
        Self {
            consolation_columns: 10,
            consolation_cell_height: 4.0,
            consolation_font_size: 8.0,
            lower_cell_height: 3.5,
            lower_font_size: 7.0,
            inset: 2.0,
            padding: 1.0,
            line_width: 0.1,
            series_height: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkStyle {
    pub enabled: bool,
    pub text: String,
    pub size: f32,
    pub gray: u8,
    /// Baseline offset below the vertical page centre.
    pub offset: f32,
}

impl Default for WatermarkStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            text: "LOTTO".to_string(),
            size: 80.0,
            gray: 240,
            offset: 20.0,
        }
    }
}

pub const ENGLISH_FOOTER: &str = "The prize winners are advised to verify the winning numbers with the results published in the Kerala Government Gazette and surrender the winning tickets within 90 days.";

pub const MALAYALAM_FOOTER: &str = "ഈ ഫലങ്ങൾ ഔദ്യോഗികമായി പ്രസിദ്ധീകരിച്ചതിനനുസരിച്ച് എഴുതിയതാണ്. പവിത്രമായ സംഖ്യകളുടെ സാധുതയും ശ്രദ്ധിക്കുക. സാക്ഷികളുടെ സാന്നിധ്യത്തിലാണ് സമ്മാനം നൽകുന്നത്. നിയമാനുസൃതമായ രേഖകളുണ്ടായിരിക്കണം. ഒറിജിനൽ ടിക്കറ്റ് 30 ദിവസത്തിനുള്ളിൽ ഹാജരാക്കണം.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterStyle {
    pub english: String,
    pub malayalam: String,
    pub english_size: f32,
    pub malayalam_size: f32,
    pub line_height: f32,
    /// Height kept free above the bottom margin on every page.
    pub reserve: f32,
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self {
            english: ENGLISH_FOOTER.to_string(),
            malayalam: MALAYALAM_FOOTER.to_string(),
            english_size: 7.0,
            malayalam_size: 6.0,
            line_height: 3.0,
            reserve: 18.0,
        }
    }
}

/// Text shown when the result omits a header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub lottery_name: String,
    pub draw_number: String,
    pub date: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            lottery_name: "KERALA LOTTERY".to_string(),
            draw_number: "N/A".to_string(),
            date: "N/A".to_string(),
        }
    }
}

/// Every numeric constant of the bulletin layout.
///
/// Deserializes from partial JSON; missing fields keep their defaults.
///
/// ```
/// let cfg: klbulletin::LayoutConfig =
///     serde_json::from_str(r#"{"page": {"margin": 10.0}, "overflow": "single_page"}"#).unwrap();
/// assert_eq!(cfg.page.margin, 10.0);
/// assert_eq!(cfg.page.width, 210.0);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LayoutConfig {
    pub page: PageGeometry,
    pub overflow: OverflowPolicy,
    pub consolation_style: ConsolationStyle,
    pub columns: ColumnTable,
    pub header: HeaderStyle,
    pub section: SectionStyle,
    pub featured: FeaturedStyle,
    pub grid: GridStyle,
    pub watermark: WatermarkStyle,
    pub footer: FooterStyle,
    pub placeholders: Placeholders,
}

impl LayoutConfig {
    /// Reject configurations the layout engine cannot place content with.
    pub fn validate(&self) -> Result<()> {
        fn positive(name: &str, v: f32) -> Result<()> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::ConfigError(format!("{} must be positive, got {}", name, v)))
            }
        }

        positive("page.width", self.page.width)?;
        positive("page.height", self.page.height)?;
        if self.page.margin.is_nan() || self.page.margin < 0.0 {
            return Err(Error::ConfigError("page.margin must not be negative".into()));
        }
        if self.page.content_width() <= 0.0 {
            return Err(Error::ConfigError("page.margin leaves no content width".into()));
        }
        positive("header.height", self.header.height)?;
        positive("header.title_size", self.header.title_size)?;
        positive("header.side_size", self.header.side_size)?;
        positive("section.header_height", self.section.header_height)?;
        positive("section.label_size", self.section.label_size)?;
        positive("featured.first_size", self.featured.first_size)?;
        positive("featured.first_height", self.featured.first_height)?;
        positive("featured.second_size", self.featured.second_size)?;
        positive("featured.second_height", self.featured.second_height)?;
        positive("featured.location_size", self.featured.location_size)?;
        positive("grid.consolation_cell_height", self.grid.consolation_cell_height)?;
        positive("grid.consolation_font_size", self.grid.consolation_font_size)?;
        positive("grid.lower_cell_height", self.grid.lower_cell_height)?;
        positive("grid.lower_font_size", self.grid.lower_font_size)?;
        positive("grid.series_height", self.grid.series_height)?;
        positive("footer.english_size", self.footer.english_size)?;
        positive("footer.malayalam_size", self.footer.malayalam_size)?;
        positive("footer.line_height", self.footer.line_height)?;
        if self.grid.consolation_columns == 0 {
            return Err(Error::ConfigError("grid.consolation_columns must be at least 1".into()));
        }

        if self.columns.thresholds.is_empty() {
            return Err(Error::ConfigError("columns.thresholds must not be empty".into()));
        }
        if self.columns.above == 0 || self.columns.thresholds.iter().any(|t| t.columns == 0) {
            return Err(Error::ConfigError("column counts must be at least 1".into()));
        }
        if self
            .columns
            .thresholds
            .windows(2)
            .any(|w| w[0].max_tickets >= w[1].max_tickets)
        {
            return Err(Error::ConfigError(
                "columns.thresholds must be strictly ascending by max_tickets".into(),
            ));
        }

        let first_section_top = self.page.margin + 1.0 + self.header.height + self.header.gap;
        let limit = self.page.height - self.page.margin - self.footer.reserve;
        let grid_row = 2.0 * self.grid.padding
            + self
                .grid
                .consolation_cell_height
                .max(self.grid.lower_cell_height)
                .max(self.grid.series_height);
        let tallest = self
            .featured
            .first_height
            .max(self.featured.second_height)
            .max(grid_row);
        if limit - first_section_top < self.section.header_height + tallest {
            return Err(Error::ConfigError(
                "page leaves no room for a single prize section".into(),
            ));
        }
        Ok(())
    }
}

/// The kinds of render backend this crate provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Pdf,
    Html,
}

impl BackendKind {
    pub fn extension(self) -> &'static str {
        match self {
            BackendKind::Pdf => "pdf",
            BackendKind::Html => "html",
        }
    }

    pub fn media_type(self) -> &'static str {
        match self {
            BackendKind::Pdf => "application/pdf",
            BackendKind::Html => "text/html; charset=utf-8",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A finished document, ready to be persisted.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub kind: BackendKind,
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<LayoutOverflowWarning>,
    /// Backend-specific remarks, e.g. text runs a backend could not show.
    pub notes: Vec<String>,
}

impl RenderedDocument {
    /// SHA-256 of the document bytes, lower-case hex.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

/// Paints a laid-out document into bytes.
///
/// Backends differ only in how they paint; tier order, columns and text come
/// from the [`LaidOutDocument`].
pub trait RenderBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn render(&self, doc: &LaidOutDocument) -> Result<RenderedDocument>;
}

/// Construct a backend of the given kind, if this build includes it.
pub fn new_backend(kind: BackendKind) -> Result<Box<dyn RenderBackend>> {
    match kind {
        #[cfg(feature = "pdf")]
        BackendKind::Pdf => Ok(Box::new(rendering::pdf::PdfBackend::new())),
        #[cfg(feature = "html")]
        BackendKind::Html => Ok(Box::new(rendering::html::HtmlBackend::new())),
        #[allow(unreachable_patterns)]
        other => Err(Error::BackendUnavailable {
            tried: vec![other.to_string()],
        }),
    }
}

/// The preferred backend of this build: PDF, then HTML.
pub fn default_backend() -> Result<Box<dyn RenderBackend>> {
    let mut tried = Vec::new();
    for kind in [BackendKind::Pdf, BackendKind::Html] {
        match new_backend(kind) {
            Ok(b) => return Ok(b),
            Err(_) => tried.push(kind.to_string()),
        }
    }
    Err(Error::BackendUnavailable { tried })
}

/// Lay out `result` and paint it with `backend`.
pub fn render_document(
    result: &LotteryResult,
    config: &LayoutConfig,
    backend: &dyn RenderBackend,
) -> Result<RenderedDocument> {
    let laid_out = LayoutEngine::new(config)?.layout(result)?;
    backend.render(&laid_out)
}

/// Normalize a raw JSON payload (bare result or detail envelope) and render it.
pub fn render_json(
    json: &str,
    config: &LayoutConfig,
    backend: &dyn RenderBackend,
) -> Result<RenderedDocument> {
    let result = normalize::normalize_str(json)?;
    render_document(&result, config, backend)
}
