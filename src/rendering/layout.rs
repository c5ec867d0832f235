//! Page Layout Engine
//!
//! One [`LayoutEngine`] lays out one result. It owns the cursor (`current_y`
//! plus the page list) and walks the classified prizes top to bottom,
//! emitting draw instructions and semantic blocks for every page.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::classify::{self, prize_label, tier_layout, Tier, TierLayoutSpec};
use crate::format::{self, amount_label, format_draw_date};
use crate::model::{DrawDate, LotteryResult, Prize};
use crate::rendering::metrics::{cap_height, text_width, wrap_text, FontWeight};
use crate::rendering::paint::{
    Block, Color, Page, PaintCommand, PrizeBlock, PrizeBody, Script, Stroke,
};
use crate::{ConsolationStyle, Error, LayoutConfig, OverflowPolicy, Placeholders, Result};

const CONTINUED: &str = "(contd.)";
const FOOTER_COLOR: Color = Color::gray(50);
const EPS: f32 = 1e-3;

/// Sections left out because the page budget ran out in single-page mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutOverflowWarning {
    pub page: usize,
    /// Cursor position when the first section was dropped.
    pub cursor_y: f32,
    pub limit: f32,
    /// Labels of the dropped sections, in display order.
    pub dropped: Vec<String>,
}

impl fmt::Display for LayoutOverflowWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} full at {:.1}mm (limit {:.1}mm): dropped {}",
            self.page,
            self.cursor_y,
            self.limit,
            self.dropped.join(", ")
        )
    }
}

/// Output of the layout engine, consumed by every backend.
#[derive(Debug, Clone, Serialize)]
pub struct LaidOutDocument {
    /// The configuration the document was laid out with.
    pub config: LayoutConfig,
    pub lottery_name: String,
    pub draw_number: String,
    pub date_text: String,
    /// Sanitized `{name}_{date}` used for output file names.
    pub file_stem: String,
    pub pages: Vec<Page>,
    pub warnings: Vec<LayoutOverflowWarning>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem, extension)
    }

    /// Every text run on every page, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }

    pub fn prize_blocks(&self) -> impl Iterator<Item = &PrizeBlock> {
        self.pages.iter().flat_map(Page::prize_blocks)
    }

    /// SHA-256 over the serialized pages. Equal fingerprints mean equal
    /// draw instructions.
    pub fn fingerprint(&self) -> String {
        let bytes = serde_json::to_vec(&self.pages).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }
}

#[derive(Debug, Clone, Default)]
struct HeaderText {
    lottery_name: String,
    draw_number: String,
    date: String,
    file_stem: String,
}

impl HeaderText {
    fn new(result: &LotteryResult, placeholders: &Placeholders) -> Self {
        let lottery_name = result
            .lottery_name
            .clone()
            .unwrap_or_else(|| placeholders.lottery_name.clone());
        let draw_number = result
            .draw_number
            .clone()
            .unwrap_or_else(|| placeholders.draw_number.clone());
        let date = format_draw_date(&result.date, &placeholders.date);
        let file_date = match result.date {
            DrawDate::Missing => "",
            _ => date.as_str(),
        };
        let file_stem = format::document_file_stem(&lottery_name, file_date);
        Self {
            lottery_name,
            draw_number,
            date,
            file_stem,
        }
    }
}

fn script_of(text: &str) -> Script {
    if text.chars().any(|c| ('\u{0D00}'..='\u{0D7F}').contains(&c)) {
        Script::Malayalam
    } else {
        Script::Latin
    }
}

/// Largest size not above `size` at which `text` fits in `max_width`.
fn fit_size(text: &str, size: f32, max_width: f32, weight: FontWeight) -> f32 {
    let w = text_width(text, size, weight);
    if w <= max_width || w <= 0.0 {
        size
    } else {
        size * max_width / w
    }
}

fn rows_that_fit(available: f32, cell_height: f32) -> usize {
    if available <= 0.0 {
        0
    } else {
        ((available + EPS) / cell_height).floor() as usize
    }
}

pub struct LayoutEngine<'c> {
    config: &'c LayoutConfig,
    header: HeaderText,
    pages: Vec<Page>,
    current_y: f32,
    /// Cursor right below the header of the current page.
    page_top: f32,
    overflow: Option<LayoutOverflowWarning>,
}

impl<'c> LayoutEngine<'c> {
    pub fn new(config: &'c LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            header: HeaderText::default(),
            pages: Vec::new(),
            current_y: config.page.margin,
            page_top: config.page.margin,
            overflow: None,
        })
    }

    pub fn current_y(&self) -> f32 {
        self.current_y
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Lay out a whole result: header, prizes in tier order, footer.
    pub fn layout(mut self, result: &LotteryResult) -> Result<LaidOutDocument> {
        let classified = classify::classify(&result.prizes);
        log::debug!(
            "layout {:?}: {} prizes, {} lower tier, policy {:?}",
            result.lottery_name,
            result.prizes.len(),
            classified.lower_tier.len(),
            self.config.overflow
        );

        self.open_page();
        self.add_header(result);
        if let Some(p) = classified.first {
            self.add_prize_section(Tier::First, p)?;
        }
        if let Some(p) = classified.consolation {
            self.add_prize_section(Tier::Consolation, p)?;
        }
        if classified.second.is_some() || classified.third.is_some() {
            self.add_second_third_row(classified.second, classified.third)?;
        }
        for p in &classified.lower_tier {
            self.add_prize_section(Tier::Lower, p)?;
        }
        self.add_footer();
        Ok(self.finish())
    }

    /// Start a new page with its border and watermark. Returns the cursor.
    pub fn open_page(&mut self) -> f32 {
        let cfg = self.config;
        let g = cfg.page;
        let number = self.pages.len() + 1;
        self.pages.push(Page::new(number));

        let wm = &cfg.watermark;
        if wm.enabled && !wm.text.is_empty() {
            let w = text_width(&wm.text, wm.size, FontWeight::Bold);
            self.text(
                (g.width - w) / 2.0,
                g.height / 2.0 + wm.offset,
                &wm.text,
                wm.size,
                FontWeight::Bold,
                Color::gray(wm.gray),
            );
        }
        self.push(PaintCommand::Rect {
            x: g.margin,
            y: g.margin,
            width: g.content_width(),
            height: g.height - 2.0 * g.margin,
            stroke: Some(Stroke {
                width: g.border_width,
                color: Color::BLACK,
            }),
            fill: None,
        });

        log::debug!("opened page {}", number);
        self.current_y = g.margin + 1.0;
        self.page_top = self.current_y;
        self.current_y
    }

    /// Draw number, lottery name and date over a rule. Continuation pages
    /// repeat it.
    pub fn add_header(&mut self, result: &LotteryResult) -> f32 {
        self.header = HeaderText::new(result, &self.config.placeholders);
        self.draw_header()
    }

    fn draw_header(&mut self) -> f32 {
        let cfg = self.config;
        let g = cfg.page;
        let h = cfg.header;
        let y = self.current_y;
        let baseline = y + h.baseline;
        let header = self.header.clone();

        self.text(
            g.margin + 2.0,
            baseline,
            &header.draw_number,
            h.side_size,
            FontWeight::Bold,
            Color::BLACK,
        );
        let title_w = text_width(&header.lottery_name, h.title_size, FontWeight::Bold);
        self.text(
            (g.width - title_w) / 2.0,
            baseline,
            &header.lottery_name,
            h.title_size,
            FontWeight::Bold,
            Color::BLACK,
        );
        let date_w = text_width(&header.date, h.side_size, FontWeight::Bold);
        self.text(
            g.width - g.margin - 2.0 - date_w,
            baseline,
            &header.date,
            h.side_size,
            FontWeight::Bold,
            Color::BLACK,
        );
        self.push(PaintCommand::Line {
            x1: g.margin,
            y1: y + h.height,
            x2: g.width - g.margin,
            y2: y + h.height,
            stroke: Stroke {
                width: h.rule_width,
                color: Color::BLACK,
            },
        });
        self.page().blocks.push(Block::Header {
            draw_number: header.draw_number,
            lottery_name: header.lottery_name,
            date: header.date,
        });

        self.current_y = y + h.height + h.gap;
        self.page_top = self.current_y;
        self.current_y
    }

    /// Place one prize section. Prizes without tickets are skipped, except a
    /// consolation series summary that lists its series explicitly.
    pub fn add_prize_section(&mut self, tier: Tier, prize: &Prize) -> Result<f32> {
        let cfg = self.config;
        let series_summary =
            tier == Tier::Consolation && cfg.consolation_style == ConsolationStyle::Series;
        if prize.tickets.is_empty() && !(series_summary && !prize.series_only.is_empty()) {
            log::debug!("skipping `{}`: no tickets", prize.prize_type);
            return Ok(self.current_y);
        }
        let spec = tier_layout(tier, prize.ticket_count(), cfg);
        let label = prize_label(&prize.prize_type);
        let amount = amount_label(prize.prize_amount);
        log::debug!(
            "{}: {} tickets, {:?}, {} columns",
            label,
            prize.ticket_count(),
            tier,
            spec.columns
        );

        match tier {
            Tier::First | Tier::Second | Tier::Third => {
                let needed = cfg.section.header_height + spec.cell_height;
                if self.make_room(std::slice::from_ref(&label), needed) {
                    let block =
                        self.draw_featured(cfg.page.margin, cfg.page.content_width(), &spec, &label, &amount, prize);
                    self.page().blocks.push(Block::Prize(block));
                    self.current_y += needed + cfg.section.gap;
                }
            }
            Tier::Consolation if cfg.consolation_style == ConsolationStyle::Series => {
                self.add_series_section(&spec, &label, &amount, prize);
            }
            Tier::Consolation | Tier::Lower => {
                self.add_grid_section(&spec, &label, &amount, prize)?;
            }
        }
        Ok(self.current_y)
    }

    /// 2nd and 3rd prizes side by side, or one centered when only one exists.
    pub fn add_second_third_row(
        &mut self,
        second: Option<&Prize>,
        third: Option<&Prize>,
    ) -> Result<f32> {
        let cfg = self.config;
        let entries: Vec<(Tier, &Prize)> = [(Tier::Second, second), (Tier::Third, third)]
            .into_iter()
            .filter_map(|(tier, p)| p.filter(|p| !p.tickets.is_empty()).map(|p| (tier, p)))
            .collect();
        if entries.is_empty() {
            return Ok(self.current_y);
        }

        let labels: Vec<String> = entries.iter().map(|(_, p)| prize_label(&p.prize_type)).collect();
        let needed = cfg.section.header_height + cfg.featured.second_height;
        if !self.make_room(&labels, needed) {
            return Ok(self.current_y);
        }

        let n = entries.len() as f32;
        let gap = cfg.featured.pair_gap;
        let col_w = (cfg.page.content_width() - gap * (n - 1.0)) / n;
        let mut blocks = Vec::with_capacity(entries.len());
        for (i, ((tier, prize), label)) in entries.iter().zip(&labels).enumerate() {
            let spec = tier_layout(*tier, prize.ticket_count(), cfg);
            let x = cfg.page.margin + i as f32 * (col_w + gap);
            let amount = amount_label(prize.prize_amount);
            blocks.push(self.draw_featured(x, col_w, &spec, label, &amount, prize));
        }

        let block = if blocks.len() == 1 {
            Block::Prize(blocks.remove(0))
        } else {
            Block::PairRow { prizes: blocks }
        };
        self.page().blocks.push(block);
        self.current_y += needed + cfg.section.gap;
        Ok(self.current_y)
    }

    /// Bilingual disclaimer in the reserved band at the bottom of the last page.
    pub fn add_footer(&mut self) -> f32 {
        let cfg = self.config;
        let g = cfg.page;
        let f = &cfg.footer;
        let top = g.height - g.margin - f.reserve;
        let x = g.margin + 2.0;
        let w = g.content_width() - 4.0;

        let mut baseline = top + f.line_height;
        let runs = [
            (&f.english, f.english_size),
            (&f.malayalam, f.malayalam_size),
        ];
        for (text, size) in runs {
            for line in wrap_text(text, w, size, FontWeight::Regular) {
                self.text(x, baseline, &line, size, FontWeight::Regular, FOOTER_COLOR);
                baseline += f.line_height;
            }
        }
        self.page().blocks.push(Block::Footer {
            english: f.english.clone(),
            malayalam: f.malayalam.clone(),
        });

        let bottom = baseline - f.line_height;
        if bottom > g.height - g.margin {
            log::warn!("footer text runs {:.1}mm past the bottom margin", bottom - (g.height - g.margin));
        }
        self.current_y = bottom;
        self.current_y
    }

    pub fn finish(self) -> LaidOutDocument {
        let mut warnings = Vec::new();
        if let Some(w) = self.overflow {
            log::warn!("layout overflow: {}", w);
            warnings.push(w);
        }
        LaidOutDocument {
            config: self.config.clone(),
            lottery_name: self.header.lottery_name,
            draw_number: self.header.draw_number,
            date_text: self.header.date,
            file_stem: self.header.file_stem,
            pages: self.pages,
            warnings,
        }
    }

    fn limit(&self) -> f32 {
        let g = self.config.page;
        g.height - g.margin - self.config.footer.reserve
    }

    fn fits(&self, needed: f32) -> bool {
        self.current_y + needed <= self.limit() + EPS
    }

    fn at_page_top(&self) -> bool {
        (self.current_y - self.page_top).abs() < EPS
    }

    fn fresh_page_top(&self) -> f32 {
        let cfg = self.config;
        cfg.page.margin + 1.0 + cfg.header.height + cfg.header.gap
    }

    fn continue_on_new_page(&mut self) {
        self.open_page();
        self.draw_header();
    }

    fn record_drop(&mut self, labels: &[String]) {
        let page = self.pages.len();
        let cursor_y = self.current_y;
        let limit = self.limit();
        let warning = self.overflow.get_or_insert_with(|| LayoutOverflowWarning {
            page,
            cursor_y,
            limit,
            dropped: Vec::new(),
        });
        warning.dropped.extend(labels.iter().cloned());
    }

    /// Ensure `needed` mm are free below the cursor. Returns false when the
    /// section must be dropped.
    fn make_room(&mut self, labels: &[String], needed: f32) -> bool {
        if self.overflow.is_some() {
            self.record_drop(labels);
            return false;
        }
        if self.fits(needed) {
            return true;
        }
        match self.config.overflow {
            OverflowPolicy::SinglePage => {
                self.record_drop(labels);
                false
            }
            OverflowPolicy::Paginate => {
                if !self.at_page_top() {
                    self.continue_on_new_page();
                }
                true
            }
        }
    }

    fn add_grid_section(
        &mut self,
        spec: &TierLayoutSpec,
        label: &str,
        amount: &str,
        prize: &Prize,
    ) -> Result<()> {
        let cfg = self.config;
        let cells: Vec<&str> = prize.ticket_numbers().collect();
        let columns = spec.columns.max(1);
        let total_rows = cells.len().div_ceil(columns);
        let fixed = cfg.section.header_height + 2.0 * cfg.grid.padding;
        let needed = fixed + total_rows as f32 * spec.cell_height;

        if self.overflow.is_some()
            || (cfg.overflow == OverflowPolicy::SinglePage && !self.fits(needed))
        {
            self.record_drop(&[label.to_string()]);
            return Ok(());
        }

        let fresh_rows = rows_that_fit(self.limit() - self.fresh_page_top() - fixed, spec.cell_height);
        if fresh_rows == 0 {
            return Err(Error::RenderError(format!(
                "one row of the {} grid does not fit on a page",
                label
            )));
        }

        let mut start = 0;
        let mut continued = false;
        while start < total_rows {
            let remaining = total_rows - start;
            let fit = rows_that_fit(self.limit() - self.current_y - fixed, spec.cell_height);
            if fit >= remaining {
                self.draw_grid(spec, label, amount, &cells, start, remaining, continued);
                break;
            }
            if fit == 0 || (remaining <= fresh_rows && !self.at_page_top()) {
                self.continue_on_new_page();
                continue;
            }
            // Taller than a page: fill this one and carry on.
            log::debug!("{}: splitting after {} of {} rows", label, start + fit, total_rows);
            self.draw_grid(spec, label, amount, &cells, start, fit, continued);
            start += fit;
            continued = true;
            self.continue_on_new_page();
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_grid(
        &mut self,
        spec: &TierLayoutSpec,
        label: &str,
        amount: &str,
        cells: &[&str],
        start_row: usize,
        rows: usize,
        continued: bool,
    ) {
        let cfg = self.config;
        let g = cfg.page;
        let gs = cfg.grid;
        let columns = spec.columns.max(1);
        let x = g.margin;
        let w = g.content_width();
        let y = self.current_y;
        let content_h = 2.0 * gs.padding + rows as f32 * spec.cell_height;

        let shown = if continued {
            format!("{} {}", label, CONTINUED)
        } else {
            label.to_string()
        };
        self.section_frame(x, y, w, content_h, &shown, amount);

        let grid_x = x + gs.inset;
        let cell_w = (w - 2.0 * gs.inset) / columns as f32;
        let grid_y = y + cfg.section.header_height + gs.padding;
        let first = start_row * columns;
        let last = ((start_row + rows) * columns).min(cells.len());
        let slice = &cells[first..last];

        for (i, number) in slice.iter().enumerate() {
            let cx = grid_x + (i % columns) as f32 * cell_w;
            let cy = grid_y + (i / columns) as f32 * spec.cell_height;
            self.push(PaintCommand::Rect {
                x: cx,
                y: cy,
                width: cell_w,
                height: spec.cell_height,
                stroke: Some(Stroke {
                    width: gs.line_width,
                    color: Color::BLACK,
                }),
                fill: None,
            });
            let size = fit_size(number, spec.font_size, cell_w - 0.6, FontWeight::Bold);
            let tw = text_width(number, size, FontWeight::Bold);
            self.text(
                cx + (cell_w - tw) / 2.0,
                cy + (spec.cell_height + cap_height(size)) / 2.0,
                number,
                size,
                FontWeight::Bold,
                Color::BLACK,
            );
        }

        self.page().blocks.push(Block::Prize(PrizeBlock {
            tier: spec.tier,
            label: label.to_string(),
            amount_text: amount.to_string(),
            body: PrizeBody::Grid {
                columns,
                cells: slice.iter().map(|s| s.to_string()).collect(),
            },
            continued,
        }));
        self.current_y = y + cfg.section.header_height + content_h + cfg.section.gap;
    }

    fn add_series_section(&mut self, spec: &TierLayoutSpec, label: &str, amount: &str, prize: &Prize) {
        let cfg = self.config;
        let g = cfg.page;
        let gs = cfg.grid;
        let series = if prize.series_only.is_empty() {
            format::distinct_series(prize.ticket_numbers())
        } else {
            prize.series_only.clone()
        };
        let lines = wrap_text(
            &series.join(" "),
            g.content_width() - 2.0 * gs.inset,
            spec.font_size,
            FontWeight::Bold,
        );
        let content_h = lines.len().max(1) as f32 * gs.series_height;
        let needed = cfg.section.header_height + content_h;
        if !self.make_room(&[label.to_string()], needed) {
            return;
        }

        let y = self.current_y;
        self.section_frame(g.margin, y, g.content_width(), content_h, label, amount);
        let content_y = y + cfg.section.header_height;
        for (i, line) in lines.iter().enumerate() {
            let baseline =
                content_y + i as f32 * gs.series_height + (gs.series_height + cap_height(spec.font_size)) / 2.0;
            self.text(
                g.margin + gs.inset,
                baseline,
                line,
                spec.font_size,
                FontWeight::Bold,
                Color::BLACK,
            );
        }
        self.page().blocks.push(Block::Prize(PrizeBlock {
            tier: spec.tier,
            label: label.to_string(),
            amount_text: amount.to_string(),
            body: PrizeBody::Series { series },
            continued: false,
        }));
        self.current_y = y + needed + cfg.section.gap;
    }

    /// Single large number in a section of width `w` starting at `x`.
    fn draw_featured(
        &mut self,
        x: f32,
        w: f32,
        spec: &TierLayoutSpec,
        label: &str,
        amount: &str,
        prize: &Prize,
    ) -> PrizeBlock {
        let cfg = self.config;
        let f = cfg.featured;
        let y = self.current_y;
        self.section_frame(x, y, w, spec.cell_height, label, amount);

        let (number_off, location_off, boxed) = match spec.tier {
            Tier::First => (f.first_baseline, f.first_location_baseline, true),
            _ => (f.second_baseline, f.second_location_baseline, false),
        };
        if prize.tickets.len() > 1 {
            log::warn!(
                "{} has {} tickets; only the first is shown",
                label,
                prize.tickets.len()
            );
        }
        let (number, location) = match prize.tickets.first() {
            Some(t) => (t.ticket_number.clone(), t.location.clone()),
            None => (String::new(), None),
        };

        let content_y = y + cfg.section.header_height;
        let size = fit_size(&number, spec.font_size, w - 4.0 * f.box_padding - 2.0, FontWeight::Bold);
        let tw = text_width(&number, size, FontWeight::Bold);
        let nx = x + (w - tw) / 2.0;
        let baseline = content_y + number_off;
        if boxed {
            let cap = cap_height(size);
            self.push(PaintCommand::Rect {
                x: nx - 2.0 * f.box_padding,
                y: baseline - cap - f.box_padding,
                width: tw + 4.0 * f.box_padding,
                height: cap + 2.0 * f.box_padding,
                stroke: Some(Stroke {
                    width: cfg.section.border_width,
                    color: Color::BLACK,
                }),
                fill: None,
            });
        }
        self.text(nx, baseline, &number, size, FontWeight::Bold, Color::BLACK);

        if let Some(loc) = &location {
            let text = format!("({})", loc);
            let lw = text_width(&text, f.location_size, FontWeight::Regular);
            self.text(
                x + (w - lw) / 2.0,
                content_y + location_off,
                &text,
                f.location_size,
                FontWeight::Regular,
                Color::BLACK,
            );
        }

        PrizeBlock {
            tier: spec.tier,
            label: label.to_string(),
            amount_text: amount.to_string(),
            body: PrizeBody::Featured { number, location },
            continued: false,
        }
    }

    /// Section border plus the shaded label/amount band.
    fn section_frame(&mut self, x: f32, y: f32, w: f32, content_h: f32, label: &str, amount: &str) {
        let s = self.config.section;
        let border = Stroke {
            width: s.border_width,
            color: Color::BLACK,
        };
        self.push(PaintCommand::Rect {
            x,
            y,
            width: w,
            height: s.header_height + content_h,
            stroke: Some(border),
            fill: None,
        });
        self.push(PaintCommand::Rect {
            x,
            y,
            width: w,
            height: s.header_height,
            stroke: Some(border),
            fill: Some(Color::gray(s.fill_gray)),
        });
        self.text(
            x + s.text_inset,
            y + s.baseline,
            label,
            s.label_size,
            FontWeight::Bold,
            Color::BLACK,
        );
        let aw = text_width(amount, s.label_size, FontWeight::Bold);
        self.text(
            x + w - s.text_inset - aw,
            y + s.baseline,
            amount,
            s.label_size,
            FontWeight::Bold,
            Color::BLACK,
        );
    }

    fn text(&mut self, x: f32, baseline: f32, text: &str, size: f32, weight: FontWeight, color: Color) {
        self.push(PaintCommand::Text {
            x,
            baseline,
            text: text.to_string(),
            size,
            weight,
            color,
            script: script_of(text),
        });
    }

    fn push(&mut self, cmd: PaintCommand) {
        self.page().commands.push(cmd);
    }

    fn page(&mut self) -> &mut Page {
        if self.pages.is_empty() {
            self.pages.push(Page::new(1));
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Ticket};

    fn lower(kind: &str, count: usize) -> Prize {
        Prize {
            prize_type: kind.to_string(),
            prize_amount: Amount::from_rupees(100),
            tickets: (0..count).map(|i| Ticket::new(format!("{:04}", i))).collect(),
            series_only: Vec::new(),
        }
    }

    fn result_with(prizes: Vec<Prize>) -> LotteryResult {
        LotteryResult {
            lottery_name: Some("WIN-WIN".into()),
            draw_number: Some("W-800".into()),
            date: DrawDate::parse("2025-01-06"),
            is_bumper: false,
            prizes,
        }
    }

    #[test]
    fn cursor_only_moves_down_within_a_page() {
        let cfg = LayoutConfig::default();
        let result = result_with(vec![lower("4th", 10), lower("5th", 30)]);
        let mut engine = LayoutEngine::new(&cfg).unwrap();
        let y0 = engine.open_page();
        let y1 = engine.add_header(&result);
        let y2 = engine.add_prize_section(Tier::Lower, &result.prizes[0]).unwrap();
        let y3 = engine.add_prize_section(Tier::Lower, &result.prizes[1]).unwrap();
        assert!(y0 < y1 && y1 < y2 && y2 < y3);
        assert_eq!(engine.page_count(), 1);
    }

    #[test]
    fn grid_height_is_rows_times_cell() {
        let cfg = LayoutConfig::default();
        let result = result_with(vec![lower("5th", 30)]);
        let mut engine = LayoutEngine::new(&cfg).unwrap();
        engine.open_page();
        let before = engine.add_header(&result);
        let after = engine.add_prize_section(Tier::Lower, &result.prizes[0]).unwrap();
        // 30 tickets -> 15 columns -> 2 rows
        let expected = cfg.section.header_height
            + 2.0 * cfg.grid.padding
            + 2.0 * cfg.grid.lower_cell_height
            + cfg.section.gap;
        assert!((after - before - expected).abs() < 1e-3);
    }

    #[test]
    fn empty_prize_renders_nothing() {
        let cfg = LayoutConfig::default();
        let doc = LayoutEngine::new(&cfg)
            .unwrap()
            .layout(&result_with(vec![lower("6th", 0)]))
            .unwrap();
        assert_eq!(doc.prize_blocks().count(), 0);
    }

    #[test]
    fn missing_header_fields_use_placeholders() {
        let cfg = LayoutConfig::default();
        let result = LotteryResult {
            lottery_name: None,
            draw_number: None,
            date: DrawDate::Missing,
            is_bumper: false,
            prizes: vec![],
        };
        let doc = LayoutEngine::new(&cfg).unwrap().layout(&result).unwrap();
        let texts: Vec<&str> = doc.texts().collect();
        assert!(texts.contains(&"KERALA LOTTERY"));
        assert_eq!(texts.iter().filter(|t| **t == "N/A").count(), 2);
        assert_eq!(doc.file_stem, "KERALALOTTERY");
    }

    #[test]
    fn listed_series_replace_derived_ones() {
        let cfg = LayoutConfig {
            consolation_style: ConsolationStyle::Series,
            ..LayoutConfig::default()
        };
        let mut consolation = lower("consolation", 3);
        consolation.series_only = vec!["KA".into(), "KB".into()];
        let doc = LayoutEngine::new(&cfg)
            .unwrap()
            .layout(&result_with(vec![consolation]))
            .unwrap();
        let block = doc.prize_blocks().next().unwrap();
        assert_eq!(
            block.body,
            PrizeBody::Series {
                series: vec!["KA".into(), "KB".into()]
            }
        );
    }

    #[test]
    fn series_summary_needs_no_tickets() {
        let cfg = LayoutConfig {
            consolation_style: ConsolationStyle::Series,
            ..LayoutConfig::default()
        };
        let mut consolation = lower("consolation", 0);
        consolation.series_only = vec!["KC".into()];
        let doc = LayoutEngine::new(&cfg)
            .unwrap()
            .layout(&result_with(vec![consolation.clone()]))
            .unwrap();
        assert_eq!(doc.prize_blocks().count(), 1);

        // the grid style has nothing to show
        let doc = LayoutEngine::new(&LayoutConfig::default())
            .unwrap()
            .layout(&result_with(vec![consolation]))
            .unwrap();
        assert_eq!(doc.prize_blocks().count(), 0);
    }

    #[test]
    fn malayalam_runs_are_tagged() {
        assert_eq!(script_of("സമ്മാനം"), Script::Malayalam);
        assert_eq!(script_of("KN123456"), Script::Latin);
    }

    #[test]
    fn fit_size_shrinks_only_when_needed() {
        assert_eq!(fit_size("12", 8.0, 50.0, FontWeight::Bold), 8.0);
        let s = fit_size("KA 123456", 8.0, 5.0, FontWeight::Bold);
        assert!(s < 8.0);
        assert!(text_width("KA 123456", s, FontWeight::Bold) <= 5.0 + 1e-3);
    }
}
