//! HTML backend: renders the semantic blocks as a print-styled page.
//!
//! One `.page` per laid-out page, one `.prize-row` per section, ticket
//! grids as CSS grids with a `grid-N` class per column count. `@page`
//! rules carry the page size and margin so the browser print path keeps
//! the same geometry.

use std::collections::BTreeSet;

use minijinja::{context, Environment};

use crate::rendering::layout::LaidOutDocument;
use crate::rendering::paint::{Block, PrizeBody};
use crate::{BackendKind, Error, RenderBackend, RenderedDocument, Result};

static TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
@page { size: {{ cfg.page.width|num }}mm {{ cfg.page.height|num }}mm; margin: {{ cfg.page.margin|num }}mm; }
* { box-sizing: border-box; }
body { margin: 0; font-family: Helvetica, Arial, sans-serif; color: #000; }
.page { position: relative; width: {{ content_width|num }}mm; height: {{ content_height|num }}mm; margin: 0 auto; border: {{ cfg.page.border_width|num }}mm solid #000; padding: 1mm 0 0; overflow: hidden; page-break-after: always; break-after: page; }
.page:last-of-type { page-break-after: auto; break-after: auto; }
.watermark { position: absolute; left: 0; right: 0; top: 50%; text-align: center; font-size: {{ cfg.watermark.size|num }}pt; font-weight: bold; color: {{ watermark_color }}; z-index: 0; pointer-events: none; }
.header, .prize-row, .footer { position: relative; z-index: 1; }
.header { display: flex; justify-content: space-between; align-items: center; height: {{ cfg.header.height|num }}mm; padding: 0 2mm; border-bottom: {{ cfg.header.rule_width|num }}mm solid #000; margin-bottom: {{ cfg.header.gap|num }}mm; font-weight: bold; font-size: {{ cfg.header.side_size|num }}pt; }
.header h1 { margin: 0; font-size: {{ cfg.header.title_size|num }}pt; }
.prize-row { display: flex; gap: {{ cfg.featured.pair_gap|num }}mm; margin-bottom: {{ cfg.section.gap|num }}mm; }
.prize { flex: 1; border: {{ cfg.section.border_width|num }}mm solid #000; }
.prize-header { display: flex; justify-content: space-between; align-items: center; height: {{ cfg.section.header_height|num }}mm; padding: 0 {{ cfg.section.text_inset|num }}mm; background: {{ section_fill }}; border-bottom: {{ cfg.section.border_width|num }}mm solid #000; font-size: {{ cfg.section.label_size|num }}pt; font-weight: bold; }
.featured { display: flex; flex-direction: column; align-items: center; justify-content: center; font-weight: bold; }
.tier-first .featured { height: {{ cfg.featured.first_height|num }}mm; font-size: {{ cfg.featured.first_size|num }}pt; }
.tier-second .featured, .tier-third .featured { height: {{ cfg.featured.second_height|num }}mm; font-size: {{ cfg.featured.second_size|num }}pt; }
.featured .boxed { border: {{ cfg.section.border_width|num }}mm solid #000; padding: 0 {{ (2 * cfg.featured.box_padding)|num }}mm; }
.featured .location { font-size: {{ cfg.featured.location_size|num }}pt; font-weight: normal; }
.grid { display: grid; margin: {{ cfg.grid.padding|num }}mm {{ cfg.grid.inset|num }}mm; }
{% for n in grid_columns %}.grid-{{ n }} { grid-template-columns: repeat({{ n }}, 1fr); }
{% endfor %}.cell { display: flex; align-items: center; justify-content: center; border: {{ cfg.grid.line_width|num }}mm solid #000; font-weight: bold; overflow: hidden; white-space: nowrap; }
.tier-consolation .cell { height: {{ cfg.grid.consolation_cell_height|num }}mm; font-size: {{ cfg.grid.consolation_font_size|num }}pt; }
.tier-lower .cell { height: {{ cfg.grid.lower_cell_height|num }}mm; font-size: {{ cfg.grid.lower_font_size|num }}pt; }
.series { min-height: {{ cfg.grid.series_height|num }}mm; padding: 0 {{ cfg.grid.inset|num }}mm; font-size: {{ cfg.grid.consolation_font_size|num }}pt; font-weight: bold; line-height: {{ cfg.grid.series_height|num }}mm; }
.footer { position: absolute; left: 2mm; right: 2mm; bottom: 0; height: {{ cfg.footer.reserve|num }}mm; color: #323232; }
.footer p { margin: 0; line-height: {{ cfg.footer.line_height|num }}mm; }
.footer-en { font-size: {{ cfg.footer.english_size|num }}pt; }
.footer-ml { font-size: {{ cfg.footer.malayalam_size|num }}pt; }
@media print { body { -webkit-print-color-adjust: exact; print-color-adjust: exact; } }
</style>
</head>
<body>
{%- macro prize(p) %}
<article class="prize tier-{{ p.tier }}{% if p.continued %} continued{% endif %}">
<div class="prize-header"><span class="prize-label">{{ p.label }}{% if p.continued %} (contd.){% endif %}</span><span class="prize-amount">{{ p.amount_text }}</span></div>
{%- if p.body.kind == "featured" %}
<div class="featured"><span class="number{% if p.tier == "first" %} boxed{% endif %}">{{ p.body.number }}</span>{% if p.body.location %}<span class="location">({{ p.body.location }})</span>{% endif %}</div>
{%- elif p.body.kind == "grid" %}
<div class="grid grid-{{ p.body.columns }}">{% for c in p.body.cells %}<span class="cell">{{ c }}</span>{% endfor %}</div>
{%- elif p.body.kind == "series" %}
<div class="series">{{ p.body.series|join(" ") }}</div>
{%- endif %}
</article>
{%- endmacro %}
{%- for page in pages %}
<section class="page" data-page="{{ page.number }}">
{%- if watermark %}
<div class="watermark">{{ watermark }}</div>
{%- endif %}
{%- for block in page.blocks %}
{%- if block.kind == "header" %}
<header class="header"><span class="draw-number">{{ block.draw_number }}</span><h1 class="lottery-name">{{ block.lottery_name }}</h1><span class="draw-date">{{ block.date }}</span></header>
{%- elif block.kind == "prize" %}
<div class="prize-row">{{ prize(block) }}</div>
{%- elif block.kind == "pair_row" %}
<div class="prize-row pair">{% for p in block.prizes %}{{ prize(p) }}{% endfor %}</div>
{%- elif block.kind == "footer" %}
<footer class="footer"><p class="footer-en">{{ block.english }}</p><p class="footer-ml" lang="ml">{{ block.malayalam }}</p></footer>
{%- endif %}
{%- endfor %}
</section>
{%- endfor %}
{%- if auto_print %}
<script>
window.addEventListener("afterprint", function () { window.close(); });
window.addEventListener("load", function () { window.print(); });
</script>
{%- endif %}
</body>
</html>
"#;

#[derive(Debug, Clone, Default)]
pub struct HtmlBackend {
    auto_print: bool,
}

impl HtmlBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the print dialog once the document has loaded.
    pub fn with_auto_print(mut self, auto_print: bool) -> Self {
        self.auto_print = auto_print;
        self
    }

    /// Render straight to a string.
    pub fn render_string(&self, doc: &LaidOutDocument) -> Result<String> {
        let cfg = &doc.config;
        let mut env = Environment::new();
        env.add_filter("num", num);
        env.add_template("bulletin.html", TEMPLATE)
            .map_err(|e| Error::RenderError(format!("template: {}", e)))?;
        let tmpl = env
            .get_template("bulletin.html")
            .map_err(|e| Error::RenderError(format!("template: {}", e)))?;

        let watermark = (cfg.watermark.enabled && !cfg.watermark.text.is_empty())
            .then(|| cfg.watermark.text.clone());

        tmpl.render(context! {
            title => format!("{} {} {}", doc.lottery_name, doc.draw_number, doc.date_text),
            cfg => cfg,
            content_width => cfg.page.content_width(),
            content_height => cfg.page.height - 2.0 * cfg.page.margin,
            watermark => watermark,
            watermark_color => crate::rendering::paint::Color::gray(cfg.watermark.gray).to_hex(),
            section_fill => crate::rendering::paint::Color::gray(cfg.section.fill_gray).to_hex(),
            grid_columns => grid_columns(doc),
            pages => &doc.pages,
            auto_print => self.auto_print,
        })
        .map_err(|e| Error::RenderError(format!("html render: {}", e)))
    }
}

/// CSS number: at most two decimals, no trailing zeros.
fn num(value: f64) -> String {
    let s = format!("{:.2}", value);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Distinct grid column counts used anywhere in the document, ascending.
fn grid_columns(doc: &LaidOutDocument) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    for page in &doc.pages {
        for block in &page.blocks {
            if let Block::Prize(p) = block {
                if let PrizeBody::Grid { columns, .. } = p.body {
                    seen.insert(columns);
                }
            }
        }
    }
    seen.into_iter().collect()
}

impl RenderBackend for HtmlBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Html
    }

    fn render(&self, doc: &LaidOutDocument) -> Result<RenderedDocument> {
        let html = self.render_string(doc)?;
        log::debug!("rendered {} bytes of HTML for {}", html.len(), doc.file_stem);
        Ok(RenderedDocument {
            kind: BackendKind::Html,
            file_name: doc.file_name(BackendKind::Html.extension()),
            media_type: BackendKind::Html.media_type(),
            bytes: html.into_bytes(),
            page_count: doc.page_count(),
            warnings: doc.warnings.clone(),
            notes: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, DrawDate, LotteryResult, Prize, Ticket};
    use crate::{LayoutConfig, LayoutEngine};

    fn doc() -> LaidOutDocument {
        let result = LotteryResult {
            lottery_name: Some("STHREE <SAKTHI>".into()),
            draw_number: Some("SS-470".into()),
            date: DrawDate::parse("2025-06-03"),
            is_bumper: false,
            prizes: vec![Prize {
                prize_type: "6th".into(),
                prize_amount: Amount::from_rupees(500),
                tickets: (1..=8).map(|i| Ticket::new(format!("{:04}", i))).collect(),
                series_only: Vec::new(),
            }],
        };
        let cfg = LayoutConfig::default();
        LayoutEngine::new(&cfg).unwrap().layout(&result).unwrap()
    }

    #[test]
    fn text_is_escaped() {
        let html = HtmlBackend::new().render_string(&doc()).unwrap();
        assert!(html.contains("STHREE &lt;SAKTHI&gt;"));
        assert!(!html.contains("<SAKTHI>"));
    }

    #[test]
    fn grid_class_matches_columns() {
        let html = HtmlBackend::new().render_string(&doc()).unwrap();
        // 8 tickets -> 12 columns
        assert!(html.contains(r#"class="grid grid-12""#));
        assert!(html.contains(".grid-12 { grid-template-columns: repeat(12, 1fr); }"));
    }

    #[test]
    fn css_numbers_are_trimmed() {
        assert_eq!(num(210.0), "210");
        assert_eq!(num(0.800000011920929), "0.8");
        assert_eq!(num(3.5), "3.5");
        let html = HtmlBackend::new().render_string(&doc()).unwrap();
        assert!(html.contains("margin: 7mm;"));
    }

    #[test]
    fn auto_print_hook_is_opt_in() {
        let d = doc();
        let plain = HtmlBackend::new().render_string(&d).unwrap();
        assert!(!plain.contains("window.print()"));
        let printing = HtmlBackend::new().with_auto_print(true).render_string(&d).unwrap();
        assert!(printing.contains("window.print()"));
        assert!(printing.contains(r#"addEventListener("afterprint", function () { window.close(); })"#));
        assert!(!plain.contains("window.close()"));
    }
}
