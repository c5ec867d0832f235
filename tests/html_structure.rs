//! DOM structure of the HTML bulletin
#![cfg(feature = "html")]

mod common;

use klbulletin::rendering::html::HtmlBackend;
use klbulletin::{LayoutConfig, LayoutEngine};
use scraper::{Html, Selector};

fn render(r: &klbulletin::LotteryResult) -> Html {
    let cfg = LayoutConfig::default();
    let doc = LayoutEngine::new(&cfg).unwrap().layout(r).unwrap();
    Html::parse_document(&HtmlBackend::new().render_string(&doc).unwrap())
}

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

fn text_of(doc: &Html, s: &str) -> Vec<String> {
    doc.select(&sel(s))
        .map(|e| e.text().collect::<String>())
        .collect()
}

#[test]
fn one_page_one_row_per_section() {
    let html = render(&common::karunya_plus());
    assert_eq!(html.select(&sel(".page")).count(), 1);
    // 1st and consolation
    assert_eq!(html.select(&sel(".prize-row")).count(), 2);
    assert_eq!(text_of(&html, ".draw-number"), ["KN-581"]);
    assert_eq!(text_of(&html, ".lottery-name"), ["KARUNYA PLUS"]);
    assert_eq!(text_of(&html, ".draw-date"), ["17-07-2025"]);
}

#[test]
fn first_prize_is_featured_with_location() {
    let html = render(&common::karunya_plus());
    assert_eq!(text_of(&html, ".tier-first .number.boxed"), ["KN123456"]);
    assert_eq!(text_of(&html, ".tier-first .location"), ["(KOLLAM)"]);
    assert_eq!(text_of(&html, ".tier-first .prize-amount"), ["Rs. 80,00,000/-"]);
}

#[test]
fn consolation_grid_has_ten_columns() {
    let html = render(&common::karunya_plus());
    assert_eq!(
        text_of(&html, ".tier-consolation .grid.grid-10 .cell"),
        ["AB 123456", "CD 234567"]
    );
}

#[test]
fn second_and_third_share_a_pair_row() {
    let html = render(&common::weekly_draw());
    let labels = text_of(&html, ".prize-row.pair .prize-label");
    assert_eq!(labels, ["2nd Prize", "3rd Prize"]);
}

#[test]
fn footer_is_bilingual() {
    let html = render(&common::karunya_plus());
    assert_eq!(html.select(&sel("footer.footer")).count(), 1);
    let ml = sel(r#".footer-ml[lang="ml"]"#);
    let text: String = html.select(&ml).flat_map(|e| e.text()).collect();
    assert_eq!(text, klbulletin::MALAYALAM_FOOTER);
}

#[test]
fn paginated_sections_mark_continuation() {
    let r = common::result(vec![common::prize("7th", 1, common::tickets("G", 3000))]);
    let html = render(&r);
    assert_eq!(html.select(&sel(".page")).count(), 3);
    assert_eq!(html.select(&sel(".prize.continued")).count(), 2);
    assert_eq!(html.select(&sel(".header")).count(), 3);
    assert_eq!(html.select(&sel(".cell")).count(), 3000);
}
