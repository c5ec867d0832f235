//! Goldens for layout output and byte-level idempotence checks.
//!
//! `tests/goldens/*.blocks.json` hold the semantic blocks of every page.
//! Run with `UPDATE_GOLDENS=1` to rewrite them after an intended change.
#![cfg(feature = "html")]

mod common;

use std::fs;
use std::path::PathBuf;

use klbulletin::rendering::html::HtmlBackend;
use klbulletin::{
    render_document, ConsolationStyle, LaidOutDocument, LayoutConfig, LayoutEngine,
    OverflowPolicy,
};
use serde_json::Value;

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests/goldens");
    p.push(name);
    p
}

fn page_blocks(doc: &LaidOutDocument) -> Value {
    let pages: Vec<_> = doc.pages.iter().map(|p| &p.blocks).collect();
    serde_json::to_value(pages).expect("blocks serialize")
}

fn check_golden(name: &str, actual: &Value) {
    let path = golden_path(name);
    if std::env::var("UPDATE_GOLDENS").is_ok() {
        let text = serde_json::to_string_pretty(actual).expect("golden serializes");
        fs::write(&path, text + "\n").expect("write golden");
        println!("Updated golden: {:?}", path);
        return;
    }
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("golden {:?} unreadable ({}); run with UPDATE_GOLDENS=1", path, e));
    let expected: Value = serde_json::from_str(&text).expect("golden is JSON");
    assert_eq!(actual, &expected, "golden {} changed", name);
}

#[test]
fn layout_is_idempotent() {
    let cfg = LayoutConfig::default();
    let r = common::weekly_draw();
    let a = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    let b = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a.fingerprint().len(), 64);
}

#[test]
fn html_is_byte_identical_across_renders() {
    let cfg = LayoutConfig::default();
    let backend = HtmlBackend::new();
    let r = common::karunya_plus();
    let a = render_document(&r, &cfg, &backend).unwrap();
    let b = render_document(&r, &cfg, &backend).unwrap();
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a.digest(), b.digest());
}

#[test]
fn config_changes_change_the_fingerprint() {
    let r = common::weekly_draw();
    let base = LayoutConfig::default();
    let mut wider = LayoutConfig::default();
    wider.page.margin = 10.0;
    let a = LayoutEngine::new(&base).unwrap().layout(&r).unwrap();
    let b = LayoutEngine::new(&wider).unwrap().layout(&r).unwrap();
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn golden_weekly_draw_layout() {
    let cfg = LayoutConfig::default();
    let doc = LayoutEngine::new(&cfg)
        .unwrap()
        .layout(&common::weekly_draw())
        .unwrap();
    assert_eq!(doc.page_count(), 1);
    check_golden("weekly_draw.blocks.json", &page_blocks(&doc));
}

#[test]
fn golden_karunya_plus_layout() {
    let cfg = LayoutConfig::default();
    let doc = LayoutEngine::new(&cfg)
        .unwrap()
        .layout(&common::karunya_plus())
        .unwrap();
    check_golden("karunya_plus.blocks.json", &page_blocks(&doc));
}

#[test]
fn golden_single_page_overflow() {
    let cfg = LayoutConfig {
        overflow: OverflowPolicy::SinglePage,
        ..LayoutConfig::default()
    };
    let r = common::result(vec![
        common::prize("4th", 1, common::tickets("D", 1000)),
        common::prize("5th", 1, common::tickets("E", 1000)),
    ]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    assert_eq!(doc.warnings.len(), 1);
    assert_eq!(doc.warnings[0].dropped, ["5th Prize"]);
    check_golden("single_page_overflow.blocks.json", &page_blocks(&doc));
}

#[test]
fn series_style_changes_only_the_consolation_block() {
    let grid = LayoutEngine::new(&LayoutConfig::default())
        .unwrap()
        .layout(&common::karunya_plus())
        .unwrap();
    let cfg = LayoutConfig {
        consolation_style: ConsolationStyle::Series,
        ..LayoutConfig::default()
    };
    let series = LayoutEngine::new(&cfg)
        .unwrap()
        .layout(&common::karunya_plus())
        .unwrap();

    let mut expected = page_blocks(&grid);
    expected[0][2]["body"] = serde_json::json!({"kind": "series", "series": ["AB", "CD"]});
    assert_eq!(page_blocks(&series), expected);
}
