//! Layout engine geometry, overflow and pagination

mod common;

use klbulletin::rendering::paint::{Block, PaintCommand, PrizeBody};
use klbulletin::{
    ConsolationStyle, LayoutConfig, LayoutEngine, OverflowPolicy, Tier, Ticket,
};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn cursor_advances_by_section_height() {
    let cfg = LayoutConfig::default();
    let r = common::weekly_draw();
    let mut engine = LayoutEngine::new(&cfg).unwrap();

    // margin + 1
    assert!(close(engine.open_page(), 8.0));
    // + header height + gap
    assert!(close(engine.add_header(&r), 20.0));
    // first prize: band 5 + content 14 + gap 1
    let y = engine.add_prize_section(Tier::First, &r.prizes[0]).unwrap();
    assert!(close(y, 40.0), "{}", y);
    // 11 consolation tickets in 10 columns: 2 rows of 4mm plus padding
    let y = engine.add_prize_section(Tier::Consolation, &r.prizes[1]).unwrap();
    assert!(close(y, 56.0), "{}", y);
    // 2nd and 3rd share one row
    let y = engine
        .add_second_third_row(Some(&r.prizes[2]), Some(&r.prizes[3]))
        .unwrap();
    assert!(close(y, 74.0), "{}", y);
    // 18 tickets in 12 columns: 2 rows of 3.5mm
    let y = engine.add_prize_section(Tier::Lower, &r.prizes[4]).unwrap();
    assert!(close(y, 89.0), "{}", y);
    assert_eq!(engine.page_count(), 1);
}

#[test]
fn weekly_draw_fits_one_page_in_tier_order() {
    let cfg = LayoutConfig::default();
    let doc = LayoutEngine::new(&cfg)
        .unwrap()
        .layout(&common::weekly_draw())
        .unwrap();
    assert_eq!(doc.page_count(), 1);
    assert!(doc.warnings.is_empty());

    let labels: Vec<String> = doc.pages[0]
        .blocks
        .iter()
        .flat_map(|b| match b {
            Block::Prize(p) => vec![p.label.clone()],
            Block::PairRow { prizes } => prizes.iter().map(|p| p.label.clone()).collect(),
            _ => Vec::new(),
        })
        .collect();
    assert_eq!(
        labels,
        [
            "1st Prize",
            "Consolation Prize",
            "2nd Prize",
            "3rd Prize",
            "4th Prize",
            "5th Prize",
            "6th Prize",
            "7th Prize",
            "8th Prize"
        ]
    );

    assert!(matches!(doc.pages[0].blocks.first(), Some(Block::Header { .. })));
    assert!(matches!(doc.pages[0].blocks.last(), Some(Block::Footer { .. })));
}

#[test]
fn lower_tier_column_counts_follow_ticket_count() {
    let cfg = LayoutConfig::default();
    let doc = LayoutEngine::new(&cfg)
        .unwrap()
        .layout(&common::weekly_draw())
        .unwrap();
    let columns: Vec<(String, usize)> = doc
        .prize_blocks()
        .filter_map(|p| match &p.body {
            PrizeBody::Grid { columns, .. } if p.tier == Tier::Lower => Some((p.label.clone(), *columns)),
            _ => None,
        })
        .collect();
    assert_eq!(
        columns,
        [
            ("4th Prize".to_string(), 12),
            ("5th Prize".to_string(), 15),
            ("6th Prize".to_string(), 15),
            ("7th Prize".to_string(), 20),
            ("8th Prize".to_string(), 20),
        ]
    );
}

#[test]
fn single_page_drops_what_does_not_fit() {
    let cfg = LayoutConfig {
        overflow: OverflowPolicy::SinglePage,
        ..LayoutConfig::default()
    };
    let r = common::result(vec![
        common::prize("1st", 1, vec![Ticket::new("A 000001")]),
        common::prize("4th", 1, common::tickets("D", 1000)),
        common::prize("5th", 1, common::tickets("E", 1000)),
        common::prize("6th", 1, common::tickets("F", 2)),
    ]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();

    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.warnings.len(), 1);
    let w = &doc.warnings[0];
    assert_eq!(w.dropped, ["5th Prize", "6th Prize"]);
    assert!(close(w.limit, 272.0));

    let shown: Vec<&str> = doc.prize_blocks().map(|p| p.label.as_str()).collect();
    assert_eq!(shown, ["1st Prize", "4th Prize"]);
}

#[test]
fn nothing_is_painted_below_the_footer_reserve() {
    let cfg = LayoutConfig {
        overflow: OverflowPolicy::SinglePage,
        ..LayoutConfig::default()
    };
    let r = common::result(vec![
        common::prize("4th", 1, common::tickets("D", 1000)),
        common::prize("5th", 1, common::tickets("E", 1000)),
    ]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    let limit = 297.0 - 7.0 - cfg.footer.reserve;
    for cmd in &doc.pages[0].commands {
        if let PaintCommand::Rect { y, height, .. } = cmd {
            // the page border spans the whole sheet
            if close(*y, 7.0) && close(*height, 283.0) {
                continue;
            }
            assert!(*y + *height <= limit + 1e-3, "rect ends at {}", y + height);
        }
    }
}

#[test]
fn paginate_moves_whole_sections_to_a_new_page() {
    let cfg = LayoutConfig::default();
    let r = common::result(vec![
        common::prize("4th", 1, common::tickets("D", 1000)),
        common::prize("5th", 1, common::tickets("E", 1000)),
    ]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    assert_eq!(doc.page_count(), 2);
    assert!(doc.warnings.is_empty());

    for page in &doc.pages {
        // header repeats on every page
        assert!(matches!(page.blocks.first(), Some(Block::Header { .. })));
        assert_eq!(page.prize_blocks().count(), 1);
    }
    assert!(doc.prize_blocks().all(|p| !p.continued));
    // footer only on the last page
    let footers = |i: usize| {
        doc.pages[i]
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Footer { .. }))
            .count()
    };
    assert_eq!(footers(0), 0);
    assert_eq!(footers(1), 1);
}

#[test]
fn oversized_grid_is_split_across_pages() {
    let cfg = LayoutConfig::default();
    let r = common::result(vec![
        common::prize("1st", 1, vec![Ticket::new("A 000001")]),
        common::prize("7th", 1, common::tickets("G", 3000)),
    ]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    assert_eq!(doc.page_count(), 3);

    let grids: Vec<_> = doc
        .prize_blocks()
        .filter(|p| p.tier == Tier::Lower)
        .collect();
    assert_eq!(grids.len(), 3);
    assert!(!grids[0].continued);
    assert!(grids[1].continued && grids[2].continued);

    let total: usize = grids
        .iter()
        .map(|p| match &p.body {
            PrizeBody::Grid { cells, .. } => cells.len(),
            _ => 0,
        })
        .sum();
    assert_eq!(total, 3000);
    assert!(doc.texts().any(|t| t == "7th Prize (contd.)"));
}

#[test]
fn series_style_lists_distinct_series() {
    let cfg = LayoutConfig {
        consolation_style: ConsolationStyle::Series,
        ..LayoutConfig::default()
    };
    let r = common::result(vec![common::prize(
        "consolation",
        8000,
        vec![
            Ticket::new("AB 123456"),
            Ticket::new("AC 123456"),
            Ticket::new("AB 999999"),
            Ticket::new("AD 123456"),
        ],
    )]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    let block = doc.prize_blocks().next().unwrap();
    match &block.body {
        PrizeBody::Series { series } => assert_eq!(series, &["AB", "AC", "AD"]),
        other => panic!("expected series, got {:?}", other),
    }
    assert!(doc.texts().any(|t| t == "AB AC AD"));
}

#[test]
fn lone_third_prize_spans_full_width() {
    let cfg = LayoutConfig::default();
    let r = common::result(vec![common::prize(
        "3rd",
        100_000,
        vec![Ticket::new("WD 111111")],
    )]);
    let doc = LayoutEngine::new(&cfg).unwrap().layout(&r).unwrap();
    let prize_blocks: Vec<_> = doc.pages[0]
        .blocks
        .iter()
        .filter(|b| matches!(b, Block::Prize(_) | Block::PairRow { .. }))
        .collect();
    assert_eq!(prize_blocks.len(), 1);
    assert!(matches!(prize_blocks[0], Block::Prize(p) if p.tier == Tier::Third));
}

#[test]
fn invalid_config_is_rejected() {
    let mut cfg = LayoutConfig::default();
    cfg.columns.thresholds.reverse();
    assert!(LayoutEngine::new(&cfg).is_err());

    let mut cfg = LayoutConfig::default();
    cfg.page.margin = 120.0;
    assert!(LayoutEngine::new(&cfg).is_err());
}
