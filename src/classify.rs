//! Prize Classifier: buckets prizes into tiers and picks per-tier grid parameters.
//!
//! Tier assignment is a case-insensitive match on the trimmed `prize_type`.
//! Nothing here fails; unknown prize types land in the lower tier.

use serde::{Deserialize, Serialize};

use crate::model::Prize;
use crate::LayoutConfig;

/// Lower-tier ordinals in display order.
pub const LOWER_TIER_ORDER: [&str; 7] = ["4th", "5th", "6th", "7th", "8th", "9th", "10th"];

const CONSOLATION_ML: &str = "സമാധാനം";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    First,
    Consolation,
    Second,
    Third,
    Lower,
}

/// Per-prize layout parameters, derived from the tier and the ticket count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierLayoutSpec {
    pub tier: Tier,
    pub columns: usize,
    /// Grid cell height in mm, or the content band height for single-number tiers.
    pub cell_height: f32,
    pub font_size: f32,
}

/// One row of the lower-tier column table: counts up to `max_tickets` use `columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnThreshold {
    pub max_tickets: usize,
    pub columns: usize,
}

/// Column-count table for lower-tier grids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnTable {
    /// Ascending by `max_tickets`.
    pub thresholds: Vec<ColumnThreshold>,
    /// Columns used above the last threshold.
    pub above: usize,
}

impl Default for ColumnTable {
    fn default() -> Self {
        Self {
            thresholds: vec![
                ColumnThreshold { max_tickets: 6, columns: 6 },
                ColumnThreshold { max_tickets: 20, columns: 12 },
                ColumnThreshold { max_tickets: 100, columns: 15 },
            ],
            above: 20,
        }
    }
}

impl ColumnTable {
    pub fn columns_for(&self, ticket_count: usize) -> usize {
        self.thresholds
            .iter()
            .find(|t| ticket_count <= t.max_tickets)
            .map(|t| t.columns)
            .unwrap_or(self.above)
    }
}

/// Lower-tier column count for `ticket_count` tickets under `table`.
pub fn columns_for(ticket_count: usize, table: &ColumnTable) -> usize {
    table.columns_for(ticket_count)
}

/// Prizes bucketed by tier. Borrows from the result it was built from.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPrizes<'a> {
    pub first: Option<&'a Prize>,
    pub consolation: Option<&'a Prize>,
    pub second: Option<&'a Prize>,
    pub third: Option<&'a Prize>,
    /// Sorted by [`LOWER_TIER_ORDER`], unrecognized types last.
    pub lower_tier: Vec<&'a Prize>,
}

impl<'a> ClassifiedPrizes<'a> {
    /// Every classified prize in display order, with its tier.
    pub fn in_display_order(&self) -> Vec<(Tier, &'a Prize)> {
        let mut out = Vec::new();
        out.extend(self.first.map(|p| (Tier::First, p)));
        out.extend(self.consolation.map(|p| (Tier::Consolation, p)));
        out.extend(self.second.map(|p| (Tier::Second, p)));
        out.extend(self.third.map(|p| (Tier::Third, p)));
        out.extend(self.lower_tier.iter().map(|p| (Tier::Lower, *p)));
        out
    }
}

/// Tier a prize type string maps to, ignoring slot occupancy.
pub fn tier_of(prize_type: &str) -> Tier {
    let t = prize_type.trim().to_lowercase();
    if t.contains("1st") {
        Tier::First
    } else if t.contains("consolation") || t.contains(CONSOLATION_ML) {
        Tier::Consolation
    } else if t == "2nd" {
        Tier::Second
    } else if t == "3rd" {
        Tier::Third
    } else {
        Tier::Lower
    }
}

pub fn classify(prizes: &[Prize]) -> ClassifiedPrizes<'_> {
    let mut out = ClassifiedPrizes::default();
    let mut lower: Vec<&Prize> = Vec::new();

    for prize in prizes {
        let slot = match tier_of(&prize.prize_type) {
            Tier::First => &mut out.first,
            Tier::Consolation => &mut out.consolation,
            Tier::Second => &mut out.second,
            Tier::Third => &mut out.third,
            Tier::Lower => {
                lower.push(prize);
                continue;
            }
        };
        if slot.is_none() {
            *slot = Some(prize);
        } else {
            log::debug!(
                "duplicate `{}` prize moved to the lower tier",
                prize.prize_type
            );
            lower.push(prize);
        }
    }

    // sort_by_key is stable, so unrecognized types keep their input order.
    lower.sort_by_key(|p| lower_tier_rank(&p.prize_type));
    out.lower_tier = lower;
    out
}

fn lower_tier_rank(prize_type: &str) -> usize {
    let t = prize_type.trim().to_lowercase();
    LOWER_TIER_ORDER
        .iter()
        .position(|o| t.contains(o))
        .unwrap_or(LOWER_TIER_ORDER.len())
}

/// Display label for a prize type.
pub fn prize_label(prize_type: &str) -> String {
    let trimmed = prize_type.trim();
    if trimmed.is_empty() {
        return "Prize".to_string();
    }
    let t = trimmed.to_lowercase();
    for ordinal in ["1st", "2nd", "3rd"] {
        if t.contains(ordinal) {
            return format!("{} Prize", ordinal);
        }
    }
    if t.contains("consolation") || t.contains(CONSOLATION_ML) {
        return "Consolation Prize".to_string();
    }
    for ordinal in LOWER_TIER_ORDER.iter().rev() {
        if t.contains(ordinal) {
            return format!("{} Prize", ordinal);
        }
    }
    format!("{} Prize", trimmed)
}

pub fn tier_layout(tier: Tier, ticket_count: usize, config: &LayoutConfig) -> TierLayoutSpec {
    let (columns, cell_height, font_size) = match tier {
        Tier::First => (1, config.featured.first_height, config.featured.first_size),
        Tier::Second | Tier::Third => (1, config.featured.second_height, config.featured.second_size),
        Tier::Consolation => (
            config.grid.consolation_columns,
            config.grid.consolation_cell_height,
            config.grid.consolation_font_size,
        ),
        Tier::Lower => (
            config.columns.columns_for(ticket_count),
            config.grid.lower_cell_height,
            config.grid.lower_font_size,
        ),
    };
    TierLayoutSpec {
        tier,
        columns,
        cell_height,
        font_size,
    }
}
