//! In-memory result model produced by the normalizer

use chrono::NaiveDate;

/// A single winning ticket, optionally with the agency location that sold it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub ticket_number: String,
    pub location: Option<String>,
}

impl Ticket {
    pub fn new(ticket_number: impl Into<String>) -> Self {
        Self {
            ticket_number: ticket_number.into(),
            location: None,
        }
    }

    pub fn with_location(ticket_number: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            ticket_number: ticket_number.into(),
            location: Some(location.into()),
        }
    }
}

/// Prize amount in rupees and paise.
///
/// The API sends amounts as JSON numbers or numeric strings; anything that
/// does not parse becomes zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Amount {
    pub rupees: u64,
    pub paise: u8,
}

impl Amount {
    pub const ZERO: Amount = Amount { rupees: 0, paise: 0 };

    pub fn from_rupees(rupees: u64) -> Self {
        Self { rupees, paise: 0 }
    }

    /// Parse a decimal string such as `"8000000"`, `"5,000.50"` or `" 100.5 "`.
    pub fn parse(text: &str) -> Option<Self> {
        let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
        if cleaned.is_empty() {
            return None;
        }
        let (whole, frac) = match cleaned.split_once('.') {
            Some((w, f)) => (w, f),
            None => (cleaned.as_str(), ""),
        };
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let rupees = if whole.is_empty() { 0 } else { whole.parse::<u64>().ok()? };
        let mut paise_digits: String = frac.chars().take(2).collect();
        while paise_digits.len() < 2 {
            paise_digits.push('0');
        }
        let paise = paise_digits.parse::<u8>().ok()?;
        Some(Self { rupees, paise })
    }

    /// Convert a JSON float, rounding to the nearest paisa. Negative and
    /// non-finite values are rejected.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let total_paise = (value * 100.0).round();
        if total_paise > (u64::MAX / 2) as f64 {
            return None;
        }
        let total_paise = total_paise as u64;
        Some(Self {
            rupees: total_paise / 100,
            paise: (total_paise % 100) as u8,
        })
    }
}

/// Draw date as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawDate {
    Parsed(NaiveDate),
    /// The API sent something that is not a recognizable date; shown verbatim.
    Raw(String),
    Missing,
}

impl DrawDate {
    /// Accepts `YYYY-MM-DD` (optionally followed by a time part),
    /// `DD-MM-YYYY` and `DD/MM/YYYY`.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return DrawDate::Missing;
        }
        let head = trimmed.get(..10).unwrap_or(trimmed);
        for fmt in ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(head, fmt) {
                return DrawDate::Parsed(date);
            }
        }
        DrawDate::Raw(trimmed.to_string())
    }
}

/// One prize tier entry of a result.
#[derive(Debug, Clone, PartialEq)]
pub struct Prize {
    pub prize_type: String,
    pub prize_amount: Amount,
    /// Resolved tickets, in the order the API listed them.
    pub tickets: Vec<Ticket>,
    /// Series the API listed explicitly for a series-only summary. When
    /// non-empty it replaces the series derived from `tickets`.
    pub series_only: Vec<String>,
}

impl Prize {
    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    pub fn ticket_numbers(&self) -> impl Iterator<Item = &str> {
        self.tickets.iter().map(|t| t.ticket_number.as_str())
    }
}

/// A normalized lottery result. Built once per API response and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LotteryResult {
    pub lottery_name: Option<String>,
    pub draw_number: Option<String>,
    pub date: DrawDate,
    pub is_bumper: bool,
    pub prizes: Vec<Prize>,
}

impl LotteryResult {
    pub fn total_tickets(&self) -> usize {
        self.prizes.iter().map(Prize::ticket_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parses_decimal_strings() {
        assert_eq!(Amount::parse("8000000"), Some(Amount::from_rupees(8_000_000)));
        assert_eq!(
            Amount::parse("5,000.5"),
            Some(Amount { rupees: 5000, paise: 50 })
        );
        assert_eq!(Amount::parse("100.00"), Some(Amount::from_rupees(100)));
        assert_eq!(Amount::parse("abc"), None);
        assert_eq!(Amount::parse(""), None);
    }

    #[test]
    fn amount_from_float_rounds_to_paise() {
        assert_eq!(Amount::from_f64(8000.0), Some(Amount::from_rupees(8000)));
        assert_eq!(
            Amount::from_f64(7.25),
            Some(Amount { rupees: 7, paise: 25 })
        );
        assert_eq!(Amount::from_f64(0.999), Some(Amount::from_rupees(1)));
        assert_eq!(Amount::from_f64(-1.0), None);
        assert_eq!(Amount::from_f64(f64::NAN), None);
    }

    #[test]
    fn draw_date_accepts_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 7, 17).unwrap();
        assert_eq!(DrawDate::parse("2025-07-17"), DrawDate::Parsed(expected));
        assert_eq!(DrawDate::parse("2025-07-17T15:00:00Z"), DrawDate::Parsed(expected));
        assert_eq!(DrawDate::parse("17-07-2025"), DrawDate::Parsed(expected));
        assert_eq!(DrawDate::parse("17/07/2025"), DrawDate::Parsed(expected));
        assert_eq!(DrawDate::parse("  "), DrawDate::Missing);
        assert_eq!(DrawDate::parse("Thursday"), DrawDate::Raw("Thursday".into()));
    }
}
