#![allow(dead_code)]

use klbulletin::{Amount, DrawDate, LotteryResult, Prize, Ticket};

pub const KARUNYA_PLUS: &str = r#"{
    "lottery_name": "KARUNYA PLUS",
    "draw_number": "KN-581",
    "date": "2025-07-17",
    "prizes": [
        {"prize_type": "1st", "prize_amount": 8000000,
         "tickets": [{"ticket_number": "KN123456", "location": "KOLLAM"}]},
        {"prize_type": "consolation", "prize_amount": 8000,
         "ticket_numbers": "AB 123456 CD 234567"}
    ]
}"#;

pub fn karunya_plus() -> LotteryResult {
    klbulletin::normalize::normalize_str(KARUNYA_PLUS).expect("fixture normalizes")
}

pub fn tickets(prefix: &str, n: usize) -> Vec<Ticket> {
    (0..n).map(|i| Ticket::new(format!("{} {:06}", prefix, i))).collect()
}

pub fn prize(prize_type: &str, rupees: u64, tickets: Vec<Ticket>) -> Prize {
    Prize {
        prize_type: prize_type.to_string(),
        prize_amount: Amount::from_rupees(rupees),
        tickets,
        series_only: Vec::new(),
    }
}

pub fn result(prizes: Vec<Prize>) -> LotteryResult {
    LotteryResult {
        lottery_name: Some("WIN-WIN".to_string()),
        draw_number: Some("W-800".to_string()),
        date: DrawDate::parse("2025-01-06"),
        is_bumper: false,
        prizes,
    }
}

/// A full weekly draw: every tier, realistic ticket counts.
pub fn weekly_draw() -> LotteryResult {
    result(vec![
        prize("1st", 7_500_000, vec![Ticket::with_location("WA 123456", "THRISSUR")]),
        prize("consolation", 8_000, tickets("WB", 11)),
        prize("2nd", 500_000, vec![Ticket::with_location("WC 654321", "KANNUR")]),
        prize("3rd", 100_000, vec![Ticket::with_location("WD 111111", "KOTTAYAM")]),
        prize("4th", 5_000, tickets("WE", 18)),
        prize("5th", 2_000, tickets("WF", 24)),
        prize("6th", 1_000, tickets("WG", 36)),
        prize("7th", 500, tickets("WH", 108)),
        prize("8th", 100, tickets("WJ", 160)),
    ])
}
