//! Text formatting shared by every backend: currency, dates, file names, series.
//!
//! Everything here is deliberately locale-free so output is reproducible on
//! any host.

use crate::model::{Amount, DrawDate};

/// Group an integer rupee amount with the Indian convention: the last three
/// digits form one group, every group to the left of it has two digits.
///
/// ```
/// assert_eq!(klbulletin::format::format_amount(10_000_000), "1,00,00,000");
/// assert_eq!(klbulletin::format::format_amount(4_500), "4,500");
/// ```
pub fn format_amount(rupees: u64) -> String {
    let digits = rupees.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    // Walk the head from the left; the first group takes the odd digit if any.
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    let first = head.len() % 2;
    if first == 1 {
        out.push_str(&head[..1]);
    }
    for (i, pair) in head.as_bytes()[first..].chunks(2).enumerate() {
        if i > 0 || first == 1 {
            out.push(',');
        }
        out.push(pair[0] as char);
        out.push(pair[1] as char);
    }
    out.push(',');
    out.push_str(tail);
    out
}

/// Format an [`Amount`]; paise are shown only when non-zero.
pub fn format_money(amount: Amount) -> String {
    if amount.paise == 0 {
        format_amount(amount.rupees)
    } else {
        format!("{}.{:02}", format_amount(amount.rupees), amount.paise)
    }
}

/// Amount text used in prize section headers: `Rs. 1,00,000/-`.
pub fn amount_label(amount: Amount) -> String {
    format!("Rs. {}/-", format_money(amount))
}

/// `DD-MM-YYYY` for parsed dates, the raw text otherwise, `placeholder` when absent.
pub fn format_draw_date(date: &DrawDate, placeholder: &str) -> String {
    match date {
        DrawDate::Parsed(d) => d.format("%d-%m-%Y").to_string(),
        DrawDate::Raw(raw) => collapse_whitespace(raw),
        DrawDate::Missing => placeholder.to_string(),
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only ASCII alphanumerics.
pub fn sanitize_component(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Deterministic output file name: `{name}_{date}.{extension}`, both parts
/// stripped of every non-alphanumeric character.
pub fn document_file_name(lottery_name: &str, date_text: &str, extension: &str) -> String {
    format!("{}.{}", document_file_stem(lottery_name, date_text), extension)
}

/// [`document_file_name`] without the extension.
pub fn document_file_stem(lottery_name: &str, date_text: &str) -> String {
    let mut name = sanitize_component(lottery_name);
    if name.is_empty() {
        name = "lottery".to_string();
    }
    let date = sanitize_component(date_text);
    if date.is_empty() {
        name
    } else {
        format!("{}_{}", name, date)
    }
}

/// Series of a ticket: its first two characters.
pub fn series_of(ticket_number: &str) -> String {
    ticket_number.trim().chars().take(2).collect()
}

/// Distinct series of the given tickets, in first-seen order.
pub fn distinct_series<'a>(tickets: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for t in tickets {
        let s = series_of(t);
        if !s.is_empty() && !seen.contains(&s) {
            seen.push(s);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn indian_grouping() {
        assert_eq!(format_amount(0), "0");
        assert_eq!(format_amount(999), "999");
        assert_eq!(format_amount(1000), "1,000");
        assert_eq!(format_amount(4500), "4,500");
        assert_eq!(format_amount(10000), "10,000");
        assert_eq!(format_amount(100000), "1,00,000");
        assert_eq!(format_amount(7500000), "75,00,000");
        assert_eq!(format_amount(10000000), "1,00,00,000");
        assert_eq!(format_amount(250000000), "25,00,00,000");
        assert_eq!(format_amount(1234567890), "1,23,45,67,890");
    }

    #[test]
    fn money_shows_paise_only_when_present() {
        assert_eq!(format_money(Amount::from_rupees(5000)), "5,000");
        assert_eq!(format_money(Amount { rupees: 5000, paise: 5 }), "5,000.05");
        assert_eq!(amount_label(Amount::from_rupees(100000)), "Rs. 1,00,000/-");
    }

    #[test]
    fn draw_date_formatting() {
        let d = DrawDate::Parsed(NaiveDate::from_ymd_opt(2025, 7, 17).unwrap());
        assert_eq!(format_draw_date(&d, "N/A"), "17-07-2025");
        assert_eq!(format_draw_date(&DrawDate::Missing, "N/A"), "N/A");
        assert_eq!(
            format_draw_date(&DrawDate::Raw("next   week".into()), "N/A"),
            "next week"
        );
    }

    #[test]
    fn file_names_strip_punctuation() {
        assert_eq!(
            document_file_name("KARUNYA PLUS", "17-07-2025", "pdf"),
            "KARUNYAPLUS_17072025.pdf"
        );
        assert_eq!(document_file_name("", "", "html"), "lottery.html");
        assert_eq!(document_file_name("Win-Win!", "", "pdf"), "WinWin.pdf");
    }

    #[test]
    fn series_are_distinct_in_order() {
        let tickets = ["KA 123456", "KB 222222", "KA 999999", "KC 000001"];
        assert_eq!(distinct_series(tickets), vec!["KA", "KB", "KC"]);
    }
}
