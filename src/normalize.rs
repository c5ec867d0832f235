//! Result Model Normalizer: raw API JSON → [`LotteryResult`].
//!
//! Only the shape of `prizes` is enforced. Everything below it is read
//! leniently because the API is inconsistent about which ticket field it
//! fills in and whether amounts are numbers or strings.

use serde_json::Value;

use crate::model::{Amount, DrawDate, LotteryResult, Prize, Ticket};
use crate::{Error, Result};

/// Normalize the `result` object of a detail response.
pub fn normalize(raw: &Value) -> Result<LotteryResult> {
    let obj = raw
        .as_object()
        .ok_or_else(|| Error::MalformedResult("result is not a JSON object".into()))?;

    let prizes_val = obj
        .get("prizes")
        .ok_or_else(|| Error::MalformedResult("missing `prizes`".into()))?;
    let prizes_arr = prizes_val
        .as_array()
        .ok_or_else(|| Error::MalformedResult("`prizes` is not a list".into()))?;

    let prizes: Vec<Prize> = prizes_arr.iter().map(normalize_prize).collect();

    let result = LotteryResult {
        lottery_name: non_blank_str(obj.get("lottery_name")),
        draw_number: non_blank_str(obj.get("draw_number")),
        date: obj
            .get("date")
            .and_then(Value::as_str)
            .map(DrawDate::parse)
            .unwrap_or(DrawDate::Missing),
        is_bumper: obj.get("is_bumper").and_then(Value::as_bool).unwrap_or(false),
        prizes,
    };

    log::debug!(
        "normalized result {:?}: {} prizes, {} tickets",
        result.draw_number,
        result.prizes.len(),
        result.total_tickets()
    );
    Ok(result)
}

/// Normalize a full detail-endpoint envelope `{ "status": "success", "result": {...} }`.
pub fn normalize_envelope(raw: &Value) -> Result<LotteryResult> {
    check_status(raw)?;
    let result = raw
        .get("result")
        .filter(|v| !v.is_null())
        .ok_or_else(|| Error::MalformedResult("missing `result`".into()))?;
    normalize(result)
}

/// Parse a JSON document and normalize it. Accepts either the bare result
/// object or the detail envelope.
pub fn normalize_str(json: &str) -> Result<LotteryResult> {
    let value: Value = serde_json::from_str(json)?;
    if value.get("status").is_some() {
        normalize_envelope(&value)
    } else {
        normalize(&value)
    }
}

pub(crate) fn check_status(raw: &Value) -> Result<()> {
    match raw.get("status").and_then(Value::as_str) {
        Some("success") => Ok(()),
        Some(other) => Err(Error::MalformedResult(format!(
            "API status is `{}`, expected `success`",
            other
        ))),
        None => Err(Error::MalformedResult("missing `status`".into())),
    }
}

fn normalize_prize(raw: &Value) -> Prize {
    let prize_type = raw
        .get("prize_type")
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    Prize {
        prize_type,
        prize_amount: parse_amount(raw.get("prize_amount")),
        tickets: extract_tickets(raw),
        series_only: extract_series_only(raw),
    }
}

pub(crate) fn parse_amount(raw: Option<&Value>) -> Amount {
    match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Amount::from_rupees)
            .or_else(|| n.as_f64().and_then(Amount::from_f64))
            .unwrap_or(Amount::ZERO),
        Some(Value::String(s)) => Amount::parse(s).unwrap_or(Amount::ZERO),
        _ => Amount::ZERO,
    }
}

/// `tickets` wins when it is a non-empty array, then `ticket_numbers`, then
/// `all_ticket_numbers`.
fn extract_tickets(raw: &Value) -> Vec<Ticket> {
    if let Some(arr) = raw.get("tickets").and_then(Value::as_array) {
        let tickets: Vec<Ticket> = arr.iter().filter_map(ticket_from_value).collect();
        if !tickets.is_empty() {
            return tickets;
        }
    }

    for field in ["ticket_numbers", "all_ticket_numbers"] {
        let tickets: Vec<Ticket> = ticket_strings(raw.get(field))
            .into_iter()
            .map(Ticket::new)
            .collect();
        if !tickets.is_empty() {
            return tickets;
        }
    }
    Vec::new()
}

/// A whitespace-delimited string or an array of such strings.
fn ticket_strings(raw: Option<&Value>) -> Vec<String> {
    match raw {
        Some(Value::String(s)) => split_ticket_numbers(s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .flat_map(split_ticket_numbers)
            .collect(),
        _ => Vec::new(),
    }
}

/// `series_only` as a list of series codes; a string is split on whitespace.
fn extract_series_only(raw: &Value) -> Vec<String> {
    let items: Vec<&str> = match raw.get("series_only") {
        Some(Value::String(s)) => s.split_whitespace().collect(),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn ticket_from_value(raw: &Value) -> Option<Ticket> {
    match raw {
        Value::String(s) => {
            let number = crate::format::collapse_whitespace(s);
            (!number.is_empty()).then(|| Ticket::new(number))
        }
        Value::Object(_) => {
            let number = raw
                .get("ticket_number")
                .and_then(Value::as_str)
                .map(crate::format::collapse_whitespace)
                .filter(|s| !s.is_empty())?;
            Some(Ticket {
                ticket_number: number,
                location: non_blank_str(raw.get("location")),
            })
        }
        _ => None,
    }
}

/// Split a whitespace-delimited ticket string.
///
/// A short all-letter token followed by a token that starts with a digit is a
/// series prefix (`"AB 123456"`) and stays attached to its number.
pub fn split_ticket_numbers(text: &str) -> Vec<String> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let mut out = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];
        let next = tokens.get(i + 1);
        let is_series = (1..=3).contains(&tok.chars().count())
            && tok.chars().all(|c| c.is_alphabetic());
        match next {
            Some(n) if is_series && n.chars().next().is_some_and(|c| c.is_ascii_digit()) => {
                out.push(format!("{} {}", tok, n));
                i += 2;
            }
            _ => {
                out.push(tok.to_string());
                i += 1;
            }
        }
    }
    out
}

pub(crate) fn non_blank_str(raw: Option<&Value>) -> Option<String> {
    raw.and_then(Value::as_str)
        .map(crate::format::collapse_whitespace)
        .filter(|s| !s.is_empty())
}
