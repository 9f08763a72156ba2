// Utility functions
use chrono::{DateTime, Utc};

const CURRENCY_SYMBOLS: [&str; 4] = ["₹", "€", "£", "$"];

/// Formats a scraped price string such as `"$1234.5"` or `"€10 - €20"`.
///
/// The first known currency symbol wins (`$` when none is present); numbers get two
/// decimals and Indian digit grouping, ranges are formatted part by part.
pub fn format_price(raw: &str) -> String {
    if raw.is_empty() {
        return "Price not available".to_string();
    }

    let (symbol, rest) = match CURRENCY_SYMBOLS.iter().find(|s| raw.contains(*s)) {
        Some(symbol) => (*symbol, raw.replacen(symbol, "", 1).trim().to_string()),
        None => ("$", raw.to_string()),
    };

    if rest.contains('-') || rest.contains('~') {
        return rest
            .split(['-', '~'])
            .map(str::trim)
            .map(|part| match parse_leading_number(part) {
                Some(value) => format!("{}{}", symbol, group_amount(value)),
                None => format!("{}{}", symbol, part),
            })
            .collect::<Vec<_>>()
            .join(" - ");
    }

    match parse_leading_number(&rest) {
        Some(value) => format!("{}{}", symbol, group_amount(value)),
        None => "Invalid price".to_string(),
    }
}

/// Numeric value of a price string, 0 when nothing parses.
pub fn parse_price(raw: &str) -> f64 {
    parse_leading_number(raw).unwrap_or(0.0)
}

/// Reads the leading decimal number after dropping everything but digits and dots.
fn parse_leading_number(raw: &str) -> Option<f64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();

    let mut seen_dot = false;
    let number: String = digits
        .chars()
        .take_while(|&c| {
            if c == '.' {
                if seen_dot {
                    return false;
                }
                seen_dot = true;
            }
            true
        })
        .collect();

    if !number.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    number.parse().ok()
}

/// `1234567.891` -> `12,34,567.89`
fn group_amount(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    if int_part.len() <= 3 {
        return format!("{}.{}", int_part, frac_part);
    }

    let (head, last3) = int_part.split_at(int_part.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}.{}", groups.join(","), last3, frac_part)
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

const MAX_DUMP_NAME: usize = 120;

/// File name for an HTML debug dump: host and path only, sanitized and capped in length.
pub fn debug_dump_name(url: &str) -> String {
    let source = match reqwest::Url::parse(url) {
        Ok(parsed) => format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path()),
        Err(_) => url.to_string(),
    };
    let name: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_DUMP_NAME)
        .collect();
    format!("debug-{}.html", name)
}
