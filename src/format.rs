//! Display formatting helpers
//!
//! Pure input-to-output transforms used by every view. Absent values render
//! as "N/A" so panels never have to special-case missing backend fields.

use chrono::{DateTime, Utc};
use market_client::Signal;
use ratatui::style::Color;

/// Group an unsigned integer-part string with comma thousands separators
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*c);
    }
    out
}

/// Fixed-decimal number with thousands separators, e.g. 1234.5 -> "1,234.50"
fn grouped_fixed(val: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, val.abs());
    match fixed.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", group_thousands(int_part), frac_part),
        None => group_thousands(&fixed),
    }
}

/// Currency with explicit sign, two decimals: -42.5 -> "-$42.50"
pub fn format_currency(val: Option<f64>) -> String {
    match val {
        Some(v) if v.is_finite() => {
            let prefix = if v < 0.0 { "-$" } else { "$" };
            format!("{}{}", prefix, grouped_fixed(v, 2))
        }
        _ => "N/A".to_string(),
    }
}

/// Percent with explicit "+" for positive values: 3.456 -> "+3.46%"
pub fn format_percent(val: Option<f64>, decimals: usize) -> String {
    match val {
        Some(v) if v.is_finite() => {
            let sign = if v > 0.0 { "+" } else { "" };
            format!("{}{:.*}%", sign, decimals, v)
        }
        _ => "N/A".to_string(),
    }
}

/// Compact large numbers: K/M/B suffixes at 1e3/1e6/1e9
pub fn format_compact(val: Option<f64>) -> String {
    let v = match val {
        Some(v) if v.is_finite() => v,
        _ => return "N/A".to_string(),
    };

    if v.abs() >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if v.abs() >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if v.abs() >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else if v == v.trunc() {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

/// Grouped fixed-decimal number with sign for negatives
pub fn format_number(val: Option<f64>, decimals: usize) -> String {
    match val {
        Some(v) if v.is_finite() => {
            let sign = if v < 0.0 { "-" } else { "" };
            format!("{}{}", sign, grouped_fixed(v, decimals))
        }
        _ => "N/A".to_string(),
    }
}

/// Profit/loss with semantic color: gains green, losses red
pub fn format_pl(val: Option<f64>) -> (String, Color) {
    match val {
        Some(v) if v.is_finite() => {
            if v > 0.0 {
                (format!("+${:.2}", v.abs()), Color::Green)
            } else if v < 0.0 {
                (format!("-${:.2}", v.abs()), Color::Red)
            } else {
                ("$0.00".to_string(), Color::Gray)
            }
        }
        _ => ("N/A".to_string(), Color::DarkGray),
    }
}

/// Relative time for news timestamps: "just now", "Nm ago", "Nh ago", "Nd ago"
pub fn time_ago(date_str: &str) -> String {
    if date_str.is_empty() {
        return String::new();
    }

    let parsed = match DateTime::parse_from_rfc3339(date_str) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => return String::new(),
    };

    let diff_min = (Utc::now() - parsed).num_minutes();
    if diff_min < 1 {
        return "just now".to_string();
    }
    if diff_min < 60 {
        return format!("{}m ago", diff_min);
    }
    let diff_hr = diff_min / 60;
    if diff_hr < 24 {
        return format!("{}h ago", diff_hr);
    }
    format!("{}d ago", diff_hr / 24)
}

/// Map a backend signal to a terminal color
pub fn signal_color(signal: Signal) -> Color {
    match signal {
        Signal::Bullish => Color::Green,
        Signal::Bearish => Color::Red,
        Signal::Neutral | Signal::Unknown => Color::DarkGray,
    }
}
