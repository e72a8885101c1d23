// Utility helpers for parsing, percentages and number formatting.
//
// Loose CSV values (thousands separators, several date layouts, spreadsheet
// serial numbers) are handled here so the rest of the crate only sees
// clean, typed values.
use chrono::{DateTime, Datelike, NaiveDate, TimeDelta};
use num_format::{Locale, ToFormattedString};

/// Parse a unit count, forgiving about the formatting quirks of CSV exports.
///
/// - Trims whitespace and strips `","` thousands separators.
/// - Accepts a decimal like `"12.0"` and truncates it toward zero.
/// - Returns `None` for empty, negative, or non-numeric input.
pub fn parse_units_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(',', "");
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v.trunc() as u64),
        _ => None,
    }
}

/// Trimmed, non-empty text or `None`.
pub fn clean_text(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

/// Serial number of 9999-12-31, the last date spreadsheets can represent.
pub const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Spreadsheet day 0. Serial 1 is 1899-12-31, which absorbs the 1900 leap
/// year bug for every date after February 1900.
fn serial_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 30)
}

/// Parse an import date into `(year, month)`.
///
/// Accepted inputs, tried in order:
/// - a spreadsheet serial day number (`45566`),
/// - full dates in `DATE_FORMATS`,
/// - RFC 3339 timestamps (`2024-10-01T00:00:00Z`),
/// - a bare `YYYY-MM`.
///
/// Any purely numeric cell is read as a serial, so a bare year like `2024`
/// lands in 1905. Serials past `MAX_DATE_SERIAL` (e.g. `20241001`) are
/// rejected rather than guessed at.
pub fn parse_year_month(s: Option<&str>) -> Option<(i32, u32)> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(serial) = s.parse::<f64>() {
        if !serial.is_finite() || !(1.0..=MAX_DATE_SERIAL).contains(&serial) {
            return None;
        }
        let offset = TimeDelta::try_days(serial.trunc() as i64)?;
        let date = serial_epoch()?.checked_add_signed(offset)?;
        return Some((date.year(), date.month()));
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some((d.year(), d.month()));
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some((ts.year(), ts.month()));
    }

    // `YYYY-MM` has no day, so pin it to the first.
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .ok()
        .map(|d| (d.year(), d.month()))
}

/// The calendar month immediately before `(year, month)`.
pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Percentage change from `previous` to `current`.
///
/// Returns 0 when `previous` is 0. That value is shared by "no change" and
/// "no baseline"; callers cannot tell the two apart.
pub fn percent_change(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) * 100.0 / previous as f64
}

/// `part / whole * 100`, or 0 when `whole` is 0.
pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 * 100.0 / whole as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `en` thousands separators, e.g. `1,234,567.89`.
    let s = format!("{:.*}", decimals, n.abs());
    // Sign only when something non-zero survives rounding.
    let neg = n < 0.0 && s.bytes().any(|b| matches!(b, b'1'..=b'9'));
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
