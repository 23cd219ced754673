use chrono::{Duration, Local, NaiveDate};

pub fn zero_pad(num: u32, places: usize) -> String {
    format!("{num:0places$}")
}

/// `count` consecutive dates starting at `start`.
pub fn days_from(start: NaiveDate, count: u32) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| start + Duration::days(i64::from(i)))
        .collect()
}

pub fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

/// Parses a `YYYY-MM-DD` date, using `default` when it is absent or invalid.
pub fn get_date_from_string(date: Option<String>, default: NaiveDate) -> NaiveDate {
    match date {
        Some(date_str) => {
            NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").unwrap_or(default)
        }
        None => default,
    }
}

/// A calendar file name without its extension, e.g. `shift-a.json` -> `shift-a`.
pub fn display_name(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

/// A text progress bar `width` characters wide.
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (fraction * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
