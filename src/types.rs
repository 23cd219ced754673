use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;
use tabled::Tabled;

use crate::locale::Locale;

/// A book whose reading progress is tracked.
///
/// Page counts are strictly typed. Hand-edited documents may carry them as
/// numeric strings; those are coerced when the document is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_page_count")]
    pub current_page: u32,
    #[serde(default, deserialize_with = "deserialize_page_count")]
    pub text_length: u32,
    #[serde(default)]
    pub starting_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_read_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub put_aside: bool,
}

/// Where a book stands. Derived from the stored fields on every call and
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    Reading,
    Read,
    PutAside,
}

impl BookState {
    pub fn label(self, locale: Locale) -> &'static str {
        let messages = locale.messages();
        match self {
            BookState::Reading => messages.state_reading,
            BookState::Read => messages.state_read,
            BookState::PutAside => messages.state_put_aside,
        }
    }
}

impl Book {
    pub fn new(title: impl Into<String>, text_length: u32, now: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            current_page: 0,
            text_length,
            starting_date: Some(now),
            last_read_date: Some(now),
            put_aside: false,
        }
    }

    /// A page past the end of the book counts as finished.
    pub fn state(&self) -> BookState {
        if self.put_aside {
            BookState::PutAside
        } else if self.current_page >= self.text_length {
            BookState::Read
        } else {
            BookState::Reading
        }
    }

    pub fn is_put_aside(&self) -> bool {
        self.state() == BookState::PutAside
    }

    pub fn is_read(&self) -> bool {
        self.state() == BookState::Read
    }

    pub fn is_being_read(&self) -> bool {
        self.state() == BookState::Reading
    }

    /// Fraction of the book read, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.text_length == 0 {
            return 0.0;
        }
        (f64::from(self.current_page) / f64::from(self.text_length)).clamp(0.0, 1.0)
    }

    /// Current page over total pages, e.g. `13/233`.
    pub fn page_status(&self) -> String {
        format!("{}/{}", self.current_page, self.text_length)
    }
}

/// Accepts a page count as a JSON number or a numeric string.
///
/// Negative values are clamped to zero. Fractions and non-numeric text are
/// rejected so a broken document is reported instead of read as garbage.
fn deserialize_page_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPageCount {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    let clamp = |n: i64| n.clamp(0, i64::from(u32::MAX)) as u32;

    match RawPageCount::deserialize(deserializer)? {
        RawPageCount::Integer(n) => Ok(clamp(n)),
        RawPageCount::Float(f) if f.is_finite() && f.fract() == 0.0 => {
            Ok(clamp(f.clamp(i64::MIN as f64, i64::MAX as f64) as i64))
        }
        RawPageCount::Float(f) => Err(D::Error::custom(format!(
            "page count {f} is not a whole number"
        ))),
        RawPageCount::Text(text) => text
            .trim()
            .parse::<i64>()
            .map(clamp)
            .map_err(|_| D::Error::custom(format!("page count {text:?} is not a number"))),
    }
}

/// The persisted shape of the book collection.
#[derive(Debug, Clone, Serialize)]
pub struct BooksDocument<'a> {
    pub books: &'a [Book],
}

/// One shift calendar: `year -> MM -> DD -> status code`, plus a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftCalendar {
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub years: BTreeMap<String, Value>,
}

/// One cell of a calendar week strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub code: String,
}

#[derive(Tabled)]
pub struct BookTableRow {
    #[tabled(rename = "#")]
    pub index: usize,
    pub title: String,
    pub pages: String,
    pub state: String,
}
