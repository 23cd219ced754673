use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::{
    config::Settings,
    locale::Locale,
    management::cache::{CacheError, CacheRead, CachedValue, ExpiringFileCache},
    types::{DayStatus, ShiftCalendar},
    utils, warning,
};

/// Status shown for a day the calendar has no entry for.
pub const NO_DATA_STATUS: &str = "E";

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("calendar {0:?} not found")]
    NotFound(String),

    #[error("calendar {name:?} is malformed: {reason}")]
    Malformed { name: String, reason: String },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Reads the shift calendars kept in one cache namespace, one file each.
pub struct ScheduleRepository {
    cache: ExpiringFileCache,
    extension: String,
}

impl ScheduleRepository {
    /// `extension` selects which files count as calendars; an empty string
    /// accepts every file.
    pub fn new(cache: ExpiringFileCache, extension: &str) -> Self {
        Self {
            cache,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub async fn open(settings: &Settings) -> Result<Self, CacheError> {
        let cache =
            ExpiringFileCache::open(&settings.documents_dir, &settings.calendar_namespace).await?;
        Ok(Self::new(cache, &settings.calendar_extension))
    }

    pub fn cache(&self) -> &ExpiringFileCache {
        &self.cache
    }

    /// File names of the calendars in the namespace, sorted. Hidden files and
    /// files without the configured extension are skipped.
    pub async fn list_calendars(&self) -> Result<Vec<String>, ScheduleError> {
        let keys = self.cache.keys().await?;
        Ok(keys
            .into_iter()
            .filter(|name| !name.starts_with('.'))
            .filter(|name| self.has_calendar_extension(name))
            .collect())
    }

    pub async fn load_calendar(&self, name: &str) -> Result<ShiftCalendar, ScheduleError> {
        let value = match self.cache.read(name, None).await {
            CacheRead::Fresh(CachedValue::Json(value)) => value,
            CacheRead::Fresh(CachedValue::Text(_)) => {
                return Err(ScheduleError::Malformed {
                    name: name.to_string(),
                    reason: "not valid JSON".to_string(),
                });
            }
            CacheRead::Missing | CacheRead::Expired => {
                return Err(ScheduleError::NotFound(name.to_string()));
            }
            CacheRead::Failed(e) => return Err(e.into()),
        };

        let mut calendar: ShiftCalendar =
            serde_json::from_value(value).map_err(|e| ScheduleError::Malformed {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        if calendar.title.trim().is_empty() {
            calendar.title = utils::display_name(name);
        }
        Ok(calendar)
    }

    /// Loads every listed calendar, skipping the ones that cannot be read.
    pub async fn load_all(&self) -> Result<Vec<(String, ShiftCalendar)>, ScheduleError> {
        let mut calendars = Vec::new();
        for name in self.list_calendars().await? {
            match self.load_calendar(&name).await {
                Ok(calendar) => calendars.push((name, calendar)),
                Err(e) => warning!("Skipping calendar: {}", e),
            }
        }
        Ok(calendars)
    }

    fn has_calendar_extension(&self, name: &str) -> bool {
        if self.extension.is_empty() {
            return true;
        }
        name.rsplit_once('.')
            .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Status code for `date`, or [`NO_DATA_STATUS`] when any part of the
/// `year -> MM -> DD` path is missing or the entry is not a string.
pub fn lookup_status(calendar: &ShiftCalendar, date: NaiveDate) -> String {
    let month = utils::zero_pad(date.month(), 2);
    let day = utils::zero_pad(date.day(), 2);

    calendar
        .years
        .get(&date.year().to_string())
        .and_then(|months| months.get(&month))
        .and_then(|days| days.get(&day))
        .and_then(|code| code.as_str())
        .unwrap_or(NO_DATA_STATUS)
        .to_string()
}

/// Seven consecutive days starting at `start`.
pub fn week_strip(calendar: &ShiftCalendar, start: NaiveDate, locale: Locale) -> Vec<DayStatus> {
    utils::days_from(start, 7)
        .into_iter()
        .map(|date| DayStatus {
            date,
            weekday: locale.weekday_short(date.weekday()),
            code: lookup_status(calendar, date),
        })
        .collect()
}
