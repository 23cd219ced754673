//! Configuration management for readshift.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Every value has a default, so a
//! fresh install works without any configuration at all:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Defaults from [`Settings::default`]

use std::{env, path::PathBuf, str::FromStr};

use crate::{Res, locale::Locale};

pub const BOOKS_CACHE_DIRECTORY: &str = "BooksProgress";
pub const SHIFT_CALENDAR_DIRECTORY: &str = "ShiftCalendar";
pub const DEFAULT_CALENDAR_EXTENSION: &str = "json";
pub const DEFAULT_QUICK_INCREMENTS: u32 = 5;
pub const DEFAULT_BAR_WIDTH: usize = 32;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates `readshift/` under the platform data directory if needed and
/// reads `readshift/.env` from it:
/// - Linux: `~/.local/share/readshift/.env`
/// - macOS: `~/Library/Application Support/readshift/.env`
/// - Windows: `%LOCALAPPDATA%/readshift/.env`
///
/// A missing `.env` file is not an error; the defaults apply.
///
/// # Errors
///
/// Fails if the directory cannot be created or if an existing `.env` file
/// cannot be parsed.
pub async fn load_env() -> Res<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// The readshift directory inside the platform's local data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("readshift");
    path
}

/// Everything an invocation needs to know to build its repositories and
/// render its views.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Root folder holding one sub-directory per cache namespace.
    pub documents_dir: PathBuf,
    /// Namespace of the book progress document.
    pub books_namespace: String,
    /// Namespace holding one document per shift calendar.
    pub calendar_namespace: String,
    /// Only files with this extension are treated as calendars. Empty
    /// disables the filter.
    pub calendar_extension: String,
    pub locale: Locale,
    /// Number of `+1 ..= +N` quick choices offered when editing a book.
    pub quick_increments: u32,
    /// Width in characters of the widget progress bars.
    pub bar_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            documents_dir: data_dir().join("documents"),
            books_namespace: BOOKS_CACHE_DIRECTORY.to_string(),
            calendar_namespace: SHIFT_CALENDAR_DIRECTORY.to_string(),
            calendar_extension: DEFAULT_CALENDAR_EXTENSION.to_string(),
            locale: Locale::default(),
            quick_increments: DEFAULT_QUICK_INCREMENTS,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }
}

impl Settings {
    /// Builds settings from the `READSHIFT_*` environment variables.
    ///
    /// Unset, empty or unparsable variables keep their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            documents_dir: get("READSHIFT_DOCUMENTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.documents_dir),
            books_namespace: get("READSHIFT_BOOKS_DIR").unwrap_or(defaults.books_namespace),
            calendar_namespace: get("READSHIFT_CALENDAR_DIR")
                .unwrap_or(defaults.calendar_namespace),
            // an explicitly empty value disables the filter, so it is read raw
            calendar_extension: lookup("READSHIFT_CALENDAR_EXT")
                .map(|v| v.trim().trim_start_matches('.').to_string())
                .unwrap_or(defaults.calendar_extension),
            locale: get("READSHIFT_LOCALE")
                .map(|v| Locale::from_tag(&v))
                .unwrap_or(defaults.locale),
            quick_increments: parse_or(get("READSHIFT_QUICK_INCREMENTS"), defaults.quick_increments)
                .max(1),
            bar_width: parse_or(get("READSHIFT_BAR_WIDTH"), defaults.bar_width).max(1),
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}
