//! Reading progress and shift calendar tracker library
//!
//! This library keeps two small personal data sets in a synced folder: the
//! progress of the books currently being read and one or more work-shift
//! calendars. Both are stored as JSON documents behind a namespaced,
//! optionally expiring file cache.
//!
//! # Modules
//!
//! - `cli` - Command-line views (widget, app table, edit prompts)
//! - `config` - `.env` loading and the explicit [`config::Settings`]
//! - `locale` - English and Polish user-facing strings
//! - `management` - File cache plus the book and schedule repositories
//! - `types` - Persisted documents and derived presentation data
//! - `utils` - Date and formatting helpers
//!
//! # Example
//!
//! ```
//! use readshift::{config::Settings, management::BookRepository};
//!
//! #[tokio::main]
//! async fn main() -> readshift::Res<()> {
//!     let settings = Settings::from_env();
//!     let repository = BookRepository::open(&settings).await?;
//!     for book in repository.load_all().await {
//!         println!("{} {}", book.title, book.page_status());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod locale;
pub mod management;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the command-line glue where errors from several components meet.
/// The repositories themselves return their own typed errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Caching to {}...", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only the binary uses this. Library code reports problems through
/// [`warning!`] and returns an error or a degraded value instead.
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable problems such as an unreadable cache entry that is
/// treated as missing.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
