mod books;
mod cache;
mod edit;
mod schedule;

pub use books::BOOKS_CACHE_DATABASE_FILENAME;
pub use books::BookError;
pub use books::BookLoad;
pub use books::BookRepository;
pub use books::record_progress;
pub use cache::CacheError;
pub use cache::CacheRead;
pub use cache::CachedValue;
pub use cache::ExpiringFileCache;
pub use cache::sanitize_key;
pub use edit::EditChoice;
pub use edit::EditError;
pub use edit::EditOutcome;
pub use edit::apply_edit;
pub use edit::parse_page;
pub use edit::quick_choices;
pub use schedule::NO_DATA_STATUS;
pub use schedule::ScheduleError;
pub use schedule::ScheduleRepository;
pub use schedule::lookup_status;
pub use schedule::week_strip;
