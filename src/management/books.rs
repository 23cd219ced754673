use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    config::Settings,
    management::cache::{CacheError, CacheRead, CachedValue, ExpiringFileCache},
    info,
    types::{Book, BooksDocument},
    warning,
};

pub const BOOKS_CACHE_DATABASE_FILENAME: &str = "books_progress_db.json";
const CORRUPT_SUFFIX: &str = "corrupt-";

#[derive(Debug, Error)]
pub enum BookError {
    #[error("book database is unusable ({0}) and no copy of it could be kept")]
    Unprotected(String),
}

/// Result of loading the book collection.
#[derive(Debug)]
pub enum BookLoad {
    Loaded(Vec<Book>),
    /// No document has been written yet.
    Empty,
    /// A document exists but cannot be used. The reason is human readable.
    Malformed(String),
}

/// Loads and saves the whole book collection as one JSON document.
///
/// The collection is the unit of persistence: changing one book means
/// saving all of them. Mutating helpers never persist on their own, so a
/// caller editing several books writes once.
pub struct BookRepository {
    cache: ExpiringFileCache,
}

impl BookRepository {
    pub fn new(cache: ExpiringFileCache) -> Self {
        Self { cache }
    }

    pub async fn open(settings: &Settings) -> Result<Self, CacheError> {
        let cache = ExpiringFileCache::open(&settings.documents_dir, &settings.books_namespace)
            .await?;
        Ok(Self::new(cache))
    }

    pub fn cache(&self) -> &ExpiringFileCache {
        &self.cache
    }

    /// Loads the collection, telling apart "nothing saved yet" from "saved
    /// but unusable".
    ///
    /// An unusable document is copied aside before this returns, so a later
    /// [`save_all`](Self::save_all) cannot destroy the only copy.
    pub async fn load(&self) -> BookLoad {
        self.load_checked().await.0
    }

    /// Loads the collection, falling back to an empty one for any problem.
    pub async fn load_all(&self) -> Vec<Book> {
        match self.load().await {
            BookLoad::Loaded(books) => books,
            BookLoad::Empty => {
                warning!("No books saved yet in {}", self.cache.dir().display());
                Vec::new()
            }
            BookLoad::Malformed(reason) => {
                warning!("Can't read db file: {}", reason);
                Vec::new()
            }
        }
    }

    /// Loads the collection for a caller that is going to save it again.
    ///
    /// An unusable document is only replaced by an empty collection when a
    /// copy of it exists on disk. Otherwise this fails and nothing may be
    /// saved.
    pub async fn load_for_update(&self) -> Result<Vec<Book>, BookError> {
        match self.load_checked().await {
            (BookLoad::Loaded(books), _) => Ok(books),
            (BookLoad::Empty, _) => Ok(Vec::new()),
            (BookLoad::Malformed(reason), true) => {
                warning!("Can't read db file, starting a new one: {}", reason);
                Ok(Vec::new())
            }
            (BookLoad::Malformed(reason), false) => Err(BookError::Unprotected(reason)),
        }
    }

    /// The load outcome and whether the stored document may be overwritten.
    async fn load_checked(&self) -> (BookLoad, bool) {
        // progress must never silently vanish, so no TTL here
        let outcome = match self.cache.read(BOOKS_CACHE_DATABASE_FILENAME, None).await {
            CacheRead::Fresh(CachedValue::Json(value)) => parse_books(value),
            CacheRead::Fresh(CachedValue::Text(_)) => {
                BookLoad::Malformed("document is not valid JSON".to_string())
            }
            CacheRead::Missing | CacheRead::Expired => BookLoad::Empty,
            CacheRead::Failed(e) => BookLoad::Malformed(e.to_string()),
        };

        let backed_up = match &outcome {
            BookLoad::Malformed(reason) => self.preserve_corrupt(reason).await,
            _ => true,
        };
        (outcome, backed_up)
    }

    /// Replaces the stored document with `books`.
    pub async fn save_all(&self, books: &[Book]) -> Result<(), CacheError> {
        self.cache
            .write(BOOKS_CACHE_DATABASE_FILENAME, &BooksDocument { books })
            .await
    }

    /// Records that the reader stopped at `page` just now.
    pub fn apply_page_update(&self, book: &mut Book, page: u32) {
        record_progress(book, page, Utc::now());
    }

    pub fn put_aside(&self, book: &mut Book) {
        book.put_aside = true;
    }

    pub fn resume(&self, book: &mut Book) {
        book.put_aside = false;
    }

    /// Appends a new book at page zero and returns its index.
    pub fn add(&self, books: &mut Vec<Book>, title: &str, text_length: u32) -> usize {
        books.push(Book::new(title, text_length, Utc::now()));
        books.len() - 1
    }

    /// Keeps a copy of the unusable document unless an identical copy is
    /// already there. Returns whether a copy exists afterwards.
    async fn preserve_corrupt(&self, reason: &str) -> bool {
        let path = self.cache.dir().join(BOOKS_CACHE_DATABASE_FILENAME);
        let contents = match async_fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) => {
                warning!(
                    "Book database is unusable ({}) and cannot be copied: {}",
                    reason,
                    e
                );
                return false;
            }
        };

        if let Some(existing) = self.find_backup(&contents).await {
            info!(
                "Book database is unusable ({}); already kept at {}",
                reason,
                existing.display()
            );
            return true;
        }

        let suffix = format!("{}{}", CORRUPT_SUFFIX, Utc::now().format("%Y%m%dT%H%M%S%.3f"));
        match self
            .cache
            .preserve(BOOKS_CACHE_DATABASE_FILENAME, &suffix)
            .await
        {
            Ok(path) => {
                warning!(
                    "Book database is unusable ({}); a copy was kept at {}",
                    reason,
                    path.display()
                );
                true
            }
            Err(e) => {
                warning!("Cannot keep a copy of the unusable book database: {}", e);
                false
            }
        }
    }

    async fn find_backup(&self, contents: &[u8]) -> Option<PathBuf> {
        let prefix = format!("{}.{}", BOOKS_CACHE_DATABASE_FILENAME, CORRUPT_SUFFIX);
        let keys = match self.cache.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                warning!("Cannot list existing copies: {}", e);
                return None;
            }
        };

        for key in keys.iter().filter(|k| k.starts_with(&prefix)) {
            let path = self.cache.dir().join(key);
            if let Ok(existing) = async_fs::read(&path).await {
                if existing == contents {
                    return Some(path);
                }
            }
        }
        None
    }
}

/// Sets the current page and stamps the last read date. The put-aside flag is
/// left alone.
pub fn record_progress(book: &mut Book, page: u32, now: DateTime<Utc>) {
    book.current_page = page;
    book.last_read_date = Some(now);
}

fn parse_books(mut document: serde_json::Value) -> BookLoad {
    let Some(books) = document.get_mut("books").map(serde_json::Value::take) else {
        return BookLoad::Malformed("document has no \"books\" field".to_string());
    };

    match serde_json::from_value::<Vec<Book>>(books) {
        Ok(books) => BookLoad::Loaded(books),
        Err(e) => BookLoad::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_books_requires_books_field() {
        assert!(matches!(
            parse_books(json!({"items": []})),
            BookLoad::Malformed(_)
        ));
        assert!(matches!(parse_books(json!([])), BookLoad::Malformed(_)));
    }

    #[test]
    fn parse_books_coerces_string_pages() {
        let load = parse_books(json!({
            "books": [{"title": "X", "currentPage": "12", "textLength": 300}]
        }));
        let BookLoad::Loaded(books) = load else {
            panic!("expected books");
        };
        assert_eq!(books[0].current_page, 12);
        assert_eq!(books[0].text_length, 300);
        assert!(!books[0].put_aside);
    }

    #[test]
    fn parse_books_rejects_non_numeric_pages() {
        let load = parse_books(json!({
            "books": [{"title": "X", "currentPage": "twelve", "textLength": 300}]
        }));
        assert!(matches!(load, BookLoad::Malformed(_)));
    }

    #[test]
    fn record_progress_keeps_put_aside() {
        let now = Utc::now();
        let mut book = Book::new("X", 100, now);
        book.put_aside = true;
        record_progress(&mut book, 40, now);
        assert_eq!(book.current_page, 40);
        assert_eq!(book.last_read_date, Some(now));
        assert!(book.put_aside);
    }
}
