//! The choices offered when the reader updates a book.
//!
//! Independent of how they are presented: the CLI shows them either as flags
//! or as an interactive prompt, and both paths end in [`apply_edit`].

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{management::books::record_progress, types::Book};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditChoice {
    /// Move forward by this many pages.
    Advance(u32),
    /// Free entry. Holds the text the reader typed.
    SetPage(String),
    PutAside,
    Resume,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Changed,
    Unchanged,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("{0:?} is not a page number")]
    NotANumber(String),

    #[error("advancing by zero pages is not an edit")]
    ZeroAdvance,
}

/// Page numbers offered as one-tap choices: `current + 1 ..= current + count`.
pub fn quick_choices(book: &Book, count: u32) -> Vec<u32> {
    (1..=count)
        .map(|step| book.current_page.saturating_add(step))
        .collect()
}

/// Applies `choice` to `book`.
///
/// Nothing is mutated when an error is returned or the choice is
/// [`EditChoice::Cancel`]. The caller persists the collection only on
/// [`EditOutcome::Changed`].
pub fn apply_edit(
    book: &mut Book,
    choice: &EditChoice,
    now: DateTime<Utc>,
) -> Result<EditOutcome, EditError> {
    match choice {
        EditChoice::Advance(0) => Err(EditError::ZeroAdvance),
        EditChoice::Advance(step) => {
            record_progress(book, book.current_page.saturating_add(*step), now);
            Ok(EditOutcome::Changed)
        }
        EditChoice::SetPage(text) => {
            let page = parse_page(text)?;
            record_progress(book, page, now);
            Ok(EditOutcome::Changed)
        }
        EditChoice::PutAside => {
            book.put_aside = true;
            Ok(EditOutcome::Changed)
        }
        EditChoice::Resume => {
            book.put_aside = false;
            Ok(EditOutcome::Changed)
        }
        EditChoice::Cancel => Ok(EditOutcome::Unchanged),
    }
}

pub fn parse_page(text: &str) -> Result<u32, EditError> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| EditError::NotANumber(text.to_string()))
}
