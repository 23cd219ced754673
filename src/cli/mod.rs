//! # CLI Module
//!
//! Terminal views over the two data sets. Each command builds the repository
//! it needs from [`Settings`](crate::config::Settings), loads the documents,
//! derives display data and prints it. Nothing here touches files directly.
//!
//! ## Books
//!
//! - [`list_books`] - app view: table of every book with its pages and state
//! - [`books_widget`] - compact view: title and progress bar per book
//! - [`add_book`] - append a book to the collection
//! - [`edit_book`] - apply an edit from flags or an interactive prompt
//!
//! ## Shift calendars
//!
//! - [`shifts`] - week strip for every calendar
//! - [`shift_status`] - status code of one calendar on one day
//!
//! ## Usage
//!
//! ```bash
//! readshift books add --title "Dune" --pages 612
//! readshift books edit 1 --advance 20
//! readshift books widget
//! readshift shifts --from 2024-06-14
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

mod books;
mod shifts;

pub use books::add_book;
pub use books::books_widget;
pub use books::edit_book;
pub use books::list_books;
pub use shifts::shift_status;
pub use shifts::shifts;

/// Spinner shown while documents are pulled from the synced folder, which
/// can stall until the sync client has downloaded them.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
