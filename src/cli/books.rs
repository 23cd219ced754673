use chrono::Utc;
use colored::Colorize;
use dialoguer::{Input, Select};
use tabled::Table;

use crate::{
    config::Settings,
    error, info,
    management::{BookRepository, EditChoice, EditOutcome, apply_edit, quick_choices},
    success,
    types::{Book, BookTableRow},
    utils, warning,
};

async fn open_repository(settings: &Settings) -> BookRepository {
    match BookRepository::open(settings).await {
        Ok(repository) => repository,
        Err(e) => error!("Cannot open book storage. Err: {}", e),
    }
}

async fn load_books(repository: &BookRepository) -> Vec<Book> {
    let pb = super::spinner("Loading books...");
    let books = repository.load_all().await;
    pb.finish_and_clear();
    books
}

async fn load_books_for_update(repository: &BookRepository) -> Vec<Book> {
    let pb = super::spinner("Loading books...");
    let loaded = repository.load_for_update().await;
    pb.finish_and_clear();
    match loaded {
        Ok(books) => books,
        Err(e) => error!("Not saving anything. Err: {}", e),
    }
}

pub async fn list_books(settings: &Settings) {
    let repository = open_repository(settings).await;
    let books = load_books(&repository).await;
    let messages = settings.locale.messages();

    if books.is_empty() {
        info!("{}", messages.no_books);
        return;
    }

    let rows: Vec<BookTableRow> = books
        .iter()
        .enumerate()
        .map(|(i, book)| BookTableRow {
            index: i + 1,
            title: book.title.clone(),
            pages: book.page_status(),
            state: book.state().label(settings.locale).to_string(),
        })
        .collect();

    println!("{}\n{}", messages.books_list.bold(), Table::new(rows));
}

pub async fn books_widget(settings: &Settings) {
    let repository = open_repository(settings).await;
    let books = load_books(&repository).await;

    if books.is_empty() {
        info!("{}", settings.locale.messages().no_books);
        return;
    }

    for book in &books {
        println!("{}", book.title.magenta().bold());
        println!(
            "{} {}\n",
            utils::progress_bar(book.progress(), settings.bar_width).yellow(),
            book.page_status()
        );
    }
}

pub async fn add_book(settings: &Settings, title: String, pages: u32) {
    let title = title.trim();
    if title.is_empty() {
        error!("A book needs a title.");
    }

    let repository = open_repository(settings).await;
    let mut books = load_books_for_update(&repository).await;
    let index = repository.add(&mut books, title, pages);

    match repository.save_all(&books).await {
        Ok(()) => success!("Added #{} {} ({} pages)", index + 1, title, pages),
        Err(e) => error!("Cannot save books. Err: {}", e),
    }
}

/// Edits the book at `index` (1-based, as shown by `readshift books`).
///
/// Without a `choice` the reader is asked interactively.
pub async fn edit_book(settings: &Settings, index: usize, choice: Option<EditChoice>) {
    let repository = open_repository(settings).await;
    let mut books = load_books_for_update(&repository).await;

    let Some(book) = index.checked_sub(1).and_then(|i| books.get_mut(i)) else {
        error!("There is no book #{}. Run readshift books to see the list.", index);
    };

    let choice = match choice {
        Some(choice) => choice,
        None => prompt_choice(book, settings),
    };

    let previous = book.page_status();
    match apply_edit(book, &choice, Utc::now()) {
        Ok(EditOutcome::Unchanged) => {
            info!("Nothing changed.");
            return;
        }
        Ok(EditOutcome::Changed) => {
            info!("{}: {} -> {}", book.title, previous, book.page_status());
        }
        Err(e) => {
            warning!("{}", e);
            return;
        }
    }

    match repository.save_all(&books).await {
        Ok(()) => success!("Saved."),
        Err(e) => error!("Cannot save books. Err: {}", e),
    }
}

fn prompt_choice(book: &Book, settings: &Settings) -> EditChoice {
    let messages = settings.locale.messages();
    let quick = quick_choices(book, settings.quick_increments);

    let mut items: Vec<String> = quick.iter().map(|page| page.to_string()).collect();
    items.push(messages.action_save.to_string());
    items.push(if book.put_aside {
        messages.action_resume.to_string()
    } else {
        messages.action_put_aside.to_string()
    });
    items.push(messages.action_cancel.to_string());

    let prompt = format!("{} ({})", book.title, book.page_status());
    let selected = match Select::new()
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact_opt()
    {
        Ok(selected) => selected,
        Err(e) => {
            warning!("Prompt failed: {}", e);
            None
        }
    };

    let quick_count = quick.len();
    match selected {
        Some(i) if i < quick_count => EditChoice::Advance((i + 1) as u32),
        Some(i) if i == quick_count => {
            match Input::<String>::new()
                .with_prompt(messages.update_page)
                .with_initial_text(book.current_page.to_string())
                .interact_text()
            {
                Ok(text) => EditChoice::SetPage(text),
                Err(e) => {
                    warning!("Prompt failed: {}", e);
                    EditChoice::Cancel
                }
            }
        }
        Some(i) if i == quick_count + 1 && book.put_aside => EditChoice::Resume,
        Some(i) if i == quick_count + 1 => EditChoice::PutAside,
        _ => EditChoice::Cancel,
    }
}
