use chrono::{Duration, Local, NaiveDate, Utc};
use readshift::types::Book;
use readshift::utils::*;

#[test]
fn test_zero_pad() {
    assert_eq!(zero_pad(6, 2), "06");
    assert_eq!(zero_pad(15, 2), "15");
    assert_eq!(zero_pad(123, 2), "123");
}

#[test]
fn test_days_from() {
    let start = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
    let days = days_from(start, 4);

    assert_eq!(days.len(), 4);
    assert_eq!(days[0], start);
    // leap year
    assert_eq!(days[2], NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(days[3], NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert!(days_from(start, 0).is_empty());
}

#[test]
fn test_yesterday() {
    assert_eq!(yesterday(), Local::now().date_naive() - Duration::days(1));
}

#[test]
fn test_get_date_from_string() {
    let default = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();

    let valid = get_date_from_string(Some("2024-06-15".to_string()), default);
    assert_eq!(valid, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());

    assert_eq!(get_date_from_string(None, default), default);
    assert_eq!(
        get_date_from_string(Some("15.06.2024".to_string()), default),
        default
    );
}

#[test]
fn test_display_name() {
    assert_eq!(display_name("shift-a.json"), "shift-a");
    assert_eq!(display_name("archive.2024.json"), "archive.2024");
    assert_eq!(display_name("plain"), "plain");
    assert_eq!(display_name(".json"), ".json");
}

#[test]
fn test_progress_bar() {
    assert_eq!(progress_bar(0.0, 4), "░░░░");
    assert_eq!(progress_bar(0.5, 4), "██░░");
    assert_eq!(progress_bar(1.0, 4), "████");
    assert_eq!(progress_bar(7.0, 4), "████");
    assert_eq!(progress_bar(f64::NAN, 4), "░░░░");
    assert_eq!(progress_bar(0.3, 10).chars().count(), 10);
}

#[test]
fn test_book_progress_and_page_status() {
    let mut book = Book::new("Dune", 612, Utc::now());
    assert_eq!(book.page_status(), "0/612");
    assert_eq!(book.progress(), 0.0);

    book.current_page = 306;
    assert_eq!(book.page_status(), "306/612");
    assert!((book.progress() - 0.5).abs() < f64::EPSILON);

    book.current_page = 700;
    assert_eq!(book.progress(), 1.0);

    book.text_length = 0;
    assert_eq!(book.progress(), 0.0);
}
