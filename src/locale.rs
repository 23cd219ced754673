//! User-facing strings in the two supported languages.

use chrono::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Polish,
}

impl Locale {
    /// Maps a locale tag (`pl`, `pl_PL`, `en_PL`, `en-US`, ...) to a
    /// supported locale.
    ///
    /// Any tag mentioning Poland or Polish selects Polish, so a device set to
    /// English with a Polish region still gets Polish strings.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase().replace('-', "_");
        if tag.split('_').any(|part| part == "pl") {
            Locale::Polish
        } else {
            Locale::English
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::English => &ENGLISH,
            Locale::Polish => &POLISH,
        }
    }

    /// Two-letter weekday abbreviation used in the week strip header.
    pub fn weekday_short(self, day: Weekday) -> &'static str {
        let names = match self {
            Locale::English => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
            Locale::Polish => ["Pn", "Wt", "Śr", "Cz", "Pt", "Sb", "Nd"],
        };
        names[day.num_days_from_monday() as usize]
    }
}

pub struct Messages {
    pub books_list: &'static str,
    pub no_books: &'static str,
    pub action_save: &'static str,
    pub action_cancel: &'static str,
    pub action_put_aside: &'static str,
    pub action_resume: &'static str,
    pub update_page: &'static str,
    pub state_reading: &'static str,
    pub state_read: &'static str,
    pub state_put_aside: &'static str,
    pub no_calendars: &'static str,
}

static ENGLISH: Messages = Messages {
    books_list: "List of books being read",
    no_books: "No books yet. Add one with `readshift books add`.",
    action_save: "Save",
    action_cancel: "Cancel",
    action_put_aside: "Put aside",
    action_resume: "Resume reading",
    update_page: "Enter page you have stopped reading on",
    state_reading: "reading",
    state_read: "read",
    state_put_aside: "put aside",
    no_calendars: "No shift calendars found.",
};

static POLISH: Messages = Messages {
    books_list: "Lista aktualnie czytanych książek",
    no_books: "Brak książek. Dodaj pierwszą przez `readshift books add`.",
    action_save: "Zapisz",
    action_cancel: "Anuluj",
    action_put_aside: "Odłóż",
    action_resume: "Wznów czytanie",
    update_page: "Podaj stronę na której skończyłeś",
    state_reading: "czytana",
    state_read: "przeczytana",
    state_put_aside: "odłożona",
    no_calendars: "Nie znaleziono grafików.",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polish_region_selects_polish() {
        assert_eq!(Locale::from_tag("en_PL"), Locale::Polish);
        assert_eq!(Locale::from_tag("pl"), Locale::Polish);
        assert_eq!(Locale::from_tag("pl-PL"), Locale::Polish);
        assert_eq!(Locale::from_tag("en_US"), Locale::English);
        assert_eq!(Locale::from_tag("de"), Locale::English);
    }

    #[test]
    fn weekday_names() {
        assert_eq!(Locale::Polish.weekday_short(Weekday::Sun), "Nd");
        assert_eq!(Locale::Polish.weekday_short(Weekday::Wed), "Śr");
        assert_eq!(Locale::English.weekday_short(Weekday::Mon), "Mo");
    }
}
