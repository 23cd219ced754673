use chrono::{Local, NaiveDate};
use colored::Colorize;
use tabled::builder::Builder;

use crate::{
    config::Settings,
    error, info,
    management::{ScheduleError, ScheduleRepository, lookup_status, week_strip},
    utils,
};

async fn open_repository(settings: &Settings) -> ScheduleRepository {
    match ScheduleRepository::open(settings).await {
        Ok(repository) => repository,
        Err(e) => error!("Cannot open shift calendar storage. Err: {}", e),
    }
}

/// Prints a week strip for every calendar, starting at `from` (yesterday by
/// default).
pub async fn shifts(settings: &Settings, from: Option<String>) {
    let repository = open_repository(settings).await;
    let start = utils::get_date_from_string(from, utils::yesterday());

    let pb = super::spinner("Loading shift calendars...");
    let calendars = repository.load_all().await;
    pb.finish_and_clear();

    let calendars = match calendars {
        Ok(calendars) => calendars,
        Err(e) => error!("Cannot list shift calendars. Err: {}", e),
    };

    if calendars.is_empty() {
        info!("{}", settings.locale.messages().no_calendars);
        return;
    }

    for (_, calendar) in calendars {
        let days = week_strip(&calendar, start, settings.locale);

        let mut builder = Builder::default();
        builder.push_record(days.iter().map(|d| d.weekday.to_string()));
        builder.push_record(days.iter().map(|d| d.code.clone()));

        println!("{}\n{}\n", calendar.title.bold(), builder.build());
    }
}

/// Prints the status code of `calendar` on `date` (today by default).
pub async fn shift_status(settings: &Settings, calendar: String, date: Option<String>) {
    let repository = open_repository(settings).await;
    let date: NaiveDate = utils::get_date_from_string(date, Local::now().date_naive());

    let loaded = match repository.load_calendar(&calendar).await {
        Err(ScheduleError::NotFound(_))
            if !settings.calendar_extension.is_empty() && !calendar.contains('.') =>
        {
            repository
                .load_calendar(&format!("{}.{}", calendar, settings.calendar_extension))
                .await
        }
        other => other,
    };

    match loaded {
        Ok(document) => println!(
            "{} {} {}",
            document.title.bold(),
            date.format("%Y-%m-%d"),
            lookup_status(&document, date)
        ),
        Err(e) => error!("{}", e),
    }
}
