use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use readshift::{cli, config, error, management::EditChoice};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Track reading progress
    Books(BooksOptions),

    /// Show work-shift calendars
    Shifts(ShiftsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Track reading progress")]
pub struct BooksOptions {
    /// Subcommands under `books`; without one the book list is shown
    #[command(subcommand)]
    pub command: Option<BooksSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BooksSubcommand {
    /// Compact progress bars for every book
    Widget,

    /// Add a book
    Add(BooksAddOpts),

    /// Update a book; asks interactively when no action is given
    Edit(BooksEditOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct BooksAddOpts {
    #[clap(long)]
    pub title: String,

    /// Total number of pages
    #[clap(long)]
    pub pages: u32,
}

#[derive(Parser, Debug, Clone)]
#[command(group = clap::ArgGroup::new("action").multiple(false))]
pub struct BooksEditOpts {
    /// Position of the book in `readshift books`
    pub index: usize,

    /// Move forward by this many pages
    #[clap(long, group = "action")]
    pub advance: Option<u32>,

    /// Set the page you stopped on
    #[clap(long, group = "action")]
    pub page: Option<String>,

    /// Stop reading the book for now
    #[clap(long, group = "action")]
    pub put_aside: bool,

    /// Pick a put-aside book up again
    #[clap(long, group = "action")]
    pub resume: bool,
}

impl BooksEditOpts {
    fn choice(&self) -> Option<EditChoice> {
        if let Some(step) = self.advance {
            Some(EditChoice::Advance(step))
        } else if let Some(page) = &self.page {
            Some(EditChoice::SetPage(page.clone()))
        } else if self.put_aside {
            Some(EditChoice::PutAside)
        } else if self.resume {
            Some(EditChoice::Resume)
        } else {
            None
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Show work-shift calendars",
    args_conflicts_with_subcommands = true
)]
pub struct ShiftsOptions {
    /// First day of the week strip (YYYY-MM-DD), yesterday by default
    #[clap(long)]
    pub from: Option<String>,

    #[command(subcommand)]
    pub command: Option<ShiftsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ShiftsSubcommand {
    /// Status code of one calendar on one day
    Status(ShiftsStatusOpts),
}

#[derive(Parser, Debug, Clone)]
pub struct ShiftsStatusOpts {
    /// Calendar file name, with or without extension
    pub calendar: String,

    /// Day to look up (YYYY-MM-DD), today by default
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    let settings = config::Settings::from_env();

    let cli = Cli::parse();

    match cli.command {
        Command::Books(opt) => match opt.command {
            None => cli::list_books(&settings).await,
            Some(BooksSubcommand::Widget) => cli::books_widget(&settings).await,
            Some(BooksSubcommand::Add(a)) => cli::add_book(&settings, a.title, a.pages).await,
            Some(BooksSubcommand::Edit(e)) => {
                cli::edit_book(&settings, e.index, e.choice()).await
            }
        },

        Command::Shifts(opt) => match opt.command {
            Some(ShiftsSubcommand::Status(s)) => {
                cli::shift_status(&settings, s.calendar, s.date).await
            }
            None => cli::shifts(&settings, opt.from).await,
        },

        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
