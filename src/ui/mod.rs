//! Terminal UI for result cards, category tabs and paging controls.
//!
//! Layout helpers return plain strings so they can be tested; the `print_*`
//! functions add colour and write to stdout.

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::{Book, Category, CoverSize, WorkSummary};
use crate::search::{AppState, PageMarker, PageView};
use crate::utils::{book_table_columns, format_number, truncate_at_word, truncate_with_ellipsis};

/// Placeholder shown instead of a cover image
pub const NO_COVER: &str = "No Cover";

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
    }
}

/// Print a styled status message to stderr.
pub fn print_status(status: Status, msg: &str) {
    let icon = status_icon(status);
    match status {
        Status::Success => eprintln!("{} {}", icon.green().bold(), msg),
        Status::Error => eprintln!("{} {}", icon.red().bold(), msg),
        Status::Warning => eprintln!("{} {}", icon.yellow().bold(), msg),
        Status::Info => eprintln!("{} {}", icon.cyan().bold(), msg),
    }
}

/// Welcome banner for interactive sessions.
pub fn print_banner() {
    println!();
    println!("{}", "📚 BookFinder".bold().blue());
    println!("{}", "Every search opens a new page of imagination".dimmed());
    println!("{}", "Powered by Open Library".dimmed());
    println!();
}

/// Category tab row, active tab in brackets
pub fn category_tabs(active: Category) -> String {
    Category::ALL
        .iter()
        .map(|c| {
            if *c == active {
                format!("[{}]", c.label())
            } else {
                format!(" {} ", c.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the category tab row.
pub fn print_category_tabs(active: Category) {
    let row = Category::ALL
        .iter()
        .map(|c| {
            if *c == active {
                format!("[{}]", c.label()).on_blue().white().bold().to_string()
            } else {
                format!(" {} ", c.label()).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    println!("{}", row);
}

/// Summary line above the results, `None` when nothing has been found
pub fn results_summary(state: &AppState) -> Option<String> {
    if state.total_results() == 0 {
        return None;
    }

    let mut line = format!("Found {} books", format_number(state.total_results()));
    if let Some(query) = state.results_query() {
        line.push_str(&format!(" for \"{}\"", query));
    }
    if !state.category().is_all() {
        line.push_str(&format!(
            " ({} {} in {})",
            state.filtered().len(),
            if state.filtered().len() == 1 { "match" } else { "matches" },
            state.category().label()
        ));
    }
    if state.is_partial() {
        line.push_str(&format!(" - showing the first {} fetched", state.aggregated().len()));
    }
    Some(line)
}

/// Marker printed before the title of a favourite
pub const FAVORITE_MARK: &str = "★";

/// Plain lines of one result card.
///
/// `number` is the 1-based position in the filtered collection.
pub fn card_lines(
    book: &Book,
    number: usize,
    favorite: bool,
    covers_url: &str,
    width: usize,
) -> Vec<String> {
    let inner = width.saturating_sub(4).max(20);
    let title = book.title().unwrap_or("Untitled");
    let title = if favorite {
        format!("{} {}", FAVORITE_MARK, truncate_at_word(title, inner.saturating_sub(7)))
    } else {
        truncate_at_word(title, inner.saturating_sub(5))
    };

    let mut lines = vec![
        format!("{:>3}. {}", number, title),
        format!(
            "     Author: {}",
            truncate_with_ellipsis(&book.author_line(), inner.saturating_sub(13))
        ),
    ];

    if let Some(year) = book.publish_year {
        lines.push(format!("     Published Year: {}", year));
    }
    if let Some(language) = book.primary_language() {
        lines.push(format!("     Language: {}", capitalize(language)));
    }
    if let Some(editions) = book.edition_count {
        lines.push(format!("     Editions: {}", editions));
    }
    if let Some(access) = book.ebook_access.as_deref().filter(|a| *a != "no_ebook") {
        lines.push(format!("     E-book: {}", access.replace('_', " ")));
    }

    let cover = book
        .cover_url_at(covers_url, CoverSize::Medium)
        .unwrap_or_else(|| format!("[{}]", NO_COVER));
    lines.push(format!("     Cover: {}", cover));

    lines.push(format!("     Key: {}", book.stable_key(number.saturating_sub(1))));

    lines
}

/// Print one result card.
pub fn print_book_card(book: &Book, number: usize, favorite: bool, covers_url: &str, width: usize) {
    let lines = card_lines(book, number, favorite, covers_url, width);
    let rule = "─".repeat(width.saturating_sub(2).min(78));

    println!("{}", rule.dimmed());
    for (i, line) in lines.iter().enumerate() {
        if i == 0 {
            println!("{}", line.bold());
        } else if line.contains(NO_COVER) {
            println!("{}", line.dimmed());
        } else {
            println!("{}", line);
        }
    }
}

/// Paging control text, `None` when there is only one page
pub fn pagination_line(view: &PageView<'_>) -> Option<String> {
    if !view.show_controls() {
        return None;
    }

    let numbers = view
        .markers()
        .into_iter()
        .map(|marker| match marker {
            PageMarker::Page(n) if n == view.page => format!("[{}]", n),
            PageMarker::Page(n) => n.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    let prev = if view.has_previous() { "‹ Prev" } else { "  " };
    let next = if view.has_next() { "Next ›" } else { "  " };

    Some(format!("{}  {}  {}", prev, numbers, next))
}

/// Print a full results page: summary, tabs, cards and paging control.
pub fn print_results(state: &AppState, covers_url: &str, width: usize) {
    if let Some(summary) = results_summary(state) {
        println!("{}", summary.cyan());
    }
    print_category_tabs(state.category());

    let view = state.page_view();
    if view.items.is_empty() {
        print_empty_state(state);
        return;
    }

    for (i, book) in view.items.iter().enumerate() {
        let position = view.offset + i;
        let favorite = state.is_favorite(&book.stable_key(position));
        print_book_card(book, position + 1, favorite, covers_url, width);
    }
    println!();

    if let Some(line) = pagination_line(&view) {
        println!("{}", line.bold());
    }
    println!(
        "{}",
        format!(
            "Page {} of {} ({} books)",
            view.page,
            view.total_pages.max(1),
            view.total_items
        )
        .dimmed()
    );
}

/// Print the "nothing to show" message.
pub fn print_empty_state(state: &AppState) {
    if state.query().is_empty() && state.results_query().is_none() {
        return;
    }
    println!();
    println!("{}", "No books found".bold());
    println!(
        "{}",
        "Try adjusting your search or browse by category".dimmed()
    );
}

/// Results page as a table
pub fn books_table(view: &PageView<'_>, width: usize) -> Table {
    let (title_width, author_width) = book_table_columns(width);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width as u16)
        .set_header(vec!["#", "Title", "Authors", "Year", "Editions"]);

    for (i, book) in view.items.iter().enumerate() {
        table.add_row(vec![
            (view.offset + i + 1).to_string(),
            truncate_at_word(book.title().unwrap_or("Untitled"), title_width),
            truncate_with_ellipsis(&book.author_line(), author_width),
            book.publish_year.map(|y| y.to_string()).unwrap_or_default(),
            book.edition_count.map(|e| e.to_string()).unwrap_or_default(),
        ]);
    }

    table
}

/// Plain tab-separated lines, one per book
pub fn plain_lines(view: &PageView<'_>) -> Vec<String> {
    view.items
        .iter()
        .enumerate()
        .map(|(i, book)| {
            format!(
                "{}\t{}\t{}\t{}",
                view.offset + i + 1,
                book.title().unwrap_or("Untitled"),
                book.author_line(),
                book.publish_year.map(|y| y.to_string()).unwrap_or_default()
            )
        })
        .collect()
}

/// Print a work summary.
pub fn print_summary(summary: &WorkSummary) {
    println!();
    if let Some(title) = &summary.title {
        println!("{}", title.bold());
    }
    println!("{}", summary.key.dimmed());
    println!();
    println!("{}", summary.text());
    println!();
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Loading spinner shown while a search is in flight.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for quiet or non-terminal output.
    pub fn hidden() -> Self {
        Self {
            pb: indicatif::ProgressBar::hidden(),
        }
    }

    /// Stop and erase the spinner.
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
