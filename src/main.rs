use anyhow::{Context, Result};
use bookfinder::config::{find_config_file, load_config, Config};
use bookfinder::models::{Book, Category};
use bookfinder::search::{Action, AppState, SearchOutcome, Session};
use bookfinder::sources::{OpenLibrarySource, Source};
use bookfinder::ui::{self, Spinner, Status};
use bookfinder::utils::{is_terminal, terminal_width, HttpClient, DEFAULT_USER_AGENT};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// BookFinder - Search the Open Library catalog from the terminal
#[derive(Parser, Debug)]
#[command(name = "bookfinder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the Open Library catalog and browse results by category", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Catalog base URL (overrides the config file)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log output format (overrides the config file)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Cards on a terminal, JSON otherwise
    Auto,
    /// One card per book
    Cards,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Tab-separated lines
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if is_terminal() => OutputFormat::Cards,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search the catalog and print one page of results
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,

        /// Narrow results to a category (all, fiction, science, history, biography, children)
        #[arg(long, short, default_value_t = Category::All)]
        category: Category,

        /// Page to show (clamped to the available pages)
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },

    /// Browse results interactively
    #[command(alias = "i")]
    Interactive {
        /// Query to load first (defaults to the configured initial query)
        #[arg(long)]
        query: Option<String>,
    },

    /// Show the description of a work
    Summary {
        /// Work key, e.g. /works/OL45804W or OL45804W
        key: String,
    },

    /// List the available categories
    Categories,

    /// Print the effective configuration as TOML
    Config,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// One rendered page of results
#[derive(Serialize)]
struct ResultsPage<'a> {
    query: Option<&'a str>,
    category: Category,
    total_results: usize,
    matching: usize,
    partial: bool,
    page: usize,
    total_pages: usize,
    books: &'a [Book],
}

impl<'a> ResultsPage<'a> {
    fn from_state(state: &'a AppState) -> Self {
        let view = state.page_view();
        Self {
            query: state.results_query(),
            category: state.category(),
            total_results: state.total_results(),
            matching: view.total_items,
            partial: state.is_partial(),
            page: view.page,
            total_pages: view.total_pages,
            books: view.items,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "bookfinder", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config from the environment".to_string(),
    })?;
    apply_overrides(&mut config, &cli);

    init_logging(&cli, &config);
    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    let format = cli.output.resolve();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Search {
            query,
            category,
            page,
        } => {
            let mut session = build_session(&config)?;
            let spinner = spinner(quiet, format, &query);
            let outcome = session.search(&query).await;
            spinner.finish();

            if !renders_results(&outcome) {
                return Ok(());
            }
            if let Some((status, message)) = search_status(&outcome) {
                ui::print_status(status, &message);
            }

            session.dispatch(Action::SelectCategory(category)).await;
            session.dispatch(Action::GoToPage(page)).await;
            render(session.state(), format, &config)?;
        }
        Commands::Interactive { query } => {
            let session = build_session(&config)?;
            let initial = query.unwrap_or_else(|| config.display.initial_query.clone());
            run_interactive(session, &initial, quiet, &config).await?;
        }
        Commands::Summary { key } => {
            let session = build_session(&config)?;
            let summary = session
                .summary(&key)
                .await
                .with_context(|| format!("Failed to fetch summary for {}", key))?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                ui::print_summary(&summary);
            }
        }
        Commands::Categories => print_categories(format)?,
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn apply_overrides(config: &mut Config, cli: &Cli) {
    config.limits = config.limits.clamped();
    if let Some(timeout) = cli.timeout {
        config.catalog.timeout_secs = timeout;
    }
    if let Some(base_url) = &cli.base_url {
        config.catalog.base_url = base_url.clone();
    }
    if let Some(format) = cli.log_format {
        config.logging.format = match format {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
        .to_string();
    }
}

fn init_logging(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("bookfinder={}", level)));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_session(config: &Config) -> Result<Session> {
    let user_agent = config
        .catalog
        .user_agent
        .as_deref()
        .unwrap_or(DEFAULT_USER_AGENT);
    let client = HttpClient::new(user_agent, Duration::from_secs(config.catalog.timeout_secs))?;
    let source = OpenLibrarySource::with_base_url(client, &config.catalog.base_url)?;
    tracing::debug!(
        source = source.name(),
        base_url = source.base_url(),
        max_pages = config.limits.max_pages,
        max_items = config.limits.max_items,
        "Catalog source ready"
    );

    Ok(Session::with_settings(
        Arc::new(source),
        config.limits,
        AppState::new(config.display.books_per_page),
    ))
}

fn spinner(quiet: bool, format: OutputFormat, query: &str) -> Spinner {
    if quiet || !is_terminal() || format == OutputFormat::Json {
        Spinner::hidden()
    } else {
        Spinner::new(&format!("Searching for \"{}\"...", query.trim()))
    }
}

fn render(state: &AppState, format: OutputFormat, config: &Config) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ResultsPage::from_state(state))?);
        }
        OutputFormat::Plain => {
            for line in ui::plain_lines(&state.page_view()) {
                println!("{}", line);
            }
        }
        OutputFormat::Table => {
            if let Some(summary) = ui::results_summary(state) {
                println!("{}", summary);
            }
            println!("{}", ui::category_tabs(state.category()));
            let view = state.page_view();
            if view.items.is_empty() {
                ui::print_empty_state(state);
            } else {
                println!("{}", ui::books_table(&view, terminal_width()));
                if let Some(line) = ui::pagination_line(&view) {
                    println!("{}", line);
                }
            }
        }
        OutputFormat::Cards | OutputFormat::Auto => {
            ui::print_results(state, &config.catalog.covers_url, terminal_width());
        }
    }
    Ok(())
}

fn print_categories(format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        let entries: Vec<_> = Category::ALL
            .iter()
            .map(|c| {
                serde_json::json!({
                    "id": c.id(),
                    "label": c.label(),
                    "keywords": c.keywords(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = comfy_table::Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["ID", "Label", "Keywords"]);
    for category in Category::ALL {
        let keywords = if category.is_all() {
            "(everything)".to_string()
        } else {
            category.keywords().join(", ")
        };
        table.add_row(vec![category.id().to_string(), category.label().to_string(), keywords]);
    }
    println!("{table}");
    Ok(())
}

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Search(String),
    Category(Category),
    Next,
    Previous,
    Go(usize),
    Summary(usize),
    Favorite(usize),
    Help,
    Quit,
    Nothing,
}

fn parse_input(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Nothing);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Search(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "c" | "category" => arg
            .parse::<Category>()
            .map(Input::Category)
            .map_err(|e| e.to_string()),
        "n" | "next" => Ok(Input::Next),
        "p" | "prev" => Ok(Input::Previous),
        "g" | "go" => arg
            .parse::<usize>()
            .map(Input::Go)
            .map_err(|_| format!("Not a page number: '{}'", arg)),
        "s" | "summary" => arg
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(Input::Summary)
            .ok_or_else(|| format!("Not a result number: '{}'", arg)),
        "f" | "fav" => arg
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(Input::Favorite)
            .ok_or_else(|| format!("Not a result number: '{}'", arg)),
        "h" | "help" | "?" => Ok(Input::Help),
        "q" | "quit" | "exit" => Ok(Input::Quit),
        other => Err(format!("Unknown command ':{}', type :h for help", other)),
    }
}

fn print_help() {
    println!("  <text>         search the catalog");
    println!("  :c <category>  filter by category ({})", category_ids());
    println!("  :n / :p        next / previous page");
    println!("  :g <page>      go to page");
    println!("  :s <number>    show the summary of a result");
    println!("  :f <number>    mark or unmark a result as favourite");
    println!("  :h             show this help");
    println!("  :q             quit");
}

fn category_ids() -> String {
    Category::ALL
        .iter()
        .map(|c| c.id())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether a finished search leaves anything to render
fn renders_results(outcome: &SearchOutcome) -> bool {
    !matches!(outcome, SearchOutcome::Ignored | SearchOutcome::Stale)
}

/// Status line for a finished search, if it needs one
fn search_status(outcome: &SearchOutcome) -> Option<(Status, String)> {
    match outcome {
        SearchOutcome::Failed(message) => {
            Some((Status::Error, format!("Search failed: {}", message)))
        }
        SearchOutcome::Replaced { partial: true, .. } => Some((
            Status::Warning,
            "Some result pages could not be fetched; showing what was received".to_string(),
        )),
        _ => None,
    }
}

async fn run_search(session: &mut Session, query: &str, quiet: bool) {
    let spinner = spinner(quiet, OutputFormat::Cards, query);
    let outcome = session.search(query).await;
    spinner.finish();

    if let Some((status, message)) = search_status(&outcome) {
        ui::print_status(status, &message);
    }
}

fn toggle_favorite(session: &mut Session, number: usize) {
    let Some(marked) = session.toggle_favorite(number) else {
        ui::print_status(Status::Warning, &format!("No result numbered {}", number));
        return;
    };
    let title = session
        .state()
        .filtered()
        .get(number - 1)
        .and_then(|book| book.title())
        .unwrap_or("Untitled");

    if marked {
        ui::print_status(Status::Success, &format!("Added \"{}\" to favourites", title));
    } else {
        ui::print_status(Status::Info, &format!("Removed \"{}\" from favourites", title));
    }
}

async fn run_interactive(
    mut session: Session,
    initial_query: &str,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let width = terminal_width();
    let covers_url = config.catalog.covers_url.as_str();

    if !quiet {
        ui::print_banner();
    }
    run_search(&mut session, initial_query, quiet).await;
    ui::print_results(session.state(), covers_url, width);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\nbookfinder> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };

        let input = match parse_input(&line) {
            Ok(input) => input,
            Err(message) => {
                ui::print_status(Status::Warning, &message);
                continue;
            }
        };

        match input {
            Input::Nothing => continue,
            Input::Quit => break,
            Input::Help => {
                print_help();
                continue;
            }
            Input::Summary(number) => {
                show_summary(&session, number).await;
                continue;
            }
            Input::Favorite(number) => {
                toggle_favorite(&mut session, number);
                continue;
            }
            Input::Search(query) => run_search(&mut session, &query, quiet).await,
            Input::Category(category) => {
                session.dispatch(Action::SelectCategory(category)).await;
            }
            Input::Next => {
                session.dispatch(Action::NextPage).await;
            }
            Input::Previous => {
                session.dispatch(Action::PreviousPage).await;
            }
            Input::Go(page) => {
                session.dispatch(Action::GoToPage(page)).await;
            }
        }

        ui::print_results(session.state(), covers_url, width);
    }

    Ok(())
}

async fn show_summary(session: &Session, number: usize) {
    let Some(book) = session.state().filtered().get(number - 1) else {
        ui::print_status(Status::Warning, &format!("No result numbered {}", number));
        return;
    };
    let Some(key) = book.key.clone() else {
        ui::print_status(Status::Warning, "This result has no catalog key");
        return;
    };

    match session.summary(&key).await {
        Ok(summary) => ui::print_summary(&summary),
        Err(e) => ui::print_status(Status::Error, &format!("Failed to fetch summary: {}", e)),
    }
}
