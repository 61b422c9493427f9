use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing_subscriber::EnvFilter;

use flux_mvvm::api::InMemoryClient;
use flux_mvvm::config::{Config, LoggingConfig};
use flux_mvvm::domain::user::UserReducer;
use flux_mvvm::domain::User;
use flux_mvvm::flux::Flux;
use flux_mvvm::rx::{MainLoop, Scheduler, Subject, SubscriptionBag};
use flux_mvvm::viewmodel::{SearchInputs, SearchViewModel};

/// Gap between simulated keystrokes, shorter than any sane debounce.
const KEYSTROKE_GAP: Duration = Duration::from_millis(40);
/// Time for main-loop work to settle after an input.
const SETTLE: Duration = Duration::from_millis(20);

#[derive(Parser)]
#[command(name = "flux-mvvm", version, about = "Drive the search screen view model from the terminal")]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final user store state as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Type QUERY into the search box, page through results, optionally select a row
    Search {
        query: String,

        /// Extra pages to request after the first
        #[arg(long, default_value_t = 0)]
        pages: usize,

        /// Row to select once results are loaded
        #[arg(long)]
        select: Option<usize>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;
    init_logging(&config.logging);

    match cli.command {
        Command::Search {
            query,
            pages,
            select,
        } => run_search(&config, &query, pages, select, cli.json).await,
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();
}

async fn run_search(
    config: &Config,
    query: &str,
    pages: usize,
    select: Option<usize>,
    json: bool,
) -> Result<()> {
    let (main_loop, main_scheduler) = MainLoop::new(Handle::current());
    let scheduler: Arc<dyn Scheduler> = Arc::new(main_scheduler);
    let main_task = tokio::spawn(main_loop.run());

    let flux = Flux::shared();
    let client = Arc::new(sample_directory(config.search.page_size));

    let appear = Subject::new();
    let text = Subject::new();
    let bottom = Subject::new();
    let rows = Subject::new();
    let inputs = SearchInputs {
        view_did_appear: appear.as_observable(),
        search_text: text.as_observable(),
        reached_bottom: bottom.as_observable(),
        select_user_row_at: rows.as_observable(),
        ..SearchInputs::default()
    };
    let vm = SearchViewModel::new(flux, client, &config.search, Arc::clone(&scheduler), inputs);

    let bag = SubscriptionBag::new();
    vm.counter_text()
        .filter(|text| !text.is_empty())
        .subscribe(|text| println!("counter  {text}"))
        .disposed_by(&bag);
    vm.show_user_repository()
        .subscribe(|_| println!("navigate user repositories"))
        .disposed_by(&bag);

    post(&scheduler, move || appear.on_next(()));
    let mut typed = String::new();
    for c in query.chars() {
        typed.push(c);
        let prefix = typed.clone();
        let text = text.clone();
        post(&scheduler, move || text.on_next(prefix));
        tokio::time::sleep(KEYSTROKE_GAP).await;
    }
    tokio::time::sleep(config.search.debounce() + SETTLE).await;

    for _ in 0..pages {
        let bottom = bottom.clone();
        post(&scheduler, move || bottom.on_next(()));
        tokio::time::sleep(SETTLE).await;
    }

    if let Some(row) = select {
        post(&scheduler, move || rows.on_next(row));
        tokio::time::sleep(SETTLE).await;
    }

    for (row, user) in vm.users_value().iter().enumerate() {
        println!("{row:>4}  {}", user.login);
    }

    if json {
        let store = flux.register::<UserReducer>();
        println!("{}", serde_json::to_string_pretty(&store.value())?);
        store.release();
    }

    bag.dispose();
    vm.dispose();
    flux.shutdown();
    main_task.abort();
    Ok(())
}

fn post(scheduler: &Arc<dyn Scheduler>, job: impl FnOnce() + Send + 'static) {
    scheduler.schedule(Box::new(job)).detach();
}

fn sample_directory(page_size: usize) -> InMemoryClient {
    let logins = [
        "alice", "alan", "albert", "alfred", "alicia", "alma", "alonzo", "alvin", "amelia",
        "bob", "bobby", "bonnie", "carol", "carla", "charlie", "dave", "david", "diana",
        "edsger", "grace", "ken", "linus", "margaret", "niklaus", "tony",
    ];
    InMemoryClient::new(page_size).with_users(logins.iter().enumerate().map(|(i, login)| User {
        id: format!("u{i}"),
        login: login.to_string(),
        avatar_url: None,
        repository_count: (i * 7) % 23,
    }))
}
