//! movieo - terminal movie and TV discovery client.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{
    AppConfig, BROWSE_LOG_FILE, CatalogConfig, resolve_config_dir, resolve_config_path,
};
use movieo_api::tmdb::{CatalogClient, Feed, FetchError, MediaItem, MediaKind, MediaRef};
use movieo_feed::{
    CatalogStore, DetailView, ErrorPolicy, FeedView, FetchController, Outcome, Recovery,
};

/// Environment variable holding the catalog API bearer token.
const API_TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show this week's trending titles.
    Trending,
    /// Search movies, series and people.
    Search(SearchArgs),
    /// List popular movies or series.
    Explore(ExploreArgs),
    /// Show details, credits and trailer of a title.
    Details(DetailsArgs),
    /// Browse the catalog in an interactive TUI.
    Browse,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Number of result pages to fetch.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

/// Arguments for the `explore` subcommand.
#[derive(clap::Args)]
struct ExploreArgs {
    /// Media kind: "movie" or "tv".
    kind: MediaKind,
    /// Number of result pages to fetch.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Media kind: "movie" or "tv".
    #[arg(long, default_value = "movie")]
    kind: MediaKind,
    /// Catalog ID (e.g. 414906).
    #[arg(long, required = true)]
    id: u64,
}

/// Loads the config file at the resolved location.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    tracing::debug!(path = %path.display(), "loading config");
    AppConfig::load(&path)
}

/// Builds a `CatalogClient` from `TMDB_API_TOKEN` and the catalog config.
///
/// # Errors
///
/// Returns an error wrapping [`FetchError::MissingCredential`] if the token
/// is unset or blank.
fn build_catalog_client(config: &CatalogConfig) -> Result<CatalogClient> {
    let api_token = std::env::var(API_TOKEN_ENV).unwrap_or_default();

    CatalogClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(&config.language)
        .include_adult(config.include_adult)
        .build()
        .context("failed to build catalog client")
}

/// Formats one list row.
fn format_item(item: &MediaItem) -> String {
    format!(
        "{}\t{}\t{}\t{:.1}\t{}",
        item.id,
        item.media_type.map_or("-", MediaKind::as_path),
        item.year().unwrap_or("-"),
        item.vote_average,
        item.display_title(),
    )
}

/// Fetches up to `pages` pages of `feed` through a fetch controller.
///
/// # Errors
///
/// Returns the user-facing message of the first failed page.
async fn collect_pages(
    client: &CatalogClient,
    feed: Feed,
    pages: u32,
) -> Result<FetchController<Feed, MediaItem>> {
    let mut controller = FetchController::new(ErrorPolicy::Stay);
    let mut next = controller.set_query_key(feed);

    while let Some(request) = next {
        match controller.run(client, request).await {
            Outcome::Failed { recovery } => {
                let message = controller.error_message().unwrap_or_default();
                if recovery == Recovery::Retry {
                    bail!("{message} (run the command again to retry)");
                }
                bail!("{message}");
            }
            Outcome::Merged { .. } | Outcome::Empty | Outcome::Discarded => {}
        }
        if controller.page() >= pages {
            break;
        }
        next = controller.advance_page();
    }

    Ok(controller)
}

/// Logs the accumulated list of `controller`.
fn log_results(controller: &FetchController<Feed, MediaItem>) {
    if controller.is_empty_result() {
        tracing::info!("No results found");
        return;
    }

    tracing::info!(
        "Showing {} results (page {} of {})",
        controller.items().len(),
        controller.page(),
        controller.total_pages().unwrap_or_default()
    );
    tracing::info!("ID\tKind\tYear\tRating\tTitle");
    for item in controller.items() {
        tracing::info!("{}", format_item(item));
    }
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the trending request fails.
#[instrument(skip_all)]
async fn run_trending(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let store = CatalogStore::new();
    store
        .bootstrap(&client)
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;

    tracing::info!("ID\tKind\tYear\tRating\tTitle");
    for item in store.banners() {
        tracing::info!("{}", format_item(item));
        if let Some(path) = item.backdrop_path.as_deref() {
            tracing::info!("\t{}", store.image_url(path));
        }
    }

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or a page request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let feed = Feed::search(args.query.as_str());
    if feed.is_blank() {
        bail!("--query must not be blank");
    }

    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let controller = collect_pages(&client, feed, args.pages).await?;
    log_results(&controller);
    Ok(())
}

/// Runs the `explore` subcommand.
///
/// # Errors
///
/// Returns an error if the kind is not browsable, the client fails to
/// build, or a page request fails.
#[instrument(skip_all)]
async fn run_explore(args: &ExploreArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.kind == MediaKind::Person {
        bail!("explore supports \"movie\" and \"tv\" only");
    }

    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let controller = collect_pages(&client, Feed::Discover(args.kind), args.pages).await?;
    log_results(&controller);
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the details request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.kind == MediaKind::Person {
        bail!("details supports \"movie\" and \"tv\" only");
    }

    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let view = DetailView::load(&client, MediaRef::new(args.kind, args.id))
        .await
        .map_err(|err| anyhow::anyhow!(err.user_message()))?;
    let details = view.details();

    tracing::info!("{}", view.title());
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        tracing::info!("  \"{tagline}\"");
    }
    tracing::info!("Released:  {}", view.release_date());
    if let Some((hours, minutes)) = view.runtime() {
        tracing::info!("Runtime:   {hours}h {minutes}m");
    }
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres:    {}", genres.join(", "));
    tracing::info!("Rating:    {:.1} ({} votes)", details.vote_average, details.vote_count);
    tracing::info!("Director:  {}", view.director());
    tracing::info!("Writers:   {}", view.writers());
    let cast: Vec<&str> = view.top_cast(5).iter().map(|m| m.name.as_str()).collect();
    tracing::info!("Cast:      {}", cast.join(", "));
    tracing::info!("Trailer:   {}", view.trailer_url().as_deref().unwrap_or("-"));
    if let Some(overview) = details.overview.as_deref() {
        tracing::info!("{overview}");
    }
    for (heading, items) in [
        ("Similar", view.similar()),
        ("Recommended", view.recommendations()),
    ] {
        if items.is_empty() {
            continue;
        }
        tracing::info!("{heading}:");
        for item in items.iter().take(5) {
            tracing::info!("  {}", format_item(item));
        }
    }

    Ok(())
}

/// Runs the `browse` subcommand.
///
/// A missing API token does not abort: the browser starts and shows the
/// credential error in every list.
///
/// # Errors
///
/// Returns an error if the config is invalid or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = match build_catalog_client(&config.catalog) {
        Ok(client) => Some(client),
        Err(err) if err.downcast_ref::<FetchError>() == Some(&FetchError::MissingCredential) => {
            tracing::warn!("{API_TOKEN_ENV} is not set, starting without catalog access");
            None
        }
        Err(err) => return Err(err),
    };

    crate::tui::run_browser(client, &config.browse)
        .await
        .context("browser TUI failed")
}

/// Default log filter. Browse logs are kept to warnings.
const fn default_filter(command: &Commands) -> &'static str {
    match command {
        Commands::Browse => "warn",
        Commands::Trending
        | Commands::Search(_)
        | Commands::Explore(_)
        | Commands::Details(_) => "info",
    }
}

/// Destination of fmt output.
///
/// The browser owns the terminal, so its logs go to [`BROWSE_LOG_FILE`] in
/// the config directory, or are dropped when that file cannot be created.
/// The guard flushes the file on drop.
fn log_writer(cli: &Cli) -> (BoxMakeWriter, Option<WorkerGuard>) {
    if !matches!(cli.command, Commands::Browse) {
        return (BoxMakeWriter::new(std::io::stdout), None);
    }

    let appender = resolve_config_dir(cli.dir.as_ref()).and_then(|dir| {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        RollingFileAppender::builder()
            .rotation(Rotation::NEVER)
            .filename_prefix(BROWSE_LOG_FILE)
            .build(&dir)
            .context("failed to open browse log")
    });
    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        Err(_) => (BoxMakeWriter::new(std::io::sink), None),
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_directive = default_filter(&cli.command);
    let (writer, _log_guard) = log_writer(&cli);
    let ansi = !matches!(cli.command, Commands::Browse);

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_directive)),
            )
            .with_target(false)
            .with_writer(writer)
            .with_ansi(ansi)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .with_ansi(ansi);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Trending => run_trending(dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Explore(args) => run_explore(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Browse => run_browse(dir).await,
    }
}
