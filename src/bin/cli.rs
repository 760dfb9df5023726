//! pubdash CLI
//!
//! Terminal front end for the research publication dashboard.

use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use pubdash::{
    error::Result,
    models::{ArticleDetails, ArticleRecord, Config},
    pipeline,
    query::{DepartmentFilter, PageSize, Stats},
    services::RepositoryApi,
    session::{ListingView, Session},
    utils::HttpSource,
};
use serde::Serialize;

/// pubdash - Research Publication Dashboard
#[derive(Parser, Debug)]
#[command(
    name = "pubdash",
    version,
    about = "Research publication dashboard over a DSpace-style REST API"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "pubdash.toml")]
    config: PathBuf,

    /// Override the REST API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List departments and their item counts
    Departments,

    /// List articles, optionally filtered or searched
    List {
        /// Restrict to one department id (ignored while searching)
        #[arg(short, long)]
        department: Option<String>,

        /// Faculty-wide search over title, id and authors
        #[arg(short, long)]
        search: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,

        /// Records per page: 10, 20, 50 or 100
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show dashboard statistics
    Stats {
        /// Restrict to one department id
        #[arg(short, long)]
        department: Option<String>,
    },

    /// Show the details of one article
    Show {
        /// Item id
        item_id: String,
    },

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_card(record: &ArticleRecord) {
    println!(
        "[{}] {}",
        record.item_type.as_deref().unwrap_or("Research Paper"),
        record.name.as_deref().unwrap_or(ArticleDetails::UNTITLED)
    );
    let year = record.year().map(|y| format!(" | {y}")).unwrap_or_default();
    println!(
        "    {} | {} | ID: {}{}",
        record.first_author().unwrap_or(ArticleDetails::UNKNOWN_AUTHOR),
        record.department_name,
        record.id,
        year
    );
}

fn print_listing(view: &ListingView<'_>) {
    if view.faculty_wide {
        println!(
            "Searching across all departments: {} {}",
            view.total_matches,
            if view.total_matches == 1 { "match" } else { "matches" }
        );
    }

    if let Some(message) = &view.empty_message {
        println!("{message}");
        return;
    }

    for record in &view.records {
        print_card(record);
    }
    println!(
        "Showing {}-{} of {} (page {}/{})",
        view.first_index, view.last_index, view.total_matches, view.current_page, view.total_pages
    );
}

fn print_stats(stats: &Stats) {
    println!("Total publications: {}", stats.declared_total);
    println!("Loaded records:     {}", stats.total);
    println!("Departments:        {}", stats.department_count);
    println!("Unique researchers: {}", stats.unique_authors);
    if let Some(span) = stats.research_span_years {
        println!("Research span:      {span} years");
    }

    println!();
    println!("Authors per paper:");
    for bucket in &stats.authors_per_paper {
        println!("    {:<12} {}", bucket.label, bucket.count);
    }

    if !stats.departments.is_empty() {
        println!();
        println!("Publications by department:");
        for share in &stats.departments {
            println!("    {:<6} {:<40} {}", share.abbreviation, share.name, share.item_count);
        }
    }
}

fn print_details(item_id: &str, details: &ArticleDetails) {
    println!("{}", details.title_or_default());
    println!("    ID:        {item_id}");
    println!("    Authors:   {}", details.authors_line());
    println!("    Published: {}", details.date_or_default());
    println!();
    println!("{}", details.abstract_or_default());
    if !details.keywords.is_empty() {
        println!();
        println!("Keywords: {}", details.keywords.join(", "));
    }
}

/// Refresh the full catalog into a new session.
async fn load_session(config: &Config, api: &RepositoryApi<HttpSource>) -> Result<Session> {
    let mut session = Session::from_config(config)?;
    let outcome = pipeline::run_refresh(api, config.client.max_concurrent).await;
    for failure in &outcome.failed_departments {
        log::warn!(
            "Department {} contributed no records: {}",
            failure.department_id,
            failure.message
        );
    }
    outcome.apply(&mut session);
    Ok(session)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }

    if let Command::Validate = cli.command {
        log::info!("Validating configuration...");
        if let Err(e) = config.validate() {
            log::error!("Config validation failed: {}", e);
            return Err(e);
        }
        log::info!("✓ Config OK (API: {})", config.client.base_url);
        return Ok(());
    }

    config.validate()?;
    let api = RepositoryApi::new(HttpSource::new(&config.client)?, config.repository.clone());

    match cli.command {
        Command::Departments => {
            let departments = api.departments().await.unwrap_or_else(|e| {
                log::error!("Failed to load departments: {e}");
                Vec::new()
            });

            if cli.json {
                print_json(&departments)?;
            } else if departments.is_empty() {
                println!("No departments found.");
            } else {
                for dept in &departments {
                    println!(
                        "{:>6}  {:<50} {:>6}",
                        dept.id,
                        dept.display_name(&config.repository.department_prefix),
                        dept.item_count
                    );
                }
            }
        }

        Command::List {
            department,
            search,
            page,
            page_size,
        } => {
            let mut session = load_session(&config, &api).await?;
            if let Some(size) = page_size {
                session.set_page_size(PageSize::try_from(size)?);
            }
            session.select_department_or_all(DepartmentFilter::from_option(department))?;
            session.set_search(search.unwrap_or_default());
            session.go_to_page(page)?;

            let view = session.view();
            if cli.json {
                print_json(&view)?;
            } else {
                print_listing(&view);
            }
        }

        Command::Stats { department } => {
            let mut session = load_session(&config, &api).await?;
            session.select_department_or_all(DepartmentFilter::from_option(department))?;

            let stats = session.stats(Local::now().year());
            if cli.json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
        }

        Command::Show { item_id } => {
            let entries = api.item_metadata(&item_id).await.unwrap_or_else(|e| {
                log::warn!("Failed to load metadata for item {item_id}: {e}");
                Vec::new()
            });

            let details = ArticleDetails::from_metadata(&entries);
            if cli.json {
                print_json(&details)?;
            } else {
                print_details(&item_id, &details);
            }
        }

        Command::Validate => {}
    }

    Ok(())
}
