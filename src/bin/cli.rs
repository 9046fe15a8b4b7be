//! job-scraper command line
//!
//! Runs a site adapter or the LLM adapter and prints the results as JSON on stdout.
//! Logs go to stderr; `--debug` (or `DEBUG=true`) lowers the default level to debug
//! and `RUST_LOG` overrides both.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use job_scraper::{AdapterKind, AppConfig, BodyFormat, LaunchOptions, LlmAdapter, ModelSession, ScraperError,
                  collect_listings};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "job-scraper")]
#[command(version)]
#[command(about = "Scrape job boards with site adapters or a language model", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Launch the browser in headed mode (default: headless)
    #[arg(long, short = 'H', global = true)]
    headed: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search a supported job board
    Search {
        #[arg(long, value_enum)]
        site: AdapterKind,

        #[arg(long, short = 'k')]
        keywords: String,

        #[arg(long, short = 'l', default_value = "")]
        location: String,

        /// Number of result pages to read
        #[arg(long, short = 'p', default_value = "1")]
        pages: u32,

        /// Also scrape every job page
        #[arg(long)]
        details: bool,
    },

    /// Scrape a single job page of a supported job board
    Detail {
        #[arg(long, value_enum)]
        site: AdapterKind,

        #[arg(value_name = "URL")]
        url: String,
    },

    /// Extract job references from any board with the configured model
    LlmSearch {
        /// Search URL with a `{num_page}` placeholder
        #[arg(long, value_name = "URL")]
        template: String,

        #[arg(long, short = 'p', default_value = "1")]
        pages: u32,

        /// Example job URL (repeatable)
        #[arg(long = "example", value_name = "URL")]
        examples: Vec<String>,

        /// Also extract every job page
        #[arg(long)]
        details: bool,

        /// Send pages to the model as Markdown instead of HTML
        #[arg(long)]
        markdown: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let level = if cli.debug || config.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut launch = LaunchOptions::new().headless(!cli.headed);
    if let Some(path) = &config.chrome_path {
        launch = launch.chrome_path(path);
    }

    match cli.command {
        Command::Search { site, keywords, location, pages, details } => {
            let adapter = site.build(launch).map_err(|e| setup_error(e, "the site adapter"))?;
            let listings = collect_listings(adapter.as_ref(), &keywords, &location, pages, details);
            print_json(&listings)?;
        }
        Command::Detail { site, url } => {
            let adapter = site.build(launch).map_err(|e| setup_error(e, "the site adapter"))?;
            let Some(detail) = adapter.get_job_details(&url) else {
                bail!("No job details could be extracted from {}", url);
            };
            print_json(&detail)?;
        }
        Command::LlmSearch { template, pages, examples, details, markdown } => {
            let session = ModelSession::new(&config.llm).map_err(|e| setup_error(e, "the model session"))?;
            let format = if markdown { BodyFormat::Markdown } else { BodyFormat::Html };
            let adapter = LlmAdapter::with_browser(session, launch).body_format(format);

            if details {
                let results: Vec<_> = adapter
                    .search_and_detail_with_llm(&template, pages, &examples)
                    .into_iter()
                    .map(|(job, detail)| LlmListing { job_name: job.job_name, job_url: job.job_url, detail })
                    .collect();
                print_json(&results)?;
            } else {
                print_json(&adapter.search_jobs_with_llm(&template, pages, &examples))?;
            }
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct LlmListing {
    job_name: String,
    job_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<job_scraper::JobDetail>,
}

/// Configuration faults point at the environment; anything else is a setup failure
fn setup_error(error: ScraperError, what: &str) -> anyhow::Error {
    let context = if error.is_config() {
        format!("Invalid configuration for {}, check LLM_* variables and API keys in the environment or .env", what)
    } else {
        format!("Failed to set up {}", what)
    };
    anyhow::Error::new(error).context(context)
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize results")?);
    Ok(())
}
