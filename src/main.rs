use anyhow::{Context, Result};
use biocite::config::{find_config_file, load_settings, ConfigFile};
use biocite::models::{Citation, CitationResult, ExtractedEntities, SearchOptions};
use biocite::utils::format_citations;
use biocite::CitationPipeline;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// biocite - Answer biomedical questions with ranked PubMed citations
#[derive(Parser, Debug)]
#[command(name = "biocite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find and rank PubMed citations for a biomedical question", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
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

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

impl OutputFormat {
    fn resolve(self) -> Self {
        match self {
            OutputFormat::Auto if std::io::stdout().is_terminal() => OutputFormat::Table,
            OutputFormat::Auto => OutputFormat::Json,
            other => other,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search PubMed for citations answering a question
    #[command(alias = "s")]
    Search {
        /// The question
        question: String,

        /// Maximum number of citations (default from config)
        #[arg(long, short)]
        max_citations: Option<usize>,

        /// Only return review articles
        #[arg(long)]
        reviews: bool,

        /// Recency window in years, 0 disables it (default from config)
        #[arg(long)]
        max_age_years: Option<u32>,
    },

    /// Show the entities recognized in a text
    Extract {
        /// Text to analyze
        text: String,
    },

    /// Show the PubMed query built for a question
    Query {
        /// The question
        question: String,

        /// Add the review filter
        #[arg(long)]
        reviews: bool,

        /// Recency window in years, 0 disables it (default from config)
        #[arg(long)]
        max_age_years: Option<u32>,
    },

    /// Show the effective configuration
    Config {
        /// Write a default configuration file to this path instead
        #[arg(long, value_name = "PATH")]
        init: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let settings = load_settings(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load configuration from {}", path.display()),
        None => "Failed to load configuration from environment".to_string(),
    })?;

    init_tracing(&cli, &settings);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    let config = Arc::new(settings.pubmed_config());
    let pipeline = CitationPipeline::new(config.clone())?;
    let format = cli.output.resolve();

    match cli.command {
        Commands::Search {
            question,
            max_citations,
            reviews,
            max_age_years,
        } => {
            let options = search_options(&pipeline, max_citations, reviews, max_age_years);

            let result = tokio::select! {
                result = pipeline.fetch_citations(&question, &options) => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, search cancelled");
                    std::process::exit(130);
                }
            };

            output_result(&result, format)?;
        }

        Commands::Extract { text } => {
            let (entities, _) = pipeline
                .prepare(&text, &SearchOptions::from_config(&config))
                .await;
            output_entities(&entities, format)?;
        }

        Commands::Query {
            question,
            reviews,
            max_age_years,
        } => {
            let options = search_options(&pipeline, None, reviews, max_age_years);
            let (_, query) = pipeline.prepare(&question, &options).await;
            if format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "question": question, "query": query }));
            } else {
                println!("{}", query);
            }
        }

        Commands::Config { init: Some(path) } => {
            write_default_config(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }

        Commands::Config { init: None } => {
            let shown = ConfigFile {
                pubmed: config.redacted(),
                logging: settings.logging.clone(),
            };
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", toml::to_string_pretty(&shown)?);
            }
        }
    }

    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    ConfigFile::create_default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn init_tracing(cli: &Cli, settings: &ConfigFile) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => settings.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };
    let json = cli.log_json || settings.logging.is_json();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("biocite={}", level)),
        ))
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn search_options(
    pipeline: &CitationPipeline,
    max_citations: Option<usize>,
    reviews: bool,
    max_age_years: Option<u32>,
) -> SearchOptions {
    let mut options = pipeline.default_options();
    if let Some(max) = max_citations {
        options = options.max_citations(max);
    }
    if reviews {
        options = options.prioritize_reviews(true);
    }
    if let Some(years) = max_age_years {
        options = options.max_age_years(years);
    }
    options
}

fn output_result(result: &CitationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Plain => {
            println!("Query: {}", result.optimized_query);
            println!();
            println!("{}", format_citations(&result.citations));
            if !result.genes_in_titles.is_empty() {
                println!();
                println!("Genes in titles: {}", result.genes_in_titles.join(", "));
            }
        }
        _ => {
            println!("Query: {}", result.optimized_query);
            if result.citations.is_empty() {
                println!("{}", format_citations(&[]));
            } else {
                println!("{}", citation_table(&result.citations));
            }
            if !result.genes_in_titles.is_empty() {
                println!("Genes in titles: {}", result.genes_in_titles.join(", "));
            }
        }
    }
    Ok(())
}

fn citation_table(citations: &[Citation]) -> comfy_table::Table {
    use comfy_table::{Attribute, Cell, Table};
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["#", "Title", "Authors", "Journal", "Year", "Review", "Score"]);

    for (i, citation) in citations.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(truncate(&citation.title, 60)).add_attribute(Attribute::Bold),
            Cell::new(truncate(&citation.authors, 30)),
            Cell::new(truncate(&citation.journal, 30)),
            Cell::new(citation.year.as_deref().unwrap_or("")),
            Cell::new(if citation.is_review { "yes" } else { "" }),
            Cell::new(
                citation
                    .relevance_score
                    .map(|s| format!("{:.2}", s))
                    .unwrap_or_default(),
            ),
        ]);
    }
    table
}

fn output_entities(entities: &ExtractedEntities, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(entities)?);
        return Ok(());
    }

    for (label, values) in [
        ("Genes", &entities.genes),
        ("Proteins", &entities.proteins),
        ("Diseases", &entities.diseases),
        ("Pathways", &entities.pathways),
        ("Keywords", &entities.keywords),
    ] {
        if !values.is_empty() {
            println!("{}: {}", label, values.join(", "));
        }
    }
    if entities.is_empty() {
        println!("No entities found.");
    }
    Ok(())
}

/// Shorten to `max` characters, marking the cut with "..."
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}
