// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use kb_navigator::utils::logging::{
    format_error, format_info, format_step, format_success, format_warning,
};
use kb_navigator::{
    BatchSearcher, Config, DocumentLoader, JsonExporter, KeywordExtractor, KnowledgeBase,
    MatchFilter, Outline, SearchEngine, SortOrder, Validator, highlight_spans, load_queries,
    sort_matches,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Characters of match text shown per search result.
const RESULT_PREVIEW_CHARS: usize = 240;
/// Characters of the best match shown per batch query.
const BATCH_PREVIEW_CHARS: usize = 60;

#[derive(Parser)]
#[command(name = "kb-navigator")]
#[command(version = "0.1.0")]
#[command(about = "Keyword search over Markdown and plain-text knowledge bases", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a knowledge base for a typed or transcribed query
    Search {
        file: PathBuf,

        query: String,

        /// Substring matching only
        #[arg(long)]
        exact: bool,

        /// Minimum similarity (0-100) for fuzzy matches
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        threshold: Option<u8>,

        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,

        #[arg(long, conflicts_with = "content_only")]
        headings_only: bool,

        #[arg(long)]
        content_only: bool,

        /// Minimum relevance percent to display
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        min_relevance: u8,

        /// Only show matches under this top-level chapter
        #[arg(long)]
        chapter: Option<String>,

        #[arg(long, default_value = "relevance")]
        sort: SortOrder,

        /// Write the results as JSON into this directory
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Print the keywords extracted from a query
    Keywords { query: String },

    /// Print the heading outline of a knowledge base
    Outline { file: PathBuf },

    /// Run one query per line of QUERIES_FILE against a knowledge base
    Batch {
        file: PathBuf,

        queries_file: PathBuf,

        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Print where the query's keywords occur in a knowledge base
    Highlight { file: PathBuf, query: String },
}

struct SearchArgs {
    query: String,
    exact: bool,
    threshold: Option<u8>,
    limit: Option<usize>,
    filter: MatchFilter,
    sort: SortOrder,
    export: Option<PathBuf>,
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    kb_navigator::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Search {
            file,
            query,
            exact,
            threshold,
            limit,
            headings_only,
            content_only,
            min_relevance,
            chapter,
            sort,
            export,
            pretty,
        } => {
            let filter = MatchFilter {
                show_headings: !content_only,
                show_content: !headings_only,
                min_relevance,
                chapter,
            };
            let args = SearchArgs {
                query,
                exact,
                threshold,
                limit,
                filter,
                sort,
                export,
                pretty,
            };
            cmd_search(config, &file, args).await?;
        }
        Commands::Keywords { query } => {
            cmd_keywords(&config, &query)?;
        }
        Commands::Outline { file } => {
            cmd_outline(&file).await?;
        }
        Commands::Batch {
            file,
            queries_file,
            export,
            pretty,
        } => {
            cmd_batch(config, &file, &queries_file, export, pretty, cli.color).await?;
        }
        Commands::Highlight { file, query } => {
            cmd_highlight(&config, &file, &query).await?;
        }
    }

    Ok(())
}

async fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    Validator::validate_knowledge_base(path)?;

    let path = path.to_path_buf();
    let knowledge_base = tokio::task::spawn_blocking(move || DocumentLoader::new().load(&path))
        .await
        .context("Loading task failed")?
        .context("Failed to load knowledge base")?;

    if knowledge_base.is_empty() {
        warn!("{} contains no text", knowledge_base.display_name());
    }
    Ok(knowledge_base)
}

async fn cmd_search(config: Config, file: &Path, args: SearchArgs) -> Result<()> {
    Validator::validate_query(&args.query)?;
    let knowledge_base = load_knowledge_base(file).await?;

    let fuzzy_enabled = config.search.fuzzy_enabled && !args.exact;
    let threshold = args.threshold.unwrap_or(config.search.fuzzy_threshold);
    let engine = SearchEngine::new(knowledge_base, config);

    let outcome = engine.search_with(&args.query, fuzzy_enabled, threshold);
    let knowledge_base = engine.knowledge_base();

    let mut shown = args.filter.apply(&outcome.matches, &knowledge_base.headings);
    sort_matches(&mut shown, args.sort, &knowledge_base.headings);
    if let Some(limit) = args.limit {
        shown.truncate(limit);
    }

    let keywords: Vec<&str> = outcome.keywords.iter().map(String::as_str).collect();
    println!("{}", format_info(&format!("Keywords: {}", keywords.join(", "))));

    if shown.is_empty() {
        println!("\nNo matches found for query: \"{}\"\n", outcome.query);
        println!("Try:");
        println!("  - Using different search terms");
        println!("  - Lowering --threshold or dropping --exact");
        println!("  - Removing --chapter or --min-relevance filters");
    } else {
        println!(
            "\nFound {} match(es) in {} ({:.1} ms{})\n",
            shown.len(),
            knowledge_base.display_name(),
            outcome.elapsed.as_secs_f64() * 1000.0,
            if outcome.from_cache { ", cached" } else { "" }
        );
        println!("{}", "=".repeat(80));

        for (idx, found) in shown.iter().enumerate() {
            let relevance = format!("{}%", found.relevance_percent());
            let relevance = if found.is_heading() {
                relevance.cyan().bold()
            } else {
                relevance.normal()
            };
            println!("\n{}. {}", idx + 1, relevance);
            print!("{}", found.format_summary(RESULT_PREVIEW_CHARS));
        }
        println!("\n{}", "=".repeat(80));
    }

    if let Some(dir) = args.export {
        let exporter = JsonExporter::new(dir)?;
        let path = exporter.export_outcome(&outcome, knowledge_base, args.pretty)?;
        println!("{}", format_success(&format!("Exported to {}", path.display())));
    }

    Ok(())
}

fn cmd_keywords(config: &Config, query: &str) -> Result<()> {
    Validator::validate_query(query)?;
    let extractor = KeywordExtractor::new(config.extraction.clone());

    for keyword in extractor.extract_keywords(query) {
        println!("{}", keyword);
    }
    Ok(())
}

async fn cmd_outline(file: &Path) -> Result<()> {
    let knowledge_base = load_knowledge_base(file).await?;
    let outline = Outline::build(&knowledge_base.headings);

    if outline.is_empty() {
        println!("{}", format_warning("No headings found"));
        return Ok(());
    }

    print!("{}", outline.render());
    println!(
        "\n{}",
        format_info(&format!("{} headings", outline.len()))
    );
    Ok(())
}

async fn cmd_batch(
    config: Config,
    file: &Path,
    queries_file: &Path,
    export: Option<PathBuf>,
    pretty: bool,
    colored: bool,
) -> Result<()> {
    println!("{}", format_step(1, 3, "Loading knowledge base"));
    let knowledge_base = load_knowledge_base(file).await?;
    let queries = load_queries(queries_file).context("Failed to read queries")?;
    if queries.is_empty() {
        println!("{}", format_warning("No queries to run"));
        return Ok(());
    }

    println!(
        "{}",
        format_step(2, 3, &format!("Searching {} queries", queries.len()))
    );
    let engine = Arc::new(SearchEngine::new(knowledge_base, config));
    let report = BatchSearcher::new(Arc::clone(&engine))
        .with_progress(true, colored)
        .run(queries)
        .await;

    for entry in &report.entries {
        match &entry.outcome {
            Ok(outcome) => {
                let best = outcome
                    .matches
                    .first()
                    .map(|m| {
                        let first_line = m.text.lines().next().unwrap_or_default();
                        Validator::truncate_text(first_line, BATCH_PREVIEW_CHARS)
                    })
                    .unwrap_or_else(|| "-".to_string());
                println!("{:>3}  {}  ->  {}", outcome.matches.len(), entry.query, best);
            }
            Err(e) => println!("{}", format_error(&format!("{}  ->  {}", entry.query, e))),
        }
    }

    println!("{}", format_step(3, 3, "Summary"));
    println!("{}", format_info(&report.metrics.format()));
    println!(
        "{}",
        format_info(&format!(
            "{:.1} queries/sec, {} cache hits, {:.1} matches per query, {:.0}% succeeded",
            report.stats.queries_per_second(),
            report.stats.cache_hits,
            report.stats.average_matches(),
            report.stats.success_rate()
        ))
    );

    if let Some(dir) = export {
        let outcomes: Vec<_> = report.outcomes().cloned().collect();
        let manifest = JsonExporter::new(dir)?.export_batch(
            &outcomes,
            engine.knowledge_base(),
            pretty,
        )?;
        println!(
            "{}",
            format_success(&format!("Exported {} reports", manifest.files.len()))
        );
    }

    Ok(())
}

async fn cmd_highlight(config: &Config, file: &Path, query: &str) -> Result<()> {
    Validator::validate_query(query)?;
    let knowledge_base = load_knowledge_base(file).await?;
    let keywords = KeywordExtractor::new(config.extraction.clone()).extract_keywords(query);

    let spans = highlight_spans(&knowledge_base.text, &keywords);
    for span in &spans {
        println!("{}:{}  {}", span.line, span.column, span.matched.yellow());
    }
    println!(
        "\n{}",
        format_info(&format!("{} occurrences", spans.len()))
    );
    Ok(())
}
