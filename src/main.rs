use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use media_search_core::{
    config::Config,
    models::{SearchContext, SearchCriteria, SearchDomain},
    query::{BoolQuery, BucketOrder, QueryCompiler},
    scoring::RelevanceScorer,
    suggest::SuggestionStore,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "media-search")]
#[command(about = "Compile media search queries and try out suggestions", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file layered over the built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile search criteria from a JSON file
    Compile {
        /// subtitles, media or pages
        #[arg(short, long, default_value = "media")]
        domain: SearchDomain,

        #[arg(long, value_name = "FILE")]
        criteria: PathBuf,

        /// Parent path of every field; empty for the document root
        #[arg(short, long, default_value = "")]
        prefix: String,

        /// Wrap the query in the relevance rule set
        #[arg(long)]
        score: bool,

        /// Print query-language text instead of the query tree
        #[arg(long, conflicts_with = "score")]
        fragment: bool,

        /// Only match published documents
        #[arg(long)]
        published_only: bool,
    },

    /// Show how a facet sort directive orders buckets
    FacetOrder {
        #[arg(short, long)]
        sort: Option<String>,
    },

    /// Load `group<TAB>text` lines and look up a prefix
    Suggest {
        #[arg(long, value_name = "FILE")]
        entries: PathBuf,

        #[arg(short, long)]
        prefix: String,

        /// Group to search; repeat to search several
        #[arg(short, long, required = true)]
        group: Vec<String>,

        #[arg(short, long)]
        size: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::load().context("failed to load configuration")?,
    };

    init_tracing(&config);

    match cli.command {
        Commands::Compile {
            domain,
            criteria,
            prefix,
            score,
            fragment,
            published_only,
        } => {
            let raw = std::fs::read_to_string(&criteria)
                .with_context(|| format!("failed to read {}", criteria.display()))?;
            let criteria: SearchCriteria =
                serde_json::from_str(&raw).context("criteria file is not valid JSON")?;
            let compiler = QueryCompiler::new(domain, &config.search);
            let context = if published_only {
                SearchContext::published_only()
            } else {
                SearchContext::new()
            };

            if fragment {
                let fragment =
                    compiler.compile_fragment(Some(&criteria), &context, Some(&prefix))?;
                println!("{}", fragment);
                return Ok(());
            }

            let query = compiler.compile(
                Some(&criteria),
                &context,
                BoolQuery::new(),
                Some(&prefix),
            )?;
            let output = if score {
                let scorer = RelevanceScorer::new(&config.scoring)?;
                serde_json::to_string_pretty(&scorer.wrap(query))?
            } else {
                serde_json::to_string_pretty(&query)?
            };
            println!("{}", output);
        }

        Commands::FacetOrder { sort } => {
            let order = BucketOrder::resolve_name(sort.as_deref());
            println!("{}", serde_json::to_string(&order)?);
        }

        Commands::Suggest {
            entries,
            prefix,
            group,
            size,
        } => {
            let store = SuggestionStore::new(config.suggest.clone())?;
            let raw = std::fs::read_to_string(&entries)
                .with_context(|| format!("failed to read {}", entries.display()))?;

            for (line_no, line) in raw.lines().enumerate() {
                if line.trim().is_empty() || line.starts_with('#') {
                    continue;
                }
                let Some((entry_group, text)) = line.split_once('\t') else {
                    bail!("line {} is not of the form group<TAB>text", line_no + 1);
                };
                store.index(text, entry_group)?;
            }

            let groups: Vec<&str> = group.iter().map(String::as_str).collect();
            for suggestion in store.suggest_in(&prefix, &groups, size) {
                println!("{}\t{:.3}", suggestion.text, suggestion.score);
            }
        }
    }

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    // Logs go to stderr so command output stays parseable
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
