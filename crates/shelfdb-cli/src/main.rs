use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod report;
mod rescore;
mod scrape;

#[derive(Debug, Parser)]
#[command(name = "shelfdb")]
#[command(about = "Book metadata and review sentiment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape reviews for one external id, or for every known book.
    Scrape {
        /// External id to scrape. Omit to re-scrape all books that carry one.
        external_id: Option<String>,
        /// Review target per book. 0 means unbounded; defaults to the
        /// configured target.
        #[arg(long)]
        max_reviews: Option<usize>,
    },
    /// Resolve a (title, author) against the remote catalog, then scrape
    /// metadata and reviews and persist them.
    Ingest {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: Option<String>,
        /// Review target. 0 means unbounded; defaults to the configured
        /// target.
        #[arg(long)]
        max_reviews: Option<usize>,
    },
    /// Re-score persisted reviews with the lexicon strategy, in place.
    Rescore {
        /// Restrict the pass to one book.
        #[arg(long)]
        book_id: Option<i64>,
    },
    /// Delete duplicate books sharing a normalized (title, author) pair,
    /// keeping the oldest row of each group.
    Dedupe,
    /// Print the sentiment breakdown for a book.
    Report {
        #[arg(long)]
        book_id: i64,
        /// Emit JSON instead of the human-readable summary.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = shelfdb_core::load_app_config()?;
    init_tracing(&config.log_level);

    let pool = shelfdb_db::connect_pool(
        &config.database_url,
        shelfdb_db::PoolConfig::from_app_config(&config),
    )
    .await?;
    shelfdb_db::run_migrations(&pool).await?;
    match cli.command {
        Commands::Scrape {
            external_id,
            max_reviews,
        } => {
            let ctx = scrape::ScrapeContext::new(&config, pool)?;
            let target = scrape::resolve_review_target(max_reviews, &config);
            match external_id {
                Some(external_id) => {
                    // Single-book mode: a failure is fatal for the invocation.
                    let book = ctx.scrape_external_id(&external_id, target).await?;
                    println!("scraped \"{}\" (book id {})", book.title, book.id);
                }
                None => {
                    let totals = ctx.scrape_all(target).await?;
                    println!("{totals}");
                }
            }
        }
        Commands::Ingest {
            title,
            author,
            max_reviews,
        } => {
            let ctx = scrape::ScrapeContext::new(&config, pool)?;
            let target = scrape::resolve_review_target(max_reviews, &config);
            let book = ctx
                .ingest_by_title(&title, author.as_deref(), target)
                .await?;
            println!("ingested \"{}\" (book id {})", book.title, book.id);
        }
        Commands::Rescore { book_id } => {
            let updated = rescore::run(&pool, book_id).await?;
            println!("re-scored {updated} reviews");
        }
        Commands::Dedupe => {
            let deleted = shelfdb_db::delete_duplicate_books(&pool).await?;
            println!("deleted {deleted} duplicate books");
        }
        Commands::Report { book_id, json } => {
            report::run(&pool, book_id, json).await?;
        }
    }

    Ok(())
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
