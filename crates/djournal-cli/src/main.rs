mod analyze;
mod insights;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "djournal-cli")]
#[command(about = "Journal sentiment and recommendation command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Score a piece of text without touching the database
    Score {
        text: String,
        /// Print every sentence with its score and running breakdown
        #[arg(long)]
        detailed: bool,
    },
    /// Print the keyword set extracted from a piece of text
    Keywords { text: String },
    /// Recommend catalog locations from positive journal entries
    Recommend {
        /// Only use entries from this user's journals
        #[arg(long)]
        user: Option<i64>,
    },
    /// Recompute per-location sentiment rollups
    Rollup {
        /// Print the rollups without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Location catalog maintenance
    Locations {
        #[command(subcommand)]
        command: LocationCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check database connectivity
    Ping,
}

#[derive(Debug, Subcommand)]
enum LocationCommands {
    /// Rebuild every location's cached keyword set from its description
    ReindexKeywords {
        /// Print the keyword sets without writing them
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Score { text, detailed }) => analyze::run_score(&text, detailed)?,
        Some(Commands::Keywords { text }) => analyze::run_keywords(&text),
        Some(Commands::Db { command }) => {
            let pool = connect().await?;
            match command {
                DbCommands::Migrate => {
                    let applied = djournal_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
                DbCommands::Ping => {
                    djournal_db::ping(&pool).await?;
                    println!("database ok");
                }
            }
        }
        Some(Commands::Recommend { user }) => {
            let pool = connect().await?;
            insights::run_recommend(pool, user).await?;
        }
        Some(Commands::Rollup { dry_run }) => {
            let pool = connect().await?;
            insights::run_rollup(pool, dry_run).await?;
        }
        Some(Commands::Locations {
            command: LocationCommands::ReindexKeywords { dry_run },
        }) => {
            let pool = connect().await?;
            insights::run_reindex_keywords(&pool, dry_run).await?;
        }
        None => println!("djournal-cli: no command given; see --help"),
    }

    Ok(())
}

async fn connect() -> anyhow::Result<sqlx::PgPool> {
    let config = djournal_core::load_app_config()?;
    let pool_config = djournal_db::PoolConfig::from_app_config(&config);
    Ok(djournal_db::connect_pool(&config.database_url, pool_config).await?)
}
