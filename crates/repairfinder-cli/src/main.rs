mod leads;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "repairfinder-cli")]
#[command(about = "RepairFinder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Find repair shops around a point and print them as JSON, nearest first
    Shops {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Search radius in meters (clamped to 500-12000)
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Resolve a place name to coordinates
    Geocode {
        /// Free-text place, e.g. "Koramangala, Bengaluru"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Apply pending database migrations
    Migrate,
    /// Show the most recent leads
    Leads {
        /// Maximum number of leads to show (clamped to 1-200)
        #[arg(long, default_value = "20")]
        limit: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("repairfinder-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = repairfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Shops { lat, lng, radius } => {
            search::run_shops(&config, lat, lng, radius).await?;
        }
        Commands::Geocode { query } => {
            search::run_geocode(&config, &query.join(" ")).await?;
        }
        Commands::Migrate => {
            let pool = connect(&config).await?;
            let applied = repairfinder_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Leads { limit } => {
            let pool = connect(&config).await?;
            leads::run_leads_list(&pool, limit).await?;
        }
    }

    Ok(())
}

async fn connect(config: &repairfinder_core::AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = repairfinder_db::PoolConfig::from_app_config(config);
    let pool = repairfinder_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}
