//! Populates `species_observations` with randomized sample data for the
//! dashboard.

use std::env;

use clap::Parser;

use oceanova::database::MongoDB;
use oceanova::seeds::{observations_seed::DEFAULT_COUNT, seed_observations};

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed sample species observations into MongoDB")]
struct Args {
    /// Number of observations to generate
    #[arg(short, long, default_value_t = DEFAULT_COUNT)]
    count: usize,

    /// Append to the collection instead of replacing its contents
    #[arg(long)]
    keep_existing: bool,
}

#[actix_rt::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env.local wins over .env
    dotenv::from_filename(".env.local").ok();
    dotenv::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();

    let uri = env::var("MONGODB_URI")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or("MONGODB_URI must be set (in the environment, .env.local or .env)")?;
    let db_name = env::var("MONGODB_DB")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "oceanova".to_string());

    log::info!("🌱 Seeding {} observations into {}", args.count, db_name);

    let db = MongoDB::new(&uri, &db_name).await?;
    let inserted = seed_observations(&db, args.count, args.keep_existing).await?;

    log::info!("✅ Seed complete: {} documents written", inserted);
    Ok(())
}
