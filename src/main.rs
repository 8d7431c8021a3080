mod config;
mod db;
mod discord;
mod error;
mod leaderboard;
mod logging;
mod rank;
mod riot;
mod sync;

use tracing::info;

use crate::config::Config;
use crate::db::Repository;
use crate::error::AppError;
use crate::riot::RiotClient;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    logging::init();

    info!("🐙 Starting...");

    let config = Config::from_env()?;

    let pool = db::connect(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    let repository = Repository::new(pool);

    let riot = RiotClient::new(
        config.riot_api_key.clone(),
        config.riot_rate_limit_per_second,
    );

    let token = config.discord_token.clone();
    let framework = discord::create_framework(config, repository, riot);
    let mut client = discord::build_client(&token, framework).await?;

    info!("🌐 Connecting to gateway");
    client.start().await?;

    Ok(())
}
