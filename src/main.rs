use dotenvy::dotenv;
use finance_buddy::{
    bot::{self, BotData},
    config,
    core::{goal::GoalStore, responder::Responder, storage::DatabaseStore},
    errors::{Error, Result},
};
use std::{env, time::Duration};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal since env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load chat configuration
    let app_config = config::chat::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let responder = Responder::from_config(&app_config.chat)
        .inspect_err(|e| error!("Invalid chat configuration: {}", e))?;

    // 4. Open the database and restore saved goals
    let db = config::database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    config::database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;
    let goals = GoalStore::load(DatabaseStore::new(db)).await;

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(
        goals,
        responder,
        Duration::from_millis(app_config.chat.reply_delay_ms),
    );
    bot::run_bot(token, data).await
}
