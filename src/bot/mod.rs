//! Bot layer - Discord-specific interface and command handlers
//!
//! This module is the presentation adapter for Finance Buddy: slash commands call
//! into the core goal store and responder and turn their results into messages.

/// Discord command implementations (goals, chat, general)
pub mod commands;

use crate::{
    core::{chat::Transcript, goal::GoalStore, responder::Responder, storage::DatabaseStore},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
///
/// The goal store sits behind a mutex so concurrent commands append and persist
/// one at a time.
pub struct BotData {
    /// The goal collection and its durable storage
    pub goals: Mutex<GoalStore<DatabaseStore>>,
    /// Chat reply resolver
    pub responder: Responder,
    /// Pause before the assistant answers
    pub reply_delay: Duration,
    /// Chat transcripts keyed by channel id
    pub transcripts: Mutex<HashMap<u64, Transcript>>,
}

impl BotData {
    /// Creates a new `BotData` from an already restored goal store.
    #[must_use]
    pub fn new(goals: GoalStore<DatabaseStore>, responder: Responder, reply_delay: Duration) -> Self {
        Self {
            goals: Mutex::new(goals),
            responder,
            reply_delay,
            transcripts: Mutex::new(HashMap::new()),
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ Произошла ошибка: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Registers the slash commands and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::goal(),
                commands::ask(),
                commands::history(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;

    Ok(())
}
