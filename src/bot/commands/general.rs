//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't touch goals or the chat
//! transcript and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Finance Buddy — помощь**\n\
        Ваш персональный финансовый помощник.\n\n\
        **Цели**\n\
        • `/goal create <название> <сумма> <срок> [описание]` - Создать финансовую цель (срок в формате ГГГГ-ММ-ДД).\n\
        • `/goal list` - Показать все цели и прогресс.\n\n\
        **Чат**\n\
        • `/ask <вопрос>` - Спросить совета (экономия, бюджет, инвестиции, долги...).\n\
        • `/history` - Показать последние сообщения в этом канале.\n\n\
        **Утилиты**\n\
        • `/ping` - Проверить, что бот на связи.\n\
        • `/help` - Показать эту справку.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
