//! Chat Discord commands - ask the finance assistant and review the conversation.
//!
//! Each channel keeps its own in-memory transcript; nothing here is persisted.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::chat::{ChatMessage, Transcript},
        errors::{Error, Result},
    };
    use std::fmt::Write;
    use tracing::debug;

    /// Number of messages shown by `/history`.
    const HISTORY_LENGTH: usize = 10;

    /// Asks the finance assistant a question.
    ///
    /// The assistant answers after a short pause, matching the message against
    /// its keyword table or picking a general reply.
    #[poise::command(slash_command)]
    pub async fn ask(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Ваш вопрос (например, 'как начать экономию?')"]
        message: String,
    ) -> Result<()> {
        let message = message.trim().to_string();
        if message.is_empty() {
            ctx.say("❌ Сообщение не может быть пустым.").await?;
            return Ok(());
        }

        let channel_id = ctx.channel_id().get();
        let data = ctx.data();
        data.transcripts
            .lock()
            .await
            .entry(channel_id)
            .or_default()
            .push(ChatMessage::user(message.as_str()));

        // Acknowledge quickly, then answer after the configured pause
        ctx.defer().await?;
        tokio::time::sleep(data.reply_delay).await;

        let reply = data.responder.reply(&message)?.to_string();
        debug!("Assistant reply in channel {}: {}", channel_id, reply);

        data.transcripts
            .lock()
            .await
            .entry(channel_id)
            .or_default()
            .push(ChatMessage::assistant(reply.as_str()));

        ctx.say(format!("> {message}\n🤖 {reply}")).await?;
        Ok(())
    }

    /// Shows the latest messages exchanged with the assistant in this channel.
    #[poise::command(slash_command)]
    pub async fn history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let channel_id = ctx.channel_id().get();

        let text = {
            let transcripts = ctx.data().transcripts.lock().await;
            match transcripts.get(&channel_id) {
                Some(transcript) if !transcript.is_empty() => Some(render_transcript(transcript)?),
                _ => None,
            }
        };

        let Some(text) = text else {
            ctx.say("💬 В этом канале ещё не было вопросов. Спросите что-нибудь через `/ask`!")
                .await?;
            return Ok(());
        };

        ctx.say(text).await?;
        Ok(())
    }

    fn render_transcript(transcript: &Transcript) -> Result<String> {
        let mut text = String::from("💬 **История чата**\n");
        for entry in transcript.recent(HISTORY_LENGTH) {
            writeln!(&mut text, "{} {}", entry.sender, entry.content)?;
        }
        Ok(text)
    }
}

// Re-export all commands
pub use inner::*;
