//! Goal Discord commands - create savings goals and list their progress.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            goal::{NewGoal, parse_deadline},
            progress::{self, GoalCard, truncate_label},
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::warn;

    /// Discord allows at most 25 fields per embed.
    const MAX_EMBED_FIELDS: usize = 25;
    /// Discord's limit on an embed field name.
    const EMBED_FIELD_NAME_LIMIT: usize = 256;
    /// Discord's limit on an embed field value.
    const EMBED_FIELD_VALUE_LIMIT: usize = 1024;
    /// Longest goal name accepted from `/goal create`.
    const MAX_NAME_LENGTH: u32 = 200;
    /// Longest goal description accepted from `/goal create`.
    const MAX_DESCRIPTION_LENGTH: u32 = 900;

    /// Parent command for savings goals.
    #[poise::command(slash_command, subcommands("goal_create", "goal_list"))]
    pub async fn goal(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Управление целями. Доступные команды:\n\
            `/goal create` - Создать новую финансовую цель\n\
            `/goal list` - Показать все цели и прогресс";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Creates a new savings goal.
    #[poise::command(slash_command, rename = "create")]
    pub async fn goal_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Название цели (например, 'Резервный фонд')"]
        #[max_length = 200]
        name: String,
        #[description = "Сумма в рублях, целое число (например, 300000)"] target_amount: i64,
        #[description = "Срок в формате ГГГГ-ММ-ДД (например, 2025-12-31)"] deadline: String,
        #[description = "Описание (необязательно)"]
        #[max_length = 900]
        description: Option<String>,
    ) -> Result<()> {
        let description = description.unwrap_or_default();
        if exceeds(&name, MAX_NAME_LENGTH) || exceeds(&description, MAX_DESCRIPTION_LENGTH) {
            ctx.say(format!(
                "❌ Слишком длинный текст: название до {MAX_NAME_LENGTH}, описание до {MAX_DESCRIPTION_LENGTH} символов."
            ))
            .await?;
            return Ok(());
        }

        let new_goal = match parse_deadline(&deadline).and_then(|deadline| {
            NewGoal::new(&name, target_amount, deadline, &description)
        }) {
            Ok(new_goal) => new_goal,
            Err(e @ Error::InvalidGoal { .. }) => {
                ctx.say(format!("❌ Не удалось создать цель: {e}")).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let created = {
            let mut goals = ctx.data().goals.lock().await;
            goals.create_goal(new_goal).await
        };

        match created {
            Ok(created) => {
                let card = GoalCard::new(&created, Utc::now());
                let embed = serenity::CreateEmbed::default()
                    .title("✅ Цель успешно создана!")
                    .color(0x0010_B981)
                    .field(card_field_name(&card), card_field_value(&card)?, false);

                ctx.send(poise::CreateReply::default().embed(embed)).await?;
            }
            Err(e @ Error::PersistenceWrite { .. }) => {
                warn!("Goal creation failed: {}", e);
                ctx.say(format!(
                    "❌ Цель '{name}' не сохранена: {e}. Попробуйте ещё раз."
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }

    /// Lists every goal with its progress, in creation order.
    #[poise::command(slash_command, rename = "list")]
    pub async fn goal_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let cards = {
            let goals = ctx.data().goals.lock().await;
            progress::goal_cards(goals.list_goals(), Utc::now())
        };

        if cards.is_empty() {
            ctx.say(progress::EMPTY_GOALS_MESSAGE).await?;
            return Ok(());
        }

        let mut embed_fields = Vec::with_capacity(cards.len());
        for card in &cards {
            embed_fields.push((card_field_name(card), card_field_value(card)?, false));
        }

        for (page, fields) in embed_fields.chunks(MAX_EMBED_FIELDS).enumerate() {
            let mut embed = serenity::CreateEmbed::default()
                .color(0x0066_7EEA)
                .fields(fields.iter().cloned());
            if page == 0 {
                embed = embed.title("🎯 Финансовые цели").footer(
                    serenity::CreateEmbedFooter::new(format!("Всего целей: {}", cards.len())),
                );
            }
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }

        Ok(())
    }

    fn exceeds(text: &str, limit: u32) -> bool {
        text.chars().count() > limit as usize
    }

    // Stored goals may predate the length limits, so both parts are cut to fit an embed field.
    fn card_field_name(card: &GoalCard) -> String {
        let suffix = format!(" · {}", card.amount_label);
        let budget = EMBED_FIELD_NAME_LIMIT.saturating_sub(suffix.encode_utf16().count());
        format!("{}{suffix}", truncate_label(&card.title, budget))
    }

    fn card_field_value(card: &GoalCard) -> Result<String> {
        let mut value = String::new();
        writeln!(&mut value, "{} {}", card.progress_bar, card.percent_label)?;
        writeln!(&mut value, "{}", card.saved_label)?;
        write!(&mut value, "⏳ {}", card.deadline_label)?;
        if let Some(description) = &card.description {
            // "\n_" and "_" around the description
            let budget = EMBED_FIELD_VALUE_LIMIT.saturating_sub(value.encode_utf16().count() + 3);
            write!(&mut value, "\n_{}_", truncate_label(description, budget))?;
        }
        Ok(value)
    }

}

// Re-export all commands
pub use inner::*;
