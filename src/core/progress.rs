//! Goal progress calculations and the goal card view model.
//!
//! Progress is derived on demand and never stored. All functions are
//! framework-agnostic and return plain data or strings that the bot layer
//! arranges into messages.

use crate::core::goal::Goal;
use chrono::{DateTime, NaiveTime, Utc};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Shown in place of the goal list when there are no goals.
pub const EMPTY_GOALS_MESSAGE: &str = "У вас пока нет финансовых целей\n\
    Создайте первую цель, чтобы начать отслеживать прогресс!";

/// Derived progress of a goal at a point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Saved share of the target, clamped to 0-100
    pub percent: f64,
    /// Whole days until the deadline, rounded up; zero or negative once it has passed
    pub days_left: i64,
    /// Whether the deadline has been reached
    pub expired: bool,
}

/// Computes the progress of `goal` as of `now`.
///
/// The deadline counts from midnight UTC of its date, so a deadline of today
/// has `days_left == 0` and is already expired. A non-positive target yields
/// 0% rather than a division by zero.
#[must_use]
pub fn compute_progress(goal: &Goal, now: DateTime<Utc>) -> GoalProgress {
    let percent = calculate_percent(goal.current_amount, goal.target_amount);
    let days_left = days_until(goal, now);

    GoalProgress {
        percent,
        days_left,
        expired: days_left <= 0,
    }
}

/// Share of `target` covered by `current`, in percent, clamped to 0-100.
#[must_use]
pub fn calculate_percent(current: i64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }

    #[allow(clippy::cast_precision_loss)] // Amounts are far below 2^52
    let ratio = current as f64 / target as f64;
    (ratio * 100.0).clamp(0.0, 100.0)
}

fn days_until(goal: &Goal, now: DateTime<Utc>) -> i64 {
    let deadline = goal.deadline.and_time(NaiveTime::MIN).and_utc();
    let remaining = deadline.signed_duration_since(now).num_milliseconds();

    // Integer division truncates toward zero, which is already the ceiling for negatives.
    let days = remaining / MILLIS_PER_DAY;
    if remaining % MILLIS_PER_DAY > 0 {
        days + 1
    } else {
        days
    }
}

/// Generates a text progress bar like `[████████░░]`.
///
/// # Arguments
/// * `progress_percent` - Progress percentage, clamped to 0-100 for drawing
/// * `bar_length` - Length of the bar in characters (default 10)
#[must_use]
pub fn format_progress_bar(progress_percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped_progress = progress_percent.clamp(0.0, 100.0);

    // clamped_progress ∈ [0, 100] and length is small, so the result fits in [0, length].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped_progress / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Formats an amount in rubles with thousands grouped by non-breaking spaces,
/// e.g. `₽ 300 000`.
#[must_use]
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('\u{a0}');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0 { "-" } else { "" };
    format!("₽ {sign}{grouped}")
}

/// Describes the time left until the deadline: `Осталось 12 дней` or `Срок истек`.
#[must_use]
pub fn format_days_left(progress: &GoalProgress) -> String {
    if progress.expired {
        return "Срок истек".to_string();
    }
    let days = progress.days_left;
    format!("Осталось {days} {}", day_word(days))
}

fn day_word(days: i64) -> &'static str {
    let n = days.unsigned_abs();
    match (n % 10, n % 100) {
        (_, 11..=14) => "дней",
        (1, _) => "день",
        (2..=4, _) => "дня",
        _ => "дней",
    }
}

/// Shortens `text` to at most `max_units` UTF-16 code units, the unit Discord
/// measures message limits in. A shortened text ends with `…`.
#[must_use]
pub fn truncate_label(text: &str, max_units: usize) -> String {
    if text.encode_utf16().count() <= max_units {
        return text.to_string();
    }

    let budget = max_units.saturating_sub(1);
    let mut used = 0;
    let mut truncated = String::new();
    for ch in text.chars() {
        used += ch.len_utf16();
        if used > budget {
            break;
        }
        truncated.push(ch);
    }
    if max_units > 0 {
        truncated.push('…');
    }
    truncated
}

/// Everything needed to display one goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalCard {
    /// Goal name
    pub title: String,
    /// Target, e.g. `₽ 300 000`
    pub amount_label: String,
    /// Saved amount against target, e.g. `₽ 0 из ₽ 300 000`
    pub saved_label: String,
    /// Text progress bar
    pub progress_bar: String,
    /// Rounded percent, e.g. `42%`
    pub percent_label: String,
    /// Remaining time or expiry notice
    pub deadline_label: String,
    /// Description, omitted when empty
    pub description: Option<String>,
    /// The progress the labels were built from
    pub progress: GoalProgress,
}

impl GoalCard {
    /// Builds the card for `goal` as of `now`.
    #[must_use]
    pub fn new(goal: &Goal, now: DateTime<Utc>) -> Self {
        let progress = compute_progress(goal, now);
        let target = format_amount(goal.target_amount);

        Self {
            title: goal.name.clone(),
            saved_label: format!("{} из {target}", format_amount(goal.current_amount)),
            amount_label: target,
            progress_bar: format_progress_bar(progress.percent, None),
            percent_label: format!("{:.0}%", progress.percent.round()),
            deadline_label: format_days_left(&progress),
            description: (!goal.description.is_empty()).then(|| goal.description.clone()),
            progress,
        }
    }
}

/// Builds cards for every goal, in collection order.
#[must_use]
pub fn goal_cards(goals: &[Goal], now: DateTime<Utc>) -> Vec<GoalCard> {
    goals.iter().map(|goal| GoalCard::new(goal, now)).collect()
}
