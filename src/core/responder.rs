//! Keyword-driven chat responder.
//!
//! A message is lower-cased and checked against an ordered list of keyword rules.
//! The first rule whose keyword occurs anywhere in the message wins, so a keyword
//! also matches inside longer words. Unmatched messages get a reply drawn at
//! random from the fallback pool; the random source is passed in by the caller.

use crate::{
    config::chat::ChatConfig,
    errors::{Error, Result},
};
use rand::Rng;
use rand::seq::SliceRandom;

const DEFAULT_RULES: &[(&str, &str)] = &[
    (
        "привет",
        "Привет! Я ваш персональный финансовый консультант. Как дела с финансами?",
    ),
    (
        "помощь",
        "Я могу помочь вам с анализом расходов, созданием финансовых целей, советами по инвестициям и экономии. Что вас интересует?",
    ),
    (
        "экономия",
        "Для экономии рекомендую: 1) Создать резервный фонд на 3-6 месяцев расходов, 2) Отслеживать все траты, 3) Автоматизировать сбережения, 4) Пересмотреть подписки и ненужные расходы.",
    ),
    (
        "инвестиции",
        "Для начинающих инвесторов рекомендую: 1) Начать с индексных фондов, 2) Диверсифицировать портфель, 3) Инвестировать регулярно небольшими суммами, 4) Не поддаваться эмоциям при колебаниях рынка.",
    ),
    (
        "бюджет",
        "Для составления бюджета: 1) Запишите все доходы, 2) Категоризируйте расходы, 3) Определите приоритеты, 4) Создайте план сбережений, 5) Регулярно пересматривайте бюджет.",
    ),
    (
        "долги",
        "Для работы с долгами: 1) Составьте список всех долгов, 2) Определите процентные ставки, 3) Используйте метод \"снежного кома\" или \"лавины\", 4) Рассмотрите рефинансирование, 5) Избегайте новых долгов.",
    ),
];

const DEFAULT_FALLBACKS: &[&str] = &[
    "Это интересный вопрос! Можете рассказать подробнее о вашей финансовой ситуации?",
    "Я понимаю вашу озабоченность. Давайте разберем это пошагово.",
    "Отличный вопрос! Для более точного совета мне нужно больше информации о ваших доходах и расходах.",
    "Это важная тема. Рекомендую начать с анализа ваших текущих финансовых привычек.",
    "Хорошо, что вы об этом думаете! Финансовая грамотность - это основа успеха.",
];

/// A keyword and the reply it triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    keyword: String,
    response: String,
}

impl KeywordRule {
    /// Creates a rule. The keyword is lower-cased so it can match normalized input.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the keyword is empty.
    pub fn new(keyword: &str, response: &str) -> Result<Self> {
        if keyword.is_empty() {
            return Err(Error::Config {
                message: "chat keywords cannot be empty".to_string(),
            });
        }
        Ok(Self {
            keyword: keyword.to_lowercase(),
            response: response.to_string(),
        })
    }

    /// The lower-cased keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// The reply for this keyword.
    #[must_use]
    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Resolves chat messages to replies.
#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<KeywordRule>,
    fallbacks: Vec<String>,
}

impl Responder {
    /// Creates a responder trying `rules` in the given order.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if `fallbacks` is empty.
    pub fn new(rules: Vec<KeywordRule>, fallbacks: Vec<String>) -> Result<Self> {
        if fallbacks.is_empty() {
            return Err(Error::Config {
                message: "at least one fallback reply is required".to_string(),
            });
        }
        Ok(Self { rules, fallbacks })
    }

    /// Builds a responder from config, using the built-in table or pool for
    /// whichever part the config leaves empty.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if a configured keyword is empty.
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let rules = if config.keywords.is_empty() {
            default_rules()
        } else {
            config
                .keywords
                .iter()
                .map(|k| KeywordRule::new(&k.keyword, &k.response))
                .collect::<Result<Vec<_>>>()?
        };

        let fallbacks = if config.fallbacks.is_empty() {
            default_fallbacks()
        } else {
            config.fallbacks.clone()
        };

        Self::new(rules, fallbacks)
    }

    /// Keyword rules in matching order.
    #[must_use]
    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Returns the reply for `message`, drawing any fallback from `rng`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMessage`] if the message is empty or whitespace only.
    pub fn resolve<R: Rng + ?Sized>(&self, message: &str, rng: &mut R) -> Result<&str> {
        if message.trim().is_empty() {
            return Err(Error::InvalidMessage);
        }

        let normalized = message.to_lowercase();
        if let Some(rule) = self
            .rules
            .iter()
            .find(|rule| normalized.contains(rule.keyword.as_str()))
        {
            return Ok(&rule.response);
        }

        self.fallbacks
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| Error::Config {
                message: "no fallback replies configured".to_string(),
            })
    }

    /// Same as [`Responder::resolve`] with the thread-local generator.
    ///
    /// # Errors
    /// Returns [`Error::InvalidMessage`] if the message is empty or whitespace only.
    pub fn reply(&self, message: &str) -> Result<&str> {
        self.resolve(message, &mut rand::thread_rng())
    }
}

impl Default for Responder {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            fallbacks: default_fallbacks(),
        }
    }
}

fn default_rules() -> Vec<KeywordRule> {
    DEFAULT_RULES
        .iter()
        .map(|(keyword, response)| KeywordRule {
            keyword: (*keyword).to_string(),
            response: (*response).to_string(),
        })
        .collect()
}

fn default_fallbacks() -> Vec<String> {
    DEFAULT_FALLBACKS.iter().map(|s| (*s).to_string()).collect()
}
