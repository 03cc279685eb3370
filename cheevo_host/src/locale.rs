use std::collections::HashMap;

use cheevo_popup::MessageId;
use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    German,
    French,
    Spanish,
}

static MESSAGES: Lazy<HashMap<(Language, MessageId), &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            (Language::English, MessageId::AchievementUnlocked),
            "Achievement Unlocked",
        ),
        (
            (Language::German, MessageId::AchievementUnlocked),
            "Erfolg freigeschaltet",
        ),
        (
            (Language::French, MessageId::AchievementUnlocked),
            "Succès débloqué",
        ),
        (
            (Language::Spanish, MessageId::AchievementUnlocked),
            "Logro desbloqueado",
        ),
    ])
});

/// Looks up `id` for `language`, falling back to the built-in English text.
pub fn message(language: Language, id: MessageId) -> &'static str {
    MESSAGES
        .get(&(language, id))
        .copied()
        .unwrap_or_else(|| id.default_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_the_unlock_label() {
        for language in Language::value_variants() {
            assert!(!message(*language, MessageId::AchievementUnlocked).is_empty());
        }
        assert_eq!(
            message(Language::Spanish, MessageId::AchievementUnlocked),
            "Logro desbloqueado"
        );
    }
}
