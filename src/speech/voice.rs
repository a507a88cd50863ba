//! Voice selection policy
//!
//! Deterministically picks one synthesis voice for a (gender, accent)
//! preference against the current catalog. Selection is re-run on every
//! play call because the host's voice catalog can change between calls;
//! nothing here is cached.

use crate::speech::Voice;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Preferred voice gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceGender {
    #[default]
    Any,
    Male,
    Female,
}

impl VoiceGender {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceGender::Any => "any",
            VoiceGender::Male => "male",
            VoiceGender::Female => "female",
        }
    }

    /// Parse a stored setting, falling back to `Any` for unknown values
    pub fn parse(s: &str) -> Self {
        match s {
            "male" => VoiceGender::Male,
            "female" => VoiceGender::Female,
            _ => VoiceGender::Any,
        }
    }
}

/// Preferred voice accent/locale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VoiceAccent {
    #[default]
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "es-ES")]
    EsEs,
}

impl VoiceAccent {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceAccent::Any => "any",
            VoiceAccent::EnUs => "en-US",
            VoiceAccent::EnGb => "en-GB",
            VoiceAccent::FrFr => "fr-FR",
            VoiceAccent::EsEs => "es-ES",
        }
    }

    /// Parse a stored setting, falling back to `Any` for unknown values
    pub fn parse(s: &str) -> Self {
        match s {
            "en-US" => VoiceAccent::EnUs,
            "en-GB" => VoiceAccent::EnGb,
            "fr-FR" => VoiceAccent::FrFr,
            "es-ES" => VoiceAccent::EsEs,
            _ => VoiceAccent::Any,
        }
    }

    /// French and Spanish voices are not reliably gender-tagged by name,
    /// so gender is ignored for these locales
    fn gender_blind(&self) -> bool {
        matches!(self, VoiceAccent::FrFr | VoiceAccent::EsEs)
    }
}

/// Name-substring patterns per (gender, accent) pair, tried in order
static VOICE_PATTERNS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    m.insert(
        "male-en-US",
        &["david", "alex", "us english male", "american male"][..],
    );
    m.insert(
        "female-en-US",
        &["zira", "samantha", "us english female", "american female"][..],
    );
    m.insert(
        "male-en-GB",
        &["george", "daniel", "uk english male", "british male"][..],
    );
    m.insert(
        "female-en-GB",
        &["hazel", "kate", "uk english female", "british female"][..],
    );
    m.insert("male-fr-FR", &["fr-fr", "french", "france"][..]);
    m.insert("female-fr-FR", &["fr-fr", "french", "france"][..]);
    m.insert("male-es-ES", &["es-es", "spanish", "spain"][..]);
    m.insert("female-es-ES", &["es-es", "spanish", "spain"][..]);
    m
});

/// Pick the best voice for the given preferences
///
/// Policy, in order: English default when either preference is "any";
/// the fixed name-pattern table; locale-filtered selection (gender-blind
/// for fr-FR/es-ES); English fallback; first catalog entry; none.
pub fn select_voice(catalog: &[Voice], gender: VoiceGender, accent: VoiceAccent) -> Option<Voice> {
    if catalog.is_empty() {
        return None;
    }

    if gender == VoiceGender::Any || accent == VoiceAccent::Any {
        return english_fallback(catalog);
    }

    let key = format!("{}-{}", gender.as_str(), accent.as_str());
    if let Some(patterns) = VOICE_PATTERNS.get(key.as_str()) {
        for pattern in patterns.iter() {
            if let Some(voice) = catalog
                .iter()
                .find(|v| v.name.to_lowercase().contains(pattern))
            {
                return Some(voice.clone());
            }
        }
    }

    let locale_matches: Vec<&Voice> = catalog
        .iter()
        .filter(|v| v.locale.starts_with(accent.as_str()))
        .collect();

    if let Some(first) = locale_matches.first() {
        if accent.gender_blind() {
            return Some((*first).clone());
        }

        let by_gender = match gender {
            VoiceGender::Male => locale_matches
                .iter()
                .find(|v| !v.name.to_lowercase().contains("female")),
            VoiceGender::Female => locale_matches
                .iter()
                .find(|v| v.name.to_lowercase().contains("female")),
            VoiceGender::Any => None,
        };
        return Some(by_gender.copied().unwrap_or(first).clone());
    }

    english_fallback(catalog)
}

/// First English-locale voice, else the catalog's first entry
fn english_fallback(catalog: &[Voice]) -> Option<Voice> {
    catalog
        .iter()
        .find(|v| v.locale.starts_with("en"))
        .or_else(|| catalog.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Voice> {
        vec![
            Voice::new("Thomas", "fr-FR"),
            Voice::new("Microsoft David", "en-US"),
            Voice::new("Microsoft Zira", "en-US"),
            Voice::new("Google UK English Female", "en-GB"),
            Voice::new("Monica", "es-ES"),
        ]
    }

    #[test]
    fn test_any_preference_prefers_english() {
        let voice = select_voice(&catalog(), VoiceGender::Any, VoiceAccent::Any).unwrap();
        assert_eq!(voice.name, "Microsoft David");

        let voice = select_voice(&catalog(), VoiceGender::Any, VoiceAccent::FrFr).unwrap();
        assert_eq!(voice.name, "Microsoft David");
    }

    #[test]
    fn test_any_preference_falls_back_to_first() {
        let only_french = vec![Voice::new("Thomas", "fr-FR")];
        let voice = select_voice(&only_french, VoiceGender::Any, VoiceAccent::Any).unwrap();
        assert_eq!(voice.name, "Thomas");
    }

    #[test]
    fn test_pattern_table_match() {
        let voice = select_voice(&catalog(), VoiceGender::Male, VoiceAccent::EnUs).unwrap();
        assert_eq!(voice.name, "Microsoft David");

        let voice = select_voice(&catalog(), VoiceGender::Female, VoiceAccent::EnUs).unwrap();
        assert_eq!(voice.name, "Microsoft Zira");
    }

    #[test]
    fn test_locale_filter_with_gender() {
        // No pattern matches these names, so the locale filter decides
        let voices = vec![
            Voice::new("Voice One Female", "en-GB"),
            Voice::new("Voice Two", "en-GB"),
        ];
        let male = select_voice(&voices, VoiceGender::Male, VoiceAccent::EnGb).unwrap();
        assert_eq!(male.name, "Voice Two");

        let female = select_voice(&voices, VoiceGender::Female, VoiceAccent::EnGb).unwrap();
        assert_eq!(female.name, "Voice One Female");
    }

    #[test]
    fn test_gender_blind_locales_ignore_gender() {
        let voices = vec![Voice::new("Voix Une", "fr-FR"), Voice::new("Voix Deux", "fr-FR")];
        let male = select_voice(&voices, VoiceGender::Male, VoiceAccent::FrFr).unwrap();
        let female = select_voice(&voices, VoiceGender::Female, VoiceAccent::FrFr).unwrap();
        assert_eq!(male, female);
        assert_eq!(male.name, "Voix Une");
    }

    #[test]
    fn test_no_locale_match_falls_back_to_english() {
        let voices = vec![Voice::new("Somevoice", "de-DE"), Voice::new("Other", "en-AU")];
        let voice = select_voice(&voices, VoiceGender::Male, VoiceAccent::EsEs).unwrap();
        assert_eq!(voice.locale, "en-AU");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(select_voice(&[], VoiceGender::Any, VoiceAccent::Any).is_none());
    }

    #[test]
    fn test_selection_is_deterministic() {
        let first = select_voice(&catalog(), VoiceGender::Female, VoiceAccent::EnGb);
        for _ in 0..5 {
            assert_eq!(
                select_voice(&catalog(), VoiceGender::Female, VoiceAccent::EnGb),
                first
            );
        }
    }
}
