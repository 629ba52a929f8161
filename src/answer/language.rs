//! Detects requests for an English + Hindi answer.

/// Phrases that request a bilingual answer. Matching is substring search on the lower-cased
/// question, mixing Latin and Devanagari script, so short entries such as `both` also fire on
/// unrelated questions ("do both parties ...").
pub const BILINGUAL_TRIGGERS: &[&str] = &[
    "hindi",
    "हिंदी",
    "both",
    "दोनों",
    "english and hindi",
    "hinglish",
    "bilingual",
    "in two languages",
    "दो भाषा",
    "dual language",
    "हिंदी में",
    "हिंदी भाषा",
    "हिंदी में समझाएं",
    "हिंदी में बताएं",
    "हिंदी में जवाब",
    "हिंदी में उत्तर",
];

/// Heading that introduces the Hindi section of a provider answer.
pub const HINDI_SECTION_HEADING: &str = "हिंदी में उत्तर:";

/// Marker whose presence shows an answer already contains Hindi.
pub const HINDI_MARKER: &str = "हिंदी";

/// Separator placed between the English answer and its translation.
pub const TRANSLATION_SEPARATOR: &str = "\n\n—\n\n";

/// Whether `question` asks for the answer in both English and Hindi.
pub fn wants_bilingual(question: &str) -> bool {
    let lowered = question.to_lowercase();
    BILINGUAL_TRIGGERS
        .iter()
        .any(|trigger| lowered.contains(trigger))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_script_triggers() {
        assert!(wants_bilingual("What is the notice period in Hindi?"));
        assert!(wants_bilingual("Explain in BOTH languages"));
        assert!(wants_bilingual("answer bilingual please"));
    }

    #[test]
    fn devanagari_triggers() {
        assert!(wants_bilingual("भुगतान की शर्तें हिंदी में बताएं"));
        assert!(wants_bilingual("दोनों भाषाओं में"));
    }

    #[test]
    fn plain_questions_stay_english() {
        assert!(!wants_bilingual("What is the monthly payment?"));
        assert!(!wants_bilingual(""));
    }
}
