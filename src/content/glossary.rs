// Simple meanings for hard words, shown alongside lessons in dyslexia mode

use regex::RegexBuilder;

/// Term and its plain-language meaning
pub const GLOSSARY: &[(&str, &str)] = &[
    (
        "Photosynthesis",
        "How plants use sunlight to make food from air and water.",
    ),
    (
        "carbon dioxide",
        "A gas in the air that plants take in. We breathe it out.",
    ),
    (
        "oxygen",
        "A gas in the air that we breathe in. Plants release it.",
    ),
    ("Chlorophyll", "The green part of leaves that catches sunlight."),
    (
        "environment",
        "The natural world around us: air, water, plants, and animals.",
    ),
];

/// Glossary entries whose term appears in `text` as a whole word (case-insensitive),
/// in glossary order
pub fn terms_in(text: &str) -> Vec<(&'static str, &'static str)> {
    GLOSSARY
        .iter()
        .copied()
        .filter(|(term, _)| {
            RegexBuilder::new(&format!(r"\b{}\b", regex::escape(term)))
                .case_insensitive(true)
                .build()
                .is_ok_and(|re| re.is_match(text))
        })
        .collect()
}
