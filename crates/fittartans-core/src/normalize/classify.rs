//! Keyword-based class type inference for listings that carry no category.

/// Title keyword (lowercase) and the class type it implies. First match wins.
const KEYWORDS: &[(&str, &str)] = &[
    ("yoga", "Yoga"),
    ("vinyasa", "Yoga"),
    ("pilates", "Pilates"),
    ("hiit", "HIIT"),
    ("interval", "HIIT"),
    ("bootcamp", "HIIT"),
    ("spin", "Spin"),
    ("cycl", "Spin"),
    ("zumba", "Zumba"),
    ("barre", "Barre"),
    ("strength", "Strength"),
    ("weight", "Strength"),
    ("box", "Boxing"),
    ("dance", "Dance"),
    ("meditat", "Meditation"),
    ("mindful", "Meditation"),
    ("cardio", "Cardio"),
];

/// Guess a class type from an event title.
pub fn infer_class_type(title: &str) -> Option<String> {
    let lower = title.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, class_type)| (*class_type).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_class_type() {
        assert_eq!(infer_class_type("Power Yoga Flow").as_deref(), Some("Yoga"));
        assert_eq!(infer_class_type("Indoor Cycling").as_deref(), Some("Spin"));
        assert_eq!(infer_class_type("KICKBOXING"), Some("Boxing".to_string()));
        assert_eq!(infer_class_type("Team sync"), None);
    }
}
