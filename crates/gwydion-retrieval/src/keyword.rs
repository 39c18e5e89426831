//! Keyword extraction and weighted overlap scoring.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use gwydion_types::Fact;

/// Match weights: a keyword found in the subject counts most, then the
/// object, then the predicate; a match anywhere else in the triple text
/// still counts a little.
const SUBJECT_WEIGHT: f32 = 1.0;
const OBJECT_WEIGHT: f32 = 0.8;
const PREDICATE_WEIGHT: f32 = 0.6;
const ANYWHERE_WEIGHT: f32 = 0.3;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does",
        "did", "will", "would", "could", "should", "may", "might", "can", "must",
    ]
    .into_iter()
    .collect()
});

/// Extract search keywords: lower-cased words longer than two characters that
/// are not stop words.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let text = text.to_lowercase();
    WORD.find_iter(&text)
        .map(|m| m.as_str().to_string())
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w.as_str()))
        .collect()
}

/// Score a fact against a keyword set.
///
/// Each keyword contributes its best-position weight; the sum is multiplied
/// by the fact's confidence. A fact sharing no keyword scores zero.
pub fn keyword_score(fact: &Fact, keywords: &[String]) -> f32 {
    let fact_text = fact.text();

    let mut score = 0.0;
    for keyword in keywords {
        if !fact_text.contains(keyword.as_str()) {
            continue;
        }
        score += if fact.subject.contains(keyword.as_str()) {
            SUBJECT_WEIGHT
        } else if fact.object.contains(keyword.as_str()) {
            OBJECT_WEIGHT
        } else if fact.predicate.contains(keyword.as_str()) {
            PREDICATE_WEIGHT
        } else {
            ANYWHERE_WEIGHT
        };
    }

    score * fact.confidence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_keywords_filters_stop_words() {
        let keywords = extract_keywords("The key is in the kitchen");
        assert_eq!(keywords, vec!["key".to_string(), "kitchen".to_string()]);
    }

    #[test]
    fn test_extract_keywords_filters_short_words() {
        let keywords = extract_keywords("go to it");
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_keyword_score_position_weights() {
        let fact = Fact::new("kitchen", "contains", "key");

        let subject = keyword_score(&fact, &["kitchen".to_string()]);
        assert!((subject - 1.0).abs() < f32::EPSILON);

        let object = keyword_score(&fact, &["key".to_string()]);
        assert!((object - 0.8).abs() < f32::EPSILON);

        let predicate = keyword_score(&fact, &["contains".to_string()]);
        assert!((predicate - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_keyword_score_sums_and_scales_by_confidence() {
        let fact = Fact::new("kitchen", "contains", "key").with_confidence(0.5);
        let score = keyword_score(&fact, &["kitchen".to_string(), "key".to_string()]);
        assert!((score - 0.9).abs() < 1e-6); // (1.0 + 0.8) * 0.5
    }

    #[test]
    fn test_keyword_score_no_match_is_zero() {
        let fact = Fact::new("kitchen", "contains", "key");
        assert_eq!(keyword_score(&fact, &["dragon".to_string()]), 0.0);
    }

    #[test]
    fn test_keyword_score_deterministic() {
        let fact = Fact::new("key", "opens", "chest");
        let keywords = extract_keywords("chest key treasure");
        assert_eq!(
            keyword_score(&fact, &keywords),
            keyword_score(&fact, &keywords)
        );
    }
}
