//! Fact triples and their reasoning-role categories.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Normalization
// ─────────────────────────────────────────────────────────────────────────────

/// Normalize an entity name: trim, lower-case, underscores to spaces,
/// collapse internal whitespace.
pub fn normalize_entity(entity: &str) -> String {
    entity
        .trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize a relation name: trim, lower-case, collapse whitespace, then
/// spaces to underscores.
pub fn normalize_relation(relation: &str) -> String {
    relation
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

// ─────────────────────────────────────────────────────────────────────────────
// Category
// ─────────────────────────────────────────────────────────────────────────────

/// Reasoning role of a fact: what the agent can *do*, what *holds*, and what
/// *follows*.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FactCategory {
    /// Action knowledge ("key opens chest").
    Action,
    /// Conditions and state ("key is in kitchen").
    Condition,
    /// Outcomes and goals ("opening the chest completes the quest").
    Outcome,
}

/// Predicates that mark action knowledge.
const ACTION_PREDICATES: &[&str] = &["opens", "leads_to", "enables", "triggers", "executes"];
/// Subjects that mark action knowledge.
const ACTION_SUBJECTS: &[&str] = &["take", "go", "open", "use", "move"];
/// Predicates that mark outcomes.
const OUTCOME_PREDICATES: &[&str] = &["results_in", "causes", "achieves", "completes"];
/// Subjects that mark outcomes.
const OUTCOME_SUBJECTS: &[&str] = &["goal", "target", "success", "failure", "reward"];

impl FactCategory {
    /// Infer a category from a normalized subject and predicate.
    ///
    /// The keyword lists are heuristic and not exhaustive; anything that
    /// matches neither the action nor the outcome vocabulary is treated as a
    /// condition.
    pub fn infer(subject: &str, predicate: &str) -> Self {
        if ACTION_PREDICATES.iter().any(|p| predicate.contains(p))
            || ACTION_SUBJECTS.iter().any(|s| subject.contains(s))
        {
            return Self::Action;
        }

        if OUTCOME_PREDICATES.iter().any(|p| predicate.contains(p))
            || OUTCOME_SUBJECTS.iter().any(|s| subject.contains(s))
        {
            return Self::Outcome;
        }

        Self::Condition
    }

    /// String tag used in snapshots and in `"ACTION:key"`-style query text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "ACTION",
            Self::Condition => "CONDITION",
            Self::Outcome => "OUTCOME",
        }
    }

    /// Parse a category tag, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "ACTION" => Some(Self::Action),
            "CONDITION" => Some(Self::Condition),
            "OUTCOME" => Some(Self::Outcome),
            _ => None,
        }
    }
}

impl std::fmt::Display for FactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fact
// ─────────────────────────────────────────────────────────────────────────────

/// Identity of a fact: its normalized (subject, predicate, object) triple.
pub type FactKey = (String, String, String);

/// A knowledge triple with metadata.
///
/// Construction normalizes all three components, so two facts describing the
/// same statement always compare equal on [`Fact::key`] regardless of the
/// casing or spacing they arrived with. Facts are immutable once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fact {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    pub confidence: f32,
    pub source: String,
    pub category: FactCategory,
}

impl Fact {
    /// Create a fact with default confidence (1.0), source ("manual"), and
    /// an inferred category.
    pub fn new(
        subject: impl AsRef<str>,
        predicate: impl AsRef<str>,
        object: impl AsRef<str>,
    ) -> Self {
        let subject = normalize_entity(subject.as_ref());
        let predicate = normalize_relation(predicate.as_ref());
        let object = normalize_entity(object.as_ref());
        let category = FactCategory::infer(&subject, &predicate);

        Self {
            subject,
            predicate,
            object,
            confidence: 1.0,
            source: "manual".to_string(),
            category,
        }
    }

    /// Set the confidence, clamped to [0, 1].
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Set the source annotation.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Override the inferred category.
    pub fn with_category(mut self, category: FactCategory) -> Self {
        self.category = category;
        self
    }

    /// The deduplication key: the normalized triple itself.
    pub fn key(&self) -> FactKey {
        (
            self.subject.clone(),
            self.predicate.clone(),
            self.object.clone(),
        )
    }

    /// The fact rendered as searchable text: `"subject predicate object"`.
    pub fn text(&self) -> String {
        format!("{} {} {}", self.subject, self.predicate, self.object)
    }

    /// True if any component normalized to the empty string.
    pub fn has_empty_component(&self) -> bool {
        self.subject.is_empty() || self.predicate.is_empty() || self.object.is_empty()
    }
}

impl std::fmt::Display for Fact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.subject, self.predicate, self.object)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_entity() {
        assert_eq!(normalize_entity("  Kitchen  "), "kitchen");
        assert_eq!(normalize_entity("golden_key"), "golden key");
        assert_eq!(normalize_entity("The   Old\tChest"), "the old chest");
    }

    #[test]
    fn test_normalize_relation() {
        assert_eq!(normalize_relation("  Leads To "), "leads_to");
        assert_eq!(normalize_relation("located  in"), "located_in");
        assert_eq!(normalize_relation("opens"), "opens");
    }

    #[test]
    fn test_fact_new_normalizes() {
        let fact = Fact::new(" Kitchen ", "Contains", "Golden_Key");
        assert_eq!(fact.subject, "kitchen");
        assert_eq!(fact.predicate, "contains");
        assert_eq!(fact.object, "golden key");
        assert_eq!(fact.confidence, 1.0);
        assert_eq!(fact.source, "manual");
    }

    #[test]
    fn test_fact_key_equality() {
        let a = Fact::new("Kitchen", "contains", "key");
        let b = Fact::new("kitchen", " Contains ", "KEY");
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(Fact::new("a", "b", "c").with_confidence(1.5).confidence, 1.0);
        assert_eq!(Fact::new("a", "b", "c").with_confidence(-0.1).confidence, 0.0);
    }

    #[test]
    fn test_infer_action_from_predicate() {
        assert_eq!(FactCategory::infer("key", "opens"), FactCategory::Action);
        assert_eq!(
            FactCategory::infer("door", "leads_to"),
            FactCategory::Action
        );
    }

    #[test]
    fn test_infer_action_from_subject() {
        assert_eq!(
            FactCategory::infer("take key", "requires"),
            FactCategory::Action
        );
    }

    #[test]
    fn test_infer_outcome() {
        assert_eq!(
            FactCategory::infer("chest", "results_in"),
            FactCategory::Outcome
        );
        assert_eq!(
            FactCategory::infer("goal", "requires"),
            FactCategory::Outcome
        );
    }

    #[test]
    fn test_infer_default_condition() {
        assert_eq!(
            FactCategory::infer("kitchen", "contains"),
            FactCategory::Condition
        );
    }

    #[test]
    fn test_category_tag_round_trip() {
        for cat in [
            FactCategory::Action,
            FactCategory::Condition,
            FactCategory::Outcome,
        ] {
            assert_eq!(FactCategory::from_tag(cat.as_str()), Some(cat));
        }
        assert_eq!(FactCategory::from_tag("action"), Some(FactCategory::Action));
        assert_eq!(FactCategory::from_tag("nonsense"), None);
    }

    #[test]
    fn test_category_serde_screaming_case() {
        let json = serde_json::to_string(&FactCategory::Action).unwrap();
        assert_eq!(json, "\"ACTION\"");
        let back: FactCategory = serde_json::from_str("\"CONDITION\"").unwrap();
        assert_eq!(back, FactCategory::Condition);
    }

    #[test]
    fn test_fact_display() {
        let fact = Fact::new("key", "opens", "chest");
        assert_eq!(fact.to_string(), "(key, opens, chest)");
        assert_eq!(fact.text(), "key opens chest");
    }
}
