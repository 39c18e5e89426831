//! Retrieval strategy selection.

use serde::{Deserialize, Serialize};

/// The retrieval strategies the engine can dispatch on.
///
/// The textual `query_kg('<kind>', '<query>')` contract uses the lower-case
/// form of these names; parsing is case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Weighted keyword overlap.
    Keywords,
    /// TF-IDF cosine similarity.
    Similarity,
    /// Facts mentioning one entity.
    Entity,
    /// Facts carrying one relation.
    Relation,
    /// Facts of one category, optionally re-scored against a query.
    Category,
    /// Blend of keyword and similarity scores.
    Hybrid,
    /// Hybrid over the query extended with context strings.
    Contextual,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keywords => "keywords",
            Self::Similarity => "similarity",
            Self::Entity => "entity",
            Self::Relation => "relation",
            Self::Category => "category",
            Self::Hybrid => "hybrid",
            Self::Contextual => "contextual",
        }
    }
}

impl std::str::FromStr for QueryKind {
    type Err = UnknownQueryKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keywords" => Ok(Self::Keywords),
            "similarity" => Ok(Self::Similarity),
            "entity" => Ok(Self::Entity),
            "relation" => Ok(Self::Relation),
            "category" => Ok(Self::Category),
            "hybrid" => Ok(Self::Hybrid),
            "contextual" => Ok(Self::Contextual),
            other => Err(UnknownQueryKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for QueryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a query kind string matches no known strategy.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown query kind: {0}")]
pub struct UnknownQueryKind(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_str_case_insensitive() {
        assert_eq!(QueryKind::from_str("Keywords").unwrap(), QueryKind::Keywords);
        assert_eq!(QueryKind::from_str(" ENTITY ").unwrap(), QueryKind::Entity);
        assert_eq!(QueryKind::from_str("hybrid").unwrap(), QueryKind::Hybrid);
    }

    #[test]
    fn test_from_str_unknown() {
        assert!(QueryKind::from_str("dodaf").is_err());
    }

    #[test]
    fn test_round_trip() {
        for kind in [
            QueryKind::Keywords,
            QueryKind::Similarity,
            QueryKind::Entity,
            QueryKind::Relation,
            QueryKind::Category,
            QueryKind::Hybrid,
            QueryKind::Contextual,
        ] {
            assert_eq!(QueryKind::from_str(kind.as_str()).unwrap(), kind);
        }
    }
}
