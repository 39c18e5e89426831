//! Configuration types.
//!
//! Every section and field is optional in the file; anything missing takes
//! its default, so an empty file (or no file at all) is a valid config.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Gwydion core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GwydionConfig {
    pub knowledge: KnowledgeSettings,
    pub retrieval: RetrievalSettings,
    pub controller: ControllerSettings,
    pub llm: LlmSettings,
}

/// Fact store and graph persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeSettings {
    /// Directory for graph snapshots and fact snapshot files.
    pub storage_path: PathBuf,
}

impl Default for KnowledgeSettings {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("data/kg"),
        }
    }
}

/// Retrieval engine tunables, mirroring the engine's defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub max_results: usize,
    pub similarity_threshold: f32,
    pub keyword_weight: f32,
    pub similarity_weight: f32,
    /// Query cache lifetime in seconds; zero disables caching.
    pub cache_ttl_secs: u64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            max_results: 10,
            similarity_threshold: 0.3,
            keyword_weight: 0.6,
            similarity_weight: 0.4,
            cache_ttl_secs: 300,
        }
    }
}

/// Reasoning loop tunables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    pub max_iterations: usize,
    pub max_knowledge_results: usize,
    pub history_window: usize,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            max_knowledge_results: 3,
            history_window: 3,
        }
    }
}

/// Sampling settings handed to the LLM collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 200,
            temperature: 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GwydionConfig::default();
        assert_eq!(config.retrieval.max_results, 10);
        assert_eq!(config.controller.max_iterations, 5);
        assert_eq!(config.knowledge.storage_path, PathBuf::from("data/kg"));
    }

    #[test]
    fn test_empty_file_is_valid() {
        let config: GwydionConfig = toml::from_str("").unwrap();
        assert_eq!(config.retrieval.max_results, 10);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config: GwydionConfig = toml::from_str(
            r#"
            [retrieval]
            max_results = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.max_results, 5);
        assert!((config.retrieval.similarity_threshold - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.controller.max_iterations, 5);
    }
}
