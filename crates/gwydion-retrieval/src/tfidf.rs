//! Term-frequency/inverse-document-frequency vector space over fact texts.
//!
//! The index is built once over the full corpus (unigrams plus bigrams,
//! stop words removed, vocabulary capped) and queried by cosine similarity.
//! Vectors are l2-normalized at build time, so a dot product is a cosine and
//! every similarity lands in [0, 1] — term weights are never negative.

use std::collections::HashMap;

use crate::keyword::extract_keywords;

/// Vocabulary cap. Terms are kept by descending document frequency, ties
/// broken alphabetically.
const MAX_FEATURES: usize = 1000;

/// A sparse l2-normalized vector keyed by vocabulary index.
type SparseVec = HashMap<usize, f32>;

/// An immutable TF-IDF index over a fixed document list.
#[derive(Debug)]
pub struct TfidfIndex {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    doc_vectors: Vec<SparseVec>,
}

/// Tokenize into index terms: filtered unigrams plus adjacent bigrams.
fn terms(text: &str) -> Vec<String> {
    let words = extract_keywords(text);
    let mut terms = words.clone();
    for pair in words.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

impl TfidfIndex {
    /// Build an index over the given documents. Returns `None` when the
    /// corpus is empty or yields no usable terms.
    pub fn build(documents: &[String]) -> Option<Self> {
        if documents.is_empty() {
            return None;
        }

        let doc_terms: Vec<Vec<String>> = documents.iter().map(|d| terms(d)).collect();

        // Document frequency per term
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &doc_terms {
            let mut seen: Vec<&str> = Vec::new();
            for term in doc {
                if !seen.contains(&term.as_str()) {
                    seen.push(term);
                    *df.entry(term).or_insert(0) += 1;
                }
            }
        }
        if df.is_empty() {
            return None;
        }

        // Cap the vocabulary: highest document frequency first, then
        // alphabetical for determinism.
        let mut ranked: Vec<(&str, usize)> = df.iter().map(|(t, c)| (*t, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(MAX_FEATURES);

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(ranked.len());
        let mut idf = Vec::with_capacity(ranked.len());
        for (i, (term, count)) in ranked.iter().enumerate() {
            vocabulary.insert(term.to_string(), i);
            idf.push(((1.0 + n) / (1.0 + *count as f32)).ln() + 1.0);
        }

        let doc_vectors = doc_terms
            .iter()
            .map(|doc| {
                let mut vec: SparseVec = HashMap::new();
                for term in doc {
                    if let Some(&i) = vocabulary.get(term.as_str()) {
                        *vec.entry(i).or_insert(0.0) += 1.0;
                    }
                }
                for (i, weight) in vec.iter_mut() {
                    *weight *= idf[*i];
                }
                normalize(&mut vec);
                vec
            })
            .collect();

        Some(Self {
            vocabulary,
            idf,
            doc_vectors,
        })
    }

    /// Number of indexed documents.
    pub fn len(&self) -> usize {
        self.doc_vectors.len()
    }

    /// True when no documents are indexed.
    pub fn is_empty(&self) -> bool {
        self.doc_vectors.is_empty()
    }

    /// Cosine similarity of the query against every indexed document, in
    /// document order.
    pub fn similarities(&self, query: &str) -> Vec<f32> {
        let mut query_vec: SparseVec = HashMap::new();
        for term in terms(query) {
            if let Some(&i) = self.vocabulary.get(term.as_str()) {
                *query_vec.entry(i).or_insert(0.0) += 1.0;
            }
        }
        for (i, weight) in query_vec.iter_mut() {
            *weight *= self.idf[*i];
        }
        normalize(&mut query_vec);

        self.doc_vectors
            .iter()
            .map(|doc| dot(&query_vec, doc))
            .collect()
    }
}

fn normalize(vec: &mut SparseVec) {
    let norm = vec.values().map(|w| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for weight in vec.values_mut() {
            *weight /= norm;
        }
    }
}

fn dot(a: &SparseVec, b: &SparseVec) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(i, w)| large.get(i).map(|v| w * v))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "kitchen contains key".to_string(),
            "key opens chest".to_string(),
            "hallway leads_to cellar".to_string(),
        ]
    }

    #[test]
    fn test_build_empty_corpus() {
        assert!(TfidfIndex::build(&[]).is_none());
    }

    #[test]
    fn test_build_no_usable_terms() {
        let docs = vec!["a to of".to_string()];
        assert!(TfidfIndex::build(&docs).is_none());
    }

    #[test]
    fn test_similarities_in_unit_range() {
        let index = TfidfIndex::build(&corpus()).unwrap();
        for sim in index.similarities("kitchen key chest") {
            assert!((0.0..=1.0).contains(&sim), "similarity {sim} out of range");
        }
    }

    #[test]
    fn test_exact_document_matches_itself() {
        let index = TfidfIndex::build(&corpus()).unwrap();
        let sims = index.similarities("kitchen contains key");
        assert!((sims[0] - 1.0).abs() < 1e-5);
        assert!(sims[0] > sims[1]);
        assert!(sims[0] > sims[2]);
    }

    #[test]
    fn test_unrelated_query_scores_zero() {
        let index = TfidfIndex::build(&corpus()).unwrap();
        let sims = index.similarities("dragon volcano");
        assert!(sims.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_bigrams_sharpen_phrase_matches() {
        let docs = vec![
            "golden key opens chest".to_string(),
            "chest opens golden gate".to_string(),
        ];
        let index = TfidfIndex::build(&docs).unwrap();
        let sims = index.similarities("golden key");
        // Only the first document contains the "golden key" bigram
        assert!(sims[0] > sims[1]);
    }

    #[test]
    fn test_deterministic() {
        let index = TfidfIndex::build(&corpus()).unwrap();
        assert_eq!(
            index.similarities("key chest"),
            index.similarities("key chest")
        );
    }
}
