//! Candidate keyword and phrase extraction from job descriptions

use crate::processing::text_processor::TextProcessor;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_KEYWORDS: usize = 50;
pub const DEFAULT_MIN_FREQUENCY: usize = 2;

/// Frequency-and-phrase keyword extractor.
///
/// Unigrams need to repeat to count; bigrams and trigrams are kept whenever
/// every word in them is meaningful, which captures multi-word technical
/// phrases such as "distributed systems" that appear only once.
pub struct KeywordExtractor {
    processor: TextProcessor,
    max_keywords: usize,
    min_frequency: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_KEYWORDS, DEFAULT_MIN_FREQUENCY)
    }
}

impl KeywordExtractor {
    pub fn new(max_keywords: usize, min_frequency: usize) -> Self {
        Self {
            processor: TextProcessor::new(),
            max_keywords,
            min_frequency: min_frequency.max(1),
        }
    }

    /// Extract an ordered, deduplicated set of candidate terms
    pub fn extract(&self, job_text: &str) -> Vec<String> {
        let clauses: Vec<Vec<String>> = self
            .processor
            .split_clauses(job_text)
            .into_iter()
            .map(|clause| self.processor.tokenize(clause))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let mut keywords = self.frequent_unigrams(&clauses);
        keywords.extend(self.phrases(&clauses, 2));
        keywords.extend(self.phrases(&clauses, 3));

        let mut seen = HashSet::new();
        keywords.retain(|keyword| seen.insert(keyword.clone()));
        keywords.truncate(self.max_keywords);
        keywords
    }

    fn frequent_unigrams(&self, clauses: &[Vec<String>]) -> Vec<String> {
        let mut frequency: HashMap<&str, usize> = HashMap::new();
        let mut first_seen: Vec<&str> = Vec::new();

        for token in clauses.iter().flatten() {
            if !self.processor.is_eligible(token) {
                continue;
            }
            let count = frequency.entry(token.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(token.as_str());
            }
            *count += 1;
        }

        let mut unigrams: Vec<(usize, &str)> = first_seen
            .into_iter()
            .enumerate()
            .filter(|(_, token)| frequency[token] >= self.min_frequency)
            .collect();

        // Stable on first occurrence for equal frequencies
        unigrams.sort_by(|a, b| frequency[b.1].cmp(&frequency[a.1]).then(a.0.cmp(&b.0)));
        unigrams.into_iter().map(|(_, token)| token.to_string()).collect()
    }

    fn phrases(&self, clauses: &[Vec<String>], size: usize) -> Vec<String> {
        clauses
            .iter()
            .flat_map(|tokens| tokens.windows(size))
            .filter(|window| window.iter().all(|token| self.processor.is_eligible(token)))
            .map(|window| window.join(" "))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequent_unigrams_only() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("Python. Python. Kubernetes.");
        assert_eq!(keywords, vec!["python"]);
    }

    #[test]
    fn test_unigrams_ordered_by_frequency() {
        let extractor = KeywordExtractor::default();
        let keywords =
            extractor.extract("Docker, Rust. Rust, Docker. Rust. Terraform, Terraform.");
        assert_eq!(&keywords[..3], &["rust", "docker", "terraform"]);
    }

    #[test]
    fn test_phrases_skip_stop_words() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("Build distributed systems with the cloud platform team");
        assert!(keywords.contains(&"distributed systems".to_string()));
        assert!(keywords.contains(&"build distributed systems".to_string()));
        assert!(keywords.contains(&"cloud platform team".to_string()));
        assert!(!keywords.iter().any(|k| k.contains("with")));
    }

    #[test]
    fn test_phrases_do_not_cross_punctuation() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("React, TypeScript, AWS (required)");
        assert!(!keywords.contains(&"react typescript".to_string()));
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_short_tokens_dropped() {
        let extractor = KeywordExtractor::default();
        let keywords = extractor.extract("go go go ml ml ml");
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_output_is_capped() {
        let extractor = KeywordExtractor::new(5, 2);
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda";
        let keywords = extractor.extract(text);
        assert_eq!(keywords.len(), 5);
    }

    #[test]
    fn test_extraction_is_deterministic_and_case_insensitive() {
        let extractor = KeywordExtractor::default();
        let a = extractor.extract("Senior Rust Engineer. RUST services, rust tooling.");
        let b = extractor.extract("Senior Rust Engineer. RUST services, rust tooling.");
        assert_eq!(a, b);
        assert_eq!(a[0], "rust");
    }

    #[test]
    fn test_empty_text() {
        assert!(KeywordExtractor::default().extract("").is_empty());
    }
}
