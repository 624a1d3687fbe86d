//! ATS (Applicant Tracking System) keyword matching and importance tiers

use crate::error::Result;
use crate::processing::content::STRONG_ACTION_VERBS;
use crate::processing::skill_matcher::SkillMatcher;
use crate::processing::text_processor::{char_offsets, literal_pattern, whole_word_matches};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Default number of match offsets kept per keyword
pub const DEFAULT_MAX_POSITIONS: usize = 10;

/// Role, seniority and ownership words that make a keyword worth a medium tier
const ROLE_MARKERS: &[&str] = &[
    "senior", "junior", "lead", "principal", "staff", "head", "chief", "manager", "management",
    "director", "engineer", "engineering", "developer", "development", "architect",
    "architecture", "analyst", "consultant", "specialist", "scientist", "designer", "administrator",
    "owner", "ownership", "leadership", "mentor", "mentoring", "experience", "years",
];

/// Base forms of the action verbs recruiters scan for
const ACTION_MARKERS: &[&str] = &[
    "lead", "manage", "develop", "design", "build", "deliver", "implement", "architect",
    "optimize", "improve", "drive", "own", "launch", "scale", "automate", "migrate", "maintain",
    "collaborate", "coordinate", "analyze", "create",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// One extracted keyword and where it appears in the resume corpus.
///
/// `found` is derived from `frequency` rather than stored, so the two can
/// never disagree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub frequency: usize,
    #[serde(default)]
    pub positions: Vec<usize>,
    pub importance: Importance,
}

impl KeywordMatch {
    pub fn found(&self) -> bool {
        self.frequency > 0
    }
}

impl Serialize for KeywordMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("KeywordMatch", 5)?;
        state.serialize_field("keyword", &self.keyword)?;
        state.serialize_field("frequency", &self.frequency)?;
        state.serialize_field("positions", &self.positions)?;
        state.serialize_field("importance", &self.importance)?;
        state.serialize_field("found", &self.found())?;
        state.end()
    }
}

/// Scores extracted job keywords against the resume corpus
pub struct ATSMatcher {
    skill_matcher: SkillMatcher,
    max_positions: usize,
}

impl ATSMatcher {
    pub fn new() -> Result<Self> {
        Self::with_limits(DEFAULT_MAX_POSITIONS)
    }

    pub fn with_limits(max_positions: usize) -> Result<Self> {
        Ok(Self {
            skill_matcher: SkillMatcher::new()?,
            max_positions,
        })
    }

    /// Match every keyword as a whole word, case-insensitively
    pub fn match_keywords(&self, keywords: &[String], corpus: &str) -> Result<Vec<KeywordMatch>> {
        keywords
            .iter()
            .map(|keyword| {
                let pattern = literal_pattern(keyword)?;
                let spans = whole_word_matches(&pattern, corpus);
                let starts: Vec<usize> = spans
                    .iter()
                    .take(self.max_positions)
                    .map(|&(start, _)| start)
                    .collect();

                Ok(KeywordMatch {
                    keyword: keyword.clone(),
                    frequency: spans.len(),
                    positions: char_offsets(corpus, &starts),
                    importance: self.classify(keyword),
                })
            })
            .collect()
    }

    /// Static tiering: technical or certification term, then role or
    /// action marker, then low
    pub fn classify(&self, keyword: &str) -> Importance {
        if self.skill_matcher.is_technical_term(keyword) {
            return Importance::High;
        }

        let lowered = keyword.to_lowercase();
        let has_marker = lowered.split_whitespace().any(|word| {
            ROLE_MARKERS.contains(&word)
                || ACTION_MARKERS.contains(&word)
                || STRONG_ACTION_VERBS.contains(&word)
        });

        if has_marker {
            Importance::Medium
        } else {
            Importance::Low
        }
    }
}

/// Keywords not present in the resume, in extraction order
pub fn missing_keywords(matches: &[KeywordMatch]) -> Vec<String> {
    matches
        .iter()
        .filter(|m| !m.found())
        .map(|m| m.keyword.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_ats_matcher_creation() {
        assert!(ATSMatcher::new().is_ok());
    }

    #[test]
    fn test_exact_matching() {
        let matcher = ATSMatcher::new().unwrap();
        let corpus = "Python developer. I write python and more Python; pythonic code";
        let matches = matcher.match_keywords(&keywords(&["python", "golang"]), corpus).unwrap();

        assert_eq!(matches[0].frequency, 3);
        assert_eq!(matches[0].positions, vec![0, 26, 42]);
        assert!(matches[0].found());
        assert_eq!(matches[1].frequency, 0);
        assert!(!matches[1].found());
        assert!(matches[1].positions.is_empty());
    }

    #[test]
    fn test_positions_are_bounded() {
        let matcher = ATSMatcher::with_limits(2).unwrap();
        let corpus = "rust rust rust rust";
        let matches = matcher.match_keywords(&keywords(&["rust"]), corpus).unwrap();
        assert_eq!(matches[0].frequency, 4);
        assert_eq!(matches[0].positions.len(), 2);
    }

    #[test]
    fn test_keywords_are_regex_escaped() {
        let matcher = ATSMatcher::new().unwrap();
        let matches = matcher
            .match_keywords(&keywords(&["c++", "(a|b)"]), "C++ and a")
            .unwrap();
        assert_eq!(matches[0].frequency, 1);
        assert_eq!(matches[1].frequency, 0);
    }

    #[test]
    fn test_extracted_phrase_matches_hyphenated_text() {
        let matcher = ATSMatcher::new().unwrap();
        let corpus = "Full-stack engineer building full-stack apps";
        let matches = matcher.match_keywords(&keywords(&["full stack"]), corpus).unwrap();
        assert_eq!(matches[0].frequency, 2);
        assert_eq!(matches[0].positions, vec![0, 29]);
        assert!(matches[0].found());
    }

    #[test]
    fn test_importance_tiers() {
        let matcher = ATSMatcher::new().unwrap();
        assert_eq!(matcher.classify("kubernetes"), Importance::High);
        assert_eq!(matcher.classify("aws certified"), Importance::High);
        assert_eq!(matcher.classify("senior engineer"), Importance::Medium);
        assert_eq!(matcher.classify("lead teams"), Importance::Medium);
        assert_eq!(matcher.classify("customer"), Importance::Low);
    }

    #[test]
    fn test_found_is_serialized_from_frequency() {
        let m = KeywordMatch {
            keyword: "rust".to_string(),
            frequency: 0,
            positions: vec![],
            importance: Importance::High,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["found"], serde_json::json!(false));
        assert_eq!(json["importance"], serde_json::json!("high"));
    }

    #[test]
    fn test_missing_keywords() {
        let matcher = ATSMatcher::new().unwrap();
        let matches = matcher
            .match_keywords(&keywords(&["rust", "kafka"]), "rust services")
            .unwrap();
        assert_eq!(missing_keywords(&matches), vec!["kafka"]);
    }
}
