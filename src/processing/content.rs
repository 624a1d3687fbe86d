//! Content quality: action verbs, quantification, generic phrasing and readability

use crate::error::Result;
use crate::processing::document::ResumeRecord;
use crate::processing::text_processor::{build_corpus, is_whole_word, TextProcessor};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Past-tense verbs that open a strong achievement bullet
pub const STRONG_ACTION_VERBS: &[&str] = &[
    "achieved", "accelerated", "architected", "automated", "built", "championed", "consolidated",
    "created", "cut", "decreased", "delivered", "designed", "developed", "drove", "engineered",
    "established", "expanded", "generated", "grew", "implemented", "improved", "increased",
    "initiated", "launched", "led", "managed", "mentored", "migrated", "modernized",
    "negotiated", "optimized", "orchestrated", "overhauled", "pioneered", "redesigned",
    "reduced", "refactored", "resolved", "scaled", "shipped", "simplified", "spearheaded",
    "streamlined", "transformed",
];

const GENERIC_PHRASES: &[&str] = &[
    "responsible for", "duties included", "worked on", "helped with", "assisted with",
    "involved in", "team player", "hard worker", "hard-working", "detail-oriented",
    "results-driven", "self-starter", "go-getter", "think outside the box", "various tasks",
    "excellent communication skills", "fast learner",
];

const INDUSTRY_JARGON: &[&str] = &[
    "agile", "scrum", "kanban", "ci/cd", "devops", "microservices", "continuous integration",
    "continuous delivery", "test-driven development", "tdd", "infrastructure as code",
    "cloud-native", "scalability", "observability", "sdlc", "rest api", "data pipeline",
    "machine learning", "stakeholder management", "kpi", "roi", "saas", "b2b",
];

const MIN_ACTION_VERBS: usize = 3;
const MIN_QUANTIFIED: usize = 2;
const MIN_READABILITY: u8 = 60;
const TARGET_SENTENCE_WORDS: f64 = 15.0;
pub const NEUTRAL_READABILITY: u8 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEnhancement {
    pub action_verbs_used: usize,
    pub quantified_achievements: usize,
    pub industry_keywords: usize,
    pub generic_phrases: Vec<String>,
    #[serde(default)]
    pub generic_occurrences: usize,
    pub readability_score: u8,
    pub suggestions: Vec<String>,
}

/// A vocabulary compiled into one case-insensitive automaton
struct Vocabulary {
    terms: &'static [&'static str],
    automaton: AhoCorasick,
}

impl Vocabulary {
    fn new(terms: &'static [&'static str]) -> Result<Self> {
        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(terms)?;
        Ok(Self { terms, automaton })
    }

    /// Vocabulary indices of every whole-word occurrence, in text order
    fn occurrences(&self, text: &str) -> Vec<usize> {
        self.automaton
            .find_iter(text)
            .filter(|m| is_whole_word(text, m.start(), m.end()))
            .map(|m| m.pattern().as_usize())
            .collect()
    }

    /// Distinct terms present, in vocabulary order
    fn distinct(&self, text: &str) -> Vec<&'static str> {
        self.occurrences(text)
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|idx| self.terms[idx])
            .collect()
    }
}

pub struct ContentAnalyzer {
    processor: TextProcessor,
    action_verbs: Vocabulary,
    generic_phrases: Vocabulary,
    industry_jargon: Vocabulary,
    quantified: Regex,
}

impl ContentAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            processor: TextProcessor::new(),
            action_verbs: Vocabulary::new(STRONG_ACTION_VERBS)?,
            generic_phrases: Vocabulary::new(GENERIC_PHRASES)?,
            industry_jargon: Vocabulary::new(INDUSTRY_JARGON)?,
            quantified: Regex::new(r"\d+%|\$\d+|\d+\+")?,
        })
    }

    pub fn analyze(&self, resume: &ResumeRecord) -> ContentEnhancement {
        let corpus = build_corpus(resume);

        let action_verbs_used = self.action_verbs.distinct(&corpus).len();
        let quantified_achievements = self.quantified.find_iter(&corpus).count();
        let industry_keywords = self.industry_jargon.distinct(&corpus).len();
        let generic_occurrences = self.generic_phrases.occurrences(&corpus).len();
        let generic_phrases: Vec<String> = self
            .generic_phrases
            .distinct(&corpus)
            .into_iter()
            .map(str::to_string)
            .collect();
        let readability_score = self.readability(resume);

        let mut suggestions = Vec::new();
        if action_verbs_used < MIN_ACTION_VERBS {
            suggestions.push(
                "Start more bullet points with strong action verbs such as led, delivered or optimized"
                    .to_string(),
            );
        }
        if quantified_achievements < MIN_QUANTIFIED {
            suggestions.push(
                "Add measurable results such as percentages, dollar amounts or team sizes".to_string(),
            );
        }
        if let Some(first) = generic_phrases.first() {
            suggestions.push(format!(
                "Replace generic phrases like \"{}\" with specific accomplishments",
                first
            ));
        }
        if readability_score < MIN_READABILITY {
            suggestions.push("Shorten long sentences so each bullet is easy to scan".to_string());
        }
        if industry_keywords == 0 {
            suggestions.push("Include industry terminology that matches the target role".to_string());
        }

        log::debug!(
            "Content: {} verbs, {} quantified, {} jargon, {} generic, readability {}",
            action_verbs_used,
            quantified_achievements,
            industry_keywords,
            generic_occurrences,
            readability_score
        );

        ContentEnhancement {
            action_verbs_used,
            quantified_achievements,
            industry_keywords,
            generic_phrases,
            generic_occurrences,
            readability_score,
            suggestions,
        }
    }

    /// Sentence-length heuristic over experience and project descriptions.
    /// Every line is its own unit so bullets are not glued together.
    pub fn readability(&self, resume: &ResumeRecord) -> u8 {
        let prose = resume
            .experience
            .iter()
            .map(|e| e.description.as_str())
            .chain(resume.projects.iter().map(|p| p.description.as_str()));

        let mut sentences = 0usize;
        let mut words = 0usize;
        for line in prose.flat_map(str::lines) {
            for sentence in self.processor.split_sentences(line) {
                sentences += 1;
                words += self.processor.word_count(&sentence);
            }
        }

        if sentences == 0 {
            return NEUTRAL_READABILITY;
        }

        let average = words as f64 / sentences as f64;
        let score = 100.0 - 2.0 * (average - TARGET_SENTENCE_WORDS);
        score.clamp(0.0, 100.0).round() as u8
    }
}
