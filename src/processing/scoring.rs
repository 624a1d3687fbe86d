//! Weighted overall score and the recommendation ladder

use crate::config::ScoringConfig;
use crate::processing::ats_matcher::{Importance, KeywordMatch};
use crate::processing::content::ContentEnhancement;
use crate::processing::document::ResumeRecord;
use crate::processing::formatting::FormattingCheck;
use crate::processing::skill_matcher::HardSkillsAnalysis;
use serde::{Deserialize, Serialize};

/// Score reported when the job text gives nothing to compare against
pub const NEUTRAL_SCORE: u8 = 50;

const MIN_DECLARED_SKILLS: usize = 5;
const MIN_QUANTIFIED: usize = 3;
const MIN_ACTION_VERBS: usize = 3;
const MAX_GENERIC_OCCURRENCES: usize = 1;
const LISTED_TERMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Keywords,
    Skills,
    Formatting,
    Content,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub action: String,
}

impl Recommendation {
    pub fn new(
        priority: Priority,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            category,
            title: title.into(),
            description: description.into(),
            action: action.into(),
        }
    }
}

/// Component scores on a 0-100 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub keyword_score: f64,
    pub skills_score: f64,
    pub formatting_score: f64,
    pub content_score: f64,
    pub overall: u8,
}

pub struct ScoreAggregator {
    weights: ScoringConfig,
}

impl ScoreAggregator {
    pub fn new(weights: ScoringConfig) -> Self {
        Self { weights }
    }

    pub fn score(
        &self,
        matches: &[KeywordMatch],
        skills: &HardSkillsAnalysis,
        formatting: &FormattingCheck,
        content: &ContentEnhancement,
    ) -> ScoreBreakdown {
        let keyword_score = if matches.is_empty() {
            0.0
        } else {
            let matched = matches.iter().filter(|m| m.found()).count();
            100.0 * matched as f64 / matches.len() as f64
        };

        let skills_score = if skills.required_skills.is_empty() {
            100.0
        } else {
            100.0 * skills.found_skills.len() as f64 / skills.required_skills.len() as f64
        };

        let formatting_score = formatting.score as f64;
        let content_score = content_score(content);

        let overall = if matches.is_empty() && skills.required_skills.is_empty() {
            NEUTRAL_SCORE
        } else {
            let w = &self.weights;
            let weighted = w.keyword_weight * keyword_score
                + w.skills_weight * skills_score
                + w.formatting_weight * formatting_score
                + w.content_weight * content_score;
            weighted.round().clamp(0.0, 100.0) as u8
        };

        ScoreBreakdown {
            keyword_score,
            skills_score,
            formatting_score,
            content_score,
            overall,
        }
    }

    /// The fixed ladder; each rule adds at most one entry, already in
    /// priority-then-category order
    pub fn recommendations(
        &self,
        matches: &[KeywordMatch],
        skills: &HardSkillsAnalysis,
        formatting: &FormattingCheck,
        content: &ContentEnhancement,
        resume: &ResumeRecord,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if !skills.missing_critical_skills.is_empty() {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::Skills,
                "Add Missing Critical Skills",
                format!(
                    "The job description marks these skills as required: {}",
                    skills.missing_critical_skills.join(", ")
                ),
                format!(
                    "Add {} to your skills or experience if you have them",
                    list_terms(&skills.missing_critical_skills)
                ),
            ));
        }

        if resume.skills.len() < MIN_DECLARED_SKILLS {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::Skills,
                "Add More Skills",
                format!(
                    "Only {} skill(s) listed; ATS filters expect at least {}",
                    resume.skills.len(),
                    MIN_DECLARED_SKILLS
                ),
                "List the technical skills and tools you use that the role asks for",
            ));
        }

        let critical: Vec<&str> = formatting
            .critical_issues()
            .map(|issue| issue.message.as_str())
            .collect();
        if !critical.is_empty() {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::Formatting,
                "Fix Critical Formatting Issues",
                critical.join("; "),
                "Resolve these issues so ATS parsers can read your resume",
            ));
        }

        if resume.experience.is_empty() {
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::Content,
                "Add Work Experience",
                "No work experience entries were found",
                "Add your relevant positions with achievement-focused descriptions",
            ));
        }

        let missing_important: Vec<String> = matches
            .iter()
            .filter(|m| !m.found() && m.importance == Importance::High)
            .map(|m| m.keyword.clone())
            .collect();
        if !missing_important.is_empty() {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                Category::Keywords,
                "Include Important Keywords",
                format!(
                    "{} high-importance keyword(s) from the job description are missing",
                    missing_important.len()
                ),
                format!("Work in terms such as {}", list_terms(&missing_important)),
            ));
        }

        if content.quantified_achievements < MIN_QUANTIFIED {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                Category::Content,
                "Quantify Your Achievements",
                format!(
                    "Found {} quantified achievement(s)",
                    content.quantified_achievements
                ),
                "Add numbers, percentages or amounts that show the impact of your work",
            ));
        }

        if content.action_verbs_used < MIN_ACTION_VERBS {
            recommendations.push(Recommendation::new(
                Priority::Low,
                Category::Content,
                "Use Stronger Action Verbs",
                format!("Found {} strong action verb(s)", content.action_verbs_used),
                "Open bullet points with verbs like led, delivered, optimized or launched",
            ));
        }

        if content.generic_occurrences > MAX_GENERIC_OCCURRENCES {
            recommendations.push(Recommendation::new(
                Priority::Low,
                Category::Content,
                "Replace Generic Phrases",
                format!(
                    "Generic phrases used {} time(s): {}",
                    content.generic_occurrences,
                    content.generic_phrases.join(", ")
                ),
                "Describe concrete results instead of duties",
            ));
        }

        recommendations
    }
}

/// `40 + 12 × min(quantified, 5) − 10 × generic occurrences`, clamped
pub fn content_score(content: &ContentEnhancement) -> f64 {
    let quantified = content.quantified_achievements.min(5) as f64;
    let generic = content.generic_occurrences as f64;
    (40.0 + 12.0 * quantified - 10.0 * generic).clamp(0.0, 100.0)
}

fn list_terms(terms: &[String]) -> String {
    terms
        .iter()
        .take(LISTED_TERMS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::formatting::{FormattingIssue, Severity};
    use crate::processing::skill_matcher::CertificationAnalysis;

    fn keyword(name: &str, frequency: usize, importance: Importance) -> KeywordMatch {
        KeywordMatch {
            keyword: name.to_string(),
            frequency,
            positions: vec![],
            importance,
        }
    }

    fn skills(required: &[&str], found: &[&str], critical: &[&str]) -> HardSkillsAnalysis {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        HardSkillsAnalysis {
            required_skills: owned(required),
            found_skills: owned(found),
            missing_critical_skills: owned(critical),
            certifications: CertificationAnalysis::default(),
        }
    }

    fn formatting(score: u8, critical: bool) -> FormattingCheck {
        let issues = if critical {
            vec![FormattingIssue {
                message: "Incomplete contact information: phone number is missing".to_string(),
                severity: Severity::Critical,
            }]
        } else {
            vec![]
        };
        FormattingCheck {
            score,
            issues,
            strengths: vec![],
        }
    }

    fn content(quantified: usize, verbs: usize, generic: usize) -> ContentEnhancement {
        ContentEnhancement {
            action_verbs_used: verbs,
            quantified_achievements: quantified,
            industry_keywords: 0,
            generic_phrases: if generic > 0 {
                vec!["responsible for".to_string()]
            } else {
                vec![]
            },
            generic_occurrences: generic,
            readability_score: 60,
            suggestions: vec![],
        }
    }

    #[test]
    fn test_weighted_overall() {
        let aggregator = ScoreAggregator::new(ScoringConfig::default());
        let matches = vec![
            keyword("rust", 1, Importance::High),
            keyword("kafka", 0, Importance::High),
        ];
        let breakdown = aggregator.score(
            &matches,
            &skills(&["Rust", "Kafka"], &["Rust"], &[]),
            &formatting(80, false),
            &content(5, 3, 0),
        );
        // 0.4*50 + 0.3*50 + 0.2*80 + 0.1*100
        assert_eq!(breakdown.keyword_score, 50.0);
        assert_eq!(breakdown.content_score, 100.0);
        assert_eq!(breakdown.overall, 61);
    }

    #[test]
    fn test_skills_default_to_full_without_requirements() {
        let aggregator = ScoreAggregator::new(ScoringConfig::default());
        let matches = vec![keyword("customer", 1, Importance::Low)];
        let breakdown =
            aggregator.score(&matches, &skills(&[], &[], &[]), &formatting(100, false), &content(0, 0, 0));
        assert_eq!(breakdown.skills_score, 100.0);
        assert_eq!(breakdown.overall, 40 + 30 + 20 + 4);
    }

    #[test]
    fn test_nothing_to_compare_is_neutral() {
        let aggregator = ScoreAggregator::new(ScoringConfig::default());
        let breakdown =
            aggregator.score(&[], &skills(&[], &[], &[]), &formatting(5, true), &content(0, 0, 0));
        assert_eq!(breakdown.overall, NEUTRAL_SCORE);
    }

    #[test]
    fn test_content_score_clamped() {
        assert_eq!(content_score(&content(0, 0, 9)), 0.0);
        assert_eq!(content_score(&content(20, 0, 0)), 100.0);
        assert_eq!(content_score(&content(1, 0, 1)), 42.0);
    }

    #[test]
    fn test_full_ladder_order() {
        let aggregator = ScoreAggregator::new(ScoringConfig::default());
        let matches = vec![keyword("kubernetes", 0, Importance::High)];
        let recs = aggregator.recommendations(
            &matches,
            &skills(&["Kubernetes"], &[], &["Kubernetes"]),
            &formatting(20, true),
            &content(0, 0, 2),
            &ResumeRecord::default(),
        );
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Add Missing Critical Skills",
                "Add More Skills",
                "Fix Critical Formatting Issues",
                "Add Work Experience",
                "Include Important Keywords",
                "Quantify Your Achievements",
                "Use Stronger Action Verbs",
                "Replace Generic Phrases",
            ]
        );

        let mut sorted = recs.clone();
        sorted.sort_by_key(|r| (r.priority, r.category));
        assert_eq!(sorted, recs);
    }

    #[test]
    fn test_single_generic_phrase_not_flagged() {
        let aggregator = ScoreAggregator::new(ScoringConfig::default());
        let recs = aggregator.recommendations(
            &[],
            &skills(&[], &[], &[]),
            &formatting(100, false),
            &content(5, 5, 1),
            &ResumeRecord::default(),
        );
        assert!(!recs.iter().any(|r| r.title == "Replace Generic Phrases"));
    }
}
