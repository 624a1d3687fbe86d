//! Final normalization pass: every score clamped, every collection present

use crate::llm::analyzer::{ai_score, AiInsights, ScoredFeedback, PLACEHOLDER_TEXT};
use crate::processing::analyzer::AnalysisResult;
use crate::processing::ats_matcher::{Importance, KeywordMatch, DEFAULT_MAX_POSITIONS};
use crate::processing::content::{ContentEnhancement, NEUTRAL_READABILITY};
use crate::processing::formatting::{FormattingCheck, FormattingIssue};
use crate::processing::scoring::{Recommendation, NEUTRAL_SCORE};
use crate::processing::skill_matcher::{CertificationAnalysis, HardSkillsAnalysis};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};

pub const HEURISTIC_RECOMMENDATIONS: usize = 5;
pub const AUGMENTED_RECOMMENDATIONS: usize = 8;

/// Lenient field deserializers: a value of the wrong type becomes `None`
/// and malformed list elements are dropped, instead of failing the parse
pub mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(d)?;
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(number.filter(|n| n.is_finite()))
    }

    pub fn text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        match Value::deserialize(d)? {
            Value::String(s) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    pub fn seq<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(d)? {
            Value::Array(items) => Ok(Some(
                items
                    .into_iter()
                    .filter_map(|item| serde_json::from_value(item).ok())
                    .collect(),
            )),
            _ => Ok(None),
        }
    }

    pub fn object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Value::deserialize(d)?;
        Ok(serde_json::from_value(value).ok())
    }
}

/// Pre-validation analysis: any number or collection may be absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "lenient::number")]
    pub overall_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub keyword_matches: Option<Vec<RawKeywordMatch>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub missing_keywords: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub hard_skills_analysis: Option<RawHardSkills>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub formatting_check: Option<RawFormattingCheck>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub content_enhancement: Option<RawContentEnhancement>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub recommendations: Option<Vec<Recommendation>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub ai_insights: Option<RawInsights>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub keyword_suggestions: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawKeywordMatch {
    #[serde(default, deserialize_with = "lenient::text")]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub frequency: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub positions: Option<Vec<usize>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub importance: Option<Importance>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawHardSkills {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub required_skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub found_skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub missing_critical_skills: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub certifications: Option<RawCertifications>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCertifications {
    #[serde(default, deserialize_with = "lenient::seq")]
    pub required: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub found: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub missing: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormattingCheck {
    #[serde(default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub issues: Option<Vec<FormattingIssue>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub strengths: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContentEnhancement {
    #[serde(default, deserialize_with = "lenient::number")]
    pub action_verbs_used: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub quantified_achievements: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub industry_keywords: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub generic_phrases: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub generic_occurrences: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub readability_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub suggestions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInsights {
    #[serde(default, deserialize_with = "lenient::text")]
    pub overall_assessment: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub key_strengths: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub critical_gaps: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub industry_alignment: Option<RawScoredFeedback>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub content_quality: Option<RawScoredFeedback>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub competitive_analysis: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub tailored_suggestions: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub fallback: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScoredFeedback {
    #[serde(default, deserialize_with = "lenient::number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub feedback: Option<String>,
}

impl From<&KeywordMatch> for RawKeywordMatch {
    fn from(m: &KeywordMatch) -> Self {
        Self {
            keyword: Some(m.keyword.clone()),
            frequency: Some(m.frequency as f64),
            positions: Some(m.positions.clone()),
            importance: Some(m.importance),
        }
    }
}

impl From<&HardSkillsAnalysis> for RawHardSkills {
    fn from(skills: &HardSkillsAnalysis) -> Self {
        let certs = &skills.certifications;
        Self {
            required_skills: Some(skills.required_skills.clone()),
            found_skills: Some(skills.found_skills.clone()),
            missing_critical_skills: Some(skills.missing_critical_skills.clone()),
            certifications: Some(RawCertifications {
                required: Some(certs.required.clone()),
                found: Some(certs.found.clone()),
                missing: Some(certs.missing.clone()),
            }),
        }
    }
}

impl From<&FormattingCheck> for RawFormattingCheck {
    fn from(check: &FormattingCheck) -> Self {
        Self {
            score: Some(check.score as f64),
            issues: Some(check.issues.clone()),
            strengths: Some(check.strengths.clone()),
        }
    }
}

impl From<&ContentEnhancement> for RawContentEnhancement {
    fn from(content: &ContentEnhancement) -> Self {
        Self {
            action_verbs_used: Some(content.action_verbs_used as f64),
            quantified_achievements: Some(content.quantified_achievements as f64),
            industry_keywords: Some(content.industry_keywords as f64),
            generic_phrases: Some(content.generic_phrases.clone()),
            generic_occurrences: Some(content.generic_occurrences as f64),
            readability_score: Some(content.readability_score as f64),
            suggestions: Some(content.suggestions.clone()),
        }
    }
}

impl From<&ScoredFeedback> for RawScoredFeedback {
    fn from(scored: &ScoredFeedback) -> Self {
        Self {
            score: Some(scored.score as f64),
            feedback: Some(scored.feedback.clone()),
        }
    }
}

impl From<&AiInsights> for RawInsights {
    fn from(insights: &AiInsights) -> Self {
        Self {
            overall_assessment: Some(insights.overall_assessment.clone()),
            key_strengths: Some(insights.key_strengths.clone()),
            critical_gaps: Some(insights.critical_gaps.clone()),
            industry_alignment: Some((&insights.industry_alignment).into()),
            content_quality: Some((&insights.content_quality).into()),
            competitive_analysis: Some(insights.competitive_analysis.clone()),
            tailored_suggestions: Some(insights.tailored_suggestions.clone()),
            fallback: Some(insights.fallback),
        }
    }
}

impl RawAnalysis {
    /// Parse arbitrary JSON text; only a non-object document is an error
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Turns a `RawAnalysis` into an `AnalysisResult` that satisfies every
/// output invariant
pub struct ResultNormalizer {
    max_positions: usize,
}

impl Default for ResultNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POSITIONS)
    }
}

impl ResultNormalizer {
    pub fn new(max_positions: usize) -> Self {
        Self { max_positions }
    }

    pub fn normalize(&self, raw: RawAnalysis) -> AnalysisResult {
        let keyword_matches: Vec<KeywordMatch> = raw
            .keyword_matches
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| self.keyword_match(m))
            .collect();

        let unfound = keyword_matches
            .iter()
            .filter(|m| !m.found())
            .map(|m| m.keyword.clone());
        let missing_keywords =
            dedup_case_insensitive(unfound.chain(raw.missing_keywords.unwrap_or_default()));

        let ai_insights = raw.ai_insights.map(normalize_insights);
        let augmented = ai_insights.as_ref().is_some_and(|i| !i.fallback);

        let mut recommendations = raw.recommendations.unwrap_or_default();
        recommendations.sort_by_key(|r| (r.priority, r.category));
        recommendations.truncate(if augmented {
            AUGMENTED_RECOMMENDATIONS
        } else {
            HEURISTIC_RECOMMENDATIONS
        });

        AnalysisResult {
            overall_score: score(raw.overall_score, NEUTRAL_SCORE),
            keyword_matches,
            missing_keywords,
            hard_skills_analysis: normalize_skills(raw.hard_skills_analysis.unwrap_or_default()),
            formatting_check: normalize_formatting(raw.formatting_check.unwrap_or_default()),
            content_enhancement: normalize_content(raw.content_enhancement.unwrap_or_default()),
            recommendations,
            ai_insights,
            keyword_suggestions: raw.keyword_suggestions.unwrap_or_default(),
        }
    }

    fn keyword_match(&self, raw: RawKeywordMatch) -> Option<KeywordMatch> {
        let keyword = raw.keyword?.trim().to_string();
        if keyword.is_empty() {
            return None;
        }

        let frequency = count(raw.frequency);
        let mut positions = raw.positions.unwrap_or_default();
        positions.truncate(self.max_positions.min(frequency));

        Some(KeywordMatch {
            keyword,
            frequency,
            positions,
            importance: raw.importance.unwrap_or(Importance::Low),
        })
    }
}

/// Clamp to [0, 100] and round; absent or non-finite takes the fallback
fn score(value: Option<f64>, fallback: u8) -> u8 {
    match value {
        Some(n) if n.is_finite() => n.clamp(0.0, 100.0).round() as u8,
        _ => fallback,
    }
}

fn count(value: Option<f64>) -> usize {
    match value {
        Some(n) if n.is_finite() && n > 0.0 => n.round() as usize,
        _ => 0,
    }
}

fn dedup_case_insensitive(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty() && seen.insert(item.to_lowercase()))
        .collect()
}

fn contains_ignore_case(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|item| item.eq_ignore_ascii_case(needle))
}

fn normalize_skills(raw: RawHardSkills) -> HardSkillsAnalysis {
    let required = dedup_case_insensitive(raw.required_skills.unwrap_or_default());
    let found = dedup_case_insensitive(raw.found_skills.unwrap_or_default());
    let missing_critical: Vec<String> =
        dedup_case_insensitive(raw.missing_critical_skills.unwrap_or_default())
            .into_iter()
            .filter(|skill| contains_ignore_case(&required, skill))
            .filter(|skill| !contains_ignore_case(&found, skill))
            .collect();

    let certs = raw.certifications.unwrap_or_default();
    let cert_required = dedup_case_insensitive(certs.required.unwrap_or_default());
    let cert_found = dedup_case_insensitive(certs.found.unwrap_or_default());
    let cert_missing = cert_required
        .iter()
        .filter(|cert| !contains_ignore_case(&cert_found, cert))
        .cloned()
        .collect();

    HardSkillsAnalysis {
        required_skills: required,
        found_skills: found,
        missing_critical_skills: missing_critical,
        certifications: CertificationAnalysis {
            required: cert_required,
            found: cert_found,
            missing: cert_missing,
        },
    }
}

fn normalize_formatting(raw: RawFormattingCheck) -> FormattingCheck {
    FormattingCheck {
        score: score(raw.score, NEUTRAL_SCORE),
        issues: raw.issues.unwrap_or_default(),
        strengths: raw.strengths.unwrap_or_default(),
    }
}

fn normalize_content(raw: RawContentEnhancement) -> ContentEnhancement {
    ContentEnhancement {
        action_verbs_used: count(raw.action_verbs_used),
        quantified_achievements: count(raw.quantified_achievements),
        industry_keywords: count(raw.industry_keywords),
        generic_phrases: dedup_case_insensitive(raw.generic_phrases.unwrap_or_default()),
        generic_occurrences: count(raw.generic_occurrences),
        readability_score: score(raw.readability_score, NEUTRAL_READABILITY),
        suggestions: raw.suggestions.unwrap_or_default(),
    }
}

fn normalize_feedback(raw: Option<RawScoredFeedback>) -> ScoredFeedback {
    let raw = raw.unwrap_or_default();
    ScoredFeedback {
        score: ai_score(raw.score),
        feedback: text_or_placeholder(raw.feedback),
    }
}

fn text_or_placeholder(text: Option<String>) -> String {
    text.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| PLACEHOLDER_TEXT.to_string())
}

fn clean_list(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn normalize_insights(raw: RawInsights) -> AiInsights {
    AiInsights {
        overall_assessment: text_or_placeholder(raw.overall_assessment),
        key_strengths: clean_list(raw.key_strengths),
        critical_gaps: clean_list(raw.critical_gaps),
        industry_alignment: normalize_feedback(raw.industry_alignment),
        content_quality: normalize_feedback(raw.content_quality),
        competitive_analysis: text_or_placeholder(raw.competitive_analysis),
        tailored_suggestions: clean_list(raw.tailored_suggestions),
        fallback: raw.fallback.unwrap_or(false),
    }
}
