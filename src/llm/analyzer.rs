//! AI insight augmentation on top of the heuristic analysis

use crate::config::AiConfig;
use crate::llm::client::{extract_json_object, GeminiClient, LlmError, TextGenerator};
use crate::llm::prompts::PromptTemplates;
use crate::processing::scoring::{Category, Priority, Recommendation};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Score used when the service omits one or reports garbage
pub const NEUTRAL_AI_SCORE: u8 = 70;
pub const PLACEHOLDER_TEXT: &str = "Not provided";
const UNAVAILABLE: &str = "AI analysis unavailable";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFeedback {
    pub score: u8,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiInsights {
    pub overall_assessment: String,
    pub key_strengths: Vec<String>,
    pub critical_gaps: Vec<String>,
    pub industry_alignment: ScoredFeedback,
    pub content_quality: ScoredFeedback,
    pub competitive_analysis: String,
    pub tailored_suggestions: Vec<String>,
    #[serde(default)]
    pub fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordGaps {
    pub missing_keywords: Vec<String>,
    pub keyword_suggestions: BTreeMap<String, Vec<String>>,
}

/// Everything the augmenter adds to a heuristic result
#[derive(Debug, Clone, PartialEq)]
pub struct Augmentation {
    pub insights: AiInsights,
    pub keyword_gaps: KeywordGaps,
}

impl AiInsights {
    /// Static stand-in returned whenever the service fails
    pub fn fallback() -> Self {
        Self {
            overall_assessment: "Unable to generate AI insights at this time".to_string(),
            key_strengths: Vec::new(),
            critical_gaps: Vec::new(),
            industry_alignment: ScoredFeedback {
                score: NEUTRAL_AI_SCORE,
                feedback: UNAVAILABLE.to_string(),
            },
            content_quality: ScoredFeedback {
                score: NEUTRAL_AI_SCORE,
                feedback: UNAVAILABLE.to_string(),
            },
            competitive_analysis: "Analysis unavailable".to_string(),
            tailored_suggestions: Vec::new(),
            fallback: true,
        }
    }

    /// Validate a loosely-shaped JSON object field by field
    pub fn from_value(value: &Value) -> Self {
        Self {
            overall_assessment: text_field(value.get("overallAssessment")),
            key_strengths: string_list(value.get("keyStrengths")),
            critical_gaps: string_list(value.get("criticalGaps")),
            industry_alignment: scored_feedback(value.get("industryAlignment")),
            content_quality: scored_feedback(value.get("contentQuality")),
            competitive_analysis: text_field(value.get("competitiveAnalysis")),
            tailored_suggestions: string_list(value.get("tailoredSuggestions")),
            fallback: false,
        }
    }

    /// Recommendations derived from real (non-fallback) insights
    pub fn recommendations(&self) -> Vec<Recommendation> {
        if self.fallback {
            return Vec::new();
        }

        let mut recommendations = Vec::new();

        if !self.critical_gaps.is_empty() {
            let focus: Vec<&str> = self.critical_gaps.iter().take(2).map(String::as_str).collect();
            recommendations.push(Recommendation::new(
                Priority::High,
                Category::Skills,
                "Address Critical Skill Gaps",
                "AI analysis identified key missing qualifications",
                format!("Focus on: {}", focus.join(", ")),
            ));
        }

        if self.industry_alignment.score < NEUTRAL_AI_SCORE {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                Category::Content,
                "Improve Industry Alignment",
                self.industry_alignment.feedback.clone(),
                "Add more industry-specific terminology and experience",
            ));
        }

        if self.content_quality.score < NEUTRAL_AI_SCORE {
            recommendations.push(Recommendation::new(
                Priority::Medium,
                Category::Content,
                "Enhance Content Quality",
                self.content_quality.feedback.clone(),
                "Improve writing quality and impact statements",
            ));
        }

        if let Some(first) = self.tailored_suggestions.first() {
            recommendations.push(Recommendation::new(
                Priority::Low,
                Category::Content,
                "AI-Suggested Improvements",
                "Personalized suggestions based on the job requirements",
                first.clone(),
            ));
        }

        recommendations
    }
}

impl KeywordGaps {
    pub fn from_value(value: &Value) -> Self {
        let keyword_suggestions = match value.get("keywordSuggestions") {
            Some(Value::Object(groups)) => groups
                .iter()
                .map(|(group, terms)| (group.clone(), string_list(Some(terms))))
                .collect(),
            _ => BTreeMap::new(),
        };

        Self {
            missing_keywords: string_list(value.get("missingKeywords")),
            keyword_suggestions,
        }
    }
}

fn scored_feedback(value: Option<&Value>) -> ScoredFeedback {
    ScoredFeedback {
        score: score_field(value.and_then(|v| v.get("score"))),
        feedback: text_field(value.and_then(|v| v.get("feedback"))),
    }
}

/// An AI-provided score: a finite number within [0, 100], rounded.
/// Anything else, absent included, is `NEUTRAL_AI_SCORE`.
pub fn ai_score(value: Option<f64>) -> u8 {
    match value {
        Some(n) if n.is_finite() && (0.0..=100.0).contains(&n) => n.round() as u8,
        _ => NEUTRAL_AI_SCORE,
    }
}

/// Numeric strings are accepted
fn score_field(value: Option<&Value>) -> u8 {
    ai_score(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// A list of strings; anything else is an empty list
fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => PLACEHOLDER_TEXT.to_string(),
    }
}

/// Runs the two AI calls and turns their output into validated insights.
/// Failures never escape: they degrade to the fallback.
pub struct InsightAugmenter<G: TextGenerator> {
    generator: G,
    templates: PromptTemplates,
    timeout: Duration,
}

impl InsightAugmenter<GeminiClient> {
    pub fn from_config(config: &AiConfig, api_key: String) -> Result<Self, LlmError> {
        let client = GeminiClient::new(config, api_key)?;
        Ok(Self::new(client, Duration::from_secs(config.timeout_secs)))
    }
}

impl<G: TextGenerator> InsightAugmenter<G> {
    pub fn new(generator: G, timeout: Duration) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            timeout,
        }
    }

    pub async fn augment(&self, job_text: &str, resume_text: &str) -> Augmentation {
        let alignment_prompt = self.templates.render_job_alignment(job_text, resume_text);
        let gaps_prompt = self.templates.render_keyword_gaps(job_text, resume_text);

        let (alignment, gaps) = tokio::join!(
            self.request_json(&alignment_prompt),
            self.request_json(&gaps_prompt)
        );

        let insights = match alignment {
            Ok(value) => AiInsights::from_value(&value),
            Err(e) => {
                warn!("AI job alignment failed, using fallback insights: {}", e);
                AiInsights::fallback()
            }
        };

        let keyword_gaps = match gaps {
            Ok(value) => KeywordGaps::from_value(&value),
            Err(e) => {
                warn!("AI keyword gap analysis failed: {}", e);
                KeywordGaps::default()
            }
        };

        debug!(
            "AI insights: fallback={}, {} missing keywords reported",
            insights.fallback,
            keyword_gaps.missing_keywords.len()
        );

        Augmentation {
            insights,
            keyword_gaps,
        }
    }

    async fn request_json(&self, prompt: &str) -> Result<Value, LlmError> {
        let text = tokio::time::timeout(self.timeout, self.generator.generate(prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))??;

        extract_json_object(&text).ok_or(LlmError::MissingJson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Answers alignment and keyword-gap prompts with canned text
    struct FakeGenerator {
        alignment: Result<&'static str, u16>,
        gaps: Result<&'static str, u16>,
    }

    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            let canned = if prompt.contains("missingKeywords") {
                self.gaps
            } else {
                self.alignment
            };
            canned.map(str::to_string).map_err(|status| LlmError::Api {
                status,
                message: "boom".to_string(),
            })
        }
    }

    struct SlowGenerator;

    impl TextGenerator for SlowGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok("{}".to_string())
        }
    }

    const ALIGNMENT: &str = r#"Here you go:
```json
{"overallAssessment": "Strong fit", "keyStrengths": ["Rust"], "criticalGaps": ["Kafka", "Terraform", "Go"],
 "industryAlignment": {"score": 55, "feedback": "Light on fintech"},
 "contentQuality": {"score": "85", "feedback": "Clear"},
 "competitiveAnalysis": "Above average", "tailoredSuggestions": ["Mention Kafka", "Add metrics"]}
```"#;

    const GAPS: &str = r#"{"missingKeywords": ["Kafka", "event sourcing"],
 "keywordSuggestions": {"tools_technologies": ["Kafka"], "certifications": "none"}}"#;

    fn augmenter(generator: FakeGenerator) -> InsightAugmenter<FakeGenerator> {
        InsightAugmenter::new(generator, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_successful_augmentation() {
        let augmentation = augmenter(FakeGenerator {
            alignment: Ok(ALIGNMENT),
            gaps: Ok(GAPS),
        })
        .augment("job", "resume")
        .await;

        let insights = augmentation.insights;
        assert!(!insights.fallback);
        assert_eq!(insights.overall_assessment, "Strong fit");
        assert_eq!(insights.industry_alignment.score, 55);
        assert_eq!(insights.content_quality.score, 85);
        assert_eq!(augmentation.keyword_gaps.missing_keywords, vec!["Kafka", "event sourcing"]);
        assert_eq!(
            augmentation.keyword_gaps.keyword_suggestions["certifications"],
            Vec::<String>::new()
        );
    }

    #[tokio::test]
    async fn test_non_json_response_falls_back() {
        let augmentation = augmenter(FakeGenerator {
            alignment: Ok("I cannot help with that."),
            gaps: Ok("nothing"),
        })
        .augment("job", "resume")
        .await;

        assert_eq!(augmentation.insights, AiInsights::fallback());
        assert_eq!(augmentation.keyword_gaps, KeywordGaps::default());
    }

    #[tokio::test]
    async fn test_api_error_falls_back_independently() {
        let augmentation = augmenter(FakeGenerator {
            alignment: Err(503),
            gaps: Ok(GAPS),
        })
        .augment("job", "resume")
        .await;

        assert!(augmentation.insights.fallback);
        assert_eq!(augmentation.keyword_gaps.missing_keywords.len(), 2);
    }

    #[tokio::test]
    async fn test_timeout_falls_back() {
        let augmenter = InsightAugmenter::new(SlowGenerator, Duration::from_millis(50));
        let augmentation = augmenter.augment("job", "resume").await;
        assert!(augmentation.insights.fallback);
        assert!(augmentation.keyword_gaps.missing_keywords.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let config = AiConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..Default::default()
        };
        let augmenter = InsightAugmenter::from_config(&config, "test-key".to_string()).unwrap();
        let augmentation = augmenter.augment("job", "resume").await;
        assert_eq!(augmentation.insights, AiInsights::fallback());
    }

    #[test]
    fn test_invalid_fields_are_replaced() {
        let insights = AiInsights::from_value(&json!({
            "overallAssessment": 42,
            "keyStrengths": "Rust",
            "criticalGaps": ["a", 1],
            "industryAlignment": {"score": 140, "feedback": "ok"},
            "contentQuality": {"score": "NaN"},
        }));

        assert_eq!(insights.overall_assessment, PLACEHOLDER_TEXT);
        assert!(insights.key_strengths.is_empty());
        assert!(insights.critical_gaps.is_empty());
        assert_eq!(insights.industry_alignment.score, NEUTRAL_AI_SCORE);
        assert_eq!(insights.content_quality.score, NEUTRAL_AI_SCORE);
        assert_eq!(insights.content_quality.feedback, PLACEHOLDER_TEXT);
        assert!(insights.tailored_suggestions.is_empty());
        assert!(!insights.fallback);
    }

    #[test]
    fn test_ai_recommendations() {
        let value = extract_json_object(ALIGNMENT).unwrap();
        let recs = AiInsights::from_value(&value).recommendations();
        let titles: Vec<&str> = recs.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Address Critical Skill Gaps",
                "Improve Industry Alignment",
                "AI-Suggested Improvements"
            ]
        );
        assert_eq!(recs[0].action, "Focus on: Kafka, Terraform");
        assert_eq!(recs[2].action, "Mention Kafka");
    }

    #[test]
    fn test_fallback_yields_no_recommendations() {
        assert!(AiInsights::fallback().recommendations().is_empty());
    }
}
