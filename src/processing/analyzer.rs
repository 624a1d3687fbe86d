//! Main analysis engine coordinating the heuristic analyzers and AI augmentation

use crate::config::{AiConfig, Config};
use crate::error::{AtsError, Result};
use crate::llm::analyzer::{AiInsights, Augmentation, InsightAugmenter};
use crate::llm::client::{GeminiClient, TextGenerator};
use crate::processing::ats_matcher::{missing_keywords, ATSMatcher, KeywordMatch};
use crate::processing::content::{ContentAnalyzer, ContentEnhancement};
use crate::processing::document::ResumeRecord;
use crate::processing::formatting::{FormattingCheck, FormattingChecker};
use crate::processing::keyword_extractor::KeywordExtractor;
use crate::processing::normalizer::{RawAnalysis, ResultNormalizer};
use crate::processing::scoring::{Recommendation, ScoreAggregator, ScoreBreakdown};
use crate::processing::skill_matcher::{HardSkillsAnalysis, SkillMatcher};
use crate::processing::text_processor::build_corpus;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

/// Complete, normalized compatibility report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: u8,
    pub keyword_matches: Vec<KeywordMatch>,
    pub missing_keywords: Vec<String>,
    pub hard_skills_analysis: HardSkillsAnalysis,
    pub formatting_check: FormattingCheck,
    pub content_enhancement: ContentEnhancement,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_insights: Option<AiInsights>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub keyword_suggestions: BTreeMap<String, Vec<String>>,
}

impl AnalysisResult {
    pub fn matched_keywords(&self) -> impl Iterator<Item = &KeywordMatch> {
        self.keyword_matches.iter().filter(|m| m.found())
    }

    pub fn is_augmented(&self) -> bool {
        self.ai_insights.as_ref().is_some_and(|i| !i.fallback)
    }
}

/// Per-call options
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Enables AI augmentation when present
    pub api_key: Option<String>,
}

/// Heuristic output before normalization
struct HeuristicDraft {
    corpus: String,
    breakdown: ScoreBreakdown,
    matches: Vec<KeywordMatch>,
    skills: HardSkillsAnalysis,
    formatting: FormattingCheck,
    content: ContentEnhancement,
    recommendations: Vec<Recommendation>,
}

impl HeuristicDraft {
    fn into_raw(self, augmentation: Option<Augmentation>) -> RawAnalysis {
        let mut missing = missing_keywords(&self.matches);
        let mut recommendations = self.recommendations;
        let mut ai_insights = None;
        let mut keyword_suggestions = None;

        if let Some(augmentation) = augmentation {
            if !augmentation.insights.fallback {
                missing.extend(augmentation.keyword_gaps.missing_keywords);
                recommendations.extend(augmentation.insights.recommendations());
            }
            keyword_suggestions = Some(augmentation.keyword_gaps.keyword_suggestions);
            ai_insights = Some((&augmentation.insights).into());
        }

        RawAnalysis {
            overall_score: Some(self.breakdown.overall as f64),
            keyword_matches: Some(self.matches.iter().map(Into::into).collect()),
            missing_keywords: Some(missing),
            hard_skills_analysis: Some((&self.skills).into()),
            formatting_check: Some((&self.formatting).into()),
            content_enhancement: Some((&self.content).into()),
            recommendations: Some(recommendations),
            ai_insights,
            keyword_suggestions,
        }
    }
}

/// Main analysis engine; build once and reuse across analyses
pub struct AnalysisEngine {
    extractor: KeywordExtractor,
    ats_matcher: ATSMatcher,
    skill_matcher: SkillMatcher,
    formatting_checker: FormattingChecker,
    content_analyzer: ContentAnalyzer,
    aggregator: ScoreAggregator,
    normalizer: ResultNormalizer,
    ai_config: AiConfig,
}

impl AnalysisEngine {
    /// Create a new analysis engine
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let extraction = &config.extraction;

        let engine = Self {
            extractor: KeywordExtractor::new(
                extraction.max_keywords,
                extraction.min_keyword_frequency,
            ),
            ats_matcher: ATSMatcher::with_limits(extraction.max_positions)?,
            skill_matcher: SkillMatcher::with_window(extraction.critical_window)?,
            formatting_checker: FormattingChecker::new()?,
            content_analyzer: ContentAnalyzer::new()?,
            aggregator: ScoreAggregator::new(config.scoring.clone()),
            normalizer: ResultNormalizer::new(extraction.max_positions),
            ai_config: config.ai.clone(),
        };

        info!(
            "Analysis engine ready ({} vocabulary skills)",
            engine.skill_matcher.skill_count()
        );
        Ok(engine)
    }

    /// Deterministic heuristic analysis. Never fails; empty input gives a
    /// neutral report.
    pub fn analyze_heuristics(&self, job_text: &str, resume: &ResumeRecord) -> AnalysisResult {
        let draft = self.run_heuristics(job_text, resume);
        self.normalizer.normalize(draft.into_raw(None))
    }

    /// Validate input, run the heuristics and, when an API key is given and
    /// AI is enabled, augment with AI insights
    pub async fn analyze(
        &self,
        job_text: &str,
        resume: &ResumeRecord,
        options: &AnalysisOptions,
    ) -> Result<AnalysisResult> {
        let api_key = options
            .api_key
            .clone()
            .filter(|_| self.ai_config.enabled);

        let Some(api_key) = api_key else {
            return self
                .analyze_with::<GeminiClient>(job_text, resume, None)
                .await;
        };

        match InsightAugmenter::from_config(&self.ai_config, api_key) {
            Ok(augmenter) => self.analyze_with(job_text, resume, Some(&augmenter)).await,
            Err(e) => {
                warn!("Could not create AI client, continuing without AI: {}", e);
                self.analyze_with::<GeminiClient>(job_text, resume, None)
                    .await
            }
        }
    }

    /// Same as `analyze`, with a caller-supplied augmenter
    pub async fn analyze_with<G: TextGenerator>(
        &self,
        job_text: &str,
        resume: &ResumeRecord,
        augmenter: Option<&InsightAugmenter<G>>,
    ) -> Result<AnalysisResult> {
        validate_input(job_text, resume)?;

        let start = Instant::now();
        let draft = self.run_heuristics(job_text, resume);

        let augmentation = match augmenter {
            Some(augmenter) => {
                info!("Requesting AI insights");
                Some(augmenter.augment(job_text, &draft.corpus).await)
            }
            None => None,
        };

        let result = self.normalizer.normalize(draft.into_raw(augmentation));
        info!(
            "Analysis completed in {}ms (score {})",
            start.elapsed().as_millis(),
            result.overall_score
        );
        Ok(result)
    }

    /// Keywords the extractor pulls from a job description
    pub fn extract_keywords(&self, job_text: &str) -> Vec<String> {
        self.extractor.extract(job_text)
    }

    pub fn skill_matcher(&self) -> &SkillMatcher {
        &self.skill_matcher
    }

    /// Re-normalize a previously produced (possibly edited) result
    pub fn normalize(&self, raw: RawAnalysis) -> AnalysisResult {
        self.normalizer.normalize(raw)
    }

    fn run_heuristics(&self, job_text: &str, resume: &ResumeRecord) -> HeuristicDraft {
        let corpus = build_corpus(resume);

        let keywords = self.extractor.extract(job_text);
        debug!("Extracted {} keywords", keywords.len());

        let matches = self
            .ats_matcher
            .match_keywords(&keywords, &corpus)
            .unwrap_or_else(|e| {
                warn!("Keyword matching failed: {}", e);
                Vec::new()
            });

        let skills = self.skill_matcher.analyze(job_text, resume, &corpus);
        let formatting = self.formatting_checker.check(resume);
        let content = self.content_analyzer.analyze(resume);

        let breakdown = self
            .aggregator
            .score(&matches, &skills, &formatting, &content);
        debug!(
            "Scores: keywords {:.1}, skills {:.1}, formatting {:.1}, content {:.1}",
            breakdown.keyword_score,
            breakdown.skills_score,
            breakdown.formatting_score,
            breakdown.content_score
        );

        let recommendations =
            self.aggregator
                .recommendations(&matches, &skills, &formatting, &content, resume);

        HeuristicDraft {
            corpus,
            breakdown,
            matches,
            skills,
            formatting,
            content,
            recommendations,
        }
    }
}

fn validate_input(job_text: &str, resume: &ResumeRecord) -> Result<()> {
    if job_text.trim().is_empty() {
        return Err(AtsError::InvalidInput(
            "Job description is empty".to_string(),
        ));
    }
    resume.validate()
}
