//! Integration tests for the ATS analyzer

use ats_analyzer::config::OutputFormat;
use ats_analyzer::input::InputManager;
use ats_analyzer::output::ReportGenerator;
use ats_analyzer::processing::document::{Experience, Skill};
use ats_analyzer::processing::normalizer::RawAnalysis;
use ats_analyzer::{AnalysisEngine, AnalysisOptions, AtsError, Config, ResumeRecord};
use std::path::Path;

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(&Config::default()).unwrap()
}

async fn load_fixtures() -> (ResumeRecord, String) {
    let manager = InputManager::new();
    let resume = manager
        .load_resume(Path::new("tests/fixtures/sample_resume.json"))
        .await
        .unwrap();
    let job = manager
        .load_job_description(Path::new("tests/fixtures/sample_job.txt"))
        .await
        .unwrap();
    (resume, job)
}

#[tokio::test]
async fn test_full_heuristic_analysis() {
    let (resume, job) = load_fixtures().await;
    let result = engine()
        .analyze(&job, &resume, &AnalysisOptions::default())
        .await
        .unwrap();

    assert!(result.overall_score <= 100);
    assert!(result.ai_insights.is_none());
    assert!(result.recommendations.len() <= 5);

    let skills = &result.hard_skills_analysis;
    assert!(skills.found_skills.contains(&"Rust".to_string()));
    assert!(skills.missing_critical_skills.contains(&"Kafka".to_string()));
    for skill in &skills.missing_critical_skills {
        assert!(skills.required_skills.contains(skill));
        assert!(!skills.found_skills.contains(skill));
    }

    let rust = result
        .keyword_matches
        .iter()
        .find(|m| m.keyword == "rust")
        .expect("rust should be extracted");
    assert!(rust.found());
    assert!(rust.positions.len() <= rust.frequency.min(10));

    for m in result.keyword_matches.iter().filter(|m| !m.found()) {
        assert!(result.missing_keywords.contains(&m.keyword));
    }

    // Everything present, dated and quantified
    assert!(!result.formatting_check.has_critical_issues());
    assert!(result.content_enhancement.quantified_achievements >= 1);
}

#[tokio::test]
async fn test_markdown_job_matches_plain_text() {
    let (resume, txt_job) = load_fixtures().await;
    let md_job = InputManager::new()
        .load_job_description(Path::new("tests/fixtures/sample_job.md"))
        .await
        .unwrap();

    let engine = engine();
    assert_eq!(engine.extract_keywords(&md_job), engine.extract_keywords(&txt_job));
    assert_eq!(
        engine.analyze_heuristics(&md_job, &resume).hard_skills_analysis,
        engine.analyze_heuristics(&txt_job, &resume).hard_skills_analysis
    );
}

#[test]
fn test_required_marker_only_flags_its_own_clause() {
    let resume = ResumeRecord {
        skills: vec![Skill {
            id: "s1".to_string(),
            name: "React".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let result = engine().analyze_heuristics("React, TypeScript, AWS (required)", &resume);
    let skills = &result.hard_skills_analysis;

    assert!(skills.found_skills.iter().any(|s| s.eq_ignore_ascii_case("react")));
    assert!(skills.missing_critical_skills.contains(&"AWS".to_string()));
    assert!(!skills.missing_critical_skills.contains(&"TypeScript".to_string()));
}

#[test]
fn test_hyphenated_phrase_is_found_in_resume() {
    let resume = ResumeRecord {
        experience: vec![Experience {
            id: "e1".to_string(),
            position: "Engineer".to_string(),
            description: "Full-stack engineer building full-stack apps".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let result = engine().analyze_heuristics(
        "Full-stack engineer wanted. Full-stack experience.",
        &resume,
    );
    let phrase = result
        .keyword_matches
        .iter()
        .find(|m| m.keyword == "full stack")
        .expect("full stack should be extracted");
    assert!(phrase.found());
    assert_eq!(phrase.frequency, 2);
    assert!(!result.missing_keywords.contains(&"full stack".to_string()));
}

#[tokio::test]
async fn test_quantified_achievement_is_recognized() {
    let resume = InputManager::new()
        .load_resume(Path::new("tests/fixtures/sample_resume.toml"))
        .await
        .unwrap();
    assert_eq!(
        resume.experience[0].description,
        "Increased revenue by 25% in Q2"
    );

    let result = engine().analyze_heuristics("Frontend developer with React", &resume);
    assert!(result.content_enhancement.quantified_achievements >= 1);
    assert!(!result
        .formatting_check
        .issues
        .iter()
        .any(|issue| issue.message.contains("quantified")));
}

#[test]
fn test_empty_inputs_give_neutral_report() {
    let result = engine().analyze_heuristics("", &ResumeRecord::default());

    assert_eq!(result.overall_score, 50);
    assert!(result.keyword_matches.is_empty());
    let titles: Vec<&str> = result.recommendations.iter().map(|r| r.title.as_str()).collect();
    assert!(titles.contains(&"Add Work Experience"));
    assert!(titles.contains(&"Add More Skills"));
}

#[tokio::test]
async fn test_empty_job_is_rejected_by_analyze() {
    let err = engine()
        .analyze("   ", &ResumeRecord::default(), &AnalysisOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AtsError::InvalidInput(_)));
}

#[tokio::test]
async fn test_duplicate_ids_are_rejected() {
    let experience = Experience {
        id: "e1".to_string(),
        ..Default::default()
    };
    let resume = ResumeRecord {
        experience: vec![experience.clone(), experience],
        ..Default::default()
    };

    let err = engine()
        .analyze("Rust engineer", &resume, &AnalysisOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AtsError::InvalidInput(_)));
}

#[tokio::test]
async fn test_unreachable_service_falls_back_to_heuristics() {
    let mut config = Config::default();
    config.ai.endpoint = "http://127.0.0.1:9".to_string();
    config.ai.timeout_secs = 2;
    let engine = AnalysisEngine::new(&config).unwrap();

    let (resume, job) = load_fixtures().await;
    let options = AnalysisOptions {
        api_key: Some("test-key".to_string()),
    };
    let result = engine.analyze(&job, &resume, &options).await.unwrap();
    let heuristic = engine.analyze_heuristics(&job, &resume);

    let insights = result.ai_insights.as_ref().expect("fallback insights");
    assert!(insights.fallback);
    assert!(!result.is_augmented());
    assert!(result.recommendations.len() <= 5);
    assert_eq!(result.overall_score, heuristic.overall_score);
    assert_eq!(result.missing_keywords, heuristic.missing_keywords);
    assert!(result.keyword_suggestions.is_empty());
}

#[tokio::test]
async fn test_disabled_ai_ignores_api_key() {
    let mut config = Config::default();
    config.ai.enabled = false;
    let engine = AnalysisEngine::new(&config).unwrap();

    let (resume, job) = load_fixtures().await;
    let options = AnalysisOptions {
        api_key: Some("test-key".to_string()),
    };
    let result = engine.analyze(&job, &resume, &options).await.unwrap();
    assert!(result.ai_insights.is_none());
}

#[tokio::test]
async fn test_saved_json_renders_back() {
    let (resume, job) = load_fixtures().await;
    let engine = engine();
    let result = engine.analyze_heuristics(&job, &resume);

    let generator = ReportGenerator::with_options(false, true, true, false);
    let json = generator.generate_report(&result, OutputFormat::Json).unwrap();
    let rendered = engine.normalize(RawAnalysis::from_json(&json).unwrap());
    assert_eq!(rendered, result);

    let markdown = generator
        .generate_report(&rendered, OutputFormat::Markdown)
        .unwrap();
    assert!(markdown.contains(&format!("**Overall Score:** {}%", result.overall_score)));
}

#[test]
fn test_malformed_raw_result_is_normalized() {
    let raw = RawAnalysis::from_json(
        r#"{"overallScore": "high", "keywordMatches": "none", "formattingCheck": {"score": 250},
            "contentEnhancement": {"readabilityScore": null}}"#,
    )
    .unwrap();
    let result = engine().normalize(raw);

    assert_eq!(result.overall_score, 50);
    assert!(result.keyword_matches.is_empty());
    assert_eq!(result.formatting_check.score, 100);
    assert_eq!(result.content_enhancement.readability_score, 60);
}

#[test]
fn test_analysis_is_deterministic() {
    let resume: ResumeRecord =
        serde_json::from_str(&std::fs::read_to_string("tests/fixtures/sample_resume.json").unwrap())
            .unwrap();
    let job = std::fs::read_to_string("tests/fixtures/sample_job.txt").unwrap();

    let engine = engine();
    assert_eq!(
        engine.analyze_heuristics(&job, &resume),
        engine.analyze_heuristics(&job, &resume)
    );
}
