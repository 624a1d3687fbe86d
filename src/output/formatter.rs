//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::analyzer::AnalysisResult;
use crate::processing::ats_matcher::Importance;
use crate::processing::formatting::Severity;
use crate::processing::scoring::{Category, Priority};
use colored::{Color, Colorize};
use std::path::Path;

const KEYWORD_PREVIEW: usize = 10;

/// Trait for rendering an analysis result
pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and score badges
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for API integration and saved results
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for shareable reports
pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that dispatches to the formatter for a format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn priority_label(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

fn category_label(category: Category) -> &'static str {
    match category {
        Category::Keywords => "Keywords",
        Category::Skills => "Skills",
        Category::Formatting => "Formatting",
        Category::Content => "Content",
    }
}

fn importance_label(importance: Importance) -> &'static str {
    match importance {
        Importance::High => "high",
        Importance::Medium => "medium",
        Importance::Low => "low",
    }
}

fn or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u8) -> String {
        let (badge, color) = match score {
            90..=100 => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_priority_icon(&self, priority: Priority) -> &'static str {
        match (self.use_colors, priority) {
            (true, Priority::High) => "⚠️ ",
            (true, Priority::Medium) => "📋 ",
            (true, Priority::Low) => "💡 ",
            (false, Priority::High) => "[*] ",
            (false, Priority::Medium) => "[-] ",
            (false, Priority::Low) => "[+] ",
        }
    }

    fn format_severity(&self, severity: Severity) -> String {
        match severity {
            Severity::Critical => self.colorize("critical", Color::Red),
            Severity::Warning => self.colorize("warning", Color::Yellow),
            Severity::Info => self.colorize("info", Color::Cyan),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 ATS COMPATIBILITY ANALYSIS", 1));
        output.push_str(&format!(
            "Overall Score: {}% {}\n",
            report.overall_score,
            self.format_score_badge(report.overall_score)
        ));

        // Keywords
        let matched = report.matched_keywords().count();
        output.push_str(&self.format_header("🔍 Keywords", 2));
        output.push_str(&format!(
            "Matched {} of {} job keywords\n",
            matched,
            report.keyword_matches.len()
        ));
        if !report.missing_keywords.is_empty() {
            let shown: Vec<String> = if self.detailed {
                report.missing_keywords.clone()
            } else {
                report.missing_keywords.iter().take(KEYWORD_PREVIEW).cloned().collect()
            };
            output.push_str(&format!(
                "Missing: {}\n",
                self.colorize(&shown.join(", "), Color::Yellow)
            ));
            if shown.len() < report.missing_keywords.len() {
                output.push_str(&format!(
                    "  ... and {} more (use --detailed)\n",
                    report.missing_keywords.len() - shown.len()
                ));
            }
        }
        if self.detailed && !report.keyword_matches.is_empty() {
            output.push_str(&self.format_header("Keyword Matches", 3));
            for m in &report.keyword_matches {
                let mark = if m.found() {
                    self.colorize("✓", Color::Green)
                } else {
                    self.colorize("✗", Color::Red)
                };
                output.push_str(&format!(
                    "  {} {} (frequency: {}, importance: {})\n",
                    mark,
                    m.keyword,
                    m.frequency,
                    importance_label(m.importance)
                ));
            }
        }

        // Hard skills
        let skills = &report.hard_skills_analysis;
        output.push_str(&self.format_header("🧠 Hard Skills", 2));
        output.push_str(&format!("Required: {}\n", or_none(&skills.required_skills)));
        output.push_str(&format!(
            "Found: {}\n",
            self.colorize(&or_none(&skills.found_skills), Color::Green)
        ));
        if !skills.missing_critical_skills.is_empty() {
            output.push_str(&format!(
                "Missing critical: {}\n",
                self.colorize(&skills.missing_critical_skills.join(", "), Color::Red)
            ));
        }
        let certs = &skills.certifications;
        if !certs.required.is_empty() {
            output.push_str(&format!(
                "Certifications: {} found, missing {}\n",
                certs.found.len(),
                or_none(&certs.missing)
            ));
        }

        // Formatting
        let formatting = &report.formatting_check;
        output.push_str(&self.format_header("📄 Formatting", 2));
        output.push_str(&format!("Score: {}%\n", formatting.score));
        for issue in &formatting.issues {
            output.push_str(&format!(
                "  • [{}] {}\n",
                self.format_severity(issue.severity),
                issue.message
            ));
        }
        if self.detailed {
            for strength in &formatting.strengths {
                output.push_str(&format!("  ✓ {}\n", self.colorize(strength, Color::Green)));
            }
        }

        // Content
        let content = &report.content_enhancement;
        output.push_str(&self.format_header("✍️  Content", 2));
        output.push_str(&format!(
            "Action verbs: {} | Quantified achievements: {} | Industry terms: {} | Readability: {}%\n",
            content.action_verbs_used,
            content.quantified_achievements,
            content.industry_keywords,
            content.readability_score
        ));
        if !content.generic_phrases.is_empty() {
            output.push_str(&format!(
                "Generic phrases: {}\n",
                self.colorize(&content.generic_phrases.join(", "), Color::Yellow)
            ));
        }
        for suggestion in &content.suggestions {
            output.push_str(&format!("  • {}\n", suggestion));
        }

        // AI insights
        if let Some(insights) = &report.ai_insights {
            output.push_str(&self.format_header("🤖 AI Insights", 2));
            if insights.fallback {
                output.push_str(&self.colorize(
                    "AI insights unavailable; showing heuristic analysis only\n",
                    Color::BrightBlack,
                ));
            } else {
                output.push_str(&format!(
                    "{} {}\n",
                    self.colorize("Assessment:", Color::Cyan),
                    insights.overall_assessment
                ));
                output.push_str(&format!(
                    "Industry alignment: {}% | Content quality: {}%\n",
                    insights.industry_alignment.score, insights.content_quality.score
                ));
                for strength in &insights.key_strengths {
                    output.push_str(&format!("  ✓ {}\n", self.colorize(strength, Color::Green)));
                }
                for gap in &insights.critical_gaps {
                    output.push_str(&format!("  ✗ {}\n", self.colorize(gap, Color::Red)));
                }
                if self.detailed {
                    output.push_str(&format!(
                        "Competitive analysis: {}\n",
                        insights.competitive_analysis
                    ));
                }
            }
        }

        // Recommendations
        output.push_str(&self.format_header("📋 Recommendations", 2));
        if report.recommendations.is_empty() {
            output.push_str("No recommendations. Nice work!\n");
        }
        for (i, rec) in report.recommendations.iter().enumerate() {
            output.push_str(&format!(
                "{}. {}{} {}\n",
                i + 1,
                self.format_priority_icon(rec.priority),
                self.colorize(&rec.title, Color::White),
                self.colorize(
                    &format!("({})", category_label(rec.category)),
                    Color::BrightBlack
                )
            ));
            output.push_str(&format!("   {}\n", rec.description));
            output.push_str(&format!("   → {}\n", rec.action));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u8) -> &'static str {
        match score {
            90..=100 => "🟢 Excellent",
            80..=89 => "🟡 Very Good",
            70..=79 => "🟠 Good",
            60..=69 => "🔴 Fair",
            50..=59 => "🔴 Below Average",
            _ => "🔴 Poor",
        }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisResult) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 ATS Compatibility Report\n\n");
        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {}\n\n",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }

        output.push_str(&format!(
            "**Overall Score:** {}% {}\n\n",
            report.overall_score,
            Self::markdown_score_badge(report.overall_score)
        ));

        output.push_str("## Keywords\n\n");
        if report.keyword_matches.is_empty() {
            output.push_str("No keywords extracted from the job description.\n\n");
        } else {
            output.push_str("| Keyword | Found | Frequency | Importance |\n");
            output.push_str("|---------|-------|-----------|------------|\n");
            for m in &report.keyword_matches {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    m.keyword,
                    if m.found() { "✅" } else { "❌" },
                    m.frequency,
                    importance_label(m.importance)
                ));
            }
            output.push('\n');
        }
        if !report.missing_keywords.is_empty() {
            output.push_str(&format!(
                "**Missing:** `{}`\n\n",
                report.missing_keywords.join("`, `")
            ));
        }

        let skills = &report.hard_skills_analysis;
        output.push_str("## Hard Skills\n\n");
        output.push_str(&format!("- **Required:** {}\n", or_none(&skills.required_skills)));
        output.push_str(&format!("- **Found:** {}\n", or_none(&skills.found_skills)));
        output.push_str(&format!(
            "- **Missing critical:** {}\n",
            or_none(&skills.missing_critical_skills)
        ));
        if !skills.certifications.required.is_empty() {
            output.push_str(&format!(
                "- **Certifications missing:** {}\n",
                or_none(&skills.certifications.missing)
            ));
        }
        output.push('\n');

        let formatting = &report.formatting_check;
        output.push_str(&format!("## Formatting ({}%)\n\n", formatting.score));
        for issue in &formatting.issues {
            let label = match issue.severity {
                Severity::Critical => "🚨",
                Severity::Warning => "⚠️",
                Severity::Info => "ℹ️",
            };
            output.push_str(&format!("- {} {}\n", label, issue.message));
        }
        for strength in &formatting.strengths {
            output.push_str(&format!("- ✅ {}\n", strength));
        }
        output.push('\n');

        let content = &report.content_enhancement;
        output.push_str("## Content\n\n");
        output.push_str("| Metric | Value |\n|--------|-------|\n");
        output.push_str(&format!("| Action verbs | {} |\n", content.action_verbs_used));
        output.push_str(&format!(
            "| Quantified achievements | {} |\n",
            content.quantified_achievements
        ));
        output.push_str(&format!("| Industry terms | {} |\n", content.industry_keywords));
        output.push_str(&format!("| Readability | {}% |\n\n", content.readability_score));
        for suggestion in &content.suggestions {
            output.push_str(&format!("- {}\n", suggestion));
        }
        if !content.suggestions.is_empty() {
            output.push('\n');
        }

        if let Some(insights) = report.ai_insights.as_ref().filter(|i| !i.fallback) {
            output.push_str("## AI Insights\n\n");
            output.push_str(&format!("{}\n\n", insights.overall_assessment));
            output.push_str(&format!(
                "- **Industry alignment:** {}% ({})\n",
                insights.industry_alignment.score, insights.industry_alignment.feedback
            ));
            output.push_str(&format!(
                "- **Content quality:** {}% ({})\n",
                insights.content_quality.score, insights.content_quality.feedback
            ));
            output.push_str(&format!("- **Strengths:** {}\n", or_none(&insights.key_strengths)));
            output.push_str(&format!("- **Gaps:** {}\n\n", or_none(&insights.critical_gaps)));
        }

        output.push_str("## Recommendations\n\n");
        for (i, rec) in report.recommendations.iter().enumerate() {
            output.push_str(&format!("### {}. {}\n\n", i + 1, rec.title));
            output.push_str(&format!(
                "**Priority:** {} | **Category:** {}\n\n",
                priority_label(rec.priority),
                category_label(rec.category)
            ));
            output.push_str(&format!("{}\n\n", rec.description));
            output.push_str(&format!("**Action:** {}\n\n", rec.action));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisResult, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// Utility functions for saving reports
pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };
    format!("{}_ats{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::analyzer::AiInsights;
    use crate::processing::normalizer::ResultNormalizer;
    use crate::processing::normalizer::RawAnalysis;
    use tempfile::TempDir;

    fn sample() -> AnalysisResult {
        let raw = RawAnalysis::from_json(
            r#"{
                "overallScore": 72,
                "keywordMatches": [
                    {"keyword": "rust", "frequency": 3, "positions": [0, 10, 20], "importance": "high"},
                    {"keyword": "kafka", "frequency": 0, "importance": "high"}
                ],
                "hardSkillsAnalysis": {"requiredSkills": ["Rust", "Kafka"], "foundSkills": ["Rust"],
                                       "missingCriticalSkills": ["Kafka"]},
                "formattingCheck": {"score": 80, "issues": [{"message": "Missing Projects section", "severity": "warning"}],
                                    "strengths": ["Complete contact information"]},
                "contentEnhancement": {"actionVerbsUsed": 2, "quantifiedAchievements": 1, "industryKeywords": 0,
                                       "readabilityScore": 85, "suggestions": ["Add measurable results"]},
                "recommendations": [{"priority": "high", "category": "skills", "title": "Add Missing Critical Skills",
                                     "description": "Kafka is required", "action": "Add Kafka"}]
            }"#,
        )
        .unwrap();
        ResultNormalizer::default().normalize(raw)
    }

    #[test]
    fn test_console_plain_output() {
        let output = ConsoleFormatter::new(false, false).format_report(&sample()).unwrap();
        assert!(output.contains("Overall Score: 72% [GOOD]"));
        assert!(output.contains("Matched 1 of 2 job keywords"));
        assert!(output.contains("Missing critical: Kafka"));
        assert!(output.contains("[warning] Missing Projects section"));
        assert!(output.contains("1. [*] Add Missing Critical Skills (Skills)"));
        assert!(output.contains("→ Add Kafka"));
        assert!(!output.contains("AI Insights"));
    }

    #[test]
    fn test_console_detailed_lists_keywords() {
        let output = ConsoleFormatter::new(false, true).format_report(&sample()).unwrap();
        assert!(output.contains("✓ rust (frequency: 3, importance: high)"));
        assert!(output.contains("✗ kafka (frequency: 0, importance: high)"));
        assert!(output.contains("✓ Complete contact information"));
    }

    #[test]
    fn test_console_fallback_insights_notice() {
        let mut report = sample();
        report.ai_insights = Some(AiInsights::fallback());
        let output = ConsoleFormatter::new(false, false).format_report(&report).unwrap();
        assert!(output.contains("AI insights unavailable"));
    }

    #[test]
    fn test_json_round_trips_through_normalizer() {
        let report = sample();
        let json = JsonFormatter::new(true).format_report(&report).unwrap();
        assert!(json.contains("\"overallScore\": 72"));
        assert!(json.contains("\"found\": false"));

        let reparsed = ResultNormalizer::default().normalize(RawAnalysis::from_json(&json).unwrap());
        assert_eq!(reparsed, report);
    }

    #[test]
    fn test_markdown_output() {
        let output = MarkdownFormatter::new(false).format_report(&sample()).unwrap();
        assert!(output.starts_with("# 📊 ATS Compatibility Report"));
        assert!(output.contains("**Overall Score:** 72% 🟠 Good"));
        assert!(output.contains("| kafka | ❌ | 0 | high |"));
        assert!(output.contains("**Missing:** `kafka`"));
        assert!(output.contains("**Priority:** High | **Category:** Skills"));
        assert!(!output.contains("Generated"));
    }

    #[test]
    fn test_report_generator_dispatch() {
        let generator = ReportGenerator::with_options(false, false, false, false);
        let json = generator.generate_report(&sample(), OutputFormat::Json).unwrap();
        assert!(!json.contains('\n'));
        let md = generator.generate_report(&sample(), OutputFormat::Markdown).unwrap();
        assert!(md.contains("## Recommendations"));
    }

    #[test]
    fn test_suggest_filename_and_save() {
        assert_eq!(
            suggest_filename(OutputFormat::Markdown, "resumes/jane.json", false),
            "jane_ats.md"
        );

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("report.json");
        save_report_to_file("{}", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "{}");
    }
}
