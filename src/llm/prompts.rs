//! Prompt templates for the text-generation service

use serde::{Deserialize, Serialize};

/// Kind of resume content the optimizer rewrites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Experience,
    Summary,
    Skills,
}

/// Prompt templates with `{job}`, `{resume}` and `{content}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub job_alignment: String,
    pub keyword_gaps: String,
    pub experience: String,
    pub summary: String,
    pub skills: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            job_alignment: JOB_ALIGNMENT_TEMPLATE.to_string(),
            keyword_gaps: KEYWORD_GAPS_TEMPLATE.to_string(),
            experience: EXPERIENCE_TEMPLATE.to_string(),
            summary: SUMMARY_TEMPLATE.to_string(),
            skills: SKILLS_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    pub fn render_job_alignment(&self, job: &str, resume: &str) -> String {
        fill(&self.job_alignment, &[("job", job), ("resume", resume)])
    }

    pub fn render_keyword_gaps(&self, job: &str, resume: &str) -> String {
        fill(&self.keyword_gaps, &[("job", job), ("resume", resume)])
    }

    pub fn render_optimization(&self, kind: ContentKind, content: &str, job: &str) -> String {
        let template = match kind {
            ContentKind::Experience => &self.experience,
            ContentKind::Summary => &self.summary,
            ContentKind::Skills => &self.skills,
        };
        fill(template, &[("job", job), ("content", content)])
    }
}

/// Substitute `{name}` placeholders in a single pass. Inserted values are
/// never scanned again, so placeholder text inside inputs stays literal.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let value = values.iter().find(|(name, _)| {
            tail.starts_with(*name) && tail[name.len()..].starts_with('}')
        });
        match value {
            Some((name, value)) => {
                rendered.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                rendered.push('{');
                rest = tail;
            }
        }
    }

    rendered.push_str(rest);
    rendered
}

const JOB_ALIGNMENT_TEMPLATE: &str = r#"You are an expert ATS (Applicant Tracking System) and recruitment consultant.
Analyze the alignment between this job description and resume.

JOB DESCRIPTION:
{job}

RESUME CONTENT:
{resume}

Respond with a single JSON object with exactly this structure:
{
  "overallAssessment": "Brief overall assessment of fit",
  "keyStrengths": ["strength1", "strength2", "strength3"],
  "criticalGaps": ["gap1", "gap2", "gap3"],
  "industryAlignment": {"score": 0-100, "feedback": "Feedback on industry alignment"},
  "contentQuality": {"score": 0-100, "feedback": "Assessment of resume writing quality"},
  "competitiveAnalysis": "How this resume compares to typical candidates",
  "tailoredSuggestions": ["suggestion1", "suggestion2", "suggestion3"]
}

Focus on technical skills alignment, experience relevance, industry knowledge,
leadership, career progression and achievement quantification."#;

const KEYWORD_GAPS_TEMPLATE: &str = r#"Extract important keywords and phrases from this job description that are missing from the resume.
Focus on technical skills, tools, methodologies and industry-specific terms.

JOB DESCRIPTION:
{job}

RESUME:
{resume}

Respond with a single JSON object:
{
  "missingKeywords": ["keyword1", "keyword2"],
  "keywordSuggestions": {
    "technical_skills": ["skill1"],
    "tools_technologies": ["tool1"],
    "methodologies": ["method1"],
    "certifications": ["cert1"]
  }
}"#;

const EXPERIENCE_TEMPLATE: &str = r#"Rewrite this work experience description to better match the job requirements.
Make it ATS-friendly with relevant keywords and quantifiable achievements.

Original: {content}
Job Description: {job}

Return only the improved description:"#;

const SUMMARY_TEMPLATE: &str = r#"Create a professional summary that aligns with this job description.
Include relevant keywords and highlight matching qualifications.

Current summary: {content}
Job Description: {job}

Return only the improved summary (2-3 sentences):"#;

const SKILLS_TEMPLATE: &str = r#"Suggest additional technical skills to add based on the job description.
Only suggest skills that are reasonable for someone with this background.

Current skills: {content}
Job Description: {job}

Return a comma-separated list of suggested skills:"#;
