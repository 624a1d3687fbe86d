//! AI rewriting of resume content toward a job description

use crate::llm::client::{LlmError, TextGenerator};
use crate::llm::prompts::{ContentKind, PromptTemplates};
use crate::processing::document::ResumeRecord;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedExperience {
    pub id: String,
    pub position: String,
    pub original: String,
    pub optimized: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedResume {
    pub experience: Vec<OptimizedExperience>,
    pub suggested_skills: Vec<String>,
}

pub struct ContentOptimizer<G: TextGenerator> {
    generator: G,
    templates: PromptTemplates,
    timeout: Duration,
}

impl<G: TextGenerator> ContentOptimizer<G> {
    pub fn new(generator: G, timeout: Duration) -> Self {
        Self {
            generator,
            templates: PromptTemplates::default(),
            timeout,
        }
    }

    /// Rewrite one piece of content; the original comes back on any failure
    pub async fn optimize(&self, content: &str, job_text: &str, kind: ContentKind) -> String {
        match self.try_optimize(content, job_text, kind).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Content optimization ({:?}) failed: {}", kind, e);
                content.to_string()
            }
        }
    }

    /// Rewrite every experience description and collect skill suggestions
    pub async fn optimize_resume(&self, resume: &ResumeRecord, job_text: &str) -> OptimizedResume {
        let mut experience = Vec::with_capacity(resume.experience.len());
        for (idx, exp) in resume.experience.iter().enumerate() {
            info!("Optimizing experience {}/{}", idx + 1, resume.experience.len());
            let optimized = if exp.description.trim().is_empty() {
                exp.description.clone()
            } else {
                self.optimize(&exp.description, job_text, ContentKind::Experience)
                    .await
            };
            experience.push(OptimizedExperience {
                id: exp.id.clone(),
                position: exp.position.clone(),
                original: exp.description.clone(),
                optimized,
            });
        }

        let current = resume.skill_names().collect::<Vec<_>>().join(", ");
        let suggested_skills = match self
            .try_optimize(&current, job_text, ContentKind::Skills)
            .await
        {
            Ok(list) => parse_skill_list(&list, resume),
            Err(e) => {
                warn!("Skill suggestions failed: {}", e);
                Vec::new()
            }
        };

        OptimizedResume {
            experience,
            suggested_skills,
        }
    }

    async fn try_optimize(
        &self,
        content: &str,
        job_text: &str,
        kind: ContentKind,
    ) -> Result<String, LlmError> {
        let prompt = self.templates.render_optimization(kind, content, job_text);
        let text = tokio::time::timeout(self.timeout, self.generator.generate(&prompt))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout.as_secs()))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.to_string())
    }
}

/// Split a comma list, dropping empties, duplicates and skills already declared
fn parse_skill_list(list: &str, resume: &ResumeRecord) -> Vec<String> {
    let mut seen: HashSet<String> = resume.skill_names().map(str::to_lowercase).collect();

    list.split([',', '\n'])
        .map(|item| item.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|item| !item.is_empty())
        .filter(|item| seen.insert(item.to_lowercase()))
        .map(str::to_string)
        .collect()
}
