//! Input manager for job descriptions and structured resumes

use crate::error::{AtsError, Result};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{MarkdownExtractor, PlainTextExtractor, TextExtractor};
use crate::processing::document::ResumeRecord;
use log::info;
use std::path::Path;

#[derive(Debug, Default)]
pub struct InputManager;

impl InputManager {
    pub fn new() -> Self {
        Self
    }

    /// Read a job description from a `.txt` or `.md` file
    pub async fn load_job_description(&self, path: &Path) -> Result<String> {
        self.ensure_exists(path)?;

        let text = match FileType::from_path(path) {
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            _ => {
                return Err(AtsError::UnsupportedFormat(format!(
                    "Job description must be .txt or .md: {}",
                    path.display()
                )))
            }
        };

        if text.trim().is_empty() {
            return Err(AtsError::InvalidInput(format!(
                "Job description is empty: {}",
                path.display()
            )));
        }
        Ok(text)
    }

    /// Read and validate a resume from a `.json` or `.toml` file
    pub async fn load_resume(&self, path: &Path) -> Result<ResumeRecord> {
        self.ensure_exists(path)?;

        let file_type = FileType::from_path(path);
        if !file_type.is_resume_record() {
            return Err(AtsError::UnsupportedFormat(format!(
                "Resume must be .json or .toml: {}",
                path.display()
            )));
        }

        info!("Loading resume: {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        let resume = parse_resume(&content, file_type).map_err(|message| {
            AtsError::InvalidInput(format!("Invalid resume '{}': {}", path.display(), message))
        })?;

        resume.validate()?;
        Ok(resume)
    }

    fn ensure_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(AtsError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }
        Ok(())
    }
}

fn parse_resume(content: &str, file_type: FileType) -> std::result::Result<ResumeRecord, String> {
    match file_type {
        FileType::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        FileType::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        other => Err(format!("{:?} is not a resume format", other)),
    }
}
