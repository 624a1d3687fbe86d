//! Structured resume record and its sections

use crate::error::{AtsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Structured resume as captured by the resume builder form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    #[serde(rename = "linkedIn")]
    pub linked_in: String,
    pub portfolio: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    /// `YYYY-MM` or empty
    pub start_date: String,
    pub end_date: String,
    pub description: String,
    #[serde(alias = "isCurrent")]
    pub current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub id: String,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: String,
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Comma-joined free text
    pub technologies: String,
    pub start_date: String,
    pub end_date: String,
    pub url: Option<String>,
    #[serde(alias = "isCurrent")]
    pub current: bool,
}

/// Standard resume sections checked for coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionType {
    Experience,
    Education,
    Skills,
    Projects,
}

impl SectionType {
    pub const ALL: [SectionType; 4] = [
        SectionType::Experience,
        SectionType::Education,
        SectionType::Skills,
        SectionType::Projects,
    ];
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionType::Experience => "Experience",
            SectionType::Education => "Education",
            SectionType::Skills => "Skills",
            SectionType::Projects => "Projects",
        };
        write!(f, "{}", name)
    }
}

impl ResumeRecord {
    /// Number of entries in a section
    pub fn section_len(&self, section: SectionType) -> usize {
        match section {
            SectionType::Experience => self.experience.len(),
            SectionType::Education => self.education.len(),
            SectionType::Skills => self.skills.len(),
            SectionType::Projects => self.projects.len(),
        }
    }

    /// Check that every list item carries a non-empty id, unique within its list
    pub fn validate(&self) -> Result<()> {
        check_ids(SectionType::Experience, self.experience.iter().map(|e| e.id.as_str()))?;
        check_ids(SectionType::Education, self.education.iter().map(|e| e.id.as_str()))?;
        check_ids(SectionType::Skills, self.skills.iter().map(|s| s.id.as_str()))?;
        check_ids(SectionType::Projects, self.projects.iter().map(|p| p.id.as_str()))?;
        Ok(())
    }

    /// Names of explicitly declared skills
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.name.as_str())
    }
}

fn check_ids<'a>(section: SectionType, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, id) in ids.enumerate() {
        if id.trim().is_empty() {
            return Err(AtsError::InvalidInput(format!(
                "{} entry #{} has no id",
                section,
                index + 1
            )));
        }
        if !seen.insert(id) {
            return Err(AtsError::InvalidInput(format!(
                "Duplicate {} id: {}",
                section.to_string().to_lowercase(),
                id
            )));
        }
    }
    Ok(())
}
