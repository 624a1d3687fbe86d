//! Rule-based structural critique of a resume record

use crate::error::Result;
use crate::processing::document::{ResumeRecord, SectionType};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

const SECTION_DEDUCTION: u32 = 15;
const CONTACT_DEDUCTION: u32 = 20;
const BULLET_DEDUCTION: u32 = 5;
const QUANTIFIED_DEDUCTION: u32 = 10;
const DATE_DEDUCTION: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingIssue {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingCheck {
    pub score: u8,
    pub issues: Vec<FormattingIssue>,
    pub strengths: Vec<String>,
}

impl FormattingCheck {
    pub fn has_critical_issues(&self) -> bool {
        self.critical_issues().next().is_some()
    }

    pub fn critical_issues(&self) -> impl Iterator<Item = &FormattingIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Critical)
    }
}

/// Outcome of a single rule: a strength, or an issue with its deduction
enum Finding {
    Strength(String),
    Issue {
        message: String,
        severity: Severity,
        deduction: u32,
    },
}

pub struct FormattingChecker {
    email_regex: Regex,
    numbered_bullet: Regex,
}

impl FormattingChecker {
    pub fn new() -> Result<Self> {
        Ok(Self {
            email_regex: Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")?,
            numbered_bullet: Regex::new(r"^\d+[.)]\s")?,
        })
    }

    /// Apply every rule; each contributes exactly one finding
    pub fn check(&self, resume: &ResumeRecord) -> FormattingCheck {
        let mut findings: Vec<Finding> = SectionType::ALL
            .iter()
            .map(|&section| self.section_coverage(resume, section))
            .collect();
        findings.push(self.contact_completeness(resume));
        findings.push(self.bullet_structure(resume));
        findings.push(self.quantified_achievements(resume));
        findings.push(self.date_consistency(resume));

        let mut deductions = 0u32;
        let mut issues = Vec::new();
        let mut strengths = Vec::new();

        for finding in findings {
            match finding {
                Finding::Strength(text) => strengths.push(text),
                Finding::Issue {
                    message,
                    severity,
                    deduction,
                } => {
                    deductions += deduction;
                    issues.push(FormattingIssue { message, severity });
                }
            }
        }

        FormattingCheck {
            score: 100u32.saturating_sub(deductions) as u8,
            issues,
            strengths,
        }
    }

    fn section_coverage(&self, resume: &ResumeRecord, section: SectionType) -> Finding {
        if resume.section_len(section) > 0 {
            Finding::Strength(format!("{} section present", section))
        } else {
            Finding::Issue {
                message: format!("Missing {} section", section),
                severity: Severity::Warning,
                deduction: SECTION_DEDUCTION,
            }
        }
    }

    fn contact_completeness(&self, resume: &ResumeRecord) -> Finding {
        let email = resume.personal_info.email.trim();
        let phone = resume.personal_info.phone.trim();

        let mut problems = Vec::new();
        if email.is_empty() {
            problems.push("email address is missing");
        } else if !self.email_regex.is_match(email) {
            problems.push("email address is not valid");
        }
        if phone.is_empty() {
            problems.push("phone number is missing");
        }

        if problems.is_empty() {
            Finding::Strength("Complete contact information".to_string())
        } else {
            Finding::Issue {
                message: format!("Incomplete contact information: {}", problems.join(", ")),
                severity: Severity::Critical,
                deduction: CONTACT_DEDUCTION,
            }
        }
    }

    fn bullet_structure(&self, resume: &ResumeRecord) -> Finding {
        let structured = resume
            .experience
            .iter()
            .any(|exp| self.is_structured(&exp.description));

        if structured {
            Finding::Strength("Experience descriptions use bullet points".to_string())
        } else {
            Finding::Issue {
                message: "Suggestion: break experience descriptions into bullet points".to_string(),
                severity: Severity::Info,
                deduction: BULLET_DEDUCTION,
            }
        }
    }

    fn is_structured(&self, description: &str) -> bool {
        let lines: Vec<&str> = description
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        lines.len() > 1
            || lines.iter().any(|line| {
                line.starts_with(['-', '*', '•', '·', '–', '▪'])
                    || self.numbered_bullet.is_match(line)
            })
    }

    fn quantified_achievements(&self, resume: &ResumeRecord) -> Finding {
        let quantified = resume
            .experience
            .iter()
            .any(|exp| exp.description.chars().any(|c| c.is_ascii_digit()));

        if quantified {
            Finding::Strength("Experience includes quantified achievements".to_string())
        } else {
            Finding::Issue {
                message: "Suggestion: no quantified achievements in experience descriptions"
                    .to_string(),
                severity: Severity::Info,
                deduction: QUANTIFIED_DEDUCTION,
            }
        }
    }

    fn date_consistency(&self, resume: &ResumeRecord) -> Finding {
        let ranges = resume
            .experience
            .iter()
            .map(|e| (e.start_date.as_str(), e.end_date.as_str(), e.current))
            .chain(
                resume
                    .projects
                    .iter()
                    .map(|p| (p.start_date.as_str(), p.end_date.as_str(), p.current)),
            );

        let mut problems = 0;
        for (start, end, current) in ranges {
            let parsed_start = parse_month(start);
            let parsed_end = if current { Ok(None) } else { parse_month(end) };

            match (parsed_start, parsed_end) {
                (Ok(Some(s)), Ok(Some(e))) if e < s => problems += 1,
                (Ok(_), Ok(_)) => {}
                _ => problems += 1,
            }
        }

        let graduation_problems = resume
            .education
            .iter()
            .filter(|edu| parse_month(&edu.graduation_date).is_err())
            .count();
        problems += graduation_problems;

        if problems == 0 {
            Finding::Strength("Dates are consistent".to_string())
        } else {
            Finding::Issue {
                message: format!(
                    "{} date(s) are not in YYYY-MM format or end before they start",
                    problems
                ),
                severity: Severity::Warning,
                deduction: DATE_DEDUCTION,
            }
        }
    }
}

/// Parse `YYYY-MM`; empty means "not given"
fn parse_month(value: &str) -> std::result::Result<Option<NaiveDate>, chrono::ParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::document::{Education, Experience, PersonalInfo, Project, Skill};

    fn complete_resume() -> ResumeRecord {
        ResumeRecord {
            personal_info: PersonalInfo {
                full_name: "Jane Roe".to_string(),
                email: "jane@example.com".to_string(),
                phone: "+1 555 0100".to_string(),
                ..Default::default()
            },
            experience: vec![Experience {
                id: "e1".to_string(),
                company: "Acme".to_string(),
                position: "Engineer".to_string(),
                start_date: "2020-01".to_string(),
                end_date: "2023-06".to_string(),
                description: "- Increased revenue by 25% in Q2\n- Led 4 engineers".to_string(),
                current: false,
            }],
            education: vec![Education {
                id: "ed1".to_string(),
                institution: "State U".to_string(),
                degree: "BSc".to_string(),
                field: "CS".to_string(),
                graduation_date: "2019-05".to_string(),
                gpa: None,
            }],
            skills: vec![Skill {
                id: "s1".to_string(),
                name: "Rust".to_string(),
                ..Default::default()
            }],
            projects: vec![Project {
                id: "p1".to_string(),
                name: "ats".to_string(),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_complete_resume_scores_full() {
        let checker = FormattingChecker::new().unwrap();
        let check = checker.check(&complete_resume());
        assert_eq!(check.score, 100);
        assert!(check.issues.is_empty());
        assert_eq!(check.strengths.len(), 8);
    }

    #[test]
    fn test_empty_resume_floors_at_zero_or_above() {
        let checker = FormattingChecker::new().unwrap();
        let check = checker.check(&ResumeRecord::default());
        // 4 sections, contact, bullets, quantified
        assert_eq!(check.score, 100 - 60 - 20 - 5 - 10);
        assert_eq!(check.issues.len(), 7);
        assert!(check.has_critical_issues());
        assert_eq!(check.strengths, vec!["Dates are consistent"]);
    }

    #[test]
    fn test_every_rule_yields_one_finding() {
        let checker = FormattingChecker::new().unwrap();
        for resume in [complete_resume(), ResumeRecord::default()] {
            let check = checker.check(&resume);
            assert_eq!(check.issues.len() + check.strengths.len(), 8);
        }
    }

    #[test]
    fn test_adding_phone_never_lowers_score() {
        let checker = FormattingChecker::new().unwrap();
        let mut resume = complete_resume();
        resume.personal_info.phone.clear();
        let without = checker.check(&resume).score;

        resume.personal_info.phone = "555-0100".to_string();
        let with = checker.check(&resume).score;
        assert!(with >= without);
        assert_eq!(with - without, 20);
    }

    #[test]
    fn test_invalid_email_is_critical() {
        let checker = FormattingChecker::new().unwrap();
        let mut resume = complete_resume();
        resume.personal_info.email = "jane-at-example".to_string();
        let check = checker.check(&resume);
        let critical: Vec<_> = check.critical_issues().collect();
        assert_eq!(critical.len(), 1);
        assert!(critical[0].message.contains("not valid"));
    }

    #[test]
    fn test_quantified_description_not_flagged() {
        let checker = FormattingChecker::new().unwrap();
        let mut resume = complete_resume();
        resume.experience[0].description = "Increased revenue by 25% in Q2".to_string();
        let check = checker.check(&resume);
        assert!(!check.issues.iter().any(|i| i.message.contains("quantified")));
        assert!(check.issues.iter().any(|i| i.message.contains("bullet")));
    }

    #[test]
    fn test_numbered_bullets_count_as_structure() {
        let checker = FormattingChecker::new().unwrap();
        assert!(checker.is_structured("1. Shipped the billing service"));
        assert!(checker.is_structured("• Shipped"));
        assert!(!checker.is_structured("Shipped the billing service"));
    }

    #[test]
    fn test_dates_out_of_order() {
        let checker = FormattingChecker::new().unwrap();
        let mut resume = complete_resume();
        resume.experience[0].end_date = "2019-01".to_string();
        let check = checker.check(&resume);
        assert_eq!(check.score, 95);
        assert!(check.issues[0].message.contains("YYYY-MM"));
    }

    #[test]
    fn test_current_role_ignores_end_date() {
        let checker = FormattingChecker::new().unwrap();
        let mut resume = complete_resume();
        resume.experience[0].current = true;
        resume.experience[0].end_date = "Present".to_string();
        assert_eq!(checker.check(&resume).score, 100);
    }

    #[test]
    fn test_malformed_date() {
        assert!(parse_month("2021-13").is_err());
        assert!(parse_month("March 2021").is_err());
        assert_eq!(parse_month(" ").unwrap(), None);
        assert!(parse_month("2021-03").unwrap().is_some());
    }
}
