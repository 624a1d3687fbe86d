//! Hard-skill and certification detection against a fixed vocabulary

use crate::error::Result;
use crate::processing::document::ResumeRecord;
use crate::processing::text_processor::{is_whole_word, whole_word_matches};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bumped whenever a term is added, removed or its pattern changes
pub const VOCABULARY_VERSION: u32 = 3;

/// Default number of characters inspected either side of a skill mention
pub const DEFAULT_CRITICAL_WINDOW: usize = 40;

/// (display name, case-insensitive pattern)
const TECHNICAL_SKILLS: &[(&str, &str)] = &[
    // Languages
    ("JavaScript", r"javascript|ecmascript"),
    ("TypeScript", r"typescript"),
    ("Python", r"python"),
    ("Java", r"java"),
    ("C++", r"c\+\+"),
    ("C#", r"c#"),
    ("Go", r"golang"),
    ("Rust", r"rust"),
    ("Ruby", r"ruby"),
    ("PHP", r"php"),
    ("Swift", r"swift"),
    ("Kotlin", r"kotlin"),
    ("Scala", r"scala"),
    ("SQL", r"sql"),
    ("HTML", r"html5?"),
    ("CSS", r"css3?"),
    // Frameworks and libraries
    ("React", r"react(?:\.?js)?"),
    ("Angular", r"angular(?:js)?"),
    ("Vue.js", r"vue(?:\.?js)?"),
    ("Next.js", r"next\.?js"),
    ("Node.js", r"node(?:\.?js)?"),
    ("Express", r"express(?:\.?js)?"),
    ("Django", r"django"),
    ("Flask", r"flask"),
    ("Spring", r"spring(?: boot)?"),
    ("Rails", r"(?:ruby on )?rails"),
    (".NET", r"\.net|dotnet"),
    ("GraphQL", r"graphql"),
    ("REST", r"rest(?:ful)?(?: apis?)?"),
    ("TensorFlow", r"tensorflow"),
    ("PyTorch", r"pytorch"),
    ("Pandas", r"pandas"),
    // Databases
    ("PostgreSQL", r"postgres(?:ql)?"),
    ("MySQL", r"mysql"),
    ("MongoDB", r"mongo(?:db)?"),
    ("Redis", r"redis"),
    ("Elasticsearch", r"elastic ?search"),
    ("DynamoDB", r"dynamodb"),
    ("Cassandra", r"cassandra"),
    // Cloud platforms
    ("AWS", r"aws|amazon web services"),
    ("Azure", r"azure"),
    ("GCP", r"gcp|google cloud(?: platform)?"),
    // Tooling
    ("Docker", r"docker"),
    ("Kubernetes", r"kubernetes|k8s"),
    ("Terraform", r"terraform"),
    ("Ansible", r"ansible"),
    ("Jenkins", r"jenkins"),
    ("Git", r"git"),
    ("Linux", r"linux"),
    ("Kafka", r"kafka"),
    ("Spark", r"spark"),
    ("Airflow", r"airflow"),
    ("Webpack", r"webpack"),
    ("Jest", r"jest"),
    ("Cypress", r"cypress"),
    ("Selenium", r"selenium"),
];

const CERTIFICATIONS: &[(&str, &str)] = &[
    ("AWS Certified", r"aws certified(?: [a-z]+){0,3}"),
    ("Azure Certification", r"azure (?:fundamentals|administrator|developer|solutions architect)|az-\d{3}"),
    ("Google Cloud Certified", r"google cloud certified|gcp certified"),
    ("CKA", r"cka|certified kubernetes administrator"),
    ("CKAD", r"ckad|certified kubernetes application developer"),
    ("PMP", r"pmp|project management professional"),
    ("Scrum Master", r"(?:certified )?scrum master|csm|psm"),
    ("CISSP", r"cissp"),
    ("CompTIA Security+", r"security\+"),
    ("CCNA", r"ccna"),
    ("ITIL", r"itil"),
    ("Six Sigma", r"six sigma"),
    ("CPA", r"cpa"),
];

/// Phrases that mark a nearby requirement as mandatory
const CRITICALITY_MARKERS: &[&str] = &[
    "required",
    "requirement",
    "requirements",
    "must have",
    "must-have",
    "essential",
    "mandatory",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardSkillsAnalysis {
    pub required_skills: Vec<String>,
    pub found_skills: Vec<String>,
    pub missing_critical_skills: Vec<String>,
    pub certifications: CertificationAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificationAnalysis {
    pub required: Vec<String>,
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

struct VocabularyTerm {
    name: &'static str,
    pattern: Regex,
}

/// How a term shows up in one piece of text
struct TermOccurrence<'a> {
    term: &'a VocabularyTerm,
    spans: Vec<(usize, usize)>,
}

/// Matches the fixed skill and certification vocabulary
pub struct SkillMatcher {
    skills: Vec<VocabularyTerm>,
    certifications: Vec<VocabularyTerm>,
    critical_window: usize,
}

impl SkillMatcher {
    pub fn new() -> Result<Self> {
        Self::with_window(DEFAULT_CRITICAL_WINDOW)
    }

    pub fn with_window(critical_window: usize) -> Result<Self> {
        Ok(Self {
            skills: compile_terms(TECHNICAL_SKILLS)?,
            certifications: compile_terms(CERTIFICATIONS)?,
            critical_window,
        })
    }

    /// Compare the vocabulary terms required by the job with the resume
    pub fn analyze(&self, job_text: &str, resume: &ResumeRecord, corpus: &str) -> HardSkillsAnalysis {
        let skill_hits = occurrences(&self.skills, job_text);
        let cert_hits = occurrences(&self.certifications, job_text);

        let mut analysis = HardSkillsAnalysis::default();

        for hit in &skill_hits {
            let name = hit.term.name.to_string();
            if self.is_found(hit.term, resume, corpus) {
                analysis.found_skills.push(name.clone());
            } else if hit
                .spans
                .iter()
                .any(|&(start, end)| self.is_critical(job_text, start, end))
            {
                analysis.missing_critical_skills.push(name.clone());
            }
            analysis.required_skills.push(name);
        }

        for hit in &cert_hits {
            let name = hit.term.name.to_string();
            if self.is_found(hit.term, resume, corpus) {
                analysis.certifications.found.push(name.clone());
            } else {
                analysis.certifications.missing.push(name.clone());
            }
            analysis.certifications.required.push(name);
        }

        log::debug!(
            "Skill vocabulary v{}: {} required, {} found, {} critical missing",
            VOCABULARY_VERSION,
            analysis.required_skills.len(),
            analysis.found_skills.len(),
            analysis.missing_critical_skills.len()
        );

        analysis
    }

    /// Whether any vocabulary skill or certification occurs in a keyword
    pub fn is_technical_term(&self, text: &str) -> bool {
        self.skills
            .iter()
            .chain(&self.certifications)
            .any(|term| !whole_word_matches(&term.pattern, text).is_empty())
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    fn is_found(&self, term: &VocabularyTerm, resume: &ResumeRecord, corpus: &str) -> bool {
        !whole_word_matches(&term.pattern, corpus).is_empty()
            || resume.skill_names().any(|name| term.pattern.is_match(name))
    }

    /// A mention is critical when a marker sits in its own clause within the
    /// window, or when the nearest heading before it in the same sentence is
    /// a marker heading such as "Required skills:"
    fn is_critical(&self, text: &str, start: usize, end: usize) -> bool {
        let context = clause_context(text, start, end, self.critical_window).to_lowercase();
        if contains_marker(&context) {
            return true;
        }

        heading_before(text, start)
            .is_some_and(|heading| contains_marker(&heading.to_lowercase()))
    }
}

fn compile_terms(terms: &[(&'static str, &str)]) -> Result<Vec<VocabularyTerm>> {
    terms
        .iter()
        .map(|&(name, pattern)| {
            Ok(VocabularyTerm {
                name,
                pattern: Regex::new(&format!("(?i)(?:{})", pattern))?,
            })
        })
        .collect()
}

fn occurrences<'a>(terms: &'a [VocabularyTerm], text: &str) -> Vec<TermOccurrence<'a>> {
    terms
        .iter()
        .filter_map(|term| {
            let spans = whole_word_matches(&term.pattern, text);
            (!spans.is_empty()).then_some(TermOccurrence { term, spans })
        })
        .collect()
}

/// Whole-word marker that is not negated ("not required", "non-essential").
/// Expects lower-case text.
fn contains_marker(text: &str) -> bool {
    CRITICALITY_MARKERS.iter().any(|marker| {
        text.match_indices(marker).any(|(idx, found)| {
            is_whole_word(text, idx, idx + found.len()) && !is_negated(&text[..idx])
        })
    })
}

fn is_negated(before: &str) -> bool {
    let previous = before
        .trim_end()
        .trim_end_matches('-')
        .rsplit(|c: char| !c.is_alphanumeric())
        .next();
    matches!(previous, Some("not" | "no" | "non"))
}

/// Label of the closest `label:` heading preceding `start` within the same
/// line and sentence
fn heading_before(text: &str, start: usize) -> Option<&str> {
    let line_start = text[..start].rfind('\n').map_or(0, |idx| idx + 1);
    let sentence_start = text[line_start..start]
        .char_indices()
        .rev()
        .find(|&(idx, c)| {
            matches!(c, '.' | '!' | '?') && is_clause_break(text, line_start + idx, c)
        })
        .map_or(line_start, |(idx, c)| line_start + idx + c.len_utf8());

    let lead = &text[sentence_start..start];
    let label = &lead[..lead.rfind(':')?];
    let label_start = label.rfind([':', ';', ',']).map_or(0, |idx| idx + 1);
    Some(&label[label_start..])
}

fn is_clause_break(text: &str, idx: usize, c: char) -> bool {
    match c {
        ',' | ';' | '\n' | '\r' | '•' => true,
        '.' | '!' | '?' => text[idx + c.len_utf8()..]
            .chars()
            .next()
            .map_or(true, char::is_whitespace),
        _ => false,
    }
}

/// Text around `[start, end)`, at most `window` characters either side, cut
/// at the nearest clause delimiter
fn clause_context(text: &str, start: usize, end: usize, window: usize) -> &str {
    let left = text[..start]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(start, |(idx, _)| idx);
    let right = text[end..]
        .char_indices()
        .nth(window)
        .map_or(text.len(), |(idx, _)| end + idx);

    let before = &text[left..start];
    let clause_start = before
        .char_indices()
        .rev()
        .find(|&(idx, c)| is_clause_break(text, left + idx, c))
        .map_or(left, |(idx, c)| left + idx + c.len_utf8());

    let after = &text[end..right];
    let clause_end = after
        .char_indices()
        .find(|&(idx, c)| is_clause_break(text, end + idx, c))
        .map_or(right, |(idx, _)| end + idx);

    &text[clause_start..clause_end]
}
