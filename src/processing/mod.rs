//! Heuristic resume analysis

pub mod analyzer;
pub mod ats_matcher;
pub mod content;
pub mod document;
pub mod formatting;
pub mod keyword_extractor;
pub mod normalizer;
pub mod scoring;
pub mod skill_matcher;
pub mod text_processor;
