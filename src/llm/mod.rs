//! Hosted text-generation integration

pub mod analyzer;
pub mod client;
pub mod optimizer;
pub mod prompts;
