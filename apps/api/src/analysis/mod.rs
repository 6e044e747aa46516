// AI-assisted resume analysis and candidate/job matching.
// Prompt building, reply parsing, scoring, ranking and persistence mapping.
// All model calls go through llm_client::ModelClient; all storage through store.

pub mod engine;
pub mod handlers;
pub mod models;
pub mod outcome;
pub mod parser;
pub mod prompts;
pub mod ranking;

pub use engine::AnalysisEngine;
