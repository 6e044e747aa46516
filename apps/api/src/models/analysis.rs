//! Persisted analysis records. List-valued fields are stored comma-joined;
//! see `analysis::parser::{join_comma, parse_comma_list}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One per candidate (unique on `candidate_id`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeAnalysisRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub resume_text: String,
    pub extracted_skills: String,
    pub experience_summary: String,
    pub education_summary: String,
    pub suggested_job_titles: String,
    pub overall_summary: String,
    pub analyzed_at: DateTime<Utc>,
}

/// One per (candidate, job) pair. `match_score` is always within 0..=100.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRecordRow {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub job_id: Uuid,
    pub match_score: i32,
    pub matching_skills: String,
    pub missing_skills: String,
    pub strengths_summary: String,
    pub recommendation: String,
    pub analyzed_at: DateTime<Utc>,
}
