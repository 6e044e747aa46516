//! Request and response shapes for the analysis subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::outcome::{DegradeReason, Fallback};
use crate::analysis::parser::parse_comma_list;
use crate::llm_client::ChatMessage;
use crate::models::analysis::{MatchRecordRow, ResumeAnalysisRow};
use crate::models::profile::{CandidateRow, JobRow};

// ────────────────────────────────────────────────────────────────────────────
// Resume analysis
// ────────────────────────────────────────────────────────────────────────────

/// Fields recovered from a resume-analysis reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeInsights {
    pub skills: Vec<String>,
    pub experience_summary: String,
    pub education_summary: String,
    pub suggested_job_titles: Vec<String>,
    pub overall_summary: String,
}

impl Fallback for ResumeInsights {
    fn degraded(reason: &DegradeReason) -> Self {
        ResumeInsights {
            skills: vec![],
            experience_summary: "Analysis failed".to_string(),
            education_summary: "Analysis failed".to_string(),
            suggested_job_titles: vec![],
            overall_summary: reason.to_string(),
        }
    }
}

/// Stored resume analysis as returned to callers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResumeAnalysisView {
    pub id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub resume_text: String,
    pub extracted_skills: Vec<String>,
    pub experience_summary: String,
    pub education_summary: String,
    pub suggested_job_titles: Vec<String>,
    pub overall_summary: String,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl From<ResumeAnalysisRow> for ResumeAnalysisView {
    fn from(row: ResumeAnalysisRow) -> Self {
        ResumeAnalysisView {
            id: Some(row.id),
            candidate_id: Some(row.candidate_id),
            extracted_skills: parse_comma_list(&row.extracted_skills),
            suggested_job_titles: parse_comma_list(&row.suggested_job_titles),
            resume_text: row.resume_text,
            experience_summary: row.experience_summary,
            education_summary: row.education_summary,
            overall_summary: row.overall_summary,
            analyzed_at: Some(row.analyzed_at),
        }
    }
}

impl Fallback for ResumeAnalysisView {
    fn degraded(reason: &DegradeReason) -> Self {
        let insights = ResumeInsights::degraded(reason);
        ResumeAnalysisView {
            experience_summary: insights.experience_summary,
            education_summary: insights.education_summary,
            overall_summary: insights.overall_summary,
            ..Default::default()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Match scoring
// ────────────────────────────────────────────────────────────────────────────

/// Stored (candidate, job) match as returned to callers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchView {
    pub id: Option<Uuid>,
    pub candidate_id: Option<Uuid>,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub job_id: Option<Uuid>,
    pub job_title: Option<String>,
    pub match_score: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths_summary: String,
    pub recommendation: String,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl MatchView {
    pub fn from_record(row: MatchRecordRow, candidate: &CandidateRow, job: &JobRow) -> Self {
        MatchView {
            id: Some(row.id),
            candidate_id: Some(row.candidate_id),
            candidate_name: Some(candidate.full_name.clone()),
            candidate_email: Some(candidate.email.clone()),
            job_id: Some(row.job_id),
            job_title: Some(job.title.clone()),
            match_score: row.match_score,
            matching_skills: parse_comma_list(&row.matching_skills),
            missing_skills: parse_comma_list(&row.missing_skills),
            strengths_summary: row.strengths_summary,
            recommendation: row.recommendation,
            analyzed_at: Some(row.analyzed_at),
        }
    }
}

impl Fallback for MatchView {
    fn degraded(reason: &DegradeReason) -> Self {
        MatchView {
            match_score: 0,
            recommendation: reason.to_string(),
            ..Default::default()
        }
    }
}

/// Sections recovered from a stored-job match reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMatchParts {
    pub match_score: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths_summary: String,
    pub recommendation: String,
}

/// Unstored match result against caller-supplied job text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchAssessment {
    pub match_score: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: String,
}

impl Fallback for MatchAssessment {
    fn degraded(reason: &DegradeReason) -> Self {
        MatchAssessment {
            match_score: 0,
            recommendations: reason.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobMatchRequest {
    pub resume_text: String,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub job_requirements: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileMatchRequest {
    pub candidate_skills: Option<String>,
    pub candidate_experience: Option<String>,
    pub job_description: Option<String>,
    pub job_requirements: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Job description generation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct JobDescriptionRequest {
    pub job_title: String,
    pub company_name: String,
    pub key_skills: Option<String>,
    pub experience_level: Option<String>,
    pub job_type: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobDescriptionDraft {
    pub description: String,
    pub requirements: String,
}

impl Fallback for JobDescriptionDraft {
    fn degraded(reason: &DegradeReason) -> Self {
        JobDescriptionDraft {
            description: format!("Failed: {}", reason.cause()),
            requirements: String::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Chat
// ────────────────────────────────────────────────────────────────────────────

pub const CHAT_NOT_CONFIGURED: &str =
    "AI Chat is not configured. Please set up your Groq API key at https://console.groq.com";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub response: String,
}

impl Fallback for ChatReply {
    fn degraded(reason: &DegradeReason) -> Self {
        let response = match reason {
            DegradeReason::NotConfigured => CHAT_NOT_CONFIGURED.to_string(),
            DegradeReason::ModelCall(msg) => {
                format!("Sorry, I'm having trouble responding: {msg}")
            }
        };
        ChatReply { response }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ranking and batch analysis
// ────────────────────────────────────────────────────────────────────────────

/// Per-application projection used only to order a job's applicants.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub candidate_phone: Option<String>,
    pub candidate_location: Option<String>,
    pub cover_letter: Option<String>,
    pub application_status: String,
    pub applied_at: DateTime<Utc>,
    pub match_score: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub application_id: Uuid,
    pub candidate_id: Uuid,
    /// `None` when the applicant could not be scored at all (e.g. missing candidate).
    pub match_score: Option<i32>,
    pub degraded: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub job_id: Uuid,
    pub total: usize,
    pub analyzed: usize,
    pub degraded: usize,
    pub failed: usize,
    pub results: Vec<BatchEntry>,
}
