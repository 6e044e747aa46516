use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::models::{
    BatchReport, ChatReply, ChatRequest, JobDescriptionDraft, JobDescriptionRequest,
    JobMatchRequest, MatchAssessment, MatchView, ProfileMatchRequest, RankedCandidate,
    ResumeAnalysisView, ResumeInsights,
};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AnalyzeResumeRequest {
    pub resume_text: String,
}

/// POST /api/ai/analyze-resume/:candidate_id
pub async fn handle_analyze_candidate_resume(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Json(req): Json<AnalyzeResumeRequest>,
) -> Result<Json<ResumeAnalysisView>, AppError> {
    let outcome = state
        .engine
        .analyze_and_store_resume(candidate_id, &req.resume_text)
        .await?;
    Ok(Json(outcome.render()))
}

/// GET /api/ai/resume-analysis/:candidate_id
pub async fn handle_get_resume_analysis(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<ResumeAnalysisView>, AppError> {
    let view = state.engine.get_resume_analysis(candidate_id).await?;
    Ok(Json(view))
}

/// POST /api/ai/analyze-resume
/// Analyzes text without a candidate; nothing is stored.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeResumeRequest>,
) -> Result<Json<ResumeInsights>, AppError> {
    let outcome = state.engine.analyze_resume_text(&req.resume_text).await?;
    Ok(Json(outcome.render()))
}

/// POST /api/ai/match-score/:candidate_id/:job_id
pub async fn handle_compute_match_score(
    State(state): State<AppState>,
    Path((candidate_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchView>, AppError> {
    let outcome = state
        .engine
        .compute_match_score(candidate_id, job_id)
        .await?;
    Ok(Json(outcome.render()))
}

/// GET /api/ai/match-score/:candidate_id/:job_id
pub async fn handle_get_match_score(
    State(state): State<AppState>,
    Path((candidate_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchView>, AppError> {
    let outcome = state.engine.get_match_score(candidate_id, job_id).await?;
    Ok(Json(outcome.render()))
}

/// POST /api/ai/match-score
pub async fn handle_profile_match_score(
    State(state): State<AppState>,
    Json(req): Json<ProfileMatchRequest>,
) -> Json<MatchAssessment> {
    Json(state.engine.score_profile(&req).await.render())
}

/// POST /api/ai/analyze-job-match
pub async fn handle_analyze_job_match(
    State(state): State<AppState>,
    Json(req): Json<JobMatchRequest>,
) -> Result<Json<MatchAssessment>, AppError> {
    let outcome = state.engine.analyze_resume_against_job(&req).await?;
    Ok(Json(outcome.render()))
}

/// GET /api/ai/ranked-candidates/:job_id
pub async fn handle_ranked_candidates(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<RankedCandidate>>, AppError> {
    let ranked = state.engine.rank_candidates(job_id).await?;
    Ok(Json(ranked))
}

/// POST /api/ai/analyze-applicants/:job_id
pub async fn handle_analyze_applicants(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<BatchReport>, AppError> {
    let report = state.engine.analyze_all_applicants(job_id).await?;
    Ok(Json(report))
}

/// POST /api/ai/generate-job-description
pub async fn handle_generate_job_description(
    State(state): State<AppState>,
    Json(req): Json<JobDescriptionRequest>,
) -> Result<Json<JobDescriptionDraft>, AppError> {
    let outcome = state.engine.generate_job_description(&req).await?;
    Ok(Json(outcome.render()))
}

/// POST /api/ai/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let outcome = state.engine.chat(&req).await?;
    Ok(Json(outcome.render()))
}
