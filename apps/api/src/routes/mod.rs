pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resume analysis
        .route(
            "/api/ai/analyze-resume/:candidate_id",
            post(handlers::handle_analyze_candidate_resume),
        )
        .route(
            "/api/ai/resume-analysis/:candidate_id",
            get(handlers::handle_get_resume_analysis),
        )
        .route("/api/ai/analyze-resume", post(handlers::handle_analyze_resume))
        // Match scoring
        .route(
            "/api/ai/match-score/:candidate_id/:job_id",
            post(handlers::handle_compute_match_score).get(handlers::handle_get_match_score),
        )
        .route("/api/ai/match-score", post(handlers::handle_profile_match_score))
        .route(
            "/api/ai/analyze-job-match",
            post(handlers::handle_analyze_job_match),
        )
        // Ranking and batch analysis
        .route(
            "/api/ai/ranked-candidates/:job_id",
            get(handlers::handle_ranked_candidates),
        )
        .route(
            "/api/ai/analyze-applicants/:job_id",
            post(handlers::handle_analyze_applicants),
        )
        // Generation and chat
        .route(
            "/api/ai/generate-job-description",
            post(handlers::handle_generate_job_description),
        )
        .route("/api/ai/chat", post(handlers::handle_chat))
        .with_state(state)
}
