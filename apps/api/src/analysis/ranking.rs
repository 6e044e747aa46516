//! Applicant ranking for a job.
//!
//! Each applicant gets a score from one of three places, in order:
//! 1. the score captured when they applied, when positive;
//! 2. an ad-hoc match of a resume assembled from their profile;
//! 3. zero, with the reason no analysis ran.
//!
//! The result is a stable descending sort: equal scores keep application order.

use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::engine::{non_blank, AnalysisEngine};
use crate::analysis::models::{MatchAssessment, RankedCandidate};
use crate::analysis::outcome::NOT_CONFIGURED_MESSAGE;
use crate::errors::AppError;
use crate::models::profile::{ApplicationRow, CandidateRow};

pub const APPLICATION_SCORE_NOTE: &str = "Score calculated during application";
pub const NO_RESUME_NOTE: &str = "No resume uploaded.";

impl AnalysisEngine {
    pub async fn rank_candidates(&self, job_id: Uuid) -> Result<Vec<RankedCandidate>, AppError> {
        let job = self.require_job(job_id).await?;
        let applications = self.profiles.find_applications_by_job(job_id).await?;
        info!("Ranking {} applicants for job {job_id}", applications.len());

        let mut ranked = Vec::with_capacity(applications.len());
        for application in applications {
            let Some(candidate) = self.profiles.find_candidate(application.candidate_id).await?
            else {
                warn!(
                    "Skipping application {}: candidate {} not found",
                    application.id, application.candidate_id
                );
                continue;
            };

            let assessment = match application.ai_match_score.filter(|score| *score > 0) {
                Some(score) => MatchAssessment {
                    match_score: score.clamp(0, 100),
                    recommendations: APPLICATION_SCORE_NOTE.to_string(),
                    ..Default::default()
                },
                None => {
                    let resume = synthetic_resume(&candidate, &application);
                    if !self.is_enabled() {
                        note(NOT_CONFIGURED_MESSAGE)
                    } else if resume.is_empty() {
                        note(NO_RESUME_NOTE)
                    } else {
                        self.assess_resume(
                            &resume,
                            Some(&job.title),
                            Some(&job.description),
                            job.requirements.as_deref(),
                        )
                        .await
                        .render()
                    }
                }
            };

            ranked.push(project(candidate, application, assessment));
        }

        sort_by_score(&mut ranked);
        Ok(ranked)
    }
}

fn note(reason: &str) -> MatchAssessment {
    MatchAssessment {
        match_score: 0,
        recommendations: reason.to_string(),
        ..Default::default()
    }
}

/// Resume text assembled from profile fields and the cover letter. Empty
/// when the candidate has nothing on file.
pub fn synthetic_resume(candidate: &CandidateRow, application: &ApplicationRow) -> String {
    let mut parts: Vec<String> = [
        candidate.skills.as_deref(),
        candidate.experience.as_deref(),
        candidate.education.as_deref(),
    ]
    .into_iter()
    .filter_map(non_blank)
    .map(|s| s.trim().to_string())
    .collect();

    if let Some(letter) = non_blank(application.cover_letter.as_deref()) {
        parts.push(format!("Cover Letter: {}", letter.trim()));
    }
    parts.join("\n")
}

fn project(
    candidate: CandidateRow,
    application: ApplicationRow,
    assessment: MatchAssessment,
) -> RankedCandidate {
    RankedCandidate {
        application_id: application.id,
        candidate_id: candidate.id,
        candidate_name: candidate.full_name,
        candidate_email: candidate.email,
        candidate_phone: candidate.phone,
        candidate_location: candidate.location,
        cover_letter: application.cover_letter,
        application_status: application.status,
        applied_at: application.applied_at,
        match_score: assessment.match_score,
        matching_skills: assessment.matching_skills,
        missing_skills: assessment.missing_skills,
        recommendation: assessment.recommendations,
    }
}

/// Descending by score. `sort_by` is stable, so ties keep their input order.
pub fn sort_by_score(ranked: &mut [RankedCandidate]) {
    ranked.sort_by(|a, b| b.match_score.cmp(&a.match_score));
}
