//! Persistence seams for the analysis subsystem.
//!
//! The engine owns every find-or-create branch: it looks a record up by its
//! natural key, fills a new or existing row, then calls `save_*`, which is an
//! upsert on that key. Nothing here caches rows between calls.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{MatchRecordRow, ResumeAnalysisRow};
use crate::models::profile::{ApplicationRow, CandidateRow, JobRow};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

/// Read access to candidates, jobs and applications, plus the one write the
/// analysis subsystem performs on a candidate (profile backfill).
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find_candidate(&self, candidate_id: Uuid) -> Result<Option<CandidateRow>, AppError>;

    /// Persists `skills`, `experience` and `education` of the given candidate.
    async fn save_candidate_profile(&self, candidate: &CandidateRow) -> Result<(), AppError>;

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError>;

    /// All applications for a job in application order.
    async fn find_applications_by_job(&self, job_id: Uuid) -> Result<Vec<ApplicationRow>, AppError>;
}

/// Keyed storage for resume analyses (by candidate) and match records
/// (by candidate + job).
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn find_resume_analysis(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<ResumeAnalysisRow>, AppError>;

    /// Upsert keyed on `candidate_id`.
    async fn save_resume_analysis(
        &self,
        row: &ResumeAnalysisRow,
    ) -> Result<ResumeAnalysisRow, AppError>;

    async fn find_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<MatchRecordRow>, AppError>;

    /// Upsert keyed on `(candidate_id, job_id)`.
    async fn save_match(&self, row: &MatchRecordRow) -> Result<MatchRecordRow, AppError>;
}
