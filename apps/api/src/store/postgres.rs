use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{MatchRecordRow, ResumeAnalysisRow};
use crate::models::profile::{ApplicationRow, CandidateRow, JobRow};
use crate::store::{AnalysisStore, ProfileStore};

/// PostgreSQL-backed implementation of both store traits.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn find_candidate(&self, candidate_id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, full_name, email, phone, location, skills, experience, education
            FROM candidates
            WHERE id = $1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_candidate_profile(&self, candidate: &CandidateRow) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE candidates SET skills = $2, experience = $3, education = $4, updated_at = NOW() WHERE id = $1",
        )
        .bind(candidate.id)
        .bind(&candidate.skills)
        .bind(&candidate.experience)
        .bind(&candidate.education)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            "SELECT id, title, description, requirements FROM jobs WHERE id = $1",
        )
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_applications_by_job(&self, job_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT id, job_id, candidate_id, cover_letter, status, ai_match_score, applied_at
            FROM applications
            WHERE job_id = $1
            ORDER BY applied_at, id
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn find_resume_analysis(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<ResumeAnalysisRow>, AppError> {
        let row = sqlx::query_as::<_, ResumeAnalysisRow>(
            "SELECT * FROM resume_analyses WHERE candidate_id = $1",
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_resume_analysis(
        &self,
        row: &ResumeAnalysisRow,
    ) -> Result<ResumeAnalysisRow, AppError> {
        let saved = sqlx::query_as::<_, ResumeAnalysisRow>(
            r#"
            INSERT INTO resume_analyses
                (id, candidate_id, resume_text, extracted_skills, experience_summary,
                 education_summary, suggested_job_titles, overall_summary, analyzed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (candidate_id) DO UPDATE SET
                resume_text = EXCLUDED.resume_text,
                extracted_skills = EXCLUDED.extracted_skills,
                experience_summary = EXCLUDED.experience_summary,
                education_summary = EXCLUDED.education_summary,
                suggested_job_titles = EXCLUDED.suggested_job_titles,
                overall_summary = EXCLUDED.overall_summary,
                analyzed_at = EXCLUDED.analyzed_at
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(row.candidate_id)
        .bind(&row.resume_text)
        .bind(&row.extracted_skills)
        .bind(&row.experience_summary)
        .bind(&row.education_summary)
        .bind(&row.suggested_job_titles)
        .bind(&row.overall_summary)
        .bind(row.analyzed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }

    async fn find_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<MatchRecordRow>, AppError> {
        let row = sqlx::query_as::<_, MatchRecordRow>(
            "SELECT * FROM ai_job_matches WHERE candidate_id = $1 AND job_id = $2",
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_match(&self, row: &MatchRecordRow) -> Result<MatchRecordRow, AppError> {
        let saved = sqlx::query_as::<_, MatchRecordRow>(
            r#"
            INSERT INTO ai_job_matches
                (id, candidate_id, job_id, match_score, matching_skills, missing_skills,
                 strengths_summary, recommendation, analyzed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (candidate_id, job_id) DO UPDATE SET
                match_score = EXCLUDED.match_score,
                matching_skills = EXCLUDED.matching_skills,
                missing_skills = EXCLUDED.missing_skills,
                strengths_summary = EXCLUDED.strengths_summary,
                recommendation = EXCLUDED.recommendation,
                analyzed_at = EXCLUDED.analyzed_at
            RETURNING *
            "#,
        )
        .bind(row.id)
        .bind(row.candidate_id)
        .bind(row.job_id)
        .bind(row.match_score)
        .bind(&row.matching_skills)
        .bind(&row.missing_skills)
        .bind(&row.strengths_summary)
        .bind(&row.recommendation)
        .bind(row.analyzed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(saved)
    }
}
