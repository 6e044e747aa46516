//! In-memory store used by unit and router tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::{MatchRecordRow, ResumeAnalysisRow};
use crate::models::profile::{ApplicationRow, CandidateRow, JobRow};
use crate::store::{AnalysisStore, ProfileStore};

#[derive(Default)]
pub struct MemoryStore {
    candidates: Mutex<HashMap<Uuid, CandidateRow>>,
    jobs: Mutex<HashMap<Uuid, JobRow>>,
    applications: Mutex<Vec<ApplicationRow>>,
    resume_analyses: Mutex<HashMap<Uuid, ResumeAnalysisRow>>,
    matches: Mutex<HashMap<(Uuid, Uuid), MatchRecordRow>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_candidate(&self, candidate: CandidateRow) {
        self.candidates
            .lock()
            .unwrap()
            .insert(candidate.id, candidate);
    }

    pub fn insert_job(&self, job: JobRow) {
        self.jobs.lock().unwrap().insert(job.id, job);
    }

    pub fn insert_application(&self, application: ApplicationRow) {
        self.applications.lock().unwrap().push(application);
    }

    pub fn insert_resume_analysis(&self, row: ResumeAnalysisRow) {
        self.resume_analyses
            .lock()
            .unwrap()
            .insert(row.candidate_id, row);
    }

    pub fn candidate(&self, candidate_id: Uuid) -> Option<CandidateRow> {
        self.candidates.lock().unwrap().get(&candidate_id).cloned()
    }

    pub fn resume_analysis_count(&self) -> usize {
        self.resume_analyses.lock().unwrap().len()
    }

    pub fn match_count(&self) -> usize {
        self.matches.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn find_candidate(&self, candidate_id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        Ok(self.candidate(candidate_id))
    }

    async fn save_candidate_profile(&self, candidate: &CandidateRow) -> Result<(), AppError> {
        if let Some(existing) = self.candidates.lock().unwrap().get_mut(&candidate.id) {
            existing.skills = candidate.skills.clone();
            existing.experience = candidate.experience.clone();
            existing.education = candidate.education.clone();
        }
        Ok(())
    }

    async fn find_job(&self, job_id: Uuid) -> Result<Option<JobRow>, AppError> {
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn find_applications_by_job(&self, job_id: Uuid) -> Result<Vec<ApplicationRow>, AppError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn find_resume_analysis(
        &self,
        candidate_id: Uuid,
    ) -> Result<Option<ResumeAnalysisRow>, AppError> {
        Ok(self
            .resume_analyses
            .lock()
            .unwrap()
            .get(&candidate_id)
            .cloned())
    }

    async fn save_resume_analysis(
        &self,
        row: &ResumeAnalysisRow,
    ) -> Result<ResumeAnalysisRow, AppError> {
        self.insert_resume_analysis(row.clone());
        Ok(row.clone())
    }

    async fn find_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<MatchRecordRow>, AppError> {
        Ok(self
            .matches
            .lock()
            .unwrap()
            .get(&(candidate_id, job_id))
            .cloned())
    }

    async fn save_match(&self, row: &MatchRecordRow) -> Result<MatchRecordRow, AppError> {
        self.matches
            .lock()
            .unwrap()
            .insert((row.candidate_id, row.job_id), row.clone());
        Ok(row.clone())
    }
}
