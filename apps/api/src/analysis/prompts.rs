// All LLM prompt constants for the analysis module.
// Section labels in the templates must match the markers in `parser.rs`.

use crate::analysis::models::{JobDescriptionRequest, ProfileMatchRequest};
use crate::llm_client::prompts::{
    or_not_specified, truncate_chars, EXACT_FORMAT_INSTRUCTION, NOT_SPECIFIED,
};

/// Max characters of resume (or candidate experience) text sent for matching.
pub const RESUME_CHAR_LIMIT: usize = 3000;
/// Max characters each of job description and requirements sent for matching.
pub const JOB_TEXT_CHAR_LIMIT: usize = 1000;

/// A rendered (system, user) instruction pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: &'static str,
    pub user: String,
}

pub const RESUME_ANALYSIS_SYSTEM: &str = "You are an expert resume analyst.";

const RESUME_ANALYSIS_TEMPLATE: &str = r#"Analyze this resume and extract key information:

RESUME:
{resume_text}

{format_instruction}
SKILLS:
[one skill per line]
EXPERIENCE_SUMMARY:
[3-4 sentence summary]
EDUCATION_SUMMARY:
[education background]
SUGGESTED_JOB_TITLES:
[5-7 job titles, one per line]
OVERALL_SUMMARY:
[3-4 sentence assessment]"#;

pub const RECRUITER_SYSTEM: &str = "You are an expert recruiter.";

const STORED_MATCH_TEMPLATE: &str = r#"Analyze match between candidate and job:

CANDIDATE SKILLS: {candidate_skills}
CANDIDATE EXPERIENCE: {candidate_experience}
JOB TITLE: {job_title}
JOB DESCRIPTION: {job_description}
JOB REQUIREMENTS: {job_requirements}

{format_instruction}
MATCH_SCORE: [0-100]
MATCHING_SKILLS:
[one per line]
MISSING_SKILLS:
[one per line]
STRENGTHS_SUMMARY:
[2-3 sentences]
RECOMMENDATION:
[2-3 sentences]"#;

const PROFILE_MATCH_TEMPLATE: &str = r#"Analyze match between candidate and job:

CANDIDATE SKILLS: {candidate_skills}
CANDIDATE EXPERIENCE: {candidate_experience}
JOB DESCRIPTION: {job_description}
JOB REQUIREMENTS: {job_requirements}

{format_instruction}
MATCH_SCORE: [0-100]
MATCHING_SKILLS:
[one per line]
MISSING_SKILLS:
[one per line]
RECOMMENDATIONS:
[2-3 sentences]"#;

pub const RESUME_MATCH_SYSTEM: &str =
    "You are an expert HR recruiter. Analyze resumes and provide match analysis.";

const RESUME_MATCH_TEMPLATE: &str = r#"Analyze this resume against the job and provide analysis.

RESUME:
{resume_text}

JOB: {job_title}
DESCRIPTION: {job_description}
REQUIREMENTS: {job_requirements}

{format_instruction}
MATCH_SCORE: [0-100]
MATCHING_SKILLS:
- skill1
- skill2
MISSING_SKILLS:
- skill1
- skill2
RECOMMENDATIONS:
Your recommendations here."#;

pub const JOB_DESCRIPTION_SYSTEM: &str = "You are an HR professional who writes job descriptions.";

const JOB_DESCRIPTION_TEMPLATE: &str = r#"Generate job description for:
Title: {job_title}, Company: {company_name}, Skills: {key_skills}, Level: {experience_level}, Type: {job_type}
Additional information: {additional_info}

{format_instruction}
DESCRIPTION:
[2-3 paragraphs]
REQUIREMENTS:
- requirement1
- requirement2"#;

pub const CHAT_ASSISTANT_SYSTEM: &str = "\
You are a helpful AI career assistant for a job portal. You help users with:
- Finding suitable jobs and understanding job requirements
- Resume writing tips and optimization
- Interview preparation and common questions
- Career advice and professional development
Be friendly, professional, and provide actionable advice.";

// ────────────────────────────────────────────────────────────────────────────
// Builders
// ────────────────────────────────────────────────────────────────────────────

pub fn resume_analysis(resume_text: &str) -> Prompt {
    Prompt {
        system: RESUME_ANALYSIS_SYSTEM,
        user: render(
            RESUME_ANALYSIS_TEMPLATE,
            &[
                ("resume_text", resume_text),
                ("format_instruction", EXACT_FORMAT_INSTRUCTION),
            ],
        ),
    }
}

/// Match prompt against a stored job. Candidate text is capped at
/// `RESUME_CHAR_LIMIT`, job text at `JOB_TEXT_CHAR_LIMIT` per field.
pub fn stored_match(
    candidate_skills: &str,
    candidate_experience: &str,
    job_title: &str,
    job_description: &str,
    job_requirements: Option<&str>,
) -> Prompt {
    Prompt {
        system: RECRUITER_SYSTEM,
        user: render(
            STORED_MATCH_TEMPLATE,
            &[
                ("candidate_skills", truncate_chars(candidate_skills, RESUME_CHAR_LIMIT)),
                (
                    "candidate_experience",
                    truncate_chars(candidate_experience, RESUME_CHAR_LIMIT),
                ),
                ("job_title", or_not_specified(Some(job_title))),
                ("job_description", job_text(Some(job_description))),
                ("job_requirements", job_text(job_requirements)),
                ("format_instruction", EXACT_FORMAT_INSTRUCTION),
            ],
        ),
    }
}

/// Plain match of caller-supplied profile fields against job text.
pub fn profile_match(request: &ProfileMatchRequest) -> Prompt {
    Prompt {
        system: RECRUITER_SYSTEM,
        user: render(
            PROFILE_MATCH_TEMPLATE,
            &[
                (
                    "candidate_skills",
                    truncate_chars(
                        or_not_specified(request.candidate_skills.as_deref()),
                        RESUME_CHAR_LIMIT,
                    ),
                ),
                (
                    "candidate_experience",
                    truncate_chars(
                        or_not_specified(request.candidate_experience.as_deref()),
                        RESUME_CHAR_LIMIT,
                    ),
                ),
                ("job_description", job_text(request.job_description.as_deref())),
                ("job_requirements", job_text(request.job_requirements.as_deref())),
                ("format_instruction", EXACT_FORMAT_INSTRUCTION),
            ],
        ),
    }
}

/// Match prompt against ad-hoc job text; also used for ranking.
pub fn resume_match(
    resume_text: Option<&str>,
    job_title: Option<&str>,
    job_description: Option<&str>,
    job_requirements: Option<&str>,
) -> Prompt {
    let resume = match resume_text {
        Some(text) if !text.trim().is_empty() => truncate_chars(text, RESUME_CHAR_LIMIT),
        _ => "No resume",
    };
    Prompt {
        system: RESUME_MATCH_SYSTEM,
        user: render(
            RESUME_MATCH_TEMPLATE,
            &[
                ("resume_text", resume),
                ("job_title", or_not_specified(job_title)),
                ("job_description", job_text(job_description)),
                ("job_requirements", job_text(job_requirements)),
                ("format_instruction", EXACT_FORMAT_INSTRUCTION),
            ],
        ),
    }
}

pub fn job_description(request: &JobDescriptionRequest) -> Prompt {
    Prompt {
        system: JOB_DESCRIPTION_SYSTEM,
        user: render(
            JOB_DESCRIPTION_TEMPLATE,
            &[
                ("job_title", or_not_specified(Some(&request.job_title))),
                ("company_name", or_not_specified(Some(&request.company_name))),
                ("key_skills", or_not_specified(request.key_skills.as_deref())),
                (
                    "experience_level",
                    or_not_specified(request.experience_level.as_deref()),
                ),
                ("job_type", or_not_specified(request.job_type.as_deref())),
                (
                    "additional_info",
                    or_not_specified(request.additional_info.as_deref()),
                ),
                ("format_instruction", EXACT_FORMAT_INSTRUCTION),
            ],
        ),
    }
}

fn job_text(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => truncate_chars(v, JOB_TEXT_CHAR_LIMIT),
        _ => NOT_SPECIFIED,
    }
}

/// Single-pass `{name}` substitution. Substituted values are never re-scanned,
/// so user text containing braces is embedded verbatim.
fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let candidate = &rest[open..];
        let replacement = candidate.find('}').and_then(|close| {
            let name = &candidate[1..close];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (close, *value))
        });
        match replacement {
            Some((close, value)) => {
                out.push_str(value);
                rest = &candidate[close + 1..];
            }
            None => {
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
