//! Reply parser: recovers labeled sections from free-text model replies.
//!
//! The model is only *asked* to follow the section layout in `prompts.rs`.
//! Sections may be missing, reordered or padded with prose, so every
//! primitive here is total: a missing marker yields an empty string, an
//! empty list or the neutral score, never an error or a panic.

use crate::analysis::models::{
    JobDescriptionDraft, MatchAssessment, ResumeInsights, StoredMatchParts,
};

pub const SKILLS: &str = "SKILLS:";
pub const EXPERIENCE_SUMMARY: &str = "EXPERIENCE_SUMMARY:";
pub const EDUCATION_SUMMARY: &str = "EDUCATION_SUMMARY:";
pub const SUGGESTED_JOB_TITLES: &str = "SUGGESTED_JOB_TITLES:";
pub const OVERALL_SUMMARY: &str = "OVERALL_SUMMARY:";
pub const MATCH_SCORE: &str = "MATCH_SCORE:";
pub const MATCHING_SKILLS: &str = "MATCHING_SKILLS:";
pub const MISSING_SKILLS: &str = "MISSING_SKILLS:";
pub const STRENGTHS_SUMMARY: &str = "STRENGTHS_SUMMARY:";
pub const RECOMMENDATION: &str = "RECOMMENDATION:";
pub const RECOMMENDATIONS: &str = "RECOMMENDATIONS:";
pub const DESCRIPTION: &str = "DESCRIPTION:";
pub const REQUIREMENTS: &str = "REQUIREMENTS:";

/// Score used when a reply carries no parseable `MATCH_SCORE:` line.
pub const NEUTRAL_SCORE: i32 = 50;

/// UTF-8 "•" read back as Windows-1252.
const MOJIBAKE_BULLET: &str = "\u{e2}\u{20ac}\u{a2}";

// ────────────────────────────────────────────────────────────────────────────
// Primitives
// ────────────────────────────────────────────────────────────────────────────

/// Text between the first `start` marker and the next `end` marker (or end
/// of text), trimmed. Empty when `start` does not occur.
pub fn extract_section(text: &str, start: &str, end: Option<&str>) -> String {
    let Some(pos) = text.find(start) else {
        return String::new();
    };
    let body = &text[pos + start.len()..];
    let body = match end.and_then(|marker| body.find(marker)) {
        Some(end_pos) => &body[..end_pos],
        None => body,
    };
    body.trim().to_string()
}

/// One entry per non-trivial line of the section, bullets stripped, source
/// order kept, duplicates kept.
pub fn extract_list(text: &str, start: &str, end: &str) -> Vec<String> {
    extract_section(text, start, Some(end))
        .lines()
        .map(strip_bullet)
        .filter(|item| item.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Digits on the `MATCH_SCORE:` line, clamped to 0..=100. Falls back to
/// `NEUTRAL_SCORE` when the marker is missing, the line has no digits, or
/// the digits do not fit an `i32`.
pub fn extract_score(text: &str) -> i32 {
    let Some(pos) = text.find(MATCH_SCORE) else {
        return NEUTRAL_SCORE;
    };
    let line = text[pos + MATCH_SCORE.len()..]
        .lines()
        .next()
        .unwrap_or_default();

    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    digits
        .parse::<i32>()
        .map(|score| score.clamp(0, 100))
        .unwrap_or(NEUTRAL_SCORE)
}

/// Strips any leading bullet-like prefix: dashes, asterisks, bullet glyphs,
/// mis-encoded bullets and `1.` / `2)` style numbering.
fn strip_bullet(line: &str) -> &str {
    let mut rest = line.trim();
    loop {
        let before = rest.len();
        if let Some(stripped) = rest.strip_prefix(MOJIBAKE_BULLET) {
            rest = stripped;
        }
        rest = rest.trim_start_matches(is_bullet_char).trim_start();
        rest = strip_ordinal(rest);
        if rest.len() == before {
            return rest.trim_end();
        }
    }
}

/// Leading non-alphanumeric symbols that can never start a skill name.
/// `.` `#` `(` and friends stay so `.NET` or `(ISC)²` survive.
fn is_bullet_char(c: char) -> bool {
    !c.is_alphanumeric()
        && !c.is_whitespace()
        && !matches!(
            c,
            '.' | '#' | '(' | '[' | '"' | '\'' | '@' | '$' | '/' | '_' | '&'
        )
}

fn strip_ordinal(text: &str) -> &str {
    let digits = text.len() - text.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return text;
    }
    let rest = &text[digits..];
    match rest.strip_prefix(['.', ')']) {
        Some(after) if after.starts_with(char::is_whitespace) => after.trim_start(),
        _ => text,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Persisted list encoding
// ────────────────────────────────────────────────────────────────────────────

/// Splits a comma-joined column back into its items: trimmed, empties
/// dropped, order kept.
pub fn parse_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_comma(items: &[String]) -> String {
    items.join(",")
}

// ────────────────────────────────────────────────────────────────────────────
// Typed replies
// ────────────────────────────────────────────────────────────────────────────

pub fn parse_resume_insights(reply: &str) -> ResumeInsights {
    ResumeInsights {
        skills: extract_list(reply, SKILLS, EXPERIENCE_SUMMARY),
        experience_summary: extract_section(reply, EXPERIENCE_SUMMARY, Some(EDUCATION_SUMMARY)),
        education_summary: extract_section(reply, EDUCATION_SUMMARY, Some(SUGGESTED_JOB_TITLES)),
        suggested_job_titles: extract_list(reply, SUGGESTED_JOB_TITLES, OVERALL_SUMMARY),
        overall_summary: extract_section(reply, OVERALL_SUMMARY, None),
    }
}

pub fn parse_stored_match(reply: &str) -> StoredMatchParts {
    StoredMatchParts {
        match_score: extract_score(reply),
        matching_skills: extract_list(reply, MATCHING_SKILLS, MISSING_SKILLS),
        missing_skills: extract_list(reply, MISSING_SKILLS, STRENGTHS_SUMMARY),
        strengths_summary: extract_section(reply, STRENGTHS_SUMMARY, Some(RECOMMENDATION)),
        recommendation: extract_section(reply, RECOMMENDATION, None),
    }
}

pub fn parse_match_assessment(reply: &str) -> MatchAssessment {
    MatchAssessment {
        match_score: extract_score(reply),
        matching_skills: extract_list(reply, MATCHING_SKILLS, MISSING_SKILLS),
        missing_skills: extract_list(reply, MISSING_SKILLS, RECOMMENDATIONS),
        recommendations: extract_section(reply, RECOMMENDATIONS, None),
    }
}

/// Without a `DESCRIPTION:` marker the whole reply is taken as the description.
pub fn parse_job_description(reply: &str) -> JobDescriptionDraft {
    if !reply.contains(DESCRIPTION) {
        return JobDescriptionDraft {
            description: reply.trim().to_string(),
            requirements: String::new(),
        };
    }
    JobDescriptionDraft {
        description: extract_section(reply, DESCRIPTION, Some(REQUIREMENTS)),
        requirements: extract_section(reply, REQUIREMENTS, None),
    }
}
