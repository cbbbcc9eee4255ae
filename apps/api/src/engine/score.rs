//! Match scoring — compatibility of a resume's extracted skill set against a
//! job description's required skill set.
//!
//! All required skills count equally; there is no weighting by importance or
//! extraction method. That is a documented limitation of the scoring model,
//! not an oversight.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::engine::skills::ExtractedSkillSet;

/// Result of scoring one resume against one job description.
///
/// Invariants: `matched_skills ∪ missing_skills` equals the job's skill set,
/// the two are disjoint, and `match_score` is in [0, 100].
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub match_score: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
}

/// Scores `resume_skills` against `job_skills`. Method tags are ignored for
/// matching; names are compared case-insensitively. An empty job skill set is
/// a valid zero-score result (explicit zero-division guard), never an error.
pub fn score(resume_skills: &ExtractedSkillSet, job_skills: &ExtractedSkillSet) -> MatchResult {
    if job_skills.is_empty() {
        return MatchResult {
            match_score: 0.0,
            matched_skills: BTreeSet::new(),
            missing_skills: BTreeSet::new(),
        };
    }

    let resume_keys: BTreeSet<String> =
        resume_skills.names().map(|n| n.to_lowercase()).collect();

    let mut matched = BTreeSet::new();
    let mut missing = BTreeSet::new();
    for name in job_skills.names() {
        if resume_keys.contains(&name.to_lowercase()) {
            matched.insert(name.to_string());
        } else {
            missing.insert(name.to_string());
        }
    }

    let raw = 100.0 * matched.len() as f64 / job_skills.len() as f64;
    // Two-decimal rounding, clamped in case of float drift.
    let match_score = ((raw * 100.0).round() / 100.0).clamp(0.0, 100.0);

    MatchResult {
        match_score,
        matched_skills: matched,
        missing_skills: missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::skills::ExtractionMethod;

    fn set(names: &[&str]) -> ExtractedSkillSet {
        let mut s = ExtractedSkillSet::new(true);
        for name in names {
            s.insert(name, ExtractionMethod::RuleBased);
        }
        s
    }

    #[test]
    fn partial_match_scores_proportionally() {
        let result = score(
            &set(&["python", "django", "postgresql", "rest"]),
            &set(&["python", "django", "postgresql", "docker"]),
        );
        assert_eq!(result.match_score, 75.0);
        assert_eq!(
            result.matched_skills,
            ["python", "django", "postgresql"]
                .iter()
                .map(|s| s.to_string())
                .collect()
        );
        assert_eq!(
            result.missing_skills,
            ["docker"].iter().map(|s| s.to_string()).collect()
        );
    }

    #[test]
    fn empty_job_skills_is_zero_not_error() {
        let result = score(&set(&["python", "sql"]), &set(&[]));
        assert_eq!(result.match_score, 0.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn full_coverage_scores_one_hundred() {
        let result = score(&set(&["python", "docker", "aws"]), &set(&["python", "docker"]));
        assert_eq!(result.match_score, 100.0);
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn no_overlap_scores_zero() {
        let result = score(&set(&["excel"]), &set(&["python", "docker"]));
        assert_eq!(result.match_score, 0.0);
        assert_eq!(result.matched_skills.len(), 0);
        assert_eq!(result.missing_skills.len(), 2);
    }

    #[test]
    fn matched_and_missing_partition_job_skills() {
        let job = set(&["python", "django", "kafka", "spark"]);
        let result = score(&set(&["python", "kafka", "excel"]), &job);

        let union: BTreeSet<String> = result
            .matched_skills
            .union(&result.missing_skills)
            .cloned()
            .collect();
        let job_names: BTreeSet<String> = job.names().map(|s| s.to_string()).collect();
        assert_eq!(union, job_names);
        assert!(result.matched_skills.is_disjoint(&result.missing_skills));
    }

    #[test]
    fn score_is_bounded() {
        let pairs = [
            (set(&[]), set(&[])),
            (set(&[]), set(&["python"])),
            (set(&["python"]), set(&["python"])),
            (set(&["a", "b", "c"]), set(&["a", "b", "c", "d", "e", "f", "g"])),
        ];
        for (resume, job) in &pairs {
            let result = score(resume, job);
            assert!((0.0..=100.0).contains(&result.match_score));
        }
    }

    #[test]
    fn method_tags_do_not_affect_matching() {
        let mut resume = ExtractedSkillSet::new(false);
        resume.insert("python", ExtractionMethod::RuleBased);
        let mut job = ExtractedSkillSet::new(true);
        job.insert("python", ExtractionMethod::Ner);
        let result = score(&resume, &job);
        assert_eq!(result.match_score, 100.0);
    }

    #[test]
    fn one_of_three_rounds_to_two_decimals() {
        let result = score(&set(&["python"]), &set(&["python", "docker", "kafka"]));
        assert_eq!(result.match_score, 33.33);
    }
}
