//! Resume analysis engine — normalization, skill extraction, category
//! classification, and job-match scoring behind two synchronous entry points.
//!
//! The engine is loaded once at startup from immutable model artifacts and
//! shared read-only across requests (`Arc<Engine>` in `AppState`); every call
//! is a pure function of its inputs plus that shared state, so no locking is
//! needed. Nothing here performs network or disk I/O.

pub mod artifacts;
pub mod classify;
pub mod ner;
pub mod normalize;
pub mod score;
pub mod skills;

use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use crate::engine::classify::{CategoryPrediction, Classifier};
use crate::engine::ner::EntityModel;
use crate::engine::normalize::normalize;
use crate::engine::score::MatchResult;
use crate::engine::skills::{ExtractedSkillSet, SkillExtractor, SkillVocabulary};

/// Full output of a resume-vs-job-description call: the score plus both
/// extracted skill sets for display, and whether extraction ran degraded
/// (lexical-only) on this call.
#[derive(Debug, Clone, Serialize)]
pub struct MatchAnalysis {
    pub result: MatchResult,
    pub resume_skills: ExtractedSkillSet,
    pub job_skills: ExtractedSkillSet,
    pub degraded: bool,
}

/// The pipeline orchestrator. Owns the process-wide immutable artifacts.
pub struct Engine {
    classifier: Classifier,
    vocabulary: SkillVocabulary,
    entity_model: Option<Box<dyn EntityModel>>,
}

impl Engine {
    pub fn new(
        classifier: Classifier,
        vocabulary: SkillVocabulary,
        entity_model: Option<Box<dyn EntityModel>>,
    ) -> Self {
        Self {
            classifier,
            vocabulary,
            entity_model,
        }
    }

    /// Loads the engine from a model artifact directory. Vectorizer or
    /// classifier problems are fatal; see [`artifacts`].
    pub fn from_artifacts(dir: &Path, enable_ner: bool) -> Result<Self> {
        artifacts::load(dir, enable_ner)
    }

    pub fn ner_available(&self) -> bool {
        self.entity_model.is_some()
    }

    fn extractor(&self) -> SkillExtractor<'_> {
        SkillExtractor::new(&self.vocabulary, self.entity_model.as_deref())
    }

    /// Normalize → classify. Never fails: empty or fully out-of-vocabulary
    /// text still produces a valid low-confidence prediction.
    pub fn categorize(&self, raw_text: &str) -> CategoryPrediction {
        self.classifier.classify(&normalize(raw_text))
    }

    /// Normalize → extract with both available strategies.
    pub fn extract_skills(&self, raw_text: &str) -> ExtractedSkillSet {
        self.extractor().extract(&normalize(raw_text))
    }

    /// Normalize both texts independently, extract skills from both with the
    /// same strategy set (a per-side difference would bias the score), then
    /// score the resume against the job's required skills.
    pub fn match_against_job(&self, resume_text: &str, jd_text: &str) -> MatchAnalysis {
        let extractor = self.extractor();
        let resume_skills = extractor.extract(&normalize(resume_text));
        let job_skills = extractor.extract(&normalize(jd_text));
        let result = score::score(&resume_skills, &job_skills);
        let degraded = !self.ner_available();
        MatchAnalysis {
            result,
            resume_skills,
            job_skills,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classify::{LinearClassifier, TfidfVectorizer};
    use crate::engine::ner::PhraseEntityModel;
    use std::collections::HashMap;

    /// Small fixture engine: two classes over a four-token vocabulary, with
    /// the built-in skill vocabulary and an optional entity model.
    fn engine(with_ner: bool) -> Engine {
        let vocabulary = HashMap::from([
            ("python".to_string(), 0),
            ("django".to_string(), 1),
            ("sales".to_string(), 2),
            ("marketing".to_string(), 3),
        ]);
        let vectorizer = TfidfVectorizer::new(vocabulary, vec![1.0; 4]);
        let model = LinearClassifier::new(
            vec!["Python Developer".to_string(), "Sales".to_string()],
            vec![vec![2.0, 2.0, 0.0, 0.0], vec![0.0, 0.0, 2.0, 2.0]],
            vec![0.0, 0.0],
        );
        let entity_model: Option<Box<dyn EntityModel>> = if with_ner {
            Some(Box::new(PhraseEntityModel::default()))
        } else {
            None
        };
        Engine::new(
            Classifier::new(vectorizer, Box::new(model)),
            SkillVocabulary::builtin(),
            entity_model,
        )
    }

    const RESUME: &str =
        "Experienced Python developer skilled in Django, REST APIs, and PostgreSQL";
    const JOB: &str = "We require Python, Django, PostgreSQL, Docker";

    #[test]
    fn scenario_resume_vs_job_scores_75() {
        let analysis = engine(true).match_against_job(RESUME, JOB);
        assert_eq!(analysis.result.match_score, 75.0);
        assert!(analysis.result.matched_skills.contains("python"));
        assert!(analysis.result.matched_skills.contains("django"));
        assert!(analysis.result.matched_skills.contains("postgresql"));
        assert_eq!(
            analysis.result.missing_skills,
            ["docker"].iter().map(|s| s.to_string()).collect()
        );
        assert!(!analysis.degraded);
    }

    #[test]
    fn scenario_empty_job_description_scores_zero() {
        let analysis = engine(true).match_against_job(RESUME, "");
        assert_eq!(analysis.result.match_score, 0.0);
        assert!(analysis.result.matched_skills.is_empty());
        assert!(analysis.result.missing_skills.is_empty());
        assert!(analysis.job_skills.is_empty());
    }

    #[test]
    fn scenario_out_of_vocabulary_resume_still_categorizes() {
        let prediction = engine(true).categorize("zzzz qqqq wwww");
        assert!(!prediction.category.is_empty());
        assert!(prediction.confidence >= 0.0);
        let sum: f64 = prediction.distribution.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn degraded_mode_still_scores_and_is_flagged() {
        let analysis = engine(false).match_against_job(RESUME, JOB);
        assert_eq!(analysis.result.match_score, 75.0);
        assert!(analysis.degraded);
        assert!(analysis.resume_skills.is_degraded());
        assert!(analysis.job_skills.is_degraded());
    }

    #[test]
    fn both_sides_use_the_same_strategy_set() {
        let analysis = engine(true).match_against_job(RESUME, JOB);
        assert_eq!(
            analysis.resume_skills.ner_available,
            analysis.job_skills.ner_available
        );
        let degraded = engine(false).match_against_job(RESUME, JOB);
        assert_eq!(
            degraded.resume_skills.ner_available,
            degraded.job_skills.ner_available
        );
    }

    #[test]
    fn categorize_is_idempotent_for_identical_input() {
        let e = engine(true);
        let a = e.categorize(RESUME);
        let b = e.categorize(RESUME);
        assert_eq!(a.category, b.category);
        assert_eq!(a.distribution, b.distribution);
    }

    #[test]
    fn categorize_routes_by_content() {
        let e = engine(true);
        assert_eq!(e.categorize("python django python").category, "Python Developer");
        assert_eq!(e.categorize("sales marketing sales").category, "Sales");
    }

    #[test]
    fn extract_skills_tags_provenance() {
        let skills = engine(true).extract_skills(RESUME);
        assert!(skills.contains("python"));
        assert!(skills.contains("django"));
        for (_, method) in &skills.skills {
            assert!(matches!(
                method,
                skills::ExtractionMethod::RuleBased
                    | skills::ExtractionMethod::Ner
                    | skills::ExtractionMethod::Both
            ));
        }
    }

    #[test]
    fn empty_resume_matches_nothing_but_never_errors() {
        let analysis = engine(true).match_against_job("", JOB);
        assert_eq!(analysis.result.match_score, 0.0);
        assert_eq!(analysis.result.missing_skills.len(), analysis.job_skills.len());
    }
}
