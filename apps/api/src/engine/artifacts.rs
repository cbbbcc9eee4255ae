//! Model artifact loading.
//!
//! The fitted vectorizer and trained classifier are required: a missing or
//! malformed file is a fatal initialization error surfaced out of `main`,
//! never a per-request error. The skill vocabulary falls back to the
//! compiled-in default, and entity-model problems only degrade extraction.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::engine::classify::{CategoryModel, Classifier, LinearClassifier, TfidfVectorizer};
use crate::engine::ner::{EntityModel, PhraseEntityModel, PhraseModelConfig};
use crate::engine::skills::SkillVocabulary;
use crate::engine::Engine;

pub const TFIDF_FILE: &str = "tfidf.json";
pub const CLASSIFIER_FILE: &str = "classifier.json";
pub const SKILLS_FILE: &str = "skills.json";
pub const NER_FILE: &str = "ner.json";

#[derive(Debug, Deserialize)]
struct TfidfArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ClassifierArtifact {
    classes: Vec<String>,
    coefficients: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

/// Loads all model artifacts from `dir` and assembles the engine.
pub fn load(dir: &Path, enable_ner: bool) -> Result<Engine> {
    let vectorizer = load_vectorizer(dir)?;
    let dimension = vectorizer.dimension();
    let model = load_classifier(dir, dimension)?;
    let vocabulary = load_vocabulary(dir)?;
    let entity_model = load_entity_model(dir, enable_ner);

    info!(
        classes = model.class_labels().len(),
        features = dimension,
        skills = vocabulary.len(),
        ner = entity_model.is_some(),
        "model artifacts loaded"
    );

    Ok(Engine::new(
        Classifier::new(vectorizer, model),
        vocabulary,
        entity_model,
    ))
}

fn load_vectorizer(dir: &Path) -> Result<TfidfVectorizer> {
    let path = dir.join(TFIDF_FILE);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading vectorizer artifact {}", path.display()))?;
    let artifact: TfidfArtifact = serde_json::from_str(&raw)
        .with_context(|| format!("parsing vectorizer artifact {}", path.display()))?;

    ensure!(
        !artifact.vocabulary.is_empty(),
        "vectorizer vocabulary is empty"
    );
    ensure!(
        artifact.vocabulary.values().all(|&i| i < artifact.idf.len()),
        "vectorizer vocabulary index out of bounds for idf vector (len {})",
        artifact.idf.len()
    );
    ensure!(
        artifact.idf.iter().all(|v| v.is_finite()),
        "vectorizer idf weights must be finite"
    );

    Ok(TfidfVectorizer::new(artifact.vocabulary, artifact.idf))
}

fn load_classifier(dir: &Path, dimension: usize) -> Result<Box<LinearClassifier>> {
    let path = dir.join(CLASSIFIER_FILE);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading classifier artifact {}", path.display()))?;
    let artifact: ClassifierArtifact = serde_json::from_str(&raw)
        .with_context(|| format!("parsing classifier artifact {}", path.display()))?;

    ensure!(!artifact.classes.is_empty(), "classifier has no classes");
    ensure!(
        artifact.coefficients.len() == artifact.classes.len(),
        "classifier has {} coefficient rows for {} classes",
        artifact.coefficients.len(),
        artifact.classes.len()
    );
    ensure!(
        artifact.intercepts.len() == artifact.classes.len(),
        "classifier has {} intercepts for {} classes",
        artifact.intercepts.len(),
        artifact.classes.len()
    );
    ensure!(
        artifact.coefficients.iter().all(|row| row.len() == dimension),
        "classifier coefficient rows must match vectorizer dimension {dimension}"
    );

    Ok(Box::new(LinearClassifier::new(
        artifact.classes,
        artifact.coefficients,
        artifact.intercepts,
    )))
}

fn load_vocabulary(dir: &Path) -> Result<SkillVocabulary> {
    let path = dir.join(SKILLS_FILE);
    if !path.exists() {
        info!("no skills.json artifact, using built-in skill vocabulary");
        return Ok(SkillVocabulary::builtin());
    }
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("reading skill vocabulary {}", path.display()))?;
    let names: Vec<String> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing skill vocabulary {}", path.display()))?;
    let vocabulary = SkillVocabulary::from_names(names);
    ensure!(!vocabulary.is_empty(), "skill vocabulary artifact is empty");
    Ok(vocabulary)
}

/// Entity-model unavailability is a degraded mode, not a failure: the engine
/// runs lexical-only and every result carries the coverage flag.
fn load_entity_model(dir: &Path, enable_ner: bool) -> Option<Box<dyn EntityModel>> {
    if !enable_ner {
        warn!("entity-recognition extraction disabled by config, running lexical-only");
        return None;
    }
    let path = dir.join(NER_FILE);
    if !path.exists() {
        return Some(Box::new(PhraseEntityModel::default()));
    }
    let config = std::fs::read_to_string(&path)
        .map_err(anyhow::Error::from)
        .and_then(|raw| serde_json::from_str::<PhraseModelConfig>(&raw).map_err(Into::into));
    match config {
        Ok(config) => Some(Box::new(PhraseEntityModel::new(config))),
        Err(e) => {
            warn!(
                "entity model config {} unreadable ({e}), running lexical-only",
                path.display()
            );
            None
        }
    }
}
