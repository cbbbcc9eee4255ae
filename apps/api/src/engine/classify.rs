//! Category classification — fixed TF-IDF vectorization feeding a pre-trained
//! multi-class model behind the [`CategoryModel`] seam.
//!
//! The vectorizer vocabulary and idf weights are fitted offline and loaded
//! once at startup; nothing here refits at request time. Classification never
//! fails per-call: a document with zero vocabulary overlap still gets a valid
//! (uniform, low-confidence) prediction.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::engine::normalize::NormalizedText;

/// Probabilities within this distance of the maximum are considered tied and
/// resolved by lexicographic label order.
const TIE_TOLERANCE: f64 = 1e-9;

/// Fixed, pre-fitted term-weighting transform: raw term counts weighted by
/// idf, then L2-normalized. Out-of-vocabulary tokens contribute zero weight.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Invariant enforced by the artifact loader: every vocabulary index is
    /// in-bounds for `idf`.
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Self {
        debug_assert!(vocabulary.values().all(|&i| i < idf.len()));
        Self { vocabulary, idf }
    }

    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    pub fn transform(&self, text: &NormalizedText) -> Vec<f32> {
        let mut features = vec![0.0f32; self.idf.len()];
        for token in &text.tokens {
            if let Some(&idx) = self.vocabulary.get(token) {
                features[idx] += 1.0;
            }
        }
        for (value, idf) in features.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = features.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }
        features
    }
}

/// The classifier seam: one operation, "score all categories for a feature
/// vector". Any probability-or-margin-producing model family fits behind it.
pub trait CategoryModel: Send + Sync {
    fn class_labels(&self) -> &[String];

    /// Unnormalized per-class decision scores, one per label, in label order.
    fn decision_scores(&self, features: &[f32]) -> Vec<f64>;
}

/// Linear multi-class model (one weight row + intercept per class), the
/// shipped implementation behind [`CategoryModel`].
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    classes: Vec<String>,
    coefficients: Vec<Vec<f32>>,
    intercepts: Vec<f32>,
}

impl LinearClassifier {
    /// Shape invariants (rows == classes, row length == feature dimension)
    /// are enforced by the artifact loader.
    pub fn new(classes: Vec<String>, coefficients: Vec<Vec<f32>>, intercepts: Vec<f32>) -> Self {
        debug_assert_eq!(classes.len(), coefficients.len());
        debug_assert_eq!(classes.len(), intercepts.len());
        Self {
            classes,
            coefficients,
            intercepts,
        }
    }
}

impl CategoryModel for LinearClassifier {
    fn class_labels(&self) -> &[String] {
        &self.classes
    }

    fn decision_scores(&self, features: &[f32]) -> Vec<f64> {
        self.coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| {
                let dot: f32 = row.iter().zip(features).map(|(w, x)| w * x).sum();
                f64::from(dot + intercept)
            })
            .collect()
    }
}

/// Prediction for one document. Immutable once produced; `distribution` sums
/// to 1.0 within floating tolerance and `confidence` is the max probability.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryPrediction {
    pub category: String,
    pub confidence: f64,
    pub distribution: BTreeMap<String, f64>,
}

/// Vectorizer + model pair, loaded once and shared read-only.
pub struct Classifier {
    vectorizer: TfidfVectorizer,
    model: Box<dyn CategoryModel>,
}

impl Classifier {
    pub fn new(vectorizer: TfidfVectorizer, model: Box<dyn CategoryModel>) -> Self {
        Self { vectorizer, model }
    }

    /// Vectorize, score, softmax, argmax. Ties within [`TIE_TOLERANCE`] go to
    /// the lexicographically first label so the result never depends on
    /// model-internal class ordering.
    pub fn classify(&self, text: &NormalizedText) -> CategoryPrediction {
        let features = self.vectorizer.transform(text);
        let scores = self.model.decision_scores(&features);
        let probabilities = softmax(&scores);

        let labels = self.model.class_labels();
        let mut best_label = &labels[0];
        let mut best_prob = probabilities[0];
        for (label, &prob) in labels.iter().zip(&probabilities).skip(1) {
            if prob > best_prob + TIE_TOLERANCE
                || ((prob - best_prob).abs() <= TIE_TOLERANCE && label < best_label)
            {
                best_label = label;
                best_prob = prob;
            }
        }

        let distribution = labels
            .iter()
            .cloned()
            .zip(probabilities.iter().copied())
            .collect();

        CategoryPrediction {
            category: best_label.clone(),
            confidence: best_prob,
            distribution,
        }
    }
}

/// Numerically stable softmax over decision scores.
fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalize::normalize;

    fn fixture() -> Classifier {
        let vocabulary = HashMap::from([
            ("python".to_string(), 0),
            ("django".to_string(), 1),
            ("sales".to_string(), 2),
            ("marketing".to_string(), 3),
        ]);
        let idf = vec![1.0, 1.0, 1.0, 1.0];
        let classes = vec!["Python Developer".to_string(), "Sales".to_string()];
        let coefficients = vec![vec![2.0, 2.0, 0.0, 0.0], vec![0.0, 0.0, 2.0, 2.0]];
        let intercepts = vec![0.0, 0.0];
        Classifier::new(
            TfidfVectorizer::new(vocabulary, idf),
            Box::new(LinearClassifier::new(classes, coefficients, intercepts)),
        )
    }

    #[test]
    fn predicts_argmax_category() {
        let prediction = fixture().classify(&normalize("python django python"));
        assert_eq!(prediction.category, "Python Developer");
        assert!(prediction.confidence > 0.5);
    }

    #[test]
    fn distribution_sums_to_one() {
        let prediction = fixture().classify(&normalize("sales and marketing experience"));
        let sum: f64 = prediction.distribution.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(prediction.category, "Sales");
    }

    #[test]
    fn deterministic_across_calls() {
        let classifier = fixture();
        let text = normalize("python sales");
        let a = classifier.classify(&text);
        let b = classifier.classify(&text);
        assert_eq!(a.category, b.category);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.distribution, b.distribution);
    }

    #[test]
    fn zero_vocabulary_overlap_still_classifies() {
        let prediction = fixture().classify(&normalize("quantum basket weaving"));
        assert!(!prediction.category.is_empty());
        assert!(prediction.confidence >= 0.0 && prediction.confidence <= 1.0);
        // Uniform over two classes.
        assert!((prediction.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn empty_text_still_classifies() {
        let prediction = fixture().classify(&normalize(""));
        assert!((prediction.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn ties_break_lexicographically() {
        // "python sales" weights both classes identically.
        let prediction = fixture().classify(&normalize("python sales"));
        assert_eq!(prediction.category, "Python Developer");
    }

    #[test]
    fn tie_break_ignores_label_order_in_model() {
        let vocabulary = HashMap::from([("x".to_string(), 0)]);
        let classes = vec!["Zebra".to_string(), "Apple".to_string()];
        let coefficients = vec![vec![1.0], vec![1.0]];
        let classifier = Classifier::new(
            TfidfVectorizer::new(vocabulary, vec![1.0]),
            Box::new(LinearClassifier::new(classes, coefficients, vec![0.0, 0.0])),
        );
        let prediction = classifier.classify(&normalize("x"));
        assert_eq!(prediction.category, "Apple");
    }

    #[test]
    fn oov_tokens_contribute_zero_weight() {
        let classifier = fixture();
        let with_noise = classifier.classify(&normalize("python django xyzzy plugh"));
        let without = classifier.classify(&normalize("python django"));
        assert_eq!(with_noise.distribution, without.distribution);
    }
}
