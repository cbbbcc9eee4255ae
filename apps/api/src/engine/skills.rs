//! Skill extraction — two independent strategies (lexical whole-word matching
//! and entity-recognition candidates) reconciled into one provenance-tagged
//! set against a master skill vocabulary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::ner::EntityModel;
use crate::engine::normalize::NormalizedText;

/// Compiled-in master skill list, used when no `skills.json` artifact is
/// supplied. Canonical names are stored as listed; identity is
/// case-insensitive.
pub const DEFAULT_SKILLS: &[&str] = &[
    "python", "java", "c++", "c#", "javascript", "js", "html", "css", "php", "ruby", "swift",
    "kotlin", "sql", "mysql", "postgresql", "sqlite", "mongodb", "cassandra", "redis", "oracle",
    "sql server", "aws", "azure", "google cloud", "gcp", "docker", "kubernetes", "terraform",
    "ansible", "jenkins", "git", "linux", "unix", "windows", "macos", "react", "angular", "vue",
    "nodejs", "django", "flask", "spring", "ruby on rails", ".net", "pandas", "numpy", "scipy",
    "scikit-learn", "sklearn", "tensorflow", "keras", "pytorch", "matplotlib", "seaborn",
    "plotly", "machine learning", "deep learning", "data science", "data analysis",
    "data visualization", "nlp", "natural language processing", "computer vision", "big data",
    "hadoop", "spark", "kafka", "hive", "hbase", "spacy", "nltk", "agile", "scrum", "jira",
    "project management", "product management", "communication", "teamwork", "leadership",
    "problem solving", "critical thinking", "customer service", "sales", "marketing", "seo",
    "sem", "content creation", "ui/ux", "design", "photoshop", "illustrator", "figma", "devops",
    "automation testing", "selenium", "cybersecurity", "network security", "sap", "etl",
    "power bi", "tableau", "excel", "word", "powerpoint", "blockchain", "solidity", "ethereum",
    "hyperledger", "mechanical engineering", "electrical engineering", "civil engineering",
    "hr", "recruitment", "talent acquisition", "employee relations", "health", "fitness",
    "nutrition", "advocate", "legal", "law", "jquery", "bootstrap", "d3.js", "dc.js",
    "logstash", "kibana", "r", "sap hana", "rest", "soap", "api", "microservices", "pmo",
    "operations management", "business analysis", "dotnet",
];

/// Master skill vocabulary. Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    /// lowercase key → canonical display name
    entries: BTreeMap<String, String>,
}

impl SkillVocabulary {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = BTreeMap::new();
        for name in names {
            let name: String = name.into();
            let key = name.trim().to_lowercase();
            if !key.is_empty() {
                entries.entry(key).or_insert(name.trim().to_string());
            }
        }
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::from_names(DEFAULT_SKILLS.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical display name for a case-insensitive lookup, if present.
    pub fn canonical(&self, name: &str) -> Option<&str> {
        self.entries.get(&name.trim().to_lowercase()).map(String::as_str)
    }

    /// (lowercase key, canonical name) pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Which strategy found a skill. A skill found independently by both
/// strategies collapses to one entry tagged `Both`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    RuleBased,
    Ner,
    Both,
}

impl ExtractionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionMethod::RuleBased => "rule_based",
            ExtractionMethod::Ner => "ner",
            ExtractionMethod::Both => "both",
        }
    }

    fn merge(self, other: ExtractionMethod) -> ExtractionMethod {
        if self == other {
            self
        } else {
            ExtractionMethod::Both
        }
    }
}

/// The merged result of both extraction strategies. Keyed by canonical skill
/// name, so no skill appears twice. `ner_available` makes degraded
/// (lexical-only) extraction observable to callers rather than silent.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractedSkillSet {
    pub skills: BTreeMap<String, ExtractionMethod>,
    pub ner_available: bool,
}

impl ExtractedSkillSet {
    pub fn new(ner_available: bool) -> Self {
        Self {
            skills: BTreeMap::new(),
            ner_available,
        }
    }

    pub fn insert(&mut self, name: &str, method: ExtractionMethod) {
        self.skills
            .entry(name.to_string())
            .and_modify(|m| *m = m.merge(method))
            .or_insert(method);
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.skills.keys().map(String::as_str)
    }

    pub fn is_degraded(&self) -> bool {
        !self.ner_available
    }
}

/// Runs both strategies against a fixed vocabulary. Holds only borrowed,
/// immutable state; one instance serves a whole `match_against_job` call so
/// both sides see the same strategy set.
pub struct SkillExtractor<'a> {
    vocabulary: &'a SkillVocabulary,
    entity_model: Option<&'a dyn EntityModel>,
}

impl<'a> SkillExtractor<'a> {
    pub fn new(
        vocabulary: &'a SkillVocabulary,
        entity_model: Option<&'a dyn EntityModel>,
    ) -> Self {
        Self {
            vocabulary,
            entity_model,
        }
    }

    /// Strategy A: whole-word (or whole-phrase) containment over the
    /// collapsed text. Case-insensitive; deterministic.
    pub fn extract_rule_based(&self, text: &NormalizedText) -> Vec<&'a str> {
        let mut found = Vec::new();
        for (key, canonical) in self.vocabulary.iter() {
            if contains_whole_word(&text.collapsed, key) {
                found.push(canonical);
            }
        }
        found
    }

    /// Strategy B: candidate phrases from the entity model, normalized and
    /// tested for vocabulary membership. Empty when no model is loaded.
    pub fn extract_ner_based(&self, text: &NormalizedText) -> Vec<&'a str> {
        let Some(model) = self.entity_model else {
            return Vec::new();
        };
        let mut found = Vec::new();
        for candidate in model.extract_entities(&text.collapsed) {
            if let Some(canonical) = self.vocabulary.canonical(&candidate) {
                if !found.contains(&canonical) {
                    found.push(canonical);
                }
            }
        }
        found
    }

    /// Union of both strategies with provenance tags.
    pub fn extract(&self, text: &NormalizedText) -> ExtractedSkillSet {
        let mut set = ExtractedSkillSet::new(self.entity_model.is_some());
        for name in self.extract_rule_based(text) {
            set.insert(name, ExtractionMethod::RuleBased);
        }
        for name in self.extract_ner_based(text) {
            set.insert(name, ExtractionMethod::Ner);
        }
        set
    }
}

/// Whole-word containment with ASCII boundary checks. A boundary is required
/// only on sides where the needle edge is alphanumeric, mirroring `\b`
/// semantics: "java" does not match inside "javascript", but "c++" matches
/// in "c++," and ".net" after a space.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let hay = haystack.as_bytes();
    let first_alnum = needle.as_bytes()[0].is_ascii_alphanumeric();
    let last_alnum = needle.as_bytes()[needle.len() - 1].is_ascii_alphanumeric();

    for (start, _) in haystack.match_indices(needle) {
        let end = start + needle.len();
        let left_ok =
            !first_alnum || start == 0 || !hay[start - 1].is_ascii_alphanumeric();
        let right_ok = !last_alnum || end == hay.len() || !hay[end].is_ascii_alphanumeric();
        if left_ok && right_ok {
            return true;
        }
    }
    false
}
