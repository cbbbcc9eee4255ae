//! Text normalization — turns raw extracted document text into a canonical
//! lowercase token stream for vectorization and skill matching.
//!
//! The whole pass is a pure function: identical input always yields identical
//! output, and empty input yields an empty token list rather than an error.

/// Stopwords removed during tokenization. Sorted so membership checks can
/// binary-search; `debug_assert` in `is_stopword` guards the ordering.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can",
    "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "just", "me", "more", "most", "my", "no", "nor", "not",
    "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over",
    "own", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "then", "there", "these", "they", "this", "those", "through", "to",
    "too", "under", "until", "up", "very", "was", "we", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "you", "your", "yours",
];

fn is_stopword(token: &str) -> bool {
    debug_assert!(STOPWORDS.windows(2).all(|w| w[0] < w[1]));
    STOPWORDS.binary_search(&token).is_ok()
}

/// Canonical normalized form of a document.
///
/// Invariant: `tokens` contains no stopwords, no pure punctuation, and no
/// empty strings. `cleaned` is the detokenized form (`tokens` joined by a
/// single space). `collapsed` is the lowercased, whitespace-collapsed source
/// with punctuation intact — the lexical skill matcher runs over it so that
/// punctuation-bearing skills ("c++", ".net", "ui/ux") stay matchable.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedText {
    pub tokens: Vec<String>,
    pub cleaned: String,
    pub collapsed: String,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Options for the normalization pass. Stemming is off by default because the
/// shipped vectorizer vocabulary was fitted on unstemmed tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub stem: bool,
}

/// Normalizes raw text with default options (no stemming).
pub fn normalize(raw: &str) -> NormalizedText {
    normalize_with(raw, NormalizeOptions::default())
}

/// Normalizes raw text. Step order matters for determinism: lowercase, strip
/// URLs/emails, strip punctuation (keeping intra-word hyphens), collapse
/// whitespace, tokenize, drop stopwords, optionally stem.
pub fn normalize_with(raw: &str, opts: NormalizeOptions) -> NormalizedText {
    let lowered = raw.to_lowercase();

    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut tokens: Vec<String> = Vec::new();
    for word in lowered.split_whitespace() {
        if is_url(word) || is_email(word) {
            continue;
        }
        for piece in split_alphanumeric(word) {
            if piece.is_empty() || is_stopword(&piece) {
                continue;
            }
            let token = if opts.stem { stem_token(&piece) } else { piece };
            if !token.is_empty() && !is_stopword(&token) {
                tokens.push(token);
            }
        }
    }

    let cleaned = tokens.join(" ");
    NormalizedText {
        tokens,
        cleaned,
        collapsed,
    }
}

fn is_url(word: &str) -> bool {
    word.starts_with("http://") || word.starts_with("https://") || word.starts_with("www.")
}

fn is_email(word: &str) -> bool {
    // Local part, '@', domain with at least one dot. Good enough for the
    // "person@example.com" forms that appear in resume headers.
    match word.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Splits a word into runs of ASCII alphanumerics, treating every other
/// character as a separator except hyphens between alphanumerics.
fn split_alphanumeric(word: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            current.push(c);
        } else if !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    // Hyphens survive only between alphanumerics; leading/trailing ones and
    // bare hyphen runs are punctuation.
    pieces
        .into_iter()
        .map(|p| p.trim_matches('-').to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Fixed-rule suffix stemmer. Deliberately light: the goal is folding plural
/// and gerund inflections, not full Porter stemming.
fn stem_token(token: &str) -> String {
    let t = token;
    if t.len() > 4 && t.ends_with("ies") {
        return format!("{}y", &t[..t.len() - 3]);
    }
    if t.len() > 5 && t.ends_with("ing") {
        return t[..t.len() - 3].to_string();
    }
    if t.len() > 4 && t.ends_with("ed") {
        return t[..t.len() - 2].to_string();
    }
    if t.len() > 3 && t.ends_with('s') && !t.ends_with("ss") && !t.ends_with("us") {
        return t[..t.len() - 1].to_string();
    }
    t.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        let n = normalize("Skilled in Django, REST APIs!");
        assert_eq!(n.tokens, vec!["skilled", "django", "rest", "apis"]);
        assert_eq!(n.cleaned, "skilled django rest apis");
    }

    #[test]
    fn empty_and_whitespace_input_yield_empty_tokens() {
        assert!(normalize("").is_empty());
        assert!(normalize("   \t\n  ").is_empty());
        assert_eq!(normalize("").cleaned, "");
    }

    #[test]
    fn strips_urls_and_emails() {
        let n = normalize("contact jane.doe@example.com or visit https://example.com/cv today");
        assert_eq!(n.tokens, vec!["contact", "visit", "today"]);
    }

    #[test]
    fn keeps_intra_word_hyphens() {
        let n = normalize("scikit-learn and -leading- trailing-");
        assert!(n.tokens.contains(&"scikit-learn".to_string()));
        assert!(n.tokens.contains(&"leading".to_string()));
        assert!(n.tokens.contains(&"trailing".to_string()));
    }

    #[test]
    fn removes_stopwords() {
        let n = normalize("the quick fox is in the barn");
        assert_eq!(n.tokens, vec!["quick", "fox", "barn"]);
    }

    #[test]
    fn collapsed_preserves_punctuation() {
        let n = normalize("C++  and\t.NET");
        assert_eq!(n.collapsed, "c++ and .net");
    }

    #[test]
    fn deterministic() {
        let a = normalize("Python developer, 5 years");
        let b = normalize("Python developer, 5 years");
        assert_eq!(a, b);
    }

    #[test]
    fn idempotent_on_cleaned_output() {
        let n = normalize("An Experienced Python Developer skilled in Django and PostgreSQL!");
        let again = normalize(&n.cleaned);
        assert_eq!(again.tokens, n.tokens);
        assert_eq!(again.cleaned, n.cleaned);
    }

    #[test]
    fn stemming_folds_plurals_and_gerunds() {
        let opts = NormalizeOptions { stem: true };
        let n = normalize_with("testing databases technologies", opts);
        assert_eq!(n.tokens, vec!["test", "database", "technology"]);
    }

    #[test]
    fn non_ascii_becomes_separator() {
        let n = normalize("résumé naïve");
        // Accented characters split the surrounding runs.
        assert_eq!(n.tokens, vec!["r", "sum", "na", "ve"]);
    }
}
