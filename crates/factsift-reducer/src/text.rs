//! Tokenization helpers shared by the statistical strategy, the annotator
//! and the importance scorer

/// Common English words that carry no topical content
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its",
    "itself", "just", "may", "me", "might", "more", "most", "must", "my", "myself", "no", "nor",
    "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
    "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

/// True for common words that should not count as content
pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.binary_search(&word).is_ok()
}

/// Split text into words on anything that is not alphanumeric, keeping case
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty())
}

/// Lowercased content terms: two characters or longer, stopwords removed
pub fn content_terms(text: &str) -> Vec<String> {
    words(text)
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() >= 2 && !is_stopword(w))
        .collect()
}

/// Noun-phrase-like spans: maximal runs of alphabetic non-stopwords, lowercased
///
/// "Paris is the capital of France" yields `["paris", "capital", "france"]`.
pub fn noun_phrase_spans(text: &str) -> Vec<String> {
    let mut spans = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for word in words(text) {
        let lower = word.to_lowercase();
        if word.chars().all(char::is_alphabetic) && !is_stopword(&lower) {
            current.push(lower);
        } else if !current.is_empty() {
            spans.push(current.join(" "));
            current.clear();
        }
    }
    if !current.is_empty() {
        spans.push(current.join(" "));
    }

    spans
}
