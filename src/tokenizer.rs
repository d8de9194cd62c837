//! Tokenization of raw label strings.
//!
//! Filenames, folder names and metadata fields all go through the same
//! pipeline: split on delimiters and camel-case boundaries, lowercase, strip
//! noise, singularize, and drop degenerate words.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

/// Shortest token that survives filtering.
pub const MIN_TOKEN_LEN: usize = 2;

/// Characters that always separate words (in addition to whitespace).
const DELIMITERS: &[char] = &[
    '_', '-', ',', '.', '(', ')', '[', ']', '{', '}', '|', ';', ':', '!', '?', '"', '\'', '`',
    '~', '@', '#', '$', '%', '^', '&', '*', '+', '=', '<', '>', '/', '\\',
];

const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "of", "in", "on", "at", "to", "for", "with", "by", "from", "is", "are",
    "was", "be", "it", "its", "this", "that", "an", "as", "img", "dsc", "copy", "untitled",
];

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "svg"];

/// Ordered suffix rewrites; the first matching rule wins.
const PLURAL_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("ves", "f"),
    ("ses", "s"),
    ("es", ""),
    ("s", ""),
];

static BRACKET_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [r"\(([^)]*)\)", r"\[([^\]]*)\]", r"\{([^}]*)\}"]
        .map(|pattern| Regex::new(pattern).expect("bracket patterns are valid"))
});

/// Splits raw strings into normalized word tokens.
pub struct Tokenizer;

impl Tokenizer {
    /// Tokenizes `text` into an ordered, deduplicated set of lowercase words.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagnorm::Tokenizer;
    ///
    /// let tokens = Tokenizer::tokenize("Forced_Feminization-Tutorial_2024.jpg");
    /// assert_eq!(
    ///     tokens.into_iter().collect::<Vec<_>>(),
    ///     vec!["forced", "feminization", "tutorial"]
    /// );
    ///
    /// let tokens = Tokenizer::tokenize("BeachSunsets (Family)");
    /// assert_eq!(
    ///     tokens.into_iter().collect::<Vec<_>>(),
    ///     vec!["beach", "sunset", "family"]
    /// );
    /// ```
    #[must_use]
    pub fn tokenize(text: &str) -> IndexSet<String> {
        text.split(is_delimiter)
            .filter(|piece| !piece.is_empty())
            .flat_map(split_camel_case)
            .filter_map(Self::normalize_word)
            .collect()
    }

    /// Normalizes a single word, returning `None` if it should be dropped.
    ///
    /// # Normalization rules
    ///
    /// - Converts to lowercase
    /// - Strips trailing digit runs, then every non-alphanumeric character
    /// - Singularizes (`ies`->`y`, `ves`->`f`, `ses`->`s`, `es`->``, `s`->``)
    /// - Drops words shorter than [`MIN_TOKEN_LEN`], stop words, numbers and
    ///   image file extensions
    ///
    /// # Examples
    ///
    /// ```
    /// use tagnorm::Tokenizer;
    ///
    /// assert_eq!(Tokenizer::normalize_word("Puppies"), Some("puppy".to_string()));
    /// assert_eq!(Tokenizer::normalize_word("dresses"), Some("dress".to_string()));
    /// assert_eq!(Tokenizer::normalize_word("beach2"), Some("beach".to_string()));
    /// assert_eq!(Tokenizer::normalize_word("PNG"), None);
    /// assert_eq!(Tokenizer::normalize_word("the"), None);
    /// ```
    #[must_use]
    pub fn normalize_word(word: &str) -> Option<String> {
        let lowered = word.to_lowercase();
        let cleaned: String = lowered
            .trim_end_matches(|c: char| c.is_ascii_digit())
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        let singular = singularize(&cleaned);

        let keep = singular.chars().count() >= MIN_TOKEN_LEN
            && !singular.chars().all(|c| c.is_ascii_digit())
            && !is_stop_word(&cleaned)
            && !is_stop_word(&singular)
            && !IMAGE_EXTENSIONS.contains(&cleaned.as_str())
            && !IMAGE_EXTENSIONS.contains(&singular.as_str());

        keep.then_some(singular)
    }

    /// Tokenizes the interior of every `(...)`, `[...]` and `{...}` span.
    ///
    /// Each bracket kind is scanned independently, so nested or overlapping
    /// spans can yield overlapping token sets. Spans with no surviving tokens
    /// are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagnorm::Tokenizer;
    ///
    /// let sets = Tokenizer::extract_bracket_content("Lake (Morning Fog) [Canon]");
    /// assert_eq!(sets.len(), 2);
    /// assert!(sets[0].contains("fog"));
    /// assert!(sets[1].contains("canon"));
    /// ```
    #[must_use]
    pub fn extract_bracket_content(text: &str) -> Vec<IndexSet<String>> {
        BRACKET_PATTERNS
            .iter()
            .flat_map(|pattern| pattern.captures_iter(text))
            .filter_map(|captures| captures.get(1))
            .map(|interior| Self::tokenize(interior.as_str()))
            .filter(|tokens| !tokens.is_empty())
            .collect()
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || DELIMITERS.contains(&c)
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Splits `piece` at every lowercase-to-uppercase transition.
fn split_camel_case(piece: &str) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (idx, c) in piece.char_indices() {
        if let Some(p) = prev
            && p.is_lowercase()
            && c.is_uppercase()
        {
            words.push(&piece[start..idx]);
            start = idx;
        }
        prev = Some(c);
    }
    words.push(&piece[start..]);
    words
}

fn singularize(word: &str) -> String {
    for (suffix, replacement) in PLURAL_RULES {
        if word.len() > suffix.len() && word.ends_with(suffix) {
            // "dress", "glass": a double s is part of the stem
            if *suffix == "s" && word.ends_with("ss") {
                break;
            }
            let stem = &word[..word.len() - suffix.len()];
            return format!("{stem}{replacement}");
        }
    }
    word.to_string()
}
