use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Address text folded for comparison.
///
/// Accents are stripped, letters lower-cased, and every run of punctuation or
/// whitespace becomes a single space, so `"Tayamã Park, Campo Grande/MS"`
/// reads as `"tayama park campo grande ms"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedText(String);

impl FoldedText {
    pub fn new(text: &str) -> Self {
        Self(fold(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the folded `phrase` occurs anywhere in the folded text.
    ///
    /// Plain substring search, so `"tayama"` matches `"TayamaPark"` and
    /// `"camp"` matches `"Campo"`. An empty phrase never matches.
    pub fn contains_phrase(&self, phrase: &str) -> bool {
        let phrase = fold(phrase);
        if phrase.is_empty() {
            return false;
        }
        self.0.contains(&phrase)
    }

    /// Like [`contains_phrase`](Self::contains_phrase), but the match must
    /// begin a word.
    ///
    /// Used for short codes such as a state abbreviation: `"ms"` matches
    /// `"Campo Grande/MS79000-000"` but not `"Rua Adams"`.
    pub fn contains_word_start(&self, phrase: &str) -> bool {
        let phrase = fold(phrase);
        if phrase.is_empty() {
            return false;
        }
        self.0
            .match_indices(&phrase)
            .any(|(at, _)| at == 0 || self.0.as_bytes()[at - 1] == b' ')
    }

    pub fn contains_any<S: AsRef<str>>(&self, phrases: &[S]) -> bool {
        phrases.iter().any(|p| self.contains_phrase(p.as_ref()))
    }
}

fn fold(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let mut out = String::with_capacity(stripped.len());
    for word in stripped
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().flat_map(char::to_lowercase));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold() {
        assert_eq!(
            FoldedText::new("Rua X, 123 - Tayamã  Park, CAMPO GRANDE/MS").as_str(),
            "rua x 123 tayama park campo grande ms"
        );
        assert_eq!(FoldedText::new("  ,, ").as_str(), "");
    }

    #[test]
    fn test_diacritics_and_case_ignored() {
        let text = FoldedText::new("Condomínio TAYAMA Park, São Paulo");
        assert!(text.contains_phrase("tayamã"));
        assert!(text.contains_phrase("Tayamã Park"));
        assert!(text.contains_phrase("sao paulo"));
        assert!(text.contains_phrase("CONDOMINIO"));
    }

    #[test]
    fn test_substring_match() {
        let text = FoldedText::new("Rua X, 123, Residencial TayamaPark, Campo Grande");
        assert!(text.contains_phrase("tayamã"));
        assert!(!text.contains_phrase("tayama park"));
        assert!(text.contains_phrase("camp"));
        assert!(text.contains_phrase("campo grande"));
        assert!(!text.contains_phrase("grande campo"));
    }

    #[test]
    fn test_word_start_match() {
        assert!(FoldedText::new("Campo Grande/MS79000-000").contains_word_start("MS"));
        assert!(FoldedText::new("Campo Grande, MS, Brasil").contains_word_start("ms"));
        assert!(FoldedText::new("ms").contains_word_start("MS"));

        let adams = FoldedText::new("Rua Adams, 10, Campo Grande");
        assert!(adams.contains_phrase("ms"));
        assert!(!adams.contains_word_start("ms"));
    }

    #[test]
    fn test_empty_phrase_never_matches() {
        let text = FoldedText::new("anything");
        assert!(!text.contains_phrase(""));
        assert!(!text.contains_phrase(" - "));
        assert!(!FoldedText::new("").contains_phrase("x"));
        assert!(!text.contains_word_start(""));
    }

    #[test]
    fn test_contains_any() {
        let text = FoldedText::new("Tayama, Campo Grande");
        assert!(text.contains_any(&["tayamã park", "tayama"]));
        assert!(!text.contains_any(&["centro"]));
        assert!(!text.contains_any::<&str>(&[]));
    }
}
