use regex::Regex;

/// Splits normalized Persian text into word, number and punctuation tokens.
/// Words keep their inner ZWNJ; digits never stick to letters.
pub struct WordTokenizer {
    token_re: Regex,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl WordTokenizer {
    pub fn new() -> Self {
        WordTokenizer {
            token_re: Regex::new(
                r"[\p{L}\p{M}]+(?:\x{200c}[\p{L}\p{M}]+)*|\p{Nd}+(?:[.٫/][\p{Nd}]+)*|[^\s\x{200c}]",
            ).unwrap(),
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.token_re.find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_words_numbers_and_punctuation() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(
            tokenizer.tokenize("کرایه\u{200c}ها ۲۰درصد کمه، چرا؟"),
            vec!["کرایه\u{200c}ها", "۲۰", "درصد", "کمه", "،", "چرا", "؟"],
        );
    }

    #[test]
    fn keeps_decimal_numbers_together() {
        let tokenizer = WordTokenizer::new();
        assert_eq!(tokenizer.tokenize("۱۲٫۵ هزار"), vec!["۱۲٫۵", "هزار"]);
        assert_eq!(tokenizer.tokenize("1402/05/01"), vec!["1402/05/01"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        let tokenizer = WordTokenizer::new();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \u{200c} ").is_empty());
    }
}
