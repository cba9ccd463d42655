use regex::Regex;
use crate::config::NormalizerConfig;

pub const ZWNJ: char = '\u{200c}';

const VERB_PREFIXES: [&str; 2] = ["می", "نمی"];
const NOUN_SUFFIXES: [&str; 5] = ["ها", "های", "هایی", "تر", "ترین"];

/// Deterministic cleanup of Persian text. `normalize` is idempotent.
pub struct Normalizer {
    config: NormalizerConfig,
    dots: Regex,
    space_before_closing: Regex,
    space_after_opening: Regex,
    closing_before_letter: Regex,
    letter_before_opening: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerConfig::default())
    }
}

impl Normalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Normalizer {
            config,
            dots: Regex::new(r"\.{3,}").unwrap(),
            space_before_closing: Regex::new(r"\s+([.،؛؟!:…»)\]}])").unwrap(),
            space_after_opening: Regex::new(r"([«(\[{])\s+").unwrap(),
            closing_before_letter: Regex::new(r"([.،؛؟!:…»)\]}])(\p{L})").unwrap(),
            letter_before_opening: Regex::new(r"(\p{L})([«(\[{])").unwrap(),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        // Step 1: unify characters and punctuation marks, drop diacritics
        let text: String = text.chars()
            .filter(|c| !is_diacritic(*c))
            .map(|c| self.unify_char(c))
            .collect();

        // Step 2: collapse whitespace and stray ZWNJ
        let text = clean_spacing(&text);

        // Step 3: spacing around punctuation
        let text = if self.config.punctuation_spacing {
            let text = self.space_before_closing.replace_all(&text, "$1");
            let text = self.space_after_opening.replace_all(&text, "$1");
            let text = self.closing_before_letter.replace_all(&text, "$1 $2");
            self.letter_before_opening.replace_all(&text, "$1 $2").into_owned()
        } else {
            text
        };

        // Step 4: ellipsis, after spacing so ". . ." collapses too
        let text = self.dots.replace_all(&text, "…").into_owned();

        // Step 5: join detached affixes with ZWNJ
        let tokens: Vec<String> = text.split(' ').filter(|t| !t.is_empty()).map(String::from).collect();
        let tokens = if self.config.affix_spacing { join_affixes(tokens) } else { tokens };

        tokens.join(" ")
    }

    fn unify_char(&self, c: char) -> char {
        match c {
            'ك' => 'ک',
            'ي' | 'ى' => 'ی',
            'ة' | 'ە' => 'ه',
            '?' => '؟',
            ',' => '،',
            ';' => '؛',
            '٠'..='٩' if self.config.persian_numbers => shift_digit(c, '٠'),
            '0'..='9' if self.config.persian_numbers => shift_digit(c, '0'),
            _ => c,
        }
    }
}

fn shift_digit(c: char, zero: char) -> char {
    char::from_u32('۰' as u32 + (c as u32 - zero as u32)).unwrap_or(c)
}

// Harakat and tatweel
fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064b}'..='\u{0652}' | '\u{0640}')
}

fn clean_spacing(text: &str) -> String {
    text.split_whitespace()
        .map(|token| {
            let mut cleaned = String::with_capacity(token.len());
            for c in token.chars() {
                if c == ZWNJ && (cleaned.is_empty() || cleaned.ends_with(ZWNJ)) {
                    continue;
                }
                cleaned.push(c);
            }
            cleaned.trim_end_matches(ZWNJ).to_string()
        })
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn join_affixes(tokens: Vec<String>) -> Vec<String> {
    let mut joined: Vec<String> = Vec::with_capacity(tokens.len());
    let mut tokens = tokens.into_iter().peekable();

    while let Some(token) = tokens.next() {
        if VERB_PREFIXES.contains(&token.as_str()) {
            if let Some(next) = tokens.next_if(|next| starts_with_letter(next)) {
                joined.push(format!("{token}{ZWNJ}{next}"));
                continue;
            }
        }

        if NOUN_SUFFIXES.contains(&token.as_str()) {
            if let Some(last) = joined.last_mut().filter(|last| ends_with_letter(last)) {
                last.push(ZWNJ);
                last.push_str(&token);
                continue;
            }
        }

        joined.push(token);
    }

    joined
}

fn starts_with_letter(token: &str) -> bool {
    token.chars().next().map_or(false, char::is_alphabetic)
}

fn ends_with_letter(token: &str) -> bool {
    token.chars().last().map_or(false, char::is_alphabetic)
}
