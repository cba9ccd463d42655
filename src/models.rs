#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub row: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedComment {
    pub row: usize,
    pub text: String,
    pub normalized: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedComment {
    pub row: usize,
    pub text: String,
    pub normalized: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredComment {
    pub row: usize,
    pub text: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub filtered: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NounComment {
    pub row: usize,
    pub text: String,
    pub normalized: String,
    pub tokens: Vec<String>,
    pub filtered: Vec<String>,
    pub nouns: Vec<String>,
}

impl Comment {
    pub fn normalized(self, normalized: String) -> NormalizedComment {
        NormalizedComment {
            row: self.row,
            text: self.text,
            normalized,
        }
    }
}

impl NormalizedComment {
    pub fn tokenized(self, tokens: Vec<String>) -> TokenizedComment {
        TokenizedComment {
            row: self.row,
            text: self.text,
            normalized: self.normalized,
            tokens,
        }
    }
}

impl TokenizedComment {
    pub fn filtered(self, filtered: Vec<String>) -> FilteredComment {
        FilteredComment {
            row: self.row,
            text: self.text,
            normalized: self.normalized,
            tokens: self.tokens,
            filtered,
        }
    }
}

impl FilteredComment {
    pub fn with_nouns(self, nouns: Vec<String>) -> NounComment {
        NounComment {
            row: self.row,
            text: self.text,
            normalized: self.normalized,
            tokens: self.tokens,
            filtered: self.filtered,
            nouns,
        }
    }
}

impl NounComment {
    /// The document handed to the phrase ranker.
    pub fn document(&self) -> String {
        self.nouns.join(" ")
    }
}
