use serde::{Deserialize, Serialize};

/// One piece of a morpheme: bare kana/punctuation, or kanji with a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Furigana {
    Plain(String),
    Ruby { ruby: String, rt: String },
}

impl Furigana {
    /// Surface text, without the reading.
    pub fn surface(&self) -> &str {
        match self {
            Furigana::Plain(s) => s,
            Furigana::Ruby { ruby, .. } => ruby,
        }
    }
}

impl From<&str> for Furigana {
    fn from(s: &str) -> Self {
        Furigana::Plain(s.to_string())
    }
}

/// Surface text of one morpheme.
pub fn token_text(token: &[Furigana]) -> String {
    token.iter().map(Furigana::surface).collect()
}

/// Surface strings of a whole tokenization, one per morpheme.
pub fn token_strings(furigana: &[Vec<Furigana>]) -> Vec<String> {
    furigana.iter().map(|t| token_text(t)).collect()
}
