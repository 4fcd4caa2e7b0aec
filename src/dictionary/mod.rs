// ranked word lists and the source abstraction that loads them
//
// a ranked dictionary maps lowercase words to their frequency rank
// (1 = most common). the built-in lists ship embedded in the binary;
// callers can substitute any `DictionarySource` at engine construction.

use std::collections::HashMap;

use rayon::prelude::*;
use thiserror::Error;

/// built-in list names, loaded at engine construction
pub const BUILTIN_NAMES: &[&str] = &[
    "passwords",
    "english_wikipedia",
    "male_names",
    "female_names",
    "surnames",
    "us_tv_and_film",
];

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("unknown dictionary '{0}'")]
    UnknownDictionary(String),
    #[error("failed to read dictionary '{name}': {reason}")]
    Unreadable { name: String, reason: String },
}

/// yields one word per line, lowercase, in decreasing frequency order
pub trait DictionarySource {
    fn load(&self, name: &str) -> Result<Vec<String>, DictionaryError>;
}

/// the word lists compiled into the crate
pub struct EmbeddedSource;

impl DictionarySource for EmbeddedSource {
    fn load(&self, name: &str) -> Result<Vec<String>, DictionaryError> {
        let raw = match name {
            "passwords" => include_str!("../../data/passwords.txt"),
            "english_wikipedia" => include_str!("../../data/english_wikipedia.txt"),
            "male_names" => include_str!("../../data/male_names.txt"),
            "female_names" => include_str!("../../data/female_names.txt"),
            "surnames" => include_str!("../../data/surnames.txt"),
            "us_tv_and_film" => include_str!("../../data/us_tv_and_film.txt"),
            other => return Err(DictionaryError::UnknownDictionary(other.to_string())),
        };
        Ok(raw
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect())
    }
}

/// a word list with insertion-order-derived ranks: first word is rank 1.
/// duplicates resolve to the first insertion.
pub struct RankedDictionary {
    name: String,
    words: Vec<String>,
    ranks: HashMap<String, usize>,
}

impl RankedDictionary {
    pub fn from_words<I>(name: &str, words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut ordered = Vec::new();
        let mut ranks = HashMap::new();
        for word in words {
            if !ranks.contains_key(&word) {
                ranks.insert(word.clone(), ordered.len() + 1);
                ordered.push(word);
            }
        }
        Self {
            name: name.to_string(),
            words: ordered,
            ranks,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// words in rank order (rank = position + 1)
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn rank(&self, word: &str) -> Option<usize> {
        self.ranks.get(word).copied()
    }
}

/// load and rank every built-in list. the lists are independent, so the
/// parse-and-rank work fans out across the thread pool.
pub fn load_builtin<S>(source: &S) -> Result<Vec<RankedDictionary>, DictionaryError>
where
    S: DictionarySource + Sync,
{
    BUILTIN_NAMES
        .par_iter()
        .map(|name| {
            source
                .load(name)
                .map(|words| RankedDictionary::from_words(name, words))
        })
        .collect()
}
