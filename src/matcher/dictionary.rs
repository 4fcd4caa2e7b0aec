// ranked-word matching
//
// all dictionaries compile into one case-insensitive aho-corasick
// automaton; an overlapping search then yields every substring of the
// password present in any list, which is exactly the exhaustive
// (i, j) lookup the entropy model needs. pattern ids map back to
// (dictionary, word, rank).

use std::sync::Arc;

use aho_corasick::AhoCorasick;

use crate::dictionary::RankedDictionary;
use crate::numerics::uppercase_entropy;

use super::{DictionaryDetail, Match, MatchKind, Matcher, PasswordText};

struct Entry {
    dictionary: usize,
    word: String,
    rank: usize,
}

pub struct DictionaryMatcher {
    automaton: AhoCorasick,
    entries: Vec<Entry>,
    names: Vec<String>,
}

impl DictionaryMatcher {
    pub fn new(dictionaries: Vec<RankedDictionary>) -> Result<Self, aho_corasick::BuildError> {
        let mut entries = Vec::new();
        let mut names = Vec::new();
        let mut patterns: Vec<&str> = Vec::new();

        for dict in &dictionaries {
            let dict_index = names.len();
            names.push(dict.name().to_string());
            for (pos, word) in dict.words().iter().enumerate() {
                entries.push(Entry {
                    dictionary: dict_index,
                    word: word.clone(),
                    rank: pos + 1,
                });
                patterns.push(word);
            }
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)?;

        Ok(Self {
            automaton,
            entries,
            names,
        })
    }
}

impl Matcher for DictionaryMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        let mut out = Vec::new();
        for hit in self.automaton.find_overlapping_iter(password.text()) {
            let entry = &self.entries[hit.pattern().as_usize()];
            let i = password.char_index(hit.start());
            let j = password.char_index(hit.end()) - 1;
            let token = password.slice(i, j).to_string();
            let base_entropy = (entry.rank as f64).log2();
            let upper = uppercase_entropy(&token);
            out.push(Match {
                i,
                j,
                token,
                entropy: base_entropy + upper,
                kind: MatchKind::Dictionary(DictionaryDetail {
                    matched_word: entry.word.clone(),
                    rank: entry.rank,
                    dictionary_name: self.names[entry.dictionary].clone(),
                    base_entropy,
                    uppercase_entropy: upper,
                }),
            });
        }
        out
    }
}

/// dictionary lookup over the reversed password. a hit's span maps back
/// onto the original string; typing a word backwards buys one extra bit.
pub struct ReverseDictionaryMatcher {
    inner: Arc<DictionaryMatcher>,
}

impl ReverseDictionaryMatcher {
    pub fn new(inner: Arc<DictionaryMatcher>) -> Self {
        Self { inner }
    }
}

impl Matcher for ReverseDictionaryMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        let reversed: String = password.text().chars().rev().collect();
        let reversed = PasswordText::new(&reversed);
        let len = password.len();

        let mut out = Vec::new();
        for hit in self.inner.find(&reversed) {
            let detail = match &hit.kind {
                MatchKind::Dictionary(d) => d.clone(),
                _ => continue,
            };
            let i = len - 1 - hit.j;
            let j = len - 1 - hit.i;
            let token = password.slice(i, j).to_string();
            // the reversed token reads forwards, so palindromes gain nothing
            if token == hit.token {
                continue;
            }
            let upper = uppercase_entropy(&token);
            let entropy = detail.base_entropy + upper + 1.0;
            out.push(Match {
                i,
                j,
                token,
                entropy,
                kind: MatchKind::ReverseDictionary(DictionaryDetail {
                    uppercase_entropy: upper,
                    ..detail
                }),
            });
        }
        out
    }
}
