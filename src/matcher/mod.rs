// match model and matcher assembly
//
// every matcher takes a prepared `PasswordText` and returns candidate
// `Match`es over code-point spans. the scoring engine later picks the
// lowest-entropy non-overlapping cover from the union of all candidates.

pub mod date;
pub mod dictionary;
pub mod leet;
pub mod pattern;
pub mod repeat;
pub mod sequence;
pub mod spatial;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use zeroize::Zeroize;

use crate::dictionary::RankedDictionary;
use crate::keyboard::SpatialGraph;
use self::dictionary::{DictionaryMatcher, ReverseDictionaryMatcher};
use self::leet::LeetMatcher;

/// password text with the per-code-point byte offsets every matcher needs.
/// spans elsewhere in the crate (`i`, `j`) are code-point indices into this.
pub struct PasswordText {
    text: String,
    chars: Vec<char>,
    /// byte offset of each code point, plus a trailing sentinel = text.len()
    offsets: Vec<usize>,
}

impl PasswordText {
    pub fn new(text: &str) -> Self {
        let mut chars = Vec::new();
        let mut offsets = Vec::new();
        for (off, c) in text.char_indices() {
            offsets.push(off);
            chars.push(c);
        }
        offsets.push(text.len());
        Self {
            text: text.to_string(),
            chars,
            offsets,
        }
    }

    /// length in code points
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// substring over the inclusive code-point span [i, j]
    pub fn slice(&self, i: usize, j: usize) -> &str {
        &self.text[self.offsets[i]..self.offsets[j + 1]]
    }

    /// code-point index of the character starting at `byte`.
    /// `byte` must be a char boundary produced by a search over `text`.
    pub fn char_index(&self, byte: usize) -> usize {
        self.offsets
            .binary_search(&byte)
            .expect("byte offset on a char boundary")
    }
}

impl Drop for PasswordText {
    fn drop(&mut self) {
        self.text.zeroize();
        self.chars.zeroize();
    }
}

/// a single pattern found in the password
#[derive(Debug, Clone, Serialize)]
pub struct Match {
    /// inclusive start, in code points
    pub i: usize,
    /// inclusive end, in code points
    pub j: usize,
    /// the exact substring password[i..=j]
    pub token: String,
    /// estimated bits this pattern costs an attacker
    pub entropy: f64,
    #[serde(flatten)]
    pub kind: MatchKind,
}

/// per-variant payload; the serialized tag doubles as the pattern name
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "pattern", rename_all = "snake_case")]
pub enum MatchKind {
    Dictionary(DictionaryDetail),
    ReverseDictionary(DictionaryDetail),
    #[serde(rename = "l33t")]
    Leet(LeetDetail),
    Spatial(SpatialDetail),
    Repeat(RepeatDetail),
    Sequence(SequenceDetail),
    Regex(RegexDetail),
    Date(DateDetail),
    Bruteforce(BruteforceDetail),
}

#[derive(Debug, Clone, Serialize)]
pub struct DictionaryDetail {
    /// lowercased form that hit the dictionary
    pub matched_word: String,
    /// 1 = most common word in its list
    pub rank: usize,
    pub dictionary_name: String,
    pub base_entropy: f64,
    pub uppercase_entropy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeetDetail {
    #[serde(flatten)]
    pub dictionary: DictionaryDetail,
    /// leet glyph -> base character actually used in this token
    pub subs: BTreeMap<char, char>,
    pub l33t_entropy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpatialDetail {
    /// layout name (qwerty, dvorak, keypad, mac_keypad)
    pub graph: String,
    pub turns: u32,
    pub shifted_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RepeatDetail {
    pub base_token: String,
    pub repeat_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SequenceDetail {
    pub sequence_name: &'static str,
    pub sequence_size: usize,
    pub ascending: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegexDetail {
    pub regex_name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateDetail {
    pub year: i32,
    pub month: i32,
    pub day: i32,
    /// empty when the date carried no separator
    pub separator: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BruteforceDetail {
    pub cardinality: u32,
}

impl Match {
    /// stable pattern tag, matching the serialized form
    pub fn pattern(&self) -> &'static str {
        match self.kind {
            MatchKind::Dictionary(_) => "dictionary",
            MatchKind::ReverseDictionary(_) => "reverse_dictionary",
            MatchKind::Leet(_) => "l33t",
            MatchKind::Spatial(_) => "spatial",
            MatchKind::Repeat(_) => "repeat",
            MatchKind::Sequence(_) => "sequence",
            MatchKind::Regex(_) => "regex",
            MatchKind::Date(_) => "date",
            MatchKind::Bruteforce(_) => "bruteforce",
        }
    }

    /// length of the matched span in code points
    pub fn span_len(&self) -> usize {
        self.j - self.i + 1
    }
}

// cleartext must not outlive the match
impl Drop for Match {
    fn drop(&mut self) {
        self.token.zeroize();
        match &mut self.kind {
            MatchKind::Dictionary(d) | MatchKind::ReverseDictionary(d) => {
                d.matched_word.zeroize();
            }
            MatchKind::Leet(l) => l.dictionary.matched_word.zeroize(),
            MatchKind::Repeat(r) => r.base_token.zeroize(),
            _ => {}
        }
    }
}

/// common contract: inspect the password, return zero or more candidates
pub trait Matcher: Send + Sync {
    fn find(&self, password: &PasswordText) -> Vec<Match>;
}

/// the long-lived matcher set, compiled once per engine.
/// per-request user inputs get a fresh dictionary matcher and a leet
/// matcher scoped to that dictionary.
pub struct MatcherSet {
    fixed: Vec<Arc<dyn Matcher>>,
}

impl MatcherSet {
    pub fn new(
        dictionaries: Vec<RankedDictionary>,
        graphs: Vec<SpatialGraph>,
    ) -> Result<Self, aho_corasick::BuildError> {
        let dictionary = Arc::new(DictionaryMatcher::new(dictionaries)?);
        let fixed: Vec<Arc<dyn Matcher>> = vec![
            dictionary.clone(),
            Arc::new(ReverseDictionaryMatcher::new(dictionary.clone())),
            Arc::new(LeetMatcher::new(dictionary)),
            Arc::new(spatial::SpatialMatcher::new(graphs)),
            Arc::new(repeat::RepeatMatcher::new()),
            Arc::new(sequence::SequenceMatcher::new()),
            Arc::new(pattern::RegexMatcher::digits()),
            Arc::new(pattern::RegexMatcher::year()),
            Arc::new(date::DateMatcher::new()),
        ];
        Ok(Self { fixed })
    }

    /// cached matchers, plus the two per-request user-input matchers
    /// when `user_inputs` is non-empty
    pub fn matchers_for(&self, user_inputs: &[&str]) -> Vec<Arc<dyn Matcher>> {
        let mut out = self.fixed.clone();
        if !user_inputs.is_empty() {
            let dict = RankedDictionary::from_words(
                "user_inputs",
                user_inputs.iter().map(|w| w.to_lowercase()),
            );
            match DictionaryMatcher::new(vec![dict]) {
                Ok(user_matcher) => {
                    let user_matcher = Arc::new(user_matcher);
                    out.push(user_matcher.clone());
                    out.push(Arc::new(LeetMatcher::new(user_matcher)));
                }
                // evaluation must not fail; a degenerate user list just
                // contributes no matches
                Err(e) => log::warn!("skipping user-input dictionary: {}", e),
            }
        }
        out
    }
}
