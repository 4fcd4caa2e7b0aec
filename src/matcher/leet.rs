// leet-speak matching
//
// enumerate every way the leet glyphs present in the password could map
// back to base characters, run the dictionary automaton over each
// translated form, and re-price the hits for the substitution and
// capitalization actually used.

use std::collections::BTreeMap;
use std::sync::Arc;

use memchr::memchr_iter;

use crate::numerics::{binomial, uppercase_entropy};

use super::dictionary::DictionaryMatcher;
use super::{LeetDetail, Match, MatchKind, Matcher, PasswordText};

/// base character -> glyphs that can stand in for it
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('a', "4@"),
    ('b', "86"),
    ('c', "({[<"),
    ('e', "3"),
    ('g', "69"),
    ('i', "1!|"),
    ('l', "1|7"),
    ('o', "0"),
    ('q', "9"),
    ('s', "$5"),
    ('t', "+7"),
    ('x', "%"),
    ('z', "2"),
];

pub struct LeetMatcher {
    dictionary: Arc<DictionaryMatcher>,
}

impl LeetMatcher {
    pub fn new(dictionary: Arc<DictionaryMatcher>) -> Self {
        Self { dictionary }
    }
}

impl Matcher for LeetMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        let relevant = relevant_substitutions(password.text());
        if relevant.is_empty() {
            return Vec::new();
        }

        let mut out: Vec<Match> = Vec::new();
        for map in enumerate_maps(&relevant) {
            let translated: String = password
                .chars()
                .iter()
                .map(|&c| map.get(&c).copied().unwrap_or(c))
                .collect();
            let translated = PasswordText::new(&translated);

            for hit in self.dictionary.find(&translated) {
                let detail = match &hit.kind {
                    MatchKind::Dictionary(d) => d.clone(),
                    _ => continue,
                };
                let token = password.slice(hit.i, hit.j).to_string();

                let used: BTreeMap<char, char> = map
                    .iter()
                    .filter(|(glyph, _)| token.contains(**glyph))
                    .map(|(&glyph, &base)| (glyph, base))
                    .collect();
                if used.is_empty() {
                    // the hit exists without any substitution; the plain
                    // dictionary matcher already reported it
                    continue;
                }
                if let Some(prev) = out.last() {
                    if prev.i == hit.i && prev.j == hit.j && prev.token == token {
                        continue;
                    }
                }

                let l33t_entropy = substitution_entropy(&token, &used);
                let upper = uppercase_entropy(&token);
                let entropy = hit.entropy - detail.uppercase_entropy + upper + l33t_entropy;
                let mut dictionary = detail;
                dictionary.uppercase_entropy = upper;

                out.push(Match {
                    i: hit.i,
                    j: hit.j,
                    token,
                    entropy,
                    kind: MatchKind::Leet(LeetDetail {
                        dictionary,
                        subs: used,
                        l33t_entropy,
                    }),
                });
            }
        }
        out
    }
}

/// restrict the substitution table to glyphs that occur in the password
fn relevant_substitutions(password: &str) -> Vec<(char, Vec<char>)> {
    SUBSTITUTIONS
        .iter()
        .filter_map(|&(base, glyphs)| {
            let present: Vec<char> = glyphs.chars().filter(|&g| password.contains(g)).collect();
            if present.is_empty() {
                None
            } else {
                Some((base, present))
            }
        })
        .collect()
}

/// every distinct glyph -> base assignment. when a later base can also
/// produce an already-assigned glyph, the existing maps fork.
fn enumerate_maps(relevant: &[(char, Vec<char>)]) -> Vec<BTreeMap<char, char>> {
    let mut maps: Vec<BTreeMap<char, char>> = vec![BTreeMap::new()];
    for (base, glyphs) in relevant {
        for &glyph in glyphs {
            let mut forks = Vec::new();
            for map in maps.iter_mut() {
                if map.contains_key(&glyph) {
                    let mut fork = map.clone();
                    fork.insert(glyph, *base);
                    forks.push(fork);
                } else {
                    map.insert(glyph, *base);
                }
            }
            maps.extend(forks);
        }
    }
    maps
}

/// bits bought by the substitutions used in `token`. the glyph and base
/// counts carry over from pair to pair rather than resetting; later
/// pairs therefore price against the running totals.
fn substitution_entropy(token: &str, used: &BTreeMap<char, char>) -> f64 {
    let bytes = token.as_bytes();
    let mut possibilities = 0u64;
    let mut subbed = 0u64;
    let mut unsubbed = 0u64;
    for (&glyph, &base) in used {
        subbed += memchr_iter(glyph as u8, bytes).count() as u64;
        unsubbed += memchr_iter(base as u8, bytes).count() as u64;
        for i in 0..=subbed.min(unsubbed) + 1 {
            possibilities = possibilities.saturating_add(binomial(subbed + unsubbed, i));
        }
    }
    (possibilities as f64).log2().max(1.0)
}
