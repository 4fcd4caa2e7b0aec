// warnings, suggestions, and localization
//
// feedback is derived from the longest match of a weak decomposition.
// every user-facing string here is canonical english; the engine routes
// it through the `Localizer` before it reaches the result.

use crate::matcher::{DictionaryDetail, Match, MatchKind};

/// maps a canonical english phrase to its localized form.
/// implementations fall back to the canonical phrase on a miss.
pub trait Localizer: Send + Sync {
    fn translate(&self, canonical_en: &str, locale: &str) -> String;
}

/// the identity localizer: canonical english for every locale
pub struct PassthroughLocalizer;

impl Localizer for PassthroughLocalizer {
    fn translate(&self, canonical_en: &str, _locale: &str) -> String {
        canonical_en.to_string()
    }
}

pub const WARN_TOP10: &str = "This is a top-10 common password";
pub const WARN_TOP100: &str = "This is a top-100 common password";
pub const WARN_VERY_COMMON: &str = "This is a very common password";
pub const WARN_SIMILAR_TO_COMMON: &str = "This is similar to a commonly used password";
pub const WARN_WORD_BY_ITSELF: &str = "A word by itself is easy to guess";
pub const WARN_NAMES_BY_THEMSELVES: &str = "Names and surnames by themselves are easy to guess";
pub const WARN_COMMON_NAMES: &str = "Common names and surnames are easy to guess";
pub const WARN_STRAIGHT_ROW: &str = "Straight rows of keys are easy to guess";
pub const WARN_SHORT_KEYBOARD_PATTERN: &str = "Short keyboard patterns are easy to guess";
pub const WARN_REPEATED_CHAR: &str = "Repeats like \"aaa\" are easy to guess";
pub const WARN_REPEATED_UNIT: &str =
    "Repeats like \"abcabcabc\" are only slightly harder to guess than \"abc\"";
pub const WARN_SEQUENCE: &str = "Sequences like \"abc\" or \"6543\" are easy to guess";
pub const WARN_RECENT_YEARS: &str = "Recent years are easy to guess";
pub const WARN_DATES: &str = "Dates are often easy to guess";
pub const WARN_REVERSED_WORD: &str = "Reversed words aren't much harder to guess";

pub const SUGGEST_ANOTHER_WORD: &str = "Add another word or two. Uncommon words are better.";
pub const SUGGEST_USE_WORDS: &str = "Use a few words, avoid common phrases";
pub const SUGGEST_NO_SYMBOLS_NEEDED: &str = "No need for symbols, digits, or uppercase letters";
pub const SUGGEST_LONGER_KEYBOARD_PATTERN: &str = "Use a longer keyboard pattern with more turns";
pub const SUGGEST_AVOID_REPEATS: &str = "Avoid repeated words and characters";
pub const SUGGEST_AVOID_SEQUENCES: &str = "Avoid sequences";
pub const SUGGEST_AVOID_YEARS: &str = "Avoid recent years and years that are associated with you";
pub const SUGGEST_AVOID_DATES: &str = "Avoid dates and years that are associated with you";
pub const SUGGEST_CAPS_DONT_HELP: &str = "Capitalization doesn't help very much";
pub const SUGGEST_ALL_CAPS_EASY: &str =
    "All-uppercase is almost as easy to guess as all-lowercase";
pub const SUGGEST_PREDICTABLE_SUBSTITUTIONS: &str =
    "Predictable substitutions like '@' instead of 'a' don't help very much";

/// score labels, index = score
pub const SCORE_TEXTS: [&str; 5] = ["very weak", "weak", "fair", "good", "strong"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Feedback {
    pub warning: Option<&'static str>,
    pub suggestions: Vec<&'static str>,
}

/// feedback for a scored decomposition. strong passwords get none;
/// weak ones are diagnosed from their longest match.
pub fn for_sequence(score: u8, sequence: &[Match]) -> Feedback {
    if score > 2 {
        return Feedback::default();
    }
    let Some(longest) = longest_match(sequence) else {
        return Feedback {
            warning: None,
            suggestions: vec![SUGGEST_USE_WORDS, SUGGEST_NO_SYMBOLS_NEEDED],
        };
    };
    let mut feedback = match_feedback(longest, sequence.len() == 1, score);
    feedback.suggestions.insert(0, SUGGEST_ANOTHER_WORD);
    feedback
}

/// longest span wins; ties go to the earliest match
fn longest_match(sequence: &[Match]) -> Option<&Match> {
    let mut best: Option<&Match> = None;
    for m in sequence {
        if best.map_or(true, |b| m.span_len() > b.span_len()) {
            best = Some(m);
        }
    }
    best
}

fn match_feedback(m: &Match, is_sole: bool, score: u8) -> Feedback {
    match &m.kind {
        MatchKind::Dictionary(d) => dictionary_feedback(d, &m.token, is_sole, false, score),
        MatchKind::Leet(l) => {
            let mut fb = dictionary_feedback(&l.dictionary, &m.token, is_sole, true, score);
            fb.suggestions.push(SUGGEST_PREDICTABLE_SUBSTITUTIONS);
            fb
        }
        MatchKind::ReverseDictionary(_) => Feedback {
            warning: Some(WARN_REVERSED_WORD),
            suggestions: capitalization_advice(&m.token),
        },
        MatchKind::Spatial(s) => Feedback {
            warning: Some(if s.turns == 1 {
                WARN_STRAIGHT_ROW
            } else {
                WARN_SHORT_KEYBOARD_PATTERN
            }),
            suggestions: vec![SUGGEST_LONGER_KEYBOARD_PATTERN],
        },
        MatchKind::Repeat(r) => Feedback {
            warning: Some(if r.base_token.chars().count() == 1 {
                WARN_REPEATED_CHAR
            } else {
                WARN_REPEATED_UNIT
            }),
            suggestions: vec![SUGGEST_AVOID_REPEATS],
        },
        MatchKind::Sequence(_) => Feedback {
            warning: Some(WARN_SEQUENCE),
            suggestions: vec![SUGGEST_AVOID_SEQUENCES],
        },
        MatchKind::Regex(r) if r.regex_name == "year" => Feedback {
            warning: Some(WARN_RECENT_YEARS),
            suggestions: vec![SUGGEST_AVOID_YEARS],
        },
        MatchKind::Date(_) => Feedback {
            warning: Some(WARN_DATES),
            suggestions: vec![SUGGEST_AVOID_DATES],
        },
        MatchKind::Regex(_) | MatchKind::Bruteforce(_) => Feedback::default(),
    }
}

fn dictionary_feedback(
    d: &DictionaryDetail,
    token: &str,
    is_sole: bool,
    is_leet: bool,
    score: u8,
) -> Feedback {
    let warning = if d.dictionary_name == "passwords" {
        if is_sole && !is_leet {
            Some(if d.rank <= 10 {
                WARN_TOP10
            } else if d.rank <= 100 {
                WARN_TOP100
            } else {
                WARN_VERY_COMMON
            })
        } else if score <= 1 {
            Some(WARN_SIMILAR_TO_COMMON)
        } else {
            None
        }
    } else if d.dictionary_name.starts_with("english") {
        if is_sole {
            Some(WARN_WORD_BY_ITSELF)
        } else {
            None
        }
    } else if matches!(
        d.dictionary_name.as_str(),
        "male_names" | "female_names" | "surnames"
    ) {
        Some(if is_sole {
            WARN_NAMES_BY_THEMSELVES
        } else {
            WARN_COMMON_NAMES
        })
    } else {
        None
    };

    Feedback {
        warning,
        suggestions: capitalization_advice(token),
    }
}

/// the capitalization advisor: initial caps and all-caps buy little
fn capitalization_advice(token: &str) -> Vec<&'static str> {
    let mut suggestions = Vec::new();
    if starts_upper(token) {
        suggestions.push(SUGGEST_CAPS_DONT_HELP);
    } else if all_upper(token) && token != token.to_lowercase() {
        suggestions.push(SUGGEST_ALL_CAPS_EASY);
    }
    suggestions
}

/// one leading capital followed by no further capitals
fn starts_upper(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => chars.all(|c| !c.is_ascii_uppercase()),
        _ => false,
    }
}

fn all_upper(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| !c.is_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{RepeatDetail, SequenceDetail, SpatialDetail};

    fn dictionary_match(rank: usize, name: &str, token: &str) -> Match {
        Match {
            i: 0,
            j: token.chars().count() - 1,
            token: token.to_string(),
            entropy: (rank as f64).log2(),
            kind: MatchKind::Dictionary(DictionaryDetail {
                matched_word: token.to_lowercase(),
                rank,
                dictionary_name: name.to_string(),
                base_entropy: (rank as f64).log2(),
                uppercase_entropy: 0.0,
            }),
        }
    }

    #[test]
    fn strong_scores_get_no_feedback() {
        let m = dictionary_match(5, "passwords", "dragon");
        assert_eq!(for_sequence(3, &[m]), Feedback::default());
    }

    #[test]
    fn empty_sequence_gets_generic_advice() {
        let fb = for_sequence(0, &[]);
        assert_eq!(fb.warning, None);
        assert_eq!(
            fb.suggestions,
            vec![SUGGEST_USE_WORDS, SUGGEST_NO_SYMBOLS_NEEDED]
        );
    }

    #[test]
    fn sole_top10_password() {
        let m = dictionary_match(4, "passwords", "1234");
        let fb = for_sequence(0, &[m]);
        assert_eq!(fb.warning, Some(WARN_TOP10));
        assert_eq!(fb.suggestions[0], SUGGEST_ANOTHER_WORD);
    }

    #[test]
    fn sole_top100_and_beyond() {
        let m = dictionary_match(40, "passwords", "buster");
        assert_eq!(for_sequence(0, &[m]).warning, Some(WARN_TOP100));
        let m = dictionary_match(400, "passwords", "zebra");
        assert_eq!(for_sequence(0, &[m]).warning, Some(WARN_VERY_COMMON));
    }

    #[test]
    fn non_sole_common_password_is_similar() {
        let word = dictionary_match(40, "passwords", "buster");
        let tail = Match {
            i: 6,
            j: 6,
            token: "9".to_string(),
            entropy: 5.0,
            kind: MatchKind::Bruteforce(crate::matcher::BruteforceDetail { cardinality: 36 }),
        };
        let fb = for_sequence(1, &[word, tail]);
        assert_eq!(fb.warning, Some(WARN_SIMILAR_TO_COMMON));
    }

    #[test]
    fn english_word_by_itself() {
        let m = dictionary_match(120, "english_wikipedia", "correct");
        assert_eq!(for_sequence(1, &[m]).warning, Some(WARN_WORD_BY_ITSELF));
    }

    #[test]
    fn name_dictionaries_warn_about_names() {
        let m = dictionary_match(3, "surnames", "williams");
        assert_eq!(for_sequence(1, &[m]).warning, Some(WARN_NAMES_BY_THEMSELVES));
    }

    #[test]
    fn straight_row_versus_turny_pattern() {
        let mut m = Match {
            i: 0,
            j: 5,
            token: "qwerty".to_string(),
            entropy: 11.0,
            kind: MatchKind::Spatial(SpatialDetail {
                graph: "qwerty".to_string(),
                turns: 1,
                shifted_count: 0,
            }),
        };
        assert_eq!(for_sequence(0, &[m.clone()]).warning, Some(WARN_STRAIGHT_ROW));
        m.kind = MatchKind::Spatial(SpatialDetail {
            graph: "qwerty".to_string(),
            turns: 3,
            shifted_count: 0,
        });
        assert_eq!(
            for_sequence(0, &[m]).warning,
            Some(WARN_SHORT_KEYBOARD_PATTERN)
        );
    }

    #[test]
    fn repeat_warnings_split_on_unit_length() {
        let single = Match {
            i: 0,
            j: 3,
            token: "aaaa".to_string(),
            entropy: 6.7,
            kind: MatchKind::Repeat(RepeatDetail {
                base_token: "a".to_string(),
                repeat_count: 4,
            }),
        };
        assert_eq!(for_sequence(0, &[single]).warning, Some(WARN_REPEATED_CHAR));
        let unit = Match {
            i: 0,
            j: 8,
            token: "abcabcabc".to_string(),
            entropy: 6.9,
            kind: MatchKind::Repeat(RepeatDetail {
                base_token: "abc".to_string(),
                repeat_count: 3,
            }),
        };
        assert_eq!(for_sequence(0, &[unit]).warning, Some(WARN_REPEATED_UNIT));
    }

    #[test]
    fn sequence_and_capitalization_advice() {
        let m = Match {
            i: 0,
            j: 5,
            token: "abcdef".to_string(),
            entropy: 3.6,
            kind: MatchKind::Sequence(SequenceDetail {
                sequence_name: "lower",
                sequence_size: 26,
                ascending: true,
            }),
        };
        let fb = for_sequence(0, &[m]);
        assert_eq!(fb.warning, Some(WARN_SEQUENCE));
        assert!(fb.suggestions.contains(&SUGGEST_AVOID_SEQUENCES));

        let capped = dictionary_match(40, "english_wikipedia", "Horse");
        let fb = for_sequence(1, &[capped]);
        assert!(fb.suggestions.contains(&SUGGEST_CAPS_DONT_HELP));

        let shouted = dictionary_match(40, "english_wikipedia", "HORSE");
        let fb = for_sequence(1, &[shouted]);
        assert!(fb.suggestions.contains(&SUGGEST_ALL_CAPS_EASY));
    }

    #[test]
    fn longest_match_wins_ties_by_position() {
        let first = dictionary_match(40, "english_wikipedia", "horse");
        let mut second = dictionary_match(3, "surnames", "smith");
        second.i = 5;
        second.j = 9;
        let fb = for_sequence(1, &[first, second]);
        // both span five characters; the english match comes first and
        // english words are not flagged when they are not alone
        assert_eq!(fb.warning, None);
    }

    #[test]
    fn leet_appends_substitution_advice() {
        let m = Match {
            i: 0,
            j: 7,
            token: "p@ssw0rd".to_string(),
            entropy: 2.3,
            kind: MatchKind::Leet(crate::matcher::LeetDetail {
                dictionary: DictionaryDetail {
                    matched_word: "password".to_string(),
                    rank: 1,
                    dictionary_name: "passwords".to_string(),
                    base_entropy: 0.0,
                    uppercase_entropy: 0.0,
                },
                subs: [('@', 'a'), ('0', 'o')].into_iter().collect(),
                l33t_entropy: 2.3,
            }),
        };
        let fb = for_sequence(0, &[m]);
        assert_eq!(fb.warning, Some(WARN_SIMILAR_TO_COMMON));
        assert!(fb.suggestions.contains(&SUGGEST_PREDICTABLE_SUBSTITUTIONS));
    }

    #[test]
    fn passthrough_localizer_returns_canonical() {
        let l = PassthroughLocalizer;
        assert_eq!(l.translate(WARN_DATES, "fr-CA"), WARN_DATES);
    }
}
