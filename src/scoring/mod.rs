// lowest-entropy decomposition and crack-time derivation
//
// dynamic programming over password prefixes: min_entropy[k] is the
// cheapest way to cover password[0..=k] from candidate matches plus
// per-character brute force. gaps in the walked-back sequence are
// filled with synthetic brute-force matches.

use crate::matcher::{BruteforceDetail, Match, MatchKind, PasswordText};
use crate::numerics::cardinality;

/// attacker budgets, guesses per second
const ONLINE_THROTTLED_RATE: f64 = 100.0 / 3600.0;
const ONLINE_RATE: f64 = 100.0;
const OFFLINE_SLOW_RATE: f64 = 1e4;
const OFFLINE_FAST_RATE: f64 = 10e9;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const YEAR: f64 = 365.2425 * DAY;
const MONTH: f64 = YEAR / 12.0;
const CENTURY: f64 = 100.0 * YEAR;

/// pick the cheapest non-overlapping cover of the password.
/// returns the final entropy and the contiguous match sequence.
pub fn lowest_entropy_cover(password: &PasswordText, candidates: &[Match]) -> (f64, Vec<Match>) {
    let len = password.len();
    if len == 0 {
        return (0.0, Vec::new());
    }

    let bf_cardinality = cardinality(password.text()) as f64;
    let lg_bf = bf_cardinality.log2();

    let mut min_entropy = vec![0.0f64; len];
    let mut best_match: Vec<Option<&Match>> = vec![None; len];

    for k in 0..len {
        // brute-forcing one more character is always available
        min_entropy[k] = if k == 0 { 0.0 } else { min_entropy[k - 1] } + lg_bf;
        for m in candidates.iter().filter(|m| m.j == k) {
            let candidate = if m.i == 0 {
                m.entropy
            } else {
                min_entropy[m.i - 1] + m.entropy
            };
            if candidate < min_entropy[k] {
                min_entropy[k] = candidate;
                best_match[k] = Some(m);
            }
        }
    }

    let mut chosen: Vec<Match> = Vec::new();
    let mut k = len as isize - 1;
    while k >= 0 {
        match best_match[k as usize] {
            Some(m) => {
                chosen.push(m.clone());
                k = m.i as isize - 1;
            }
            None => k -= 1,
        }
    }
    chosen.reverse();

    let mut sequence = Vec::new();
    if chosen.is_empty() {
        // nothing matched: one brute-force match spans everything. only
        // this degenerate match takes the full power, so overflow
        // collapses it (and the result) to +inf
        let mut bf = bruteforce_match(password, 0, len - 1, bf_cardinality);
        bf.entropy = bf_cardinality.powi(len as i32).log2();
        let entropy = bf.entropy;
        sequence.push(bf);
        return (entropy, sequence);
    } else {
        let mut pos = 0;
        for m in chosen {
            if m.i > pos {
                sequence.push(bruteforce_match(password, pos, m.i - 1, bf_cardinality));
            }
            pos = m.j + 1;
            sequence.push(m);
        }
        if pos < len {
            sequence.push(bruteforce_match(password, pos, len - 1, bf_cardinality));
        }
    }

    (min_entropy[len - 1], sequence)
}

fn bruteforce_match(password: &PasswordText, i: usize, j: usize, bf_cardinality: f64) -> Match {
    let gap = (j - i + 1) as f64;
    // per-character form: stays finite for any gap length, matching the
    // additive prefix costs in the search above
    let entropy = gap * bf_cardinality.log2();
    Match {
        i,
        j,
        token: password.slice(i, j).to_string(),
        entropy,
        kind: MatchKind::Bruteforce(BruteforceDetail {
            cardinality: bf_cardinality as u32,
        }),
    }
}

pub fn entropy_to_guesses(entropy: f64) -> f64 {
    0.5 * entropy.exp2()
}

/// projected seconds under the four attacker budgets, slowest first
pub fn crack_seconds(guesses: f64) -> [f64; 4] {
    [
        guesses / ONLINE_THROTTLED_RATE,
        guesses / ONLINE_RATE,
        guesses / OFFLINE_SLOW_RATE,
        guesses / OFFLINE_FAST_RATE,
    ]
}

/// a crack time reduced to something a person can read.
/// counts carry a canonical unit word for the localizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Instant,
    Count(u64, &'static str),
    Centuries,
}

pub fn time_bucket(seconds: f64) -> TimeBucket {
    if seconds < MINUTE {
        TimeBucket::Instant
    } else if seconds < HOUR {
        TimeBucket::Count(1 + (seconds / MINUTE).ceil() as u64, "minutes")
    } else if seconds < DAY {
        TimeBucket::Count(1 + (seconds / HOUR).ceil() as u64, "hours")
    } else if seconds < MONTH {
        TimeBucket::Count(1 + (seconds / DAY).ceil() as u64, "days")
    } else if seconds < YEAR {
        TimeBucket::Count(1 + (seconds / MONTH).ceil() as u64, "months")
    } else if seconds < CENTURY {
        TimeBucket::Count(1 + (seconds / YEAR).ceil() as u64, "years")
    } else {
        TimeBucket::Centuries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{DictionaryDetail, SequenceDetail};

    fn dictionary_match(i: usize, j: usize, token: &str, entropy: f64) -> Match {
        Match {
            i,
            j,
            token: token.to_string(),
            entropy,
            kind: MatchKind::Dictionary(DictionaryDetail {
                matched_word: token.to_lowercase(),
                rank: 1,
                dictionary_name: "passwords".to_string(),
                base_entropy: entropy,
                uppercase_entropy: 0.0,
            }),
        }
    }

    #[test]
    fn empty_password_scores_zero() {
        let pw = PasswordText::new("");
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[]);
        assert_eq!(entropy, 0.0);
        assert!(sequence.is_empty());
    }

    #[test]
    fn no_candidates_single_bruteforce() {
        let pw = PasswordText::new("zqvx");
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[]);
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence[0].pattern(), "bruteforce");
        assert_eq!(sequence[0].token, "zqvx");
        assert!((entropy - 4.0 * 26f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn cheap_match_beats_bruteforce() {
        let pw = PasswordText::new("hunter");
        let m = dictionary_match(0, 5, "hunter", 5.0);
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[m]);
        assert!((entropy - 5.0).abs() < 1e-9);
        assert_eq!(sequence.len(), 1);
        assert_eq!(sequence[0].pattern(), "dictionary");
    }

    #[test]
    fn expensive_match_loses_to_bruteforce() {
        let pw = PasswordText::new("zq");
        let m = dictionary_match(0, 1, "zq", 500.0);
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[m]);
        assert!((entropy - 2.0 * 26f64.log2()).abs() < 1e-9);
        assert_eq!(sequence[0].pattern(), "bruteforce");
    }

    #[test]
    fn gaps_filled_with_bruteforce() {
        let pw = PasswordText::new("xxhunterxx");
        let m = dictionary_match(2, 7, "hunter", 3.0);
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[m]);
        let patterns: Vec<&str> = sequence.iter().map(|m| m.pattern()).collect();
        assert_eq!(patterns, vec!["bruteforce", "dictionary", "bruteforce"]);
        // cover is contiguous
        assert_eq!(sequence[0].i, 0);
        for w in sequence.windows(2) {
            assert_eq!(w[1].i, w[0].j + 1);
        }
        assert_eq!(sequence.last().unwrap().j, 9);
        let expected = 4.0 * 26f64.log2() + 3.0;
        assert!((entropy - expected).abs() < 1e-9);
    }

    #[test]
    fn adjacent_matches_compose() {
        let pw = PasswordText::new("abcdefabcdef");
        let first = Match {
            i: 0,
            j: 5,
            token: "abcdef".to_string(),
            entropy: 1.0 + 6f64.log2(),
            kind: MatchKind::Sequence(SequenceDetail {
                sequence_name: "lower",
                sequence_size: 26,
                ascending: true,
            }),
        };
        let second = dictionary_match(6, 11, "abcdef", 2.0);
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[first.clone(), second.clone()]);
        assert_eq!(sequence.len(), 2);
        assert!((entropy - (first.entropy + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn overlapping_candidates_pick_cheapest_cover() {
        let pw = PasswordText::new("abcd");
        let whole = dictionary_match(0, 3, "abcd", 10.0);
        let left = dictionary_match(0, 1, "ab", 1.0);
        let right = dictionary_match(2, 3, "cd", 1.0);
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[whole, left, right]);
        assert_eq!(sequence.len(), 2);
        assert!((entropy - 2.0).abs() < 1e-9);
    }

    #[test]
    fn guesses_halve_the_space() {
        assert_eq!(entropy_to_guesses(1.0), 1.0);
        assert_eq!(entropy_to_guesses(0.0), 0.5);
        assert!(entropy_to_guesses(f64::INFINITY).is_infinite());
    }

    #[test]
    fn crack_seconds_are_ordered() {
        let [a, b, c, d] = crack_seconds(1e6);
        assert!(a > b && b > c && c > d);
        assert_eq!(b, 1e4); // 1e6 guesses at 100/s
    }

    #[test]
    fn bucket_ladder() {
        assert_eq!(time_bucket(10.0), TimeBucket::Instant);
        assert_eq!(time_bucket(90.0), TimeBucket::Count(3, "minutes"));
        assert_eq!(time_bucket(2.0 * HOUR), TimeBucket::Count(3, "hours"));
        assert_eq!(time_bucket(3.0 * DAY), TimeBucket::Count(4, "days"));
        assert_eq!(time_bucket(2.5 * MONTH), TimeBucket::Count(4, "months"));
        assert_eq!(time_bucket(5.0 * YEAR), TimeBucket::Count(6, "years"));
        assert_eq!(time_bucket(300.0 * YEAR), TimeBucket::Centuries);
        assert_eq!(time_bucket(f64::INFINITY), TimeBucket::Centuries);
    }

    #[test]
    fn long_gap_beside_a_match_stays_finite() {
        // a matched head plus a tail long enough that the full power
        // 26^300 would overflow: the gap is priced per character, so
        // the cover's entropies still sum to the result
        let tail: String = (0..300)
            .map(|idx| char::from(b'a' + (idx % 23) as u8))
            .collect();
        let text = format!("hunter{}", tail);
        let pw = PasswordText::new(&text);
        let head = dictionary_match(0, 5, "hunter", 3.0);
        let (entropy, sequence) = lowest_entropy_cover(&pw, &[head]);
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[1].pattern(), "bruteforce");
        assert!(sequence[1].entropy.is_finite());
        assert!(entropy.is_finite());
        let sum: f64 = sequence.iter().map(|m| m.entropy).sum();
        assert!(
            (sum - entropy).abs() < 1e-6,
            "match entropies sum to {} but the result is {}",
            sum,
            entropy
        );
    }

    #[test]
    fn long_random_input_overflows_to_infinity() {
        let text: String = (0..400)
            .map(|idx| char::from(b'a' + (idx % 23) as u8))
            .collect();
        let pw = PasswordText::new(&text);
        let (_, sequence) = lowest_entropy_cover(&pw, &[]);
        assert_eq!(sequence.len(), 1);
        assert!(sequence[0].entropy.is_infinite());
    }
}
