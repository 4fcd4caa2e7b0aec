// ascending/descending alphabet runs
//
// a run continues while each character sits exactly one position after
// (or before) its predecessor in one of the known sequences, using the
// first occurrence of a character when the sequence repeats one.

use super::{Match, MatchKind, Matcher, PasswordText, SequenceDetail};

const SEQUENCES: &[(&str, &str)] = &[
    ("lower", "abcdefghijklmnopqrstuvwxyz"),
    ("upper", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
    ("digits", "01234567890"),
];

pub struct SequenceMatcher;

impl SequenceMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for SequenceMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        let chars = password.chars();
        let len = chars.len();
        let mut out = Vec::new();
        let mut i = 0;

        while i + 1 < len {
            let Some((seq_index, direction)) = step_direction(chars[i], chars[i + 1]) else {
                i += 1;
                continue;
            };

            let (_, seq) = SEQUENCES[seq_index];
            let mut j = i + 1;
            while j + 1 < len && continues(seq, chars[j], chars[j + 1], direction) {
                j += 1;
            }

            if j - i + 1 > 2 {
                let token = password.slice(i, j).to_string();
                let ascending = direction == 1;
                let entropy = sequence_entropy(&token, ascending);
                let (name, seq) = SEQUENCES[seq_index];
                out.push(Match {
                    i,
                    j,
                    token,
                    entropy,
                    kind: MatchKind::Sequence(SequenceDetail {
                        sequence_name: name,
                        sequence_size: seq.chars().count(),
                        ascending,
                    }),
                });
            }
            i = j + 1;
        }
        out
    }
}

/// first sequence in which `b` sits exactly one step from `a`,
/// with the step direction (+1 ascending, -1 descending)
fn step_direction(a: char, b: char) -> Option<(usize, i32)> {
    for (index, (_, seq)) in SEQUENCES.iter().enumerate() {
        let ia = seq.chars().position(|c| c == a);
        let ib = seq.chars().position(|c| c == b);
        if let (Some(ia), Some(ib)) = (ia, ib) {
            let delta = ib as i32 - ia as i32;
            if delta == 1 || delta == -1 {
                return Some((index, delta));
            }
        }
    }
    None
}

fn continues(seq: &str, a: char, b: char, direction: i32) -> bool {
    let ia = seq.chars().position(|c| c == a);
    let ib = seq.chars().position(|c| c == b);
    matches!((ia, ib), (Some(ia), Some(ib)) if ib as i32 - ia as i32 == direction)
}

/// trivial starts ('a', '1') cost one bit; otherwise pay for the
/// alphabet, plus one bit for running backwards, plus the length
fn sequence_entropy(token: &str, ascending: bool) -> f64 {
    let first = token.chars().next().expect("non-empty token");
    let mut entropy = if first == 'a' || first == '1' {
        1.0
    } else if first.is_ascii_digit() {
        10f64.log2()
    } else if first.is_ascii_lowercase() {
        26f64.log2()
    } else {
        26f64.log2() + 1.0
    };
    if !ascending {
        entropy += 1.0;
    }
    entropy + (token.chars().count() as f64).log2()
}
