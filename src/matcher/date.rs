// date detection
//
// two passes: bare digit blocks of 4-8 characters partitioned by a
// per-length split table, and separator-delimited triples. candidate
// (day, month, year) readings are validated by plausibility rules and
// the reading closest to the reference year wins. dates fully inside a
// wider date are dropped.

use regex::Regex;

use super::{DateDetail, Match, MatchKind, Matcher, PasswordText};

pub const DATE_MIN_YEAR: i32 = 1000;
pub const DATE_MAX_YEAR: i32 = 2050;
pub const REFERENCE_YEAR: i32 = 2017;
pub const MIN_YEAR_SPACE: i32 = 10;

/// (k, l) pairs per block length: fields are s[..k], s[k..l], s[l..]
const SPLITS: &[(usize, &[(usize, usize)])] = &[
    (4, &[(1, 2), (2, 3)]),
    (5, &[(1, 3), (2, 3)]),
    (6, &[(1, 2), (2, 4), (4, 5)]),
    (7, &[(1, 3), (2, 3), (4, 5), (4, 6)]),
    (8, &[(2, 4), (4, 6)]),
];

pub struct DateMatcher {
    separated: Regex,
}

impl DateMatcher {
    pub fn new() -> Self {
        // both separators captured independently; equality is checked
        // after the match since backreferences are out of reach here
        let separated = Regex::new(r"^(\d{1,4})([\s/\\_.-])(\d{1,2})([\s/\\_.-])(\d{1,4})$")
            .expect("date regex");
        Self { separated }
    }

    fn match_without_separator(&self, password: &PasswordText, out: &mut Vec<Match>) {
        let len = password.len();
        for i in 0..len {
            for j in i + 3..len.min(i + 8) {
                let token = password.slice(i, j);
                if !token.chars().all(|c| c.is_ascii_digit()) {
                    continue;
                }
                let Some((day, month, year)) = best_split_reading(token) else {
                    continue;
                };
                out.push(date_match(i, j, token, day, month, year, ""));
            }
        }
    }

    fn match_with_separator(&self, password: &PasswordText, out: &mut Vec<Match>) {
        let len = password.len();
        for i in 0..len {
            for j in i + 5..len.min(i + 10) {
                let token = password.slice(i, j);
                let Some(caps) = self.separated.captures(token) else {
                    continue;
                };
                if caps[2] != caps[4] {
                    continue;
                }
                let fields = [
                    caps[1].parse::<i32>().unwrap_or(-1),
                    caps[3].parse::<i32>().unwrap_or(-1),
                    caps[5].parse::<i32>().unwrap_or(-1),
                ];
                let Some((day, month, year)) = map_to_dmy(fields) else {
                    continue;
                };
                out.push(date_match(i, j, token, day, month, year, &caps[2]));
            }
        }
    }
}

impl Matcher for DateMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        let mut out = Vec::new();
        self.match_without_separator(password, &mut out);
        self.match_with_separator(password, &mut out);

        // drop any date strictly inside a wider one
        let spans: Vec<(usize, usize)> = out.iter().map(|m| (m.i, m.j)).collect();
        out.retain(|m| {
            !spans
                .iter()
                .any(|&(oi, oj)| oi <= m.i && m.j <= oj && (oi, oj) != (m.i, m.j))
        });
        out
    }
}

fn date_match(
    i: usize,
    j: usize,
    token: &str,
    day: i32,
    month: i32,
    year: i32,
    separator: &str,
) -> Match {
    let year_space = (year - REFERENCE_YEAR).abs().max(MIN_YEAR_SPACE);
    let mut entropy = (year_space as f64 * 365.0).log2();
    if !separator.is_empty() {
        entropy += 2.0;
    }
    Match {
        i,
        j,
        token: token.to_string(),
        entropy,
        kind: MatchKind::Date(DateDetail {
            year,
            month,
            day,
            separator: separator.to_string(),
        }),
    }
}

/// try every split of an all-digit block, keep the valid reading whose
/// year lies nearest the reference year
fn best_split_reading(token: &str) -> Option<(i32, i32, i32)> {
    let splits = SPLITS
        .iter()
        .find(|(len, _)| *len == token.len())
        .map(|(_, s)| *s)?;

    let mut best: Option<(i32, i32, i32)> = None;
    for &(k, l) in splits {
        let fields = [
            token[..k].parse::<i32>().ok()?,
            token[k..l].parse::<i32>().ok()?,
            token[l..].parse::<i32>().ok()?,
        ];
        if let Some(reading) = map_to_dmy(fields) {
            let distance = (reading.2 - REFERENCE_YEAR).abs();
            if best.map_or(true, |b| distance < (b.2 - REFERENCE_YEAR).abs()) {
                best = Some(reading);
            }
        }
    }
    best
}

/// interpret an integer triple as (day, month, year), or reject it
fn map_to_dmy(ints: [i32; 3]) -> Option<(i32, i32, i32)> {
    if ints[1] > 31 || ints[1] <= 0 {
        return None;
    }
    let mut over_12 = 0;
    let mut over_31 = 0;
    let mut under_1 = 0;
    for &v in &ints {
        if (99 < v && v < DATE_MIN_YEAR) || v > DATE_MAX_YEAR {
            return None;
        }
        if v > 31 {
            over_31 += 1;
        }
        if v > 12 {
            over_12 += 1;
        }
        if v <= 0 {
            under_1 += 1;
        }
    }
    if over_31 >= 2 || over_12 == 3 || under_1 >= 2 {
        return None;
    }

    let year_splits = [
        (ints[2], [ints[0], ints[1]]),
        (ints[0], [ints[1], ints[2]]),
    ];

    for (year, rest) in year_splits {
        if (DATE_MIN_YEAR..=DATE_MAX_YEAR).contains(&year) {
            // a full year in the digits is decisive: if the remaining
            // two values make no (day, month), the triple is no date
            return map_ints_to_dm(rest).map(|(day, month)| (day, month, year));
        }
    }
    for (year, rest) in year_splits {
        if let Some((day, month)) = map_ints_to_dm(rest) {
            return Some((day, month, expand_two_digit_year(year)));
        }
    }
    None
}

fn map_ints_to_dm(ints: [i32; 2]) -> Option<(i32, i32)> {
    for (day, month) in [(ints[0], ints[1]), (ints[1], ints[0])] {
        if (1..=31).contains(&day) && (1..=12).contains(&month) {
            return Some((day, month));
        }
    }
    None
}

fn expand_two_digit_year(year: i32) -> i32 {
    if year > 50 {
        year + 1900
    } else {
        year + 2000
    }
}
