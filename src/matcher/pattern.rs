// generic regex matching
//
// one matcher per compiled pattern, priced either per character
// (cardinality ^ length) or per match (flat cardinality).

use regex::Regex;

use super::{Match, MatchKind, Matcher, PasswordText, RegexDetail};

pub struct RegexMatcher {
    name: &'static str,
    regex: Regex,
    cardinality: u32,
    per_char: bool,
}

impl RegexMatcher {
    /// runs of three or more digits, priced per digit
    pub fn digits() -> Self {
        Self {
            name: "digits",
            regex: Regex::new(r"\d{3,}").expect("digits regex"),
            cardinality: 10,
            per_char: true,
        }
    }

    /// plausible recent years, priced per match. the pattern is frozen
    /// at 1900-2019.
    pub fn year() -> Self {
        Self {
            name: "year",
            regex: Regex::new(r"19\d\d|200\d|201\d").expect("year regex"),
            cardinality: 119,
            per_char: false,
        }
    }
}

impl Matcher for RegexMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        self.regex
            .find_iter(password.text())
            .map(|hit| {
                let i = password.char_index(hit.start());
                let j = password.char_index(hit.end()) - 1;
                let length = (j - i + 1) as f64;
                let entropy = if self.per_char {
                    length * (self.cardinality as f64).log2()
                } else {
                    (self.cardinality as f64).log2()
                };
                Match {
                    i,
                    j,
                    token: hit.as_str().to_string(),
                    entropy,
                    kind: MatchKind::Regex(RegexDetail {
                        regex_name: self.name,
                    }),
                }
            })
            .collect()
    }
}
