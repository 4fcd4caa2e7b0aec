//! password strength estimation via lowest-entropy pattern decomposition.
//!
//! a password is decomposed into dictionary words, leet variants,
//! keyboard runs, repeats, sequences, years, and dates; the cheapest
//! non-overlapping cover prices the whole password in bits, which in
//! turn drives guess counts, crack-time projections, a 0-4 score, and
//! concrete improvement feedback.

pub mod dictionary;
pub mod feedback;
pub mod keyboard;
pub mod matcher;
pub mod numerics;
pub mod scoring;

use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroize;

use dictionary::{DictionaryError, DictionarySource, EmbeddedSource};
use feedback::{Localizer, PassthroughLocalizer, SCORE_TEXTS};
use matcher::{MatcherSet, PasswordText};
use scoring::TimeBucket;

pub use dictionary::RankedDictionary;
pub use matcher::{Match, MatchKind};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
    #[error("failed to compile dictionary automaton: {0}")]
    MatcherCompile(#[from] aho_corasick::BuildError),
}

/// projected crack times under four attacker budgets
#[derive(Debug, Clone, Serialize)]
pub struct CrackTimes {
    /// online attack against rate limiting, 100 guesses/hour
    pub online_throttled_seconds: f64,
    /// online attack without throttling, 100 guesses/second
    pub online_seconds: f64,
    /// offline attack against a slow hash, 1e4 guesses/second
    pub offline_slow_seconds: f64,
    /// offline attack against a fast hash, 1e10 guesses/second
    pub offline_fast_seconds: f64,
    pub online_throttled_display: String,
    pub online_display: String,
    pub offline_slow_display: String,
    pub offline_fast_display: String,
}

/// the full verdict for one password
#[derive(Clone, Serialize)]
pub struct Evaluation {
    pub password: String,
    /// bits of the cheapest decomposition
    pub entropy: f64,
    /// expected guesses, 0.5 * 2^entropy
    pub guesses: f64,
    pub guesses_log10: f64,
    pub crack_times: CrackTimes,
    /// 0 (trivial) to 4 (strong)
    pub score: u8,
    /// non-overlapping contiguous cover of the password
    pub match_sequence: Vec<Match>,
    /// empty when there is nothing to warn about
    pub warning: String,
    pub suggestions: Vec<String>,
    pub score_text: String,
}

impl std::fmt::Debug for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluation")
            .field("password", &"[REDACTED]")
            .field("entropy", &self.entropy)
            .field("score", &self.score)
            .field("matches", &self.match_sequence.len())
            .finish()
    }
}

impl Drop for Evaluation {
    fn drop(&mut self) {
        self.password.zeroize();
    }
}

/// the reusable estimation engine. construction loads and compiles the
/// dictionaries, keyboard graphs, and fixed matchers; `evaluate` is
/// then read-only and safe to share across threads.
pub struct Engine {
    matchers: MatcherSet,
    localizer: Box<dyn Localizer>,
    locale: String,
}

impl Engine {
    pub fn new<S>(source: &S, localizer: Box<dyn Localizer>) -> Result<Self, EngineError>
    where
        S: DictionarySource + Sync,
    {
        let dictionaries = dictionary::load_builtin(source)?;
        log::debug!(
            "loaded {} dictionaries, {} words total",
            dictionaries.len(),
            dictionaries.iter().map(|d| d.len()).sum::<usize>()
        );
        let matchers = MatcherSet::new(dictionaries, keyboard::default_graphs())?;
        Ok(Self {
            matchers,
            localizer,
            locale: "en".to_string(),
        })
    }

    /// embedded word lists, canonical english messages
    pub fn with_defaults() -> Result<Self, EngineError> {
        Self::new(&EmbeddedSource, Box::new(PassthroughLocalizer))
    }

    /// language tag for result messages, e.g. "fr-CA"
    pub fn set_locale(&mut self, tag: &str) {
        self.locale = tag.to_string();
    }

    pub fn evaluate(&self, password: &str, user_inputs: &[&str]) -> Evaluation {
        let text = PasswordText::new(password);
        let matchers = self.matchers.matchers_for(user_inputs);

        let mut candidates = Vec::new();
        for m in &matchers {
            candidates.extend(m.find(&text));
        }
        log::debug!(
            "{} candidate matches over {} code points",
            candidates.len(),
            text.len()
        );

        let (entropy, match_sequence) = scoring::lowest_entropy_cover(&text, &candidates);
        let guesses = scoring::entropy_to_guesses(entropy);
        let seconds = scoring::crack_seconds(guesses);
        let score = numerics::entropy_to_score(entropy);

        let feedback = feedback::for_sequence(score, &match_sequence);
        let warning = feedback
            .warning
            .map(|w| self.localize(w))
            .unwrap_or_default();
        let suggestions = feedback
            .suggestions
            .iter()
            .map(|s| self.localize(s))
            .collect();

        Evaluation {
            password: password.to_string(),
            entropy,
            guesses,
            guesses_log10: guesses.log10(),
            crack_times: CrackTimes {
                online_throttled_seconds: seconds[0],
                online_seconds: seconds[1],
                offline_slow_seconds: seconds[2],
                offline_fast_seconds: seconds[3],
                online_throttled_display: self.display_time(seconds[0]),
                online_display: self.display_time(seconds[1]),
                offline_slow_display: self.display_time(seconds[2]),
                offline_fast_display: self.display_time(seconds[3]),
            },
            score,
            match_sequence,
            warning,
            suggestions,
            score_text: self.localize(SCORE_TEXTS[score as usize]),
        }
    }

    fn localize(&self, canonical: &str) -> String {
        self.localizer.translate(canonical, &self.locale)
    }

    fn display_time(&self, seconds: f64) -> String {
        match scoring::time_bucket(seconds) {
            TimeBucket::Instant => self.localize("instant"),
            TimeBucket::Count(n, unit) => format!("{} {}", n, self.localize(unit)),
            TimeBucket::Centuries => self.localize("centuries"),
        }
    }
}

/// convenience wrapper constructing a default engine per call
pub fn evaluate(password: &str, user_inputs: &[&str]) -> Result<Evaluation, EngineError> {
    Ok(Engine::with_defaults()?.evaluate(password, user_inputs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_password_degenerate_result() {
        let engine = Engine::with_defaults().unwrap();
        let result = engine.evaluate("", &[]);
        assert_eq!(result.entropy, 0.0);
        assert_eq!(result.guesses, 0.5);
        assert_eq!(result.score, 0);
        assert!(result.match_sequence.is_empty());
        assert!(result.crack_times.offline_fast_seconds < 1.0);
        assert_eq!(result.crack_times.online_throttled_display, "instant");
    }

    #[test]
    fn debug_redacts_password() {
        let engine = Engine::with_defaults().unwrap();
        let result = engine.evaluate("hunter2", &[]);
        let debug = format!("{:?}", result);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn locale_reaches_the_localizer() {
        struct Upper;
        impl Localizer for Upper {
            fn translate(&self, canonical_en: &str, locale: &str) -> String {
                if locale == "shout" {
                    canonical_en.to_uppercase()
                } else {
                    canonical_en.to_string()
                }
            }
        }
        let mut engine = Engine::new(&EmbeddedSource, Box::new(Upper)).unwrap();
        engine.set_locale("shout");
        let result = engine.evaluate("password", &[]);
        assert_eq!(result.score_text, "VERY WEAK");
        assert!(result.warning.chars().all(|c| !c.is_ascii_lowercase()));
    }

    #[test]
    fn evaluate_is_deterministic() {
        let engine = Engine::with_defaults().unwrap();
        let a = engine.evaluate("tr0ub4dour&3", &["troubadour"]);
        let b = engine.evaluate("tr0ub4dour&3", &["troubadour"]);
        assert_eq!(a.entropy, b.entropy);
        assert_eq!(a.score, b.score);
        assert_eq!(a.match_sequence.len(), b.match_sequence.len());
        assert_eq!(a.warning, b.warning);
    }
}
