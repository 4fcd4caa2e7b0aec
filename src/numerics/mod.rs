// entropy arithmetic shared by the matchers and the scoring engine

/// alphabet sizes per character class
const LOWER_SIZE: u32 = 26;
const UPPER_SIZE: u32 = 26;
const DIGIT_SIZE: u32 = 10;
const SYMBOL_SIZE: u32 = 33;
const UNICODE_SIZE: u32 = 100;

/// guess-count thresholds for the 0-4 score ladder
const SCORE_THRESHOLDS: [f64; 4] = [1e4, 1e7, 1e9, 1e11];

/// size of the alphabet a brute-forcer must draw from to cover `text`.
/// one bit per character class; the cardinality is the sum of the
/// classes present. non-letter, non-digit ASCII counts as symbol;
/// anything past U+007F counts as the unicode class.
pub fn cardinality(text: &str) -> u32 {
    const LOWER: u8 = 1;
    const UPPER: u8 = 2;
    const DIGIT: u8 = 4;
    const SYMBOL: u8 = 8;
    const UNICODE: u8 = 16;

    let mut classes = 0u8;
    for c in text.chars() {
        if c.is_ascii_lowercase() {
            classes |= LOWER;
        } else if c.is_ascii_uppercase() {
            classes |= UPPER;
        } else if c.is_ascii_digit() {
            classes |= DIGIT;
        } else if c <= '\u{7f}' {
            classes |= SYMBOL;
        } else {
            classes |= UNICODE;
        }
    }

    let mut card = 0u32;
    if classes & LOWER != 0 {
        card += LOWER_SIZE;
    }
    if classes & UPPER != 0 {
        card += UPPER_SIZE;
    }
    if classes & DIGIT != 0 {
        card += DIGIT_SIZE;
    }
    if classes & SYMBOL != 0 {
        card += SYMBOL_SIZE;
    }
    if classes & UNICODE != 0 {
        card += UNICODE_SIZE;
    }
    card
}

/// exact binomial coefficient C(n, k) with the symmetric reduction.
/// saturates rather than wrapping if the true value exceeds u64.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    if k == 0 {
        return 1;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for d in 0..k {
        // multiply before dividing keeps the running product exact:
        // C(n, d+1) = C(n, d) * (n - d) / (d + 1)
        result = match result.checked_mul(n - d) {
            Some(v) => v / (d + 1),
            None => return u64::MAX,
        };
    }
    result
}

/// extra bits contributed by the capitalization of `word`.
/// all-lowercase costs nothing; a single leading cap, a single trailing
/// cap, or all-caps costs one bit; any other mix pays for the number of
/// ways to place that many capitals among the word's letters.
pub fn uppercase_entropy(word: &str) -> f64 {
    let chars: Vec<char> = word.chars().collect();
    if !chars.iter().any(|c| c.is_ascii_uppercase()) {
        return 0.0;
    }

    let upper = chars.iter().filter(|c| c.is_ascii_uppercase()).count() as u64;
    let lower = chars.iter().filter(|c| c.is_ascii_lowercase()).count() as u64;

    let start_upper = chars[0].is_ascii_uppercase()
        && upper == 1
        && chars[1..].iter().all(|c| !c.is_ascii_uppercase());
    let end_upper = chars[chars.len() - 1].is_ascii_uppercase()
        && upper == 1
        && chars[..chars.len() - 1].iter().all(|c| !c.is_ascii_uppercase());
    let all_upper = lower == 0;

    if start_upper || end_upper || all_upper {
        return 1.0;
    }

    let mut possibilities = 0u64;
    for i in 0..=upper.min(lower) {
        possibilities = possibilities.saturating_add(binomial(upper + lower, i));
    }
    (possibilities as f64).log2()
}

/// map a final entropy to the 0-4 score via the guess-count thresholds
pub fn entropy_to_score(entropy: f64) -> u8 {
    let guesses = 0.5 * entropy.exp2();
    SCORE_THRESHOLDS
        .iter()
        .position(|&t| guesses < t)
        .unwrap_or(SCORE_THRESHOLDS.len()) as u8
}
