// keyboard-run detection over the layout adjacency graphs

use crate::keyboard::SpatialGraph;
use crate::numerics::binomial;

use super::{Match, MatchKind, Matcher, PasswordText, SpatialDetail};

pub struct SpatialMatcher {
    graphs: Vec<SpatialGraph>,
}

impl SpatialMatcher {
    pub fn new(graphs: Vec<SpatialGraph>) -> Self {
        Self { graphs }
    }
}

impl Matcher for SpatialMatcher {
    fn find(&self, password: &PasswordText) -> Vec<Match> {
        let mut matches = Vec::new();
        for graph in &self.graphs {
            collect_runs(graph, password, &mut matches);
        }
        matches
    }
}

/// walk the password once per graph, extending a run while consecutive
/// characters stay adjacent. the cursor jumps to the run end after each
/// attempt, so runs never overlap within one graph.
fn collect_runs(graph: &SpatialGraph, password: &PasswordText, out: &mut Vec<Match>) {
    let chars = password.chars();
    let len = chars.len();
    let mut i = 0;
    while i + 1 < len {
        let mut j = i + 1;
        let mut turns = 0u32;
        let mut shifted_count = 0u32;
        let mut prev_direction: Option<usize> = None;
        while j < len {
            match graph.direction(chars[j - 1], chars[j]) {
                Some((direction, is_shifted)) => {
                    if is_shifted {
                        shifted_count += 1;
                    }
                    if prev_direction != Some(direction) {
                        turns += 1;
                        prev_direction = Some(direction);
                    }
                    j += 1;
                }
                None => break,
            }
        }
        if j - i > 2 {
            let token = password.slice(i, j - 1).to_string();
            let entropy = spatial_entropy(
                j - i,
                turns,
                shifted_count,
                graph.starting_positions(),
                graph.average_degree(),
            );
            out.push(Match {
                i,
                j: j - 1,
                token,
                entropy,
                kind: MatchKind::Spatial(SpatialDetail {
                    graph: graph.name().to_string(),
                    turns,
                    shifted_count,
                }),
            });
        }
        i = j;
    }
}

/// bits for a run of `length` keys with `turns` direction changes and
/// `shifted` shifted keys, on a graph with `s` starting positions and
/// average degree `d`. counts every shorter-or-equal run shape the
/// attacker would have to cover first.
fn spatial_entropy(length: usize, turns: u32, shifted: u32, s: f64, d: f64) -> f64 {
    let mut possibilities = 0.0f64;
    for i in 2..=length {
        let possible_turns = (turns as usize).min(i - 1);
        for j in 1..=possible_turns {
            possibilities += s * d.powi(j as i32) * binomial((i - 1) as u64, (j - 1) as u64) as f64;
        }
    }
    let mut entropy = possibilities.log2();

    if shifted > 0 {
        let x = shifted as u64;
        let unshifted = length as u64 - x;
        let mut shift_possibilities = 0u64;
        for i in 0..=x.min(unshifted) + 1 {
            shift_possibilities = shift_possibilities.saturating_add(binomial(length as u64, i));
        }
        entropy += (shift_possibilities as f64).log2();
    }
    entropy
}
