// keyboard layouts and their adjacency graphs
//
// layouts are carried as literal key grids. slanted layouts (typewriter
// rows, offset horizontally) get six neighbor directions; aligned
// layouts (numeric keypads) get eight. neighbor slots keep their
// direction index even when empty so that a run's direction is
// comparable across keys.

use std::collections::HashMap;

/// slanted cell: two characters, unshifted then shifted.
/// column x of row y sits at character offset 3x + (y - 1).
const QWERTY: &str = "\
`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) -_ =+
    qQ wW eE rR tT yY uU iI oO pP [{ ]} \\|
     aA sS dD fF gG hH jJ kK lL ;: '\"
      zZ xX cC vV bB nN mM ,< .> /?";

const DVORAK: &str = "\
`~ 1! 2@ 3# 4$ 5% 6^ 7& 8* 9( 0) [{ ]}
    '\" ,< .> pP yY fF gG cC rR lL /? =+ \\|
     aA oO eE uU iI dD hH tT nN sS -_
      ;: qQ jJ kK xX bB mM wW vV zZ";

/// aligned cell: one character on a two-column stride
const KEYPAD: &str = "\
  / * -
7 8 9 +
4 5 6
1 2 3
  0 .";

const MAC_KEYPAD: &str = "\
  = / *
7 8 9 -
4 5 6 +
1 2 3
  0 .";

/// slanted hex adjacency: W, NW, NE, E, SE, SW
const SLANTED_DELTAS: [(i32, i32); 6] = [(-1, 0), (0, -1), (1, -1), (1, 0), (0, 1), (-1, 1)];

/// aligned adjacency: W, NW, N, NE, E, SE, S, SW
const ALIGNED_DELTAS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
];

/// an adjacency graph for one keyboard layout
pub struct SpatialGraph {
    name: String,
    /// key -> neighbor cell per direction; empty string = off-grid.
    /// both the shifted and unshifted character of a cell are keys.
    adjacency: HashMap<char, Vec<String>>,
    starting_positions: f64,
    average_degree: f64,
}

impl SpatialGraph {
    fn build(name: &str, layout: &str, slanted: bool) -> Self {
        let mut cells: HashMap<(i32, i32), String> = HashMap::new();
        for (row, line) in layout.lines().enumerate() {
            let y = row as i32 + 1;
            let slant = if slanted { y - 1 } else { 0 };
            for (offset, cell) in tokenize(line) {
                let x = if slanted {
                    (offset as i32 - slant) / 3
                } else {
                    offset as i32 / 2
                };
                cells.insert((x, y), cell);
            }
        }

        let deltas: &[(i32, i32)] = if slanted {
            &SLANTED_DELTAS
        } else {
            &ALIGNED_DELTAS
        };

        let mut adjacency: HashMap<char, Vec<String>> = HashMap::new();
        for (&(x, y), cell) in &cells {
            let neighbors: Vec<String> = deltas
                .iter()
                .map(|&(dx, dy)| {
                    cells
                        .get(&(x + dx, y + dy))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();
            for key in cell.chars() {
                adjacency.insert(key, neighbors.clone());
            }
        }

        let starting_positions = adjacency
            .values()
            .filter(|slots| slots.iter().any(|s| !s.is_empty()))
            .count() as f64;
        let degree_sum: usize = adjacency
            .values()
            .map(|slots| slots.iter().filter(|s| !s.is_empty()).count())
            .sum();
        let average_degree = degree_sum as f64 / starting_positions;

        Self {
            name: name.to_string(),
            adjacency,
            starting_positions,
            average_degree,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn starting_positions(&self) -> f64 {
        self.starting_positions
    }

    pub fn average_degree(&self) -> f64 {
        self.average_degree
    }

    /// direction index of the step `from` -> `to`, and whether `to` is
    /// typed shifted (appears past position 0 of its cell).
    /// None when the two keys are not adjacent on this layout.
    pub fn direction(&self, from: char, to: char) -> Option<(usize, bool)> {
        let slots = self.adjacency.get(&from)?;
        for (dir, slot) in slots.iter().enumerate() {
            if let Some(pos) = slot.chars().position(|c| c == to) {
                return Some((dir, pos >= 1));
            }
        }
        None
    }

    pub fn contains(&self, key: char) -> bool {
        self.adjacency.contains_key(&key)
    }
}

/// split a grid line into (byte offset, cell) pairs
fn tokenize(line: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in line.char_indices() {
        if c == ' ' {
            if let Some(s) = start.take() {
                out.push((s, line[s..i].to_string()));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push((s, line[s..].to_string()));
    }
    out
}

/// the four layouts every engine carries
pub fn default_graphs() -> Vec<SpatialGraph> {
    vec![
        SpatialGraph::build("qwerty", QWERTY, true),
        SpatialGraph::build("dvorak", DVORAK, true),
        SpatialGraph::build("keypad", KEYPAD, false),
        SpatialGraph::build("mac_keypad", MAC_KEYPAD, false),
    ]
}
