//! Token counting over delimited tag cells.

use std::collections::HashMap;

/// Separator between tags inside one cell, e.g. `"Rust;Go;SQL"`.
pub const TOKEN_SEPARATOR: char = ';';

/// Ranked token frequencies for one column.
///
/// `labels` and `counts` are parallel and sorted by descending count; tokens
/// with equal counts keep the order in which they were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyResult {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
    /// Cells that were present and non-empty before splitting.
    pub total_non_empty_rows: usize,
    /// Unique tokens seen, including those cut by `top_n`.
    pub distinct_token_count: usize,
}

impl FrequencyResult {
    /// Number of ranked entries returned.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates `(label, count)` pairs in rank order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.counts.iter().copied())
    }
}

/// Running token counts in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TokenTally {
    /// `(token, count)` in the order tokens were first seen.
    entries: Vec<(String, usize)>,
    /// Position of each token in `entries`.
    positions: HashMap<String, usize>,
    non_empty_rows: usize,
}

impl TokenTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tallies every cell of a column.
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = Option<&'a str>>) -> Self {
        let mut tally = Self::new();
        for cell in cells {
            tally.add_cell(cell);
        }
        tally
    }

    /// Adds one cell. Missing and empty cells are ignored; otherwise the cell
    /// is split on [`TOKEN_SEPARATOR`], each piece trimmed, and every
    /// non-empty piece counted by exact text.
    pub fn add_cell(&mut self, cell: Option<&str>) {
        let Some(cell) = cell.filter(|value| !value.is_empty()) else {
            return;
        };
        self.non_empty_rows += 1;

        for token in cell
            .split(TOKEN_SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            self.add_token(token);
        }
    }

    fn add_token(&mut self, token: &str) {
        match self.positions.get(token) {
            Some(&position) => self.entries[position].1 += 1,
            None => {
                self.positions.insert(token.to_string(), self.entries.len());
                self.entries.push((token.to_string(), 1));
            }
        }
    }

    /// Count for one token, if it was seen.
    pub fn count(&self, token: &str) -> Option<usize> {
        self.positions
            .get(token)
            .map(|&position| self.entries[position].1)
    }

    pub fn distinct(&self) -> usize {
        self.entries.len()
    }

    pub fn non_empty_rows(&self) -> usize {
        self.non_empty_rows
    }

    /// Ranks tokens by descending count and keeps the first `top_n`.
    pub fn into_ranked(self, top_n: usize) -> FrequencyResult {
        let distinct_token_count = self.entries.len();
        let mut ranked = self.entries;

        // Stable: equal counts stay in first-seen order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(top_n);

        let (labels, counts) = ranked.into_iter().unzip();
        FrequencyResult {
            labels,
            counts,
            total_non_empty_rows: self.non_empty_rows,
            distinct_token_count,
        }
    }
}
