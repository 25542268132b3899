use std::collections::BTreeMap;

use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Filter predicate: one constraint per column
// ---------------------------------------------------------------------------

/// Numeric bounds for the range column. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ScoreRange {
    /// Whether a parsed score passes the bounds. Unparsable scores (`None`)
    /// always pass: there is nothing to compare them against.
    pub fn admits(&self, score: Option<f64>) -> bool {
        let Some(score) = score else {
            return true;
        };
        if self.min.is_some_and(|min| score < min) {
            return false;
        }
        if self.max.is_some_and(|max| score > max) {
            return false;
        }
        true
    }
}

/// Active constraint for a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnFilter {
    /// Exact match under loose equality. `None` is the "all" choice.
    Match(Option<CellValue>),
    /// Min/max bounds, only used for the range column.
    Range(ScoreRange),
}

impl ColumnFilter {
    /// Whether `value` passes this constraint.
    pub fn admits(&self, value: &CellValue) -> bool {
        match self {
            ColumnFilter::Match(None) => true,
            ColumnFilter::Match(Some(wanted)) => value.loose_eq(wanted),
            ColumnFilter::Range(range) => range.admits(value.parse_score()),
        }
    }
}

/// Per-column filter state: column_name → constraint.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, ColumnFilter>;

/// Case-insensitive substring search on one column.
#[derive(Debug, Clone, Copy)]
pub struct Search<'a> {
    pub column: &'a str,
    pub term: &'a str,
}

/// Return indices of rows that pass the search and every active filter.
///
/// A row passes when:
/// * no search is given, the term is empty, or the lowercased search-column
///   value contains the lowercased term (missing value → empty string)
/// * for every column in `filters`, [`ColumnFilter::admits`] accepts the
///   row's value for that column (missing value → null)
pub fn visible_rows(dataset: &Dataset, filters: &FilterState, search: Option<Search<'_>>) -> Vec<usize> {
    let needle = search
        .filter(|s| !s.term.is_empty())
        .map(|s| (s.column, s.term.to_lowercase()));

    (0..dataset.len())
        .filter(|&idx| {
            if let Some((column, term)) = &needle {
                let haystack = match dataset.cell(idx, column) {
                    CellValue::Null => String::new(),
                    v => v.to_string().to_lowercase(),
                };
                if !haystack.contains(term.as_str()) {
                    return false;
                }
            }
            filters
                .iter()
                .all(|(col, filter)| filter.admits(dataset.cell(idx, col)))
        })
        .collect()
}
