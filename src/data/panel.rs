use super::filter::{ColumnFilter, FilterState, ScoreRange};
use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Filter controls derived from a loaded dataset
// ---------------------------------------------------------------------------

/// What kind of widget a column gets in the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlKind {
    /// Combo box: "all" plus one entry per distinct value.
    Choice {
        options: Vec<CellValue>,
        /// Index into `options`; `None` is the "all" entry.
        selected: Option<usize>,
    },
    /// Two free-text numeric inputs.
    Range { min_text: String, max_text: String },
}

/// One labelled control in the filter panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterControl {
    pub column: String,
    pub kind: ControlKind,
}

/// The full set of controls for the current dataset, one per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPanel {
    pub controls: Vec<FilterControl>,
}

impl FilterPanel {
    /// Derive controls for every column of `dataset`, in column order.
    /// `range_column` gets min/max inputs; every other column a choice list.
    pub fn build(dataset: &Dataset, range_column: &str) -> Self {
        let controls = dataset
            .columns
            .iter()
            .map(|col| {
                let kind = if col == range_column {
                    ControlKind::Range {
                        min_text: String::new(),
                        max_text: String::new(),
                    }
                } else {
                    ControlKind::Choice {
                        options: dataset.distinct_values(col).into_iter().collect(),
                        selected: None,
                    }
                };
                FilterControl {
                    column: col.clone(),
                    kind,
                }
            })
            .collect();
        FilterPanel { controls }
    }

    pub fn control_mut(&mut self, column: &str) -> Option<&mut FilterControl> {
        self.controls.iter_mut().find(|c| c.column == column)
    }

    /// Put every control back to its default (all / empty bounds).
    pub fn reset(&mut self) {
        for control in &mut self.controls {
            match &mut control.kind {
                ControlKind::Choice { selected, .. } => *selected = None,
                ControlKind::Range { min_text, max_text } => {
                    min_text.clear();
                    max_text.clear();
                }
            }
        }
    }
}

impl FilterControl {
    /// The constraint this control currently expresses.
    pub fn to_filter(&self) -> ColumnFilter {
        match &self.kind {
            ControlKind::Choice { options, selected } => {
                ColumnFilter::Match(selected.and_then(|i| options.get(i)).cloned())
            }
            ControlKind::Range { min_text, max_text } => ColumnFilter::Range(ScoreRange {
                min: parse_bound(min_text),
                max: parse_bound(max_text),
            }),
        }
    }

    /// Write this control's constraint into `filters`.
    pub fn apply(&self, filters: &mut FilterState) {
        filters.insert(self.column.clone(), self.to_filter());
    }
}

/// A numeric input's bound: blank or non-numeric text means "no bound".
pub fn parse_bound(text: &str) -> Option<f64> {
    let t = text.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok().filter(|v| v.is_finite())
}
