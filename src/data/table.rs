use super::model::Dataset;

/// Shown in place of the body when a year cannot be loaded.
pub const LOAD_FAILED_MESSAGE: &str = "无法加载数据，请检查文件是否存在或格式是否正确。";

// ---------------------------------------------------------------------------
// Rendered table: what the central panel draws
// ---------------------------------------------------------------------------

/// Body of the results table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableBody {
    /// One `Vec<String>` per visible row, one string per column.
    Rows(Vec<Vec<String>>),
    /// A single full-width message row.
    Message(String),
}

/// Header and body text, independent of any widget toolkit.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub header: Vec<String>,
    pub body: TableBody,
}

impl Default for RenderedTable {
    fn default() -> Self {
        RenderedTable {
            header: Vec::new(),
            body: TableBody::Rows(Vec::new()),
        }
    }
}

impl RenderedTable {
    /// Render the rows at `visible` (indices into `dataset.rows`).
    /// Every row gets exactly one cell per column, in column order.
    pub fn from_rows(dataset: &Dataset, visible: &[usize]) -> Self {
        let rows = visible
            .iter()
            .map(|&idx| {
                dataset
                    .columns
                    .iter()
                    .map(|col| dataset.cell(idx, col).to_string())
                    .collect()
            })
            .collect();
        RenderedTable {
            header: dataset.columns.clone(),
            body: TableBody::Rows(rows),
        }
    }

    /// Header cleared, body replaced by the load-failure message.
    pub fn load_failed() -> Self {
        RenderedTable {
            header: Vec::new(),
            body: TableBody::Message(LOAD_FAILED_MESSAGE.to_string()),
        }
    }

    /// Number of body rows as drawn (a message counts as one).
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Message(_) => 1,
        }
    }
}
