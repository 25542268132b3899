use crate::config::{Capabilities, Config};
use crate::data::filter::{FilterState, Search, visible_rows};
use crate::data::loader::{self, DataSource, LoadError};
use crate::data::model::Dataset;
use crate::data::panel::FilterPanel;
use crate::data::table::RenderedTable;
use crate::reference::InfoPanel;

// ---------------------------------------------------------------------------
// Year loads
// ---------------------------------------------------------------------------

/// A year fetch the UI has asked for. Ids increase monotonically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub id: u64,
    pub year: String,
}

/// What a fetch worker hands back.
#[derive(Debug)]
pub struct LoadOutcome {
    pub request: LoadRequest,
    pub result: Result<Dataset, LoadError>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,
    pub caps: Capabilities,

    /// Where yearly documents are read from.
    pub source: DataSource,

    /// Years offered by the year selector, newest first.
    pub years: Vec<String>,

    /// Currently selected year.
    pub year: Option<String>,

    /// Loaded dataset (None until the first successful load, or after a
    /// failed one).
    pub dataset: Option<Dataset>,

    /// Per-column filter constraints.
    pub filters: FilterState,

    /// Widgets backing `filters`.
    pub panel: FilterPanel,

    /// Search box contents.
    pub search: String,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// What the central table draws.
    pub table: RenderedTable,

    /// Score lines and source link for `year`.
    pub info: InfoPanel,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a fetch for the selected year is in flight.
    pub loading: bool,

    latest_request: u64,
    pending: Option<LoadRequest>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let source = config.source();
        let years = config.years_for(&source);
        Self {
            caps: config.capabilities(),
            config,
            source,
            years,
            year: None,
            dataset: None,
            filters: FilterState::new(),
            panel: FilterPanel::default(),
            search: String::new(),
            visible_indices: Vec::new(),
            table: RenderedTable::default(),
            info: InfoPanel::default(),
            status_message: None,
            loading: false,
            latest_request: 0,
            pending: None,
        }
    }

    /// Select the configured (or newest) year; call once at startup.
    pub fn select_initial_year(&mut self) {
        match self.config.initial_year_from(&self.years) {
            Some(year) => self.select_year(&year),
            None => log::warn!("No years available in {}", self.source.describe()),
        }
    }

    /// Switch to `year`: update the info strip right away and queue a fetch.
    /// The previous dataset stays on screen until the fetch resolves.
    pub fn select_year(&mut self, year: &str) {
        self.year = Some(year.to_string());
        self.info = InfoPanel::for_year(year, &self.caps);
        self.latest_request += 1;
        self.pending = Some(LoadRequest {
            id: self.latest_request,
            year: year.to_string(),
        });
        self.loading = true;
        log::info!("Loading year {year} from {}", self.source.describe());
    }

    /// Point at a different data directory and load its newest year.
    /// A directory without any year files is rejected and the current source
    /// is kept.
    pub fn set_source(&mut self, source: DataSource) {
        let years = loader::available_years(&source).unwrap_or_else(|| self.config.years.clone());
        let Some(newest) = years.first().cloned() else {
            log::warn!("No year files in {}", source.describe());
            self.status_message = Some(format!("{} 中没有数据文件", source.describe()));
            return;
        };
        self.source = source;
        self.years = years;
        self.select_year(&newest);
    }

    /// Hand the queued fetch (if any) to the caller.
    pub fn take_pending_load(&mut self) -> Option<LoadRequest> {
        self.pending.take()
    }

    /// Apply a finished fetch. Results of superseded requests are dropped so
    /// a slow earlier fetch cannot overwrite the year currently selected.
    /// Returns whether the outcome was applied.
    pub fn apply_load(&mut self, outcome: LoadOutcome) -> bool {
        let LoadOutcome { request, result } = outcome;
        if request.id != self.latest_request {
            log::debug!(
                "Discarding stale load of {} (request {}, latest {})",
                request.year,
                request.id,
                self.latest_request
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows for {} with columns {:?}",
                    dataset.len(),
                    request.year,
                    dataset.columns
                );
                self.set_dataset(dataset);
            }
            Err(e) => self.load_failed(&request.year, &e),
        }
        true
    }

    /// Ingest a newly loaded dataset: rebuild the filter panel, clear all
    /// filters and render every row.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.panel = FilterPanel::build(&dataset, &self.config.range_column);
        self.filters.clear();
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Replace the table with the failure message. Filters are left as they
    /// were; the dataset is dropped until the next successful load.
    pub fn load_failed(&mut self, year: &str, err: &LoadError) {
        log::error!("Could not load data for year {year}: {}", error_chain(err));
        self.dataset = None;
        self.panel = FilterPanel::default();
        self.visible_indices.clear();
        self.table = RenderedTable::load_failed();
        self.status_message = Some(format!("{year}: {err}"));
    }

    /// Recompute `visible_indices` and the rendered table.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let search = self.caps.search.then(|| Search {
            column: &self.config.name_column,
            term: &self.search,
        });
        self.visible_indices = visible_rows(ds, &self.filters, search);
        self.table = RenderedTable::from_rows(ds, &self.visible_indices);
    }

    /// Replace the search term and re-render.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.refilter();
    }

    /// Copy the named control's value into the filter state and re-render.
    /// Unknown columns are ignored so filter keys stay a subset of the
    /// dataset's columns.
    pub fn control_changed(&mut self, column: &str) {
        let Some(control) = self.panel.control_mut(column) else {
            return;
        };
        control.apply(&mut self.filters);
        self.refilter();
    }

    /// Clear every filter control (the search term is kept).
    pub fn reset_filters(&mut self) {
        self.panel.reset();
        self.filters.clear();
        self.refilter();
    }

    /// Total rows in the loaded dataset.
    pub fn total_rows(&self) -> usize {
        self.dataset.as_ref().map_or(0, Dataset::len)
    }
}

/// `err` followed by each of its sources, joined with ": ".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
