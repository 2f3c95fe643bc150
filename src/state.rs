use std::path::{Path, PathBuf};

use crate::data::filter::{filter, FilterParams, FilteredView};
use crate::data::loader::load_file;
use crate::data::model::BookTable;
use crate::data::search::search;
use crate::query::{QueryId, QueryParams, ResultTable};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Results are recomputed from `table` and `filters` on every interaction; nothing
/// derived from the table is cached between actions except what is on screen.
pub struct AppState {
    /// Loaded catalog (None until user loads a file).
    pub table: Option<BookTable>,

    /// File the catalog came from.
    pub source: Option<PathBuf>,

    /// Category / format / year selection.
    pub filters: FilterParams,

    /// Number of books passing the current filters.
    pub visible: usize,

    /// Query picked in the selector.
    pub selected_query: QueryId,

    /// Thresholds and keyword passed to every query.
    pub params: QueryParams,

    /// Last query result on screen.
    pub query_result: Option<ResultTable>,

    /// Title search input.
    pub search_text: String,

    /// Last search result on screen.
    pub search_result: Option<ResultTable>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(QueryParams::default())
    }
}

impl AppState {
    pub fn new(params: QueryParams) -> Self {
        Self {
            table: None,
            source: None,
            filters: FilterParams::default(),
            visible: 0,
            selected_query: QueryId::FormatSplit,
            params,
            query_result: None,
            search_text: String::new(),
            search_result: None,
            status_message: None,
        }
    }

    /// Ingest a newly loaded catalog and reset filters to cover all of it.
    pub fn set_table(&mut self, table: BookTable, source: Option<PathBuf>) {
        self.filters = FilterParams::for_table(&table);
        self.table = Some(table);
        self.source = source;
        self.query_result = None;
        self.search_result = None;
        self.status_message = None;
        self.refilter();
    }

    /// Load a snapshot; on failure the previous catalog stays in place.
    pub fn load(&mut self, path: &Path) {
        match load_file(path) {
            Ok(table) => self.set_table(table, Some(path.to_path_buf())),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// The current filtered view, if a catalog is loaded.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.table.as_ref().map(|t| filter(t, &self.filters))
    }

    /// Re-run everything on screen after a filter change.
    pub fn refilter(&mut self) {
        self.visible = self.view().map_or(0, |v| v.len());
        if self.query_result.is_some() {
            self.run_query();
        }
        if self.search_result.is_some() {
            self.run_search();
        }
    }

    /// Filter, then evaluate the selected query.
    pub fn run_query(&mut self) {
        let result = self
            .view()
            .map(|view| self.selected_query.run(&view, &self.params));
        self.query_result = result;
    }

    /// Filter, then search titles.
    pub fn run_search(&mut self) {
        let result = self.view().map(|view| {
            let hits = search(&view, &self.search_text);
            ResultTable::listing(hits.iter(), ["Publisher", "Year"], |b| {
                [b.publisher.clone().into(), b.year.into()]
            })
        });
        self.search_result = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FormatSelector;
    use crate::data::model::BookRecord;
    use crate::query::Value;

    fn catalog() -> BookTable {
        BookTable::from_records(vec![
            BookRecord {
                title: Some("Rust for Rustaceans".into()),
                year: Some(2021),
                is_ebook: Some(true),
                ..BookRecord::new("a")
            },
            BookRecord {
                title: Some("The Rust Book".into()),
                year: Some(2018),
                is_ebook: Some(false),
                ..BookRecord::new("b")
            },
            BookRecord {
                title: Some("Undated".into()),
                ..BookRecord::new("c")
            },
        ])
    }

    #[test]
    fn set_table_covers_all_dated_books() {
        let mut state = AppState::default();
        state.set_table(catalog(), None);
        assert_eq!(state.visible, 2);
        assert_eq!(state.filters.years.min(), 2018);
        assert_eq!(state.filters.years.max(), 2021);
    }

    #[test]
    fn filter_change_reruns_visible_results() {
        let mut state = AppState::default();
        state.set_table(catalog(), None);
        state.run_query();
        state.search_text = "rust".into();
        state.run_search();
        assert_eq!(state.search_result.as_ref().map(|r| r.len()), Some(2));

        state.filters.format = FormatSelector::EBookOnly;
        state.refilter();

        assert_eq!(state.visible, 1);
        let split = state.query_result.as_ref().unwrap();
        assert_eq!(
            split.column_values("Count"),
            vec![&Value::Integer(1), &Value::Integer(0)]
        );
        assert_eq!(state.search_result.as_ref().map(|r| r.len()), Some(1));
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut state = AppState::default();
        state.set_table(catalog(), None);

        let path = std::env::temp_dir().join(format!("bookscape-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        state.load(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(state.table.as_ref().map(|t| t.len()), Some(3));
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error"));
    }

    #[test]
    fn nothing_to_run_without_a_table() {
        let mut state = AppState::default();
        state.run_query();
        state.run_search();
        assert!(state.query_result.is_none());
        assert!(state.search_result.is_none());
    }
}
