use std::fmt;
use std::str::FromStr;

use super::model::{BookRecord, BookTable};

// ---------------------------------------------------------------------------
// Filter parameters
// ---------------------------------------------------------------------------

/// Sentinel accepted in place of a category label to disable the category predicate.
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Exact(s.to_string()))
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{ALL_CATEGORIES}"),
            CategoryFilter::Exact(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatSelector {
    #[default]
    All,
    EBookOnly,
    PhysicalOnly,
}

impl FormatSelector {
    pub const ALL: [FormatSelector; 3] = [
        FormatSelector::All,
        FormatSelector::EBookOnly,
        FormatSelector::PhysicalOnly,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormatSelector::All => "All",
            FormatSelector::EBookOnly => "eBooks",
            FormatSelector::PhysicalOnly => "Physical",
        }
    }

    fn matches(self, book: &BookRecord) -> bool {
        match self {
            FormatSelector::All => true,
            FormatSelector::EBookOnly => book.is_ebook(),
            FormatSelector::PhysicalOnly => !book.is_ebook(),
        }
    }
}

/// Inclusive publication-year range. Always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    /// Bounds given in the wrong order are swapped.
    pub fn new(a: i32, b: i32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

impl Default for YearRange {
    fn default() -> Self {
        Self::new(i32::MIN, i32::MAX)
    }
}

/// The complete filter predicate; the three parts are AND-ed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub category: CategoryFilter,
    pub format: FormatSelector,
    pub years: YearRange,
}

impl FilterParams {
    /// Parameters that keep every dated record of `table`.
    pub fn for_table(table: &BookTable) -> Self {
        let years = table
            .year_bounds
            .map(|(lo, hi)| YearRange::new(lo, hi))
            .unwrap_or_default();
        Self {
            years,
            ..Self::default()
        }
    }

    /// A record passes when it has a year inside the range, the requested format and
    /// (unless `All`) exactly the requested category.
    pub fn matches(&self, book: &BookRecord) -> bool {
        let Some(year) = book.year else {
            return false;
        };
        if !self.years.contains(year) || !self.format.matches(book) {
            return false;
        }
        match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Exact(c) => book.categories.as_deref() == Some(c.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – the working subset
// ---------------------------------------------------------------------------

/// Read-only subset of a [`BookTable`], in table order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    table: &'a BookTable,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Every record of the table, unfiltered.
    pub fn all(table: &'a BookTable) -> Self {
        Self {
            table,
            indices: (0..table.len()).collect(),
        }
    }

    /// Keep the records of this view that satisfy `pred`, preserving order.
    pub fn retain_where(&self, mut pred: impl FnMut(&BookRecord) -> bool) -> FilteredView<'a> {
        FilteredView {
            table: self.table,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| pred(&self.table.records[i]))
                .collect(),
        }
    }

    /// An empty view over the same table.
    pub fn empty(&self) -> FilteredView<'a> {
        FilteredView {
            table: self.table,
            indices: Vec::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a BookRecord> + '_ {
        let table = self.table;
        self.indices.iter().map(move |&i| &table.records[i])
    }

    /// Positions of the visible records in the underlying table.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn table(&self) -> &'a BookTable {
        self.table
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Apply the category / format / year predicate to the whole table.
pub fn filter<'a>(table: &'a BookTable, params: &FilterParams) -> FilteredView<'a> {
    let view = FilteredView::all(table).retain_where(|b| params.matches(b));
    log::debug!(
        "filter category={} format={:?} years={}..={}: {} of {} books",
        params.category,
        params.format,
        params.years.min(),
        params.years.max(),
        view.len(),
        table.len()
    );
    view
}
