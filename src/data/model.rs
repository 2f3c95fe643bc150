use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Placeholder the upstream catalog uses for a missing text field.
pub const NOT_AVAILABLE: &str = "N/A";

// ---------------------------------------------------------------------------
// BookRecord – one row of the catalog
// ---------------------------------------------------------------------------

/// A single catalog entry.
///
/// Every optional column stays `None` when the source omits it; aggregations decide for
/// themselves whether to skip a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub book_id: String,
    #[serde(default, alias = "book_title")]
    pub title: Option<String>,
    #[serde(default, alias = "book_subtitle")]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "isEbook")]
    pub is_ebook: Option<bool>,
    #[serde(default, rename = "pageCount")]
    pub page_count: Option<u32>,
    #[serde(default, rename = "averageRating")]
    pub average_rating: Option<f64>,
    #[serde(default, rename = "ratingsCount")]
    pub ratings_count: Option<u64>,
    #[serde(default, rename = "listPrice")]
    pub list_price: Option<f64>,
    #[serde(default, rename = "retailPrice")]
    pub retail_price: Option<f64>,
}

impl BookRecord {
    /// An otherwise empty record with the given id.
    pub fn new(book_id: impl Into<String>) -> Self {
        Self {
            book_id: book_id.into(),
            ..Default::default()
        }
    }

    /// Missing `isEbook` counts as a physical book.
    pub fn is_ebook(&self) -> bool {
        self.is_ebook.unwrap_or(false)
    }

    /// Title for display, falling back to the upstream placeholder.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(NOT_AVAILABLE)
    }

    /// Distinct authors in listing order; a name repeated within one book counts once.
    pub fn distinct_authors(&self) -> impl Iterator<Item = &str> {
        self.authors
            .iter()
            .enumerate()
            .filter(|(i, a)| !self.authors[..*i].contains(a))
            .map(|(_, a)| a.as_str())
    }

    /// Map `"N/A"` and blank strings to `None`, drop blank author names.
    pub(crate) fn normalize(mut self) -> Self {
        for field in [
            &mut self.title,
            &mut self.subtitle,
            &mut self.publisher,
            &mut self.categories,
        ] {
            *field = field.take().and_then(present);
        }
        self.authors = self
            .authors
            .into_iter()
            .filter_map(present)
            .collect();
        self
    }
}

/// `Some(trimmed)` unless the text is blank or the not-available placeholder.
pub(crate) fn present(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == NOT_AVAILABLE {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// BookTable – the complete loaded catalog
// ---------------------------------------------------------------------------

/// The full parsed catalog with pre-computed filter indices.
#[derive(Debug, Clone, Default)]
pub struct BookTable {
    /// All records in source order.
    pub records: Vec<BookRecord>,
    /// Sorted set of distinct category labels.
    pub categories: BTreeSet<String>,
    /// Smallest and largest publication year present, if any.
    pub year_bounds: Option<(i32, i32)>,
}

impl BookTable {
    /// Build the filter indices from the loaded records.
    pub fn from_records(records: Vec<BookRecord>) -> Self {
        let mut categories = BTreeSet::new();
        let mut year_bounds: Option<(i32, i32)> = None;

        for rec in &records {
            if let Some(cat) = &rec.categories {
                categories.insert(cat.clone());
            }
            if let Some(y) = rec.year {
                year_bounds = Some(match year_bounds {
                    Some((lo, hi)) => (lo.min(y), hi.max(y)),
                    None => (y, y),
                });
            }
        }

        BookTable {
            records,
            categories,
            year_bounds,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
