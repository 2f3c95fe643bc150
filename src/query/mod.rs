//! Canned analytics over a [`FilteredView`].
//!
//! Every query is a pure function `(view, params) -> ResultTable` registered in the
//! static [`QUERIES`] table; the dashboard and the tests look queries up by slug or by
//! label and never branch on query names themselves.

mod authors;
mod catalog;
mod pricing;
mod publishers;
pub mod result;
pub mod stats;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::data::filter::FilteredView;
use crate::error::QueryError;

pub use result::{ChartHint, ResultTable, Value};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Thresholds and free inputs shared by the queries.
///
/// Deserializable so a config file can override any subset of the defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryParams {
    /// Rows returned by the retail-price ranking.
    pub top_n: usize,
    /// Rows returned by the author ranking.
    pub top_authors: usize,
    /// Recent books are published strictly after this year.
    pub recent_after_year: i32,
    /// Minimum page count (inclusive) of a long book.
    pub min_pages: u32,
    /// Discount, in percent, a book must strictly exceed.
    pub min_discount_pct: f64,
    /// A large publisher has strictly more books than this.
    pub large_publisher_books: usize,
    /// Outliers lie strictly more than this many standard deviations from the mean.
    pub outlier_sigmas: f64,
    /// Length of the consecutive-year run an author needs.
    pub consecutive_years: usize,
    /// Title keyword for the keyword query.
    pub keyword: String,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            top_n: 5,
            top_authors: 3,
            recent_after_year: 2010,
            min_pages: 500,
            min_discount_pct: 20.0,
            large_publisher_books: 10,
            outlier_sigmas: 2.0,
            consecutive_years: 3,
            keyword: String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The closed set of analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryId {
    FormatSplit,
    TopPublisher,
    TopRatedPublisher,
    MostExpensive,
    LongRecentBooks,
    DiscountedBooks,
    AvgPagesByFormat,
    TopAuthors,
    LargePublishers,
    AvgPagesByCategory,
    MultiAuthorBooks,
    PopularBooks,
    AuthorYearDuplicates,
    TitleKeyword,
    PriciestYear,
    ConsecutiveYearAuthors,
    MultiPublisherAuthors,
    AvgPriceByFormat,
    RatingOutliers,
    TopRatedLargePublisher,
}

pub type QueryFn = fn(&FilteredView<'_>, &QueryParams) -> ResultTable;

/// One registry entry.
pub struct QueryDef {
    pub id: QueryId,
    /// Stable identifier, e.g. `top_publisher`.
    pub slug: &'static str,
    /// Human-readable name shown in the dashboard.
    pub label: &'static str,
    pub run: QueryFn,
}

/// Indexed by `QueryId as usize`.
pub static QUERIES: [QueryDef; 20] = [
    QueryDef {
        id: QueryId::FormatSplit,
        slug: "format_split",
        label: "eBooks vs physical books",
        run: catalog::format_split,
    },
    QueryDef {
        id: QueryId::TopPublisher,
        slug: "top_publisher",
        label: "Publisher with the most books",
        run: publishers::top_publisher,
    },
    QueryDef {
        id: QueryId::TopRatedPublisher,
        slug: "top_rated_publisher",
        label: "Publisher with the highest average rating",
        run: publishers::top_rated_publisher,
    },
    QueryDef {
        id: QueryId::MostExpensive,
        slug: "most_expensive",
        label: "Most expensive books by retail price",
        run: pricing::most_expensive,
    },
    QueryDef {
        id: QueryId::LongRecentBooks,
        slug: "long_recent_books",
        label: "Long books published after 2010",
        run: catalog::long_recent_books,
    },
    QueryDef {
        id: QueryId::DiscountedBooks,
        slug: "discounted_books",
        label: "Books discounted by more than 20%",
        run: pricing::discounted_books,
    },
    QueryDef {
        id: QueryId::AvgPagesByFormat,
        slug: "avg_pages_by_format",
        label: "Average page count: eBooks vs physical",
        run: catalog::avg_pages_by_format,
    },
    QueryDef {
        id: QueryId::TopAuthors,
        slug: "top_authors",
        label: "Authors with the most books",
        run: authors::top_authors,
    },
    QueryDef {
        id: QueryId::LargePublishers,
        slug: "large_publishers",
        label: "Publishers with more than 10 books",
        run: publishers::large_publishers,
    },
    QueryDef {
        id: QueryId::AvgPagesByCategory,
        slug: "avg_pages_by_category",
        label: "Average page count per category",
        run: catalog::avg_pages_by_category,
    },
    QueryDef {
        id: QueryId::MultiAuthorBooks,
        slug: "multi_author_books",
        label: "Books with more than 3 authors",
        run: authors::multi_author_books,
    },
    QueryDef {
        id: QueryId::PopularBooks,
        slug: "popular_books",
        label: "Books rated more often than average",
        run: catalog::popular_books,
    },
    QueryDef {
        id: QueryId::AuthorYearDuplicates,
        slug: "author_year_duplicates",
        label: "Same author, same year",
        run: authors::author_year_duplicates,
    },
    QueryDef {
        id: QueryId::TitleKeyword,
        slug: "title_keyword",
        label: "Books with a keyword in the title",
        run: catalog::title_keyword,
    },
    QueryDef {
        id: QueryId::PriciestYear,
        slug: "priciest_year",
        label: "Year with the highest average price",
        run: pricing::priciest_year,
    },
    QueryDef {
        id: QueryId::ConsecutiveYearAuthors,
        slug: "consecutive_year_authors",
        label: "Authors publishing 3 years in a row",
        run: authors::consecutive_year_authors,
    },
    QueryDef {
        id: QueryId::MultiPublisherAuthors,
        slug: "multi_publisher_authors",
        label: "Authors with several publishers in one year",
        run: authors::multi_publisher_authors,
    },
    QueryDef {
        id: QueryId::AvgPriceByFormat,
        slug: "avg_price_by_format",
        label: "Average price: eBooks vs physical",
        run: pricing::avg_price_by_format,
    },
    QueryDef {
        id: QueryId::RatingOutliers,
        slug: "rating_outliers",
        label: "Books with ratings far from average",
        run: catalog::rating_outliers,
    },
    QueryDef {
        id: QueryId::TopRatedLargePublisher,
        slug: "top_rated_large_publisher",
        label: "Highest-rated publisher with more than 10 books",
        run: publishers::top_rated_large_publisher,
    },
];

impl QueryId {
    /// All queries in menu order.
    pub fn all() -> impl Iterator<Item = QueryId> {
        QUERIES.iter().map(|d| d.id)
    }

    pub fn def(self) -> &'static QueryDef {
        &QUERIES[self as usize]
    }

    pub fn slug(self) -> &'static str {
        self.def().slug
    }

    pub fn label(self) -> &'static str {
        self.def().label
    }

    /// Evaluate this query. Pure: the view is only read.
    pub fn run(self, view: &FilteredView<'_>, params: &QueryParams) -> ResultTable {
        let result = (self.def().run)(view, params);
        log::debug!(
            "query {} over {} books: {} rows",
            self.slug(),
            view.len(),
            result.len()
        );
        result
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for QueryId {
    type Err = QueryError;

    /// Accepts a slug or a label, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        QUERIES
            .iter()
            .find(|d| d.slug.eq_ignore_ascii_case(s) || d.label.eq_ignore_ascii_case(s))
            .map(|d| d.id)
            .ok_or_else(|| QueryError::UnknownQuery(s.to_string()))
    }
}

/// Resolve `query` and run it over `view`.
pub fn run_query(
    view: &FilteredView<'_>,
    query: &str,
    params: &QueryParams,
) -> Result<ResultTable, QueryError> {
    let id: QueryId = query.parse()?;
    Ok(id.run(view, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{BookRecord, BookTable};

    #[test]
    fn registry_is_indexed_by_id() {
        for (i, def) in QUERIES.iter().enumerate() {
            assert_eq!(def.id as usize, i, "{} out of place", def.slug);
        }
        assert_eq!(QueryId::all().count(), 20);
    }

    #[test]
    fn slugs_and_labels_are_unique() {
        let mut names: Vec<String> = QUERIES
            .iter()
            .flat_map(|d| [d.slug.to_lowercase(), d.label.to_lowercase()])
            .collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn parse_by_slug_or_label() {
        assert_eq!("top_authors".parse::<QueryId>(), Ok(QueryId::TopAuthors));
        assert_eq!(
            "publisher with the most books".parse::<QueryId>(),
            Ok(QueryId::TopPublisher)
        );
    }

    #[test]
    fn unknown_query_is_an_error() {
        let table = BookTable::from_records(vec![BookRecord::new("a")]);
        let view = FilteredView::all(&table);
        let err = run_query(&view, "most_read", &QueryParams::default()).unwrap_err();
        assert_eq!(err, QueryError::UnknownQuery("most_read".into()));
    }

    #[test]
    fn every_query_accepts_an_empty_view() {
        let table = BookTable::default();
        let view = FilteredView::all(&table);
        let params = QueryParams {
            keyword: "any".into(),
            ..QueryParams::default()
        };
        for id in QueryId::all() {
            let result = id.run(&view, &params);
            assert!(result.is_empty(), "{id} returned rows for an empty view");
            assert!(!result.columns.is_empty(), "{id} has no columns");
        }
    }

    #[test]
    fn params_deserialize_partially() {
        let params: QueryParams = serde_json::from_str(r#"{"top_n": 10, "keyword": "rust"}"#).unwrap();
        assert_eq!(params.top_n, 10);
        assert_eq!(params.keyword, "rust");
        assert_eq!(params.min_pages, 500);
    }
}
