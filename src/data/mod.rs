/// Data layer: core types, loading, filtering and title search.
///
/// Architecture:
/// ```text
///  .json / .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → BookTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ BookTable  │  Vec<BookRecord>, category / year index
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / format / year predicates → FilteredView
///   └──────────┘
///        │
///        ├──────────────► query engine (crate::query)
///        ▼
///   ┌──────────┐
///   │  search   │  title substring → FilteredView
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod search;
mod volumes;
