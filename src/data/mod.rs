/// Data layer: core types, loading, field resolution and search.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (all or nothing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  search term → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  record   │  Row → StudentDisplayRecord
///   └──────────┘     via resolve (fallback columns, empty sentinel)
///                    and normalize (raw range → 0..100)
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod record;
pub mod resolve;
