/// Data layer: CSV reading, timepoint grouping, summaries and loading.
///
/// Architecture:
/// ```text
///  <category>_countsnorm.csv     Metadata.csv
///            │                        │
///            └──────────┬─────────────┘
///                       ▼
///                ┌──────────┐
///                │  loader   │  read both files (joined), drop stale loads
///                └──────────┘
///                       │
///                       ▼
///                ┌──────────┐
///                │  table    │  text → RawTable
///                └──────────┘
///                       │
///                       ▼
///                ┌──────────┐
///                │  grouper  │  sample → timepoint, feature → FeatureSeries
///                └──────────┘
///                       │
///                       ▼
///                ┌──────────┐
///                │  summary  │  mean / median trend line, box geometry
///                └──────────┘
/// ```

pub mod grouper;
pub mod loader;
pub mod model;
pub mod summary;
pub mod table;
