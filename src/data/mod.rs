/// Data layer: core types, loading, filtering and table rendering.
///
/// Architecture:
/// ```text
///  <source>/<year>.json  (or .csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  fetch + parse → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐      ┌──────────┐
///   │  Dataset  │ ───▶ │  panel    │  distinct values → filter controls
///   └──────────┘      └──────────┘
///        │                 │ FilterState
///        ▼                 ▼
///   ┌──────────┐
///   │  filter   │  search + per-column predicates → visible indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  visible indices → header + body strings
///   └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod model;
pub mod panel;
pub mod table;
