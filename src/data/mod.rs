/// Data layer: sweep-log parsing and aggregation.
///
/// Architecture:
/// ```text
///  rtl_power / hackrf_sweep CSV
///        │
///        ▼
///   ┌──────────┐
///   │   line    │  one record → SweepLine fragment
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   table   │  merge fragments per pass, sort, derive range → Table
///   └──────────┘
/// ```

pub mod line;
pub mod table;
