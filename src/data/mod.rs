/// Data layer: core types, parsing, averaging, fitting and export.
///
/// Architecture:
/// ```text
///  .csv / .xlsx bytes + file name
///        │
///        ▼
///   ┌──────────┐      ┌──────┐
///   │  loader   │ ◄── │ grid │  TextTable / XlsxGrid behind `Grid`
///   └──────────┘      └──────┘
///        │
///        ├──────────────────────┐
///        ▼                      ▼
///   ┌────────────┐        ┌──────────┐
///   │ MatrixData │        │ XySeries │
///   └────────────┘        └──────────┘
///        │                      │
///        ▼                      ▼
///   ┌──────────┐          ┌──────────┐
///   │  select   │          │   fit    │
///   └──────────┘          └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  time_ns / avg_intensity → .xlsx
///   └──────────┘
/// ```

pub mod error;
pub mod export;
pub mod fit;
pub mod grid;
pub mod loader;
pub mod model;
pub mod select;
