//! # agrireg-report — Dashboard Aggregation
//!
//! Pure read/reduce over a committed entity graph. The engine takes any
//! [`GraphView`](agrireg_state::GraphView), performs no I/O, and cannot
//! fail: an empty graph produces an all-zero report.
//!
//! The report shape serializes to:
//!
//! ```text
//! { total_landholdings, total_area,
//!   landholdings_by_region: [{ region_name, count, total_area }],
//!   plantings_by_crop_kind: [{ crop_kind_name, count }],
//!   land_use: { total_arable, total_vegetation } }
//! ```

pub mod dashboard;

pub use dashboard::{compute, CropKindSummary, DashboardReport, LandUse, RegionSummary};
