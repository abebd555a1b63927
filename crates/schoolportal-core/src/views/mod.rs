//! View-models: the data each screen renders, independent of the terminal.
//!
//! Fetches are async and may resolve after the user has moved on; every
//! result carries the `FetchTicket` issued when it was spawned, and results
//! with a stale ticket are dropped.

pub mod approvals;
pub mod dashboard;
pub mod loadable;
pub mod records;
pub mod students;

pub use approvals::ApprovalQueue;
pub use dashboard::{load_admin_summary, AdminSummary};
pub use loadable::{FetchTicket, Loadable, ViewEpoch};
pub use records::{group_by_year, GradeBand, YearGroup};
pub use students::StudentFilter;
