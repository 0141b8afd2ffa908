//! Domain library for the provincial KPI scoreboard.
//!
//! Departments log monthly results against targets per KPI and reporting
//! area; the `reporting` module recomputes pass/fail/pending statuses and
//! dashboard rollups from those rows on every read. `config`, `telemetry`,
//! and `error` carry the service-side plumbing shared by the API crate.

pub mod config;
pub mod error;
pub mod reporting;
pub mod telemetry;
