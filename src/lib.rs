//! Automotive import analytics.
//!
//! Loads import records from CSV, filters them, and derives KPIs, rankings,
//! market share, month-over-month brand growth, likely new market entrants
//! and short textual insights. The aggregation functions in [`reports`] and
//! [`insights`] are pure and can be used without the loader or the CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod insights;
pub mod loader;
pub mod output;
pub mod reports;
pub mod types;
pub mod util;
