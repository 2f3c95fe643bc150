//! Bookscape: explore a book catalog snapshot.
//!
//! The data layer ([`data`]) loads and filters the catalog, the query engine
//! ([`query`]) computes canned analytics over the filtered view, and the remaining
//! modules form the egui dashboard around them.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod query;
pub mod state;
pub mod ui;
