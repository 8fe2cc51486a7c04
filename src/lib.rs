//! Gap-time activity recommendation service
//!
//! Turns a traveler's free-time window, budget, themes and weather into
//! a small, diverse set of nearby activities. Candidates come from
//! external search providers, get enriched with travel-time and category
//! metadata, are scored against the user's constraints and narrowed to a
//! diverse top set, with a static catalog guaranteeing the output never
//! comes back empty.

pub mod api;
pub mod category;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod services;
