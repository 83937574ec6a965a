//! PriceWatch: tracks product prices from the Naver shopping search API,
//! stores price history, and raises alerts when a target price is reached.
//!
//! Two binaries share this crate: `api` (the REST server) and `collector`
//! (the batch collection job, run on a schedule).

pub mod api;
pub mod collector;
pub mod config;
pub mod db;
pub mod error;
pub mod filter;
pub mod notifier;
pub mod search;
pub mod types;
