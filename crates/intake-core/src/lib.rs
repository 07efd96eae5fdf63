//! Core types and trait definitions for the record intake service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It holds
//! the domain model, the collaborator traits (store, notifier, analyzer) and
//! the pure filtering/aggregation engine that the admin dashboard is built on.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod analyze;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod profile;
pub mod report;
pub mod stats;
pub mod store;
pub mod window;

pub use error::{Error, Result};
