//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`sale`] - the append-only sale ledger
//! - [`catalog`] - products, variants, and categories
//! - [`settings`] - the single-row store settings
//!
//! Repositories are cheap to construct (they clone the pool handle) and
//! are handed out by [`crate::Database`] accessor methods.

pub mod catalog;
pub mod sale;
pub mod settings;
