//! # atelier-db: Database Layer for Atelier POS
//!
//! This crate provides database access for the Atelier POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Atelier POS Data Flow                          │
//! │                                                                     │
//! │  CheckoutCoordinator::complete_sale                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   atelier-db (THIS CRATE)                   │   │
//! │  │                                                             │   │
//! │  │   ┌────────────┐   ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │  Database  │   │  Repositories  │   │  Migrations  │   │   │
//! │  │   │ (pool.rs)  │   │                │   │  (embedded)  │   │   │
//! │  │   │            │   │ SaleLedger     │   │              │   │   │
//! │  │   │ SqlitePool │◄──│ CatalogRepo    │   │ 001_init.sql │   │   │
//! │  │   │ Connection │   │ SettingsRepo   │   │              │   │   │
//! │  │   └────────────┘   └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode) - survives restarts, so reports    │
//! │  remain valid across sessions                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Sale ledger, catalog, and settings repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atelier_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./atelier.db")).await?;
//!
//! db.ledger().append(&sale).await?;
//! let today = db.ledger().list_by_date_range(open, close).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::catalog::CatalogRepository;
pub use repository::sale::{SaleLedger, SalesSummary};
pub use repository::settings::{SettingsRepository, StoreSettings};
