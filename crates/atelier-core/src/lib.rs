//! # atelier-core: Pure Business Logic for Atelier POS
//!
//! This crate is the **heart** of Atelier POS. It owns the cart and checkout
//! pricing engine as pure, synchronous code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Atelier POS Architecture                       │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │              atelier-checkout (Coordinator)                 │   │
//! │  │   session ──► add/update wrappers ──► complete_sale         │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │             ★ atelier-core (THIS CRATE) ★                   │   │
//! │  │                                                             │   │
//! │  │   ┌──────────┐  ┌─────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │  types   │  │  money  │  │    cart    │  │validation│  │   │
//! │  │   │ Product  │  │  Money  │  │ CartEngine │  │  rules   │  │   │
//! │  │   │  Sale    │  │ TaxRate │  │  CartItem  │  │  checks  │  │   │
//! │  │   └──────────┘  └─────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  atelier-db (Sale Ledger)                   │   │
//! │  │       SQLite: append-only sales, catalog, settings          │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Payment, Cashier, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart engine: line items, totals, checkout commit
//! - [`error`] - Domain error types and checkout declines
//! - [`validation`] - Boundary input validation
//!
//! ## Design Principles
//!
//! 1. **Derived totals**: subtotal/discount/tax/total are recomputed from
//!    the current line sequence on every read - never cached stale
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer money**: all monetary values are minor units (i64)
//! 4. **Declines are not errors**: a checkout that is "not ready" (empty
//!    cart, no cashier, short payment) refuses with a typed decline and
//!    leaves the cart untouched
//!
//! ## Example Usage
//!
//! ```rust
//! use atelier_core::cart::CartEngine;
//! use atelier_core::types::TaxRate;
//!
//! let cart = CartEngine::new(TaxRate::zero());
//! assert!(cart.is_empty());
//! assert_eq!(cart.totals().total_cents, 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use atelier_core::Money` instead of
// `use atelier_core::money::Money`

pub use cart::{CartEngine, CartItem, CartTotals};
pub use error::{CheckoutDecline, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum unique lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable transaction sizes.
/// Enforced at the coordinator boundary, not inside the engine.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
/// Enforced at the coordinator boundary, not inside the engine.
pub const MAX_LINE_QUANTITY: i64 = 999;
