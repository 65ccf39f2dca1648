//! # Checkout Errors
//!
//! Error surface of the coordination layer. Three distinct failure kinds
//! flow through here:
//!
//! - **Declines** (`Declined`): the checkout was refused by business rules
//!   (no cashier, empty cart, short payment). Expected, recoverable, and
//!   never destructive - the cart is left exactly as it was.
//! - **Domain errors** (`Core`, `Validation`): bad input or an impossible
//!   catalog state (unknown variant, out of stock).
//! - **Infrastructure errors** (`Db`): the ledger could not be written.
//!   The commit sequence guarantees the cart survives these.

use thiserror::Error;

use atelier_core::{CheckoutDecline, CoreError, ValidationError};
use atelier_db::DbError;

/// Errors from coordinator operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout refused by a business rule. Not a fault; retry after
    /// correcting the condition (sign in, add items, collect more payment).
    #[error("checkout declined: {0}")]
    Declined(#[from] CheckoutDecline),

    /// Another checkout commit is already in progress on this terminal.
    #[error("a checkout is already in progress")]
    CommitInFlight,

    /// Product was not found in the catalog.
    #[error("product not found: {id}")]
    ProductNotFound { id: String },

    /// Domain rule violation from the cart engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Input rejected at the boundary.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Persistence failure from the sale ledger or catalog.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl CheckoutError {
    /// True for refusals the operator can resolve and retry, as opposed to
    /// faults that need attention.
    pub fn is_decline(&self) -> bool {
        matches!(self, CheckoutError::Declined(_))
    }
}

pub type CheckoutResult<T> = Result<T, CheckoutError>;
