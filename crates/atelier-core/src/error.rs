//! # Error Types
//!
//! Domain-specific error types for atelier-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  atelier-core (this file)                                           │
//! │  ├── CoreError        - Business rule violations                    │
//! │  ├── ValidationError  - Input validation failures                   │
//! │  └── CheckoutDecline  - Normal "not ready" checkout refusals        │
//! │                                                                     │
//! │  atelier-db                                                         │
//! │  └── DbError          - Database operation failures                 │
//! │                                                                     │
//! │  atelier-checkout                                                   │
//! │  └── CheckoutError    - What the terminal layer sees                │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Declines vs Errors
//! A checkout that refuses because the cart is empty, nobody is signed in,
//! or the tendered amount is short is NOT exceptional: the cart is left
//! untouched and the cashier corrects the input and retries. Those refusals
//! get their own type, `CheckoutDecline`, so callers can match on exactly
//! the recoverable conditions the payment dialog needs to present.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by cart operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested size/color combination does not exist on the product.
    ///
    /// ## When This Occurs
    /// - The variant selector sent a stale combination
    /// - A catalog edit removed the variant while it was displayed
    #[error("Product {product_id} has no variant {size}/{color}")]
    VariantNotFound {
        product_id: String,
        size: String,
        color: String,
    },

    /// The variant exists but has no stock to sell.
    ///
    /// ## When This Occurs
    /// - The variant sold out after the grid was rendered
    /// - Stock was adjusted down by an administrator
    #[error("Variant {sku} is out of stock")]
    OutOfStock { sku: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These occur when user input doesn't meet requirements. Used for early
/// validation at the coordinator boundary before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., malformed UUID or barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Checkout Decline
// =============================================================================

/// Non-fatal refusal to commit a sale.
///
/// Every variant is recoverable: no partial side effects occur, the cart
/// and ledger are exactly as they were before the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutDecline {
    /// No authenticated cashier on the session.
    #[error("no cashier is signed in")]
    NotSignedIn,

    /// The cart has no lines to sell.
    #[error("cart is empty")]
    EmptyCart,

    /// The tendered payments do not cover the cart total.
    #[error("insufficient payment: tendered {tendered_cents}, required {required_cents}")]
    InsufficientPayment {
        required_cents: i64,
        tendered_cents: i64,
    },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::OutOfStock {
            sku: "TEE-M-BLK".to_string(),
        };
        assert_eq!(err.to_string(), "Variant TEE-M-BLK is out of stock");

        let err = CoreError::VariantNotFound {
            product_id: "p1".to_string(),
            size: "XL".to_string(),
            color: "Ecru".to_string(),
        };
        assert_eq!(err.to_string(), "Product p1 has no variant XL/Ecru");
    }

    #[test]
    fn test_decline_messages() {
        let decline = CheckoutDecline::InsufficientPayment {
            required_cents: 10000,
            tendered_cents: 7000,
        };
        assert_eq!(
            decline.to_string(),
            "insufficient payment: tendered 7000, required 10000"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
