//! # atelier-checkout: Checkout & Payment Coordination for Atelier POS
//!
//! The orchestration layer for a single terminal. It owns the live cart
//! (behind a mutex), the cashier session, and the commit sequence that
//! turns a cart into a durable ledger entry.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │               atelier-checkout (THIS CRATE)                         │
//! │                                                                     │
//! │  ┌───────────┐   ┌──────────────────────┐   ┌──────────────────┐   │
//! │  │  Session  │   │ CheckoutCoordinator  │   │     Receipt      │   │
//! │  │ sign_in/  │──►│ cart ops, change_due │──►│ printable view   │   │
//! │  │ sign_out  │   │ complete_sale        │   │ of a Sale        │   │
//! │  └───────────┘   └──────────┬───────────┘   └──────────────────┘   │
//! │                             │                                       │
//! │          ┌──────────────────┼──────────────────┐                    │
//! │          ▼                                     ▼                    │
//! │   atelier-core                          atelier-db                  │
//! │   CartEngine (pure)                     SaleLedger (SQLite)         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The One Rule
//! The cart clears only after the ledger append commits. Every other exit
//! path from `complete_sale` leaves both the cart and the ledger exactly
//! as they were.

pub mod coordinator;
pub mod error;
pub mod receipt;
pub mod session;

pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, CheckoutResult};
pub use receipt::{Receipt, ReceiptItem, ReceiptPayment};
pub use session::{Session, SignInError};
