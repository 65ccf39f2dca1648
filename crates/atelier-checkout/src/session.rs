//! # Cashier Session
//!
//! Tracks who is signed in at the terminal. Checkout requires a signed-in
//! cashier; without one the coordinator declines with `NotSignedIn`.
//!
//! ## Authentication
//! This is a single-terminal system with a fixed demo roster and a shared
//! PIN. There is no credential store and no token exchange; the session is
//! purely in-memory and dies with the process.

use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

use atelier_core::{Cashier, Role};

/// The shared demo PIN every roster account accepts.
const DEMO_PIN: &str = "1234";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignInError {
    #[error("unknown username: {0}")]
    UnknownUser(String),

    #[error("incorrect PIN")]
    IncorrectPin,
}

/// The fixed roster of terminal accounts.
fn roster() -> Vec<Cashier> {
    vec![
        Cashier {
            id: "u-admin".to_string(),
            username: "admin".to_string(),
            name: "Store Admin".to_string(),
            role: Role::Admin,
        },
        Cashier {
            id: "u-cashier".to_string(),
            username: "cashier".to_string(),
            name: "Front Desk".to_string(),
            role: Role::Cashier,
        },
    ]
}

/// The terminal's sign-in state.
#[derive(Debug, Default)]
pub struct Session {
    current: Mutex<Option<Cashier>>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            current: Mutex::new(None),
        }
    }

    /// Signs a cashier in, replacing any previous session.
    pub fn sign_in(&self, username: &str, pin: &str) -> Result<Cashier, SignInError> {
        let cashier = roster()
            .into_iter()
            .find(|c| c.username == username)
            .ok_or_else(|| SignInError::UnknownUser(username.to_string()))?;

        if pin != DEMO_PIN {
            return Err(SignInError::IncorrectPin);
        }

        info!(username = %cashier.username, role = ?cashier.role, "Cashier signed in");
        *self.current.lock().expect("session mutex poisoned") = Some(cashier.clone());
        Ok(cashier)
    }

    /// Signs the current cashier out. A no-op when nobody is signed in.
    pub fn sign_out(&self) {
        let mut current = self.current.lock().expect("session mutex poisoned");
        if let Some(cashier) = current.take() {
            info!(username = %cashier.username, "Cashier signed out");
        }
    }

    /// Returns the signed-in cashier, if any.
    pub fn current(&self) -> Option<Cashier> {
        self.current.lock().expect("session mutex poisoned").clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.lock().expect("session mutex poisoned").is_some()
    }
}
