//! # Checkout Coordinator
//!
//! The orchestration layer tying the cart engine, the cashier session, and
//! the sale ledger together.
//!
//! ## Commit Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     complete_sale() Sequence                        │
//! │                                                                     │
//! │  1. GUARD      committing.compare_exchange(false, true)             │
//! │                └── a second commit while one is running is refused  │
//! │                                                                     │
//! │  2. PREPARE    cart.prepare_sale(cashier, payments)   [under lock]  │
//! │                └── declines (no cashier / empty / short payment)    │
//! │                    exit here with the cart untouched                │
//! │                                                                     │
//! │  3. APPEND     ledger.append(&sale).await       [single DB txn]     │
//! │                └── a receipt-number collision re-prepares with a    │
//! │                    fresh number; any other failure exits here with  │
//! │                    the cart intact and nothing in the ledger        │
//! │                                                                     │
//! │  4. CLEAR      cart.clear_sold_lines(&sale)           [under lock]  │
//! │                └── only now does the cart drop the sold lines; a    │
//! │                    line added during the append survives for the    │
//! │                    next transaction                                 │
//! │                                                                     │
//! │  5. RECEIPT    Receipt::from_sale(&sale, &settings)                 │
//! │                                                                     │
//! │  Guard resets on every exit path (Drop), so a failure never wedges  │
//! │  the terminal.                                                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancelling a payment flow needs no call at all: until step 4 runs, the
//! cart and ledger have not changed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use atelier_core::validation::{
    validate_cart_size, validate_discount_cents, validate_payment_amount, validate_quantity,
};
use atelier_core::{CartEngine, CartItem, CartTotals, Payment, Product};
use atelier_db::{Database, StoreSettings};

use crate::error::{CheckoutError, CheckoutResult};
use crate::receipt::Receipt;
use crate::session::Session;

/// Resets the commit flag when the commit attempt ends, whichever way.
struct CommitGuard<'a>(&'a AtomicBool);

impl Drop for CommitGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Coordinates the live cart, the cashier session, and the sale ledger for
/// one terminal.
pub struct CheckoutCoordinator {
    cart: Mutex<CartEngine>,
    db: Database,
    session: Session,
    settings: StoreSettings,
    committing: AtomicBool,
}

impl CheckoutCoordinator {
    /// Creates a coordinator over an open database, loading store settings
    /// (including the tax rate the cart applies) from it.
    pub async fn new(db: Database) -> CheckoutResult<Self> {
        let settings = db.settings().load().await?;
        debug!(
            store = %settings.store_name,
            tax_bps = settings.tax_rate().bps(),
            "Checkout coordinator ready"
        );

        Ok(CheckoutCoordinator {
            cart: Mutex::new(CartEngine::new(settings.tax_rate())),
            db,
            session: Session::new(),
            settings,
            committing: AtomicBool::new(false),
        })
    }

    /// The terminal's sign-in state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The store settings loaded at startup.
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    // -------------------------------------------------------------------------
    // Cart access
    // -------------------------------------------------------------------------

    fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartEngine) -> R,
    {
        let cart = self.cart.lock().expect("cart mutex poisoned");
        f(&cart)
    }

    fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartEngine) -> R,
    {
        let mut cart = self.cart.lock().expect("cart mutex poisoned");
        f(&mut cart)
    }

    /// Current cart lines, cloned out of the lock.
    pub fn cart_items(&self) -> Vec<CartItem> {
        self.with_cart(|cart| cart.items().to_vec())
    }

    /// Current derived totals.
    pub fn totals(&self) -> CartTotals {
        self.with_cart(CartEngine::totals)
    }

    // -------------------------------------------------------------------------
    // Cart operations
    // -------------------------------------------------------------------------

    /// Looks up a product and adds one unit of the chosen variant to the
    /// cart. Re-adding the same variant bumps the existing line's quantity.
    pub async fn add_to_cart(
        &self,
        product_id: &str,
        size: &str,
        color: &str,
    ) -> CheckoutResult<()> {
        let product = self
            .db
            .catalog()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| CheckoutError::ProductNotFound {
                id: product_id.to_string(),
            })?;

        self.add_product(&product, size, color)
    }

    /// The scanner path: resolves a barcode and adds the chosen variant.
    pub async fn add_by_barcode(
        &self,
        barcode: &str,
        size: &str,
        color: &str,
    ) -> CheckoutResult<()> {
        let product = self
            .db
            .catalog()
            .find_by_barcode(barcode)
            .await?
            .ok_or_else(|| CheckoutError::ProductNotFound {
                id: barcode.to_string(),
            })?;

        self.add_product(&product, size, color)
    }

    fn add_product(&self, product: &Product, size: &str, color: &str) -> CheckoutResult<()> {
        self.with_cart_mut(|cart| {
            validate_cart_size(cart.line_count())?;
            cart.add_item(product, size, color)?;
            debug!(product = %product.name, size, color, lines = cart.line_count(), "Added to cart");
            Ok(())
        })
    }

    /// Sets a line's quantity. Zero or negative removes the line; an
    /// unknown line id is a no-op.
    pub fn update_quantity(&self, item_id: &str, quantity: i64) -> CheckoutResult<()> {
        if quantity > 0 {
            validate_quantity(quantity)?;
        }
        self.with_cart_mut(|cart| cart.update_quantity(item_id, quantity));
        Ok(())
    }

    /// Removes a line. Unknown ids are a no-op.
    pub fn remove_line(&self, item_id: &str) {
        self.with_cart_mut(|cart| cart.remove_item(item_id));
    }

    /// Sets the absolute discount on one line.
    pub fn update_line_discount(&self, item_id: &str, discount_cents: i64) -> CheckoutResult<()> {
        validate_discount_cents(discount_cents)?;
        self.with_cart_mut(|cart| cart.update_item_discount(item_id, discount_cents));
        Ok(())
    }

    /// Sets the order-level discount.
    pub fn set_global_discount(&self, discount_cents: i64) -> CheckoutResult<()> {
        validate_discount_cents(discount_cents)?;
        self.with_cart_mut(|cart| cart.set_global_discount(discount_cents));
        Ok(())
    }

    /// Empties the cart and resets the order-level discount.
    pub fn clear_cart(&self) {
        self.with_cart_mut(CartEngine::clear);
    }

    // -------------------------------------------------------------------------
    // Payment
    // -------------------------------------------------------------------------

    /// Change owed for a cash tender against the current total. Never
    /// negative; a short tender owes no change (and will be declined at
    /// commit).
    pub fn change_due(&self, tendered_cents: i64) -> i64 {
        (tendered_cents - self.totals().total_cents).max(0)
    }

    /// Commits the current cart as a completed sale.
    ///
    /// At most one commit runs at a time; a concurrent call gets
    /// `CommitInFlight` without touching anything. Declines and ledger
    /// failures leave the cart exactly as it was.
    pub async fn complete_sale(&self, payments: Vec<Payment>) -> CheckoutResult<Receipt> {
        if self
            .committing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("Checkout rejected: commit already in flight");
            return Err(CheckoutError::CommitInFlight);
        }
        let _guard = CommitGuard(&self.committing);

        for payment in &payments {
            validate_payment_amount(payment.amount_cents)?;
        }

        let cashier = self.session.current();

        // Prepare under the lock, but release it before the async append.
        // A receipt-number collision gets a fresh prepare (and thus a fresh
        // number); anything else propagates with the cart untouched.
        let mut attempt = 0;
        let sale = loop {
            let sale = self.with_cart(|cart| cart.prepare_sale(cashier.as_ref(), &payments))?;

            match self.db.ledger().append(&sale).await {
                Ok(()) => break sale,
                Err(err) if err.is_receipt_collision() && attempt < 2 => {
                    attempt += 1;
                    warn!(
                        receipt_number = %sale.receipt_number,
                        attempt,
                        "Receipt number collision, regenerating"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        };

        // The sale is durable; drop exactly the lines it captured so a line
        // rung up during the append survives for the next transaction.
        self.with_cart_mut(|cart| cart.clear_sold_lines(&sale));

        info!(
            receipt_number = %sale.receipt_number,
            total = sale.total_cents,
            lines = sale.lines.len(),
            cashier = %sale.cashier_name,
            "Sale completed"
        );

        Ok(Receipt::from_sale(&sale, &self.settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{PaymentMethod, ProductVariant};
    use atelier_db::DbConfig;
    use chrono::Utc;
    use uuid::Uuid;

    async fn test_coordinator() -> CheckoutCoordinator {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CheckoutCoordinator::new(db).await.unwrap()
    }

    async fn seed_tee(coordinator: &CheckoutCoordinator, price_cents: i64) -> Product {
        let category = atelier_core::Category {
            id: Uuid::new_v4().to_string(),
            name: "Shirts".to_string(),
            color: "#2563eb".to_string(),
        };
        coordinator.db.catalog().insert_category(&category).await.unwrap();

        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: "Crew Neck Tee".to_string(),
            barcode: "40000001".to_string(),
            category_id: category.id,
            price_cents,
            cost_price_cents: price_cents / 2,
            variants: vec![ProductVariant {
                size: "M".to_string(),
                color: "Black".to_string(),
                stock: 10,
                sku: "40000001-M-BLK".to_string(),
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        coordinator.db.catalog().insert(&product).await.unwrap();
        product
    }

    fn cash(amount_cents: i64) -> Payment {
        Payment::new(PaymentMethod::Cash, amount_cents)
    }

    #[tokio::test]
    async fn test_full_checkout_happy_path() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;

        coordinator.session().sign_in("cashier", "1234").unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        let totals = coordinator.totals();
        assert_eq!(totals.total_cents, 10000);
        assert_eq!(totals.line_count, 1);

        let receipt = coordinator.complete_sale(vec![cash(10000)]).await.unwrap();
        assert_eq!(receipt.total_cents, 10000);
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].quantity, 2);

        // Cart is empty and the ledger holds exactly one sale
        assert!(coordinator.cart_items().is_empty());
        assert_eq!(coordinator.db.ledger().count().await.unwrap(), 1);

        let stored = coordinator
            .db
            .ledger()
            .get_by_id(&receipt.sale_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.receipt_number, receipt.receipt_number);
    }

    #[tokio::test]
    async fn test_short_tender_declines_and_preserves_cart() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;

        coordinator.session().sign_in("cashier", "1234").unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        let err = coordinator.complete_sale(vec![cash(7000)]).await.unwrap_err();
        assert!(err.is_decline());

        // Nothing happened: cart intact, ledger untouched
        assert_eq!(coordinator.totals().total_cents, 10000);
        assert_eq!(coordinator.db.ledger().count().await.unwrap(), 0);

        // Corrected tender succeeds on retry
        coordinator.complete_sale(vec![cash(10000)]).await.unwrap();
        assert!(coordinator.cart_items().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_requires_sign_in() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;
        coordinator.session().sign_in("cashier", "1234").unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();
        coordinator.session().sign_out();

        let err = coordinator.complete_sale(vec![cash(5000)]).await.unwrap_err();
        assert!(err.is_decline());
        assert_eq!(coordinator.db.ledger().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_cart_declines() {
        let coordinator = test_coordinator().await;
        coordinator.session().sign_in("admin", "1234").unwrap();

        let err = coordinator.complete_sale(vec![cash(5000)]).await.unwrap_err();
        assert!(err.is_decline());
    }

    #[tokio::test]
    async fn test_split_tender_commits() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 6000).await;

        coordinator.session().sign_in("cashier", "1234").unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        let receipt = coordinator
            .complete_sale(vec![cash(2500), Payment::new(PaymentMethod::PosTerminal, 3500)])
            .await
            .unwrap();
        assert_eq!(receipt.payments.len(), 2);
        assert_eq!(receipt.payments[1].method, "POS Terminal");
    }

    #[tokio::test]
    async fn test_add_by_barcode() {
        let coordinator = test_coordinator().await;
        seed_tee(&coordinator, 5000).await;

        coordinator.add_by_barcode("40000001", "M", "Black").await.unwrap();
        assert_eq!(coordinator.totals().subtotal_cents, 5000);

        let err = coordinator
            .add_by_barcode("99999999", "M", "Black")
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::ProductNotFound { .. }));
    }

    #[tokio::test]
    async fn test_unknown_variant_is_rejected() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;

        let err = coordinator
            .add_to_cart(&product.id, "XXL", "Chartreuse")
            .await
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Core(_)));
        assert!(coordinator.cart_items().is_empty());
    }

    #[tokio::test]
    async fn test_discounts_flow_through_totals() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        let item_id = coordinator.cart_items()[0].id.clone();
        coordinator.update_line_discount(&item_id, 500).unwrap();
        coordinator.set_global_discount(1000).unwrap();

        let totals = coordinator.totals();
        assert_eq!(totals.discount_cents, 1500);
        assert_eq!(totals.total_cents, 3500);

        // Negative discounts are rejected at the boundary
        assert!(coordinator.set_global_discount(-1).is_err());
    }

    #[tokio::test]
    async fn test_change_due() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        assert_eq!(coordinator.change_due(6000), 1000);
        assert_eq!(coordinator.change_due(5000), 0);
        assert_eq!(coordinator.change_due(4000), 0);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        let item_id = coordinator.cart_items()[0].id.clone();
        coordinator.update_quantity(&item_id, 0).unwrap();
        assert!(coordinator.cart_items().is_empty());

        // Unknown line ids are a quiet no-op
        coordinator.update_quantity("nope", 3).unwrap();
        coordinator.remove_line("nope");
    }

    #[tokio::test]
    async fn test_second_commit_while_one_in_flight_is_refused() {
        let coordinator = test_coordinator().await;
        let product = seed_tee(&coordinator, 5000).await;
        coordinator.session().sign_in("cashier", "1234").unwrap();
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();

        // Another commit already holds the flag
        coordinator.committing.store(true, Ordering::SeqCst);

        let err = coordinator.complete_sale(vec![cash(5000)]).await.unwrap_err();
        assert!(matches!(err, CheckoutError::CommitInFlight));

        // The refused attempt touched nothing
        assert_eq!(coordinator.totals().total_cents, 5000);
        assert_eq!(coordinator.cart_items().len(), 1);
        assert_eq!(coordinator.db.ledger().count().await.unwrap(), 0);

        // Once the in-flight commit finishes, checkout proceeds normally
        coordinator.committing.store(false, Ordering::SeqCst);
        coordinator.complete_sale(vec![cash(5000)]).await.unwrap();
        assert_eq!(coordinator.db.ledger().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_commit_flag_resets_after_failure() {
        let coordinator = test_coordinator().await;
        coordinator.session().sign_in("admin", "1234").unwrap();

        // Empty cart declines, but the terminal must not stay wedged
        assert!(coordinator.complete_sale(vec![cash(100)]).await.is_err());

        let product = seed_tee(&coordinator, 5000).await;
        coordinator.add_to_cart(&product.id, "M", "Black").await.unwrap();
        coordinator.complete_sale(vec![cash(5000)]).await.unwrap();
    }
}
