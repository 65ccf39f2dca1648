//! # Cart Engine
//!
//! The cart and checkout pricing engine: owns the in-progress line items,
//! derives totals, enforces checkout preconditions, and produces the
//! immutable `Sale` record.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                           │
//! │                                                                     │
//! │  Variant confirmed ──────► add_item() ────────► merge or push line  │
//! │                                                                     │
//! │  Quantity edited ────────► update_quantity() ─► set / remove line   │
//! │                                                                     │
//! │  Line discount entered ──► update_item_discount()                   │
//! │                                                                     │
//! │  Cart discount entered ──► set_global_discount()                    │
//! │                                                                     │
//! │  Remove tapped ──────────► remove_item() ─────► retain others       │
//! │                                                                     │
//! │  Payment confirmed ──────► checkout() ────────► Sale + empty cart   │
//! │                                                                     │
//! │  Totals are DERIVED: recomputed from the line sequence on every     │
//! │  read. There is no cached subtotal to go stale.                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! `CartEngine` is an explicit instance owned by the session context (the
//! checkout coordinator wraps it in a mutex). There are no ambient
//! singletons; readers and the payment dialog receive a handle explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CheckoutDecline;
use crate::money::Money;
use crate::types::{Cashier, Payment, Product, Sale, SaleLine, SaleStatus, TaxRate};
use crate::{CoreError, CoreResult};

// =============================================================================
// Cart Item
// =============================================================================

/// One line in the cart: a product + size/color combination.
///
/// ## Design Notes
/// - `product_id` references the catalog product for later lookup
/// - name, SKU and unit price are frozen copies taken when the item was
///   added, so catalog edits cannot alter an open cart
/// - identity for merging is `(product_id, size, color)`: adding the same
///   combination again increments quantity instead of pushing a new line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Unique line id, generated when the line is created.
    pub id: String,

    /// Product ID (UUID).
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Variant SKU at time of adding (frozen).
    pub sku: String,

    /// Selected size.
    pub selected_size: String,

    /// Selected color.
    pub selected_color: String,

    /// Quantity in cart. Always >= 1; dropping to 0 removes the line.
    pub quantity: i64,

    /// Price in minor units at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Absolute discount on this line, in minor units.
    pub discount_cents: i64,

    /// When this line was added to the cart.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Line total before discounts (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Freezes this line into a sale snapshot.
    fn to_sale_line(&self) -> SaleLine {
        SaleLine {
            id: self.id.clone(),
            product_id: self.product_id.clone(),
            name: self.name.clone(),
            sku: self.sku.clone(),
            size: self.selected_size.clone(),
            color: self.selected_color.clone(),
            quantity: self.quantity,
            unit_price_cents: self.unit_price_cents,
            discount_cents: self.discount_cents,
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived totals for the current cart contents.
///
/// Invariant (recomputed on every read, never cached):
/// ```text
/// subtotal = Σ (unit_price × quantity)
/// discount = global_discount + Σ line_discount
/// taxable  = max(subtotal − discount, 0)
/// tax      = round(taxable × tax_rate)
/// total    = taxable + tax
/// ```
/// The clamp on `taxable` means an over-generous discount yields a free
/// sale, never a negative total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Cart Engine
// =============================================================================

/// The cart and checkout pricing engine.
///
/// ## Invariants
/// - Lines are unique by `(product_id, size, color)`
/// - Quantity is >= 1 on every line (0 or below removes the line)
/// - Unknown line ids on remove/update are no-ops, not errors
/// - A successful checkout empties the cart and resets the global discount
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEngine {
    /// Ordered line items.
    items: Vec<CartItem>,

    /// Cart-wide discount in minor units, applied once.
    global_discount_cents: i64,

    /// Tax rate from store settings, fixed for the engine's lifetime.
    tax_rate: TaxRate,
}

impl CartEngine {
    /// Creates an empty cart engine with the configured tax rate.
    pub fn new(tax_rate: TaxRate) -> Self {
        CartEngine {
            items: Vec::new(),
            global_discount_cents: 0,
            tax_rate,
        }
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Current line items, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of unique lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// The cart-wide discount currently applied.
    pub fn global_discount_cents(&self) -> i64 {
        self.global_discount_cents
    }

    /// The configured tax rate.
    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Sum of unit price × quantity over current lines.
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.line_total_cents()).sum()
    }

    /// Global discount plus all line discounts.
    pub fn discount_cents(&self) -> i64 {
        let line_discounts: i64 = self.items.iter().map(|i| i.discount_cents).sum();
        self.global_discount_cents + line_discounts
    }

    /// Derives the full totals from the current line sequence.
    pub fn totals(&self) -> CartTotals {
        let subtotal = Money::from_cents(self.subtotal_cents());
        let discount = Money::from_cents(self.discount_cents());
        // Discounts can exceed the subtotal; the taxable amount floors at
        // zero so tax and total never go negative.
        let taxable = (subtotal - discount).floor_zero();
        let tax = taxable.calculate_tax(self.tax_rate);
        let total = taxable + tax;

        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            subtotal_cents: subtotal.cents(),
            discount_cents: discount.cents(),
            tax_cents: tax.cents(),
            total_cents: total.cents(),
        }
    }

    /// Amount the customer currently owes.
    pub fn total_cents(&self) -> i64 {
        self.totals().total_cents
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Adds one unit of a product variant to the cart.
    ///
    /// ## Behavior
    /// - If a line with the same `(product_id, size, color)` exists, its
    ///   quantity increments by 1
    /// - Otherwise a new line is pushed with quantity 1 and the product's
    ///   current price frozen in
    ///
    /// ## Validation
    /// The variant selector already filters to in-stock combinations, but
    /// the engine re-checks existence and `stock > 0` to catch stale UI
    /// state. Commit-time stock re-validation is intentionally not done:
    /// this is a single-terminal system and the cart is the only writer
    /// between add and commit.
    pub fn add_item(&mut self, product: &Product, size: &str, color: &str) -> CoreResult<()> {
        let variant = product
            .variant(size, color)
            .ok_or_else(|| CoreError::VariantNotFound {
                product_id: product.id.clone(),
                size: size.to_string(),
                color: color.to_string(),
            })?;

        if !variant.in_stock() {
            return Err(CoreError::OutOfStock {
                sku: variant.sku.clone(),
            });
        }

        if let Some(item) = self.items.iter_mut().find(|i| {
            i.product_id == product.id && i.selected_size == size && i.selected_color == color
        }) {
            item.quantity += 1;
            return Ok(());
        }

        self.items.push(CartItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            name: product.name.clone(),
            sku: variant.sku.clone(),
            selected_size: size.to_string(),
            selected_color: color.to_string(),
            quantity: 1,
            unit_price_cents: product.price_cents,
            discount_cents: 0,
            added_at: Utc::now(),
        });

        Ok(())
    }

    /// Removes the line with the given id. No-op if absent.
    pub fn remove_item(&mut self, item_id: &str) {
        self.items.retain(|i| i.id != item_id);
    }

    /// Sets a line's quantity.
    ///
    /// ## Behavior
    /// - `quantity <= 0` is equivalent to `remove_item`
    /// - Unknown id is a no-op
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(item_id);
            return;
        }

        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.quantity = quantity;
        }
    }

    /// Sets a line's absolute discount amount. No-op if the id is unknown.
    pub fn update_item_discount(&mut self, item_id: &str, discount_cents: i64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == item_id) {
            item.discount_cents = discount_cents;
        }
    }

    /// Sets the cart-wide discount, applied once regardless of line count.
    pub fn set_global_discount(&mut self, discount_cents: i64) {
        self.global_discount_cents = discount_cents;
    }

    /// Empties the cart and resets the global discount.
    ///
    /// Used after a successful checkout and available as an explicit reset.
    pub fn clear(&mut self) {
        self.items.clear();
        self.global_discount_cents = 0;
    }

    /// Removes exactly the lines a committed sale captured and resets the
    /// global discount that sale consumed.
    ///
    /// Equivalent to [`clear`](Self::clear) when the cart has not changed
    /// since [`prepare_sale`](Self::prepare_sale); a line added in between
    /// survives for the next transaction instead of being wiped.
    pub fn clear_sold_lines(&mut self, sale: &Sale) {
        self.items
            .retain(|item| !sale.lines.iter().any(|line| line.id == item.id));
        self.global_discount_cents = 0;
    }

    // -------------------------------------------------------------------------
    // Checkout
    // -------------------------------------------------------------------------

    /// Validates checkout preconditions and builds the `Sale` record
    /// without mutating the cart.
    ///
    /// ## Precondition order
    /// 1. A cashier must be signed in
    /// 2. The cart must contain at least one line
    /// 3. `Σ payments >= total` (partial payments are not a completed sale)
    ///
    /// The coordinator uses this to append the sale to the ledger first and
    /// clear the cart only once the append succeeded; if persistence fails
    /// the cart is exactly as it was.
    pub fn prepare_sale(
        &self,
        cashier: Option<&Cashier>,
        payments: &[Payment],
    ) -> Result<Sale, CheckoutDecline> {
        let cashier = cashier.ok_or(CheckoutDecline::NotSignedIn)?;

        if self.items.is_empty() {
            return Err(CheckoutDecline::EmptyCart);
        }

        let totals = self.totals();
        let total_paid: i64 = payments.iter().map(|p| p.amount_cents).sum();
        if total_paid < totals.total_cents {
            return Err(CheckoutDecline::InsufficientPayment {
                required_cents: totals.total_cents,
                tendered_cents: total_paid,
            });
        }

        Ok(Sale {
            id: Uuid::new_v4().to_string(),
            receipt_number: generate_receipt_number(),
            status: SaleStatus::Completed,
            lines: self.items.iter().map(CartItem::to_sale_line).collect(),
            subtotal_cents: totals.subtotal_cents,
            discount_cents: totals.discount_cents,
            tax_cents: totals.tax_cents,
            total_cents: totals.total_cents,
            payments: payments.to_vec(),
            cashier_id: cashier.id.clone(),
            cashier_name: cashier.name.clone(),
            created_at: Utc::now(),
        })
    }

    /// The commit operation: validates, builds the `Sale`, and empties the
    /// cart. At most one sale per invocation; a declined checkout leaves
    /// the cart untouched and the caller retries with corrected payments.
    pub fn checkout(
        &mut self,
        cashier: Option<&Cashier>,
        payments: Vec<Payment>,
    ) -> Result<Sale, CheckoutDecline> {
        let sale = self.prepare_sale(cashier, &payments)?;
        self.clear();
        Ok(sale)
    }
}

impl Default for CartEngine {
    fn default() -> Self {
        CartEngine::new(TaxRate::zero())
    }
}

// =============================================================================
// Receipt Numbers
// =============================================================================

/// Generates a receipt number: `R<YYYYMMDD>-<XXXXXX>`.
///
/// ## Format
/// - `YYYYMMDD`: commit date (UTC), keeps receipts sortable by eye
/// - `XXXXXX`: six uppercase hex chars drawn from a fresh UUID v4
///
/// Uniqueness across the ledger's lifetime is the contract; the ledger
/// additionally enforces it with a UNIQUE index on the column.
///
/// ## Example
/// `R20260830-9F41C2`
pub fn generate_receipt_number() -> String {
    let date_part = Utc::now().format("%Y%m%d");
    let entropy = Uuid::new_v4().simple().to_string();
    format!("R{}-{}", date_part, entropy[..6].to_uppercase())
}

// =============================================================================
// Unit Tests
// =============================================================================
