//! # Domain Types
//!
//! Core domain types used throughout Atelier POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │    Product     │   │      Sale      │   │    Payment     │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  id (UUID)     │   │  id (UUID)     │   │  method        │      │
//! │  │  barcode       │   │  receipt_no    │   │  amount_cents  │      │
//! │  │  price_cents   │   │  status        │   │  reference     │      │
//! │  │  variants[]    │   │  lines[]       │   └────────────────┘      │
//! │  └────────────────┘   └────────────────┘                           │
//! │                                                                     │
//! │  ┌────────────────┐   ┌────────────────┐   ┌────────────────┐      │
//! │  │ ProductVariant │   │   SaleStatus   │   │ PaymentMethod  │      │
//! │  │  ────────────  │   │  ────────────  │   │  ────────────  │      │
//! │  │  size, color   │   │  Completed     │   │  Cash          │      │
//! │  │  stock, sku    │   │  Refunded      │   │  Transfer      │      │
//! │  └────────────────┘   │  Void          │   │  PosTerminal   │      │
//! │                       └────────────────┘   └────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! A committed sale has two identifiers:
//! - `id`: UUID v4 - immutable, used for database relations
//! - `receipt_number`: human-presentable, printed on receipts, unique
//!   across the ledger's lifetime

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 750 bps = 7.5%. Integer bps keep
/// the tax computation in pure integer math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate. The store default: tax collection is off until the
    /// administrator enables it in settings.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Category
// =============================================================================

/// A product category (e.g. "T-Shirts", "Denim").
///
/// Owned by the catalog; the cart engine never writes categories.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Accent color used by the product grid (hex string).
    pub color: String,
}

// =============================================================================
// Product & Variants
// =============================================================================

/// A specific size/color combination of a product.
///
/// Each variant carries its own stock count and SKU. Immutable once handed
/// to the cart engine; stock is the authoritative count available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Size label ("S", "M", "L", "32", ...).
    pub size: String,

    /// Color name ("Black", "Indigo", ...).
    pub color: String,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Stock Keeping Unit for this exact size/color combination.
    pub sku: String,
}

impl ProductVariant {
    /// Checks whether this variant has any stock to sell.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// A product available for sale, with its size/color variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: String,

    /// Category this product belongs to.
    pub category_id: String,

    /// Selling price in minor units.
    pub price_cents: i64,

    /// Cost price in minor units (for margin reporting).
    pub cost_price_cents: i64,

    /// Ordered sequence of size/color variants.
    pub variants: Vec<ProductVariant>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money value.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Looks up the variant matching a size/color combination.
    pub fn variant(&self, size: &str, color: &str) -> Option<&ProductVariant> {
        self.variants
            .iter()
            .find(|v| v.size == size && v.color == color)
    }

    /// Total stock across all variants.
    pub fn total_stock(&self) -> i64 {
        self.variants.iter().map(|v| v.stock).sum()
    }
}

// =============================================================================
// Cashier (Session Identity)
// =============================================================================

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access: catalog management, reports, settings.
    Admin,
    /// Sales floor access: cart and checkout.
    Cashier,
}

/// The authenticated actor stamped onto every committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cashier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Login name.
    pub username: String,

    /// Display name (printed on receipts).
    pub name: String,

    /// Access role.
    pub role: Role,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a payment was tendered.
///
/// A closed enumeration: every site that maps a method to a label or
/// behavior matches exhaustively, so adding a method is a compile-time
/// checked change.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Bank transfer confirmed by reference.
    Transfer,
    /// Card payment on the external POS terminal.
    PosTerminal,
}

impl PaymentMethod {
    /// Human-facing label for receipts and reports.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Transfer => "Bank Transfer",
            PaymentMethod::PosTerminal => "POS Terminal",
        }
    }

    /// All methods, in display order.
    pub const fn all() -> [PaymentMethod; 3] {
        [
            PaymentMethod::Cash,
            PaymentMethod::Transfer,
            PaymentMethod::PosTerminal,
        ]
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A payment tendered towards a sale.
///
/// A sale can carry multiple payments for split tender scenarios; the
/// current terminal UI issues one, but the model does not assume that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// How the money was tendered.
    pub method: PaymentMethod,

    /// Amount applied to the sale, in minor units.
    pub amount_cents: i64,

    /// For cash: the amount the customer handed over.
    pub tendered_cents: Option<i64>,

    /// For cash: change returned to the customer.
    pub change_cents: Option<i64>,

    /// External reference (transfer reference, card auth code, ...).
    pub reference: Option<String>,
}

impl Payment {
    /// Convenience constructor for a plain payment with no tender detail.
    pub fn new(method: PaymentMethod, amount_cents: i64) -> Self {
        Payment {
            method,
            amount_cents,
            tendered_cents: None,
            change_cents: None,
            reference: None,
        }
    }

    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a committed sale.
///
/// Sales are born `Completed`; `Refunded`/`Void` are status tags applied
/// later by a separate workflow. History is never rewritten.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Sale was paid and finalized.
    Completed,
    /// Sale was refunded after completion.
    Refunded,
    /// Sale was voided.
    Void,
}

// =============================================================================
// Sale Line
// =============================================================================

/// One line of a committed sale.
///
/// Uses the snapshot pattern: product name, variant SKU and unit price are
/// frozen at commit time, so later catalog edits or cart mutations cannot
/// retroactively alter sale history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    /// Line identifier (carried over from the cart line).
    pub id: String,

    /// Product this line was sold from.
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub name: String,

    /// Variant SKU at time of sale (frozen).
    pub sku: String,

    /// Selected size.
    pub size: String,

    /// Selected color.
    pub color: String,

    /// Quantity sold.
    pub quantity: i64,

    /// Unit price in minor units at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Absolute discount applied to this line, in minor units.
    pub discount_cents: i64,
}

impl SaleLine {
    /// Line total before discounts (unit price × quantity).
    #[inline]
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed, auditable sale record.
///
/// Created only by a successful checkout and immutable afterwards. The sale
/// ledger appends it once; the only later change a workflow may make is the
/// `status` tag (refund/void).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Human-presentable receipt number, unique across the ledger.
    pub receipt_number: String,

    /// Lifecycle status tag.
    pub status: SaleStatus,

    /// Frozen snapshot of the cart lines at commit time.
    pub lines: Vec<SaleLine>,

    /// Sum of unit price × quantity over all lines.
    pub subtotal_cents: i64,

    /// Global discount + sum of line discounts.
    pub discount_cents: i64,

    /// Tax on the (clamped) taxable amount.
    pub tax_cents: i64,

    /// Amount the customer owed: taxable amount + tax.
    pub total_cents: i64,

    /// Payments tendered against the total.
    pub payments: Vec<Payment>,

    /// Id of the cashier who rang up the sale.
    pub cashier_id: String,

    /// Cashier display name at time of sale (frozen).
    pub cashier_name: String,

    /// Commit timestamp.
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Sum of all payment amounts.
    pub fn total_paid_cents(&self) -> i64 {
        self.payments.iter().map(|p| p.amount_cents).sum()
    }

    /// Total quantity of units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(750);
        assert_eq!(rate.bps(), 750);
        assert!((rate.percentage() - 7.5).abs() < 0.001);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(7.5).bps(), 750);
    }

    #[test]
    fn test_tax_rate_default_is_zero() {
        assert!(TaxRate::default().is_zero());
    }

    #[test]
    fn test_variant_lookup() {
        let product = Product {
            id: "p1".to_string(),
            name: "Crew Neck Tee".to_string(),
            barcode: "5901234123457".to_string(),
            category_id: "c1".to_string(),
            price_cents: 5000,
            cost_price_cents: 2000,
            variants: vec![
                ProductVariant {
                    size: "M".to_string(),
                    color: "Black".to_string(),
                    stock: 4,
                    sku: "TEE-M-BLK".to_string(),
                },
                ProductVariant {
                    size: "L".to_string(),
                    color: "Black".to_string(),
                    stock: 0,
                    sku: "TEE-L-BLK".to_string(),
                },
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(product.variant("M", "Black").unwrap().in_stock());
        assert!(!product.variant("L", "Black").unwrap().in_stock());
        assert!(product.variant("XL", "Black").is_none());
        assert_eq!(product.total_stock(), 4);
    }

    #[test]
    fn test_payment_method_labels_exhaustive() {
        for method in PaymentMethod::all() {
            assert!(!method.label().is_empty());
        }
        assert_eq!(PaymentMethod::Transfer.label(), "Bank Transfer");
    }

    #[test]
    fn test_payment_method_serde_is_snake_case() {
        let json = serde_json::to_string(&PaymentMethod::PosTerminal).unwrap();
        assert_eq!(json, "\"pos_terminal\"");
    }
}
