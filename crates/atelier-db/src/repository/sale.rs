//! # Sale Ledger
//!
//! The durable, append-only store of committed sales.
//!
//! ## Ledger Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        Sale Ledger Rules                            │
//! │                                                                     │
//! │  1. APPEND ONCE                                                     │
//! │     └── append() writes sale + lines + payments in ONE transaction  │
//! │         (a half-written sale can never be observed)                 │
//! │                                                                     │
//! │  2. NEVER REWRITE                                                   │
//! │     └── totals, lines, and payments are immutable history           │
//! │                                                                     │
//! │  3. STATUS TAGS ONLY                                                │
//! │     └── tag_refunded()/tag_void() move completed → refunded/void    │
//! │         and are the single permitted mutation                       │
//! │                                                                     │
//! │  4. READ FOR REPORTS                                                │
//! │     └── get_by_id, list_by_date_range, recent, summary_for_range    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use atelier_core::{Payment, PaymentMethod, Sale, SaleLine, SaleStatus};

// =============================================================================
// Row Mapping
// =============================================================================
// Runtime-bound queries map through these row structs; the nested `Sale`
// aggregate (lines + payments) is assembled in Rust.

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    receipt_number: String,
    status: SaleStatus,
    subtotal_cents: i64,
    discount_cents: i64,
    tax_cents: i64,
    total_cents: i64,
    cashier_id: String,
    cashier_name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleLineRow {
    id: String,
    product_id: String,
    name: String,
    sku: String,
    size: String,
    color: String,
    quantity: i64,
    unit_price_cents: i64,
    discount_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    method: PaymentMethod,
    amount_cents: i64,
    tendered_cents: Option<i64>,
    change_cents: Option<i64>,
    reference: Option<String>,
}

impl SaleRow {
    fn into_sale(self, lines: Vec<SaleLine>, payments: Vec<Payment>) -> Sale {
        Sale {
            id: self.id,
            receipt_number: self.receipt_number,
            status: self.status,
            lines,
            subtotal_cents: self.subtotal_cents,
            discount_cents: self.discount_cents,
            tax_cents: self.tax_cents,
            total_cents: self.total_cents,
            payments,
            cashier_id: self.cashier_id,
            cashier_name: self.cashier_name,
            created_at: self.created_at,
        }
    }
}

impl From<SaleLineRow> for SaleLine {
    fn from(row: SaleLineRow) -> Self {
        SaleLine {
            id: row.id,
            product_id: row.product_id,
            name: row.name,
            sku: row.sku,
            size: row.size,
            color: row.color,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
            discount_cents: row.discount_cents,
        }
    }
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            method: row.method,
            amount_cents: row.amount_cents,
            tendered_cents: row.tendered_cents,
            change_cents: row.change_cents,
            reference: row.reference,
        }
    }
}

// =============================================================================
// Report Summary
// =============================================================================

/// Aggregate figures for a date range, for the dashboard and sales report.
///
/// Only `completed` sales count towards revenue; refunded/void sales are
/// excluded from every figure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue_cents: i64,
    pub transaction_count: i64,
    pub average_transaction_cents: i64,
    /// Revenue received per payment method.
    pub cash_cents: i64,
    pub transfer_cents: i64,
    pub pos_terminal_cents: i64,
}

// =============================================================================
// Sale Ledger
// =============================================================================

/// Repository for the append-only sale ledger.
#[derive(Debug, Clone)]
pub struct SaleLedger {
    pool: SqlitePool,
}

impl SaleLedger {
    /// Creates a new SaleLedger over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        SaleLedger { pool }
    }

    /// Appends a committed sale to the ledger.
    ///
    /// Sale, lines, and payments are written in a single transaction: the
    /// ledger either records the whole sale or none of it. A duplicate
    /// receipt number surfaces as `DbError::UniqueViolation`.
    pub async fn append(&self, sale: &Sale) -> DbResult<()> {
        debug!(id = %sale.id, receipt_number = %sale.receipt_number, "Appending sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, receipt_number, status,
                subtotal_cents, discount_cents, tax_cents, total_cents,
                cashier_id, cashier_name, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.receipt_number)
        .bind(sale.status)
        .bind(sale.subtotal_cents)
        .bind(sale.discount_cents)
        .bind(sale.tax_cents)
        .bind(sale.total_cents)
        .bind(&sale.cashier_id)
        .bind(&sale.cashier_name)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for (position, line) in sale.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, sale_id, product_id, name, sku, size, color,
                    quantity, unit_price_cents, discount_cents, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )
            .bind(&line.id)
            .bind(&sale.id)
            .bind(&line.product_id)
            .bind(&line.name)
            .bind(&line.sku)
            .bind(&line.size)
            .bind(&line.color)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.discount_cents)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        for (position, payment) in sale.payments.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO payments (
                    id, sale_id, method, amount_cents,
                    tendered_cents, change_cents, reference, position
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale.id)
            .bind(payment.method)
            .bind(payment.amount_cents)
            .bind(payment.tendered_cents)
            .bind(payment.change_cents)
            .bind(&payment.reference)
            .bind(position as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            id = %sale.id,
            receipt_number = %sale.receipt_number,
            total = %sale.total_cents,
            lines = sale.lines.len(),
            "Sale appended to ledger"
        );

        Ok(())
    }

    /// Fetches a sale by id, fully hydrated with lines and payments.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, receipt_number, status,
                   subtotal_cents, discount_cents, tax_cents, total_cents,
                   cashier_id, cashier_name, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Lists sales committed in `[from, to)`, oldest first.
    ///
    /// This is the read path for the sales report's date filter.
    pub async fn list_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, receipt_number, status,
                   subtotal_cents, discount_cents, tax_cents, total_cents,
                   cashier_id, cashier_name, created_at
            FROM sales
            WHERE created_at >= ?1 AND created_at < ?2
            ORDER BY created_at
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            sales.push(self.hydrate(row).await?);
        }
        Ok(sales)
    }

    /// Lists the most recently committed sales, newest first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let rows: Vec<SaleRow> = sqlx::query_as(
            r#"
            SELECT id, receipt_number, status,
                   subtotal_cents, discount_cents, tax_cents, total_cents,
                   cashier_id, cashier_name, created_at
            FROM sales
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut sales = Vec::with_capacity(rows.len());
        for row in rows {
            sales.push(self.hydrate(row).await?);
        }
        Ok(sales)
    }

    /// Total number of sales in the ledger.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Tags a completed sale as refunded.
    ///
    /// The single permitted mutation on ledger history (besides
    /// [`tag_void`](Self::tag_void)): status moves `completed → refunded`.
    pub async fn tag_refunded(&self, id: &str) -> DbResult<()> {
        self.tag_status(id, SaleStatus::Refunded).await
    }

    /// Tags a completed sale as void.
    pub async fn tag_void(&self, id: &str) -> DbResult<()> {
        self.tag_status(id, SaleStatus::Void).await
    }

    async fn tag_status(&self, id: &str, status: SaleStatus) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE sales SET status = ?2
            WHERE id = ?1 AND status = 'completed'
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish "no such sale" from "already tagged"
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

            return if exists == 0 {
                Err(DbError::not_found("Sale", id))
            } else {
                Err(DbError::InvalidStatusTransition { id: id.to_string() })
            };
        }

        info!(id = %id, status = ?status, "Sale status tagged");
        Ok(())
    }

    /// Aggregates completed sales in `[from, to)` for reporting.
    pub async fn summary_for_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<SalesSummary> {
        let (revenue, count): (Option<i64>, i64) = sqlx::query_as(
            r#"
            SELECT SUM(total_cents), COUNT(*)
            FROM sales
            WHERE status = 'completed' AND created_at >= ?1 AND created_at < ?2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let breakdown: Vec<(PaymentMethod, Option<i64>)> = sqlx::query_as(
            r#"
            SELECT p.method, SUM(p.amount_cents)
            FROM payments p
            JOIN sales s ON s.id = p.sale_id
            WHERE s.status = 'completed' AND s.created_at >= ?1 AND s.created_at < ?2
            GROUP BY p.method
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        let total_revenue_cents = revenue.unwrap_or(0);
        let mut summary = SalesSummary {
            total_revenue_cents,
            transaction_count: count,
            average_transaction_cents: if count > 0 {
                total_revenue_cents / count
            } else {
                0
            },
            cash_cents: 0,
            transfer_cents: 0,
            pos_terminal_cents: 0,
        };

        for (method, amount) in breakdown {
            let amount = amount.unwrap_or(0);
            match method {
                PaymentMethod::Cash => summary.cash_cents = amount,
                PaymentMethod::Transfer => summary.transfer_cents = amount,
                PaymentMethod::PosTerminal => summary.pos_terminal_cents = amount,
            }
        }

        Ok(summary)
    }

    /// Loads lines and payments for a sale row.
    async fn hydrate(&self, row: SaleRow) -> DbResult<Sale> {
        let lines: Vec<SaleLineRow> = sqlx::query_as(
            r#"
            SELECT id, product_id, name, sku, size, color,
                   quantity, unit_price_cents, discount_cents
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let payments: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT method, amount_cents, tendered_cents, change_cents, reference
            FROM payments
            WHERE sale_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(row.into_sale(
            lines.into_iter().map(SaleLine::from).collect(),
            payments.into_iter().map(Payment::from).collect(),
        ))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
