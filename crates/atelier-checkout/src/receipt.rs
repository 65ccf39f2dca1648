//! # Receipts
//!
//! The printable view of a committed sale. Built from the ledger's `Sale`
//! record plus store settings; carries only frozen snapshot data, so a
//! receipt rendered today and one rendered next year read identically.

use serde::{Deserialize, Serialize};

use atelier_core::Sale;
use atelier_db::StoreSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: String,
    pub receipt_number: String,
    pub store_name: String,
    pub store_address: String,
    pub store_phone: String,
    pub cashier_name: String,
    pub timestamp: String,
    pub items: Vec<ReceiptItem>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payments: Vec<ReceiptPayment>,
    pub change_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    pub name: String,
    pub sku: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptPayment {
    /// Human label ("Cash", "Bank Transfer", "POS Terminal").
    pub method: String,
    pub amount_cents: i64,
}

impl Receipt {
    /// Builds a receipt from a committed sale and the store's identity.
    pub fn from_sale(sale: &Sale, settings: &StoreSettings) -> Self {
        let change_cents: i64 = sale
            .payments
            .iter()
            .filter_map(|p| p.change_cents)
            .sum();

        Receipt {
            sale_id: sale.id.clone(),
            receipt_number: sale.receipt_number.clone(),
            store_name: settings.store_name.clone(),
            store_address: settings.address.clone(),
            store_phone: settings.phone.clone(),
            cashier_name: sale.cashier_name.clone(),
            timestamp: sale.created_at.to_rfc3339(),
            items: sale
                .lines
                .iter()
                .map(|line| ReceiptItem {
                    name: line.name.clone(),
                    sku: line.sku.clone(),
                    size: line.size.clone(),
                    color: line.color.clone(),
                    quantity: line.quantity,
                    unit_price_cents: line.unit_price_cents,
                    discount_cents: line.discount_cents,
                    line_total_cents: line.unit_price_cents * line.quantity,
                })
                .collect(),
            subtotal_cents: sale.subtotal_cents,
            discount_cents: sale.discount_cents,
            tax_cents: sale.tax_cents,
            total_cents: sale.total_cents,
            payments: sale
                .payments
                .iter()
                .map(|p| ReceiptPayment {
                    method: p.method.label().to_string(),
                    amount_cents: p.amount_cents,
                })
                .collect(),
            change_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_core::{Payment, PaymentMethod, SaleLine, SaleStatus};
    use chrono::Utc;

    #[test]
    fn test_receipt_from_sale() {
        let sale = Sale {
            id: "s1".to_string(),
            receipt_number: "R20260830-ABC123".to_string(),
            status: SaleStatus::Completed,
            lines: vec![SaleLine {
                id: "l1".to_string(),
                product_id: "p1".to_string(),
                name: "Crew Neck Tee".to_string(),
                sku: "TEE-M-BLK".to_string(),
                size: "M".to_string(),
                color: "Black".to_string(),
                quantity: 2,
                unit_price_cents: 5000,
                discount_cents: 0,
            }],
            subtotal_cents: 10000,
            discount_cents: 0,
            tax_cents: 0,
            total_cents: 10000,
            payments: vec![Payment {
                method: PaymentMethod::Cash,
                amount_cents: 10000,
                tendered_cents: Some(12000),
                change_cents: Some(2000),
                reference: None,
            }],
            cashier_id: "u1".to_string(),
            cashier_name: "Front Desk".to_string(),
            created_at: Utc::now(),
        };

        let mut settings = StoreSettings::default();
        settings.store_name = "Atelier Lagos".to_string();

        let receipt = Receipt::from_sale(&sale, &settings);
        assert_eq!(receipt.receipt_number, "R20260830-ABC123");
        assert_eq!(receipt.store_name, "Atelier Lagos");
        assert_eq!(receipt.items.len(), 1);
        assert_eq!(receipt.items[0].line_total_cents, 10000);
        assert_eq!(receipt.payments[0].method, "Cash");
        assert_eq!(receipt.change_cents, 2000);
    }
}
