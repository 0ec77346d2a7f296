//! Quote totals derivation.
//!
//! `compute_totals` is pure and synchronous with the write path: it runs at
//! creation and again on every update whose payload includes line items,
//! never as a background recomputation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::LineItemInput;
use crate::entities::quote::QuoteLineItem;
use crate::errors::ServiceError;

/// Monetary summary of a line-item list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTotals {
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
}

/// Derives subtotal, tax and total from normalized line items.
pub fn compute_totals(items: &[QuoteLineItem], tax_rate: Decimal) -> QuoteTotals {
    let subtotal: Decimal = items.iter().map(|item| item.line_total).sum();
    let tax_amount = (subtotal * tax_rate).round_dp(2);
    let total = subtotal + tax_amount;

    QuoteTotals {
        subtotal,
        tax_amount,
        total,
    }
}

/// Converts raw line-item input into stored line items, deriving
/// `line_total = quantity × unit_price`.
///
/// Missing quantities default to 1 and missing prices to zero; negative
/// values are rejected outright.
pub fn normalize_line_items(items: &[LineItemInput]) -> Result<Vec<QuoteLineItem>, ServiceError> {
    items
        .iter()
        .map(|item| {
            let quantity = item.quantity.unwrap_or(1);
            if quantity < 1 {
                return Err(ServiceError::ValidationError(format!(
                    "Line item quantity must be a positive integer, got {}",
                    quantity
                )));
            }

            let unit_price = item.unit_price.unwrap_or(Decimal::ZERO);
            if unit_price < Decimal::ZERO {
                return Err(ServiceError::ValidationError(format!(
                    "Line item unit price cannot be negative, got {}",
                    unit_price
                )));
            }

            Ok(QuoteLineItem {
                product_id: item.product_id,
                code: item.code.clone().unwrap_or_default(),
                name: item.name.clone().unwrap_or_default(),
                brand: item.brand.clone().unwrap_or_else(|| "N/A".to_string()),
                category: item.category.clone().unwrap_or_else(|| "N/A".to_string()),
                description: item.description.clone().unwrap_or_default(),
                quantity,
                unit_price,
                line_total: unit_price * Decimal::from(quantity),
            })
        })
        .collect()
}
