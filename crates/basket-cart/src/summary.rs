//! Checkout summary derivation. Pure, no side effects.

use serde::{Deserialize, Serialize};

use basket_core::config::CartConfig;
use basket_core::models::CartLine;

/// Everything the checkout page needs in one derivation.
///
/// Tax and shipping are local estimates (fixed rate, flat fee with a
/// free-shipping threshold); the backend recomputes the real figures at
/// order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub subtotal: f64,
    pub item_count: u32,
    pub estimated_tax: f64,
    pub estimated_shipping: f64,
    pub total: f64,
}

impl CartSummary {
    pub fn derive(lines: &[CartLine], config: &CartConfig) -> Self {
        let subtotal: f64 = lines
            .iter()
            .map(|line| line.product.price * f64::from(line.quantity))
            .sum();
        let item_count: u32 = lines.iter().map(|line| line.quantity).sum();
        let estimated_tax = subtotal * config.tax_rate;
        let estimated_shipping = if subtotal > config.free_shipping_threshold {
            0.0
        } else {
            config.flat_shipping_fee
        };

        Self {
            items: lines.to_vec(),
            subtotal,
            item_count,
            estimated_tax,
            estimated_shipping,
            total: subtotal + estimated_tax + estimated_shipping,
        }
    }
}
