// Financial derivation chain: unit price and quantity through to profit margin.
use crate::utils::round2;

/// Inputs drawn at random before the derivation runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceInputs {
    pub unit_price: f64,
    pub quantity: u32,
    pub discount_percent: u32,
    pub tax_rate: f64,
    /// Unit cost as a fraction of the unit price.
    pub cost_fraction: f64,
}

/// Every monetary field of a record. Each step is rounded to 2 decimals
/// before the next one consumes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Financials {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
    pub cost_per_unit: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

pub fn subtotal(unit_price: f64, quantity: u32) -> f64 {
    round2(unit_price * f64::from(quantity))
}

pub fn discount_amount(subtotal: f64, discount_percent: u32) -> f64 {
    round2(subtotal * f64::from(discount_percent) / 100.0)
}

pub fn tax_amount(subtotal: f64, discount_amount: f64, tax_rate: f64) -> f64 {
    round2((subtotal - discount_amount) * tax_rate)
}

pub fn total_amount(subtotal: f64, discount_amount: f64, tax_amount: f64) -> f64 {
    round2(subtotal - discount_amount + tax_amount)
}

pub fn cost_per_unit(unit_price: f64, cost_fraction: f64) -> f64 {
    round2(unit_price * cost_fraction)
}

pub fn total_cost(cost_per_unit: f64, quantity: u32) -> f64 {
    round2(cost_per_unit * f64::from(quantity))
}

pub fn profit(total_amount: f64, total_cost: f64) -> f64 {
    round2(total_amount - total_cost)
}

/// Profit as a percentage of the total; 0 when nothing was charged.
pub fn profit_margin(profit: f64, total_amount: f64) -> f64 {
    if total_amount > 0.0 {
        round2(profit / total_amount * 100.0)
    } else {
        0.0
    }
}

impl Financials {
    pub fn derive(inputs: &PriceInputs) -> Self {
        let subtotal = subtotal(inputs.unit_price, inputs.quantity);
        let discount_amount = discount_amount(subtotal, inputs.discount_percent);
        let tax_amount = tax_amount(subtotal, discount_amount, inputs.tax_rate);
        let total_amount = total_amount(subtotal, discount_amount, tax_amount);
        let cost_per_unit = cost_per_unit(inputs.unit_price, inputs.cost_fraction);
        let total_cost = total_cost(cost_per_unit, inputs.quantity);
        let profit = profit(total_amount, total_cost);
        let profit_margin = profit_margin(profit, total_amount);

        Self {
            subtotal,
            discount_amount,
            tax_amount,
            total_amount,
            cost_per_unit,
            total_cost,
            profit,
            profit_margin,
        }
    }
}
