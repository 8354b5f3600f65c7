use crate::config::{CategoryConfig, GeneratorConfig, Weighted};
use crate::generator::derivation::{Financials, PriceInputs};
use crate::generator::weighted::WeightedChoice;
use crate::model::{ConfigError, ReturnStatus, TransactionRecord};
use crate::utils::round2;
use chrono::{Days, NaiveDate, NaiveTime};
use rand::Rng;
use std::collections::HashSet;

/// Builds one transaction per call from the configured value pools.
/// Holds no state between calls besides the prepared distributions.
pub struct RecordSynthesizer {
    start_date: NaiveDate,
    date_window_days: u32,
    stores: WeightedChoice<usize>,
    store_names: Vec<String>,
    categories: WeightedChoice<CategoryConfig>,
    brands: WeightedChoice<String>,
    payment_methods: WeightedChoice<String>,
    customer_types: WeightedChoice<String>,
    regions: WeightedChoice<String>,
    sales_channels: WeightedChoice<String>,
    shipped_channels: HashSet<String>,
    discounts: WeightedChoice<u32>,
    promotions: WeightedChoice<String>,
    returns: WeightedChoice<ReturnStatus>,
    inventory: WeightedChoice<String>,
    tax_rate: f64,
    quantity_range: (u32, u32),
    cost_fraction: (f64, f64),
    max_shipping_cost: f64,
    store_hours: (u32, u32),
    rating_range: (u8, u8),
}

impl RecordSynthesizer {
    pub fn new(cfg: &GeneratorConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let store_indices: Vec<usize> = (0..cfg.stores.len()).collect();
        let categories: Vec<Weighted<CategoryConfig>> = cfg
            .categories
            .iter()
            .map(|c| Weighted::new(c.clone(), c.weight))
            .collect();
        let returns = [
            Weighted::new(ReturnStatus::Yes, cfg.return_weights.0),
            Weighted::new(ReturnStatus::No, cfg.return_weights.1),
        ];

        Ok(Self {
            start_date: cfg.start_date,
            date_window_days: cfg.date_window_days,
            stores: WeightedChoice::uniform("stores", &store_indices)?,
            store_names: cfg.stores.clone(),
            categories: WeightedChoice::new("categories", &categories)?,
            brands: WeightedChoice::uniform("brands", &cfg.brands)?,
            payment_methods: WeightedChoice::uniform("payment_methods", &cfg.payment_methods)?,
            customer_types: WeightedChoice::uniform("customer_types", &cfg.customer_types)?,
            regions: WeightedChoice::uniform("regions", &cfg.regions)?,
            sales_channels: WeightedChoice::uniform("sales_channels", &cfg.sales_channels)?,
            shipped_channels: cfg.shipped_channels.iter().cloned().collect(),
            discounts: WeightedChoice::new("discount_percents", &cfg.discount_percents)?,
            promotions: WeightedChoice::new("promotion_codes", &cfg.promotion_codes)?,
            returns: WeightedChoice::new("return_weights", &returns)?,
            inventory: WeightedChoice::new("inventory_statuses", &cfg.inventory_statuses)?,
            tax_rate: cfg.tax_rate,
            quantity_range: cfg.quantity_range,
            cost_fraction: cfg.cost_fraction,
            max_shipping_cost: cfg.max_shipping_cost,
            store_hours: cfg.store_hours,
            rating_range: cfg.rating_range,
        })
    }

    /// `index` is zero-based; the transaction id is `TXN` + the 1-based position.
    pub fn synthesize<R: Rng + ?Sized>(&self, index: u64, rng: &mut R) -> TransactionRecord {
        // validate() guarantees start_date + date_window_days is representable
        let offset = rng.random_range(0..=self.date_window_days);
        let date = self.start_date + Days::new(u64::from(offset));
        let time = self.draw_time(rng);

        let store_idx = *self.stores.sample(rng);
        let region = self.regions.sample(rng).clone();

        // Category picks the product pool and the price range.
        let category = self.categories.sample(rng);
        let product = &category.products[rng.random_range(0..category.products.len())];
        let brand = self.brands.sample(rng).clone();
        let sku = format!("{}{}", sku_prefix(&category.name), rng.random_range(1000..=9999));

        let (price_min, price_max) = category.price_range;
        let unit_price = round2(rng.random_range(price_min..=price_max));
        let quantity = rng.random_range(self.quantity_range.0..=self.quantity_range.1);
        let discount_percent = *self.discounts.sample(rng);
        let cost_fraction = rng.random_range(self.cost_fraction.0..=self.cost_fraction.1);
        let money = Financials::derive(&PriceInputs {
            unit_price,
            quantity,
            discount_percent,
            tax_rate: self.tax_rate,
            cost_fraction,
        });

        let payment_method = self.payment_methods.sample(rng).clone();
        let customer_type = self.customer_types.sample(rng).clone();
        let customer_id = format!("CUST{}", rng.random_range(1000..=9999));
        let sales_channel = self.sales_channels.sample(rng).clone();
        let sales_rep_id = format!("REP{}", rng.random_range(100..=999));
        let promotion_code = self.promotions.sample(rng).clone();
        let shipping_cost = if self.shipped_channels.contains(&sales_channel) {
            round2(rng.random_range(0.0..=self.max_shipping_cost))
        } else {
            0.0
        };
        let return_status = *self.returns.sample(rng);
        let customer_rating = rng.random_range(self.rating_range.0..=self.rating_range.1);
        let inventory_status = self.inventory.sample(rng).clone();

        TransactionRecord {
            transaction_id: format!("TXN{:06}", index + 1),
            date,
            time,
            store_name: self.store_names[store_idx].clone(),
            store_id: format!("ST{:03}", store_idx + 1),
            region,
            category: category.name.clone(),
            product_name: product.clone(),
            brand,
            sku,
            quantity,
            unit_price,
            subtotal: money.subtotal,
            discount_percent,
            discount_amount: money.discount_amount,
            tax_rate: self.tax_rate,
            tax_amount: money.tax_amount,
            total_amount: money.total_amount,
            cost_per_unit: money.cost_per_unit,
            total_cost: money.total_cost,
            profit: money.profit,
            profit_margin: money.profit_margin,
            payment_method,
            customer_type,
            customer_id,
            sales_channel,
            sales_rep_id,
            promotion_code,
            shipping_cost,
            return_status,
            customer_rating,
            inventory_status,
        }
    }

    fn draw_time<R: Rng + ?Sized>(&self, rng: &mut R) -> NaiveTime {
        let hour = rng.random_range(self.store_hours.0..=self.store_hours.1);
        let minute = rng.random_range(0..=59);
        let second = rng.random_range(0..=59);
        // store_hours is validated to end at 23 or earlier
        NaiveTime::from_hms_opt(hour, minute, second).unwrap_or_default()
    }
}

/// First three characters of the category, upper-cased.
fn sku_prefix(category: &str) -> String {
    category.chars().take(3).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sample(count: u64, seed: u64) -> (GeneratorConfig, Vec<TransactionRecord>) {
        let cfg = GeneratorConfig::default();
        let synth = RecordSynthesizer::new(&cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let records = (0..count).map(|i| synth.synthesize(i, &mut rng)).collect();
        (cfg, records)
    }

    #[test]
    fn records_respect_configured_domains() {
        let (cfg, records) = sample(2000, 11);
        for r in &records {
            let cat = cfg.categories.iter().find(|c| c.name == r.category).unwrap();
            assert!(
                cat.products.contains(&r.product_name),
                "{} not in {}",
                r.product_name,
                cat.name
            );
            assert!(r.unit_price >= cat.price_range.0 && r.unit_price <= cat.price_range.1);
            assert!(r.discount_percent <= 100);
            assert!(r.cost_per_unit <= r.unit_price);
            assert!((1..=5).contains(&r.quantity));
            assert!((1..=5).contains(&r.customer_rating));
            assert!(r.date >= cfg.start_date && r.date <= cfg.end_date());
            assert!(r.time >= NaiveTime::from_hms_opt(9, 0, 0).unwrap());
            assert!(r.time <= NaiveTime::from_hms_opt(21, 59, 59).unwrap());
            assert!(r.sku.len() == 7);
            assert!(r.customer_id.starts_with("CUST"));
            assert!(r.sales_rep_id.starts_with("REP"));
        }
    }

    #[test]
    fn margin_matches_profit_over_total() {
        let (_, records) = sample(2000, 3);
        for r in &records {
            if r.total_amount == 0.0 {
                assert_eq!(r.profit_margin, 0.0);
            } else {
                let expected = round2(r.profit / r.total_amount * 100.0);
                assert!((r.profit_margin - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn shipping_only_charged_on_shipped_channels() {
        let (_, records) = sample(2000, 5);
        for r in &records {
            if r.sales_channel == "In-Store" {
                assert_eq!(r.shipping_cost, 0.0);
            } else {
                assert!(r.shipping_cost >= 0.0 && r.shipping_cost <= 25.0);
            }
        }
        assert!(records.iter().any(|r| r.shipping_cost > 0.0));
    }

    #[test]
    fn ids_follow_their_formats() {
        let (cfg, records) = sample(3, 9);
        assert_eq!(records[0].transaction_id, "TXN000001");
        assert_eq!(records[2].transaction_id, "TXN000003");
        for r in &records {
            let pos = cfg.stores.iter().position(|s| *s == r.store_name).unwrap();
            assert_eq!(r.store_id, format!("ST{:03}", pos + 1));
        }
    }

    #[test]
    fn narrow_price_range_keeps_prices_inside() {
        let mut cfg = GeneratorConfig::default();
        cfg.categories.truncate(1);
        cfg.categories[0].price_range = (10.01, 10.04);
        let synth = RecordSynthesizer::new(&cfg).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        for i in 0..200 {
            let r = synth.synthesize(i, &mut rng);
            assert!(r.unit_price >= 10.01 && r.unit_price <= 10.04, "price {}", r.unit_price);
        }
    }

    #[test]
    fn overflowing_date_window_fails_before_synthesis() {
        let cfg = GeneratorConfig {
            date_window_days: u32::MAX,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            RecordSynthesizer::new(&cfg),
            Err(ConfigError::InvalidRange { .. })
        ));
    }

    #[test]
    fn sku_prefix_uses_first_three_letters() {
        assert_eq!(sku_prefix("Home & Living"), "HOM");
        assert_eq!(sku_prefix("Books & Media"), "BOO");
        assert_eq!(sku_prefix("TV"), "TV");
    }

    #[test]
    fn same_seed_same_records() {
        let (_, a) = sample(10, 1234);
        let (_, b) = sample(10, 1234);
        assert_eq!(a, b);
    }

    #[test]
    fn discounts_skew_towards_zero() {
        let (_, records) = sample(3000, 21);
        let zero = records.iter().filter(|r| r.discount_percent == 0).count();
        let five = records.iter().filter(|r| r.discount_percent == 5).count();
        assert!(zero > five * 2, "zero={} five={}", zero, five);
    }
}
