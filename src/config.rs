use crate::model::ConfigError;
use crate::utils::round2;
use chrono::{Days, NaiveDate};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_DATASET_PATH: &str = "sample_data/brand_store_sales.csv";

/// A value paired with its relative selection weight.
#[derive(Debug, Clone, Deserialize)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: u32,
}

impl<T> Weighted<T> {
    pub fn new(value: T, weight: u32) -> Self {
        Self { value, weight }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub products: Vec<String>,
    /// Inclusive unit-price bounds.
    pub price_range: (f64, f64),
    #[serde(default = "default_category_weight")]
    pub weight: u32,
}

fn default_category_weight() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub record_count: u64,
    pub start_date: NaiveDate,
    /// Dates are drawn from `start_date ..= start_date + date_window_days`.
    pub date_window_days: u32,
    pub stores: Vec<String>,
    pub categories: Vec<CategoryConfig>,
    pub brands: Vec<String>,
    pub payment_methods: Vec<String>,
    pub customer_types: Vec<String>,
    pub regions: Vec<String>,
    pub sales_channels: Vec<String>,
    /// Channels that ship goods and therefore carry a shipping cost.
    pub shipped_channels: Vec<String>,
    pub tax_rate: f64,
    pub quantity_range: (u32, u32),
    pub discount_percents: Vec<Weighted<u32>>,
    pub promotion_codes: Vec<Weighted<String>>,
    /// Weights for "returned" and "not returned".
    pub return_weights: (u32, u32),
    pub inventory_statuses: Vec<Weighted<String>>,
    /// Unit cost as a fraction of unit price.
    pub cost_fraction: (f64, f64),
    pub max_shipping_cost: f64,
    pub store_hours: (u32, u32),
    pub rating_range: (u8, u8),
    pub seed: Option<u64>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn category(name: &str, products: &[&str], min: f64, max: f64) -> CategoryConfig {
    CategoryConfig {
        name: name.to_string(),
        products: strings(products),
        price_range: (min, max),
        weight: 1,
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            record_count: 5000,
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            date_window_days: 730,
            stores: strings(&[
                "New York Flagship",
                "Los Angeles Downtown",
                "Chicago Magnificent Mile",
                "Miami Beach",
                "Houston Galleria",
                "Phoenix Fashion Square",
                "Philadelphia Center City",
                "San Antonio Riverwalk",
                "San Diego Gaslamp",
                "Dallas NorthPark",
                "San Jose Valley Fair",
                "Austin Domain",
                "Seattle Pike Place",
                "Denver Cherry Creek",
                "Boston Newbury Street",
                "Portland Pearl District",
                "Las Vegas Strip",
                "Atlanta Buckhead",
                "Orlando Mall",
                "Tampa Bay Street",
            ]),
            categories: vec![
                category(
                    "Electronics",
                    &[
                        "Smartphone",
                        "Laptop",
                        "Tablet",
                        "Smartwatch",
                        "Headphones",
                        "Camera",
                        "Gaming Console",
                        "Smart TV",
                    ],
                    200.0,
                    2000.0,
                ),
                category(
                    "Clothing",
                    &["T-Shirt", "Jeans", "Dress", "Jacket", "Sweater", "Shirt", "Pants", "Skirt"],
                    20.0,
                    200.0,
                ),
                category(
                    "Footwear",
                    &[
                        "Sneakers",
                        "Boots",
                        "Sandals",
                        "Heels",
                        "Loafers",
                        "Running Shoes",
                        "Dress Shoes",
                    ],
                    40.0,
                    300.0,
                ),
                category(
                    "Accessories",
                    &[
                        "Watch",
                        "Sunglasses",
                        "Belt",
                        "Wallet",
                        "Handbag",
                        "Backpack",
                        "Scarf",
                        "Hat",
                    ],
                    30.0,
                    500.0,
                ),
                category(
                    "Home & Living",
                    &[
                        "Bedding Set",
                        "Lamp",
                        "Cushion",
                        "Rug",
                        "Wall Art",
                        "Vase",
                        "Mirror",
                        "Clock",
                    ],
                    25.0,
                    400.0,
                ),
                category(
                    "Beauty & Personal Care",
                    &[
                        "Perfume",
                        "Skincare Set",
                        "Makeup Kit",
                        "Hair Dryer",
                        "Shampoo",
                        "Body Lotion",
                    ],
                    15.0,
                    150.0,
                ),
                category(
                    "Sports & Outdoors",
                    &[
                        "Yoga Mat",
                        "Dumbbell Set",
                        "Bicycle",
                        "Tennis Racket",
                        "Camping Tent",
                        "Hiking Boots",
                    ],
                    30.0,
                    800.0,
                ),
                category(
                    "Books & Media",
                    &["Novel", "Magazine", "Cookbook", "Biography", "Comic Book", "Audio Book"],
                    10.0,
                    50.0,
                ),
                category(
                    "Toys & Games",
                    &[
                        "Board Game",
                        "Action Figure",
                        "Puzzle",
                        "Doll",
                        "Building Blocks",
                        "Video Game",
                    ],
                    15.0,
                    100.0,
                ),
                category(
                    "Jewelry",
                    &["Necklace", "Bracelet", "Earrings", "Ring", "Pendant", "Brooch"],
                    100.0,
                    5000.0,
                ),
            ],
            brands: strings(&[
                "Premium Brand A",
                "Luxury Brand B",
                "Designer Brand C",
                "Classic Brand D",
                "Modern Brand E",
                "Elite Brand F",
                "Signature Brand G",
                "Heritage Brand H",
                "Contemporary Brand I",
                "Exclusive Brand J",
            ]),
            payment_methods: strings(&[
                "Credit Card",
                "Debit Card",
                "Cash",
                "Digital Wallet",
                "Gift Card",
                "Buy Now Pay Later",
            ]),
            customer_types: strings(&["Regular", "VIP", "New", "Returning", "Member"]),
            regions: strings(&["Northeast", "Southeast", "Midwest", "Southwest", "West"]),
            sales_channels: strings(&["In-Store", "Online", "Mobile App", "Phone Order"]),
            shipped_channels: strings(&["Online", "Mobile App", "Phone Order"]),
            tax_rate: 0.08,
            quantity_range: (1, 5),
            discount_percents: vec![
                Weighted::new(0, 3),
                Weighted::new(5, 1),
                Weighted::new(10, 1),
                Weighted::new(15, 1),
                Weighted::new(20, 1),
                Weighted::new(25, 1),
                Weighted::new(30, 1),
            ],
            promotion_codes: vec![
                Weighted::new("NONE".to_string(), 3),
                Weighted::new("SUMMER20".to_string(), 1),
                Weighted::new("WINTER25".to_string(), 1),
                Weighted::new("FLASH15".to_string(), 1),
                Weighted::new("VIP30".to_string(), 1),
                Weighted::new("NEWCUST10".to_string(), 1),
            ],
            return_weights: (1, 8),
            inventory_statuses: vec![
                Weighted::new("In Stock".to_string(), 3),
                Weighted::new("Low Stock".to_string(), 1),
                Weighted::new("Out of Stock".to_string(), 1),
            ],
            cost_fraction: (0.6, 0.8),
            max_shipping_cost: 25.0,
            store_hours: (9, 21),
            rating_range: (1, 5),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Checks every value against its domain. Runs before any record is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.record_count == 0 {
            return Err(ConfigError::ZeroRecordCount);
        }
        if self.checked_end_date().is_none() {
            return Err(invalid_range(
                "date_window_days",
                format!(
                    "{} days after {} is past the last representable date",
                    self.date_window_days, self.start_date
                ),
            ));
        }

        for (name, pool) in [
            ("stores", &self.stores),
            ("brands", &self.brands),
            ("payment_methods", &self.payment_methods),
            ("customer_types", &self.customer_types),
            ("regions", &self.regions),
            ("sales_channels", &self.sales_channels),
        ] {
            if pool.is_empty() {
                return Err(ConfigError::EmptyPool(name.to_string()));
            }
        }
        if self.categories.is_empty() {
            return Err(ConfigError::EmptyPool("categories".to_string()));
        }
        for cat in &self.categories {
            if cat.products.is_empty() {
                return Err(ConfigError::EmptyPool(format!("categories.{}.products", cat.name)));
            }
            let (min, max) = cat.price_range;
            if !(min.is_finite() && max.is_finite()) || min < 0.0 || min > max {
                return Err(invalid_range(
                    &format!("categories.{}.price_range", cat.name),
                    format!("expected 0 <= min <= max, got ({}, {})", min, max),
                ));
            }
            // drawn prices are rounded to cents and must stay inside the bounds
            if round2(min) != min || round2(max) != max {
                return Err(invalid_range(
                    &format!("categories.{}.price_range", cat.name),
                    format!("bounds must have at most 2 decimals, got ({}, {})", min, max),
                ));
            }
        }
        if self.categories.iter().all(|c| c.weight == 0) {
            return Err(invalid_weights("categories", "all weights are zero"));
        }

        if !(0.0..=1.0).contains(&self.tax_rate) {
            return Err(invalid_range("tax_rate", format!("expected 0..=1, got {}", self.tax_rate)));
        }

        let (q_min, q_max) = self.quantity_range;
        if q_min == 0 || q_min > q_max {
            return Err(invalid_range(
                "quantity_range",
                format!("expected 1 <= min <= max, got ({}, {})", q_min, q_max),
            ));
        }

        check_weights("discount_percents", &self.discount_percents)?;
        if let Some(bad) = self.discount_percents.iter().find(|d| d.value > 100) {
            return Err(invalid_range(
                "discount_percents",
                format!("discount {}% exceeds 100%", bad.value),
            ));
        }
        check_weights("promotion_codes", &self.promotion_codes)?;
        check_weights("inventory_statuses", &self.inventory_statuses)?;
        if self.return_weights.0 == 0 && self.return_weights.1 == 0 {
            return Err(invalid_weights("return_weights", "all weights are zero"));
        }

        let (c_min, c_max) = self.cost_fraction;
        if !(c_min > 0.0 && c_min <= c_max && c_max <= 1.0) {
            return Err(invalid_range(
                "cost_fraction",
                format!("expected 0 < min <= max <= 1, got ({}, {})", c_min, c_max),
            ));
        }

        if !self.max_shipping_cost.is_finite() || self.max_shipping_cost < 0.0 {
            return Err(invalid_range(
                "max_shipping_cost",
                format!("expected a non-negative amount, got {}", self.max_shipping_cost),
            ));
        }

        let (open, close) = self.store_hours;
        if open > close || close > 23 {
            return Err(invalid_range(
                "store_hours",
                format!("expected open <= close <= 23, got ({}, {})", open, close),
            ));
        }

        let (r_min, r_max) = self.rating_range;
        if r_min > r_max {
            return Err(invalid_range(
                "rating_range",
                format!("expected min <= max, got ({}, {})", r_min, r_max),
            ));
        }

        Ok(())
    }

    /// Last day a generated record may fall on. Saturates for configs that
    /// fail `validate()`.
    pub fn end_date(&self) -> NaiveDate {
        self.checked_end_date().unwrap_or(NaiveDate::MAX)
    }

    fn checked_end_date(&self) -> Option<NaiveDate> {
        self.start_date
            .checked_add_days(Days::new(u64::from(self.date_window_days)))
    }
}

fn check_weights<T>(field: &str, entries: &[Weighted<T>]) -> Result<(), ConfigError> {
    if entries.is_empty() {
        return Err(ConfigError::EmptyPool(field.to_string()));
    }
    if entries.iter().all(|e| e.weight == 0) {
        return Err(invalid_weights(field, "all weights are zero"));
    }
    Ok(())
}

fn invalid_range(field: &str, detail: String) -> ConfigError {
    ConfigError::InvalidRange {
        field: field.to_string(),
        detail,
    }
}

fn invalid_weights(field: &str, detail: &str) -> ConfigError {
    ConfigError::InvalidWeights {
        field: field.to_string(),
        detail: detail.to_string(),
    }
}

/// Loads a JSON config; fields absent from the file keep their defaults.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: GeneratorConfig = serde_json::from_str(&content)?;
    Ok(config)
}
