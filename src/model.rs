// Core structs: TransactionRecord, column layout and error types
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Column order of the flat file. The field order of `TransactionRecord`
/// matches it, so the csv writer emits the header in this order.
pub const COLUMNS: [&str; 32] = [
    "Transaction_ID",
    "Date",
    "Time",
    "Store_Name",
    "Store_ID",
    "Region",
    "Category",
    "Product_Name",
    "Brand",
    "SKU",
    "Quantity",
    "Unit_Price",
    "Subtotal",
    "Discount_Percent",
    "Discount_Amount",
    "Tax_Rate",
    "Tax_Amount",
    "Total_Amount",
    "Cost_Per_Unit",
    "Total_Cost",
    "Profit",
    "Profit_Margin",
    "Payment_Method",
    "Customer_Type",
    "Customer_ID",
    "Sales_Channel",
    "Sales_Rep_ID",
    "Promotion_Code",
    "Shipping_Cost",
    "Return_Status",
    "Customer_Rating",
    "Inventory_Status",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReturnStatus {
    Yes,
    No,
}

impl ReturnStatus {
    pub fn is_returned(self) -> bool {
        matches!(self, ReturnStatus::Yes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransactionRecord {
    #[serde(rename = "Transaction_ID")]
    pub transaction_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(rename = "Store_Name")]
    pub store_name: String,
    #[serde(rename = "Store_ID")]
    pub store_id: String,
    pub region: String,
    pub category: String,
    #[serde(rename = "Product_Name")]
    pub product_name: String,
    pub brand: String,
    #[serde(rename = "SKU")]
    pub sku: String,
    pub quantity: u32,
    #[serde(rename = "Unit_Price")]
    pub unit_price: f64,
    pub subtotal: f64,
    #[serde(rename = "Discount_Percent")]
    pub discount_percent: u32,
    #[serde(rename = "Discount_Amount")]
    pub discount_amount: f64,
    #[serde(rename = "Tax_Rate")]
    pub tax_rate: f64,
    #[serde(rename = "Tax_Amount")]
    pub tax_amount: f64,
    #[serde(rename = "Total_Amount")]
    pub total_amount: f64,
    #[serde(rename = "Cost_Per_Unit")]
    pub cost_per_unit: f64,
    #[serde(rename = "Total_Cost")]
    pub total_cost: f64,
    pub profit: f64,
    #[serde(rename = "Profit_Margin")]
    pub profit_margin: f64,
    #[serde(rename = "Payment_Method")]
    pub payment_method: String,
    #[serde(rename = "Customer_Type")]
    pub customer_type: String,
    #[serde(rename = "Customer_ID")]
    pub customer_id: String,
    #[serde(rename = "Sales_Channel")]
    pub sales_channel: String,
    #[serde(rename = "Sales_Rep_ID")]
    pub sales_rep_id: String,
    #[serde(rename = "Promotion_Code")]
    pub promotion_code: String,
    #[serde(rename = "Shipping_Cost")]
    pub shipping_cost: f64,
    #[serde(rename = "Return_Status")]
    pub return_status: ReturnStatus,
    #[serde(rename = "Customer_Rating")]
    pub customer_rating: u8,
    #[serde(rename = "Inventory_Status")]
    pub inventory_status: String,
}

impl TransactionRecord {
    /// Name of the first numeric column holding NaN or an infinity.
    pub fn non_finite_column(&self) -> Option<&'static str> {
        [
            ("Unit_Price", self.unit_price),
            ("Subtotal", self.subtotal),
            ("Discount_Amount", self.discount_amount),
            ("Tax_Rate", self.tax_rate),
            ("Tax_Amount", self.tax_amount),
            ("Total_Amount", self.total_amount),
            ("Cost_Per_Unit", self.cost_per_unit),
            ("Total_Cost", self.total_cost),
            ("Profit", self.profit),
            ("Profit_Margin", self.profit_margin),
            ("Shipping_Cost", self.shipping_cost),
        ]
        .into_iter()
        .find(|(_, value)| !value.is_finite())
        .map(|(column, _)| column)
    }
}

/// Records read back from the flat file, with the arity of its header.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub column_count: usize,
    pub records: Vec<TransactionRecord>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record count must be at least 1")]
    ZeroRecordCount,
    #[error("value pool `{0}` is empty")]
    EmptyPool(String),
    #[error("invalid range for `{field}`: {detail}")]
    InvalidRange { field: String, detail: String },
    #[error("invalid weights for `{field}`: {detail}")]
    InvalidWeights { field: String, detail: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed row at line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[error("missing required column: {0}")]
    MissingColumn(String),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no records: cannot build a report from an empty dataset")]
    EmptyDataset,
}

/// Any failure that ends a run.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}
