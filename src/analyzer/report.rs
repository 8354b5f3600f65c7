use crate::analyzer::frequency::{FrequencyCounter, FrequencyTable};
use crate::model::{Dataset, ReportError, TransactionRecord};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Trait defining the interface for a dataset analyzer.
pub trait Analyzer {
    fn analyze(&self, dataset: &Dataset) -> Result<SalesReport, ReportError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialSummary {
    pub total_revenue: f64,
    pub total_profit: f64,
    pub average_transaction: f64,
    pub average_profit_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSummary {
    pub returns: usize,
    pub return_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Days between the first and last date, exclusive of the last.
    pub span_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRange {
    pub category: String,
    pub min: f64,
    pub max: f64,
}

/// Aggregate report over one dataset. Built fresh for every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesReport {
    pub transactions: usize,
    pub columns: usize,
    /// Filled in by the caller when the dataset came from a file.
    pub file_size_bytes: Option<u64>,
    pub financials: FinancialSummary,
    pub categories: FrequencyTable,
    pub stores: FrequencyTable,
    pub regions: FrequencyTable,
    pub channels: FrequencyTable,
    pub customer_types: FrequencyTable,
    pub payment_methods: FrequencyTable,
    pub returns: ReturnSummary,
    pub date_range: DateRange,
    /// Sorted by category name.
    pub price_ranges: Vec<PriceRange>,
}

/// Implementation of the dataset analyzer; one pass over the records.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Default)]
struct Accumulator {
    revenue: f64,
    profit: f64,
    margin_sum: f64,
    returns: usize,
    first_date: Option<NaiveDate>,
    last_date: Option<NaiveDate>,
    categories: FrequencyCounter,
    stores: FrequencyCounter,
    regions: FrequencyCounter,
    channels: FrequencyCounter,
    customer_types: FrequencyCounter,
    payment_methods: FrequencyCounter,
    prices: BTreeMap<String, (f64, f64)>,
}

impl Accumulator {
    fn add(&mut self, r: &TransactionRecord) {
        self.revenue += r.total_amount;
        self.profit += r.profit;
        self.margin_sum += r.profit_margin;
        if r.return_status.is_returned() {
            self.returns += 1;
        }

        self.first_date = Some(self.first_date.map_or(r.date, |d| d.min(r.date)));
        self.last_date = Some(self.last_date.map_or(r.date, |d| d.max(r.date)));

        self.categories.add(&r.category);
        self.stores.add(&r.store_name);
        self.regions.add(&r.region);
        self.channels.add(&r.sales_channel);
        self.customer_types.add(&r.customer_type);
        self.payment_methods.add(&r.payment_method);

        self.prices
            .entry(r.category.clone())
            .and_modify(|(min, max)| {
                *min = min.min(r.unit_price);
                *max = max.max(r.unit_price);
            })
            .or_insert((r.unit_price, r.unit_price));
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, dataset: &Dataset) -> Result<SalesReport, ReportError> {
        let total = dataset.records.len();
        if total == 0 {
            return Err(ReportError::EmptyDataset);
        }

        let mut acc = Accumulator::default();
        for record in &dataset.records {
            acc.add(record);
        }

        let (from, to) = match (acc.first_date, acc.last_date) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(ReportError::EmptyDataset),
        };
        let count = total as f64;

        Ok(SalesReport {
            transactions: total,
            columns: dataset.column_count,
            file_size_bytes: None,
            financials: FinancialSummary {
                total_revenue: acc.revenue,
                total_profit: acc.profit,
                average_transaction: acc.revenue / count,
                average_profit_margin: acc.margin_sum / count,
            },
            categories: acc.categories.finish(total),
            stores: acc.stores.finish(total),
            regions: acc.regions.finish(total),
            channels: acc.channels.finish(total),
            customer_types: acc.customer_types.finish(total),
            payment_methods: acc.payment_methods.finish(total),
            returns: ReturnSummary {
                returns: acc.returns,
                return_rate: acc.returns as f64 / count * 100.0,
            },
            date_range: DateRange {
                from,
                to,
                span_days: (to - from).num_days(),
            },
            price_ranges: acc
                .prices
                .into_iter()
                .map(|(category, (min, max))| PriceRange { category, min, max })
                .collect(),
        })
    }
}
