// Human-readable and JSON renderings of a SalesReport.
use crate::analyzer::frequency::FrequencyEntry;
use crate::analyzer::report::SalesReport;
use crate::utils::{dot_leader, format_count, format_file_size, format_money};
use std::fmt;

const RULE_WIDTH: usize = 70;
const LABEL_WIDTH: usize = 30;

/// Text rendering of a report. `top_n` bounds the category and store tables.
pub struct TextReport<'a> {
    report: &'a SalesReport,
    top_n: usize,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a SalesReport, top_n: usize) -> Self {
        Self { report, top_n }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let top_n = self.top_n;
        let rule = "=".repeat(RULE_WIDTH);

        writeln!(f, "{}", rule)?;
        writeln!(f, "BRAND STORE SALES DATASET - QUICK ANALYSIS")?;
        writeln!(f, "{}", rule)?;

        writeln!(f, "\n📊 DATASET OVERVIEW")?;
        writeln!(f, "   Total Transactions: {}", format_count(report.transactions))?;
        writeln!(f, "   Total Columns: {}", report.columns)?;
        if let Some(bytes) = report.file_size_bytes {
            writeln!(f, "   File Size: {}", format_file_size(bytes))?;
        }

        let money = &report.financials;
        writeln!(f, "\n💰 FINANCIAL SUMMARY")?;
        writeln!(f, "   Total Revenue: ${}", format_money(money.total_revenue))?;
        writeln!(f, "   Total Profit: ${}", format_money(money.total_profit))?;
        writeln!(f, "   Average Transaction: ${}", format_money(money.average_transaction))?;
        writeln!(f, "   Average Profit Margin: {:.2}%", money.average_profit_margin)?;

        writeln!(f, "\n📦 TOP {} CATEGORIES BY TRANSACTION COUNT", top_n)?;
        write_entries(f, report.categories.top(top_n))?;

        writeln!(f, "\n🏪 TOP {} STORES BY TRANSACTION COUNT", top_n)?;
        write_entries(f, report.stores.top(top_n))?;

        writeln!(f, "\n🗺️  SALES BY REGION")?;
        write_entries(f, &report.regions.entries)?;

        writeln!(f, "\n📱 SALES BY CHANNEL")?;
        write_entries(f, &report.channels.entries)?;

        writeln!(f, "\n👥 CUSTOMER TYPE DISTRIBUTION")?;
        write_entries(f, &report.customer_types.entries)?;

        writeln!(f, "\n💳 PAYMENT METHOD DISTRIBUTION")?;
        write_entries(f, &report.payment_methods.entries)?;

        writeln!(f, "\n🔄 RETURN ANALYSIS")?;
        writeln!(f, "   Total Returns: {}", format_count(report.returns.returns))?;
        writeln!(f, "   Return Rate: {:.2}%", report.returns.return_rate)?;

        let range = &report.date_range;
        writeln!(f, "\n📅 DATE RANGE")?;
        writeln!(f, "   From: {}", range.from.format("%B %d, %Y"))?;
        writeln!(f, "   To: {}", range.to.format("%B %d, %Y"))?;
        writeln!(f, "   Duration: {} days", range.span_days)?;

        writeln!(f, "\n💵 PRICE RANGES BY CATEGORY")?;
        for p in &report.price_ranges {
            writeln!(
                f,
                "   {} ${:>7.2} - ${:>7.2}",
                dot_leader(&p.category, LABEL_WIDTH),
                p.min,
                p.max
            )?;
        }

        writeln!(f, "\n{}", rule)?;
        writeln!(f, "✅ Report complete.")?;
        write!(f, "{}", rule)
    }
}

fn write_entries(f: &mut fmt::Formatter<'_>, entries: &[FrequencyEntry]) -> fmt::Result {
    for e in entries {
        writeln!(
            f,
            "   {} {:>4} ({:>5.1}%)",
            dot_leader(&e.value, LABEL_WIDTH),
            e.count,
            e.percent
        )?;
    }
    Ok(())
}

pub fn render_json(report: &SalesReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
