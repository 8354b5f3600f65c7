// Analyzer module: aggregates submodules for the dataset report.

pub mod frequency;
pub mod render;
pub mod report;

// Re-export the main Analyzer implementation for ease of use.
pub use report::{Analyzer, AnalyzerImpl, SalesReport};
