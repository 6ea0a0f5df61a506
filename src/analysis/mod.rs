//! Prompt analysis: token counts, estimated cost, and context window usage

pub mod calculator;
pub mod catalog;
pub mod models;

pub use calculator::{
    context_usage_percent, context_warnings, estimate_cost, round_to, TokenAnalyzer,
};
pub use catalog::ModelCatalog;
pub use models::{ContextWindowEntry, PricingEntry, TokenAnalysisResponse};
