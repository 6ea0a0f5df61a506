//! Data models for response generation

use serde::{Deserialize, Serialize};

/// Generated text for one temperature of a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureResponseItem {
    pub temperature: f64,
    pub response: String,
}
