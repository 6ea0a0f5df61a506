//! Response generation: prompt relay with optional persona and temperature

pub mod instructions;
pub mod models;
pub mod service;

pub use instructions::SystemInstructions;
pub use models::TemperatureResponseItem;
pub use service::ResponseGenerator;
