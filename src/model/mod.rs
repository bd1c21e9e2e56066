pub mod holdings;
pub mod quote;
pub mod valuation;
