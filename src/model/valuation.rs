use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub unit_price: f64,
    pub supply: f64,
    /// Directly fetched market cap; preferred over `unit_price * supply`.
    pub market_cap: Option<f64>,
}

impl Valuation {
    pub fn from_price(unit_price: f64, supply: f64) -> Self {
        Self {
            unit_price,
            supply,
            market_cap: None,
        }
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    pub fn cap(&self) -> f64 {
        self.market_cap.unwrap_or(self.unit_price * self.supply)
    }
}
