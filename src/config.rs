use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::model::holdings::{parse_holdings, AnchorItem, Currency};
use crate::render::BarSpec;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub quotes: QuotesConfig,
    pub valuation: ValuationConfig,
    #[serde(default)]
    pub holdings: HoldingsConfig,
    #[serde(default)]
    pub bar: BarSpec,
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotesConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub endpoints: Vec<Endpoint>,
}

/// One remote document and the numeric fields read out of it.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    pub url: String,
    pub fields: Vec<QuoteField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuoteField {
    pub key: String,
    /// RFC 6901 JSON pointer, e.g. `/0/current_price` or `/bitcoin/usd`.
    pub pointer: String,
    pub fallback: f64,
    /// Reject zero as degenerate (supplies, reference prices).
    #[serde(default)]
    pub positive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValuationConfig {
    #[serde(default = "default_current_label")]
    pub current_label: String,
    #[serde(default = "default_reference_label")]
    pub reference_label: String,
    pub current_price_key: String,
    /// When set, the fetched market cap is used instead of price * supply.
    #[serde(default)]
    pub current_cap_key: Option<String>,
    pub current_supply_key: String,
    pub reference_price_key: String,
    pub reference_supply: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HoldingsConfig {
    #[serde(default = "default_amount")]
    pub amount: f64,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub anchor: String,
    /// Quote key holding the unit price in each currency.
    #[serde(default)]
    pub price_keys: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_refresh")]
    pub refresh: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_current_label() -> String {
    "BTC".to_string()
}

fn default_reference_label() -> String {
    "Gold".to_string()
}

fn default_amount() -> f64 {
    1.0
}

fn default_title() -> String {
    "₿ vs Gold".to_string()
}

fn default_refresh() -> String {
    "15m".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Default for HoldingsConfig {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            currency: String::new(),
            anchor: String::new(),
            price_keys: HashMap::new(),
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            refresh: default_refresh(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Refresh policy such as "90s", "15m", "1h" or "1d". Whitespace between the
/// count and the unit is allowed.
pub fn parse_refresh_interval(raw: &str) -> Result<Duration> {
    let s = raw.trim();
    let unit_at = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (count, unit) = s.split_at(unit_at);
    let count: i64 = count
        .parse()
        .with_context(|| format!("refresh interval '{}' must start with a whole number", raw))?;
    if count == 0 {
        bail!("refresh interval '{}' must be longer than zero", raw);
    }

    let interval = match unit.trim() {
        "s" => Duration::try_seconds(count),
        "m" => Duration::try_minutes(count),
        "h" => Duration::try_hours(count),
        "d" => Duration::try_days(count),
        "" => bail!("refresh interval '{}' has no unit (s, m, h or d)", raw),
        other => bail!("refresh interval '{}' has unknown unit '{}'", raw, other),
    };
    interval.with_context(|| format!("refresh interval '{}' is too long", raw))
}

impl HoldingsConfig {
    pub fn currency(&self) -> Currency {
        Currency::parse_or_default(&self.currency)
    }

    pub fn anchor(&self) -> AnchorItem {
        AnchorItem::parse_or_default(&self.anchor)
    }

    /// Quote key for the unit price in the selected currency.
    pub fn price_key(&self) -> Option<&str> {
        self.price_keys
            .get(self.currency().code())
            .map(String::as_str)
    }

    /// Currency the spending-power line is priced in, with its price quote.
    /// A currency without a price quote is priced in USD instead, so a local
    /// anchor price is never divided into a USD amount.
    pub fn pricing(&self) -> (Currency, Option<&str>) {
        let currency = self.currency();
        match self.price_key() {
            Some(key) => (currency, Some(key)),
            None => (
                Currency::Usd,
                self.price_keys.get(Currency::Usd.code()).map(String::as_str),
            ),
        }
    }
}

impl PanelConfig {
    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_refresh_interval(&self.refresh)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = std::env::var("GAUGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut config = Self::from_path(&config_path)?;

        config.apply_host_overrides(
            std::env::var("GAUGE_HOLDINGS").ok().as_deref(),
            std::env::var("GAUGE_CURRENCY").ok().as_deref(),
            std::env::var("GAUGE_ANCHOR").ok().as_deref(),
        );
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Host-supplied parameters. Anything absent keeps the file value;
    /// anything unparsable resolves to the documented default.
    pub fn apply_host_overrides(
        &mut self,
        holdings: Option<&str>,
        currency: Option<&str>,
        anchor: Option<&str>,
    ) {
        if let Some(raw) = holdings {
            self.holdings.amount = parse_holdings(raw);
        }
        if let Some(raw) = currency {
            self.holdings.currency = raw.trim().to_ascii_lowercase();
        }
        if let Some(raw) = anchor {
            self.holdings.anchor = raw.trim().to_ascii_lowercase();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.quotes.endpoints.is_empty() {
            bail!("quotes.endpoints must not be empty");
        }
        for endpoint in &self.quotes.endpoints {
            url::Url::parse(&endpoint.url)
                .with_context(|| format!("invalid endpoint url '{}'", endpoint.url))?;
            if endpoint.fields.is_empty() {
                bail!("endpoint '{}' declares no fields", endpoint.url);
            }
            for field in &endpoint.fields {
                if !field.fallback.is_finite() || field.fallback < 0.0 {
                    bail!("field '{}' has an invalid fallback {}", field.key, field.fallback);
                }
                if field.positive && field.fallback <= 0.0 {
                    bail!("field '{}' is positive but its fallback is {}", field.key, field.fallback);
                }
            }
        }

        let v = &self.valuation;
        if self.field(&v.current_price_key).is_none() {
            bail!(
                "valuation key '{}' is not produced by any endpoint",
                v.current_price_key
            );
        }
        // Divisors and caps must never reach the ratio math as zero.
        let mut divisors = vec![v.current_supply_key.as_str(), v.reference_price_key.as_str()];
        if let Some(cap_key) = &v.current_cap_key {
            divisors.push(cap_key.as_str());
        }
        for key in divisors {
            match self.field(key) {
                None => bail!("valuation key '{}' is not produced by any endpoint", key),
                Some(field) if !field.positive => {
                    bail!("valuation field '{}' must be declared with positive = true", key)
                }
                Some(_) => {}
            }
        }
        if !v.reference_supply.is_finite() || v.reference_supply <= 0.0 {
            bail!("valuation.reference_supply must be > 0");
        }

        for (code, key) in &self.holdings.price_keys {
            if Currency::from_code(code).is_none() {
                bail!("holdings.price_keys has unknown currency '{}'", code);
            }
            if self.field(key).is_none() {
                bail!(
                    "holdings.price_keys.{} = '{}' is not produced by any endpoint",
                    code,
                    key
                );
            }
        }

        self.bar
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid [bar] section: {}", e))?;
        self.panel
            .refresh_interval()
            .context("panel.refresh is invalid")?;
        Ok(())
    }

    fn field(&self, key: &str) -> Option<&QuoteField> {
        self.quotes
            .endpoints
            .iter()
            .flat_map(|e| e.fields.iter())
            .find(|f| f.key == key)
    }
}
