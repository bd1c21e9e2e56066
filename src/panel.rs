//! One refresh pass: quotes in, formatted text and a rendered bar out.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::GaugeError;
use crate::format;
use crate::model::holdings::{Currency, HolderRank};
use crate::model::quote::{QuoteBatch, QuoteOrigin};
use crate::model::valuation::Valuation;
use crate::quote_source::fetch_quotes;
use crate::ratio::{compute_ratio, purchasing_power, PurchasingPower, RatioResult};
use crate::render::{self, Bitmap};

pub const PNG_FILE: &str = "gauge.png";
pub const JSON_FILE: &str = "panel.json";

/// Strings handed to the widget layout, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelText {
    pub title: String,
    pub comparison: String,
    pub price: String,
    pub current_cap: String,
    pub reference_cap: String,
    pub reference_price: String,
    pub percent: String,
    pub multiplier: String,
    pub target_price: String,
    pub target_price_compact: String,
    pub holdings: String,
    pub holdings_value: String,
    pub purchasing_power: String,
    pub rank: String,
    pub rank_color: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub text: PanelText,
    pub ratio: RatioResult,
    pub power: PurchasingPower,
    pub rank: HolderRank,
    pub origin: QuoteOrigin,
    pub fetched_at: DateTime<Utc>,
    pub next_refresh_at: DateTime<Utc>,
    pub display_size: (u32, u32),
    #[serde(skip)]
    pub bitmap: Bitmap,
}

impl Panel {
    pub fn is_live(&self) -> bool {
        matches!(self.origin, QuoteOrigin::Live)
    }
}

/// Fetch, compute, render. Network trouble never fails this call.
pub async fn refresh(config: &Config) -> Result<Panel, GaugeError> {
    let batch = fetch_quotes(&config.quotes.endpoints, config.quotes.timeout_ms).await;
    build_panel(config, &batch, Utc::now())
}

pub fn build_panel(
    config: &Config,
    batch: &QuoteBatch,
    now: DateTime<Utc>,
) -> Result<Panel, GaugeError> {
    let v = &config.valuation;
    let price = quote_value(batch, &v.current_price_key)?;
    let supply = quote_value(batch, &v.current_supply_key)?;
    let reference_price = quote_value(batch, &v.reference_price_key)?;

    let mut current = Valuation::from_price(price, supply);
    if let Some(cap_key) = &v.current_cap_key {
        current = current.with_market_cap(quote_value(batch, cap_key)?);
    }
    let reference = Valuation::from_price(reference_price, v.reference_supply);
    let ratio = compute_ratio(&current, &reference);

    let holdings = &config.holdings;
    let (currency, price_key) = holdings.pricing();
    if currency != holdings.currency() {
        tracing::warn!(
            requested = holdings.currency().code(),
            "No price quote for the requested currency, pricing in usd"
        );
    }
    let anchor = holdings.anchor();
    let local_price = match price_key {
        Some(key) => quote_value(batch, key)?,
        None => price,
    };
    let power = purchasing_power(holdings.amount, local_price, anchor.price(currency));
    let rank = HolderRank::for_holdings(holdings.amount);

    let bitmap = render::render(&config.bar, ratio.progress)?;
    let display_size = bitmap.display_size(config.bar.display_scale);

    let refresh = config
        .panel
        .refresh_interval()
        .map_err(|e| GaugeError::Config(format!("{:#}", e)))?;
    let next_refresh_at = now + refresh;

    let text = PanelText {
        title: config.panel.title.clone(),
        comparison: format!("{} vs {}", v.current_label, v.reference_label),
        price: format::money("$", price),
        current_cap: format::trillions(current.cap()),
        reference_cap: format::trillions(reference.cap()),
        reference_price: format::money("$", reference_price),
        percent: format::percent(ratio.progress),
        multiplier: format::multiplier(ratio.upside_multiplier),
        target_price: format::money("$", ratio.target_unit_price),
        target_price_compact: format::kilo(ratio.target_unit_price),
        holdings: format!("{} {}", holdings.amount, v.current_label),
        holdings_value: compact_money(currency, power.total_value),
        purchasing_power: format!(
            "{} ≈ {} {}",
            anchor.emoji(),
            format::decimal1(power.item_count),
            anchor.label()
        ),
        rank: rank.label().to_string(),
        rank_color: rank.accent_color().to_string(),
        status: match &batch.origin {
            QuoteOrigin::Live => "live".to_string(),
            QuoteOrigin::Fallback { .. } => "offline (cached values)".to_string(),
        },
    };

    tracing::info!(
        progress = ratio.progress,
        upside = ratio.upside_multiplier,
        target = ratio.target_unit_price,
        live = batch.is_live(),
        "Panel computed"
    );

    Ok(Panel {
        text,
        ratio,
        power,
        rank,
        origin: batch.origin.clone(),
        fetched_at: now,
        next_refresh_at,
        display_size,
        bitmap,
    })
}

/// Write `gauge.png` and `panel.json` into `dir`.
pub fn write_outputs(panel: &Panel, dir: &Path) -> Result<(PathBuf, PathBuf), GaugeError> {
    std::fs::create_dir_all(dir)?;

    let png_path = dir.join(PNG_FILE);
    panel.bitmap.save_png(&png_path)?;

    let json_path = dir.join(JSON_FILE);
    let writer = BufWriter::new(File::create(&json_path)?);
    serde_json::to_writer_pretty(writer, panel)?;

    tracing::info!(
        png = %png_path.display(),
        json = %json_path.display(),
        "Panel written"
    );
    Ok((png_path, json_path))
}

fn quote_value(batch: &QuoteBatch, key: &str) -> Result<f64, GaugeError> {
    batch
        .value(key)
        .ok_or_else(|| GaugeError::Config(format!("quote '{}' missing from batch", key)))
}

/// CNY amounts read naturally in 万, USD in thousands.
fn compact_money(currency: Currency, n: f64) -> String {
    match currency {
        Currency::Cny => format!("{}{}", currency.symbol(), format::ten_thousand(n)),
        Currency::Usd => format!("{}{}", currency.symbol(), format::kilo(n)),
    }
}
