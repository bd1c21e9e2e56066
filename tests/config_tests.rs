use chrono::Duration;
use std::path::Path;

use valuation_gauge::config::Config;
use valuation_gauge::model::holdings::{AnchorItem, Currency};
use valuation_gauge::render::HexColor;

fn default_toml() -> String {
    std::fs::read_to_string("config/default.toml").unwrap()
}

#[test]
/// Verifies the shipped configuration:
/// it loads, validates, and wires the combined market endpoint.
fn shipped_config_loads() {
    let config = Config::from_path(Path::new("config/default.toml")).unwrap();
    assert_eq!(config.quotes.timeout_ms, 10_000);
    assert_eq!(config.quotes.endpoints.len(), 3);
    assert_eq!(config.valuation.current_cap_key.as_deref(), Some("btc_market_cap"));
    assert_eq!(config.holdings.currency(), Currency::Usd);
    assert_eq!(config.holdings.anchor(), AnchorItem::Tesla);
    assert_eq!(config.holdings.price_key(), Some("btc_price"));
    assert_eq!(config.bar.fill_color, HexColor::rgb(0xF7, 0x93, 0x1A));
    assert_eq!(config.panel.refresh_interval().unwrap(), Duration::minutes(15));
}

#[test]
/// Verifies currency selection picks the matching price quote.
fn cny_uses_cny_price_key() {
    let mut config = Config::from_path(Path::new("config/default.toml")).unwrap();
    config.apply_host_overrides(None, Some("CNY"), None);
    assert_eq!(config.holdings.price_key(), Some("btc_price_cny"));
}

#[test]
/// Verifies geometry validation:
/// a track thicker than the canvas is rejected at load time.
fn invalid_bar_geometry_rejected() {
    let broken = default_toml().replace("track_thickness = 12", "track_thickness = 120");
    assert!(Config::from_toml_str(&broken).is_err());
}

#[test]
fn invalid_color_rejected() {
    let broken = default_toml().replace("fill_color = \"#F7931A\"", "fill_color = \"orange\"");
    assert!(Config::from_toml_str(&broken).is_err());
}

#[test]
fn invalid_refresh_rejected() {
    let broken = default_toml().replace("refresh = \"15m\"", "refresh = \"soon\"");
    assert!(Config::from_toml_str(&broken).is_err());
}

#[test]
/// Verifies degenerate fallbacks are refused:
/// a positive field cannot fall back to zero.
fn zero_positive_fallback_rejected() {
    let broken = default_toml().replace("fallback = 19800000.0", "fallback = 0.0");
    assert!(Config::from_toml_str(&broken).is_err());
}

#[test]
fn invalid_url_rejected() {
    let broken = default_toml().replace("https://api.gold-api.com/price/XAU", "not a url");
    assert!(Config::from_toml_str(&broken).is_err());
}

#[test]
/// Verifies divisor fields must be strictly positive:
/// a supply field without `positive = true` is refused so zero cannot reach the ratio.
fn valuation_divisor_must_be_positive() {
    let loose = default_toml().replace(
        "fallback = 19800000.0, positive = true",
        "fallback = 19800000.0",
    );
    let err = Config::from_toml_str(&loose).unwrap_err();
    assert!(format!("{:#}", err).contains("btc_supply"));

    let loose_gold = default_toml().replace(
        "fallback = 2600.0, positive = true",
        "fallback = 2600.0",
    );
    assert!(Config::from_toml_str(&loose_gold).is_err());
}

#[test]
/// Verifies currency price keys are checked at load time:
/// a key that no endpoint produces, or an unknown currency code, is refused.
fn undeclared_price_key_rejected() {
    let typo = default_toml().replace("cny = \"btc_price_cny\"", "cny = \"btc_cny_typo\"");
    let err = Config::from_toml_str(&typo).unwrap_err();
    assert!(format!("{:#}", err).contains("btc_cny_typo"));

    let unknown = default_toml().replace("cny = \"btc_price_cny\"", "eur = \"btc_price_cny\"");
    assert!(Config::from_toml_str(&unknown).is_err());
}
