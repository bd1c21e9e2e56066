//! Compact number formatting for panel text. None of these panic; non-finite
//! input renders as [`NOT_AVAILABLE`].

pub const NOT_AVAILABLE: &str = "--";

/// Rounded integer with comma grouping: `98000.0` → `"98,000"`.
pub fn thousands(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = n.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// `1.95e12` → `"1.95T"`.
pub fn trillions(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}T", n / 1e12)
}

/// `98_400.0` → `"98k"`. Halves round away from zero.
pub fn kilo(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{}k", (n / 1e3).round() as i64)
}

/// 万-based compact form: `n / 10_000` to three significant figures with
/// trailing zeros dropped, so `87_120.0` → `"8.71w"` and `1_534_000.0` → `"153w"`.
pub fn ten_thousand(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let v = n / 1e4;
    if v == 0.0 {
        return "0w".to_string();
    }
    format!("{}w", significant(v, 3))
}

/// Fraction as a percentage with two decimals; values above 1 are shown as-is.
pub fn percent(p: f64) -> String {
    if !p.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}%", p * 100.0)
}

pub fn multiplier(m: f64) -> String {
    if !m.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.2}x", m)
}

pub fn decimal1(n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{:.1}", n)
}

/// Currency-prefixed grouped amount, e.g. `"$98,000"`.
pub fn money(symbol: &str, n: f64) -> String {
    if !n.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let body = thousands(n);
    match body.strip_prefix('-') {
        Some(abs) => format!("-{}{}", symbol, abs),
        None => format!("{}{}", symbol, body),
    }
}

/// Round to `digits` significant figures (not fixed decimals) and drop
/// trailing zeros.
fn significant(v: f64, digits: i32) -> String {
    let int_digits = v.abs().log10().floor() as i32 + 1;
    let decimals = (digits - int_digits).max(0) as usize;
    let rounded = if int_digits > digits {
        let step = 10f64.powi(int_digits - digits);
        (v / step).round() * step
    } else {
        v
    };
    strip_trailing_zeros(format!("{:.*}", decimals, rounded))
}

fn strip_trailing_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
