use serde::Serialize;

pub const DEFAULT_HOLDINGS: f64 = 1.0;

/// Lenient host parameter parsing: anything that is not a positive finite
/// number means "one coin".
pub fn parse_holdings(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => DEFAULT_HOLDINGS,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Cny,
}

impl Currency {
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cny" | "rmb" => Self::Cny,
            _ => Self::Usd,
        }
    }

    /// Strict lookup by config code, used for `[holdings.price_keys]`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "usd" => Some(Self::Usd),
            "cny" => Some(Self::Cny),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Usd => "usd",
            Self::Cny => "cny",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Cny => "¥",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorItem {
    Tesla,
    Coffee,
    House,
}

impl AnchorItem {
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "coffee" => Self::Coffee,
            "house" => Self::House,
            _ => Self::Tesla,
        }
    }

    pub fn price(self, currency: Currency) -> f64 {
        match (currency, self) {
            (Currency::Usd, Self::Tesla) => 35_000.0,
            (Currency::Usd, Self::Coffee) => 5.0,
            (Currency::Usd, Self::House) => 150_000.0,
            (Currency::Cny, Self::Tesla) => 250_000.0,
            (Currency::Cny, Self::Coffee) => 30.0,
            (Currency::Cny, Self::House) => 1_000_000.0,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Tesla => "🚘",
            Self::Coffee => "☕",
            Self::House => "🏠",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Tesla => "Model 3",
            Self::Coffee => "Starbucks coffee",
            Self::House => "house down payment",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HolderRank {
    Whale,
    WholeCoin,
    TopThreePercent,
    OnTheWay,
}

impl HolderRank {
    pub fn for_holdings(amount: f64) -> Self {
        if amount >= 10.0 {
            Self::Whale
        } else if amount >= 1.0 {
            Self::WholeCoin
        } else if amount >= 0.1 {
            Self::TopThreePercent
        } else {
            Self::OnTheWay
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Whale => "🐋 Whale: top 0.001% worldwide",
            Self::WholeCoin => "🏆 21M club member",
            Self::TopThreePercent => "🥈 Ahead of 97% of people",
            Self::OnTheWay => "🌱 On the way",
        }
    }

    /// Whole-coin holders get the gold accent.
    pub fn accent_color(self) -> &'static str {
        match self {
            Self::Whale | Self::WholeCoin => "#FFD700",
            Self::TopThreePercent | Self::OnTheWay => "#20B2AA",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holdings_default_when_unparsable_or_non_positive() {
        assert_eq!(parse_holdings("0.25"), 0.25);
        assert_eq!(parse_holdings(" 3 "), 3.0);
        assert_eq!(parse_holdings(""), DEFAULT_HOLDINGS);
        assert_eq!(parse_holdings("lots"), DEFAULT_HOLDINGS);
        assert_eq!(parse_holdings("0"), DEFAULT_HOLDINGS);
        assert_eq!(parse_holdings("-2"), DEFAULT_HOLDINGS);
        assert_eq!(parse_holdings("NaN"), DEFAULT_HOLDINGS);
    }

    #[test]
    fn rank_thresholds_are_inclusive() {
        assert_eq!(HolderRank::for_holdings(10.0), HolderRank::Whale);
        assert_eq!(HolderRank::for_holdings(9.99), HolderRank::WholeCoin);
        assert_eq!(HolderRank::for_holdings(1.0), HolderRank::WholeCoin);
        assert_eq!(HolderRank::for_holdings(0.1), HolderRank::TopThreePercent);
        assert_eq!(HolderRank::for_holdings(0.05), HolderRank::OnTheWay);
    }

    #[test]
    fn selectors_default_on_unknown_input() {
        assert_eq!(Currency::parse_or_default("EUR"), Currency::Usd);
        assert_eq!(Currency::parse_or_default("Cny"), Currency::Cny);
        assert_eq!(AnchorItem::parse_or_default("yacht"), AnchorItem::Tesla);
        assert_eq!(AnchorItem::parse_or_default("HOUSE"), AnchorItem::House);
        assert_eq!(AnchorItem::Coffee.price(Currency::Cny), 30.0);
    }
}
