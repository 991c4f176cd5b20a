use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A year-over-year growth rate with explicit zero-base sentinels.
///
/// A prior-period base of zero makes the ordinary percentage undefined, so
/// the two special cases carry their own variants instead of overloading
/// numeric values. Downstream ranking and filtering must treat `New` and
/// `Discontinued` as non-comparable with ordinary rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GrowthRate {
    /// Prior period was zero and the current period has spend.
    New,
    /// Prior period had spend and the current period is zero.
    Discontinued,
    /// Ordinary percentage change. Both-zero inputs land here as 0%.
    Pct(Decimal),
}

impl GrowthRate {
    /// The numeric rate, or `None` for a sentinel.
    pub fn pct(&self) -> Option<Decimal> {
        match self {
            GrowthRate::Pct(rate) => Some(*rate),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, GrowthRate::Pct(_))
    }

    /// Presentation-layer mapping for charting: sentinels are clamped to
    /// ±100 so they fit on a percentage axis. Engine computations never
    /// consume this value.
    pub fn chart_value(&self) -> Decimal {
        match self {
            GrowthRate::New => dec!(100),
            GrowthRate::Discontinued => dec!(-100),
            GrowthRate::Pct(rate) => *rate,
        }
    }
}

impl fmt::Display for GrowthRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthRate::New => write!(f, "new"),
            GrowthRate::Discontinued => write!(f, "discontinued"),
            GrowthRate::Pct(rate) => write!(f, "{}%", rate.round_dp(1)),
        }
    }
}

/// Quartile-based supplier classification by purchase amount.
///
/// Ordered from the lowest spend bucket (`D`) to the highest (`A`), so the
/// derived `Ord` matches "higher tier means more spend".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    D,
    C,
    B,
    A,
}

impl Tier {
    /// All tiers in display order, highest spend first.
    pub const DISPLAY_ORDER: [Tier; 4] = [Tier::A, Tier::B, Tier::C, Tier::D];

    pub fn label(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Tier::A),
            "B" | "b" => Ok(Tier::B),
            "C" | "c" => Ok(Tier::C),
            "D" | "d" => Ok(Tier::D),
            other => Err(CoreError::InvalidInput(
                "tier".to_string(),
                other.to_string(),
            )),
        }
    }
}

/// Strategic quadrant for a category, split on share delta and the mean
/// share across categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    /// Share up, above-average share.
    Rising,
    /// Share down, above-average share.
    Declining,
    /// Share up, below-average share.
    Emerging,
    /// Share down, below-average share.
    Fading,
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Quadrant::Rising => "rising",
            Quadrant::Declining => "declining",
            Quadrant::Emerging => "emerging",
            Quadrant::Fading => "fading",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_have_no_numeric_rate() {
        assert_eq!(GrowthRate::New.pct(), None);
        assert_eq!(GrowthRate::Discontinued.pct(), None);
        assert_eq!(GrowthRate::Pct(dec!(12.5)).pct(), Some(dec!(12.5)));
    }

    #[test]
    fn chart_values_clamp_sentinels() {
        assert_eq!(GrowthRate::New.chart_value(), dec!(100));
        assert_eq!(GrowthRate::Discontinued.chart_value(), dec!(-100));
        assert_eq!(GrowthRate::Pct(dec!(250)).chart_value(), dec!(250));
    }

    #[test]
    fn tier_order_follows_spend() {
        assert!(Tier::A > Tier::B);
        assert!(Tier::B > Tier::C);
        assert!(Tier::C > Tier::D);
    }

    #[test]
    fn tier_parses_case_insensitively() {
        assert_eq!("a".parse::<Tier>().unwrap(), Tier::A);
        assert_eq!("D".parse::<Tier>().unwrap(), Tier::D);
        assert!("E".parse::<Tier>().is_err());
    }
}
