use core_types::GrowthRate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Year-over-year change of a single prior/current amount pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    /// `current − prior`, exact.
    pub amount: Decimal,
    pub rate: GrowthRate,
}

/// Computes growth amount and rate for a prior/current pair.
///
/// The rate follows a three-way rule that keeps division-by-zero cases
/// distinguishable from genuine 0% flat growth:
///
/// - both amounts zero → 0%
/// - prior zero, current positive → [`GrowthRate::New`]
/// - current zero, prior positive → [`GrowthRate::Discontinued`]
/// - otherwise → `(current − prior) / prior × 100`
///
/// Inputs are expected non-negative but this is not validated.
pub fn growth(prior: Decimal, current: Decimal) -> Growth {
    let amount = current - prior;
    let rate = if prior.is_zero() && current.is_zero() {
        GrowthRate::Pct(Decimal::ZERO)
    } else if prior.is_zero() {
        GrowthRate::New
    } else if current.is_zero() {
        GrowthRate::Discontinued
    } else {
        GrowthRate::Pct(amount / prior * Decimal::ONE_HUNDRED)
    };
    Growth { amount, rate }
}

/// Missing-value aware variant: if either amount was coerced to a missing
/// marker, the whole derived figure is undefined.
pub fn growth_opt(prior: Option<Decimal>, current: Option<Decimal>) -> Option<Growth> {
    Some(growth(prior?, current?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amount_is_exact_difference() {
        let g = growth(dec!(100.25), dec!(350.75));
        assert_eq!(g.amount, dec!(250.50));
    }

    #[test]
    fn both_zero_is_flat_zero_percent() {
        let g = growth(dec!(0), dec!(0));
        assert_eq!(g.amount, dec!(0));
        assert_eq!(g.rate, GrowthRate::Pct(dec!(0)));
    }

    #[test]
    fn zero_base_is_new_not_a_number() {
        let g = growth(dec!(0), dec!(50_000));
        assert_eq!(g.amount, dec!(50_000));
        assert_eq!(g.rate, GrowthRate::New);
        assert!(g.rate.is_sentinel());
    }

    #[test]
    fn zero_current_is_discontinued() {
        let g = growth(dec!(80_000), dec!(0));
        assert_eq!(g.amount, dec!(-80_000));
        assert_eq!(g.rate, GrowthRate::Discontinued);
    }

    #[test]
    fn ordinary_rate_is_percentage_of_prior() {
        let g = growth(dec!(200), dec!(300));
        assert_eq!(g.rate, GrowthRate::Pct(dec!(50)));

        let g = growth(dec!(300), dec!(200));
        match g.rate {
            GrowthRate::Pct(rate) => {
                let expected = dec!(-100) / dec!(3);
                assert!((rate - expected).abs() < dec!(0.000000001));
            }
            other => panic!("expected ordinary rate, got {other:?}"),
        }
    }

    #[test]
    fn missing_inputs_yield_no_growth() {
        assert_eq!(growth_opt(None, Some(dec!(10))), None);
        assert_eq!(growth_opt(Some(dec!(10)), None), None);
        assert!(growth_opt(Some(dec!(10)), Some(dec!(20))).is_some());
    }
}
