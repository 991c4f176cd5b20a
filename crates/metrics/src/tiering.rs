use crate::error::MetricsError;
use core_types::Tier;
use rust_decimal::Decimal;

/// Empirical quartile boundaries (25th/50th/75th percentiles) of the given
/// amounts, computed by linear interpolation on the sorted values
/// (position = (n−1)·p). An explicit algorithm instead of a library
/// quantile keeps the tie behaviour deterministic and testable.
///
/// Fails with [`MetricsError::NotEnoughData`] when fewer than 4 distinct
/// values exist, since a quartile split into 4 non-trivial buckets is then
/// undefined; the caller must handle that degenerate case explicitly.
pub fn quartiles(values: &[Decimal]) -> Result<[Decimal; 3], MetricsError> {
    let mut sorted = values.to_vec();
    sorted.sort();

    let mut distinct = sorted.clone();
    distinct.dedup();
    if distinct.len() < 4 {
        return Err(MetricsError::NotEnoughData(format!(
            "split into quartiles: need at least 4 distinct values, got {}",
            distinct.len()
        )));
    }

    Ok([
        quantile(&sorted, 1, 4),
        quantile(&sorted, 2, 4),
        quantile(&sorted, 3, 4),
    ])
}

/// The `numer/denom` quantile of an already-sorted slice, linearly
/// interpolated between neighbours. Exact in Decimal for quartile cuts.
fn quantile(sorted: &[Decimal], numer: usize, denom: usize) -> Decimal {
    let scaled = (sorted.len() - 1) * numer;
    let idx = scaled / denom;
    let rem = scaled % denom;
    let lo = sorted[idx];
    if rem == 0 {
        lo
    } else {
        let hi = sorted[idx + 1];
        lo + (hi - lo) * Decimal::from(rem) / Decimal::from(denom)
    }
}

/// Assigns each record a quartile tier by the given amount key.
///
/// Boundaries come from [`quartiles`] over the present amounts. A value
/// equal to a boundary falls into the lower bucket: `v ≤ q1 → D`,
/// `q1 < v ≤ q2 → C`, `q2 < v ≤ q3 → B`, `v > q3 → A`. Records with a
/// missing amount get no tier.
pub fn assign_tiers<T, K>(records: &[T], key: K) -> Result<Vec<Option<Tier>>, MetricsError>
where
    K: Fn(&T) -> Option<Decimal>,
{
    let values: Vec<Decimal> = records.iter().filter_map(&key).collect();
    let [q1, q2, q3] = quartiles(&values)?;

    Ok(records
        .iter()
        .map(|record| {
            key(record).map(|v| {
                if v <= q1 {
                    Tier::D
                } else if v <= q2 {
                    Tier::C
                } else if v <= q3 {
                    Tier::B
                } else {
                    Tier::A
                }
            })
        })
        .collect())
}
