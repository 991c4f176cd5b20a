use crate::error::MetricsError;
use rust_decimal::Decimal;

/// Computes each record's share of the partition total, as a percentage.
///
/// Records with a missing amount are excluded from the total and get a
/// `None` share; the remaining shares sum to 100. Fails with
/// [`MetricsError::ZeroTotal`] when the partition total is zero, leaving
/// the fallback (report 0%, omit the view) to the caller.
pub fn share_of_total<T, K>(
    records: &[T],
    key: K,
    partition: &str,
) -> Result<Vec<Option<Decimal>>, MetricsError>
where
    K: Fn(&T) -> Option<Decimal>,
{
    let total: Decimal = records.iter().filter_map(&key).sum();
    if total.is_zero() {
        return Err(MetricsError::ZeroTotal(partition.to_string()));
    }
    Ok(records
        .iter()
        .map(|record| key(record).map(|amount| amount / total * Decimal::ONE_HUNDRED))
        .collect())
}

/// Share of the partition total held by the `k` largest amounts, as a
/// percentage. `k` larger than the record count degenerates to 100%.
pub fn concentration_ratio<T, K>(
    records: &[T],
    key: K,
    k: usize,
    partition: &str,
) -> Result<Decimal, MetricsError>
where
    K: Fn(&T) -> Option<Decimal>,
{
    if k == 0 {
        return Err(MetricsError::InvalidParameter(
            "concentration_ratio requires k > 0".to_string(),
        ));
    }
    let mut amounts: Vec<Decimal> = records.iter().filter_map(&key).collect();
    let total: Decimal = amounts.iter().copied().sum();
    if total.is_zero() {
        return Err(MetricsError::ZeroTotal(partition.to_string()));
    }
    amounts.sort_by(|a, b| b.cmp(a));
    let top: Decimal = amounts.iter().take(k).copied().sum();
    Ok(top / total * Decimal::ONE_HUNDRED)
}

/// Counts records whose individual share of the partition total exceeds
/// `threshold_fraction` (e.g. 0.10 for the 10% dependency screen).
pub fn high_dependency_count<T, K>(
    records: &[T],
    key: K,
    threshold_fraction: Decimal,
    partition: &str,
) -> Result<usize, MetricsError>
where
    K: Fn(&T) -> Option<Decimal>,
{
    if threshold_fraction <= Decimal::ZERO || threshold_fraction >= Decimal::ONE {
        return Err(MetricsError::InvalidParameter(format!(
            "high-dependency threshold must be a fraction in (0, 1), got {threshold_fraction}"
        )));
    }
    let total: Decimal = records.iter().filter_map(&key).sum();
    if total.is_zero() {
        return Err(MetricsError::ZeroTotal(partition.to_string()));
    }
    Ok(records
        .iter()
        .filter_map(&key)
        .filter(|amount| *amount / total > threshold_fraction)
        .count())
}
