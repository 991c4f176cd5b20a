use crate::error::MetricsError;
use core_types::GrowthRate;
use rust_decimal::Decimal;

/// Returns the `n` records with the largest key, sorted descending.
///
/// Records whose key is `None` (missing value, sentinel growth, below a
/// caller-applied threshold) are excluded before ranking. The sort is
/// stable, so ties keep their original input order, and fewer than `n`
/// records are returned when the input is smaller.
pub fn top_n<'a, T, K>(records: &'a [T], key: K, n: usize) -> Result<Vec<&'a T>, MetricsError>
where
    K: Fn(&T) -> Option<Decimal>,
{
    if n == 0 {
        return Err(MetricsError::InvalidParameter(
            "top_n requires n > 0".to_string(),
        ));
    }
    let mut keyed: Vec<(Decimal, &T)> = records
        .iter()
        .filter_map(|record| key(record).map(|k| (k, record)))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(keyed.into_iter().take(n).map(|(_, record)| record).collect())
}

/// Returns the `n` records with the smallest key, sorted ascending.
/// Exclusion, stability and short-input behaviour match [`top_n`].
pub fn bottom_n<'a, T, K>(records: &'a [T], key: K, n: usize) -> Result<Vec<&'a T>, MetricsError>
where
    K: Fn(&T) -> Option<Decimal>,
{
    if n == 0 {
        return Err(MetricsError::InvalidParameter(
            "bottom_n requires n > 0".to_string(),
        ));
    }
    let mut keyed: Vec<(Decimal, &T)> = records
        .iter()
        .filter_map(|record| key(record).map(|k| (k, record)))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().take(n).map(|(_, record)| record).collect())
}

/// The standard growth-rate ranking key: excludes sentinel rates ("new" and
/// "discontinued" rows have no comparable percentage) and rows whose
/// prior-year base does not exceed `min_base`, so tiny denominators cannot
/// dominate the ranking.
pub fn rankable_rate(
    base: Option<Decimal>,
    rate: Option<GrowthRate>,
    min_base: Decimal,
) -> Option<Decimal> {
    let base = base?;
    if base <= min_base {
        return None;
    }
    rate?.pct()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn amounts() -> Vec<(&'static str, Option<Decimal>)> {
        vec![
            ("A", Some(dec!(100))),
            ("B", Some(dec!(200))),
            ("C", Some(dec!(300))),
            ("D", Some(dec!(400))),
        ]
    }

    #[test]
    fn top_n_sorts_descending() {
        let records = amounts();
        let top = top_n(&records, |r| r.1, 2).unwrap();
        let names: Vec<_> = top.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["D", "C"]);
    }

    #[test]
    fn bottom_n_sorts_ascending() {
        let records = amounts();
        let bottom = bottom_n(&records, |r| r.1, 2).unwrap();
        let names: Vec<_> = bottom.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn short_input_returns_everything() {
        let records = amounts();
        let top = top_n(&records, |r| r.1, 10).unwrap();
        assert_eq!(top.len(), 4);
    }

    #[test]
    fn ties_keep_input_order() {
        let records = vec![
            ("first", Some(dec!(10))),
            ("second", Some(dec!(10))),
            ("third", Some(dec!(10))),
        ];
        let top = top_n(&records, |r| r.1, 3).unwrap();
        let names: Vec<_> = top.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["first", "second", "third"]);

        let bottom = bottom_n(&records, |r| r.1, 3).unwrap();
        let names: Vec<_> = bottom.iter().map(|r| r.0).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn none_keys_are_excluded() {
        let records = vec![("A", Some(dec!(5))), ("missing", None), ("B", Some(dec!(7)))];
        let top = top_n(&records, |r| r.1, 10).unwrap();
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn zero_n_is_rejected() {
        let records = amounts();
        assert!(matches!(
            top_n(&records, |r| r.1, 0),
            Err(MetricsError::InvalidParameter(_))
        ));
        assert!(matches!(
            bottom_n(&records, |r| r.1, 0),
            Err(MetricsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rankable_rate_drops_sentinels_and_small_bases() {
        let min = dec!(100_000);
        // A brand-new sub-category has no comparable rate.
        assert_eq!(
            rankable_rate(Some(dec!(500_000)), Some(GrowthRate::New), min),
            None
        );
        assert_eq!(
            rankable_rate(Some(dec!(500_000)), Some(GrowthRate::Discontinued), min),
            None
        );
        // Base at or below the threshold is excluded.
        assert_eq!(
            rankable_rate(Some(dec!(100_000)), Some(GrowthRate::Pct(dec!(900))), min),
            None
        );
        assert_eq!(rankable_rate(None, Some(GrowthRate::Pct(dec!(10))), min), None);
        assert_eq!(
            rankable_rate(Some(dec!(100_001)), Some(GrowthRate::Pct(dec!(12))), min),
            Some(dec!(12))
        );
    }
}
