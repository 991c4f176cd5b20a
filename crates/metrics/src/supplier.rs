use crate::concentration::{self, share_of_total};
use crate::error::MetricsError;
use crate::growth::{self, Growth};
use crate::ranking;
use crate::tiering;
use core_types::{GrowthRate, SupplierRecord, Tier};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A supplier row with its derived figures: growth, share of the 2024
/// total and quartile tier. Tiers are recomputed from the snapshot's own
/// quartiles on every call, never from fixed cutoffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierAnalysis {
    pub supplier_name: String,
    pub category: String,
    pub sub_category: String,
    pub amount_2024: Option<Decimal>,
    pub budget_2025: Option<Decimal>,
    pub growth: Option<Growth>,
    pub share_2024_pct: Option<Decimal>,
    pub tier: Option<Tier>,
}

/// Headline concentration figures for the supplier base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationOverview {
    pub top5_share_pct: Decimal,
    pub top10_share_pct: Decimal,
    /// Suppliers whose individual share exceeds the dependency threshold.
    pub high_dependency_count: usize,
    pub max_single_share_pct: Decimal,
}

/// One entry of a top-N supplier list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSupplier {
    pub supplier_name: String,
    pub category: String,
    pub amount: Decimal,
    pub share_pct: Decimal,
}

/// Top-N suppliers by 2024 amount and by 2025 budget, with the names that
/// enter or leave the list between the two years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMovement {
    pub top_2024: Vec<TopSupplier>,
    pub top_2025: Vec<TopSupplier>,
    pub entered: Vec<String>,
    pub exited: Vec<String>,
}

/// Per-tier aggregates over the derived supplier records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierSummary {
    pub tier: Tier,
    pub supplier_count: usize,
    pub amount_2024: Decimal,
    pub share_pct: Decimal,
    /// Mean of the ordinary growth rates in the tier; sentinel rates are
    /// excluded, and a tier with none is `None`.
    pub mean_growth_pct: Option<Decimal>,
}

/// Derives growth, share and tier for every supplier row.
///
/// Fails when the 2024 total is zero (shares undefined) or when fewer than
/// four distinct 2024 amounts exist (quartile split undefined).
pub fn analyze_suppliers(
    records: &[SupplierRecord],
) -> Result<Vec<SupplierAnalysis>, MetricsError> {
    let shares = share_of_total(records, |record| record.amount_2024, "supplier")?;
    let tiers = tiering::assign_tiers(records, |record| record.amount_2024)?;

    Ok(records
        .iter()
        .zip(shares.into_iter().zip(tiers))
        .map(|(record, (share, tier))| SupplierAnalysis {
            supplier_name: record.supplier_name.clone(),
            category: record.category.clone(),
            sub_category: record.sub_category.clone(),
            amount_2024: record.amount_2024,
            budget_2025: record.budget_2025,
            growth: growth::growth_opt(record.amount_2024, record.budget_2025),
            share_2024_pct: share,
            tier,
        })
        .collect())
}

/// The dashboard's headline concentration block: Top-5/Top-10 share,
/// high-dependency count and the largest single supplier share, all over
/// 2024 amounts.
pub fn concentration_overview(
    records: &[SupplierRecord],
    dependency_threshold: Decimal,
) -> Result<ConcentrationOverview, MetricsError> {
    let key = |record: &SupplierRecord| record.amount_2024;
    let top5_share_pct = concentration::concentration_ratio(records, key, 5, "supplier")?;
    let top10_share_pct = concentration::concentration_ratio(records, key, 10, "supplier")?;
    let high_dependency_count =
        concentration::high_dependency_count(records, key, dependency_threshold, "supplier")?;
    let max_single_share_pct = concentration::concentration_ratio(records, key, 1, "supplier")?;

    Ok(ConcentrationOverview {
        top5_share_pct,
        top10_share_pct,
        high_dependency_count,
        max_single_share_pct,
    })
}

/// Ranks the top `n` suppliers by 2024 amount and by 2025 budget and
/// reports who entered or left the list, in list order.
pub fn top_movement(records: &[SupplierRecord], n: usize) -> Result<TopMovement, MetricsError> {
    let top_2024 = top_list(records, |record| record.amount_2024, n, "supplier 2024")?;
    let top_2025 = top_list(records, |record| record.budget_2025, n, "supplier 2025")?;

    let entered = top_2025
        .iter()
        .filter(|entry| !top_2024.iter().any(|t| t.supplier_name == entry.supplier_name))
        .map(|entry| entry.supplier_name.clone())
        .collect();
    let exited = top_2024
        .iter()
        .filter(|entry| !top_2025.iter().any(|t| t.supplier_name == entry.supplier_name))
        .map(|entry| entry.supplier_name.clone())
        .collect();

    Ok(TopMovement {
        top_2024,
        top_2025,
        entered,
        exited,
    })
}

fn top_list<K>(
    records: &[SupplierRecord],
    key: K,
    n: usize,
    partition: &str,
) -> Result<Vec<TopSupplier>, MetricsError>
where
    K: Fn(&SupplierRecord) -> Option<Decimal> + Copy,
{
    let total: Decimal = records.iter().filter_map(key).sum();
    if total.is_zero() {
        return Err(MetricsError::ZeroTotal(partition.to_string()));
    }
    let top = ranking::top_n(records, key, n)?;
    Ok(top
        .into_iter()
        .filter_map(|record| {
            key(record).map(|amount| TopSupplier {
                supplier_name: record.supplier_name.clone(),
                category: record.category.clone(),
                amount,
                share_pct: amount / total * Decimal::ONE_HUNDRED,
            })
        })
        .collect())
}

/// Aggregates the derived supplier records per tier, in display order
/// (A first). Tiers with no suppliers are reported with zero counts.
pub fn tier_summaries(analyses: &[SupplierAnalysis]) -> Result<Vec<TierSummary>, MetricsError> {
    let total: Decimal = analyses.iter().filter_map(|a| a.amount_2024).sum();
    if total.is_zero() {
        return Err(MetricsError::ZeroTotal("supplier tier".to_string()));
    }

    Ok(Tier::DISPLAY_ORDER
        .into_iter()
        .map(|tier| {
            let members: Vec<&SupplierAnalysis> =
                analyses.iter().filter(|a| a.tier == Some(tier)).collect();
            let amount_2024: Decimal = members.iter().filter_map(|a| a.amount_2024).sum();
            let rates: Vec<Decimal> = members
                .iter()
                .filter_map(|a| a.growth.and_then(|g| g.rate.pct()))
                .collect();
            let mean_growth_pct = if rates.is_empty() {
                None
            } else {
                Some(rates.iter().copied().sum::<Decimal>() / Decimal::from(rates.len()))
            };
            TierSummary {
                tier,
                supplier_count: members.len(),
                amount_2024,
                share_pct: amount_2024 / total * Decimal::ONE_HUNDRED,
                mean_growth_pct,
            }
        })
        .collect())
}

/// The growth-rate ranking key for derived supplier records: sentinels and
/// sub-threshold bases excluded.
pub fn supplier_rate_key(min_base: Decimal) -> impl Fn(&SupplierAnalysis) -> Option<Decimal> {
    move |analysis| {
        ranking::rankable_rate(
            analysis.amount_2024,
            analysis.growth.map(|g| g.rate),
            min_base,
        )
    }
}

/// Mean ordinary growth rate over a set of supplier rows, e.g. the bulk
/// material suppliers; `None` when no row has a comparable rate.
pub fn mean_growth(records: &[SupplierRecord]) -> Option<Decimal> {
    let rates: Vec<Decimal> = records
        .iter()
        .filter_map(|record| growth::growth_opt(record.amount_2024, record.budget_2025))
        .filter_map(|g| match g.rate {
            GrowthRate::Pct(rate) => Some(rate),
            _ => None,
        })
        .collect();
    if rates.is_empty() {
        None
    } else {
        Some(rates.iter().copied().sum::<Decimal>() / Decimal::from(rates.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(name: &str, amount: Decimal, budget: Decimal) -> SupplierRecord {
        SupplierRecord {
            supplier_name: name.to_string(),
            category: "Copper & Aluminum".to_string(),
            sub_category: "Copper Strip".to_string(),
            amount_2024: Some(amount),
            budget_2025: Some(budget),
            huifeng_2024: None,
            tongmeng_2024: None,
            suzhou_2024: None,
            huifeng_2025: None,
            tongmeng_2025: None,
            suzhou_2025: None,
        }
    }

    fn base() -> Vec<SupplierRecord> {
        vec![
            record("S1", dec!(400), dec!(500)),
            record("S2", dec!(300), dec!(240)),
            record("S3", dec!(200), dec!(260)),
            record("S4", dec!(100), dec!(100)),
        ]
    }

    #[test]
    fn derived_fields_line_up_with_rows() {
        let analyses = analyze_suppliers(&base()).unwrap();
        assert_eq!(analyses.len(), 4);
        assert_eq!(analyses[0].share_2024_pct, Some(dec!(40)));
        assert_eq!(analyses[0].tier, Some(Tier::A));
        assert_eq!(analyses[3].tier, Some(Tier::D));
        let g = analyses[1].growth.unwrap();
        assert_eq!(g.rate, GrowthRate::Pct(dec!(-20)));
    }

    #[test]
    fn overview_matches_hand_computed_shares() {
        let records = base();
        let overview = concentration_overview(&records, dec!(0.10)).unwrap();
        // Only four suppliers, so both ratios degenerate to 100%.
        assert_eq!(overview.top5_share_pct, dec!(100));
        assert_eq!(overview.top10_share_pct, dec!(100));
        assert_eq!(overview.max_single_share_pct, dec!(40));
        // Shares are 40/30/20/10; strict comparison keeps S4 out.
        assert_eq!(overview.high_dependency_count, 3);
    }

    #[test]
    fn movement_tracks_entries_and_exits() {
        let mut records = base();
        // S4 collapses next year, S5 arrives large.
        records[3].budget_2025 = Some(dec!(10));
        records.push(record("S5", dec!(50), dec!(400)));

        let movement = top_movement(&records, 3).unwrap();
        let names_2024: Vec<_> = movement
            .top_2024
            .iter()
            .map(|t| t.supplier_name.as_str())
            .collect();
        assert_eq!(names_2024, vec!["S1", "S2", "S3"]);
        let names_2025: Vec<_> = movement
            .top_2025
            .iter()
            .map(|t| t.supplier_name.as_str())
            .collect();
        assert_eq!(names_2025, vec!["S1", "S5", "S3"]);
        assert_eq!(movement.entered, vec!["S5".to_string()]);
        assert_eq!(movement.exited, vec!["S2".to_string()]);
    }

    #[test]
    fn tier_summaries_cover_all_tiers_and_sum_to_total() {
        let analyses = analyze_suppliers(&base()).unwrap();
        let summaries = tier_summaries(&analyses).unwrap();
        assert_eq!(summaries.len(), 4);
        assert_eq!(summaries[0].tier, Tier::A);
        let share_sum: Decimal = summaries.iter().map(|s| s.share_pct).sum();
        assert!((share_sum - dec!(100)).abs() < dec!(0.000001));
        let count_sum: usize = summaries.iter().map(|s| s.supplier_count).sum();
        assert_eq!(count_sum, 4);
    }

    #[test]
    fn rate_key_excludes_small_bases() {
        let analyses = analyze_suppliers(&base()).unwrap();
        let key = supplier_rate_key(dec!(150));
        // S4's base of 100 is under the threshold; S3's 200 passes.
        assert!(key(&analyses[3]).is_none());
        assert_eq!(key(&analyses[2]), Some(dec!(30)));
    }

    #[test]
    fn mean_growth_skips_sentinels() {
        let records = vec![
            record("S1", dec!(100), dec!(150)), // +50%
            record("S2", dec!(200), dec!(150)), // -25%
            record("S3", dec!(0), dec!(100)),   // new, excluded
        ];
        assert_eq!(mean_growth(&records), Some(dec!(12.5)));
    }
}
