use crate::error::MetricsError;
use crate::growth::{self, Growth};
use core_types::{CategoryRecord, GrowthRate, Quadrant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sub-category row with its derived growth figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubCategoryAnalysis {
    pub category: String,
    pub sub_category: String,
    pub spend_2024: Option<Decimal>,
    pub spend_2025: Option<Decimal>,
    pub growth: Option<Growth>,
}

/// Category-level aggregate: spends summed over the sub-categories, growth
/// recomputed from the sums (never averaged from sub-category rates), and
/// the share/quadrant figures of the trend matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub spend_2024: Decimal,
    pub spend_2025: Decimal,
    pub growth: Growth,
    pub share_2024_pct: Decimal,
    pub share_2025_pct: Decimal,
    /// `share_2025 − share_2024`, percentage points.
    pub share_delta_pct: Decimal,
    pub quadrant: Quadrant,
}

/// The per-category drill-down block: summary statistics over the ordinary
/// growth rates plus the special-case sub-category lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDetail {
    pub category: String,
    pub mean_growth_pct: Option<Decimal>,
    pub max_growth_pct: Option<Decimal>,
    pub min_growth_pct: Option<Decimal>,
    pub new_subs: Vec<String>,
    pub discontinued_subs: Vec<String>,
    /// Sub-categories growing faster than the swing threshold, rate
    /// descending. Sentinels are not included.
    pub high_growth_subs: Vec<(String, Decimal)>,
    /// Sub-categories declining faster than the negative swing threshold,
    /// rate ascending.
    pub steep_decline_subs: Vec<(String, Decimal)>,
}

/// A sub-category flagged by the risk screen: steep decline on a large
/// prior-year base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineAlert {
    pub category: String,
    pub sub_category: String,
    pub spend_2024: Decimal,
    pub growth_rate_pct: Decimal,
}

/// Derives growth for every sub-category row.
pub fn analyze_sub_categories(records: &[CategoryRecord]) -> Vec<SubCategoryAnalysis> {
    records
        .iter()
        .map(|record| SubCategoryAnalysis {
            category: record.category.clone(),
            sub_category: record.sub_category.clone(),
            spend_2024: record.spend_2024,
            spend_2025: record.spend_2025,
            growth: growth::growth_opt(record.spend_2024, record.spend_2025),
        })
        .collect()
}

/// Groups sub-category rows by category (first-seen order preserved) and
/// derives the category-level figures.
///
/// The quadrant split uses the mean share across categories, recomputed
/// per invocation: "above average" compares the 2025 share against the
/// mean 2025 share, "share up" means a strictly positive share delta.
pub fn summarize_categories(
    records: &[CategoryRecord],
) -> Result<Vec<CategorySummary>, MetricsError> {
    let mut groups: Vec<(String, Decimal, Decimal)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(name, _, _)| *name == record.category) {
            Some((_, spend_2024, spend_2025)) => {
                *spend_2024 += record.spend_2024.unwrap_or_default();
                *spend_2025 += record.spend_2025.unwrap_or_default();
            }
            None => groups.push((
                record.category.clone(),
                record.spend_2024.unwrap_or_default(),
                record.spend_2025.unwrap_or_default(),
            )),
        }
    }

    let total_2024: Decimal = groups.iter().map(|(_, spend, _)| *spend).sum();
    let total_2025: Decimal = groups.iter().map(|(_, _, spend)| *spend).sum();
    if total_2024.is_zero() {
        return Err(MetricsError::ZeroTotal("category 2024".to_string()));
    }
    if total_2025.is_zero() {
        return Err(MetricsError::ZeroTotal("category 2025".to_string()));
    }
    // Shares sum to 100 across the partition, so the mean share is 100/n.
    let mean_share_2025 = Decimal::ONE_HUNDRED / Decimal::from(groups.len());

    Ok(groups
        .into_iter()
        .map(|(category, spend_2024, spend_2025)| {
            let share_2024_pct = spend_2024 / total_2024 * Decimal::ONE_HUNDRED;
            let share_2025_pct = spend_2025 / total_2025 * Decimal::ONE_HUNDRED;
            let share_delta_pct = share_2025_pct - share_2024_pct;
            let share_up = share_delta_pct > Decimal::ZERO;
            let above_average = share_2025_pct > mean_share_2025;
            let quadrant = match (share_up, above_average) {
                (true, true) => Quadrant::Rising,
                (false, true) => Quadrant::Declining,
                (true, false) => Quadrant::Emerging,
                (false, false) => Quadrant::Fading,
            };
            CategorySummary {
                category,
                spend_2024,
                spend_2025,
                growth: growth::growth(spend_2024, spend_2025),
                share_2024_pct,
                share_2025_pct,
                share_delta_pct,
                quadrant,
            }
        })
        .collect())
}

/// Drill-down statistics for one category's sub-category rows.
///
/// `swing_threshold` is the absolute rate (percent) beyond which a
/// sub-category counts as high-growth or steep-decline. Fails when the
/// category has no rows.
pub fn category_detail(
    records: &[CategoryRecord],
    category: &str,
    swing_threshold: Decimal,
) -> Result<CategoryDetail, MetricsError> {
    let rows: Vec<SubCategoryAnalysis> = analyze_sub_categories(records)
        .into_iter()
        .filter(|row| row.category == category)
        .collect();
    if rows.is_empty() {
        return Err(MetricsError::InvalidParameter(format!(
            "unknown category: {category}"
        )));
    }

    let mut new_subs = Vec::new();
    let mut discontinued_subs = Vec::new();
    let mut rated: Vec<(String, Decimal)> = Vec::new();
    for row in &rows {
        match row.growth.map(|g| g.rate) {
            Some(GrowthRate::New) => new_subs.push(row.sub_category.clone()),
            Some(GrowthRate::Discontinued) => discontinued_subs.push(row.sub_category.clone()),
            Some(GrowthRate::Pct(rate)) => rated.push((row.sub_category.clone(), rate)),
            None => {}
        }
    }

    let mean_growth_pct = if rated.is_empty() {
        None
    } else {
        Some(rated.iter().map(|(_, r)| *r).sum::<Decimal>() / Decimal::from(rated.len()))
    };
    let max_growth_pct = rated.iter().map(|(_, r)| *r).max();
    let min_growth_pct = rated.iter().map(|(_, r)| *r).min();

    let mut high_growth_subs: Vec<(String, Decimal)> = rated
        .iter()
        .filter(|(_, rate)| *rate > swing_threshold)
        .cloned()
        .collect();
    high_growth_subs.sort_by(|a, b| b.1.cmp(&a.1));

    let mut steep_decline_subs: Vec<(String, Decimal)> = rated
        .iter()
        .filter(|(_, rate)| *rate < -swing_threshold)
        .cloned()
        .collect();
    steep_decline_subs.sort_by(|a, b| a.1.cmp(&b.1));

    Ok(CategoryDetail {
        category: category.to_string(),
        mean_growth_pct,
        max_growth_pct,
        min_growth_pct,
        new_subs,
        discontinued_subs,
        high_growth_subs,
        steep_decline_subs,
    })
}

/// The risk screen: sub-categories declining faster than `rate_threshold`
/// (a negative percentage) on a 2024 base above `base_threshold`, worst
/// first. Sentinel rates never qualify.
pub fn significant_declines(
    records: &[CategoryRecord],
    rate_threshold: Decimal,
    base_threshold: Decimal,
) -> Vec<DeclineAlert> {
    let mut alerts: Vec<DeclineAlert> = analyze_sub_categories(records)
        .into_iter()
        .filter_map(|row| {
            let spend_2024 = row.spend_2024?;
            let rate = row.growth?.rate.pct()?;
            if rate < rate_threshold && spend_2024 > base_threshold {
                Some(DeclineAlert {
                    category: row.category,
                    sub_category: row.sub_category,
                    spend_2024,
                    growth_rate_pct: rate,
                })
            } else {
                None
            }
        })
        .collect();
    alerts.sort_by(|a, b| a.growth_rate_pct.cmp(&b.growth_rate_pct));
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(category: &str, sub: &str, spend_2024: Decimal, spend_2025: Decimal) -> CategoryRecord {
        CategoryRecord {
            category: category.to_string(),
            sub_category: sub.to_string(),
            spend_2024: Some(spend_2024),
            spend_2025: Some(spend_2025),
        }
    }

    #[test]
    fn new_sub_category_carries_sentinel() {
        let records = vec![record("Thermal", "Thermal Grease", dec!(0), dec!(50_000))];
        let rows = analyze_sub_categories(&records);
        let g = rows[0].growth.unwrap();
        assert_eq!(g.amount, dec!(50_000));
        assert_eq!(g.rate, GrowthRate::New);
    }

    #[test]
    fn category_growth_is_recomputed_from_sums() {
        // Sub-category rates are +100% and -50%; the category rate must
        // come from the summed spends (300 → 350), not the rate average.
        let records = vec![
            record("Copper", "Strip", dec!(100), dec!(200)),
            record("Copper", "Wire", dec!(200), dec!(100)),
            record("Steel", "Plate", dec!(300), dec!(400)),
        ];
        let summaries = summarize_categories(&records).unwrap();
        assert_eq!(summaries.len(), 2);
        let copper = &summaries[0];
        assert_eq!(copper.category, "Copper");
        assert_eq!(copper.spend_2024, dec!(300));
        assert_eq!(copper.spend_2025, dec!(300));
        assert_eq!(copper.growth.rate, GrowthRate::Pct(dec!(0)));
    }

    #[test]
    fn quadrants_split_on_delta_and_mean_share() {
        // 2024 shares: A 60%, B 30%, C 10%. 2025 shares: A 50%, B 40%,
        // C 10%. Mean share is 100/3 ≈ 33.3%.
        let records = vec![
            record("A", "a", dec!(600), dec!(500)),
            record("B", "b", dec!(300), dec!(400)),
            record("C", "c", dec!(100), dec!(100)),
        ];
        let summaries = summarize_categories(&records).unwrap();
        assert_eq!(summaries[0].quadrant, Quadrant::Declining); // down, above mean
        assert_eq!(summaries[1].quadrant, Quadrant::Rising); // up, above mean
        assert_eq!(summaries[2].quadrant, Quadrant::Fading); // flat delta counts as down
    }

    #[test]
    fn shares_per_year_sum_to_one_hundred() {
        let records = vec![
            record("A", "a", dec!(123.45), dec!(500)),
            record("B", "b", dec!(300), dec!(221.55)),
            record("C", "c", dec!(100), dec!(100)),
        ];
        let summaries = summarize_categories(&records).unwrap();
        let sum_2024: Decimal = summaries.iter().map(|s| s.share_2024_pct).sum();
        let sum_2025: Decimal = summaries.iter().map(|s| s.share_2025_pct).sum();
        assert!((sum_2024 - dec!(100)).abs() < dec!(0.000001));
        assert!((sum_2025 - dec!(100)).abs() < dec!(0.000001));
    }

    #[test]
    fn detail_separates_sentinels_from_rates() {
        let records = vec![
            record("Electrical", "Junction Box", dec!(0), dec!(80_000)), // new
            record("Electrical", "Relay", dec!(50_000), dec!(0)),        // discontinued
            record("Electrical", "Cable", dec!(100), dec!(150)),         // +50%
            record("Electrical", "Switch", dec!(100), dec!(60)),         // -40%
            record("Electrical", "Fuse", dec!(100), dec!(110)),          // +10%
        ];
        let detail = category_detail(&records, "Electrical", dec!(30)).unwrap();
        assert_eq!(detail.new_subs, vec!["Junction Box".to_string()]);
        assert_eq!(detail.discontinued_subs, vec!["Relay".to_string()]);
        assert_eq!(detail.high_growth_subs, vec![("Cable".to_string(), dec!(50))]);
        assert_eq!(
            detail.steep_decline_subs,
            vec![("Switch".to_string(), dec!(-40))]
        );
        // Mean over +50, -40, +10 only.
        let mean = detail.mean_growth_pct.unwrap();
        assert!((mean - dec!(6.666666)).abs() < dec!(0.001));
        assert_eq!(detail.max_growth_pct, Some(dec!(50)));
        assert_eq!(detail.min_growth_pct, Some(dec!(-40)));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let records = vec![record("A", "a", dec!(1), dec!(1))];
        assert!(matches!(
            category_detail(&records, "missing", dec!(30)),
            Err(MetricsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn decline_screen_requires_rate_and_base() {
        let records = vec![
            // Steep decline, large base: flagged.
            record("A", "flagged", dec!(2_000_000), dec!(1_000_000)),
            // Steep decline, small base: skipped.
            record("A", "small", dec!(500_000), dec!(100_000)),
            // Large base, mild decline: skipped.
            record("A", "mild", dec!(3_000_000), dec!(2_500_000)),
            // Discontinued sentinel never qualifies.
            record("A", "stopped", dec!(4_000_000), dec!(0)),
        ];
        let alerts = significant_declines(&records, dec!(-30), dec!(1_000_000));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].sub_category, "flagged");
        assert_eq!(alerts[0].growth_rate_pct, dec!(-50));
    }

    #[test]
    fn new_sub_category_is_excluded_from_bottom_ranking() {
        use crate::ranking;

        let rows = analyze_sub_categories(&[
            record("A", "new one", dec!(0), dec!(50_000)),
            record("A", "shrinking", dec!(200_000), dec!(150_000)),
            record("A", "growing", dec!(200_000), dec!(260_000)),
        ]);
        let key = |row: &SubCategoryAnalysis| {
            ranking::rankable_rate(row.spend_2024, row.growth.map(|g| g.rate), dec!(100_000))
        };
        let bottom = ranking::bottom_n(&rows, key, 10).unwrap();
        let names: Vec<_> = bottom.iter().map(|r| r.sub_category.as_str()).collect();
        assert_eq!(names, vec!["shrinking", "growing"]);
    }
}
