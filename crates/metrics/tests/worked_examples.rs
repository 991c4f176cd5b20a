//! End-to-end checks of the worked examples the dashboard is built around,
//! run through the public engine API.

use configuration::MetricsSettings;
use core_types::{CategoryRecord, GrowthRate, SupplierRecord, Tier};
use metrics::{concentration, ranking, MetricsEngine};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn supplier(name: &str, amount: Decimal, budget: Decimal) -> SupplierRecord {
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

#[test]
fn four_supplier_worked_example() {
    // Amounts 100/200/300/400, total 1000: shares 10/20/30/40, top-2
    // concentration 70%.
    let records = vec![
        supplier("A", dec!(100), dec!(100)),
        supplier("B", dec!(200), dec!(200)),
        supplier("C", dec!(300), dec!(300)),
        supplier("D", dec!(400), dec!(400)),
    ];

    let shares =
        concentration::share_of_total(&records, |r| r.amount_2024, "supplier").unwrap();
    assert_eq!(
        shares,
        vec![
            Some(dec!(10)),
            Some(dec!(20)),
            Some(dec!(30)),
            Some(dec!(40)),
        ]
    );

    let top = ranking::top_n(&records, |r| r.amount_2024, 2).unwrap();
    let names: Vec<_> = top.iter().map(|r| r.supplier_name.as_str()).collect();
    assert_eq!(names, vec!["D", "C"]);

    let ratio =
        concentration::concentration_ratio(&records, |r| r.amount_2024, 2, "supplier").unwrap();
    assert_eq!(ratio, dec!(70));
}

#[test]
fn twelve_supplier_tier_assignment() {
    // The duplicated-amount quartile case: boundaries land on 10/20/30 and
    // the lower-bucket tie rule yields D=4, C=4, B=2, A=2.
    let amounts = [10, 10, 10, 10, 20, 20, 20, 20, 30, 30, 40, 50];
    let records: Vec<SupplierRecord> = amounts
        .iter()
        .enumerate()
        .map(|(i, amount)| supplier(&format!("S{i}"), Decimal::from(*amount), dec!(1)))
        .collect();

    let engine = MetricsEngine::new(MetricsSettings::default()).unwrap();
    let analyses = engine.analyze_suppliers(&records).unwrap();
    let count = |tier: Tier| {
        analyses
            .iter()
            .filter(|analysis| analysis.tier == Some(tier))
            .count()
    };
    assert_eq!(count(Tier::D), 4);
    assert_eq!(count(Tier::C), 4);
    assert_eq!(count(Tier::B), 2);
    assert_eq!(count(Tier::A), 2);
}

#[test]
fn new_sub_category_is_sentinel_and_unrankable() {
    let records = vec![
        CategoryRecord {
            category: "Thermal".to_string(),
            sub_category: "Thermal Grease".to_string(),
            spend_2024: Some(dec!(0)),
            spend_2025: Some(dec!(50_000)),
        },
        CategoryRecord {
            category: "Thermal".to_string(),
            sub_category: "Heat Sink".to_string(),
            spend_2024: Some(dec!(400_000)),
            spend_2025: Some(dec!(300_000)),
        },
    ];

    let engine = MetricsEngine::new(MetricsSettings::default()).unwrap();
    let rows = engine.analyze_sub_categories(&records);
    let grease = rows[0].growth.unwrap();
    assert_eq!(grease.amount, dec!(50_000));
    assert_eq!(grease.rate, GrowthRate::New);

    // The sentinel row never reaches a bottom-N growth ranking.
    let bottom = engine.bottom_growth_sub_categories(&records).unwrap();
    let names: Vec<_> = bottom.iter().map(|r| r.sub_category.as_str()).collect();
    assert_eq!(names, vec!["Heat Sink"]);
}
