use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use core_types::Tier;
use loader::DataSet;
use metrics::{Growth, MetricsEngine};
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// The main entry point for the spendlens procurement analytics CLI.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Procurement analytics over the factory, supplier and category extracts.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "spendlens.toml")]
    config: PathBuf,

    /// Emit JSON instead of tables.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-factory purchasing scale and growth.
    Factories,
    /// Category aggregates, quadrants and growth rankings.
    Categories {
        /// Show the drill-down for one category.
        #[arg(long)]
        detail: Option<String>,
    },
    /// Supplier tiers and concentration.
    Suppliers {
        /// List the suppliers of one tier (A, B, C or D).
        #[arg(long)]
        tier: Option<Tier>,
    },
    /// Risk screens: dependency, concentration and steep declines.
    Risk,
    /// Headline figures across all three extracts.
    Summary,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = configuration::load_config(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    let data = loader::load_dataset(
        &config.data.factory,
        &config.data.supplier,
        &config.data.category,
    )
    .context("loading the procurement extracts")?;
    let engine = MetricsEngine::new(config.metrics.clone()).context("building metrics engine")?;

    match cli.command {
        Commands::Factories => handle_factories(&engine, &data, cli.json),
        Commands::Categories { detail } => handle_categories(&engine, &data, detail, cli.json),
        Commands::Suppliers { tier } => handle_suppliers(&engine, &data, tier, cli.json),
        Commands::Risk => handle_risk(&engine, &data, cli.json),
        Commands::Summary => handle_summary(&engine, &data, cli.json),
    }
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn handle_factories(engine: &MetricsEngine, data: &DataSet, json: bool) -> anyhow::Result<()> {
    let overview = engine.analyze_factories(&data.factories)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    let mut table = new_table(vec![
        "Business Unit",
        "2024 Amount",
        "2025 Forecast",
        "Growth",
        "Growth Rate",
        "Share 2024",
    ]);
    for unit in &overview.units {
        table.add_row(vec![
            Cell::new(&unit.business_unit),
            Cell::new(fmt_opt_amount(unit.amount_2024)),
            Cell::new(fmt_opt_amount(unit.forecast_2025)),
            Cell::new(fmt_growth_amount(unit.growth)),
            Cell::new(fmt_growth_rate(unit.growth)),
            Cell::new(fmt_opt_pct(unit.share_2024_pct)),
        ]);
    }
    table.add_row(vec![
        Cell::new("Group total"),
        Cell::new(fmt_amount(overview.totals.amount_2024)),
        Cell::new(fmt_amount(overview.totals.forecast_2025)),
        Cell::new(fmt_amount(overview.totals.growth.amount)),
        Cell::new(overview.totals.growth.rate.to_string()),
        Cell::new("100.0%"),
    ]);
    println!("Factory overview (data as of {})", data.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("{table}");
    Ok(())
}

fn handle_categories(
    engine: &MetricsEngine,
    data: &DataSet,
    detail: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    if let Some(name) = detail {
        let detail = engine.category_detail(&data.categories, &name)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&detail)?);
            return Ok(());
        }
        println!("Category detail: {}", detail.category);
        println!(
            "  mean growth {} | max {} | min {} (sentinels excluded)",
            fmt_opt_pct(detail.mean_growth_pct),
            fmt_opt_pct(detail.max_growth_pct),
            fmt_opt_pct(detail.min_growth_pct),
        );
        print_name_list("New sub-categories", &detail.new_subs);
        print_name_list("Discontinued sub-categories", &detail.discontinued_subs);
        print_rated_list("High growth", &detail.high_growth_subs);
        print_rated_list("Steep decline", &detail.steep_decline_subs);
        return Ok(());
    }

    let summaries = engine.summarize_categories(&data.categories)?;
    let top = engine.top_growth_sub_categories(&data.categories)?;
    let bottom = engine.bottom_growth_sub_categories(&data.categories)?;
    if json {
        let payload = serde_json::json!({
            "categories": summaries,
            "top_growth_sub_categories": top,
            "bottom_growth_sub_categories": bottom,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let mut table = new_table(vec![
        "Category",
        "2024 Spend",
        "2025 Spend",
        "Growth Rate",
        "Share 2024",
        "Share 2025",
        "Share Δ",
        "Quadrant",
    ]);
    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.category),
            Cell::new(fmt_amount(summary.spend_2024)),
            Cell::new(fmt_amount(summary.spend_2025)),
            Cell::new(summary.growth.rate.to_string()),
            Cell::new(fmt_pct(summary.share_2024_pct)),
            Cell::new(fmt_pct(summary.share_2025_pct)),
            Cell::new(format!("{:+}%", summary.share_delta_pct.round_dp(1))),
            Cell::new(summary.quadrant.to_string()),
        ]);
    }
    println!("Category summary");
    println!("{table}");

    let mut rankings = new_table(vec!["", "Category", "Sub-category", "Growth Rate"]);
    for row in &top {
        rankings.add_row(vec![
            Cell::new("top"),
            Cell::new(&row.category),
            Cell::new(&row.sub_category),
            Cell::new(fmt_growth_rate(row.growth)),
        ]);
    }
    for row in &bottom {
        rankings.add_row(vec![
            Cell::new("bottom"),
            Cell::new(&row.category),
            Cell::new(&row.sub_category),
            Cell::new(fmt_growth_rate(row.growth)),
        ]);
    }
    println!("Growth rankings (sentinels and small bases excluded)");
    println!("{rankings}");
    Ok(())
}

fn handle_suppliers(
    engine: &MetricsEngine,
    data: &DataSet,
    tier: Option<Tier>,
    json: bool,
) -> anyhow::Result<()> {
    let analyses = engine.analyze_suppliers(&data.suppliers)?;

    if let Some(tier) = tier {
        let mut members: Vec<_> = analyses
            .iter()
            .filter(|analysis| analysis.tier == Some(tier))
            .collect();
        members.sort_by(|a, b| b.amount_2024.cmp(&a.amount_2024));
        if json {
            println!("{}", serde_json::to_string_pretty(&members)?);
            return Ok(());
        }
        let mut table = new_table(vec![
            "Supplier",
            "Category",
            "2024 Amount",
            "2025 Budget",
            "Growth Rate",
            "Share",
        ]);
        for member in &members {
            table.add_row(vec![
                Cell::new(&member.supplier_name),
                Cell::new(&member.category),
                Cell::new(fmt_opt_amount(member.amount_2024)),
                Cell::new(fmt_opt_amount(member.budget_2025)),
                Cell::new(fmt_growth_rate(member.growth)),
                Cell::new(fmt_opt_pct(member.share_2024_pct)),
            ]);
        }
        println!("Tier {tier} suppliers ({})", members.len());
        println!("{table}");
        return Ok(());
    }

    let tiers = engine.tier_summaries(&analyses)?;
    let movement = engine.top_supplier_movement(&data.suppliers)?;
    let top_growth = engine.top_growth_suppliers(&analyses)?;
    let bottom_growth = engine.bottom_growth_suppliers(&analyses)?;
    if json {
        let payload = serde_json::json!({
            "tiers": tiers,
            "top_movement": movement,
            "top_growth_suppliers": top_growth,
            "bottom_growth_suppliers": bottom_growth,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let mut table = new_table(vec![
        "Tier",
        "Suppliers",
        "2024 Amount",
        "Share",
        "Mean Growth",
    ]);
    for summary in &tiers {
        table.add_row(vec![
            Cell::new(summary.tier.label()),
            Cell::new(summary.supplier_count),
            Cell::new(fmt_amount(summary.amount_2024)),
            Cell::new(fmt_pct(summary.share_pct)),
            Cell::new(fmt_opt_pct(summary.mean_growth_pct)),
        ]);
    }
    println!("Supplier tiers (quartiles of 2024 amount)");
    println!("{table}");

    let mut top = new_table(vec!["Year", "Supplier", "Category", "Amount", "Share"]);
    for entry in &movement.top_2024 {
        top.add_row(vec![
            Cell::new("2024"),
            Cell::new(&entry.supplier_name),
            Cell::new(&entry.category),
            Cell::new(fmt_amount(entry.amount)),
            Cell::new(fmt_pct(entry.share_pct)),
        ]);
    }
    for entry in &movement.top_2025 {
        top.add_row(vec![
            Cell::new("2025"),
            Cell::new(&entry.supplier_name),
            Cell::new(&entry.category),
            Cell::new(fmt_amount(entry.amount)),
            Cell::new(fmt_pct(entry.share_pct)),
        ]);
    }
    println!("Top suppliers by year");
    println!("{top}");
    print_name_list("Entered the top list", &movement.entered);
    print_name_list("Left the top list", &movement.exited);

    let mut rankings = new_table(vec!["", "Supplier", "Category", "2024 Amount", "Growth Rate"]);
    for entry in &top_growth {
        rankings.add_row(vec![
            Cell::new("top"),
            Cell::new(&entry.supplier_name),
            Cell::new(&entry.category),
            Cell::new(fmt_opt_amount(entry.amount_2024)),
            Cell::new(fmt_growth_rate(entry.growth)),
        ]);
    }
    for entry in &bottom_growth {
        rankings.add_row(vec![
            Cell::new("bottom"),
            Cell::new(&entry.supplier_name),
            Cell::new(&entry.category),
            Cell::new(fmt_opt_amount(entry.amount_2024)),
            Cell::new(fmt_growth_rate(entry.growth)),
        ]);
    }
    println!("Supplier growth rankings (sentinels and small bases excluded)");
    println!("{rankings}");
    Ok(())
}

fn handle_risk(engine: &MetricsEngine, data: &DataSet, json: bool) -> anyhow::Result<()> {
    let overview = engine.supplier_overview(&data.suppliers)?;
    let declines = engine.significant_declines(&data.categories);
    if json {
        let payload = serde_json::json!({
            "concentration": overview,
            "significant_declines": declines,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Risk indicators");
    println!(
        "  Top-5 supplier concentration:  {}",
        fmt_pct(overview.top5_share_pct)
    );
    println!(
        "  Top-10 supplier concentration: {}",
        fmt_pct(overview.top10_share_pct)
    );
    println!(
        "  High-dependency suppliers:     {}",
        overview.high_dependency_count
    );
    println!(
        "  Largest single supplier share: {}",
        fmt_pct(overview.max_single_share_pct)
    );

    let settings = engine.settings();
    println!(
        "Significant declines (rate < {}%, 2024 base > {})",
        settings.decline_rate_threshold,
        fmt_amount(settings.decline_base_threshold)
    );
    let mut table = new_table(vec!["Category", "Sub-category", "2024 Spend", "Growth Rate"]);
    for alert in &declines {
        table.add_row(vec![
            Cell::new(&alert.category),
            Cell::new(&alert.sub_category),
            Cell::new(fmt_amount(alert.spend_2024)),
            Cell::new(format!("{}%", alert.growth_rate_pct.round_dp(1))),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn handle_summary(engine: &MetricsEngine, data: &DataSet, json: bool) -> anyhow::Result<()> {
    let factories = engine.analyze_factories(&data.factories)?;
    let overview = engine.supplier_overview(&data.suppliers)?;
    let mean_growth = engine.mean_supplier_growth(&data.suppliers);
    let categories = engine.summarize_categories(&data.categories)?;
    if json {
        let payload = serde_json::json!({
            "loaded_at": data.loaded_at,
            "factory_totals": factories.totals,
            "supplier_concentration": overview,
            "mean_supplier_growth_pct": mean_growth,
            "categories": categories,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Snapshot loaded {}", data.loaded_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!(
        "Group purchasing: {} (2024) → {} (2025 forecast), {}",
        fmt_amount(factories.totals.amount_2024),
        fmt_amount(factories.totals.forecast_2025),
        factories.totals.growth.rate,
    );
    println!(
        "Suppliers: top-5 {} | top-10 {} | {} high-dependency | mean growth {}",
        fmt_pct(overview.top5_share_pct),
        fmt_pct(overview.top10_share_pct),
        overview.high_dependency_count,
        fmt_opt_pct(mean_growth),
    );
    let rising: Vec<&str> = categories
        .iter()
        .filter(|c| c.quadrant == core_types::Quadrant::Rising)
        .map(|c| c.category.as_str())
        .collect();
    if !rising.is_empty() {
        println!("Rising categories: {}", rising.join(", "));
    }
    Ok(())
}

// ==============================================================================
// Formatting Helpers
// ==============================================================================

fn new_table(headers: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(headers);
    table
}

/// Groups a rounded amount with thousands separators for display.
fn fmt_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(0).to_string();
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}{grouped}")
}

fn fmt_opt_amount(amount: Option<Decimal>) -> String {
    amount.map(fmt_amount).unwrap_or_else(|| "-".to_string())
}

fn fmt_pct(pct: Decimal) -> String {
    format!("{}%", pct.round_dp(1))
}

fn fmt_opt_pct(pct: Option<Decimal>) -> String {
    pct.map(fmt_pct).unwrap_or_else(|| "-".to_string())
}

fn fmt_growth_amount(growth: Option<Growth>) -> String {
    growth
        .map(|g| fmt_amount(g.amount))
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_growth_rate(growth: Option<Growth>) -> String {
    growth
        .map(|g| g.rate.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_name_list(title: &str, names: &[String]) {
    if names.is_empty() {
        println!("{title}: none");
    } else {
        println!("{title}: {}", names.join(", "));
    }
}

fn print_rated_list(title: &str, entries: &[(String, Decimal)]) {
    if entries.is_empty() {
        println!("{title}: none");
        return;
    }
    let rendered: Vec<String> = entries
        .iter()
        .map(|(name, rate)| format!("{name} ({}%)", rate.round_dp(1)))
        .collect();
    println!("{title}: {}", rendered.join(", "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn amounts_are_grouped_in_thousands() {
        assert_eq!(fmt_amount(Decimal::from(1_234_567)), "1,234,567");
        assert_eq!(fmt_amount(Decimal::from(999)), "999");
        assert_eq!(fmt_amount(Decimal::from(-42_000)), "-42,000");
        assert_eq!(fmt_amount(Decimal::ZERO), "0");
    }
}
