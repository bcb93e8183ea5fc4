//! burnout-runner: command-line front end for the burnout risk engine.
//!
//! Usage:
//!   burnout-runner seed    --seed 42 --staff 12 --days 30
//!   burnout-runner record  --staff-id 3 --date 2024-01-19 --hours 12 --overtime 2
//!   burnout-runner recalc  --staff-id 3 [--date 2024-01-19]
//!   burnout-runner alerts  [--all] [--page 1] [--limit 20]
//!   burnout-runner resolve --alert-id 7
//!   burnout-runner report
//!
//! Global options: --config data/engine.json, --db burnout.db, --json

use anyhow::{bail, Context, Result};
use burnout_core::{
    config::EngineConfig,
    demo_seed::seed_demo_roster,
    engine::BurnoutEngine,
    intake::NewWorkHours,
    types::StaffId,
};
use chrono::NaiveDate;
use serde::Serialize;
use std::{env, path::Path};

const DEFAULT_CONFIG_PATH: &str = "data/engine.json";

#[derive(Serialize)]
struct Report {
    distribution: burnout_core::dashboard::RiskDistribution,
    top_risk:     Vec<burnout_core::dashboard::StaffRiskSummary>,
    alert_stats:  burnout_core::dashboard::AlertStats,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1).filter(|a| !a.starts_with("--")).cloned() else {
        print_usage();
        return Ok(());
    };
    let json = args.iter().any(|a| a == "--json");

    let config = load_config(&args)?;
    log::debug!("opening {}", config.database_path);
    let engine = BurnoutEngine::build(config)?;

    match command.as_str() {
        "seed" => run_seed(&engine, &args, json),
        "record" => run_record(&engine, &args, json),
        "recalc" => run_recalc(&engine, &args, json),
        "alerts" => run_alerts(&engine, &args, json),
        "resolve" => run_resolve(&engine, &args, json),
        "report" => run_report(&engine, json),
        other => {
            print_usage();
            bail!("unknown command: {other}")
        }
    }
}

fn load_config(args: &[String]) -> Result<EngineConfig> {
    let explicit = flag_value(args, "--config");
    let path = explicit.unwrap_or(DEFAULT_CONFIG_PATH);
    let mut config = if explicit.is_some() || Path::new(path).exists() {
        EngineConfig::load(path)?
    } else {
        let mut config = EngineConfig::default();
        config.apply_env();
        config
    };
    if let Some(db) = flag_value(args, "--db") {
        config.database_path = db.to_string();
    }
    Ok(config)
}

fn run_seed(engine: &BurnoutEngine, args: &[String], json: bool) -> Result<()> {
    let seed = parse_arg(args, "--seed", 42u64);
    let staff = parse_arg(args, "--staff", 12usize);
    let days = parse_arg(args, "--days", 30u32);

    let summary = seed_demo_roster(engine, seed, staff, days)?;
    if json {
        return print_json(&summary);
    }
    println!("=== DEMO SEED ===");
    println!("  seed:             {seed}");
    println!("  staff created:    {}", summary.staff_created);
    println!("  entries recorded: {}", summary.entries_recorded);
    println!("  scores written:   {}", summary.scores_written);
    println!("  alerts raised:    {}", summary.alerts_raised);
    println!("  alerts refreshed: {}", summary.alerts_refreshed);
    Ok(())
}

fn run_record(engine: &BurnoutEngine, args: &[String], json: bool) -> Result<()> {
    let new = NewWorkHours {
        staff_id: required_arg(args, "--staff-id")?,
        work_date: required_date(args, "--date")?,
        hours_worked: required_arg(args, "--hours")?,
        overtime_hours: parse_arg(args, "--overtime", 0.0f64),
    };

    let outcome = engine.intake().record(&new)?;
    if json {
        return print_json(&outcome);
    }
    println!(
        "recorded entry {} for staff {} on {}",
        outcome.entry.entry_id, outcome.entry.staff_id, outcome.entry.work_date
    );
    match &outcome.updated_risk {
        Some(record) => println!("  risk score: {} ({})", record.score, record.risk_level),
        None => println!("  risk score: not updated (see log)"),
    }
    if let Some(alert) = outcome.alert {
        println!("  alert {}: {:?}", alert.alert_id, alert.action);
    }
    Ok(())
}

fn run_recalc(engine: &BurnoutEngine, args: &[String], json: bool) -> Result<()> {
    let staff_id: StaffId = required_arg(args, "--staff-id")?;
    let date = flag_value(args, "--date").map(parse_date).transpose()?;

    let ledger = engine.ledger();
    let previous = ledger.previous_score(staff_id)?;
    let update = ledger.update_staff_risk_score(staff_id, date)?;
    let alert = if update.assessment.is_high_risk() {
        engine.alerts().process_assessment(&update.assessment, previous)?
    } else {
        None
    };

    if json {
        return print_json(&serde_json::json!({ "update": update, "alert": alert }));
    }
    let a = &update.assessment;
    println!(
        "staff {staff_id} on {}: {} ({})",
        a.calculated_date, a.score, a.risk_level
    );
    println!("  consecutive days: {}", a.consecutive_days);
    println!("  weekly overtime:  {}", a.weekly_overtime);
    println!("  weekly hours:     {}", a.weekly_hours);
    println!("  weekend days:     {}", a.weekend_days);
    if let Some(alert) = alert {
        println!("  alert {}: {:?}", alert.alert_id, alert.action);
    }
    Ok(())
}

fn run_alerts(engine: &BurnoutEngine, args: &[String], json: bool) -> Result<()> {
    let page = parse_arg(args, "--page", 1u32);
    let limit = parse_arg(args, "--limit", 20u32);
    let resolved = if args.iter().any(|a| a == "--all") {
        None
    } else {
        Some(false)
    };

    let alerts = engine.dashboard().list_alerts(page, limit, resolved)?;
    if json {
        return print_json(&alerts);
    }
    let p = alerts.pagination;
    println!("=== ALERTS (page {}/{}, {} total) ===", p.page, p.total_pages.max(1), p.total);
    for alert in &alerts.alerts {
        let state = if alert.resolved { "resolved" } else { "active" };
        println!(
            "  #{:<4} {:<8} {:>5.1}  {} ({})  {}",
            alert.alert_id,
            state,
            alert.risk_score,
            alert.staff_name,
            alert.department,
            alert.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

fn run_resolve(engine: &BurnoutEngine, args: &[String], json: bool) -> Result<()> {
    let alert_id = required_arg(args, "--alert-id")?;
    engine.alerts().resolve_alert(alert_id)?;
    if json {
        return print_json(&serde_json::json!({ "alert_id": alert_id, "resolved": true }));
    }
    println!("alert {alert_id} resolved");
    Ok(())
}

fn run_report(engine: &BurnoutEngine, json: bool) -> Result<()> {
    let dashboard = engine.dashboard();
    let report = Report {
        distribution: dashboard.risk_distribution()?,
        top_risk: dashboard.top_risk_staff(None)?,
        alert_stats: dashboard.alert_stats()?,
    };
    if json {
        return print_json(&report);
    }

    let d = report.distribution;
    println!("=== RISK DISTRIBUTION ===");
    println!("  low:    {}", d.low);
    println!("  medium: {}", d.medium);
    println!("  high:   {}", d.high);
    println!();
    println!("=== TOP RISK STAFF ===");
    for staff in &report.top_risk {
        let level = staff
            .risk_level
            .map(|l| l.as_str())
            .unwrap_or("unscored");
        println!(
            "  {:<28} {:<10} {:>5.1}  {level}",
            staff.name,
            staff.department,
            staff.score.unwrap_or(0.0)
        );
    }
    println!();
    let s = report.alert_stats;
    println!("=== ALERTS ===");
    println!("  total:     {}", s.total_alerts);
    println!("  active:    {}", s.active_alerts);
    println!("  resolved:  {}", s.resolved_alerts);
    println!("  this week: {}", s.alerts_this_week);
    println!();
    println!("=== DATABASE ===");
    println!("  path:       {}", engine.store.path().unwrap_or(":memory:"));
    for (table, count) in engine.store.table_counts()? {
        println!("  {table:<11} {count}");
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_usage() {
    eprintln!("usage: burnout-runner <seed|record|recalc|alerts|resolve|report> [options]");
    eprintln!("  --config <path>  engine config (default {DEFAULT_CONFIG_PATH} when present)");
    eprintln!("  --db <path>      database path override");
    eprintln!("  --json           machine-readable output");
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn required_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = flag_value(args, flag).with_context(|| format!("{flag} is required"))?;
    raw.parse()
        .with_context(|| format!("invalid value for {flag}: {raw}"))
}

fn required_date(args: &[String], flag: &str) -> Result<NaiveDate> {
    let raw = flag_value(args, flag).with_context(|| format!("{flag} is required"))?;
    parse_date(raw)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date {raw}, expected YYYY-MM-DD"))
}
