//! Risk score arithmetic, tiers and caps over real stored work hours.

use burnout_core::{
    clock::FixedClock,
    engine::BurnoutEngine,
    error::{EngineError, EngineResult},
    repository::WorkHourSource,
    roster::NewStaffMember,
    risk_scoring::{RiskAssessment, RiskFactors, RiskLevel, RiskScorer, HIGH_RISK_THRESHOLD},
    types::StaffId,
    work_history::{HistorySummary, WorkHistoryAggregator, WorkHourEntry},
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add_staff(engine: &BurnoutEngine, name: &str) -> StaffId {
    engine
        .store
        .insert_staff(&NewStaffMember {
            name: name.into(),
            email: format!("{}@hospital.test", name.to_lowercase().replace(' ', ".")),
            department: "ICU".into(),
            role: "Senior ICU Nurse".into(),
            hire_date: date(2019, 6, 1),
        })
        .unwrap()
}

fn work(engine: &BurnoutEngine, staff_id: StaffId, day: NaiveDate, hours: f64, overtime: f64) {
    engine
        .store
        .insert_work_hours(staff_id, day, hours, overtime)
        .unwrap();
}

/// Mon-Fri 15..19 Jan 2024 plus the two earlier Saturdays of the month.
fn heavy_week(engine: &BurnoutEngine, staff_id: StaffId) {
    for (day, hours, overtime) in [
        (15, 12.0, 2.0),
        (16, 12.0, 1.0),
        (17, 12.0, 1.0),
        (18, 12.0, 1.0),
        (19, 11.0, 1.0),
    ] {
        work(engine, staff_id, date(2024, 1, day), hours, overtime);
    }
    work(engine, staff_id, date(2024, 1, 6), 8.0, 0.0);
    work(engine, staff_id, date(2024, 1, 13), 8.0, 0.0);
}

// ── Scenarios ────────────────────────────────────────────────────────────────

/// Every factor at or past its cap yields the maximum score.
#[test]
fn heavy_week_scores_one_hundred() {
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 19)).unwrap();
    let staff = add_staff(&engine, "Ana Reyes");
    heavy_week(&engine, staff);

    let a = engine
        .scorer()
        .calculate_risk_score(staff, Some(date(2024, 1, 19)))
        .unwrap();

    assert_eq!(a.consecutive_days, 5);
    assert_eq!(a.weekly_overtime, 6.0);
    assert_eq!(a.weekly_hours, 65.0);
    assert_eq!(a.weekend_days, 2);
    assert_eq!(a.factors.base_score, 20.0);
    assert_eq!(a.factors.consecutive_days_points, 30.0);
    assert_eq!(a.factors.overtime_hours_points, 25.0);
    assert_eq!(a.factors.weekly_hours_points, 20.0);
    assert_eq!(a.factors.weekend_work_points, 10.0);
    assert_eq!(a.score, 100.0);
    assert_eq!(a.risk_level, RiskLevel::High);
    assert!(a.is_high_risk());
}

/// 35 light hours earlier in the week and nothing on the target date.
#[test]
fn light_history_scores_base_only() {
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 19)).unwrap();
    let staff = add_staff(&engine, "Ben Ortiz");
    for day in 15..=18 {
        work(&engine, staff, date(2024, 1, day), 8.75, 0.0);
    }

    let a = engine
        .scorer()
        .calculate_risk_score(staff, Some(date(2024, 1, 19)))
        .unwrap();

    assert_eq!(a.consecutive_days, 0);
    assert_eq!(a.weekly_overtime, 0.0);
    assert_eq!(a.weekly_hours, 35.0);
    assert_eq!(a.weekend_days, 0);
    assert_eq!(a.score, 20.0);
    assert_eq!(a.risk_level, RiskLevel::Low);
}

/// A staff member with no entries at all still gets a base score.
#[test]
fn staff_without_history_scores_base() {
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 19)).unwrap();
    let staff = add_staff(&engine, "Cara Lind");

    let a = engine.scorer().calculate_risk_score(staff, None).unwrap();
    assert_eq!(a.calculated_date, date(2024, 1, 19));
    assert_eq!(a.score, 20.0);
    assert_eq!(a.factors, RiskFactors::from_history(&HistorySummary::default()));
}

/// Exactly 60 weekly hours does not trigger the weekly-hours points.
#[test]
fn sixty_hours_is_not_over_the_limit() {
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 19)).unwrap();
    let staff = add_staff(&engine, "Dev Patel");
    for day in 15..=19 {
        work(&engine, staff, date(2024, 1, day), 12.0, 0.0);
    }

    let a = engine
        .scorer()
        .calculate_risk_score(staff, Some(date(2024, 1, 19)))
        .unwrap();
    assert_eq!(a.weekly_hours, 60.0);
    assert_eq!(a.factors.weekly_hours_points, 0.0);
    // 20 base + 30 streak
    assert_eq!(a.score, 50.0);
    assert_eq!(a.risk_level, RiskLevel::Medium);
}

/// Fractional overtime earns fractional points.
#[test]
fn fractional_overtime_is_scored_proportionally() {
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 17)).unwrap();
    let staff = add_staff(&engine, "Eli Moss");
    work(&engine, staff, date(2024, 1, 17), 8.0, 0.5);

    let a = engine.scorer().calculate_risk_score(staff, None).unwrap();
    assert_eq!(a.factors.overtime_hours_points, 7.5);
    assert_eq!(a.score, 20.0 + 10.0 + 7.5);
}

/// The same inputs always give the same assessment.
#[test]
fn scoring_is_deterministic() {
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 19)).unwrap();
    let staff = add_staff(&engine, "Fay Quinn");
    heavy_week(&engine, staff);

    let scorer = engine.scorer();
    let first = scorer.calculate_risk_score(staff, Some(date(2024, 1, 18))).unwrap();
    let second = scorer.calculate_risk_score(staff, Some(date(2024, 1, 18))).unwrap();
    assert_eq!(first, second);
}

/// Returns one entry with negative overtime for every week query.
struct CorruptHours;

impl WorkHourSource for CorruptHours {
    fn find_by_staff_and_date_range(
        &self,
        staff_id: StaffId,
        date_from: NaiveDate,
        _date_to: NaiveDate,
    ) -> EngineResult<Vec<WorkHourEntry>> {
        Ok(vec![WorkHourEntry {
            entry_id: 1,
            staff_id,
            work_date: date_from,
            hours_worked: 8.0,
            overtime_hours: -3.0,
        }])
    }

    fn find_recent_by_staff(
        &self,
        _staff_id: StaffId,
        _max_date: NaiveDate,
        _limit: usize,
    ) -> EngineResult<Vec<WorkHourEntry>> {
        Ok(Vec::new())
    }
}

/// A negative weekly overtime sum is a calculation error, not a score.
#[test]
fn negative_overtime_sum_fails_calculation() {
    let source = CorruptHours;
    let clock = FixedClock::on(date(2024, 1, 19));
    let scorer = RiskScorer::new(WorkHistoryAggregator::new(&source, 30), &clock);

    assert!(matches!(
        scorer.calculate_risk_score(7, None),
        Err(EngineError::RiskCalculation { staff_id: 7, .. })
    ));
}

// ── Tiers and caps ───────────────────────────────────────────────────────────

#[test]
fn tier_boundaries_partition_the_score_range() {
    assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(20.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Low);
    assert_eq!(RiskLevel::from_score(41.0), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(71.0), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(100.0), RiskLevel::High);
    assert_eq!(RiskLevel::from_score(HIGH_RISK_THRESHOLD), RiskLevel::High);
    // Fractional scores fall on the upper side of each cut point.
    assert_eq!(RiskLevel::from_score(40.5), RiskLevel::Medium);
    assert_eq!(RiskLevel::from_score(70.5), RiskLevel::High);
}

/// No combination of inputs pushes a factor past its cap or the score
/// outside [20, 100].
#[test]
fn factor_caps_hold_across_inputs() {
    let day = date(2024, 1, 19);
    for consecutive_days in [0u32, 1, 2, 3, 4, 10, 30] {
        for weekly_overtime in [0.0, 0.5, 1.0, 1.7, 2.0, 20.0] {
            for weekly_hours in [0.0, 59.9, 60.0, 60.1, 120.0] {
                for weekend_days in [0u32, 1, 2, 3, 5] {
                    let history = HistorySummary {
                        consecutive_days,
                        weekly_overtime,
                        weekly_hours,
                        weekend_days,
                    };
                    let a = RiskAssessment::from_history(1, day, &history);
                    let f = a.factors;
                    assert!(f.consecutive_days_points <= 30.0);
                    assert!(f.overtime_hours_points <= 25.0);
                    assert!(f.weekly_hours_points == 0.0 || f.weekly_hours_points == 20.0);
                    assert!(f.weekend_work_points <= 15.0);
                    assert!((20.0..=100.0).contains(&a.score), "score {}", a.score);
                    assert_eq!(a.risk_level, RiskLevel::from_score(a.score));
                }
            }
        }
    }
}

#[test]
fn risk_level_text_round_trips() {
    for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
        assert_eq!(RiskLevel::parse(level.as_str()), Some(level));
    }
    assert_eq!(RiskLevel::parse("Critical"), None);
}
