//! Work-hours intake: validation, writes, and the recalculation trigger.

use burnout_core::{
    alerting::AlertAction,
    engine::BurnoutEngine,
    error::{EngineError, EngineResult},
    intake::{NewWorkHours, WorkHourIntake, WorkHoursPatch},
    repository::RiskScoreRepository,
    risk_ledger::{NewRiskScore, RiskLedger, RiskScoreRecord},
    risk_scoring::RiskLevel,
    roster::NewStaffMember,
    types::{RiskScoreId, StaffId},
};
use chrono::NaiveDate;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn setup() -> (BurnoutEngine, StaffId) {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = BurnoutEngine::build_test_at(date(2024, 1, 21)).unwrap();
    let staff = engine
        .store
        .insert_staff(&NewStaffMember {
            name: "Jon Vance".into(),
            email: "jon.vance@hospital.test".into(),
            department: "Emergency".into(),
            role: "Emergency Physician".into(),
            hire_date: date(2017, 1, 9),
        })
        .unwrap();
    (engine, staff)
}

fn shift(staff_id: StaffId, day: NaiveDate, hours: f64, overtime: f64) -> NewWorkHours {
    NewWorkHours {
        staff_id,
        work_date: day,
        hours_worked: hours,
        overtime_hours: overtime,
    }
}

/// A score store that cannot write.
struct ReadOnlyScores;

impl RiskScoreRepository for ReadOnlyScores {
    fn get_risk_score(
        &self,
        _staff_id: StaffId,
        _date: NaiveDate,
    ) -> EngineResult<Option<RiskScoreRecord>> {
        Ok(None)
    }

    fn latest_risk_score(&self, _staff_id: StaffId) -> EngineResult<Option<RiskScoreRecord>> {
        Ok(None)
    }

    fn upsert_risk_score(&self, score: &NewRiskScore) -> EngineResult<RiskScoreId> {
        Err(EngineError::RiskCalculation {
            staff_id: score.staff_id,
            reason: "score store is read-only".into(),
        })
    }
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn rejects_out_of_range_hours() {
    let (engine, staff) = setup();
    let intake = engine.intake();
    for (hours, overtime) in [(-1.0, 0.0), (24.5, 0.0), (8.0, -0.5), (f64::NAN, 0.0)] {
        assert!(matches!(
            intake.record(&shift(staff, date(2024, 1, 15), hours, overtime)),
            Err(EngineError::InvalidWorkHours { .. })
        ));
    }
    assert_eq!(engine.store.risk_score_count(staff).unwrap(), 0);
}

#[test]
fn rejects_unknown_staff() {
    let (engine, _) = setup();
    assert!(matches!(
        engine.intake().record(&shift(777, date(2024, 1, 15), 8.0, 0.0)),
        Err(EngineError::StaffNotFound { staff_id: 777 })
    ));
}

#[test]
fn rejects_second_entry_for_same_day() {
    let (engine, staff) = setup();
    let intake = engine.intake();
    intake.record(&shift(staff, date(2024, 1, 15), 8.0, 0.0)).unwrap();
    assert!(matches!(
        intake.record(&shift(staff, date(2024, 1, 15), 4.0, 0.0)),
        Err(EngineError::DuplicateWorkHours { .. })
    ));
}

// ── Trigger ──────────────────────────────────────────────────────────────────

/// Recording an entry scores the staff member as of that entry's date.
#[test]
fn record_scores_entry_date() {
    let (engine, staff) = setup();
    let outcome = engine
        .intake()
        .record(&shift(staff, date(2024, 1, 16), 10.0, 2.0))
        .unwrap();

    let risk = outcome.updated_risk.unwrap();
    assert_eq!(risk.score_date, date(2024, 1, 16));
    // 20 base + 10 streak + 25 overtime
    assert_eq!(risk.score, 55.0);
    assert_eq!(risk.risk_level, RiskLevel::Medium);
    assert!(outcome.alert.is_none());
}

/// Crossing into the high band during a run of shifts raises exactly one alert.
#[test]
fn heavy_run_raises_one_alert_then_stays_quiet() {
    let (engine, staff) = setup();
    let intake = engine.intake();
    let mut outcomes = Vec::new();
    for day in 15..=19 {
        outcomes.push(intake.record(&shift(staff, date(2024, 1, day), 12.0, 2.0)).unwrap());
    }

    let scores: Vec<f64> = outcomes
        .iter()
        .map(|o| o.updated_risk.as_ref().unwrap().score)
        .collect();
    // Streak grows to 3, overtime caps at once, hours pass 60 on day 5.
    assert_eq!(scores, vec![55.0, 65.0, 75.0, 75.0, 95.0]);

    let actions: Vec<Option<AlertAction>> =
        outcomes.iter().map(|o| o.alert.map(|a| a.action)).collect();
    assert_eq!(
        actions,
        vec![None, None, Some(AlertAction::Raised), None, Some(AlertAction::Refreshed)]
    );
    assert_eq!(engine.store.alerts_for_staff(staff).unwrap().len(), 1);
    assert_eq!(engine.recorded_notices().len(), 2);
}

/// Amending an entry rescores its date; absent fields keep their values.
#[test]
fn amend_rescores_same_date() {
    let (engine, staff) = setup();
    let intake = engine.intake();
    let recorded = intake.record(&shift(staff, date(2024, 1, 17), 8.0, 0.0)).unwrap();
    let first_id = recorded.updated_risk.as_ref().unwrap().score_id;

    let amended = intake
        .amend(
            recorded.entry.entry_id,
            &WorkHoursPatch { hours_worked: None, overtime_hours: Some(1.0) },
        )
        .unwrap();

    assert_eq!(amended.entry.hours_worked, 8.0);
    assert_eq!(amended.entry.overtime_hours, 1.0);
    let risk = amended.updated_risk.unwrap();
    assert_eq!(risk.score_id, first_id);
    assert_eq!(risk.score, 45.0);
    assert_eq!(engine.store.risk_score_count(staff).unwrap(), 1);
}

#[test]
fn amend_validates_merged_values() {
    let (engine, staff) = setup();
    let intake = engine.intake();
    let recorded = intake.record(&shift(staff, date(2024, 1, 17), 8.0, 0.0)).unwrap();
    assert!(matches!(
        intake.amend(
            recorded.entry.entry_id,
            &WorkHoursPatch { hours_worked: Some(30.0), overtime_hours: None },
        ),
        Err(EngineError::InvalidWorkHours { .. })
    ));
    assert!(matches!(
        intake.amend(999, &WorkHoursPatch::default()),
        Err(EngineError::WorkHoursNotFound { entry_id: 999 })
    ));
}

/// Removing an entry deletes it and rescores as of today.
#[test]
fn remove_rescores_as_of_today() {
    let (engine, staff) = setup();
    let intake = engine.intake();
    let kept = intake.record(&shift(staff, date(2024, 1, 20), 8.0, 0.0)).unwrap();
    let dropped = intake.record(&shift(staff, date(2024, 1, 21), 8.0, 1.0)).unwrap();
    let before = engine.store.latest_risk_score(staff).unwrap().unwrap();
    assert_eq!(before.score_date, date(2024, 1, 21));

    let removal = intake.remove(dropped.entry.entry_id).unwrap();
    assert_eq!(removal.removed.entry_id, dropped.entry.entry_id);
    assert!(engine.store.get_work_hours(dropped.entry.entry_id).unwrap().is_none());
    assert!(engine.store.get_work_hours(kept.entry.entry_id).unwrap().is_some());

    // Today (Sunday) is no longer worked: base + one weekend.
    let risk = removal.updated_risk.unwrap();
    assert_eq!(risk.score_date, date(2024, 1, 21));
    assert_eq!(risk.score_id, before.score_id);
    assert_eq!(risk.score, 25.0);

    assert!(matches!(
        intake.remove(dropped.entry.entry_id),
        Err(EngineError::WorkHoursNotFound { .. })
    ));
}

/// A failed score write leaves the entry stored and reports no score or alert.
#[test]
fn failed_recalculation_keeps_the_write() {
    let (engine, staff) = setup();
    let scores = ReadOnlyScores;
    let intake = WorkHourIntake::new(
        &engine.store,
        RiskLedger::new(engine.scorer(), &scores),
        engine.alerts(),
    );

    let outcome = intake
        .record(&shift(staff, date(2024, 1, 19), 12.0, 4.0))
        .unwrap();

    assert!(outcome.updated_risk.is_none());
    assert!(outcome.alert.is_none());
    let stored = engine.store.get_work_hours(outcome.entry.entry_id).unwrap().unwrap();
    assert_eq!(stored.hours_worked, 12.0);
    assert_eq!(stored.overtime_hours, 4.0);
    assert_eq!(engine.store.risk_score_count(staff).unwrap(), 0);
    assert!(engine.store.alerts_for_staff(staff).unwrap().is_empty());
    assert!(engine.recorded_notices().is_empty());
}
