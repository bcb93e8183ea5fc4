//! Deterministic demo roster: staff across three departments with
//! high, medium and low workload profiles, and a trailing window of
//! work hours recorded through the intake so scores and alerts are
//! produced the same way as in production.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    alerting::AlertAction,
    engine::BurnoutEngine,
    error::EngineResult,
    intake::NewWorkHours,
    name_generator::NameGenerator,
    rng::{SeedRng, SeedStream},
    roster::NewStaffMember,
    types::StaffId,
};

const DAY_OFF_PROBABILITY: f64 = 0.15;
const REGULAR_SHIFT_HOURS: f64 = 8.0;

const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "ICU",
        &[
            "Critical Care Physician",
            "Senior ICU Nurse",
            "Intensivist",
            "Charge Nurse",
            "Respiratory Therapist",
        ],
    ),
    (
        "Emergency",
        &[
            "Emergency Physician",
            "Trauma Nurse",
            "Emergency Nurse",
            "Emergency Medicine",
        ],
    ),
    (
        "General",
        &[
            "Internal Medicine",
            "Registered Nurse",
            "Family Medicine",
            "Floor Nurse",
            "Staff Nurse",
        ],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadProfile {
    High,
    Medium,
    Low,
}

impl WorkloadProfile {
    fn for_department(department: &str, rng: &mut SeedRng) -> Self {
        let roll = rng.next_f64();
        match department {
            "ICU" if roll < 0.5 => Self::High,
            "ICU" => Self::Medium,
            "Emergency" if roll < 0.4 => Self::High,
            "Emergency" if roll < 0.7 => Self::Medium,
            "General" if roll < 0.3 => Self::Medium,
            _ => Self::Low,
        }
    }

    /// (regular, overtime) hours for one shift, rounded to 0.1h.
    fn shift(&self, rng: &mut SeedRng) -> (f64, f64) {
        let (regular, overtime) = match self {
            Self::High => {
                let hours = if rng.chance(0.8) { rng.span(10.0, 4.0) } else { rng.span(8.0, 2.0) };
                split_shift(hours)
            }
            Self::Medium => {
                let hours = if rng.chance(0.6) { rng.span(9.0, 3.0) } else { rng.span(8.0, 1.0) };
                split_shift(hours)
            }
            Self::Low => {
                let overtime = if rng.chance(0.2) { rng.span(0.0, 2.0) } else { 0.0 };
                (rng.span(7.0, 2.0), overtime)
            }
        };
        (round_tenth(regular), round_tenth(overtime))
    }
}

fn split_shift(hours: f64) -> (f64, f64) {
    (
        hours.min(REGULAR_SHIFT_HOURS),
        (hours - REGULAR_SHIFT_HOURS).max(0.0),
    )
}

fn round_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSeedSummary {
    pub staff_created:    usize,
    pub entries_recorded: usize,
    pub scores_written:   usize,
    pub alerts_raised:    usize,
    pub alerts_refreshed: usize,
}

/// Create `staff_count` staff and `days` days of history ending today.
pub fn seed_demo_roster(
    engine: &BurnoutEngine,
    seed: u64,
    staff_count: usize,
    days: u32,
) -> EngineResult<DemoSeedSummary> {
    let today = engine.clock().today();
    let mut roster_rng = SeedRng::for_stream(seed, SeedStream::Roster);
    let mut shift_rng = SeedRng::for_stream(seed, SeedStream::Shifts);
    let mut summary = DemoSeedSummary::default();

    let mut roster: Vec<(StaffId, WorkloadProfile)> = Vec::with_capacity(staff_count);
    for serial in 0..staff_count {
        let (department, roles) = *roster_rng.pick(DEPARTMENTS);
        let role = *roster_rng.pick(roles);
        let name = NameGenerator::generate_full_name(&mut roster_rng);
        let tenure_days = 365 + roster_rng.next_u64_below(2000);
        let hire_date = today
            .checked_sub_days(Days::new(tenure_days))
            .unwrap_or(today);
        let profile = WorkloadProfile::for_department(department, &mut roster_rng);

        let staff_id = engine.store.insert_staff(&NewStaffMember {
            email: NameGenerator::work_email(&name, serial + 1),
            name,
            department: department.to_string(),
            role: role.to_string(),
            hire_date,
        })?;
        roster.push((staff_id, profile));
        summary.staff_created += 1;
    }

    let intake = engine.intake();
    for date in trailing_dates(today, days) {
        for (staff_id, profile) in &roster {
            if shift_rng.chance(DAY_OFF_PROBABILITY) {
                continue;
            }
            let (hours_worked, overtime_hours) = profile.shift(&mut shift_rng);
            let outcome = intake.record(&NewWorkHours {
                staff_id: *staff_id,
                work_date: date,
                hours_worked,
                overtime_hours,
            })?;
            summary.entries_recorded += 1;
            if outcome.updated_risk.is_some() {
                summary.scores_written += 1;
            }
            match outcome.alert.map(|a| a.action) {
                Some(AlertAction::Raised) => summary.alerts_raised += 1,
                Some(AlertAction::Refreshed) => summary.alerts_refreshed += 1,
                None => {}
            }
        }
    }

    log::info!(
        "demo seed {seed}: {} staff, {} entries, {} alerts raised",
        summary.staff_created,
        summary.entries_recorded,
        summary.alerts_raised
    );
    Ok(summary)
}

/// `days` dates ending at `today`, oldest first.
fn trailing_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..u64::from(days))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_profile_splits_long_shifts_into_overtime() {
        assert_eq!(split_shift(11.5), (8.0, 3.5));
        assert_eq!(split_shift(7.0), (7.0, 0.0));
    }

    #[test]
    fn trailing_dates_end_today_in_order() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let dates = trailing_dates(today, 3);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                today,
            ]
        );
    }

    #[test]
    fn shifts_stay_within_intake_limits() {
        let mut rng = SeedRng::for_stream(7, SeedStream::Shifts);
        for profile in [WorkloadProfile::High, WorkloadProfile::Medium, WorkloadProfile::Low] {
            for _ in 0..200 {
                let (regular, overtime) = profile.shift(&mut rng);
                assert!((0.0..=24.0).contains(&regular));
                assert!(overtime >= 0.0);
            }
        }
    }
}
