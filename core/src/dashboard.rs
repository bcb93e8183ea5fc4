//! Read models for dashboards and reports.
//!
//! Nothing here writes. Staff without a stored score are reported at the
//! base score and the Low tier.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    clock::Clock,
    config::EngineConfig,
    error::EngineResult,
    risk_ledger::RiskScoreRecord,
    risk_scoring::{RiskFactors, RiskLevel},
    store::BurnoutStore,
    types::{AlertId, StaffId},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRiskSummary {
    pub staff_id:   StaffId,
    pub name:       String,
    pub department: String,
    pub role:       String,
    pub score:      Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub factors:    Option<RiskFactors>,
    pub risk_date:  Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low:    i64,
    pub medium: i64,
    pub high:   i64,
}

impl RiskDistribution {
    pub fn add(&mut self, level: RiskLevel, count: i64) {
        match level {
            RiskLevel::Low => self.low += count,
            RiskLevel::Medium => self.medium += count,
            RiskLevel::High => self.high += count,
        }
    }

    pub fn total(&self) -> i64 {
        self.low + self.medium + self.high
    }
}

/// An alert joined with the staff member it concerns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertView {
    pub alert_id:    AlertId,
    pub staff_id:    StaffId,
    pub staff_name:  String,
    pub department:  String,
    pub role:        String,
    pub message:     String,
    pub risk_score:  f64,
    pub resolved:    bool,
    pub created_at:  DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page:        u32,
    pub limit:       u32,
    pub total:       i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let per_page = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            total_pages: (total + per_page - 1) / per_page,
        }
    }

    pub fn offset(page: u32, limit: u32) -> i64 {
        i64::from(page.max(1) - 1) * i64::from(limit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertPage {
    pub alerts:     Vec<AlertView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlertStats {
    pub total_alerts:      i64,
    pub active_alerts:     i64,
    pub resolved_alerts:   i64,
    pub alerts_this_week:  i64,
}

pub struct Dashboard<'a> {
    store:  &'a BurnoutStore,
    clock:  &'a dyn Clock,
    config: &'a EngineConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(store: &'a BurnoutStore, clock: &'a dyn Clock, config: &'a EngineConfig) -> Self {
        Self { store, clock, config }
    }

    /// Every staff member with their most recent score, highest first.
    pub fn current_risk_scores(&self) -> EngineResult<Vec<StaffRiskSummary>> {
        self.store.current_risk_scores()
    }

    pub fn risk_distribution(&self) -> EngineResult<RiskDistribution> {
        let mut distribution = RiskDistribution::default();
        for (level, count) in self.store.risk_level_counts()? {
            distribution.add(level, count);
        }
        Ok(distribution)
    }

    pub fn top_risk_staff(&self, limit: Option<usize>) -> EngineResult<Vec<StaffRiskSummary>> {
        self.store
            .top_risk_staff(limit.unwrap_or(self.config.top_risk_limit))
    }

    pub fn staff_risk_history(
        &self,
        staff_id: StaffId,
        days: Option<i64>,
    ) -> EngineResult<Vec<RiskScoreRecord>> {
        let days = days.unwrap_or(self.config.history_days).max(0) as u64;
        let today = self.clock.today();
        let since = today
            .checked_sub_days(Days::new(days))
            .unwrap_or(NaiveDate::MIN);
        self.store.risk_history_since(staff_id, since)
    }

    pub fn active_alerts(&self) -> EngineResult<Vec<AlertView>> {
        self.store.active_alert_views()
    }

    pub fn list_alerts(
        &self,
        page: u32,
        limit: u32,
        resolved: Option<bool>,
    ) -> EngineResult<AlertPage> {
        let page = page.max(1);
        let limit = limit.max(1);
        let (alerts, total) = self.store.alert_views_page(page, limit, resolved)?;
        Ok(AlertPage {
            alerts,
            pagination: Pagination::new(page, limit, total),
        })
    }

    pub fn alert_stats(&self) -> EngineResult<AlertStats> {
        let since = self.clock.now() - chrono::Duration::days(self.config.alert_window_days);
        self.store.alert_stats_since(since)
    }
}
