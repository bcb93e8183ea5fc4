//! The burnout engine: wires the store, clock and notification sink
//! into the scoring and alerting components.
//!
//! Call order for a work-hours change (fixed):
//!   1. Work-hours write           (intake)
//!   2. Previous score read        (risk ledger)
//!   3. Factor aggregation + score (work history, risk scoring)
//!   4. Score upsert               (risk ledger)
//!   5. Alert decision + notice    (alerting), only at score >= 71
//!
//! Everything runs to completion inside the triggering call.

use chrono::NaiveDate;

use crate::{
    alerting::AlertEngine,
    clock::{Clock, FixedClock, SystemClock},
    config::EngineConfig,
    dashboard::Dashboard,
    error::EngineResult,
    intake::WorkHourIntake,
    notification::{HighRiskNotice, LogNotificationSink, NotificationSink, RecordingSink},
    risk_ledger::RiskLedger,
    risk_scoring::RiskScorer,
    store::BurnoutStore,
    work_history::WorkHistoryAggregator,
};

pub struct BurnoutEngine {
    pub store:  BurnoutStore,
    pub config: EngineConfig,
    clock:      Box<dyn Clock>,
    sink:       Box<dyn NotificationSink>,
}

impl BurnoutEngine {
    pub fn new(
        store: BurnoutStore,
        config: EngineConfig,
        clock: Box<dyn Clock>,
        sink: Box<dyn NotificationSink>,
    ) -> Self {
        Self { store, config, clock, sink }
    }

    /// Open the configured database, migrate it, and log notices for the
    /// configured manager.
    pub fn build(config: EngineConfig) -> EngineResult<Self> {
        let store = BurnoutStore::open(&config.database_path)?;
        store.migrate()?;
        let sink = LogNotificationSink::new(config.manager_email.clone());
        Ok(Self::new(store, config, Box::new(SystemClock), Box::new(sink)))
    }

    /// In-memory engine pinned to `today`, recording notices in memory.
    pub fn build_test_at(today: NaiveDate) -> EngineResult<Self> {
        let store = BurnoutStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(
            store,
            EngineConfig::default_test(),
            Box::new(FixedClock::on(today)),
            Box::new(RecordingSink::new()),
        ))
    }

    /// In-memory engine on the wall clock, recording notices in memory.
    pub fn build_test() -> EngineResult<Self> {
        let store = BurnoutStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(
            store,
            EngineConfig::default_test(),
            Box::new(SystemClock),
            Box::new(RecordingSink::new()),
        ))
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn history(&self) -> WorkHistoryAggregator<'_> {
        WorkHistoryAggregator::new(&self.store, self.config.streak_scan_limit)
    }

    pub fn scorer(&self) -> RiskScorer<'_> {
        RiskScorer::new(self.history(), self.clock.as_ref())
    }

    pub fn ledger(&self) -> RiskLedger<'_> {
        RiskLedger::new(self.scorer(), &self.store)
    }

    pub fn alerts(&self) -> AlertEngine<'_> {
        AlertEngine::new(&self.store, &self.store, self.sink.as_ref(), self.clock.as_ref())
    }

    pub fn intake(&self) -> WorkHourIntake<'_> {
        WorkHourIntake::new(&self.store, self.ledger(), self.alerts())
    }

    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(&self.store, self.clock.as_ref(), &self.config)
    }

    /// Notices captured by a `RecordingSink`; empty for any other sink.
    /// Used by tests and tooling only.
    pub fn recorded_notices(&self) -> Vec<HighRiskNotice> {
        self.sink
            .as_any()
            .downcast_ref::<RecordingSink>()
            .map(RecordingSink::notices)
            .unwrap_or_default()
    }
}
