//! Plans - per-settlement build schedulers that accumulate quality scores

use crate::city::catalog::FacilityCatalog;
use crate::city::facility::{ConstructionResult, Facility};
use crate::city::settlement::Settlement;
use crate::core::error::Result;
use crate::core::types::{PlanId, Scores};
use crate::planning::policy::{PolicyCode, SelectFacility, SelectionPolicy};
use serde::Serialize;
use std::fmt;

/// Whether a plan has free construction slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlanStatus {
    Available,
    Busy,
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanStatus::Available => f.write_str("AVAILABLE"),
            PlanStatus::Busy => f.write_str("BUSY"),
        }
    }
}

/// Serializable view of a plan for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub id: PlanId,
    pub settlement: String,
    pub status: PlanStatus,
    pub policy: PolicyCode,
    pub scores: Scores,
    pub completed: Vec<String>,
    pub under_construction: Vec<String>,
}

/// A build plan for one settlement
///
/// Invariant: `under_construction.len() <= settlement.construction_limit()`,
/// and `status` is `Busy` exactly when the limit is reached.
#[derive(Debug, Clone)]
pub struct Plan {
    id: PlanId,
    settlement: Settlement,
    policy: SelectionPolicy,
    status: PlanStatus,
    completed: Vec<Facility>,
    under_construction: Vec<Facility>,
    scores: Scores,
}

impl Plan {
    pub fn new(id: PlanId, settlement: Settlement, policy: SelectionPolicy) -> Self {
        Self {
            id,
            settlement,
            policy,
            status: PlanStatus::Available,
            completed: Vec::new(),
            under_construction: Vec::new(),
            scores: Scores::default(),
        }
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn settlement(&self) -> &Settlement {
        &self.settlement
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    pub fn scores(&self) -> Scores {
        self.scores
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn policy_code(&self) -> PolicyCode {
        self.policy.identify()
    }

    pub fn completed(&self) -> &[Facility] {
        &self.completed
    }

    pub fn under_construction(&self) -> &[Facility] {
        &self.under_construction
    }

    pub fn construction_limit(&self) -> usize {
        self.settlement.construction_limit()
    }

    /// Install an independent copy of `policy`, discarding the current one
    pub fn set_selection_policy(&mut self, policy: &SelectionPolicy) {
        self.policy = policy.duplicate();
    }

    /// Run one simulation tick
    ///
    /// Free slots are filled first, then every facility under construction
    /// advances once. A selection failure stops filling but the tick still
    /// runs; the failure is returned afterwards.
    pub fn step(&mut self, catalog: &FacilityCatalog) -> Result<()> {
        let mut selection_error = None;

        if self.status == PlanStatus::Available {
            while self.under_construction.len() < self.construction_limit() {
                match self.policy.select_facility(catalog) {
                    Ok(facility_type) => {
                        tracing::debug!(
                            "Plan {} started construction of {}",
                            self.id,
                            facility_type.name
                        );
                        self.under_construction
                            .push(Facility::new(facility_type.clone(), self.settlement.name()));
                    }
                    Err(err) => {
                        selection_error = Some(err);
                        break;
                    }
                }
            }
        }

        let building = std::mem::take(&mut self.under_construction);
        for mut facility in building {
            match facility.tick() {
                ConstructionResult::Completed => {
                    tracing::debug!("Plan {}: {} is operational", self.id, facility.name());
                    self.scores += facility.scores();
                    self.completed.push(facility);
                }
                ConstructionResult::InProgress { .. } | ConstructionResult::AlreadyOperational => {
                    self.under_construction.push(facility);
                }
            }
        }

        self.status = if self.under_construction.len() == self.construction_limit() {
            PlanStatus::Busy
        } else {
            PlanStatus::Available
        };

        match selection_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn describe(&self) -> String {
        self.to_string()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            id: self.id,
            settlement: self.settlement.name().to_string(),
            status: self.status,
            policy: self.policy.identify(),
            scores: self.scores,
            completed: self.completed.iter().map(|f| f.name().to_string()).collect(),
            under_construction: self
                .under_construction
                .iter()
                .map(|f| f.name().to_string())
                .collect(),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PlanID: {}", self.id)?;
        writeln!(f, "SettlementName: {}", self.settlement.name())?;
        writeln!(f, "PlanStatus: {}", self.status)?;
        writeln!(f, "SelectionPolicy: {}", self.policy.identify())?;
        writeln!(f, "LifeQualityScore: {}", self.scores.life_quality)?;
        writeln!(f, "EconomyScore: {}", self.scores.economy)?;
        writeln!(f, "EnvironmentScore: {}", self.scores.environment)?;
        for facility in self.completed.iter().chain(&self.under_construction) {
            writeln!(f, "FacilityName: {}", facility.name())?;
            writeln!(f, "FacilityStatus: {}", facility.status())?;
        }
        Ok(())
    }
}
