//! Facility types and facility instances under construction

use crate::core::types::Scores;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which score a facility type primarily serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum FacilityCategory {
    LifeQuality = 0,
    Economy = 1,
    Environment = 2,
}

impl FacilityCategory {
    /// Decode the numeric category code used by config files and commands
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FacilityCategory::LifeQuality),
            1 => Some(FacilityCategory::Economy),
            2 => Some(FacilityCategory::Environment),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for FacilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacilityCategory::LifeQuality => "Life Quality",
            FacilityCategory::Economy => "Economy",
            FacilityCategory::Environment => "Environment",
        };
        f.write_str(name)
    }
}

/// Current state of a facility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityStatus {
    /// Construction site - contributes nothing yet
    UnderConstruction,
    /// Fully built, scores have been credited to the owning plan
    Operational,
}

impl fmt::Display for FacilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityStatus::UnderConstruction => f.write_str("UNDER_CONSTRUCTION"),
            FacilityStatus::Operational => f.write_str("OPERATIONAL"),
        }
    }
}

/// Catalog entry describing a buildable facility type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityType {
    /// Unique key within the catalog
    pub name: String,
    pub category: FacilityCategory,
    /// Construction duration in ticks
    pub cost: u32,
    /// Score contributions granted once operational
    pub scores: Scores,
}

impl FacilityType {
    pub fn new(
        name: impl Into<String>,
        category: FacilityCategory,
        cost: u32,
        scores: Scores,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            cost,
            scores,
        }
    }
}

/// Result of advancing a facility by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionResult {
    /// Still being built
    InProgress { remaining: u32 },
    /// Became operational on this tick
    Completed,
    /// Was already operational, nothing changed
    AlreadyOperational,
}

/// A facility type instantiated for one settlement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    facility_type: FacilityType,
    settlement_name: String,
    status: FacilityStatus,
    remaining: u32,
}

impl Facility {
    /// Start construction of `facility_type` in the named settlement
    pub fn new(facility_type: FacilityType, settlement_name: impl Into<String>) -> Self {
        let remaining = facility_type.cost;
        Self {
            facility_type,
            settlement_name: settlement_name.into(),
            status: FacilityStatus::UnderConstruction,
            remaining,
        }
    }

    pub fn name(&self) -> &str {
        &self.facility_type.name
    }

    pub fn category(&self) -> FacilityCategory {
        self.facility_type.category
    }

    pub fn scores(&self) -> Scores {
        self.facility_type.scores
    }

    pub fn settlement_name(&self) -> &str {
        &self.settlement_name
    }

    pub fn status(&self) -> FacilityStatus {
        self.status
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_operational(&self) -> bool {
        self.status == FacilityStatus::Operational
    }

    /// Advance construction by one tick
    ///
    /// A facility with cost C becomes operational on its C-th tick (a cost of
    /// zero completes on the first tick). Ticking an operational facility is a
    /// no-op.
    pub fn tick(&mut self) -> ConstructionResult {
        if self.is_operational() {
            return ConstructionResult::AlreadyOperational;
        }

        self.remaining = self.remaining.saturating_sub(1);

        if self.remaining == 0 {
            self.status = FacilityStatus::Operational;
            ConstructionResult::Completed
        } else {
            ConstructionResult::InProgress {
                remaining: self.remaining,
            }
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "Facility Name: {}, Category: {}, Status: {}, Time Left: {}, Settlement: {}",
            self.facility_type.name,
            self.facility_type.category,
            self.status,
            self.remaining,
            self.settlement_name
        )
    }
}
