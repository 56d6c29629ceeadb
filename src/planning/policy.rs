//! Selection policies - decide which facility type a plan builds next
//!
//! Every policy is owned by exactly one plan. Cloning a policy yields an
//! independent copy carrying the same cursor or baseline.

use crate::city::catalog::FacilityCatalog;
use crate::city::facility::{FacilityCategory, FacilityType};
use crate::core::error::{Result, SimError};
use crate::core::types::Scores;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Short code identifying a policy variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyCode {
    Naive,
    Balanced,
    Economy,
    Sustainability,
}

impl PolicyCode {
    pub const ALL: [PolicyCode; 4] = [
        PolicyCode::Naive,
        PolicyCode::Balanced,
        PolicyCode::Economy,
        PolicyCode::Sustainability,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyCode::Naive => "nve",
            PolicyCode::Balanced => "bal",
            PolicyCode::Economy => "eco",
            PolicyCode::Sustainability => "env",
        }
    }
}

impl fmt::Display for PolicyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyCode {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        PolicyCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| SimError::InvalidPolicyCode(s.to_string()))
    }
}

/// Capability shared by every policy variant
pub trait SelectFacility {
    /// Choose the next facility type to build from `catalog`
    fn select_facility<'a>(&mut self, catalog: &'a FacilityCatalog) -> Result<&'a FacilityType>;
}

/// Round-robin over the whole catalog, ignoring categories and scores
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NaiveSelection {
    cursor: usize,
}

impl NaiveSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl SelectFacility for NaiveSelection {
    fn select_facility<'a>(&mut self, catalog: &'a FacilityCatalog) -> Result<&'a FacilityType> {
        let entries = catalog.all();
        if entries.is_empty() {
            return Err(SimError::EmptyCatalog);
        }
        let idx = self.cursor % entries.len();
        self.cursor = (idx + 1) % entries.len();
        Ok(&entries[idx])
    }
}

/// Picks the entry that keeps the three score totals closest together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalancedSelection {
    baseline: Scores,
}

impl BalancedSelection {
    pub fn new(baseline: Scores) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> Scores {
        self.baseline
    }

    pub fn reseed(&mut self, baseline: Scores) {
        self.baseline = baseline;
    }
}

impl SelectFacility for BalancedSelection {
    fn select_facility<'a>(&mut self, catalog: &'a FacilityCatalog) -> Result<&'a FacilityType> {
        let mut best: Option<(&FacilityType, i64)> = None;
        for candidate in catalog.all() {
            let spread = (self.baseline + candidate.scores).spread();
            // Strict comparison keeps the earliest entry on ties
            if best.map_or(true, |(_, best_spread)| spread < best_spread) {
                best = Some((candidate, spread));
            }
        }
        best.map(|(entry, _)| entry).ok_or(SimError::EmptyCatalog)
    }
}

/// Round-robin restricted to a single category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySelection {
    category: FacilityCategory,
    cursor: usize,
}

impl CategorySelection {
    pub fn new(category: FacilityCategory) -> Self {
        Self { category, cursor: 0 }
    }

    pub fn category(&self) -> FacilityCategory {
        self.category
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

impl SelectFacility for CategorySelection {
    fn select_facility<'a>(&mut self, catalog: &'a FacilityCatalog) -> Result<&'a FacilityType> {
        let entries = catalog.all();
        if entries.is_empty() {
            return Err(SimError::EmptyCatalog);
        }
        let len = entries.len();
        let start = self.cursor % len;
        for offset in 0..len {
            let idx = (start + offset) % len;
            if entries[idx].category == self.category {
                self.cursor = (idx + 1) % len;
                return Ok(&entries[idx]);
            }
        }
        Err(SimError::NoMatchingCategory(self.category))
    }
}

/// A plan's policy, dispatched by variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPolicy {
    Naive(NaiveSelection),
    Balanced(BalancedSelection),
    Economy(CategorySelection),
    Sustainability(CategorySelection),
}

impl SelectionPolicy {
    /// Fresh policy for `code`; Balanced starts from `baseline`
    pub fn from_code(code: PolicyCode, baseline: Scores) -> Self {
        match code {
            PolicyCode::Naive => SelectionPolicy::Naive(NaiveSelection::new()),
            PolicyCode::Balanced => SelectionPolicy::Balanced(BalancedSelection::new(baseline)),
            PolicyCode::Economy => {
                SelectionPolicy::Economy(CategorySelection::new(FacilityCategory::Economy))
            }
            PolicyCode::Sustainability => {
                SelectionPolicy::Sustainability(CategorySelection::new(FacilityCategory::Environment))
            }
        }
    }

    pub fn identify(&self) -> PolicyCode {
        match self {
            SelectionPolicy::Naive(_) => PolicyCode::Naive,
            SelectionPolicy::Balanced(_) => PolicyCode::Balanced,
            SelectionPolicy::Economy(_) => PolicyCode::Economy,
            SelectionPolicy::Sustainability(_) => PolicyCode::Sustainability,
        }
    }

    /// Independent copy with the same cursor/baseline state
    pub fn duplicate(&self) -> Self {
        self.clone()
    }
}

impl SelectFacility for SelectionPolicy {
    fn select_facility<'a>(&mut self, catalog: &'a FacilityCatalog) -> Result<&'a FacilityType> {
        match self {
            SelectionPolicy::Naive(policy) => policy.select_facility(catalog),
            SelectionPolicy::Balanced(policy) => policy.select_facility(catalog),
            SelectionPolicy::Economy(policy) | SelectionPolicy::Sustainability(policy) => {
                policy.select_facility(catalog)
            }
        }
    }
}
