//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a plan, assigned 0, 1, 2, ... in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlanId(pub u32);

impl PlanId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Simulation tick counter (one round of plan steps)
pub type Tick = u64;

/// The three quality scores a facility contributes and a plan accumulates
///
/// Totals saturate at the `i32` bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scores {
    pub life_quality: i32,
    pub economy: i32,
    pub environment: i32,
}

impl Scores {
    pub fn new(life_quality: i32, economy: i32, environment: i32) -> Self {
        Self {
            life_quality,
            economy,
            environment,
        }
    }

    /// Difference between the largest and smallest of the three scores
    pub fn spread(&self) -> i64 {
        let max = self.life_quality.max(self.economy).max(self.environment);
        let min = self.life_quality.min(self.economy).min(self.environment);
        i64::from(max) - i64::from(min)
    }
}

impl std::ops::Add for Scores {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            life_quality: self.life_quality.saturating_add(rhs.life_quality),
            economy: self.economy.saturating_add(rhs.economy),
            environment: self.environment.saturating_add(rhs.environment),
        }
    }
}

impl std::ops::AddAssign for Scores {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
