//! Settlements - named places whose type fixes how many facilities a plan
//! may build at once

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size class of a settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum SettlementType {
    Village = 0,
    City = 1,
    Metropolis = 2,
}

impl SettlementType {
    /// Maximum number of facilities a plan may have under construction
    pub fn construction_limit(&self) -> usize {
        match self {
            SettlementType::Village => 1,
            SettlementType::City => 2,
            SettlementType::Metropolis => 3,
        }
    }

    /// Decode the numeric type code used by config files and commands
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SettlementType::Village),
            1 => Some(SettlementType::City),
            2 => Some(SettlementType::Metropolis),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for SettlementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettlementType::Village => "Village",
            SettlementType::City => "City",
            SettlementType::Metropolis => "Metropolis",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    name: String,
    settlement_type: SettlementType,
}

impl Settlement {
    pub fn new(name: impl Into<String>, settlement_type: SettlementType) -> Self {
        Self {
            name: name.into(),
            settlement_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settlement_type(&self) -> SettlementType {
        self.settlement_type
    }

    pub fn construction_limit(&self) -> usize {
        self.settlement_type.construction_limit()
    }

    pub fn describe(&self) -> String {
        format!("Settlement: {}, Type: {}", self.name, self.settlement_type)
    }
}
