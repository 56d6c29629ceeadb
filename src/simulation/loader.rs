//! Load the initial settlements, facility catalog and plans from a
//! configuration file
//!
//! Two formats are accepted: the line format (`settlement`, `facility` and
//! `plan` commands, one per line) and TOML, chosen by a `.toml` extension.
//! Any error is fatal to loading.

use crate::city::facility::{FacilityCategory, FacilityType};
use crate::city::settlement::{Settlement, SettlementType};
use crate::command::action::ActionKind;
use crate::command::parser::{parse_action, ParseError};
use crate::core::error::SimError;
use crate::core::types::Scores;
use crate::simulation::engine::SimulationEngine;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not open configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: '{command}' is not allowed in a configuration file")]
    UnexpectedCommand { line: usize, command: String },

    #[error("{location}: {source}")]
    Rejected {
        location: String,
        #[source]
        source: SimError,
    },

    #[error("{location}: invalid settlement type code {code}")]
    InvalidSettlementType { location: String, code: u8 },

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load a configuration file into a fresh engine
pub fn load_config(path: &Path) -> Result<SimulationEngine, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let engine = if path.extension().is_some_and(|ext| ext == "toml") {
        parse_toml_config(&content)?
    } else {
        parse_config_lines(&content)?
    };

    tracing::info!(
        "Loaded {}: {} settlements, {} facility types, {} plans",
        path.display(),
        engine.settlements().len(),
        engine.catalog().len(),
        engine.plans().len()
    );
    Ok(engine)
}

/// Build an engine from the line format; `#` starts a comment line
pub fn parse_config_lines(content: &str) -> Result<SimulationEngine, ConfigError> {
    let mut engine = SimulationEngine::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        if raw.trim_start().starts_with('#') {
            continue;
        }
        let Some(kind) = parse_action(raw).map_err(|source| ConfigError::Parse { line, source })?
        else {
            continue;
        };

        let result = match kind {
            ActionKind::AddSettlement {
                name,
                settlement_type,
            } => engine.add_settlement(Settlement::new(name, settlement_type)),
            ActionKind::AddFacilityType { facility } => engine.add_facility_type(facility),
            ActionKind::AddPlan { settlement, policy } => {
                engine.add_plan(&settlement, &policy).map(|_| ())
            }
            other => {
                return Err(ConfigError::UnexpectedCommand {
                    line,
                    command: other.command_line(),
                })
            }
        };
        result.map_err(|source| ConfigError::Rejected {
            location: format!("line {}", line),
            source,
        })?;
    }

    Ok(engine)
}

/// TOML representation of a configuration file
#[derive(Debug, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    settlements: Vec<TomlSettlement>,
    #[serde(default)]
    facilities: Vec<TomlFacility>,
    #[serde(default)]
    plans: Vec<TomlPlan>,
}

#[derive(Debug, Deserialize)]
struct TomlSettlement {
    name: String,
    #[serde(rename = "type")]
    settlement_type: TomlSettlementType,
}

/// Settlement type given either by name or by its numeric code
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlSettlementType {
    Name(SettlementType),
    Code(u8),
}

impl TomlSettlementType {
    fn resolve(self, location: &str) -> Result<SettlementType, ConfigError> {
        match self {
            TomlSettlementType::Name(settlement_type) => Ok(settlement_type),
            TomlSettlementType::Code(code) => {
                SettlementType::from_code(code).ok_or_else(|| ConfigError::InvalidSettlementType {
                    location: location.to_string(),
                    code,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TomlFacility {
    name: String,
    category: FacilityCategory,
    cost: u32,
    #[serde(default)]
    life_quality: i32,
    #[serde(default)]
    economy: i32,
    #[serde(default)]
    environment: i32,
}

impl TomlFacility {
    fn into_facility_type(self) -> FacilityType {
        FacilityType::new(
            self.name,
            self.category,
            self.cost,
            Scores::new(self.life_quality, self.economy, self.environment),
        )
    }
}

#[derive(Debug, Deserialize)]
struct TomlPlan {
    settlement: String,
    policy: String,
}

/// Build an engine from TOML; settlements, then facilities, then plans
pub fn parse_toml_config(content: &str) -> Result<SimulationEngine, ConfigError> {
    let config: TomlConfig = toml::from_str(content)?;
    let mut engine = SimulationEngine::new();

    for (idx, settlement) in config.settlements.into_iter().enumerate() {
        let location = format!("settlements[{}]", idx);
        let settlement_type = settlement.settlement_type.resolve(&location)?;
        engine
            .add_settlement(Settlement::new(settlement.name, settlement_type))
            .map_err(|source| ConfigError::Rejected { location, source })?;
    }

    for (idx, facility) in config.facilities.into_iter().enumerate() {
        engine
            .add_facility_type(facility.into_facility_type())
            .map_err(|source| ConfigError::Rejected {
                location: format!("facilities[{}]", idx),
                source,
            })?;
    }

    for (idx, plan) in config.plans.iter().enumerate() {
        engine
            .add_plan(&plan.settlement, &plan.policy)
            .map_err(|source| ConfigError::Rejected {
                location: format!("plans[{}]", idx),
                source,
            })?;
    }

    Ok(engine)
}
