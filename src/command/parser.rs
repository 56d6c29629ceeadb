//! Command parsing - turns one line of text into an action
//!
//! Structural problems (unknown command word, wrong arity, malformed numbers)
//! are parse errors and never reach the engine. Policy codes are kept as raw
//! text so an invalid code becomes a logged action with an ERROR outcome.

use crate::city::facility::{FacilityCategory, FacilityType};
use crate::city::settlement::SettlementType;
use crate::command::action::ActionKind;
use crate::core::types::Scores;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    WrongArity(&'static str),

    #[error("Invalid number for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid settlement type code: {0}")]
    InvalidSettlementType(String),

    #[error("Invalid facility category code: {0}")]
    InvalidCategory(String),
}

const STEP_USAGE: &str = "step <n>";
const PLAN_USAGE: &str = "plan <settlement> <policy>";
const SETTLEMENT_USAGE: &str = "settlement <name> <type>";
const FACILITY_USAGE: &str = "facility <name> <category> <cost> <lifeQ> <econ> <env>";
const PLAN_STATUS_USAGE: &str = "planStatus <id>";
const CHANGE_POLICY_USAGE: &str = "changePolicy <id> <policy>";

/// Parse one command line; blank lines yield `None`
pub fn parse_action(line: &str) -> Result<Option<ActionKind>, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&command, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let kind = match command {
        "step" => {
            let [steps] = expect_args::<1>(args, STEP_USAGE)?;
            ActionKind::Step {
                steps: parse_number(steps, "steps")?,
            }
        }
        "plan" => {
            let [settlement, policy] = expect_args::<2>(args, PLAN_USAGE)?;
            ActionKind::AddPlan {
                settlement: settlement.to_string(),
                policy: policy.to_string(),
            }
        }
        "settlement" => {
            let [name, type_code] = expect_args::<2>(args, SETTLEMENT_USAGE)?;
            ActionKind::AddSettlement {
                name: name.to_string(),
                settlement_type: parse_settlement_type(type_code)?,
            }
        }
        "facility" => {
            let [name, category, cost, life_quality, economy, environment] =
                expect_args::<6>(args, FACILITY_USAGE)?;
            let scores = Scores::new(
                parse_number(life_quality, "life quality score")?,
                parse_number(economy, "economy score")?,
                parse_number(environment, "environment score")?,
            );
            ActionKind::AddFacilityType {
                facility: FacilityType::new(
                    name,
                    parse_category(category)?,
                    parse_number(cost, "cost")?,
                    scores,
                ),
            }
        }
        "planStatus" => {
            let [id] = expect_args::<1>(args, PLAN_STATUS_USAGE)?;
            ActionKind::PlanStatus {
                plan_id: parse_number(id, "plan id")?,
            }
        }
        "changePolicy" => {
            let [id, policy] = expect_args::<2>(args, CHANGE_POLICY_USAGE)?;
            ActionKind::ChangePolicy {
                plan_id: parse_number(id, "plan id")?,
                policy: policy.to_string(),
            }
        }
        "log" => {
            expect_args::<0>(args, "log")?;
            ActionKind::PrintLog
        }
        "backup" => {
            expect_args::<0>(args, "backup")?;
            ActionKind::Backup
        }
        "restore" => {
            expect_args::<0>(args, "restore")?;
            ActionKind::Restore
        }
        "close" => {
            expect_args::<0>(args, "close")?;
            ActionKind::Close
        }
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };

    Ok(Some(kind))
}

fn expect_args<'a, const N: usize>(
    args: &[&'a str],
    usage: &'static str,
) -> Result<[&'a str; N], ParseError> {
    <[&str; N]>::try_from(args).map_err(|_| ParseError::WrongArity(usage))
}

fn parse_number<T: FromStr>(value: &str, field: &'static str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_settlement_type(value: &str) -> Result<SettlementType, ParseError> {
    value
        .parse::<u8>()
        .ok()
        .and_then(SettlementType::from_code)
        .ok_or_else(|| ParseError::InvalidSettlementType(value.to_string()))
}

fn parse_category(value: &str) -> Result<FacilityCategory, ParseError> {
    value
        .parse::<u8>()
        .ok()
        .and_then(FacilityCategory::from_code)
        .ok_or_else(|| ParseError::InvalidCategory(value.to_string()))
}
