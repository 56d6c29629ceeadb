//! Command pipeline
//!
//! Text line -> parse_action -> ActionKind -> Action::act (via
//! SimulationEngine::execute) -> logged Action with outcome

pub mod action;
pub mod parser;

pub use action::{Action, ActionKind, ActionStatus};
pub use parser::{parse_action, ParseError};
