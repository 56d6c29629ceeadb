//! Planning layer - facility selection policies and per-settlement plans

pub mod plan;
pub mod policy;

pub use plan::{Plan, PlanStatus, PlanSummary};
pub use policy::{
    BalancedSelection, CategorySelection, NaiveSelection, PolicyCode, SelectFacility,
    SelectionPolicy,
};
