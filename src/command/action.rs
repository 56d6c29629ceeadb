//! Actions - one user-level operation each, validated against the engine and
//! kept in the engine's log with their outcome

use crate::city::facility::FacilityType;
use crate::city::settlement::{Settlement, SettlementType};
use crate::core::error::SimError;
use crate::core::types::PlanId;
use crate::planning::policy::{PolicyCode, SelectionPolicy};
use crate::simulation::engine::{SimulationEngine, StepReport};
use std::fmt;

/// The command an action carries, with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    Step { steps: u32 },
    AddPlan { settlement: String, policy: String },
    AddSettlement { name: String, settlement_type: SettlementType },
    AddFacilityType { facility: FacilityType },
    /// Plan ids are kept as entered; ids that were never assigned are
    /// reported as `UnknownPlan` when the action runs
    PlanStatus { plan_id: i64 },
    ChangePolicy { plan_id: i64, policy: String },
    PrintLog,
    Backup,
    Restore,
    Close,
}

impl ActionKind {
    /// The command line that produces this action
    pub fn command_line(&self) -> String {
        match self {
            ActionKind::Step { steps } => format!("step {}", steps),
            ActionKind::AddPlan { settlement, policy } => format!("plan {} {}", settlement, policy),
            ActionKind::AddSettlement {
                name,
                settlement_type,
            } => format!("settlement {} {}", name, settlement_type.code()),
            ActionKind::AddFacilityType { facility } => format!(
                "facility {} {} {} {} {} {}",
                facility.name,
                facility.category.code(),
                facility.cost,
                facility.scores.life_quality,
                facility.scores.economy,
                facility.scores.environment
            ),
            ActionKind::PlanStatus { plan_id } => format!("planStatus {}", plan_id),
            ActionKind::ChangePolicy { plan_id, policy } => {
                format!("changePolicy {} {}", plan_id, policy)
            }
            ActionKind::PrintLog => "log".to_string(),
            ActionKind::Backup => "backup".to_string(),
            ActionKind::Restore => "restore".to_string(),
            ActionKind::Close => "close".to_string(),
        }
    }
}

/// Outcome of an executed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionStatus {
    Completed,
    Error(String),
}

impl fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionStatus::Completed => f.write_str("COMPLETED"),
            ActionStatus::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
    /// `None` until the action has run
    status: Option<ActionStatus>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            status: None,
        }
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn status(&self) -> Option<&ActionStatus> {
        self.status.as_ref()
    }

    /// Command line followed by the outcome, e.g. `step 3 COMPLETED`
    pub fn describe(&self) -> String {
        match &self.status {
            Some(status) => format!("{} {}", self.kind.command_line(), status),
            None => self.kind.command_line(),
        }
    }

    /// Validate and perform the action against `engine`
    ///
    /// At most one state-changing engine call is made. Returns the rendered
    /// output of the action, if any. Logging the action is the caller's job
    /// (see `SimulationEngine::execute`).
    pub fn act(&mut self, engine: &mut SimulationEngine) -> Vec<String> {
        match self.kind.clone() {
            ActionKind::Step { steps } => {
                let report = engine.step(steps);
                self.finish_step(&report);
                Vec::new()
            }
            ActionKind::AddPlan { settlement, policy } => {
                self.finish(engine.add_plan(&settlement, &policy).map(|_| ()));
                Vec::new()
            }
            ActionKind::AddSettlement {
                name,
                settlement_type,
            } => {
                self.finish(engine.add_settlement(Settlement::new(name, settlement_type)));
                Vec::new()
            }
            ActionKind::AddFacilityType { facility } => {
                self.finish(engine.add_facility_type(facility));
                Vec::new()
            }
            ActionKind::PlanStatus { plan_id } => match assigned_id(plan_id)
                .and_then(|id| engine.plan(id).map(|plan| plan.describe()))
            {
                Ok(description) => {
                    self.complete();
                    vec![description]
                }
                Err(err) => {
                    self.error(err);
                    Vec::new()
                }
            },
            ActionKind::ChangePolicy { plan_id, policy } => {
                match change_policy(engine, plan_id, &policy) {
                    Ok(previous) => {
                        self.complete();
                        vec![
                            format!("planID: {}", plan_id),
                            format!("previousPolicy: {}", previous),
                            format!("newPolicy: {}", policy),
                        ]
                    }
                    Err(err) => {
                        self.error(err);
                        Vec::new()
                    }
                }
            }
            ActionKind::PrintLog => {
                let lines = engine.action_log().iter().map(Action::describe).collect();
                self.complete();
                lines
            }
            ActionKind::Backup => {
                engine.backup();
                self.complete();
                Vec::new()
            }
            ActionKind::Restore => {
                self.finish(engine.restore());
                Vec::new()
            }
            ActionKind::Close => {
                let report = engine.close();
                self.complete();
                report
            }
        }
    }

    fn complete(&mut self) {
        self.status = Some(ActionStatus::Completed);
    }

    fn error(&mut self, err: impl fmt::Display) {
        self.status = Some(ActionStatus::Error(err.to_string()));
    }

    fn finish(&mut self, result: Result<(), SimError>) {
        match result {
            Ok(()) => self.complete(),
            Err(err) => self.error(err),
        }
    }

    fn finish_step(&mut self, report: &StepReport) {
        if report.is_clean() {
            self.complete();
            return;
        }
        let failures: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("plan {} at tick {}: {}", f.plan, f.tick, f.error))
            .collect();
        self.error(failures.join("; "));
    }
}

fn assigned_id(plan_id: i64) -> Result<PlanId, SimError> {
    u32::try_from(plan_id)
        .map(PlanId)
        .map_err(|_| SimError::UnknownPlan(plan_id))
}

/// Replace a plan's policy, reseeding Balanced from the plan's current scores
///
/// Returns the code of the policy that was replaced.
fn change_policy(
    engine: &mut SimulationEngine,
    plan_id: i64,
    policy: &str,
) -> Result<PolicyCode, SimError> {
    let plan = engine.plan_mut(assigned_id(plan_id)?)?;
    let previous = plan.policy_code();
    if previous.as_str() == policy {
        return Err(SimError::SamePolicyAsCurrent(policy.to_string()));
    }
    let code: PolicyCode = policy.parse()?;
    let replacement = SelectionPolicy::from_code(code, plan.scores());
    plan.set_selection_policy(&replacement);
    Ok(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::facility::FacilityCategory;
    use crate::core::types::Scores;
    use crate::planning::policy::BalancedSelection;

    fn engine() -> SimulationEngine {
        let mut engine = SimulationEngine::new();
        engine.start();
        for kind in [
            ActionKind::AddSettlement {
                name: "Haifa".into(),
                settlement_type: SettlementType::City,
            },
            ActionKind::AddFacilityType {
                facility: FacilityType::new("A", FacilityCategory::Economy, 2, Scores::new(0, 5, 0)),
            },
            ActionKind::AddFacilityType {
                facility: FacilityType::new(
                    "B",
                    FacilityCategory::LifeQuality,
                    1,
                    Scores::new(3, 0, 0),
                ),
            },
        ] {
            assert!(engine.execute(Action::new(kind)).error.is_none());
        }
        engine
    }

    #[test]
    fn test_describe_includes_parameters_and_outcome() {
        let mut action = Action::new(ActionKind::Step { steps: 3 });
        assert_eq!(action.describe(), "step 3");
        assert_eq!(action.status(), None);

        let mut engine = SimulationEngine::new();
        action.act(&mut engine);
        assert_eq!(action.describe(), "step 3 COMPLETED");

        let mut restore = Action::new(ActionKind::Restore);
        restore.act(&mut engine);
        assert_eq!(restore.describe(), "restore ERROR: No backup available");
    }

    #[test]
    fn test_failed_actions_are_logged() {
        let mut engine = engine();
        let result = engine.execute(Action::new(ActionKind::AddPlan {
            settlement: "Nowhere".into(),
            policy: "nve".into(),
        }));

        assert!(result.error.is_some());
        assert_eq!(engine.plan_counter(), 0);
        let last = engine.action_log().last().unwrap();
        assert!(matches!(last.status(), Some(ActionStatus::Error(_))));
        assert_eq!(engine.action_log().len(), 4);
    }

    #[test]
    fn test_change_policy_to_same_code_leaves_policy_untouched() {
        let mut engine = engine();
        engine.add_plan("Haifa", "nve").unwrap();
        engine.step(1);
        let before = engine.plan(PlanId(0)).unwrap().policy().clone();

        let result = engine.execute(Action::new(ActionKind::ChangePolicy {
            plan_id: 0,
            policy: "nve".into(),
        }));

        assert_eq!(
            result.error,
            Some(SimError::SamePolicyAsCurrent("nve".into()).to_string())
        );
        assert_eq!(engine.plan(PlanId(0)).unwrap().policy(), &before);
    }

    #[test]
    fn test_change_policy_reseeds_balanced_from_scores() {
        let mut engine = engine();
        engine.add_plan("Haifa", "eco").unwrap();
        engine.step(2);
        let scores = engine.plan(PlanId(0)).unwrap().scores();
        assert_eq!(scores, Scores::new(0, 10, 0));

        let result = engine.execute(Action::new(ActionKind::ChangePolicy {
            plan_id: 0,
            policy: "bal".into(),
        }));

        assert!(result.error.is_none());
        assert_eq!(result.output[1], "previousPolicy: eco");
        assert_eq!(
            engine.plan(PlanId(0)).unwrap().policy(),
            &SelectionPolicy::Balanced(BalancedSelection::new(scores))
        );
    }

    #[test]
    fn test_change_policy_errors() {
        let mut engine = engine();
        engine.add_plan("Haifa", "nve").unwrap();

        let unknown = engine.execute(Action::new(ActionKind::ChangePolicy {
            plan_id: 4,
            policy: "eco".into(),
        }));
        assert_eq!(unknown.error, Some(SimError::UnknownPlan(4).to_string()));

        let negative = engine.execute(Action::new(ActionKind::ChangePolicy {
            plan_id: -1,
            policy: "eco".into(),
        }));
        assert_eq!(negative.description, "changePolicy -1 eco ERROR: Plan doesn't exist: -1");

        let invalid = engine.execute(Action::new(ActionKind::ChangePolicy {
            plan_id: 0,
            policy: "zzz".into(),
        }));
        assert_eq!(
            invalid.error,
            Some(SimError::InvalidPolicyCode("zzz".into()).to_string())
        );
        assert_eq!(engine.plan(PlanId(0)).unwrap().policy_code(), PolicyCode::Naive);
    }

    #[test]
    fn test_step_action_records_plan_failures() {
        let mut engine = engine();
        engine.add_plan("Haifa", "env").unwrap();
        engine.add_plan("Haifa", "eco").unwrap();

        let result = engine.execute(Action::new(ActionKind::Step { steps: 2 }));
        let message = result.error.unwrap();
        assert!(message.contains("plan 0 at tick 1"));
        assert!(message.contains("plan 0 at tick 2"));
        assert_eq!(engine.plan(PlanId(1)).unwrap().scores().economy, 10);
    }

    #[test]
    fn test_print_log_lists_previous_actions() {
        let mut engine = engine();
        let result = engine.execute(Action::new(ActionKind::PrintLog));
        assert_eq!(
            result.output,
            vec![
                "settlement Haifa 1 COMPLETED".to_string(),
                "facility A 1 2 0 5 0 COMPLETED".to_string(),
                "facility B 0 1 3 0 0 COMPLETED".to_string(),
            ]
        );
        assert_eq!(engine.action_log().last().unwrap().describe(), "log COMPLETED");
    }

    #[test]
    fn test_plan_status_renders_description() {
        let mut engine = engine();
        engine.add_plan("Haifa", "bal").unwrap();

        let result = engine.execute(Action::new(ActionKind::PlanStatus { plan_id: 0 }));
        assert!(result.error.is_none());
        assert!(result.output[0].contains("SelectionPolicy: bal"));

        let missing = engine.execute(Action::new(ActionKind::PlanStatus { plan_id: 1 }));
        assert!(missing.error.is_some());
        assert!(missing.output.is_empty());

        let negative = engine.execute(Action::new(ActionKind::PlanStatus { plan_id: -1 }));
        assert_eq!(negative.description, "planStatus -1 ERROR: Plan doesn't exist: -1");
        assert_eq!(engine.action_log().len(), 6);
    }

    #[test]
    fn test_restore_action_appends_to_restored_log() {
        let mut engine = engine();
        engine.execute(Action::new(ActionKind::Backup));
        engine.execute(Action::new(ActionKind::Step { steps: 1 }));
        engine.execute(Action::new(ActionKind::Restore));

        let log: Vec<_> = engine.action_log().iter().map(Action::describe).collect();
        assert_eq!(log.len(), 4);
        assert_eq!(log[3], "restore COMPLETED");
        assert_eq!(engine.current_tick(), 0);
    }

    #[test]
    fn test_close_ends_run() {
        let mut engine = engine();
        engine.add_plan("Haifa", "nve").unwrap();
        let result = engine.execute(Action::new(ActionKind::Close));
        assert!(!engine.is_running());
        assert_eq!(result.output.len(), 1);
        assert_eq!(result.description, "close COMPLETED");
    }
}
