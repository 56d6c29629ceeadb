//! Simulation engine - owns settlements, the facility catalog, plans, and the
//! action log, and keeps a single backup snapshot of all of it

use ahash::AHashMap;
use crate::city::catalog::FacilityCatalog;
use crate::city::facility::FacilityType;
use crate::city::settlement::Settlement;
use crate::command::action::{Action, ActionStatus};
use crate::core::error::{Result, SimError};
use crate::core::types::{PlanId, Scores, Tick};
use crate::planning::plan::{Plan, PlanSummary};
use crate::planning::policy::{PolicyCode, SelectionPolicy};

/// Everything a backup captures
#[derive(Debug, Clone, Default)]
struct EngineState {
    running: bool,
    current_tick: Tick,
    next_plan_id: u32,
    settlements: Vec<Settlement>,
    settlement_index: AHashMap<String, usize>,
    catalog: FacilityCatalog,
    plans: Vec<Plan>,
    action_log: Vec<Action>,
}

/// A single plan's failure during a step round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepFailure {
    pub tick: Tick,
    pub plan: PlanId,
    pub error: SimError,
}

/// Outcome of `SimulationEngine::step`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    pub rounds: u32,
    pub failures: Vec<StepFailure>,
}

impl StepReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Result of executing an action through the engine
#[derive(Debug)]
pub struct ExecutionResult {
    /// Rendered output the action produced (plan status, log lines, ...)
    pub output: Vec<String>,
    /// Log line of the executed action
    pub description: String,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct SimulationEngine {
    state: EngineState,
    backup: Option<EngineState>,
}

impl SimulationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.state.running = true;
        tracing::info!("Simulation started");
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn current_tick(&self) -> Tick {
        self.state.current_tick
    }

    // === REGISTRIES ===

    pub fn add_settlement(&mut self, settlement: Settlement) -> Result<()> {
        if self.state.settlement_index.contains_key(settlement.name()) {
            return Err(SimError::DuplicateSettlement(settlement.name().to_string()));
        }
        tracing::info!("Added settlement {}", settlement.describe());
        self.state
            .settlement_index
            .insert(settlement.name().to_string(), self.state.settlements.len());
        self.state.settlements.push(settlement);
        Ok(())
    }

    pub fn settlement(&self, name: &str) -> Option<&Settlement> {
        self.state
            .settlement_index
            .get(name)
            .map(|&idx| &self.state.settlements[idx])
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.state.settlements
    }

    /// Append a facility type; existing plans see it from their next step on
    pub fn add_facility_type(&mut self, facility_type: FacilityType) -> Result<()> {
        let name = facility_type.name.clone();
        self.state.catalog.add(facility_type)?;
        tracing::info!("Added facility type {}", name);
        Ok(())
    }

    pub fn catalog(&self) -> &FacilityCatalog {
        &self.state.catalog
    }

    /// Create a plan for an existing settlement with the given policy code
    pub fn add_plan(&mut self, settlement_name: &str, policy_code: &str) -> Result<PlanId> {
        let settlement = self
            .settlement(settlement_name)
            .cloned()
            .ok_or_else(|| SimError::UnknownSettlement(settlement_name.to_string()))?;
        let code: PolicyCode = policy_code.parse()?;

        let id = PlanId(self.state.next_plan_id);
        self.state.next_plan_id += 1;
        let policy = SelectionPolicy::from_code(code, Scores::default());
        self.state.plans.push(Plan::new(id, settlement, policy));
        tracing::info!("Added plan {} for {} ({})", id, settlement_name, code);
        Ok(id)
    }

    pub fn plan(&self, id: PlanId) -> Result<&Plan> {
        self.state
            .plans
            .get(id.index())
            .ok_or(SimError::UnknownPlan(id.0.into()))
    }

    pub fn plan_mut(&mut self, id: PlanId) -> Result<&mut Plan> {
        self.state
            .plans
            .get_mut(id.index())
            .ok_or(SimError::UnknownPlan(id.0.into()))
    }

    pub fn plans(&self) -> &[Plan] {
        &self.state.plans
    }

    /// Number of plan ids handed out so far
    pub fn plan_counter(&self) -> u32 {
        self.state.next_plan_id
    }

    pub fn plan_summaries(&self) -> Vec<PlanSummary> {
        self.state.plans.iter().map(Plan::summary).collect()
    }

    // === TIME ===

    /// Advance every plan `rounds` times, in creation order
    ///
    /// A plan that fails to select a facility is reported; the remaining
    /// plans and rounds still run.
    pub fn step(&mut self, rounds: u32) -> StepReport {
        let mut report = StepReport {
            rounds,
            failures: Vec::new(),
        };

        let EngineState {
            current_tick,
            catalog,
            plans,
            ..
        } = &mut self.state;

        for _ in 0..rounds {
            *current_tick += 1;
            for plan in plans.iter_mut() {
                if let Err(error) = plan.step(catalog) {
                    tracing::warn!("Plan {} failed at tick {}: {}", plan.id(), current_tick, error);
                    report.failures.push(StepFailure {
                        tick: *current_tick,
                        plan: plan.id(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Stop the run, returning every plan's final description
    pub fn close(&mut self) -> Vec<String> {
        self.state.running = false;
        tracing::info!("Simulation closed at tick {}", self.state.current_tick);
        self.state.plans.iter().map(Plan::describe).collect()
    }

    // === SNAPSHOTS ===

    /// Replace the backup slot with a deep copy of the current state
    pub fn backup(&mut self) {
        self.backup = Some(self.state.clone());
        tracing::info!("Backup taken at tick {}", self.state.current_tick);
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    /// Replace the current state with a copy of the backup, keeping the backup
    pub fn restore(&mut self) -> Result<()> {
        let snapshot = self.backup.as_ref().ok_or(SimError::NoBackupAvailable)?;
        self.state = snapshot.clone();
        tracing::info!("Restored backup from tick {}", self.state.current_tick);
        Ok(())
    }

    // === ACTIONS ===

    pub fn action_log(&self) -> &[Action] {
        &self.state.action_log
    }

    /// Run `action` against the engine and append it to the action log
    pub fn execute(&mut self, mut action: Action) -> ExecutionResult {
        let output = action.act(self);
        let error = match action.status() {
            Some(ActionStatus::Error(message)) => {
                tracing::warn!("Action failed: {}", message);
                Some(message.clone())
            }
            _ => None,
        };
        let description = action.describe();
        self.state.action_log.push(action);

        ExecutionResult {
            output,
            description,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::facility::{FacilityCategory, FacilityStatus};
    use crate::city::settlement::SettlementType;
    use crate::planning::plan::PlanStatus;

    fn engine_with_catalog() -> SimulationEngine {
        let mut engine = SimulationEngine::new();
        engine
            .add_settlement(Settlement::new("Haifa", SettlementType::City))
            .unwrap();
        engine
            .add_facility_type(FacilityType::new(
                "A",
                FacilityCategory::Economy,
                2,
                Scores::new(0, 5, 0),
            ))
            .unwrap();
        engine
            .add_facility_type(FacilityType::new(
                "B",
                FacilityCategory::LifeQuality,
                1,
                Scores::new(3, 0, 0),
            ))
            .unwrap();
        engine
    }

    #[test]
    fn test_duplicate_settlement_rejected() {
        let mut engine = engine_with_catalog();
        let err = engine
            .add_settlement(Settlement::new("Haifa", SettlementType::Village))
            .unwrap_err();
        assert_eq!(err, SimError::DuplicateSettlement("Haifa".into()));
        assert_eq!(engine.settlements().len(), 1);
        assert_eq!(
            engine.settlement("Haifa").unwrap().settlement_type(),
            SettlementType::City
        );
    }

    #[test]
    fn test_plan_ids_are_sequential() {
        let mut engine = engine_with_catalog();
        assert_eq!(engine.add_plan("Haifa", "nve").unwrap(), PlanId(0));
        assert_eq!(engine.add_plan("Haifa", "bal").unwrap(), PlanId(1));
        assert_eq!(engine.plan_counter(), 2);
    }

    #[test]
    fn test_add_plan_failures_leave_no_plan() {
        let mut engine = engine_with_catalog();
        assert_eq!(
            engine.add_plan("Tel Aviv", "nve").unwrap_err(),
            SimError::UnknownSettlement("Tel Aviv".into())
        );
        assert_eq!(
            engine.add_plan("Haifa", "xyz").unwrap_err(),
            SimError::InvalidPolicyCode("xyz".into())
        );
        assert_eq!(engine.plan_counter(), 0);
        assert!(engine.plans().is_empty());
    }

    #[test]
    fn test_unknown_plan() {
        let engine = engine_with_catalog();
        assert_eq!(engine.plan(PlanId(0)).unwrap_err(), SimError::UnknownPlan(0));
    }

    #[test]
    fn test_step_advances_all_plans() {
        let mut engine = engine_with_catalog();
        engine.add_plan("Haifa", "eco").unwrap();
        engine.add_plan("Haifa", "nve").unwrap();

        let report = engine.step(2);
        assert!(report.is_clean());
        assert_eq!(engine.current_tick(), 2);
        assert_eq!(engine.plan(PlanId(0)).unwrap().scores().economy, 10);
        // Naive: A and B start on tick 1 (B done), a second A starts on tick 2 as the first finishes
        assert_eq!(engine.plan(PlanId(1)).unwrap().scores(), Scores::new(3, 5, 0));
    }

    #[test]
    fn test_failing_plan_does_not_stop_others() {
        let mut engine = engine_with_catalog();
        engine.add_plan("Haifa", "env").unwrap();
        engine.add_plan("Haifa", "eco").unwrap();

        let report = engine.step(2);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures.iter().all(|f| f.plan == PlanId(0)));
        assert_eq!(report.failures[1].tick, 2);
        assert_eq!(engine.plan(PlanId(1)).unwrap().scores().economy, 10);
    }

    #[test]
    fn test_new_catalog_entries_visible_to_existing_plans() {
        let mut engine = SimulationEngine::new();
        engine
            .add_settlement(Settlement::new("Eilat", SettlementType::Village))
            .unwrap();
        engine.add_plan("Eilat", "env").unwrap();
        assert!(!engine.step(1).is_clean());

        engine
            .add_facility_type(FacilityType::new(
                "Park",
                FacilityCategory::Environment,
                1,
                Scores::new(0, 0, 4),
            ))
            .unwrap();
        assert!(engine.step(1).is_clean());
        assert_eq!(engine.plan(PlanId(0)).unwrap().scores().environment, 4);
    }

    #[test]
    fn test_restore_without_backup() {
        let mut engine = engine_with_catalog();
        assert_eq!(engine.restore().unwrap_err(), SimError::NoBackupAvailable);
        assert_eq!(engine.settlements().len(), 1);
    }

    #[test]
    fn test_backup_restore_round_trip() {
        let mut engine = engine_with_catalog();
        engine.add_plan("Haifa", "eco").unwrap();
        engine.step(1);
        engine.backup();

        engine.step(3);
        engine
            .add_settlement(Settlement::new("Acre", SettlementType::Village))
            .unwrap();
        engine.add_plan("Acre", "nve").unwrap();

        engine.restore().unwrap();
        assert_eq!(engine.current_tick(), 1);
        assert_eq!(engine.plan_counter(), 1);
        assert!(engine.settlement("Acre").is_none());
        let plan = engine.plan(PlanId(0)).unwrap();
        assert_eq!(plan.scores(), Scores::default());
        assert_eq!(plan.status(), PlanStatus::Busy);
        assert!(plan
            .under_construction()
            .iter()
            .all(|f| f.status() == FacilityStatus::UnderConstruction && f.remaining() == 1));

        // Backup survives a restore and can be restored again
        engine.step(5);
        engine.restore().unwrap();
        assert_eq!(engine.current_tick(), 1);
        assert_eq!(engine.plan_summaries()[0].under_construction.len(), 2);
    }

    #[test]
    fn test_second_backup_overwrites_first() {
        let mut engine = engine_with_catalog();
        assert!(!engine.has_backup());
        engine.backup();
        assert!(engine.has_backup());
        engine.add_plan("Haifa", "nve").unwrap();
        engine.backup();
        engine.add_plan("Haifa", "bal").unwrap();

        engine.restore().unwrap();
        assert_eq!(engine.plan_counter(), 1);
    }

    #[test]
    fn test_close_reports_every_plan() {
        let mut engine = engine_with_catalog();
        engine.start();
        engine.add_plan("Haifa", "nve").unwrap();
        engine.add_plan("Haifa", "eco").unwrap();

        let report = engine.close();
        assert!(!engine.is_running());
        assert_eq!(report.len(), 2);
        assert!(report[1].contains("PlanID: 1"));
    }
}
