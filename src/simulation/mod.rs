pub mod engine;
pub mod loader;

pub use engine::{ExecutionResult, SimulationEngine, StepFailure, StepReport};
pub use loader::{load_config, parse_config_lines, parse_toml_config, ConfigError};
