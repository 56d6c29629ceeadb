pub mod error;
pub mod types;

pub use error::{Result, SimError};
pub use types::{PlanId, Scores, Tick};
