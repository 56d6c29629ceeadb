//! City layer - settlements, facility types, and facilities under construction

pub mod catalog;
pub mod facility;
pub mod settlement;

pub use catalog::FacilityCatalog;
pub use facility::{ConstructionResult, Facility, FacilityCategory, FacilityStatus, FacilityType};
pub use settlement::{Settlement, SettlementType};
