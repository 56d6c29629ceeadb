//! Facility catalog - the shared, append-only list of buildable facility types

use ahash::AHashMap;
use crate::city::facility::{FacilityCategory, FacilityType};
use crate::core::error::{Result, SimError};

/// Catalog of every facility type plans may choose from
///
/// Entries keep insertion order; selection policies index into it.
#[derive(Debug, Clone, Default)]
pub struct FacilityCatalog {
    entries: Vec<FacilityType>,
    by_name: AHashMap<String, usize>,
}

impl FacilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a facility type, rejecting duplicate names
    pub fn add(&mut self, facility_type: FacilityType) -> Result<()> {
        if self.by_name.contains_key(&facility_type.name) {
            return Err(SimError::DuplicateFacilityType(facility_type.name));
        }
        self.by_name
            .insert(facility_type.name.clone(), self.entries.len());
        self.entries.push(facility_type);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Get a facility type by name
    pub fn get(&self, name: &str) -> Option<&FacilityType> {
        self.by_name.get(name).map(|&idx| &self.entries[idx])
    }

    /// Get all facility types in catalog order
    pub fn all(&self) -> &[FacilityType] {
        &self.entries
    }

    pub fn in_category(&self, category: FacilityCategory) -> impl Iterator<Item = &FacilityType> {
        self.entries.iter().filter(move |f| f.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
