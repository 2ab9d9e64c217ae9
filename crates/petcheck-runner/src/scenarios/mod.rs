//! Scenario catalogue and the context each scenario runs in

mod pet;
mod store;

use std::cell::RefCell;
use std::fmt;

use tracing::debug;

use petcheck_core::{Failure, SchemaSet};

use crate::client::PetStore;
use crate::ids::IdAllocator;

/// Feature group a scenario belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Pet,
    Store,
}

impl Feature {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Store => "store",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

pub type ScenarioFn = fn(&SuiteContext<'_>) -> Result<(), Failure>;

/// One named end-to-end case
#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub feature: Feature,
    pub title: &'static str,
    pub run: ScenarioFn,
}

impl Scenario {
    /// Substring match on name or exact match on feature.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.feature.as_str() == filter || self.name.contains(filter)
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("feature", &self.feature)
            .finish_non_exhaustive()
    }
}

/// Every scenario, pet feature first, in catalogue order.
#[must_use]
pub fn all() -> Vec<Scenario> {
    let mut scenarios = pet::scenarios();
    scenarios.extend(store::scenarios());
    scenarios
}

/// What a scenario body can reach: the API, the contracts, the id allocator,
/// and a step log.
pub struct SuiteContext<'a> {
    store: PetStore<'a>,
    schemas: &'a SchemaSet,
    ids: &'a IdAllocator,
    steps: RefCell<Vec<String>>,
}

impl<'a> SuiteContext<'a> {
    #[must_use]
    pub fn new(store: PetStore<'a>, schemas: &'a SchemaSet, ids: &'a IdAllocator) -> Self {
        Self {
            store,
            schemas,
            ids,
            steps: RefCell::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn store(&self) -> PetStore<'a> {
        self.store
    }

    #[must_use]
    pub fn schemas(&self) -> &'a SchemaSet {
        self.schemas
    }

    #[must_use]
    pub fn ids(&self) -> &'a IdAllocator {
        self.ids
    }

    /// Run one named step and record its title.
    pub fn step<T>(
        &self,
        title: &str,
        f: impl FnOnce() -> Result<T, Failure>,
    ) -> Result<T, Failure> {
        self.steps.borrow_mut().push(title.to_string());
        debug!(step = title, "step");
        f()
    }

    /// Step titles entered so far.
    pub fn take_steps(&self) -> Vec<String> {
        std::mem::take(&mut *self.steps.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalogue_names_are_unique() {
        let scenarios = all();
        let names: HashSet<_> = scenarios.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), scenarios.len());
        assert_eq!(scenarios.len(), 13);
    }

    #[test]
    fn catalogue_order_pet_then_store() {
        let features: Vec<Feature> = all().iter().map(|s| s.feature).collect();
        let first_store = features.iter().position(|f| *f == Feature::Store).unwrap();
        assert!(features[..first_store].iter().all(|f| *f == Feature::Pet));
        assert!(features[first_store..].iter().all(|f| *f == Feature::Store));
        assert_eq!(first_store, 8);
    }

    #[test]
    fn filter_by_feature_and_name() {
        let scenarios = all();
        assert_eq!(scenarios.iter().filter(|s| s.matches("store")).count(), 5);
        assert_eq!(scenarios.iter().filter(|s| s.matches("pet")).count(), 8);
        assert_eq!(
            scenarios.iter().filter(|s| s.matches("nonexistent")).count(),
            4
        );
        assert_eq!(
            scenarios.iter().filter(|s| s.matches("get_inventory")).count(),
            1
        );
    }
}
