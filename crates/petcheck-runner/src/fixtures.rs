//! Scoped resources: create a pet or order, hand it to the scenario, delete it
//! when the fixture is dropped.
//!
//! Drop runs on every exit path of the scenario body, including early `?`
//! returns and panics, so a fixture never leaks its resource unless the delete
//! request itself fails (logged at `warn`).

use std::cell::Cell;

use serde_json::Value;
use tracing::{debug, warn};

use petcheck_core::checks::{expect_json, expect_status};
use petcheck_core::models::{Order, OrderStatus, Pet, PetStatus};
use petcheck_core::{Failure, FailureKind};

use crate::client::{PetStore, TransportError};
use crate::ids::IdAllocator;

pub const FIXTURE_PET_ID: i64 = 1;
pub const FIXTURE_PET_NAME: &str = "Buddy";
pub const FIXTURE_ORDER_ID: i64 = 1;
pub const FIXTURE_SHIP_DATE: &str = "2025-04-03T16:44:27.948";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Pet,
    Order,
}

impl ResourceKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Order => "order",
        }
    }
}

pub struct Fixture<'a> {
    kind: ResourceKind,
    store: PetStore<'a>,
    id: i64,
    body: Value,
    deleted: Cell<bool>,
}

impl<'a> Fixture<'a> {
    /// Create a pet `{id, name: "Buddy", status: "available"}`.
    ///
    /// # Errors
    ///
    /// `FixtureSetup` if the create call fails or does not return a 200 JSON body.
    pub fn pet(store: PetStore<'a>, ids: &IdAllocator) -> Result<Self, Failure> {
        let pet = Pet::new(
            ids.next(FIXTURE_PET_ID),
            FIXTURE_PET_NAME,
            PetStatus::Available,
        );
        let result = store.add_pet(&pet.to_json());
        Self::setup(ResourceKind::Pet, store, pet.id, result)
    }

    /// Create a placed, complete order for one pet.
    ///
    /// # Errors
    ///
    /// `FixtureSetup` if the create call fails or does not return a 200 JSON body.
    pub fn order(store: PetStore<'a>, ids: &IdAllocator) -> Result<Self, Failure> {
        let order = Order {
            id: ids.next(FIXTURE_ORDER_ID),
            pet_id: ids.next(FIXTURE_PET_ID),
            quantity: 1,
            ship_date: Some(FIXTURE_SHIP_DATE.to_string()),
            status: OrderStatus::Placed,
            complete: true,
        };
        let result = store.place_order(&order.to_json());
        Self::setup(ResourceKind::Order, store, order.id, result)
    }

    /// Take ownership of a resource a scenario created itself, so it is
    /// deleted like a fixture's.
    #[must_use]
    pub fn track(kind: ResourceKind, store: PetStore<'a>, id: i64) -> Self {
        Self {
            kind,
            store,
            id,
            body: Value::Null,
            deleted: Cell::new(false),
        }
    }

    fn setup(
        kind: ResourceKind,
        store: PetStore<'a>,
        id: i64,
        result: Result<petcheck_core::Exchange, TransportError>,
    ) -> Result<Self, Failure> {
        // Track before checking so a half-created resource is still removed
        let mut fixture = Self::track(kind, store, id);
        let ex = result.map_err(|e| setup_failure(kind, e.into()))?;
        expect_status(&ex, 200).map_err(|f| setup_failure(kind, f))?;
        let body = expect_json(&ex).map_err(|f| setup_failure(kind, f))?;
        fixture.sync_id(&body);
        fixture.body = body;
        debug!(kind = kind.as_str(), id = fixture.id, "fixture created");
        Ok(fixture)
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Id of the created resource (as returned by the service).
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Body returned by the create call (`null` for tracked resources).
    #[must_use]
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Follow the id the service returned in `body`, if any, so teardown
    /// deletes what was actually created.
    pub fn sync_id(&mut self, body: &Value) {
        if let Some(returned) = body.get("id").and_then(Value::as_i64) {
            self.id = returned;
        }
    }

    /// The scenario deleted the resource itself; skip teardown.
    pub fn mark_deleted(&self) {
        self.deleted.set(true);
    }
}

impl Drop for Fixture<'_> {
    fn drop(&mut self) {
        if self.deleted.get() {
            return;
        }
        let result = match self.kind {
            ResourceKind::Pet => self.store.delete_pet(self.id),
            ResourceKind::Order => self.store.delete_order(self.id),
        };
        match result {
            Ok(ex) if (200..300).contains(&ex.status()) => {
                debug!(kind = self.kind.as_str(), id = self.id, "fixture deleted");
            }
            Ok(ex) => {
                warn!(
                    kind = self.kind.as_str(),
                    id = self.id,
                    status = ex.status(),
                    "fixture teardown returned non-success status"
                );
            }
            Err(e) => {
                warn!(kind = self.kind.as_str(), id = self.id, error = %e, "fixture teardown failed");
            }
        }
    }
}

fn setup_failure(kind: ResourceKind, mut failure: Failure) -> Failure {
    failure.message = format!("{} fixture: {}", kind.as_str(), failure.message);
    failure.kind = FailureKind::FixtureSetup;
    failure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakePetStore, Quirks};
    use petcheck_core::IdStrategy;

    #[test]
    fn pet_fixture_creates_and_deletes_on_drop() {
        let fake = FakePetStore::new();
        let ids = IdAllocator::new(IdStrategy::Fixed);
        {
            let fixture = Fixture::pet(PetStore::new(&fake), &ids).unwrap();
            assert_eq!(fixture.id(), FIXTURE_PET_ID);
            assert_eq!(fixture.body()["name"], FIXTURE_PET_NAME);
            assert_eq!(fake.pet_count(), 1);
        }
        assert_eq!(fake.pet_count(), 0);
        assert_eq!(fake.requests(), vec!["POST /pet", "DELETE /pet/1"]);
    }

    #[test]
    fn order_fixture_creates_and_deletes_on_drop() {
        let fake = FakePetStore::new();
        let ids = IdAllocator::seeded(IdStrategy::Unique, 7);
        let id = {
            let fixture = Fixture::order(PetStore::new(&fake), &ids).unwrap();
            assert_eq!(fixture.kind(), ResourceKind::Order);
            assert_eq!(fixture.body()["status"], "placed");
            assert_eq!(fake.order_count(), 1);
            fixture.id()
        };
        assert_eq!(fake.order_count(), 0);
        assert_eq!(
            fake.requests().last().cloned(),
            Some(format!("DELETE /store/order/{id}"))
        );
    }

    #[test]
    fn mark_deleted_skips_teardown() {
        let fake = FakePetStore::new();
        let ids = IdAllocator::new(IdStrategy::Fixed);
        {
            let fixture = Fixture::pet(PetStore::new(&fake), &ids).unwrap();
            fixture.mark_deleted();
        }
        assert_eq!(fake.requests(), vec!["POST /pet"]);
    }

    #[test]
    fn teardown_runs_on_early_return() {
        fn body(store: PetStore<'_>, ids: &IdAllocator) -> Result<(), Failure> {
            let _pet = Fixture::pet(store, ids)?;
            Err(Failure::new(FailureKind::StatusMismatch, "boom"))
        }

        let fake = FakePetStore::new();
        let ids = IdAllocator::new(IdStrategy::Fixed);
        assert!(body(PetStore::new(&fake), &ids).is_err());
        assert_eq!(fake.pet_count(), 0);
    }

    #[test]
    fn teardown_runs_on_panic() {
        let fake = FakePetStore::new();
        let ids = IdAllocator::new(IdStrategy::Fixed);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _pet = Fixture::pet(PetStore::new(&fake), &ids).unwrap();
            panic!("scenario bug");
        }));
        assert!(result.is_err());
        assert_eq!(fake.pet_count(), 0);
    }

    #[test]
    fn setup_transport_error_is_fixture_setup() {
        let fake = FakePetStore::with_quirks(Quirks {
            unreachable: true,
            ..Quirks::default()
        });
        let ids = IdAllocator::new(IdStrategy::Fixed);
        let Err(failure) = Fixture::pet(PetStore::new(&fake), &ids) else {
            panic!("fixture should fail");
        };
        assert_eq!(failure.kind, FailureKind::FixtureSetup);
        assert!(failure.message.starts_with("pet fixture:"));
    }

    #[test]
    fn tracked_resource_is_deleted() {
        let fake = FakePetStore::new();
        {
            let _order = Fixture::track(ResourceKind::Order, PetStore::new(&fake), 42);
        }
        assert_eq!(fake.requests(), vec!["DELETE /store/order/42"]);
    }
}
