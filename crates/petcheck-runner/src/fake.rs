//! In-memory pet store used by the runner's tests.
//!
//! Mirrors the reference service's observable behaviour: echoing bodies,
//! `Pet not found` / `Order not found` texts, `Pet deleted` for any pet
//! delete, and zone-suffixed ship dates. `Quirks` switch on specific
//! misbehaviours so failure paths can be exercised.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use serde_json::{Value, json};

use petcheck_core::{Exchange, ResponseSnapshot};

use crate::client::{ApiRequest, Method, Transport, TransportError};

#[derive(Debug, Clone, Default)]
pub(crate) struct Quirks {
    /// Every request fails at the transport level
    pub unreachable: bool,
    /// Stored pets get this name instead of the submitted one
    pub rename_pets: Option<&'static str>,
    /// Replaces the submitted ship date wholesale
    pub ship_date: Option<&'static str>,
    /// Deletes answer success but keep the resource
    pub ignore_deletes: bool,
    /// Inventory also reports a `placed` count
    pub inventory_with_placed: bool,
    /// Pet bodies come back as HTML
    pub html_pets: bool,
    /// Created pets and orders get a server-chosen id (submitted + 1000)
    pub reassign_ids: bool,
}

#[derive(Default)]
struct State {
    pets: BTreeMap<i64, Value>,
    orders: BTreeMap<i64, Value>,
}

pub(crate) struct FakePetStore {
    quirks: Quirks,
    state: RefCell<State>,
    log: RefCell<Vec<String>>,
}

const BASE_URL: &str = "http://petstore.test/api/v3";

impl FakePetStore {
    pub fn new() -> Self {
        Self::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Self {
        Self {
            quirks,
            state: RefCell::new(State::default()),
            log: RefCell::new(Vec::new()),
        }
    }

    /// "METHOD /path" for every request received, in order.
    pub fn requests(&self) -> Vec<String> {
        self.log.borrow().clone()
    }

    pub fn pet_count(&self) -> usize {
        self.state.borrow().pets.len()
    }

    pub fn order_count(&self) -> usize {
        self.state.borrow().orders.len()
    }

    fn route(&self, req: &ApiRequest) -> (u16, String) {
        let segments: Vec<&str> = req.path.trim_start_matches('/').split('/').collect();
        let mut state = self.state.borrow_mut();

        match (req.method, segments.as_slice()) {
            (Method::Post, ["pet"]) => {
                let Some((id, mut pet)) = object_with_id(req.body.as_ref()) else {
                    return (400, "Invalid input".into());
                };
                let id = self.assigned_id(id, &mut pet);
                if let Some(name) = self.quirks.rename_pets {
                    pet["name"] = json!(name);
                }
                let stored = with_pet_defaults(pet);
                state.pets.insert(id, stored.clone());
                self.pet_response(&stored)
            }
            (Method::Put, ["pet"]) => {
                let Some((id, mut pet)) = object_with_id(req.body.as_ref()) else {
                    return (400, "Invalid ID supplied".into());
                };
                if !state.pets.contains_key(&id) {
                    return (404, "Pet not found".into());
                }
                if let Some(name) = self.quirks.rename_pets {
                    pet["name"] = json!(name);
                }
                let stored = with_pet_defaults(pet);
                state.pets.insert(id, stored.clone());
                self.pet_response(&stored)
            }
            (Method::Get, ["pet", raw]) => match raw.parse::<i64>() {
                Ok(id) => match state.pets.get(&id) {
                    Some(pet) => self.pet_response(pet),
                    None => (404, "Pet not found".into()),
                },
                Err(_) => (400, "Invalid ID supplied".into()),
            },
            (Method::Delete, ["pet", raw]) => {
                if let Ok(id) = raw.parse::<i64>() {
                    if !self.quirks.ignore_deletes {
                        state.pets.remove(&id);
                    }
                }
                (200, "Pet deleted".into())
            }
            (Method::Post, ["store", "order"]) => {
                let Some((id, mut order)) = object_with_id(req.body.as_ref()) else {
                    return (400, "Invalid input".into());
                };
                let id = self.assigned_id(id, &mut order);
                let ship_date = match self.quirks.ship_date {
                    Some(fixed) => fixed.to_string(),
                    None => match order.get("shipDate").and_then(Value::as_str) {
                        Some(d) => format!("{d}+00:00"),
                        None => "2025-01-01T00:00:00.000+00:00".to_string(),
                    },
                };
                order["shipDate"] = json!(ship_date);
                state.orders.insert(id, order.clone());
                (200, order.to_string())
            }
            (Method::Get, ["store", "order", raw]) => match raw.parse::<i64>() {
                Ok(id) => match state.orders.get(&id) {
                    Some(order) => (200, order.to_string()),
                    None => (404, "Order not found".into()),
                },
                Err(_) => (400, "Invalid ID supplied".into()),
            },
            (Method::Delete, ["store", "order", raw]) => {
                if let Ok(id) = raw.parse::<i64>() {
                    if !self.quirks.ignore_deletes {
                        state.orders.remove(&id);
                    }
                }
                (200, String::new())
            }
            (Method::Get, ["store", "inventory"]) => {
                let mut counts: BTreeMap<&str, i64> = BTreeMap::new();
                counts.insert("approved", 0);
                counts.insert("delivered", 0);
                if self.quirks.inventory_with_placed {
                    counts.insert("placed", 0);
                }
                for order in state.orders.values() {
                    if let Some(status) = order.get("status").and_then(Value::as_str) {
                        if let Some(n) = counts.get_mut(status) {
                            *n += 1;
                        }
                    }
                }
                (200, json!(counts).to_string())
            }
            _ => (404, "Not found".into()),
        }
    }

    fn assigned_id(&self, submitted: i64, body: &mut Value) -> i64 {
        if !self.quirks.reassign_ids {
            return submitted;
        }
        let id = submitted + 1000;
        body["id"] = json!(id);
        id
    }

    fn pet_response(&self, pet: &Value) -> (u16, String) {
        if self.quirks.html_pets {
            return (200, "<html><body>pet</body></html>".into());
        }
        (200, pet.to_string())
    }
}

impl Transport for FakePetStore {
    fn base_url(&self) -> &str {
        BASE_URL
    }

    fn send(&self, request: &ApiRequest) -> Result<Exchange, TransportError> {
        self.log
            .borrow_mut()
            .push(format!("{} {}", request.method, request.path));
        let snapshot = request.snapshot(BASE_URL, &HashMap::new());

        if self.quirks.unreachable {
            return Err(TransportError {
                request: snapshot,
                message: "error sending request: connection refused".into(),
            });
        }

        let (status_code, body) = self.route(request);
        let mut headers = HashMap::new();
        let content_type = if serde_json::from_str::<Value>(&body).is_ok() {
            "application/json"
        } else {
            "text/plain"
        };
        headers.insert("content-type".to_string(), content_type.to_string());

        Ok(Exchange {
            request: snapshot,
            response: ResponseSnapshot {
                status_code,
                headers,
                body,
                latency_ms: 1,
            },
        })
    }
}

fn object_with_id(body: Option<&Value>) -> Option<(i64, Value)> {
    let body = body?;
    let id = body.get("id")?.as_i64()?;
    Some((id, body.clone()))
}

fn with_pet_defaults(mut pet: Value) -> Value {
    if let Some(obj) = pet.as_object_mut() {
        obj.entry("photoUrls").or_insert_with(|| json!([]));
        obj.entry("tags").or_insert_with(|| json!([]));
    }
    pet
}
