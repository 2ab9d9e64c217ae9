//! `/store` scenarios

use serde_json::json;

use petcheck_core::checks::{
    expect_field_eq, expect_fields_match, expect_json, expect_schema, expect_ship_date,
    expect_status, expect_text,
};
use petcheck_core::models::{Order, OrderStatus};
use petcheck_core::{Failure, SchemaName};

use super::{Feature, Scenario, SuiteContext};
use crate::fixtures::{Fixture, ResourceKind};

const SHIP_DATE: &str = "2025-04-03T16:44:27.948";
const NONEXISTENT_ORDER_ID: i64 = 9999;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "add_new_order",
            feature: Feature::Store,
            title: "Place a new order",
            run: add_new_order,
        },
        Scenario {
            name: "get_order_by_id",
            feature: Feature::Store,
            title: "Get an order by id",
            run: get_order_by_id,
        },
        Scenario {
            name: "delete_existing_order",
            feature: Feature::Store,
            title: "Delete an existing order",
            run: delete_existing_order,
        },
        Scenario {
            name: "get_nonexistent_order",
            feature: Feature::Store,
            title: "Get a nonexistent order",
            run: get_nonexistent_order,
        },
        Scenario {
            name: "get_inventory",
            feature: Feature::Store,
            title: "Get store inventory",
            run: get_inventory,
        },
    ]
}

fn add_new_order(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let order = Order {
        id: ctx.ids().next(1),
        pet_id: ctx.ids().next(1),
        quantity: 1,
        ship_date: Some(SHIP_DATE.to_string()),
        status: OrderStatus::Placed,
        complete: true,
    };
    let payload = ctx.step("Prepare new order payload", || Ok(order.to_json()))?;

    let ex = ctx.step("Send create request", || {
        Ok(ctx.store().place_order(&payload)?)
    })?;
    let mut created = Fixture::track(ResourceKind::Order, ctx.store(), order.id);

    let body = ctx.step("Check response status and validate schema", || {
        expect_status(&ex, 200)?;
        let body = expect_json(&ex)?;
        created.sync_id(&body);
        expect_schema(&ex, &body, ctx.schemas(), SchemaName::Order)?;
        Ok(body)
    })?;
    ctx.step("Check response fields", || {
        expect_fields_match(
            &ex,
            &body,
            &payload,
            &["id", "petId", "quantity", "status", "complete"],
        )?;
        expect_ship_date(&ex, &body, SHIP_DATE)
    })
}

fn get_order_by_id(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let order = ctx.step("Create order fixture", || {
        Fixture::order(ctx.store(), ctx.ids())
    })?;
    let order_id = order.id();

    let ex = ctx.step("Send get request by id", || {
        Ok(ctx.store().get_order(order_id)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 200))?;
    ctx.step("Check order id", || {
        let body = expect_json(&ex)?;
        expect_field_eq(&ex, &body, "id", &json!(order_id))
    })
}

fn delete_existing_order(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let order = ctx.step("Create order fixture", || {
        Fixture::order(ctx.store(), ctx.ids())
    })?;
    let order_id = order.id();

    let ex = ctx.step("Send delete request", || {
        Ok(ctx.store().delete_order(order_id)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 200))?;

    let ex = ctx.step("Get the deleted order", || {
        Ok(ctx.store().get_order(order_id)?)
    })?;
    ctx.step("Check deleted order status", || expect_status(&ex, 404))?;
    order.mark_deleted();
    Ok(())
}

fn get_nonexistent_order(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let ex = ctx.step("Send get request for a nonexistent order", || {
        Ok(ctx.store().get_order(NONEXISTENT_ORDER_ID)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 404))?;
    ctx.step("Check response text", || expect_text(&ex, "Order not found"))
}

fn get_inventory(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let ex = ctx.step("Send inventory request", || Ok(ctx.store().get_inventory()?))?;
    ctx.step("Check response status and validate schema", || {
        expect_status(&ex, 200)?;
        let body = expect_json(&ex)?;
        expect_schema(&ex, &body, ctx.schemas(), SchemaName::Inventory)
    })
}
