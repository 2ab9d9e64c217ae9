//! `/pet` scenarios

use serde_json::json;

use petcheck_core::checks::{
    expect_field_eq, expect_fields_match, expect_json, expect_schema, expect_status, expect_text,
};
use petcheck_core::models::{Pet, PetStatus};
use petcheck_core::{Failure, SchemaName};

use super::{Feature, Scenario, SuiteContext};
use crate::fixtures::{Fixture, ResourceKind};

/// Sent verbatim as the path segment, leading zeros included.
const NONEXISTENT_DELETE_ID: &str = "0000";
const NONEXISTENT_UPDATE_ID: i64 = 0;
const NONEXISTENT_GET_ID: i64 = 9999;

pub(super) fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "delete_nonexistent_pet",
            feature: Feature::Pet,
            title: "Delete a nonexistent pet",
            run: delete_nonexistent_pet,
        },
        Scenario {
            name: "update_nonexistent_pet",
            feature: Feature::Pet,
            title: "Update a nonexistent pet",
            run: update_nonexistent_pet,
        },
        Scenario {
            name: "get_nonexistent_pet",
            feature: Feature::Pet,
            title: "Get a nonexistent pet",
            run: get_nonexistent_pet,
        },
        Scenario {
            name: "add_new_pet",
            feature: Feature::Pet,
            title: "Add a new pet",
            run: add_new_pet,
        },
        Scenario {
            name: "add_new_pet_with_full_data",
            feature: Feature::Pet,
            title: "Add a new pet with full data",
            run: add_new_pet_with_full_data,
        },
        Scenario {
            name: "get_pet_by_id",
            feature: Feature::Pet,
            title: "Get a pet by id",
            run: get_pet_by_id,
        },
        Scenario {
            name: "update_existing_pet",
            feature: Feature::Pet,
            title: "Update an existing pet",
            run: update_existing_pet,
        },
        Scenario {
            name: "delete_existing_pet",
            feature: Feature::Pet,
            title: "Delete an existing pet",
            run: delete_existing_pet,
        },
    ]
}

fn delete_nonexistent_pet(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let ex = ctx.step("Send delete request for a nonexistent pet", || {
        Ok(ctx.store().delete_pet(NONEXISTENT_DELETE_ID)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 200))?;
    ctx.step("Check response text", || expect_text(&ex, "Pet deleted"))
}

fn update_nonexistent_pet(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let payload = ctx.step("Prepare update payload for a nonexistent pet", || {
        Ok(Pet::new(NONEXISTENT_UPDATE_ID, "nonexistant_pet", PetStatus::Available).to_json())
    })?;
    let ex = ctx.step("Send update request", || {
        Ok(ctx.store().update_pet(&payload)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 404))?;
    ctx.step("Check response text", || expect_text(&ex, "Pet not found"))
}

fn get_nonexistent_pet(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let ex = ctx.step("Send get request for a nonexistent pet", || {
        Ok(ctx.store().get_pet(NONEXISTENT_GET_ID)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 404))?;
    ctx.step("Check response text", || expect_text(&ex, "Pet not found"))
}

fn add_new_pet(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let pet = Pet::new(ctx.ids().next(1), "Tom", PetStatus::Available);
    let payload = ctx.step("Prepare new pet payload", || Ok(pet.to_json()))?;

    let ex = ctx.step("Send create request", || Ok(ctx.store().add_pet(&payload)?))?;
    let mut created = Fixture::track(ResourceKind::Pet, ctx.store(), pet.id);

    let body = ctx.step("Check response status and validate schema", || {
        expect_status(&ex, 200)?;
        let body = expect_json(&ex)?;
        created.sync_id(&body);
        expect_schema(&ex, &body, ctx.schemas(), SchemaName::Pet)?;
        Ok(body)
    })?;
    ctx.step("Check response fields", || {
        expect_fields_match(&ex, &body, &payload, &["id", "name", "status"])
    })
}

fn add_new_pet_with_full_data(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let pet = Pet::new(ctx.ids().next(10), "doggie", PetStatus::Available)
        .with_category(1, "Dogs")
        .with_photo_urls(vec!["string".to_string()])
        .with_tag(0, "string");
    let payload = ctx.step("Prepare full pet payload", || Ok(pet.to_json()))?;

    let ex = ctx.step("Send create request", || Ok(ctx.store().add_pet(&payload)?))?;
    let mut created = Fixture::track(ResourceKind::Pet, ctx.store(), pet.id);

    let body = ctx.step("Check response status and validate schema", || {
        expect_status(&ex, 200)?;
        let body = expect_json(&ex)?;
        created.sync_id(&body);
        expect_schema(&ex, &body, ctx.schemas(), SchemaName::Pet)?;
        Ok(body)
    })?;
    ctx.step("Check response fields", || {
        expect_fields_match(
            &ex,
            &body,
            &payload,
            &["id", "name", "status", "category", "photoUrls", "tags"],
        )
    })
}

fn get_pet_by_id(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let pet = ctx.step("Create pet fixture", || {
        Fixture::pet(ctx.store(), ctx.ids())
    })?;
    let pet_id = pet.id();

    let ex = ctx.step("Send get request by id", || Ok(ctx.store().get_pet(pet_id)?))?;
    ctx.step("Check response status", || expect_status(&ex, 200))?;
    ctx.step("Check pet id", || {
        let body = expect_json(&ex)?;
        expect_field_eq(&ex, &body, "id", &json!(pet_id))
    })
}

fn update_existing_pet(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let pet = ctx.step("Create pet fixture", || {
        Fixture::pet(ctx.store(), ctx.ids())
    })?;

    let payload = Pet::new(pet.id(), "Buddy Updated", PetStatus::Sold).to_json();
    let ex = ctx.step("Send update request with a new name", || {
        Ok(ctx.store().update_pet(&payload)?)
    })?;
    ctx.step("Check response status", || expect_status(&ex, 200))?;
    ctx.step("Check updated name", || {
        let body = expect_json(&ex)?;
        expect_fields_match(&ex, &body, &payload, &["name"])
    })
}

fn delete_existing_pet(ctx: &SuiteContext<'_>) -> Result<(), Failure> {
    let pet = ctx.step("Create pet fixture", || {
        Fixture::pet(ctx.store(), ctx.ids())
    })?;
    let pet_id = pet.id();

    let ex = ctx.step("Send delete request", || Ok(ctx.store().delete_pet(pet_id)?))?;
    ctx.step("Check response status", || expect_status(&ex, 200))?;

    let ex = ctx.step("Get the deleted pet", || Ok(ctx.store().get_pet(pet_id)?))?;
    ctx.step("Check deleted pet status", || expect_status(&ex, 404))?;
    pet.mark_deleted();
    Ok(())
}
