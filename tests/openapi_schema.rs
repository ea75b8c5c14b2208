use serde_json::Value;

#[test]
fn openapi_lists_every_resource_path() -> anyhow::Result<()> {
    let doc = rescueworks::docs::build_openapi(8000)?;

    let paths = doc
        .get("paths")
        .and_then(Value::as_object)
        .expect("paths must exist");

    let expected = [
        "/api/health",
        "/auth/register",
        "/auth/token",
        "/auth/me",
        "/orgs",
        "/orgs/me",
        "/users",
        "/users/{id}",
        "/users/{id}/roles",
        "/users/{id}/roles/{role}",
        "/pets",
        "/pets/{id}",
        "/pets/{id}/foster",
        "/pets/{id}/medical",
        "/fosters",
        "/applications",
        "/applications/{id}",
        "/events",
        "/events/{id}",
        "/tasks",
        "/tasks/{id}",
        "/files",
        "/files/upload",
        "/files/{id}",
        "/portal/me",
    ];
    for path in expected {
        assert!(paths.contains_key(path), "OpenAPI document missing '{}'", path);
    }

    Ok(())
}

#[test]
fn pet_schema_exposes_foster_link_and_status() -> anyhow::Result<()> {
    let doc = rescueworks::docs::build_openapi(8000)?;

    let props = doc
        .pointer("/components/schemas/Pet/properties")
        .and_then(Value::as_object)
        .expect("components.schemas.Pet.properties must exist");

    for key in ["org_id", "status", "foster_user_id", "description_internal"] {
        assert!(props.contains_key(key), "Pet schema missing '{}'", key);
    }

    let update = doc
        .pointer("/components/schemas/PetUpdateRequest/properties")
        .and_then(Value::as_object)
        .expect("components.schemas.PetUpdateRequest.properties must exist");
    assert!(!update.contains_key("foster_user_id"));

    Ok(())
}

#[test]
fn foster_transitions_document_conflict_response() -> anyhow::Result<()> {
    let doc = rescueworks::docs::build_openapi(8000)?;

    for method in ["post", "delete"] {
        let responses = doc
            .pointer(&format!("/paths/~1pets~1{{id}}~1foster/{}/responses", method))
            .and_then(Value::as_object)
            .expect("foster operation must list responses");
        assert!(responses.contains_key("409"), "{} /pets/{{id}}/foster missing 409", method);
    }
    Ok(())
}
