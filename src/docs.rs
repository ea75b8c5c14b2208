use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Map, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
	info(title = "rescueworks", description = "Multi-tenant animal rescue backend"),
	paths(
		routes::health::health,
		routes::auth::register,
		routes::auth::token,
		routes::auth::me,
		routes::orgs::onboard,
		routes::orgs::get_my_org,
		routes::orgs::update_my_org,
		routes::users::list_users,
		routes::users::create_user,
		routes::users::get_user,
		routes::users::update_user,
		routes::users::assign_role,
		routes::users::revoke_role,
		routes::pets::list_pets,
		routes::pets::create_pet,
		routes::pets::get_pet,
		routes::pets::update_pet,
		routes::pets::assign_foster,
		routes::pets::unassign_foster,
		routes::pets::list_medical_records,
		routes::pets::create_medical_record,
		routes::fosters::list_fosters,
		routes::applications::list_applications,
		routes::applications::create_application,
		routes::applications::get_application,
		routes::applications::update_application,
		routes::events::list_events,
		routes::events::create_event,
		routes::events::get_event,
		routes::events::update_event,
		routes::tasks::list_tasks,
		routes::tasks::create_task,
		routes::tasks::get_task,
		routes::tasks::update_task,
		routes::files::upload_file,
		routes::files::list_files,
		routes::files::get_file,
		routes::files::update_file,
		routes::portal::my_portal
	),
	components(
		schemas(
			routes::health::HealthResponse,
			routes::files::UploadForm,
			models::organization::Organization,
			models::organization::OnboardRequest,
			models::organization::OnboardResponse,
			models::organization::OrganizationUpdateRequest,
			models::user::User,
			models::user::NewUser,
			models::user::UserWithRoles,
			models::user::RoleAssignment,
			models::user::AuthResponse,
			models::user::LoginRequest,
			models::user::RegisterRequest,
			models::user::UserCreateRequest,
			models::user::UserUpdateRequest,
			models::user::AssignRoleRequest,
			models::pet::Pet,
			models::pet::PetStatus,
			models::pet::PetCreateRequest,
			models::pet::PetUpdateRequest,
			models::pet::AssignFosterRequest,
			models::application::Application,
			models::application::ApplicationType,
			models::application::ApplicationStatus,
			models::application::ApplicationCreateRequest,
			models::application::ApplicationUpdateRequest,
			models::event::Event,
			models::event::EventCreateRequest,
			models::event::EventUpdateRequest,
			models::task::Task,
			models::task::TaskStatus,
			models::task::TaskPriority,
			models::task::TaskCreateRequest,
			models::task::TaskUpdateRequest,
			models::medical::MedicalRecord,
			models::medical::MedicalRecordCreateRequest,
			models::document::Document,
			models::document::DocumentVisibility,
			models::document::DocumentUpdateRequest,
			models::portal::PortalSummary,
			models::portal::FosterSummary
		)
	),
	tags(
		(name = "Health", description = "Liveness and database reachability"),
		(name = "Auth", description = "Registration, tokens and the current actor"),
		(name = "Organizations", description = "Onboarding and organization profile"),
		(name = "Users", description = "Members and role assignments"),
		(name = "Pets", description = "Animals in the rescue"),
		(name = "Fosters", description = "Foster assignment"),
		(name = "Medical", description = "Medical history of a pet"),
		(name = "Applications", description = "Adoption, foster and volunteer applications"),
		(name = "Events", description = "Organization events"),
		(name = "Tasks", description = "Volunteer tasks"),
		(name = "Documents", description = "Uploaded files and their visibility"),
		(name = "Portal", description = "The caller's own records")
	)
)]
pub struct ApiDoc;

/// The OpenAPI document as JSON, with the bearer scheme and a local server entry.
pub fn build_openapi(port: u16) -> anyhow::Result<Value> {
	let mut doc = serde_json::to_value(ApiDoc::openapi())?;

	ensure_security_components(&mut doc);
	ensure_openapi_version(&mut doc);
	add_parameter_examples(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(doc)
}

pub fn swagger_routes(doc: Value) -> Router {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true)
		.with_credentials(true)
		.persist_authorization(true);

	let doc_json = Arc::new(doc);

	let json_route = {
		let doc_json = Arc::clone(&doc_json);
		get(move || {
			let doc_json = Arc::clone(&doc_json);
			async move { Json((*doc_json).clone()) }
		})
	};

	Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config))
}

fn object_entry<'a>(doc: &'a mut Value, key: &str) -> Option<&'a mut Map<String, Value>> {
	doc.as_object_mut()?
		.entry(key)
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
}

fn ensure_security_components(doc: &mut Value) {
	let Some(components) = object_entry(doc, "components") else { return; };
	let Some(schemes) = components
		.entry("securitySchemes")
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
	else {
		return;
	};

	schemes.insert(
		"bearerAuth".to_string(),
		json!({
			"type": "http",
			"scheme": "bearer",
			"bearerFormat": "JWT"
		}),
	);
}

fn ensure_openapi_version(doc: &mut Value) {
	if let Some(root) = doc.as_object_mut() {
		root.entry("openapi")
			.or_insert_with(|| Value::String("3.0.3".to_string()));
	}
}

fn add_parameter_examples(doc: &mut Value) {
	let Some(paths) = doc.get_mut("paths").and_then(Value::as_object_mut) else { return; };

	for operation in paths.values_mut().filter_map(Value::as_object_mut).flat_map(|ops| ops.values_mut()) {
		let Some(parameters) = operation.get_mut("parameters").and_then(Value::as_array_mut) else { continue; };
		for parameter in parameters.iter_mut().filter_map(Value::as_object_mut) {
			let example = match parameter.get("name").and_then(Value::as_str) {
				Some("id") | Some("pet_id") => json!("00000000-0000-0000-0000-000000000000"),
				Some("role") => json!("foster"),
				_ => continue,
			};
			parameter.entry("example").or_insert(example);
		}
	}
}

fn ensure_servers(doc: &mut Value, port: u16) {
	let server_url = format!("http://localhost:{}", port);

	match doc.get_mut("servers") {
		Some(Value::Array(arr)) => {
			let has = arr.iter().any(|v| v.get("url").and_then(Value::as_str) == Some(server_url.as_str()));
			if !has {
				arr.push(json!({ "url": server_url }));
			}
		}
		_ => {
			if let Some(root) = doc.as_object_mut() {
				root.insert("servers".to_string(), json!([{ "url": server_url }]));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn document_carries_bearer_scheme_and_foster_paths() {
		let doc = build_openapi(8000).unwrap();

		assert_eq!(doc["components"]["securitySchemes"]["bearerAuth"]["scheme"], "bearer");
		assert!(doc["paths"]["/pets/{id}/foster"]["post"].is_object());
		assert!(doc["paths"]["/pets/{id}/foster"]["delete"].is_object());
		assert_eq!(doc["servers"][0]["url"], "http://localhost:8000");
	}
}
