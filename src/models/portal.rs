use serde::Serialize;
use utoipa::ToSchema;

use crate::models::application::Application;
use crate::models::pet::Pet;
use crate::models::task::Task;
use crate::models::user::User;

#[derive(Debug, Serialize, ToSchema)]
pub struct PortalSummary {
    pub my_applications: Vec<Application>,
    pub my_foster_pets: Vec<Pet>,
    pub my_tasks: Vec<Task>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FosterSummary {
    pub user: User,
    pub pets: Vec<Pet>,
}
