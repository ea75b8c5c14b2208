pub mod applications;
pub mod auth;
pub mod events;
pub mod files;
pub mod fosters;
pub mod health;
pub mod orgs;
pub mod pets;
pub mod portal;
pub mod tasks;
pub mod users;
