pub mod application;
pub mod document;
pub mod event;
pub mod medical;
pub mod organization;
pub mod pet;
pub mod portal;
pub mod task;
pub mod user;
