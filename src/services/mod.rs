//! Resource services.
//!
//! Each operation takes the resolved [`Actor`](crate::authz::Actor) and an
//! already-deserialized input, checks the role requirement first, then reads
//! and writes only through organization-scoped queries. Mutations run in one
//! transaction; dropping it before `commit` rolls everything back.

pub mod applications;
pub mod auth;
pub mod documents;
pub mod events;
pub mod fosters;
pub mod medical;
pub mod organizations;
pub mod pets;
pub mod portal;
pub mod tasks;
pub mod users;
