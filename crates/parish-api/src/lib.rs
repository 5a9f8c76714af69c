pub mod auth;
pub mod error;
pub mod events;
pub mod guard;
pub mod join;
pub mod prayers;
pub mod reflections;
pub mod validate;
